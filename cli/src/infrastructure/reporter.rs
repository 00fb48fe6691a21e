use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use sonus_core::domain::{Artist, GraphSnapshot, ViewportHint};
use sonus_core::ports::{ReviewSummary, ViewObserver};

use crate::render;

/// Prints every view notification as it arrives. Used by the REPL so stale
/// responses that get dropped simply never show up.
pub struct TerminalReporter {
  out: Mutex<Box<dyn Write + Send>>,
}

impl TerminalReporter {
  pub fn stdout() -> Self {
    Self::to_writer(io::stdout())
  }

  pub fn to_writer(writer: impl Write + Send + 'static) -> Self {
    Self { out: Mutex::new(Box::new(writer)) }
  }

  fn emit(&self, text: &str) {
    let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
    // A closed stdout is not worth failing the session for.
    let _ = out.write_all(text.as_bytes());
    let _ = out.flush();
  }
}

#[async_trait]
impl ViewObserver for TerminalReporter {
  async fn search_results_changed(&self, results: &[Artist]) {
    self.emit(&render::artists(results));
  }

  async fn graph_changed(&self, snapshot: &GraphSnapshot, hint: ViewportHint) {
    let view = match hint {
      ViewportHint::Preserve => "view kept",
      ViewportHint::Recenter { .. } => "view recentered",
    };
    self.emit(&format!(
      "graph: {} nodes, {} edges ({view})\n",
      snapshot.nodes().len(),
      snapshot.edges().len()
    ));
  }

  async fn edge_description_changed(&self, description: Option<&str>, loading: bool) {
    if loading {
      self.emit("describing…\n");
    } else if let Some(html) = description {
      self.emit(&format!("{}\n", render::html_to_text(html)));
    }
  }

  async fn flagged_items_changed(&self, summary: ReviewSummary) {
    if summary.loading {
      self.emit("loading flagged items…\n");
    } else {
      self.emit(&render::review_header(summary));
    }
  }
}
