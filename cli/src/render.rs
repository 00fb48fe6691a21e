//! Plain-text rendering of service state for the terminal.

use std::fmt::Write;

use once_cell::sync::Lazy;
use regex::Regex;
use sonus_core::domain::{Artist, FlaggedItem, GraphSnapshot, Relation};
use sonus_core::ports::ReviewSummary;

static BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\s*/?>|</p>").expect("valid regex"));
static MARK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</?mark>").expect("valid regex"));
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

/// Turns the description HTML into readable text: line breaks kept,
/// highlighted names wrapped in `*`, every other tag dropped.
pub fn html_to_text(html: &str) -> String {
  let text = BREAK.replace_all(html, "\n");
  let text = MARK.replace_all(&text, "*");
  let text = TAG.replace_all(&text, "");
  let text = text
    .replace("&nbsp;", " ")
    .replace("&lt;", "<")
    .replace("&gt;", ">")
    .replace("&quot;", "\"")
    .replace("&#39;", "'")
    .replace("&amp;", "&");

  text.lines().map(str::trim).filter(|l| !l.is_empty()).collect::<Vec<_>>().join("\n")
}

pub fn artists(list: &[Artist]) -> String {
  if list.is_empty() {
    return "no matches\n".to_owned();
  }
  let mut out = String::new();
  for (i, artist) in list.iter().enumerate() {
    let _ = writeln!(out, "{:>3}. {} [{}]", i + 1, artist.name, artist.id);
  }
  out
}

pub fn graph(snapshot: &GraphSnapshot, focal: Option<&Artist>, focused: Option<&Relation>) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "nodes ({}):", snapshot.nodes().len());
  for node in snapshot.nodes() {
    let marker = if focal.is_some_and(|f| f.id == node.id) { '*' } else { ' ' };
    let _ = writeln!(out, "  {marker} {} [{}]", node.name, node.id);
  }

  let _ = writeln!(out, "edges ({}):", snapshot.edges().len());
  for edge in snapshot.edges() {
    let marker = if focused.is_some_and(|f| f == edge) { '>' } else { ' ' };
    let _ = writeln!(out, "  {marker} {} → {}", edge.source.name, edge.target.name);
  }
  out
}

pub fn paths(found: &[Vec<Artist>]) -> String {
  if found.is_empty() {
    return "no path\n".to_owned();
  }
  let mut out = String::new();
  for path in found {
    let names: Vec<&str> = path.iter().map(|a| a.name.as_str()).collect();
    let _ = writeln!(out, "{}", names.join(" → "));
  }
  out
}

pub fn review_header(summary: ReviewSummary) -> String {
  format!("Policy Violations ({} of {})\n", summary.shown, summary.total)
}

fn yes_no(value: bool) -> &'static str {
  if value { "Yes" } else { "No" }
}

/// One collapsible card; the detail block only when `expanded`.
pub fn flagged_card(item: &FlaggedItem, expanded: bool) -> String {
  let mut out = String::new();
  let badges: Vec<String> = item.badges().iter().map(|b| format!("[{b}]")).collect();
  let _ = writeln!(
    out,
    "{} #{} {}  {}  {}",
    if expanded { 'v' } else { '>' },
    item.id,
    item.title,
    badges.join(" "),
    item.analyzed_at.format("%Y-%m-%d")
  );
  let _ = writeln!(out, "    {}", item.url);

  if expanded {
    let _ = writeln!(
      out,
      "    Adderall Sold: {}  Licensed Pharmacy: {}  Uses Visa: {}",
      yes_no(item.is_adderall_sold),
      yes_no(item.appears_licensed_pharmacy),
      yes_no(item.uses_visa)
    );
    let _ = writeln!(out, "    Analysis: {}", item.explanation);
    if !item.screenshots.is_empty() {
      let _ = writeln!(out, "    Screenshots ({})", item.screenshots.len());
    }
  }
  out
}
