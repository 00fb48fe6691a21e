use async_trait::async_trait;

use crate::domain::{Artist, GraphSnapshot, ViewportHint};

/// Conteo que acompaña a la lista filtrada de registros marcados.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewSummary {
  pub shown: usize,
  pub total: usize,
  pub loading: bool,
}

// Port de salida hacia la capa de presentación.
// Los servicios lo llaman después de soltar su estado, nunca con el lock tomado.
#[async_trait]
pub trait ViewObserver: Send + Sync {
  async fn search_results_changed(&self, results: &[Artist]);
  async fn graph_changed(&self, snapshot: &GraphSnapshot, hint: ViewportHint);
  async fn edge_description_changed(&self, description: Option<&str>, loading: bool);
  async fn flagged_items_changed(&self, summary: ReviewSummary);
}

/// Observer que descarta todas las notificaciones.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

#[async_trait]
impl ViewObserver for NullObserver {
  async fn search_results_changed(&self, _results: &[Artist]) {}
  async fn graph_changed(&self, _snapshot: &GraphSnapshot, _hint: ViewportHint) {}
  async fn edge_description_changed(&self, _description: Option<&str>, _loading: bool) {}
  async fn flagged_items_changed(&self, _summary: ReviewSummary) {}
}
