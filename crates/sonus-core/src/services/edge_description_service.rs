use std::fmt::Write;
use std::sync::{Arc, Mutex};

use futures::FutureExt;
use futures::future::BoxFuture;

use crate::domain::Relation;
use crate::ports::{ArtistCatalog, ViewObserver};
use crate::services::{PublishGate, RequestToken, StaleGuard, lock};

struct DescriptionState {
  description: StaleGuard<Option<String>>,
  loading: Option<RequestToken>,
}

/// Texto descriptivo de la arista seleccionada en el grafo.
pub struct EdgeDescriptionService<C, O>
where
  C: ArtistCatalog,
  O: ViewObserver,
{
  catalog: Arc<C>,
  observer: Arc<O>,
  state: Arc<Mutex<DescriptionState>>,
  gate: PublishGate,
}

impl<C, O> EdgeDescriptionService<C, O>
where
  C: ArtistCatalog + 'static,
  O: ViewObserver + 'static,
{
  pub fn new(catalog: Arc<C>, observer: Arc<O>) -> Self {
    let state = DescriptionState { description: StaleGuard::new(None), loading: None };
    Self { catalog, observer, state: Arc::new(Mutex::new(state)), gate: PublishGate::default() }
  }

  /// HTML de la última descripción aplicada.
  pub fn description(&self) -> Option<String> {
    lock(&self.state).description.current().clone()
  }

  pub fn is_loading(&self) -> bool {
    lock(&self.state).loading.is_some()
  }

  /// Cambia la arista seleccionada.
  ///
  /// Limpia la descripción en el acto con el token nuevo y la rellena con ese
  /// mismo token cuando llega la respuesta. Con `None` solo limpia.
  pub fn trigger(&self, edge: Option<Relation>) -> BoxFuture<'static, ()> {
    let token = {
      let mut state = lock(&self.state);
      let token = state.description.issue();
      state.description.try_apply(token, None);
      state.loading = edge.as_ref().map(|_| token);
      token
    };

    let catalog = Arc::clone(&self.catalog);
    let observer = Arc::clone(&self.observer);
    let state = Arc::clone(&self.state);
    let gate = self.gate.clone();

    async move {
      if let Some(edge) = edge {
        publish(&gate, &state, observer.as_ref(), token).await;

        let (source, target) = edge.endpoints();
        let outcome = catalog.describe_relation(source, target).await;

        let mut state = lock(&state);
        if state.loading == Some(token) {
          state.loading = None;
        }
        match outcome {
          Ok(items) => {
            state.description.try_apply(token, Some(render_description(&items)));
          }
          // la descripción ya quedó vacía con este token al disparar
          Err(e) => tracing::warn!(%source, %target, %token, error = %e, "failed to fetch edge description"),
        }
      }

      publish(&gate, &state, observer.as_ref(), token).await;
    }
    .boxed()
  }
}

/// Notifica lo que hay en el estado, solo si lo aplicó `token`.
async fn publish<O: ViewObserver>(
  gate: &PublishGate,
  state: &Mutex<DescriptionState>,
  observer: &O,
  token: RequestToken,
) {
  let _turn = gate.turn().await;
  let update = {
    let state = lock(state);
    let current = &state.description;
    current.is_current(token).then(|| (current.current().clone(), state.loading.is_some()))
  };
  if let Some((description, loading)) = update {
    observer.edge_description_changed(description.as_deref(), loading).await;
  }
}

/// Une las relaciones descritas en un solo fragmento HTML:
/// `<b>origen → destino</b>descripción<br>` por cada una.
pub fn render_description(items: &[Relation]) -> String {
  let mut out = String::new();
  for item in items {
    let _ = write!(
      out,
      "<b>{} → {}</b>{}<br>",
      item.source.name,
      item.target.name,
      item.wikipedia_description.as_deref().unwrap_or_default()
    );
  }
  out
}
