use std::sync::{Arc, Mutex};

use futures::FutureExt;
use futures::future::BoxFuture;

use crate::domain::Artist;
use crate::ports::{ArtistCatalog, ViewObserver};
use crate::services::{PublishGate, StaleGuard, lock};

struct SearchState {
  query: String,
  results: StaleGuard<Vec<Artist>>,
  failed: bool,
}

/// Búsqueda de artistas por nombre con descarte de respuestas obsoletas.
pub struct SearchService<C, O>
where
  C: ArtistCatalog,
  O: ViewObserver,
{
  catalog: Arc<C>,
  observer: Arc<O>,
  state: Arc<Mutex<SearchState>>,
  gate: PublishGate,
}

impl<C, O> SearchService<C, O>
where
  C: ArtistCatalog + 'static,
  O: ViewObserver + 'static,
{
  pub fn new(catalog: Arc<C>, observer: Arc<O>) -> Self {
    let state = SearchState { query: String::new(), results: StaleGuard::new(Vec::new()), failed: false };
    Self { catalog, observer, state: Arc::new(Mutex::new(state)), gate: PublishGate::default() }
  }

  /// Último texto introducido.
  pub fn query(&self) -> String {
    lock(&self.state).query.clone()
  }

  /// Mejores resultados conocidos hasta ahora.
  pub fn results(&self) -> Vec<Artist> {
    lock(&self.state).results.current().clone()
  }

  /// `true` si la última búsqueda falló y los resultados vacíos no son una
  /// respuesta real.
  pub fn failed(&self) -> bool {
    lock(&self.state).failed
  }

  /// Envío del formulario: el primer resultado, si hay alguno.
  pub fn submit(&self) -> Option<Artist> {
    lock(&self.state).results.current().first().cloned()
  }

  /// Registra `query` y devuelve la búsqueda pendiente.
  ///
  /// El token se emite aquí, antes de construir el future, así que el orden
  /// de llamadas a `trigger` decide qué respuesta gana. Una consulta vacía
  /// limpia los resultados en el acto y no llama a la API.
  pub fn trigger(&self, query: &str) -> BoxFuture<'static, ()> {
    let (token, empty) = {
      let mut state = lock(&self.state);
      state.query = query.to_owned();
      state.failed = false;
      let token = state.results.issue();
      let empty = query.trim().is_empty();
      if empty {
        state.results.try_apply(token, Vec::new());
      }
      (token, empty)
    };

    let catalog = Arc::clone(&self.catalog);
    let observer = Arc::clone(&self.observer);
    let state = Arc::clone(&self.state);
    let gate = self.gate.clone();
    let query = query.to_owned();

    async move {
      if !empty {
        let outcome = catalog.search(&query).await;
        let mut state = lock(&state);
        match outcome {
          Ok(found) => {
            tracing::debug!(%query, %token, hits = found.len(), "search completed");
            state.results.try_apply(token, found);
          }
          Err(e) => {
            tracing::warn!(%query, %token, error = %e, "artist search failed");
            if state.results.is_latest(token) {
              state.results.try_apply(token, Vec::new());
              state.failed = true;
            }
          }
        }
      }

      let _turn = gate.turn().await;
      let results = {
        let state = lock(&state);
        state.results.is_current(token).then(|| state.results.current().clone())
      };
      if let Some(results) = results {
        observer.search_results_changed(&results).await;
      }
    }
    .boxed()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{GraphSnapshot, ViewportHint};
  use crate::ports::{ApiError, ReviewSummary};
  use crate::services::testing::{RecordingObserver, ScriptedApi, ViewEvent, artist};
  use async_trait::async_trait;
  use std::sync::OnceLock;

  fn service() -> (Arc<ScriptedApi>, Arc<RecordingObserver>, SearchService<ScriptedApi, RecordingObserver>) {
    let api = Arc::new(ScriptedApi::default());
    let observer = Arc::new(RecordingObserver::default());
    let service = SearchService::new(Arc::clone(&api), Arc::clone(&observer));
    (api, observer, service)
  }

  fn ids(results: &[Artist]) -> Vec<u64> {
    results.iter().map(|a| a.id.get()).collect()
  }

  #[tokio::test]
  async fn newer_query_wins_even_if_it_finishes_first() {
    let (api, observer, service) = service();
    let slow = api.expect_search("ra");
    let fast = api.expect_search("radio");

    let first = tokio::spawn(service.trigger("ra"));
    let second = tokio::spawn(service.trigger("radio"));

    fast.send(Ok(vec![artist(1, "Radiohead")])).unwrap();
    second.await.unwrap();
    assert_eq!(ids(&service.results()), vec![1]);

    slow.send(Ok(vec![artist(2, "Ra Ra Riot"), artist(3, "Rammstein")])).unwrap();
    first.await.unwrap();

    assert_eq!(ids(&service.results()), vec![1]);
    assert_eq!(service.query(), "radio");
    assert_eq!(observer.events(), vec![ViewEvent::Results(vec![1])]);
  }

  #[tokio::test]
  async fn empty_query_clears_without_calling_the_api() {
    let (api, _observer, service) = service();
    let reply = api.expect_search("bjork");
    let pending = service.trigger("bjork");
    reply.send(Ok(vec![artist(5, "Björk")])).unwrap();
    pending.await;
    assert_eq!(service.results().len(), 1);

    let clear = service.trigger("");
    // cleared before the future is ever polled
    assert!(service.results().is_empty());
    clear.await;

    assert_eq!(api.calls(), vec!["search:bjork".to_owned()]);
  }

  #[tokio::test]
  async fn empty_query_supersedes_in_flight_search() {
    let (api, _observer, service) = service();
    let reply = api.expect_search("beach");
    let pending = tokio::spawn(service.trigger("beach"));
    service.trigger("").await;

    reply.send(Ok(vec![artist(9, "Beach House")])).unwrap();
    pending.await.unwrap();

    assert!(service.results().is_empty());
  }

  #[tokio::test]
  async fn failed_latest_search_settles_to_empty() {
    let (api, observer, service) = service();
    let ok = api.expect_search("muse");
    let pending = service.trigger("muse");
    ok.send(Ok(vec![artist(4, "Muse")])).unwrap();
    pending.await;
    assert_eq!(ids(&service.results()), vec![4]);

    let failing = api.expect_search("muse2");
    let pending = service.trigger("muse2");
    failing.send(Err(ApiError::Transport("connection refused".into()))).unwrap();
    pending.await;

    assert!(service.results().is_empty());
    assert!(service.failed());
    assert_eq!(observer.events().last(), Some(&ViewEvent::Results(vec![])));
  }

  #[tokio::test]
  async fn failed_stale_search_keeps_current_results() {
    let (api, _observer, service) = service();
    let old = api.expect_search("the");
    let new = api.expect_search("the cure");

    let first = tokio::spawn(service.trigger("the"));
    let second = service.trigger("the cure");
    new.send(Ok(vec![artist(7, "The Cure")])).unwrap();
    second.await;

    old.send(Err(ApiError::Status { status: 502, url: "/search".into() })).unwrap();
    first.await.unwrap();

    assert_eq!(ids(&service.results()), vec![7]);
    assert!(!service.failed());
  }

  #[tokio::test]
  async fn clear_polled_late_does_not_hide_newer_results() {
    let (api, observer, service) = service();
    let clear = service.trigger("");
    let reply = api.expect_search("muse");
    let search = service.trigger("muse");

    reply.send(Ok(vec![artist(4, "Muse")])).unwrap();
    search.await;
    clear.await;

    assert_eq!(ids(&service.results()), vec![4]);
    assert_eq!(observer.events(), vec![ViewEvent::Results(vec![4])]);
  }

  /// Anota si el estado del servicio estaba bloqueado en cada notificación.
  #[derive(Default)]
  struct LockWatcher {
    state: OnceLock<Arc<Mutex<SearchState>>>,
    held: Mutex<Vec<bool>>,
  }

  #[async_trait]
  impl ViewObserver for LockWatcher {
    async fn search_results_changed(&self, _results: &[Artist]) {
      let held = self.state.get().is_some_and(|s| s.try_lock().is_err());
      self.held.lock().unwrap().push(held);
    }
    async fn graph_changed(&self, _snapshot: &GraphSnapshot, _hint: ViewportHint) {}
    async fn edge_description_changed(&self, _description: Option<&str>, _loading: bool) {}
    async fn flagged_items_changed(&self, _summary: ReviewSummary) {}
  }

  #[tokio::test]
  async fn observer_runs_without_the_state_lock() {
    let api = Arc::new(ScriptedApi::default());
    let watcher = Arc::new(LockWatcher::default());
    let service = SearchService::new(Arc::clone(&api), Arc::clone(&watcher));
    let _ = watcher.state.set(Arc::clone(&service.state));

    let reply = api.expect_search("air");
    let pending = service.trigger("air");
    reply.send(Ok(vec![artist(8, "Air")])).unwrap();
    pending.await;
    service.trigger("").await;

    assert_eq!(*watcher.held.lock().unwrap(), vec![false, false]);
  }

  #[tokio::test]
  async fn submit_picks_first_result() {
    let (api, _observer, service) = service();
    assert!(service.submit().is_none());

    let reply = api.expect_search("port");
    let pending = service.trigger("port");
    reply.send(Ok(vec![artist(11, "Portishead"), artist(12, "Portugal. The Man")])).unwrap();
    pending.await;

    assert_eq!(service.submit().map(|a| a.name), Some("Portishead".to_owned()));
  }
}
