use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use futures::FutureExt;
use futures::future::BoxFuture;

use crate::domain::{FlaggedItem, FlaggedItemId};
use crate::ports::{FlaggedItemFeed, ReviewSummary, ViewObserver};
use crate::services::{PublishGate, StaleGuard, lock};

/// Filtros del panel de revisión. Se aplican en orden: primero Adderall,
/// después infracciones completas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReviewFilters {
  pub only_adderall: bool,
  pub only_violations: bool,
}

impl ReviewFilters {
  pub fn matches(&self, item: &FlaggedItem) -> bool {
    (!self.only_adderall || item.is_adderall_sold) && (!self.only_violations || item.is_violation())
  }
}

struct ReviewState {
  items: StaleGuard<Vec<FlaggedItem>>,
  loading: bool,
  failed: bool,
  filters: ReviewFilters,
  expanded: BTreeSet<FlaggedItemId>,
}

impl ReviewState {
  fn summary(&self) -> ReviewSummary {
    let items = self.items.current();
    ReviewSummary {
      shown: items.iter().filter(|i| self.filters.matches(i)).count(),
      total: items.len(),
      loading: self.loading,
    }
  }
}

/// Panel de revisión de páginas marcadas.
pub struct PolicyReviewService<F, O>
where
  F: FlaggedItemFeed,
  O: ViewObserver,
{
  feed: Arc<F>,
  observer: Arc<O>,
  state: Arc<Mutex<ReviewState>>,
  gate: PublishGate,
}

impl<F, O> PolicyReviewService<F, O>
where
  F: FlaggedItemFeed + 'static,
  O: ViewObserver + 'static,
{
  /// El panel arranca en estado de carga hasta que termine el primer `load`.
  pub fn new(feed: Arc<F>, observer: Arc<O>) -> Self {
    let state = ReviewState {
      items: StaleGuard::new(Vec::new()),
      loading: true,
      failed: false,
      filters: ReviewFilters::default(),
      expanded: BTreeSet::new(),
    };
    Self { feed, observer, state: Arc::new(Mutex::new(state)), gate: PublishGate::default() }
  }

  /// Pide la lista completa. Si falla se conserva la anterior.
  pub fn load(&self) -> BoxFuture<'static, ()> {
    let token = {
      let mut state = lock(&self.state);
      state.loading = true;
      state.failed = false;
      state.items.issue()
    };

    let feed = Arc::clone(&self.feed);
    let observer = Arc::clone(&self.observer);
    let state = Arc::clone(&self.state);
    let gate = self.gate.clone();

    async move {
      let outcome = feed.list_flagged().await;

      {
        let mut state = lock(&state);
        let latest = state.items.is_latest(token);
        match outcome {
          Ok(items) => {
            tracing::info!(count = items.len(), "flagged items loaded");
            state.items.try_apply(token, items);
          }
          Err(e) => {
            tracing::warn!(%token, error = %e, "failed to fetch flagged items");
            state.failed |= latest;
          }
        }
        // una respuesta vieja no apaga la carga de una más nueva
        if latest {
          state.loading = false;
        }
      }

      let _turn = gate.turn().await;
      let summary = {
        let state = lock(&state);
        state.items.is_latest(token).then(|| state.summary())
      };
      if let Some(summary) = summary {
        observer.flagged_items_changed(summary).await;
      }
    }
    .boxed()
  }

  pub fn is_loading(&self) -> bool {
    lock(&self.state).loading
  }

  /// `true` si la última carga falló: la lista mostrada no es una respuesta
  /// de la API sino la anterior (o ninguna).
  pub fn load_failed(&self) -> bool {
    lock(&self.state).failed
  }

  pub fn set_only_adderall(&self, on: bool) {
    lock(&self.state).filters.only_adderall = on;
  }

  pub fn set_only_violations(&self, on: bool) {
    lock(&self.state).filters.only_violations = on;
  }

  /// Abre o cierra el detalle de `id`. Devuelve si quedó abierto.
  pub fn toggle_expanded(&self, id: FlaggedItemId) -> bool {
    let mut state = lock(&self.state);
    if state.expanded.remove(&id) {
      false
    } else {
      state.expanded.insert(id);
      true
    }
  }

  pub fn is_expanded(&self, id: FlaggedItemId) -> bool {
    lock(&self.state).expanded.contains(&id)
  }

  /// Todos los registros, sin filtrar.
  pub fn items(&self) -> Vec<FlaggedItem> {
    lock(&self.state).items.current().clone()
  }

  /// Registros que pasan los filtros activos, en el orden recibido.
  pub fn visible(&self) -> Vec<FlaggedItem> {
    let state = lock(&self.state);
    state.items.current().iter().filter(|i| state.filters.matches(i)).cloned().collect()
  }

  pub fn summary(&self) -> ReviewSummary {
    lock(&self.state).summary()
  }

  /// Texto para una lista filtrada vacía; `None` si hay algo que mostrar.
  pub fn empty_message(&self) -> Option<&'static str> {
    let state = lock(&self.state);
    if state.summary().shown > 0 {
      return None;
    }
    let message = if state.filters.only_violations {
      "No violations found (Adderall sold + Visa accepted + Not licensed)."
    } else if state.filters.only_adderall {
      "No sites found selling Adderall."
    } else {
      "No policy violations found."
    };
    Some(message)
  }
}
