pub mod edge_description_service;
pub mod exploration_service;
pub mod policy_review_service;
pub mod search_service;
pub mod stale_guard;

#[cfg(test)]
pub(crate) mod testing;

pub use edge_description_service::{EdgeDescriptionService, render_description};
pub use exploration_service::{ExplorationService, ExplorationSettings};
pub use policy_review_service::{PolicyReviewService, ReviewFilters};
pub use search_service::SearchService;
pub use stale_guard::{RequestToken, StaleGuard};

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::lock::{Mutex as AsyncMutex, MutexGuard as AsyncMutexGuard};

// Los servicios nunca dejan el estado a medio escribir, así que un lock
// envenenado se puede seguir usando.
pub(crate) fn lock<T>(state: &Mutex<T>) -> MutexGuard<'_, T> {
  state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Turno para publicar en el observer.
///
/// Cada future toma el turno, vuelve a leer el estado y solo notifica si su
/// token sigue vigente. Dos respuestas aceptadas nunca llegan a la vista en
/// orden inverso, y una ya superada no llega.
#[derive(Clone, Default)]
pub(crate) struct PublishGate(Arc<AsyncMutex<()>>);

impl PublishGate {
  pub(crate) async fn turn(&self) -> AsyncMutexGuard<'_, ()> {
    self.0.lock().await
  }
}
