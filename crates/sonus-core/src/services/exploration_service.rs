use std::sync::{Arc, Mutex};

use futures::FutureExt;
use futures::future::BoxFuture;

use crate::domain::{
  Artist, ArtistId, EdgePolicy, ExplorationPhase, GraphSnapshot, Relation, RelationKind, merge_with,
};
use crate::ports::{ArtistCatalog, ViewObserver};
use crate::services::{PublishGate, StaleGuard, lock};

/// Parámetros de la exploración incremental.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorationSettings {
  /// Tipos de relación que se piden al expandir un artista.
  pub relation_kinds: Vec<RelationKind>,
  pub edge_policy: EdgePolicy,
}

impl Default for ExplorationSettings {
  fn default() -> Self {
    Self { relation_kinds: vec![RelationKind::Wikipedia], edge_policy: EdgePolicy::KeepDuplicates }
  }
}

/// Lo que se ve: el focal del último snapshot aplicado y el snapshot.
#[derive(Debug, Clone, Default)]
struct ExplorationView {
  focal: Option<Artist>,
  snapshot: GraphSnapshot,
}

struct ExplorationState {
  view: StaleGuard<ExplorationView>,
  focused: Option<(ArtistId, ArtistId)>,
}

/// Exploración del grafo de artistas a partir de un artista focal.
///
/// Cada selección pide las relaciones del artista y fusiona el resultado
/// con el snapshot vigente (ver [`merge_with`]).
pub struct ExplorationService<C, O>
where
  C: ArtistCatalog,
  O: ViewObserver,
{
  catalog: Arc<C>,
  observer: Arc<O>,
  settings: ExplorationSettings,
  state: Arc<Mutex<ExplorationState>>,
  gate: PublishGate,
}

impl<C, O> ExplorationService<C, O>
where
  C: ArtistCatalog + 'static,
  O: ViewObserver + 'static,
{
  pub fn new(catalog: Arc<C>, observer: Arc<O>, settings: ExplorationSettings) -> Self {
    let state = ExplorationState { view: StaleGuard::default(), focused: None };
    Self { catalog, observer, settings, state: Arc::new(Mutex::new(state)), gate: PublishGate::default() }
  }

  pub fn snapshot(&self) -> GraphSnapshot {
    lock(&self.state).view.current().snapshot.clone()
  }

  pub fn focal(&self) -> Option<Artist> {
    lock(&self.state).view.current().focal.clone()
  }

  pub fn phase(&self) -> ExplorationPhase {
    lock(&self.state).view.current().snapshot.phase()
  }

  /// Hace de `artist` el nuevo focal y devuelve la expansión pendiente.
  ///
  /// No filtra selecciones repetidas: volver a elegir el mismo artista pide
  /// de nuevo sus relaciones y, con `KeepDuplicates`, duplica sus aristas.
  pub fn select(&self, artist: Artist) -> BoxFuture<'static, ()> {
    let token = lock(&self.state).view.issue();

    let catalog = Arc::clone(&self.catalog);
    let observer = Arc::clone(&self.observer);
    let state = Arc::clone(&self.state);
    let kinds = self.settings.relation_kinds.clone();
    let policy = self.settings.edge_policy;
    let gate = self.gate.clone();

    async move {
      let relations = match catalog.relations(artist.id, &kinds).await {
        Ok(relations) => relations,
        Err(e) => {
          tracing::warn!(artist = %artist.id, %token, error = %e, "failed to fetch relations");
          return;
        }
      };

      let outcome = {
        let mut state = lock(&state);
        state.view.try_update(token, |prev| {
          let (snapshot, outcome) = merge_with(Some(&prev.snapshot), &artist, relations, policy);
          (ExplorationView { focal: Some(artist.clone()), snapshot }, outcome)
        })
      };
      let Some(outcome) = outcome else { return };

      let _turn = gate.turn().await;
      let snapshot = {
        let state = lock(&state);
        state.view.is_current(token).then(|| state.view.current().snapshot.clone())
      };
      if let Some(snapshot) = snapshot {
        tracing::debug!(
          artist = %artist.id,
          ?outcome,
          nodes = snapshot.nodes().len(),
          edges = snapshot.edges().len(),
          "graph updated"
        );
        observer.graph_changed(&snapshot, outcome.viewport_hint()).await;
      }
    }
    .boxed()
  }

  /// Click sobre un nodo del snapshot.
  ///
  /// Devuelve `None` si el nodo es el focal actual o no pertenece al grafo.
  pub fn select_node(&self, id: ArtistId) -> Option<BoxFuture<'static, ()>> {
    let node = {
      let state = lock(&self.state);
      let view = state.view.current();
      if view.focal.as_ref().is_some_and(|f| f.id == id) {
        return None;
      }
      view.snapshot.node(id).cloned()?
    };
    Some(self.select(node))
  }

  /// Marca (o desmarca con `None`) la arista resaltada. No toca el snapshot.
  pub fn focus_relation(&self, relation: Option<&Relation>) {
    lock(&self.state).focused = relation.map(Relation::endpoints);
  }

  /// Arista resaltada, si sigue existiendo en el snapshot vigente.
  pub fn focused_relation(&self) -> Option<Relation> {
    let state = lock(&self.state);
    let (source, target) = state.focused?;
    state.view.current().snapshot.edge(source, target).cloned()
  }
}
