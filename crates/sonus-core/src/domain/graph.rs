use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::domain::{artist::Artist, ids::ArtistId, relation::Relation};

/// Conjunto de nodos y aristas descubiertos en la sesión de exploración.
///
/// Solo hay un snapshot vivo a la vez y se reemplaza entero en cada
/// actualización; [`merge`] siempre construye uno nuevo.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
  nodes: Vec<Artist>,
  edges: Vec<Relation>,
}

impl GraphSnapshot {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn nodes(&self) -> &[Artist] {
    &self.nodes
  }

  pub fn edges(&self) -> &[Relation] {
    &self.edges
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  pub fn contains(&self, id: ArtistId) -> bool {
    self.nodes.iter().any(|n| n.id == id)
  }

  pub fn node(&self, id: ArtistId) -> Option<&Artist> {
    self.nodes.iter().find(|n| n.id == id)
  }

  /// Primera arista con los extremos dados.
  pub fn edge(&self, source: ArtistId, target: ArtistId) -> Option<&Relation> {
    self.edges.iter().find(|e| e.endpoints() == (source, target))
  }

  pub fn phase(&self) -> ExplorationPhase {
    if self.is_empty() { ExplorationPhase::Empty } else { ExplorationPhase::Populated }
  }
}

/// Estado de la exploración. Solo se vuelve a `Empty` al iniciar sesión.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplorationPhase {
  Empty,
  Populated,
}

/// Qué rama tomó la fusión.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
  /// El artista focal ya estaba en el snapshot anterior: se conservó todo.
  Continued,
  /// El artista focal era nuevo: la exploración empezó de cero.
  Restarted,
}

impl MergeOutcome {
  pub fn viewport_hint(&self) -> ViewportHint {
    match self {
      MergeOutcome::Continued => ViewportHint::Preserve,
      MergeOutcome::Restarted => ViewportHint::Recenter { zoom: 5.0, duration_ms: 1000 },
    }
  }
}

/// Indicación para la capa de presentación sobre el pan/zoom del grafo.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewportHint {
  Preserve,
  /// Centrar en el origen y aplicar `zoom` con una animación de `duration_ms`.
  Recenter { zoom: f32, duration_ms: u32 },
}

/// Cómo tratar aristas repetidas al volver a explorar un artista.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgePolicy {
  /// Se añaden tal cual, aunque dupliquen un par `(source, target)` existente.
  #[default]
  KeepDuplicates,
  /// Se descartan las que ya existen por par `(source, target)`.
  Deduplicate,
}

/// Calcula el siguiente snapshot con [`EdgePolicy::KeepDuplicates`].
pub fn merge(
  previous: Option<&GraphSnapshot>,
  focal: &Artist,
  relations: Vec<Relation>,
) -> (GraphSnapshot, MergeOutcome) {
  merge_with(previous, focal, relations, EdgePolicy::KeepDuplicates)
}

/// Calcula el siguiente snapshot a partir del anterior, el artista focal y
/// sus relaciones recién obtenidas.
///
/// Si el focal ya es nodo del snapshot anterior se arrastran todos sus nodos
/// y aristas; si no, se parte de un snapshot vacío. En ambos casos se añaden
/// las relaciones como aristas, y el focal y cada destino como nodos cuando
/// su `id` aún no está presente.
pub fn merge_with(
  previous: Option<&GraphSnapshot>,
  focal: &Artist,
  relations: Vec<Relation>,
  policy: EdgePolicy,
) -> (GraphSnapshot, MergeOutcome) {
  let (mut next, outcome) = match previous {
    Some(prev) if prev.contains(focal.id) => (prev.clone(), MergeOutcome::Continued),
    _ => (GraphSnapshot::new(), MergeOutcome::Restarted),
  };

  let mut seen: HashSet<ArtistId> = next.nodes.iter().map(|n| n.id).collect();
  if seen.insert(focal.id) {
    next.nodes.push(focal.clone());
  }
  for relation in &relations {
    if seen.insert(relation.target.id) {
      next.nodes.push(relation.target.clone());
    }
  }

  match policy {
    EdgePolicy::KeepDuplicates => next.edges.extend(relations),
    EdgePolicy::Deduplicate => {
      let mut pairs: HashSet<(ArtistId, ArtistId)> = next.edges.iter().map(Relation::endpoints).collect();
      next.edges.extend(relations.into_iter().filter(|r| pairs.insert(r.endpoints())));
    }
  }

  (next, outcome)
}
