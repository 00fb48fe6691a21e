use crate::domain::{artist::Artist, ids::ArtistId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tipo de relación almacenada en el grafo del backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationKind {
  /// Enlace desde el cuerpo del artículo de Wikipedia del origen.
  Wikipedia,
  /// Influencia declarada ("inspired by").
  Inspired,
}

impl RelationKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      RelationKind::Wikipedia => "WIKIPEDIA",
      RelationKind::Inspired => "INSPIRED",
    }
  }
}

impl fmt::Display for RelationKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Arista dirigida entre dos artistas.
///
/// La igualdad es estructural por el par `(source.id, target.id)`: dos
/// relaciones con los mismos extremos son iguales aunque difiera el texto.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relation {
  pub source: Artist,
  pub target: Artist,

  /// Fragmento HTML del párrafo donde aparece el enlace.
  #[serde(default)]
  pub wikipedia_description: Option<String>,
}

impl Relation {
  pub fn new(source: Artist, target: Artist) -> Self {
    Self { source, target, wikipedia_description: None }
  }

  pub fn with_description(mut self, description: impl Into<String>) -> Self {
    self.wikipedia_description = Some(description.into());
    self
  }

  pub fn endpoints(&self) -> (ArtistId, ArtistId) {
    (self.source.id, self.target.id)
  }
}

impl PartialEq for Relation {
  fn eq(&self, other: &Self) -> bool {
    self.endpoints() == other.endpoints()
  }
}

impl Eq for Relation {}
