use crate::domain::ids::ArtistId;
use serde::{Deserialize, Serialize};

/// Representa a un artista (nodo del grafo de exploración).
///
/// Inmutable una vez recibido: una respuesta más reciente lo reemplaza
/// entero, nunca se modifica campo a campo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
  /// Identidad del nodo. Dos artistas con el mismo `id` son el mismo nodo.
  pub id: ArtistId,

  /// Nombre que se muestra como etiqueta.
  pub name: String,

  /// Título de la página de Wikipedia de la que se extrajo el artista.
  #[serde(default)]
  pub wikipedia_title: Option<String>,

  /// Descripción corta de Wikipedia, si existe.
  #[serde(default)]
  pub wikipedia_description: Option<String>,
}

impl Artist {
  pub fn new(id: impl Into<ArtistId>, name: impl Into<String>) -> Self {
    Self { id: id.into(), name: name.into(), wikipedia_title: None, wikipedia_description: None }
  }
}
