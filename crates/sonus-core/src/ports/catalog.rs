use crate::domain::{Artist, ArtistId, Relation, RelationKind};
use crate::ports::ApiError;

/// Port de lectura del grafo de artistas.
///
/// Implementaciones posibles:
/// - cliente HTTP contra la API del backend
/// - fixtures en memoria para tests
#[async_trait::async_trait]
pub trait ArtistCatalog: Send + Sync {
  /// Artistas cuyo nombre contiene `name`, en el orden que decida el backend.
  async fn search(&self, name: &str) -> Result<Vec<Artist>, ApiError>;

  /// Relaciones salientes de `artist` de los tipos indicados.
  async fn relations(&self, artist: ArtistId, kinds: &[RelationKind]) -> Result<Vec<Relation>, ApiError>;

  /// Relaciones entre `source` y `target` con su texto descriptivo.
  async fn describe_relation(&self, source: ArtistId, target: ArtistId) -> Result<Vec<Relation>, ApiError>;

  /// Todos los caminos más cortos entre dos artistas.
  async fn shortest_paths(&self, start: ArtistId, end: ArtistId) -> Result<Vec<Vec<Artist>>, ApiError>;
}
