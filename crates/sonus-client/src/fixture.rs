use std::collections::{HashMap, VecDeque};
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use sonus_core::domain::{Artist, ArtistId, FlaggedItem, Relation, RelationKind};
use sonus_core::ports::{ApiError, ArtistCatalog, FlaggedItemFeed};

/// Máximo de resultados por búsqueda, igual que el backend.
pub const SEARCH_LIMIT: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("relation references unknown artist {0}")]
  UnknownArtist(ArtistId),
}

/// Formato del archivo de fixtures.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct FixtureFile {
  #[serde(default)]
  pub artists: Vec<Artist>,
  #[serde(default)]
  pub relations: Vec<FixtureRelation>,
  #[serde(default)]
  pub flagged: Vec<FlaggedItem>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FixtureRelation {
  pub source: ArtistId,
  pub target: ArtistId,
  #[serde(default = "default_kind")]
  pub kind: RelationKind,
  #[serde(default)]
  pub description: Option<String>,
}

fn default_kind() -> RelationKind {
  RelationKind::Wikipedia
}

/// Adaptador en memoria para trabajar sin backend (demos, tests de la CLI).
///
/// Imita las consultas del backend: búsqueda por subcadena sin distinguir
/// mayúsculas, relaciones salientes por tipo, descripción en ambos sentidos
/// y todos los caminos más cortos sin dirección.
#[derive(Debug, Default)]
pub struct FixtureApi {
  artists: Vec<Artist>,
  relations: Vec<(RelationKind, Relation)>,
  flagged: Vec<FlaggedItem>,
}

impl FixtureApi {
  pub fn from_path(path: &Path) -> Result<Self, FixtureError> {
    let content = std::fs::read_to_string(path)?;
    Self::from_json(&content)
  }

  pub fn from_json(json: &str) -> Result<Self, FixtureError> {
    let file: FixtureFile = serde_json::from_str(json)?;
    Self::from_file(file)
  }

  pub fn from_file(file: FixtureFile) -> Result<Self, FixtureError> {
    let by_id: HashMap<ArtistId, &Artist> = file.artists.iter().map(|a| (a.id, a)).collect();
    let lookup = |id: ArtistId| by_id.get(&id).map(|a| (*a).clone()).ok_or(FixtureError::UnknownArtist(id));

    let relations = file
      .relations
      .into_iter()
      .map(|r| {
        let mut relation = Relation::new(lookup(r.source)?, lookup(r.target)?);
        relation.wikipedia_description = r.description;
        Ok((r.kind, relation))
      })
      .collect::<Result<Vec<_>, FixtureError>>()?;

    Ok(Self { artists: file.artists, relations, flagged: file.flagged })
  }

  fn artist(&self, id: ArtistId) -> Option<&Artist> {
    self.artists.iter().find(|a| a.id == id)
  }

  fn neighbours(&self) -> HashMap<ArtistId, Vec<ArtistId>> {
    let mut adj: HashMap<ArtistId, Vec<ArtistId>> = HashMap::new();
    for (_, r) in &self.relations {
      let (s, t) = r.endpoints();
      adj.entry(s).or_default().push(t);
      adj.entry(t).or_default().push(s);
    }
    for list in adj.values_mut() {
      list.sort();
      list.dedup();
    }
    adj
  }
}

/// Todos los caminos de longitud mínima (al menos un salto) de `start` a `end`.
fn all_shortest_paths(adj: &HashMap<ArtistId, Vec<ArtistId>>, start: ArtistId, end: ArtistId) -> Vec<Vec<ArtistId>> {
  if start == end {
    return Vec::new();
  }

  let mut dist: HashMap<ArtistId, usize> = HashMap::from([(start, 0)]);
  let mut preds: HashMap<ArtistId, Vec<ArtistId>> = HashMap::new();
  let mut queue = VecDeque::from([start]);

  while let Some(u) = queue.pop_front() {
    let du = dist[&u];
    if dist.get(&end).is_some_and(|&found| du >= found) {
      break;
    }
    for &v in adj.get(&u).into_iter().flatten() {
      match dist.get(&v) {
        None => {
          dist.insert(v, du + 1);
          preds.entry(v).or_default().push(u);
          queue.push_back(v);
        }
        Some(&dv) if dv == du + 1 => preds.entry(v).or_default().push(u),
        Some(_) => {}
      }
    }
  }

  if !dist.contains_key(&end) {
    return Vec::new();
  }

  let mut paths = Vec::new();
  let mut stack = vec![vec![end]];
  while let Some(partial) = stack.pop() {
    let Some(&head) = partial.last() else { continue };
    if head == start {
      paths.push(partial.into_iter().rev().collect::<Vec<_>>());
      continue;
    }
    for &p in preds.get(&head).into_iter().flatten() {
      let mut next = partial.clone();
      next.push(p);
      stack.push(next);
    }
  }
  paths.sort();
  paths
}

#[async_trait]
impl ArtistCatalog for FixtureApi {
  async fn search(&self, name: &str) -> Result<Vec<Artist>, ApiError> {
    let needle = name.to_lowercase();
    Ok(self.artists.iter().filter(|a| a.name.to_lowercase().contains(&needle)).take(SEARCH_LIMIT).cloned().collect())
  }

  async fn relations(&self, artist: ArtistId, kinds: &[RelationKind]) -> Result<Vec<Relation>, ApiError> {
    Ok(
      self
        .relations
        .iter()
        .filter(|(kind, r)| r.source.id == artist && kinds.contains(kind))
        .map(|(_, r)| r.clone())
        .collect(),
    )
  }

  async fn describe_relation(&self, source: ArtistId, target: ArtistId) -> Result<Vec<Relation>, ApiError> {
    Ok(
      self
        .relations
        .iter()
        .map(|(_, r)| r)
        .filter(|r| r.endpoints() == (source, target) || r.endpoints() == (target, source))
        .cloned()
        .collect(),
    )
  }

  async fn shortest_paths(&self, start: ArtistId, end: ArtistId) -> Result<Vec<Vec<Artist>>, ApiError> {
    let paths = all_shortest_paths(&self.neighbours(), start, end);
    Ok(paths.into_iter().map(|ids| ids.into_iter().filter_map(|id| self.artist(id).cloned()).collect()).collect())
  }
}

#[async_trait]
impl FlaggedItemFeed for FixtureApi {
  async fn list_flagged(&self) -> Result<Vec<FlaggedItem>, ApiError> {
    Ok(self.flagged.clone())
  }
}
