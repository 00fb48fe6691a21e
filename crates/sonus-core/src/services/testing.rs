use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::domain::{Artist, ArtistId, FlaggedItem, GraphSnapshot, Relation, RelationKind, ViewportHint};
use crate::ports::{ApiError, ArtistCatalog, FlaggedItemFeed, ReviewSummary, ViewObserver};

type Reply<T> = oneshot::Receiver<Result<T, ApiError>>;
pub(crate) type Responder<T> = oneshot::Sender<Result<T, ApiError>>;

/// Catálogo cuyas respuestas se liberan a mano desde el test, para
/// controlar el orden de finalización.
#[derive(Default)]
pub(crate) struct ScriptedApi {
  search: Mutex<HashMap<String, Reply<Vec<Artist>>>>,
  relations: Mutex<HashMap<ArtistId, Reply<Vec<Relation>>>>,
  describe: Mutex<HashMap<(ArtistId, ArtistId), Reply<Vec<Relation>>>>,
  flagged: Mutex<Vec<Reply<Vec<FlaggedItem>>>>,
  pub(crate) calls: Mutex<Vec<String>>,
}

impl ScriptedApi {
  pub(crate) fn expect_search(&self, name: &str) -> Responder<Vec<Artist>> {
    let (tx, rx) = oneshot::channel();
    self.search.lock().unwrap().insert(name.to_owned(), rx);
    tx
  }

  pub(crate) fn expect_relations(&self, artist: ArtistId) -> Responder<Vec<Relation>> {
    let (tx, rx) = oneshot::channel();
    self.relations.lock().unwrap().insert(artist, rx);
    tx
  }

  pub(crate) fn expect_describe(&self, source: ArtistId, target: ArtistId) -> Responder<Vec<Relation>> {
    let (tx, rx) = oneshot::channel();
    self.describe.lock().unwrap().insert((source, target), rx);
    tx
  }

  pub(crate) fn expect_flagged(&self) -> Responder<Vec<FlaggedItem>> {
    let (tx, rx) = oneshot::channel();
    self.flagged.lock().unwrap().push(rx);
    tx
  }

  pub(crate) fn calls(&self) -> Vec<String> {
    self.calls.lock().unwrap().clone()
  }

  fn record(&self, call: String) {
    self.calls.lock().unwrap().push(call);
  }
}

async fn wait<T>(reply: Option<Reply<T>>, what: &str) -> Result<T, ApiError> {
  match reply {
    Some(rx) => rx.await.unwrap_or_else(|_| Err(ApiError::Internal(format!("{what}: responder dropped")))),
    None => Err(ApiError::Internal(format!("{what}: unexpected call"))),
  }
}

#[async_trait]
impl ArtistCatalog for ScriptedApi {
  async fn search(&self, name: &str) -> Result<Vec<Artist>, ApiError> {
    self.record(format!("search:{name}"));
    let reply = self.search.lock().unwrap().remove(name);
    wait(reply, "search").await
  }

  async fn relations(&self, artist: ArtistId, _kinds: &[RelationKind]) -> Result<Vec<Relation>, ApiError> {
    self.record(format!("relations:{artist}"));
    let reply = self.relations.lock().unwrap().remove(&artist);
    wait(reply, "relations").await
  }

  async fn describe_relation(&self, source: ArtistId, target: ArtistId) -> Result<Vec<Relation>, ApiError> {
    self.record(format!("describe:{source}->{target}"));
    let reply = self.describe.lock().unwrap().remove(&(source, target));
    wait(reply, "describe").await
  }

  async fn shortest_paths(&self, _start: ArtistId, _end: ArtistId) -> Result<Vec<Vec<Artist>>, ApiError> {
    Ok(vec![])
  }
}

#[async_trait]
impl FlaggedItemFeed for ScriptedApi {
  async fn list_flagged(&self) -> Result<Vec<FlaggedItem>, ApiError> {
    self.record("flagged".to_owned());
    let reply = {
      let mut pending = self.flagged.lock().unwrap();
      if pending.is_empty() { None } else { Some(pending.remove(0)) }
    };
    wait(reply, "flagged").await
  }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ViewEvent {
  Results(Vec<u64>),
  Graph { nodes: Vec<u64>, hint: ViewportHint },
  Description { text: Option<String>, loading: bool },
  Flagged(ReviewSummary),
}

/// Observer que guarda cada notificación en orden.
#[derive(Default)]
pub(crate) struct RecordingObserver {
  events: Mutex<Vec<ViewEvent>>,
}

impl RecordingObserver {
  pub(crate) fn events(&self) -> Vec<ViewEvent> {
    self.events.lock().unwrap().clone()
  }

  fn push(&self, event: ViewEvent) {
    self.events.lock().unwrap().push(event);
  }
}

#[async_trait]
impl ViewObserver for RecordingObserver {
  async fn search_results_changed(&self, results: &[Artist]) {
    self.push(ViewEvent::Results(results.iter().map(|a| a.id.get()).collect()));
  }

  async fn graph_changed(&self, snapshot: &GraphSnapshot, hint: ViewportHint) {
    self.push(ViewEvent::Graph { nodes: snapshot.nodes().iter().map(|a| a.id.get()).collect(), hint });
  }

  async fn edge_description_changed(&self, description: Option<&str>, loading: bool) {
    self.push(ViewEvent::Description { text: description.map(str::to_owned), loading });
  }

  async fn flagged_items_changed(&self, summary: ReviewSummary) {
    self.push(ViewEvent::Flagged(summary));
  }
}

pub(crate) fn artist(id: u64, name: &str) -> Artist {
  Artist::new(id, name)
}
