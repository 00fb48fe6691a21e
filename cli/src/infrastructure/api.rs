use async_trait::async_trait;
use sonus_client::{FixtureApi, HttpApi};
use sonus_core::domain::{Artist, ArtistId, FlaggedItem, Relation, RelationKind};
use sonus_core::ports::{ApiError, ArtistCatalog, FlaggedItemFeed};

/// The API adapter picked at startup: live HTTP or a local fixture.
pub enum ApiBackend {
  Http(HttpApi),
  Fixture(FixtureApi),
}

impl ApiBackend {
  pub fn label(&self) -> &'static str {
    match self {
      ApiBackend::Http(_) => "http",
      ApiBackend::Fixture(_) => "fixture",
    }
  }
}

#[async_trait]
impl ArtistCatalog for ApiBackend {
  async fn search(&self, name: &str) -> Result<Vec<Artist>, ApiError> {
    match self {
      ApiBackend::Http(api) => api.search(name).await,
      ApiBackend::Fixture(api) => api.search(name).await,
    }
  }

  async fn relations(&self, artist: ArtistId, kinds: &[RelationKind]) -> Result<Vec<Relation>, ApiError> {
    match self {
      ApiBackend::Http(api) => api.relations(artist, kinds).await,
      ApiBackend::Fixture(api) => api.relations(artist, kinds).await,
    }
  }

  async fn describe_relation(&self, source: ArtistId, target: ArtistId) -> Result<Vec<Relation>, ApiError> {
    match self {
      ApiBackend::Http(api) => api.describe_relation(source, target).await,
      ApiBackend::Fixture(api) => api.describe_relation(source, target).await,
    }
  }

  async fn shortest_paths(&self, start: ArtistId, end: ArtistId) -> Result<Vec<Vec<Artist>>, ApiError> {
    match self {
      ApiBackend::Http(api) => api.shortest_paths(start, end).await,
      ApiBackend::Fixture(api) => api.shortest_paths(start, end).await,
    }
  }
}

#[async_trait]
impl FlaggedItemFeed for ApiBackend {
  async fn list_flagged(&self) -> Result<Vec<FlaggedItem>, ApiError> {
    match self {
      ApiBackend::Http(api) => api.list_flagged().await,
      ApiBackend::Fixture(api) => api.list_flagged().await,
    }
  }
}
