use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Request};
use serde::de::DeserializeOwned;

use sonus_core::domain::{Artist, ArtistId, FlaggedItem, Relation, RelationKind};
use sonus_core::ports::{ApiError, ArtistCatalog, FlaggedItemFeed};

use crate::config::ApiConfig;

type Query = Vec<(&'static str, String)>;

/// Adaptador HTTP de los ports de la API.
///
/// Las respuestas JSON se decodifican directamente a los tipos del dominio.
#[derive(Clone)]
pub struct HttpApi {
  client: Client,
  base_url: String,
}

impl HttpApi {
  pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .user_agent(concat!("sonus/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(map_http_error)?;
    Ok(Self { client, base_url: config.base_url.trim_end_matches('/').to_owned() })
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  fn endpoint(&self, path: &str) -> String {
    format!("{}/{}", self.base_url, path.trim_start_matches('/'))
  }

  fn build_get(&self, path: &str, query: &Query) -> Result<Request, ApiError> {
    self.client.get(self.endpoint(path)).query(query).build().map_err(map_http_error)
  }

  async fn get_json<T: DeserializeOwned>(&self, path: &str, query: Query) -> Result<T, ApiError> {
    let request = self.build_get(path, &query)?;
    let url = request.url().to_string();
    tracing::debug!(%url, "GET");

    let response = self.client.execute(request).await.map_err(map_http_error)?;
    let status = response.status();
    if !status.is_success() {
      return Err(ApiError::Status { status: status.as_u16(), url });
    }

    response.json::<T>().await.map_err(map_http_error)
  }
}

fn search_query(name: &str) -> Query {
  vec![("name", name.to_owned())]
}

fn relations_query(artist: ArtistId, kinds: &[RelationKind]) -> Query {
  let mut query = vec![("artist", artist.to_string())];
  query.extend(kinds.iter().map(|k| ("relations", k.as_str().to_owned())));
  query
}

fn describe_query(source: ArtistId, target: ArtistId) -> Query {
  vec![("source", source.to_string()), ("target", target.to_string())]
}

fn path_query(start: ArtistId, end: ArtistId) -> Query {
  vec![("start_id", start.to_string()), ("end_id", end.to_string())]
}

#[async_trait]
impl ArtistCatalog for HttpApi {
  async fn search(&self, name: &str) -> Result<Vec<Artist>, ApiError> {
    self.get_json("search", search_query(name)).await
  }

  async fn relations(&self, artist: ArtistId, kinds: &[RelationKind]) -> Result<Vec<Relation>, ApiError> {
    self.get_json("edges", relations_query(artist, kinds)).await
  }

  async fn describe_relation(&self, source: ArtistId, target: ArtistId) -> Result<Vec<Relation>, ApiError> {
    self.get_json("edge-description", describe_query(source, target)).await
  }

  async fn shortest_paths(&self, start: ArtistId, end: ArtistId) -> Result<Vec<Vec<Artist>>, ApiError> {
    self.get_json("shortest-path", path_query(start, end)).await
  }
}

#[async_trait]
impl FlaggedItemFeed for HttpApi {
  async fn list_flagged(&self) -> Result<Vec<FlaggedItem>, ApiError> {
    self.get_json("policies", Vec::new()).await
  }
}

fn map_http_error(err: reqwest::Error) -> ApiError {
  if err.is_decode() {
    ApiError::Decode(err.to_string())
  } else if let Some(status) = err.status() {
    let url = err.url().map(|u| u.to_string()).unwrap_or_default();
    ApiError::Status { status: status.as_u16(), url }
  } else if err.is_builder() {
    ApiError::Internal(err.to_string())
  } else {
    ApiError::Transport(err.to_string())
  }
}
