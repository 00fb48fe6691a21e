mod cli;
mod config;
mod infrastructure;
mod render;
mod repl;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, anyhow, bail};
use sonus_client::{ApiConfig, FixtureApi, HttpApi};
use sonus_config::{CONFIG_BACKEND, LoggingConfig, PATHS};
use sonus_core::domain::{ArtistId, FlaggedItemId};
use sonus_core::ports::{ArtistCatalog, NullObserver};
use sonus_core::services::{
  EdgeDescriptionService, ExplorationService, ExplorationSettings, PolicyReviewService, SearchService,
  render_description,
};

pub use cli::{Cli, Command};
pub use config::ExplorerConfig;
use infrastructure::api::ApiBackend;
use infrastructure::reporter::TerminalReporter;

/// Reads `[logging]` and installs the subscriber before anything else runs.
pub fn init_logging(verbose: u8) -> anyhow::Result<()> {
  let config = LoggingConfig::load().context("loading [logging] config")?;
  infrastructure::logging::init(&config, verbose)
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
  let Cli { fixture, api_url, command, .. } = cli;
  let connect = || -> anyhow::Result<Arc<ApiBackend>> {
    let api = build_api(fixture.as_deref(), api_url.as_deref())?;
    tracing::debug!(backend = api.label(), "api ready");
    Ok(Arc::new(api))
  };

  match command {
    Command::Search { query, pick } => search(connect()?, &query, pick).await,
    Command::Explore { name, expand, focus, json } => explore(connect()?, &name, &expand, focus, json).await,
    Command::Describe { source, target } => {
      let api = connect()?;
      let items = api.describe_relation(source, target).await?;
      if items.is_empty() {
        println!("no relation between {source} and {target}");
      } else {
        println!("{}", render::html_to_text(&render_description(&items)));
      }
      Ok(())
    }
    Command::Path { start, end } => {
      let api = connect()?;
      let found = api.shortest_paths(start, end).await?;
      print!("{}", render::paths(&found));
      Ok(())
    }
    Command::Policies { only_adderall, only_violations, expand, export_screenshots } => {
      policies(connect()?, only_adderall, only_violations, &expand, export_screenshots).await
    }
    Command::Repl => {
      let settings: ExplorationSettings = ExplorerConfig::load()?.into();
      repl::run(connect()?, Arc::new(TerminalReporter::stdout()), settings).await
    }
    Command::Config => show_config(),
  }
}

fn build_api(fixture: Option<&Path>, api_url: Option<&str>) -> anyhow::Result<ApiBackend> {
  if let Some(path) = fixture {
    let fixture = FixtureApi::from_path(path).with_context(|| format!("loading fixture {}", path.display()))?;
    return Ok(ApiBackend::Fixture(fixture));
  }

  let mut config = ApiConfig::load().context("loading [api] config")?;
  if let Some(url) = api_url {
    config.base_url = url.to_owned();
  }
  Ok(ApiBackend::Http(HttpApi::new(&config)?))
}

async fn search(api: Arc<ApiBackend>, query: &str, pick: bool) -> anyhow::Result<()> {
  let service = SearchService::new(api, Arc::new(NullObserver));
  service.trigger(query).await;
  if service.failed() {
    bail!("search for `{query}` failed");
  }

  if pick {
    match service.submit() {
      Some(artist) => println!("{} [{}]", artist.name, artist.id),
      None => println!("no matches"),
    }
  } else {
    print!("{}", render::artists(&service.results()));
  }
  Ok(())
}

async fn explore(
  api: Arc<ApiBackend>,
  name: &str,
  expand: &[ArtistId],
  focus: Option<(ArtistId, ArtistId)>,
  json: bool,
) -> anyhow::Result<()> {
  let observer = Arc::new(NullObserver);
  let search = SearchService::new(Arc::clone(&api), Arc::clone(&observer));
  search.trigger(name).await;
  if search.failed() {
    bail!("search for `{name}` failed");
  }
  let focal = search.submit().ok_or_else(|| anyhow!("no artist matches `{name}`"))?;

  let settings: ExplorationSettings = ExplorerConfig::load()?.into();
  let exploration = ExplorationService::new(Arc::clone(&api), Arc::clone(&observer), settings);
  let focal_name = focal.name.clone();
  exploration.select(focal).await;
  // un select correcto deja al menos el nodo focal
  if exploration.snapshot().is_empty() {
    bail!("could not fetch relations for {focal_name}");
  }

  for &id in expand {
    match exploration.select_node(id) {
      Some(pending) => pending.await,
      None => tracing::warn!(artist = %id, "not expandable: focal artist or not in the graph"),
    }
  }

  let mut description = None;
  if let Some((source, target)) = focus {
    let snapshot = exploration.snapshot();
    let edge = snapshot.edge(source, target).ok_or_else(|| anyhow!("no edge {source} → {target} in the graph"))?;
    exploration.focus_relation(Some(edge));

    let describer = EdgeDescriptionService::new(api, observer);
    describer.trigger(Some(edge.clone())).await;
    description = describer.description();
  }

  if json {
    println!("{}", serde_json::to_string_pretty(&exploration.snapshot())?);
  } else {
    let focal = exploration.focal();
    let focused = exploration.focused_relation();
    print!("{}", render::graph(&exploration.snapshot(), focal.as_ref(), focused.as_ref()));
    if let Some(html) = description {
      println!("\n{}", render::html_to_text(&html));
    }
  }
  Ok(())
}

async fn policies(
  api: Arc<ApiBackend>,
  only_adderall: bool,
  only_violations: bool,
  expand: &[FlaggedItemId],
  export_dir: Option<Option<PathBuf>>,
) -> anyhow::Result<()> {
  let review = PolicyReviewService::new(api, Arc::new(NullObserver));
  review.load().await;
  if review.load_failed() {
    bail!("could not fetch flagged items");
  }
  review.set_only_adderall(only_adderall);
  review.set_only_violations(only_violations);
  for &id in expand {
    review.toggle_expanded(id);
  }

  print!("{}", render::review_header(review.summary()));
  let visible = review.visible();
  match review.empty_message() {
    Some(message) => println!("{message}"),
    None => {
      for item in &visible {
        print!("{}", render::flagged_card(item, review.is_expanded(item.id)));
      }
    }
  }

  if let Some(dir) = export_dir {
    let dir = dir.unwrap_or_else(|| PATHS.screenshots_dir());
    let mut written = 0;
    for item in &visible {
      written += sonus_fs::export_screenshots(&dir, item).await?.len();
    }
    println!("{written} screenshot(s) written to {}", dir.display());
  }
  Ok(())
}

fn show_config() -> anyhow::Result<()> {
  ApiConfig::load()?;
  ExplorerConfig::load()?;
  LoggingConfig::load()?;

  let path = CONFIG_BACKEND.config_file();
  let content = std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
  println!("# {}\n{content}", path.display());
  Ok(())
}
