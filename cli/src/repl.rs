//! Line-oriented explorer session.
//!
//! Every request runs as its own task, so a slow answer can still be in
//! flight when the next line is typed. The services drop whatever arrives
//! out of order.

use std::sync::Arc;

use sonus_core::domain::ArtistId;
use sonus_core::ports::{ArtistCatalog, ViewObserver};
use sonus_core::services::{EdgeDescriptionService, ExplorationService, ExplorationSettings, SearchService};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;

use crate::render;

pub const HELP: &str = "\
<text>          search artists (empty line clears)
:pick [n]       explore the n-th search result (default 1)
:node <id>      expand a node of the graph
:edge <s> <t>   highlight an edge and describe it
:unfocus        clear the highlighted edge
:graph          print the current graph
:help           this text
:quit           leave
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
  Search(String),
  Pick(usize),
  Node(ArtistId),
  Edge(ArtistId, ArtistId),
  Unfocus,
  Graph,
  Help,
  Quit,
}

pub fn parse_line(line: &str) -> Result<ReplCommand, String> {
  let line = line.trim();
  let Some(rest) = line.strip_prefix(':') else {
    return Ok(ReplCommand::Search(line.to_owned()));
  };

  let mut words = rest.split_whitespace();
  let name = words.next().unwrap_or_default();
  let args: Vec<&str> = words.collect();

  let id = |raw: &str| raw.parse::<ArtistId>().map_err(|e| format!("bad artist id `{raw}`: {e}"));

  match (name, args.as_slice()) {
    ("pick", []) => Ok(ReplCommand::Pick(1)),
    ("pick", [n]) => match n.parse::<usize>() {
      Ok(n) if n > 0 => Ok(ReplCommand::Pick(n)),
      _ => Err(format!("bad result number `{n}`")),
    },
    ("node", [raw]) => Ok(ReplCommand::Node(id(raw)?)),
    ("edge", [source, target]) => Ok(ReplCommand::Edge(id(source)?, id(target)?)),
    ("unfocus", []) => Ok(ReplCommand::Unfocus),
    ("graph", []) => Ok(ReplCommand::Graph),
    ("help", []) => Ok(ReplCommand::Help),
    ("quit" | "q" | "exit", []) => Ok(ReplCommand::Quit),
    ("pick" | "node" | "edge" | "unfocus" | "graph" | "help" | "quit", _) => {
      Err(format!("wrong arguments for :{name}, see :help"))
    }
    _ => Err(format!("unknown command :{name}, see :help")),
  }
}

pub struct Session<C, O>
where
  C: ArtistCatalog,
  O: ViewObserver,
{
  search: SearchService<C, O>,
  exploration: ExplorationService<C, O>,
  edges: EdgeDescriptionService<C, O>,
  tasks: JoinSet<()>,
}

impl<C, O> Session<C, O>
where
  C: ArtistCatalog + 'static,
  O: ViewObserver + 'static,
{
  pub fn new(catalog: Arc<C>, observer: Arc<O>, settings: ExplorationSettings) -> Self {
    Self {
      search: SearchService::new(Arc::clone(&catalog), Arc::clone(&observer)),
      exploration: ExplorationService::new(Arc::clone(&catalog), Arc::clone(&observer), settings),
      edges: EdgeDescriptionService::new(catalog, observer),
      tasks: JoinSet::new(),
    }
  }

  /// Runs one command. Returns `Ok(false)` on `:quit`; the `Err` text is
  /// meant for the user, not a failure of the session.
  pub fn handle(&mut self, command: ReplCommand) -> Result<bool, String> {
    self.reap();
    match command {
      ReplCommand::Search(query) => {
        self.tasks.spawn(self.search.trigger(&query));
      }
      ReplCommand::Pick(n) => {
        let results = self.search.results();
        let artist = results.into_iter().nth(n - 1).ok_or_else(|| format!("no result #{n}"))?;
        println!("exploring {}", artist.name);
        self.tasks.spawn(self.exploration.select(artist));
      }
      ReplCommand::Node(id) => {
        let pending = self.exploration.select_node(id).ok_or_else(|| format!("{id} is the focal artist or not in the graph"))?;
        self.tasks.spawn(pending);
      }
      ReplCommand::Edge(source, target) => {
        let edge = self.exploration.snapshot().edge(source, target).cloned().ok_or_else(|| format!("no edge {source} → {target}"))?;
        self.exploration.focus_relation(Some(&edge));
        self.tasks.spawn(self.edges.trigger(Some(edge)));
      }
      ReplCommand::Unfocus => {
        self.exploration.focus_relation(None);
        self.tasks.spawn(self.edges.trigger(None));
      }
      ReplCommand::Graph => {
        let focal = self.exploration.focal();
        let focused = self.exploration.focused_relation();
        print!("{}", render::graph(&self.exploration.snapshot(), focal.as_ref(), focused.as_ref()));
      }
      ReplCommand::Help => print!("{HELP}"),
      ReplCommand::Quit => return Ok(false),
    }
    Ok(true)
  }

  fn reap(&mut self) {
    while let Some(done) = self.tasks.try_join_next() {
      if let Err(e) = done {
        tracing::warn!(error = %e, "request task failed");
      }
    }
  }

  /// Waits for every request still in flight.
  pub async fn drain(&mut self) {
    while let Some(done) = self.tasks.join_next().await {
      if let Err(e) = done {
        tracing::warn!(error = %e, "request task failed");
      }
    }
  }
}

/// Reads commands from stdin until `:quit` or end of input.
pub async fn run<C, O>(catalog: Arc<C>, observer: Arc<O>, settings: ExplorationSettings) -> anyhow::Result<()>
where
  C: ArtistCatalog + 'static,
  O: ViewObserver + 'static,
{
  let mut session = Session::new(catalog, observer, settings);
  let mut lines = BufReader::new(tokio::io::stdin()).lines();
  println!("type :help for commands");

  while let Some(line) = lines.next_line().await? {
    let keep_going = match parse_line(&line) {
      Ok(command) => session.handle(command).unwrap_or_else(|message| {
        eprintln!("{message}");
        true
      }),
      Err(message) => {
        eprintln!("{message}");
        true
      }
    };
    if !keep_going {
      break;
    }
  }

  session.drain().await;
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use sonus_client::FixtureApi;
  use sonus_core::ports::NullObserver;

  const FIXTURE: &str = r#"{
    "artists": [
      { "id": 1, "name": "Massive Attack" },
      { "id": 2, "name": "Portishead" },
      { "id": 3, "name": "Tricky" }
    ],
    "relations": [
      { "source": 1, "target": 3, "description": "Tricky rapped on Blue Lines." },
      { "source": 3, "target": 2 }
    ]
  }"#;

  #[test]
  fn plain_lines_are_searches() {
    assert_eq!(parse_line("  bjork "), Ok(ReplCommand::Search("bjork".into())));
    assert_eq!(parse_line(""), Ok(ReplCommand::Search(String::new())));
  }

  #[test]
  fn parses_commands() {
    assert_eq!(parse_line(":pick"), Ok(ReplCommand::Pick(1)));
    assert_eq!(parse_line(":pick 3"), Ok(ReplCommand::Pick(3)));
    assert_eq!(parse_line(":node 42"), Ok(ReplCommand::Node(ArtistId::new(42))));
    assert_eq!(parse_line(":edge 1 2"), Ok(ReplCommand::Edge(ArtistId::new(1), ArtistId::new(2))));
    assert_eq!(parse_line(":q"), Ok(ReplCommand::Quit));
  }

  #[test]
  fn rejects_malformed_commands() {
    assert!(parse_line(":pick 0").is_err());
    assert!(parse_line(":node x").is_err());
    assert!(parse_line(":edge 1").is_err());
    assert!(parse_line(":dance").is_err());
  }

  #[tokio::test]
  async fn session_walks_the_graph() {
    let api = Arc::new(FixtureApi::from_json(FIXTURE).unwrap());
    let mut session = Session::new(api, Arc::new(NullObserver), ExplorationSettings::default());

    assert_eq!(session.handle(ReplCommand::Search("massive".into())), Ok(true));
    session.drain().await;
    assert_eq!(session.handle(ReplCommand::Pick(1)), Ok(true));
    session.drain().await;
    assert_eq!(session.exploration.snapshot().nodes().len(), 2);

    assert!(session.handle(ReplCommand::Node(ArtistId::new(1))).is_err());
    assert_eq!(session.handle(ReplCommand::Node(ArtistId::new(3))), Ok(true));
    session.drain().await;
    assert_eq!(session.exploration.snapshot().nodes().len(), 3);

    assert_eq!(session.handle(ReplCommand::Edge(ArtistId::new(1), ArtistId::new(3))), Ok(true));
    session.drain().await;
    assert_eq!(session.edges.description().as_deref(), Some("<b>Massive Attack → Tricky</b>Tricky rapped on Blue Lines.<br>"));

    assert_eq!(session.handle(ReplCommand::Quit), Ok(false));
  }
}
