use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sonus_core::domain::{ArtistId, FlaggedItemId};

#[derive(Debug, Parser)]
#[command(name = "sonus", version, about = "Explore related musicians and review flagged pages")]
pub struct Cli {
  /// Serve every request from a JSON fixture instead of the HTTP API.
  #[arg(long, global = true, value_name = "FILE")]
  pub fixture: Option<PathBuf>,

  /// Override `[api] base_url` for this run.
  #[arg(long, global = true, value_name = "URL")]
  pub api_url: Option<String>,

  /// More log output (-v debug, -vv trace). `RUST_LOG` wins when set.
  #[arg(short, long, global = true, action = clap::ArgAction::Count)]
  pub verbose: u8,

  #[command(subcommand)]
  pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
  /// Search artists by name.
  Search {
    query: String,
    /// Print only the first hit, like submitting the search form.
    #[arg(long)]
    pick: bool,
  },

  /// Build the relation graph around an artist.
  Explore {
    /// Name to search for; the first hit becomes the focal artist.
    name: String,
    /// Expand these nodes afterwards, in order.
    #[arg(long = "expand", value_name = "ID")]
    expand: Vec<ArtistId>,
    /// Highlight an edge and print its description.
    #[arg(long, value_name = "SOURCE:TARGET", value_parser = parse_edge)]
    focus: Option<(ArtistId, ArtistId)>,
    /// Print the final graph as JSON.
    #[arg(long)]
    json: bool,
  },

  /// Print the description of the relations between two artists.
  Describe { source: ArtistId, target: ArtistId },

  /// All shortest relation paths between two artists.
  Path { start: ArtistId, end: ArtistId },

  /// Review pages flagged for policy violations.
  Policies {
    /// Only pages that sell Adderall.
    #[arg(long)]
    only_adderall: bool,
    /// Only full violations: Adderall sold, Visa accepted, not licensed.
    #[arg(long)]
    only_violations: bool,
    /// Show details for these items.
    #[arg(long = "expand", value_name = "ID")]
    expand: Vec<FlaggedItemId>,
    /// Write screenshots of the listed items as PNG files
    /// (to the data dir when no directory is given).
    #[arg(long, value_name = "DIR")]
    export_screenshots: Option<Option<PathBuf>>,
  },

  /// Interactive explorer: plain lines search, `:help` lists commands.
  Repl,

  /// Show the config file, writing defaults for missing sections.
  Config,
}

pub(crate) fn parse_edge(raw: &str) -> Result<(ArtistId, ArtistId), String> {
  let (source, target) = raw.split_once(':').ok_or_else(|| format!("expected SOURCE:TARGET, got `{raw}`"))?;
  let source = source.parse::<ArtistId>().map_err(|e| format!("source: {e}"))?;
  let target = target.parse::<ArtistId>().map_err(|e| format!("target: {e}"))?;
  Ok((source, target))
}
