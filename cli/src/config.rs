use serde::{Deserialize, Serialize};
use sonus_config::{CONFIG_BACKEND, ConfigError};
use sonus_core::domain::{EdgePolicy, RelationKind};
use sonus_core::services::ExplorationSettings;

/// Sección `[explorer]` de sonus.toml.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplorerConfig {
  /// Relation kinds requested when expanding a node.
  #[serde(default = "default_relations")]
  pub relations: Vec<RelationKind>,

  /// Skip edges whose (source, target) pair is already in the graph.
  #[serde(default)]
  pub dedupe_edges: bool,
}

fn default_relations() -> Vec<RelationKind> {
  vec![RelationKind::Wikipedia]
}

impl Default for ExplorerConfig {
  fn default() -> Self {
    Self { relations: default_relations(), dedupe_edges: false }
  }
}

impl ExplorerConfig {
  pub fn load() -> Result<Self, ConfigError> {
    CONFIG_BACKEND.load_or_init("explorer")
  }
}

impl From<ExplorerConfig> for ExplorationSettings {
  fn from(cfg: ExplorerConfig) -> Self {
    ExplorationSettings {
      relation_kinds: cfg.relations,
      edge_policy: if cfg.dedupe_edges { EdgePolicy::Deduplicate } else { EdgePolicy::KeepDuplicates },
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_match_exploration_defaults() {
    assert_eq!(ExplorationSettings::from(ExplorerConfig::default()), ExplorationSettings::default());
  }

  #[test]
  fn dedupe_flag_selects_policy() {
    let cfg = ExplorerConfig { relations: vec![RelationKind::Inspired], dedupe_edges: true };
    let settings = ExplorationSettings::from(cfg);
    assert_eq!(settings.edge_policy, EdgePolicy::Deduplicate);
    assert_eq!(settings.relation_kinds, vec![RelationKind::Inspired]);
  }
}
