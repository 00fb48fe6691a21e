use serde::{Deserialize, Serialize};

use crate::{CONFIG_BACKEND, ConfigError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
  #[default]
  Pretty,
  Compact,
  Json,
}

/// Sección `[logging]` de sonus.toml.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
  /// Directiva de `EnvFilter` (p. ej. `info` o `sonus_core=debug`).
  /// `RUST_LOG` tiene prioridad si está definida.
  #[serde(default = "default_filter")]
  pub filter: String,

  #[serde(default)]
  pub format: LogFormat,

  /// Colores ANSI en stderr.
  #[serde(default = "default_ansi")]
  pub ansi: bool,
}

fn default_filter() -> String {
  "info".into()
}

fn default_ansi() -> bool {
  true
}

impl Default for LoggingConfig {
  fn default() -> Self {
    Self { filter: default_filter(), format: LogFormat::default(), ansi: default_ansi() }
  }
}

impl LoggingConfig {
  pub fn load() -> Result<Self, ConfigError> {
    CONFIG_BACKEND.load_or_init("logging")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn partial_section_fills_defaults() {
    let cfg: LoggingConfig = toml::from_str("format = \"json\"").unwrap();
    assert_eq!(cfg.format, LogFormat::Json);
    assert_eq!(cfg.filter, "info");
    assert!(cfg.ansi);
  }
}
