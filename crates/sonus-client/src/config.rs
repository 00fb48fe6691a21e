use serde::{Deserialize, Serialize};
use sonus_config::{CONFIG_BACKEND, ConfigBackend, ConfigError};

/// Sección `[api]` de sonus.toml.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
  /// Raíz de la API, sin barra final (p. ej. `http://localhost:8000/api`).
  #[serde(default = "default_base_url")]
  pub base_url: String,

  /// Tiempo máximo por petición, en segundos.
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

fn default_base_url() -> String {
  "http://localhost:8000/api".into()
}

fn default_timeout_secs() -> u64 {
  10
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self { base_url: default_base_url(), timeout_secs: default_timeout_secs() }
  }
}

impl ApiConfig {
  pub fn load() -> Result<Self, ConfigError> {
    CONFIG_BACKEND.load_or_init("api")
  }

  /// Variante para tests: inyectar un backend distinto.
  pub fn load_from<B: ConfigBackend>(backend: &B) -> Result<Self, ConfigError> {
    backend.load_section("api")
  }

  pub fn save(&self) -> Result<(), ConfigError> {
    CONFIG_BACKEND.save_section("api", self)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use sonus_config::{SonusPaths, TomlConfigBackend};
  use tempfile::tempdir;

  #[test]
  fn reads_section_from_injected_backend() {
    let tmp = tempdir().unwrap();
    let backend = TomlConfigBackend::new(SonusPaths::rooted(tmp.path()).unwrap());
    std::fs::write(backend.config_file(), "[api]\nbase_url = \"https://sonus.example/api\"\n").unwrap();

    let cfg = ApiConfig::load_from(&backend).unwrap();

    assert_eq!(cfg.base_url, "https://sonus.example/api");
    assert_eq!(cfg.timeout_secs, 10);
  }
}
