use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Variable de entorno que fuerza un directorio base (modo portable / tests).
pub const BASE_DIR_ENV: &str = "SONUS_BASE_DIR";

const CONFIG_FILE: &str = "sonus.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
  #[error("toml error: {0}")]
  Toml(#[from] toml::de::Error),
  #[error("directories error: could not determine home directory")]
  Directories,
  #[error("other: {0}")]
  Other(String),
}

/// Directorios de sonus. Se crean al construirse.
///
/// Con `SONUS_BASE_DIR` todo cuelga de esa carpeta (`config/`, `data/`);
/// sin ella se usan los directorios de la plataforma.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SonusPaths {
  pub config_dir: PathBuf,
  pub data_dir: PathBuf,
}

impl SonusPaths {
  pub fn new() -> Result<Self, ConfigError> {
    match std::env::var_os(BASE_DIR_ENV) {
      Some(base) if !base.is_empty() => Self::rooted(base),
      _ => {
        let dirs = ProjectDirs::from("com", "sonus", "sonus").ok_or(ConfigError::Directories)?;
        Self::create(dirs.config_dir(), dirs.data_dir())
      }
    }
  }

  /// Todo bajo un mismo directorio, sin mirar el entorno.
  pub fn rooted(base: impl Into<PathBuf>) -> Result<Self, ConfigError> {
    let base = base.into();
    Self::create(&base.join("config"), &base.join("data"))
  }

  fn create(config_dir: &Path, data_dir: &Path) -> Result<Self, ConfigError> {
    for dir in [config_dir, data_dir] {
      std::fs::create_dir_all(dir)?;
    }
    Ok(Self { config_dir: config_dir.to_path_buf(), data_dir: data_dir.to_path_buf() })
  }

  pub fn detect() -> Result<Self, ConfigError> {
    Self::new()
  }

  pub fn config_file(&self) -> PathBuf {
    self.config_dir.join(CONFIG_FILE)
  }

  /// Destino por defecto de las capturas exportadas. No se crea hasta exportar.
  pub fn screenshots_dir(&self) -> PathBuf {
    self.data_dir.join("screenshots")
  }
}
