mod backend;
mod model;
mod paths;

pub use backend::{ConfigBackend, TomlConfigBackend};
pub use model::{LogFormat, LoggingConfig};
pub use paths::{BASE_DIR_ENV, ConfigError, SonusPaths};

use once_cell::sync::Lazy;

// Singleton de paths (portable / system)
pub static PATHS: Lazy<SonusPaths> = Lazy::new(|| SonusPaths::detect().expect("failed to init SonusPaths"));

// Singleton del backend de config
pub static CONFIG_BACKEND: Lazy<TomlConfigBackend> = Lazy::new(|| TomlConfigBackend::new(PATHS.clone()));
