// crates/sonus-core/src/errors.rs
use thiserror::Error;

use crate::ports::ApiError;

/// Error genérico del núcleo de Sonus.
///
/// Las capas superiores (CLI, etc.) deberían mapear este error
/// a mensajes de usuario o logs.
#[derive(Debug, Error)]
pub enum CoreError {
  #[error("api error: {0}")]
  Api(#[from] ApiError),

  #[error("screenshot decode error: {0}")]
  Screenshot(String),

  #[error("not found")]
  NotFound,
}
