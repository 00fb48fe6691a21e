/// Fallo de una llamada a la API externa.
///
/// Es el único tipo de error que los servicios esperan de los ports; se
/// registra y se trata como "sin resultado" para la petición afectada.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
  #[error("transport error: {0}")]
  Transport(String),

  #[error("unexpected status {status} from {url}")]
  Status { status: u16, url: String },

  #[error("decode error: {0}")]
  Decode(String),

  #[error("internal error: {0}")]
  Internal(String),
}
