use crate::domain::FlaggedItem;
use crate::ports::ApiError;

/// Port que lista las páginas marcadas por el análisis de políticas.
#[async_trait::async_trait]
pub trait FlaggedItemFeed: Send + Sync {
  async fn list_flagged(&self) -> Result<Vec<FlaggedItem>, ApiError>;
}
