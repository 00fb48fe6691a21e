use std::path::{Path, PathBuf};

use futures::future::try_join_all;
use sonus_core::CoreError;
use sonus_core::domain::{FlaggedItem, FlaggedItemId};
use tokio::fs;
use tokio::io::AsyncWriteExt;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("screenshot {index} of item {item}: {source}")]
  Decode {
    item: FlaggedItemId,
    index: usize,
    #[source]
    source: CoreError,
  },
}

/// `item-<id>-<n>.png`, con `n` empezando en 1 como en la vista.
pub fn screenshot_file_name(item: FlaggedItemId, index: usize) -> String {
  format!("item-{item}-{}.png", index + 1)
}

/// Decodifica y escribe todas las capturas de `item` en `dir`.
///
/// Se decodifican todas antes de escribir nada: una captura corrupta no deja
/// el directorio a medias. Devuelve las rutas en el orden de las capturas.
pub async fn export_screenshots(dir: &Path, item: &FlaggedItem) -> Result<Vec<PathBuf>, ExportError> {
  let decoded = item
    .screenshots
    .iter()
    .enumerate()
    .map(|(index, shot)| {
      shot.decode().map(|bytes| (index, bytes)).map_err(|source| ExportError::Decode { item: item.id, index, source })
    })
    .collect::<Result<Vec<_>, _>>()?;

  if decoded.is_empty() {
    return Ok(Vec::new());
  }

  fs::create_dir_all(dir).await?;

  let writes = decoded.into_iter().map(|(index, bytes)| {
    let path = dir.join(screenshot_file_name(item.id, index));
    async move {
      let mut file = fs::File::create(&path).await?;
      file.write_all(&bytes).await?;
      file.sync_all().await?;
      Ok::<_, ExportError>(path)
    }
  });

  let paths = try_join_all(writes).await?;
  tracing::debug!(item = %item.id, count = paths.len(), dir = %dir.display(), "screenshots exported");
  Ok(paths)
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Utc;
  use sonus_core::domain::Screenshot;
  use tempfile::tempdir;

  fn item_with(shots: Vec<Screenshot>) -> FlaggedItem {
    FlaggedItem {
      id: FlaggedItemId::new(4),
      url: "https://rx.example".into(),
      title: String::new(),
      is_adderall_sold: true,
      appears_licensed_pharmacy: false,
      uses_visa: true,
      explanation: String::new(),
      screenshot_path: String::new(),
      screenshots: shots,
      analyzed_at: Utc::now(),
    }
  }

  #[tokio::test]
  async fn writes_one_png_per_screenshot() {
    let tmp = tempdir().unwrap();
    let dir = tmp.path().join("shots");
    let item = item_with(vec![Screenshot::new("iVBORw0K"), Screenshot::new("AAEC")]);

    let paths = export_screenshots(&dir, &item).await.unwrap();

    assert_eq!(paths, vec![dir.join("item-4-1.png"), dir.join("item-4-2.png")]);
    assert_eq!(std::fs::read(&paths[0]).unwrap(), vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a]);
    assert_eq!(std::fs::read(&paths[1]).unwrap(), vec![0, 1, 2]);
  }

  #[tokio::test]
  async fn corrupt_screenshot_writes_nothing() {
    let tmp = tempdir().unwrap();
    let dir = tmp.path().join("shots");
    let item = item_with(vec![Screenshot::new("iVBORw0K"), Screenshot::new("%%%")]);

    let err = export_screenshots(&dir, &item).await.unwrap_err();

    assert!(matches!(err, ExportError::Decode { index: 1, .. }));
    assert!(!dir.exists());
  }

  #[tokio::test]
  async fn no_screenshots_no_directory() {
    let tmp = tempdir().unwrap();
    let dir = tmp.path().join("shots");

    assert!(export_screenshots(&dir, &item_with(vec![])).await.unwrap().is_empty());
    assert!(!dir.exists());
  }
}
