use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::ids::FlaggedItemId;
use crate::errors::CoreError;

/// Página web analizada y marcada por posible infracción de políticas.
///
/// Los tres atributos booleanos vienen del análisis del backend; el núcleo
/// solo los combina para filtrar y etiquetar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlaggedItem {
  pub id: FlaggedItemId,
  pub url: String,
  #[serde(default)]
  pub title: String,
  pub is_adderall_sold: bool,
  pub appears_licensed_pharmacy: bool,
  pub uses_visa: bool,
  #[serde(default)]
  pub explanation: String,
  #[serde(default)]
  pub screenshot_path: String,
  #[serde(default)]
  pub screenshots: Vec<Screenshot>,
  pub analyzed_at: DateTime<Utc>,
}

impl FlaggedItem {
  /// Infracción completa: vende Adderall, acepta Visa y no parece farmacia con licencia.
  pub fn is_violation(&self) -> bool {
    self.is_adderall_sold && self.uses_visa && !self.appears_licensed_pharmacy
  }

  /// Etiquetas que se muestran junto al título, en orden fijo.
  pub fn badges(&self) -> Vec<Badge> {
    let mut badges = Vec::with_capacity(3);
    if self.is_adderall_sold {
      badges.push(Badge::Adderall);
    }
    if self.uses_visa {
      badges.push(Badge::Visa);
    }
    if !self.appears_licensed_pharmacy {
      badges.push(Badge::Unlicensed);
    }
    badges
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Badge {
  Adderall,
  Visa,
  Unlicensed,
}

impl fmt::Display for Badge {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let label = match self {
      Badge::Adderall => "Adderall",
      Badge::Visa => "Visa",
      Badge::Unlicensed => "Unlicensed",
    };
    f.write_str(label)
  }
}

/// Captura PNG codificada en base64, tal como llega de la API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Screenshot(String);

impl Screenshot {
  pub fn new(encoded: impl Into<String>) -> Self {
    Screenshot(encoded.into())
  }

  /// Forma `data:` lista para incrustar en HTML.
  pub fn data_uri(&self) -> String {
    format!("data:image/png;base64,{}", self.0)
  }

  /// Decodifica los bytes PNG.
  pub fn decode(&self) -> Result<Vec<u8>, CoreError> {
    STANDARD.decode(self.0.trim()).map_err(|e| CoreError::Screenshot(e.to_string()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn item(adderall: bool, licensed: bool, visa: bool) -> FlaggedItem {
    FlaggedItem {
      id: FlaggedItemId::new(1),
      url: "https://pharmacy.example".into(),
      title: "Example pharmacy".into(),
      is_adderall_sold: adderall,
      appears_licensed_pharmacy: licensed,
      uses_visa: visa,
      explanation: String::new(),
      screenshot_path: String::new(),
      screenshots: vec![],
      analyzed_at: Utc::now(),
    }
  }

  #[test]
  fn violation_requires_all_three_conditions() {
    assert!(item(true, false, true).is_violation());
    assert!(!item(true, true, true).is_violation());
    assert!(!item(true, false, false).is_violation());
    assert!(!item(false, false, true).is_violation());
  }

  #[test]
  fn badges_follow_flags() {
    assert_eq!(item(true, false, true).badges(), vec![Badge::Adderall, Badge::Visa, Badge::Unlicensed]);
    assert!(item(false, true, false).badges().is_empty());
  }

  #[test]
  fn screenshot_decodes_and_builds_data_uri() {
    let shot = Screenshot::new("iVBORw0K");
    assert_eq!(shot.decode().unwrap(), vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a]);
    assert_eq!(shot.data_uri(), "data:image/png;base64,iVBORw0K");
    assert!(Screenshot::new("not base64!").decode().is_err());
  }

  #[test]
  fn deserializes_api_payload() {
    let json = r#"{
      "id": 12,
      "url": "https://rx.example/buy",
      "title": "Buy now",
      "is_adderall_sold": true,
      "appears_licensed_pharmacy": false,
      "uses_visa": true,
      "explanation": "Sells without prescription.",
      "screenshot_path": "",
      "screenshots": ["iVBORw0K"],
      "analyzed_at": "2025-11-02T10:15:00+01:00"
    }"#;

    let item: FlaggedItem = serde_json::from_str(json).unwrap();
    assert_eq!(item.id, FlaggedItemId::new(12));
    assert!(item.is_violation());
    assert_eq!(item.screenshots.len(), 1);
    assert_eq!(item.analyzed_at.to_rfc3339(), "2025-11-02T09:15:00+00:00");
  }
}
