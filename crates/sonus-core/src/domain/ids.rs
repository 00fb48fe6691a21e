use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Identificador de un artista tal como lo expone la API.
///
/// En los datos de origen es el `pageid` de Wikipedia, pero el núcleo lo
/// trata como un valor opaco: solo se compara por igualdad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtistId(u64);

impl ArtistId {
  pub fn new(raw: u64) -> Self {
    ArtistId(raw)
  }

  /// Devuelve el valor numérico interno.
  pub fn get(&self) -> u64 {
    self.0
  }
}

impl From<u64> for ArtistId {
  fn from(raw: u64) -> Self {
    ArtistId(raw)
  }
}

impl From<ArtistId> for u64 {
  fn from(id: ArtistId) -> Self {
    id.0
  }
}

impl FromStr for ArtistId {
  type Err = ParseIntError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    s.trim().parse::<u64>().map(ArtistId)
  }
}

impl fmt::Display for ArtistId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}

/// Identificador de un registro marcado (página analizada).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlaggedItemId(i64);

impl FlaggedItemId {
  pub fn new(raw: i64) -> Self {
    FlaggedItemId(raw)
  }

  pub fn get(&self) -> i64 {
    self.0
  }
}

impl From<i64> for FlaggedItemId {
  fn from(raw: i64) -> Self {
    FlaggedItemId(raw)
  }
}

impl FromStr for FlaggedItemId {
  type Err = ParseIntError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    s.trim().parse::<i64>().map(FlaggedItemId)
  }
}

impl fmt::Display for FlaggedItemId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}
