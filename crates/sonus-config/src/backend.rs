use crate::paths::{ConfigError, SonusPaths};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

// toml_edit para escribir preservando comentarios
use toml_edit::{DocumentMut, Item};

pub trait ConfigBackend {
  fn load_section<T: DeserializeOwned>(&self, section: &str) -> Result<T, ConfigError>;
  fn save_section<T: Serialize>(&self, section: &str, value: &T) -> Result<(), ConfigError>;
}

pub struct TomlConfigBackend {
  paths: SonusPaths,
}

impl TomlConfigBackend {
  pub fn new(paths: SonusPaths) -> Self {
    Self { paths }
  }

  pub fn config_file(&self) -> PathBuf {
    self.paths.config_file()
  }

  /// Carga `[section]`; si falta el archivo o la sección devuelve `T::default()`.
  pub fn load_section_with_default<T>(&self, section: &str) -> Result<T, ConfigError>
  where
    T: DeserializeOwned + Default,
  {
    let path = self.paths.config_file();
    let content = match fs::read_to_string(&path) {
      Ok(c) => c,
      Err(e) if e.kind() == ErrorKind::NotFound => {
        return Ok(T::default());
      }
      Err(e) => return Err(e.into()),
    };

    let toml_val: toml::Value = toml::from_str(&content)?;

    let Some(table) = toml_val.get(section) else {
      return Ok(T::default());
    };

    decode_section(section, table)
  }

  /// Como `load_section_with_default`, pero deja escrita la sección resultante
  /// para que el usuario vea los valores por defecto en el archivo.
  pub fn load_or_init<T>(&self, section: &str) -> Result<T, ConfigError>
  where
    T: DeserializeOwned + Serialize + Default,
  {
    let value: T = self.load_section_with_default(section)?;
    self.save_section(section, &value)?;
    Ok(value)
  }
}

fn decode_section<T: DeserializeOwned>(section: &str, table: &toml::Value) -> Result<T, ConfigError> {
  table.clone().try_into().map_err(|e| ConfigError::Other(format!("decode section [{section}]: {e}")))
}

impl ConfigBackend for TomlConfigBackend {
  fn load_section<T: DeserializeOwned>(&self, section: &str) -> Result<T, ConfigError> {
    let path = self.paths.config_file();
    let content = fs::read_to_string(&path)?;
    let toml_val: toml::Value = toml::from_str(&content)?;

    let table = toml_val
      .get(section)
      .ok_or_else(|| ConfigError::Other(format!("missing section [{section}] in {:?}", path)))?;

    decode_section(section, table)
  }

  fn save_section<T: Serialize>(&self, section: &str, value: &T) -> Result<(), ConfigError> {
    let path = self.paths.config_file();

    // 1) Leer config actual como DocumentMut o crear doc vacío si no existe.
    let mut doc: DocumentMut = match fs::read_to_string(&path) {
      Ok(content) => content
        .parse::<DocumentMut>()
        .map_err(|e| ConfigError::Other(format!("parse toml_edit doc: {e}")))?,
      Err(e) if e.kind() == ErrorKind::NotFound => DocumentMut::new(),
      Err(e) => return Err(e.into()),
    };

    // 2) Serializar la sección con `toml` (serde) y volver a parsearla como tabla.
    let section_str = toml::to_string(value)
      .map_err(|e| ConfigError::Other(format!("encode section [{section}]: {e}")))?;

    let section_item = Item::Table(
      section_str
        .parse::<DocumentMut>()
        .map_err(|e| ConfigError::Other(format!("parse section as doc: {e}")))?
        .into_table(),
    );

    // 3) Reemplazar solo esa sección; el resto del documento queda intacto.
    doc[section] = section_item;

    // 4) Escritura atómica.
    sonus_fs::atomic_write_str(&path, &doc.to_string())?;

    Ok(())
  }
}
