use std::fs;
use std::io::{self, Write};
use std::path::Path;

pub fn atomic_write_str(path: &Path, contents: &str) -> io::Result<()> {
  atomic_write_bytes(path, contents.as_bytes())
}

/// Escribe en `<path>.tmp` y renombra, para no dejar archivos a medias.
pub fn atomic_write_bytes(path: &Path, contents: &[u8]) -> io::Result<()> {
  let tmp_path = path.with_extension("tmp");

  {
    let mut tmp_file = fs::File::create(&tmp_path)?;
    tmp_file.write_all(contents)?;
    tmp_file.sync_all()?;
  }

  fs::rename(&tmp_path, path)?;
  Ok(())
}
