pub mod export;
pub mod io;

pub use export::{ExportError, export_screenshots, screenshot_file_name};
pub use io::{atomic_write_bytes, atomic_write_str};
