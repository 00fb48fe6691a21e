use anyhow::anyhow;
use sonus_config::{LogFormat, LoggingConfig};
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Logs go to stderr so stdout stays clean
/// for command output.
///
/// Filter precedence: `RUST_LOG`, then `-v`/`-vv`, then `[logging] filter`.
pub fn init(config: &LoggingConfig, verbose: u8) -> anyhow::Result<()> {
  let filter = match EnvFilter::try_from_default_env() {
    Ok(filter) => filter,
    Err(_) => EnvFilter::try_new(directive(config, verbose))?,
  };

  let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).with_ansi(config.ansi);

  let installed = match config.format {
    LogFormat::Pretty => builder.pretty().try_init(),
    LogFormat::Compact => builder.compact().try_init(),
    LogFormat::Json => builder.json().try_init(),
  };
  installed.map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))
}

fn directive(config: &LoggingConfig, verbose: u8) -> &str {
  match verbose {
    0 => &config.filter,
    1 => "debug",
    _ => "trace",
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn verbosity_overrides_configured_filter() {
    let config = LoggingConfig { filter: "sonus_core=debug,warn".into(), ..Default::default() };
    assert_eq!(directive(&config, 0), "sonus_core=debug,warn");
    assert_eq!(directive(&config, 1), "debug");
    assert_eq!(directive(&config, 3), "trace");
  }
}
