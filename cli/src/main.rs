use clap::Parser;
use sonus_cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();
  sonus_cli::init_logging(cli.verbose)?;
  sonus_cli::run(cli).await
}
