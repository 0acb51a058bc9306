mod api;
mod app;
mod config;
mod event;
mod feed;
mod logging;
mod operation;
mod ui;

use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;
use tracing::info;

use crate::config::SourceConfig;

#[derive(Parser, Debug)]
#[command(name = "spendview")]
#[command(about = "A terminal UI for browsing and filtering card transactions")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/spendview/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Serve transactions from this JSON dataset instead of the configured source
  #[arg(long, conflicts_with = "url")]
  fixture: Option<PathBuf>,

  /// Fetch transactions from this API base url instead of the configured source
  #[arg(long)]
  url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  let mut config = config::Config::load(args.config.as_deref())?;

  // Command line source overrides the config file
  if let Some(path) = args.fixture {
    let (page_size, latency_ms) = match config.source {
      SourceConfig::Fixture {
        page_size,
        latency_ms,
        ..
      } => (page_size, latency_ms),
      SourceConfig::Http { .. } => (api::fixture::DEFAULT_PAGE_SIZE, 0),
    };
    config.source = SourceConfig::Fixture {
      path: Some(path),
      page_size,
      latency_ms,
    };
  } else if let Some(url) = args.url {
    let timeout_secs = match config.source {
      SourceConfig::Http { timeout_secs, .. } => timeout_secs,
      SourceConfig::Fixture { .. } => 30,
    };
    config.source = SourceConfig::Http { url, timeout_secs };
  }

  let _log_guard = logging::init(&config.log)?;
  info!(source = ?config.source, "starting spendview");

  let backend = api::Backend::connect(&config.source)?;

  let mut app = app::App::new(&config, backend);
  app.run().await?;

  Ok(())
}
