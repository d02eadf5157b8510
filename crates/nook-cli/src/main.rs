//! `nook`: command-line front end for the Nook reading library.
//!
//! Reads `nook.toml` (or the path given with `--config`), opens the local
//! SQLite library, and runs one subcommand against it.
//!
//! ```
//! nook browse
//! nook more "World History" --pages 2
//! nook save zyTCAlFPjgYC
//! nook progress zyTCAlFPjgYC 120
//! ```

mod commands;
mod render;
mod settings;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use commands::Command;
use nook_core::library::Library;
use nook_store_sqlite::SqliteLibrary;
use settings::{Settings, expand_tilde};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "nook", author, version, about = "Browse books and track your reading")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, env = "NOOK_CONFIG", default_value = "nook.toml")]
  config: PathBuf,

  /// Library database; overrides `store_path` from the config.
  #[arg(long, global = true, value_name = "FILE")]
  store: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Logs go to stderr so `list --json` stays machine-readable.
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let mut settings = Settings::load(&cli.config)?;
  if let Some(store) = &cli.store {
    settings.store_path = expand_tilde(store);
  }

  if let Some(parent) = settings.store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {}", parent.display()))?;
  }

  let store_path = &settings.store_path;
  let store = SqliteLibrary::open(store_path)
    .await
    .with_context(|| format!("failed to open library at {store_path:?}"))?;

  let library = Library::new(Arc::new(store));
  library.reset_streak_if_needed().await;

  commands::run(cli.command, &settings, &library).await
}
