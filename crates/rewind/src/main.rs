mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use rewind_config::AppConfig;
use rewind_history::{HistoryConfig, PersistenceLayer};

use crate::commands::Command;

/// Snapshot-based undo/redo history for text buffers, kept per document.
#[derive(Parser, Debug)]
#[command(name = "rewind", version, about)]
struct Cli {
    /// Document whose history is read and updated.
    #[arg(long, global = true, default_value = "scratch")]
    doc: String,

    /// Config file. Defaults to `rewind.json` next to the executable.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the history database. Overrides the config file.
    #[arg(long = "data-dir", global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging on stderr so stdout carries only command output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.unwrap_or_else(AppConfig::config_path);
    let app_config = AppConfig::load_or_create(&config_path);
    let data_dir = cli
        .data_dir
        .unwrap_or_else(|| app_config.resolve_data_dir());
    tracing::info!("Starting rewind for {} in {}", cli.doc, data_dir.display());

    let layer = PersistenceLayer::open(&data_dir)?;
    let now_ms = chrono::Utc::now().timestamp_millis();
    let output = commands::execute(
        &cli.command,
        &cli.doc,
        HistoryConfig::from(&app_config),
        &layer,
        now_ms,
    )?;
    println!("{output}");

    Ok(())
}
