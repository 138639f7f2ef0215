//! dirwatch - watch one folder through its whole lifecycle

use anyhow::{Context, Result};
use clap::Parser;
use cli_lib::logging::{self, ColorMode, LogOptions};
use cli_lib::{Settings, Supervisor};
use dirwatch_core::DEFAULT_MARKER;
use std::path::PathBuf;
use tracing::info;

/// dirwatch - wait for a folder, watch it, start over when it goes away
#[derive(Parser)]
#[command(name = "dirwatch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Folder to watch (default: $MONITORED_FOLDER or ./watched_folder)
    #[arg(long)]
    folder: Option<PathBuf>,

    /// Heartbeat period in seconds (default: $PERIODICITY or 5)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    periodicity: Option<u64>,

    /// Report created/deleted files whose name contains this marker
    #[arg(long, default_value = DEFAULT_MARKER)]
    marker: String,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Colour level names
    #[arg(long, value_enum, default_value_t = ColorMode::Auto)]
    color: ColorMode,

    /// Also append log lines to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = logging::init(&LogOptions {
        level: cli.log_level,
        color: cli.color,
        file: cli.log_file,
    })?;

    let settings = Settings::from_env()
        .with_folder(cli.folder)
        .with_period_secs(cli.periodicity)
        .with_marker(cli.marker);
    let supervisor = Supervisor::new(settings);

    tokio::select! {
        never = supervisor.run() => match never {},
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl-C")?;
            info!("Monitoring terminated by user.");
        }
    }

    Ok(())
}
