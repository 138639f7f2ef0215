//! Log output setup
//!
//! Lines look like:
//! `2024-01-03 14:30:00,123 [INFO] [Thread ID: 7] [INFO] Monitoring folder ...`
//! The second level tag is coloured when the sink supports ANSI escapes.
//!
//! tracing has no level above ERROR. Events logged at ERROR with
//! [`CRITICAL_TARGET`] as their target are tagged `CRITICAL` instead.

use anyhow::{Context, Result};
use chrono::Local;
use clap::ValueEnum;
use dirwatch_core::CRITICAL_TARGET;
use owo_colors::OwoColorize;
use std::fmt;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::{Event, Level, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// When to colour level names on stderr
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Colour when stderr is a terminal
    Auto,
    Always,
    Never,
}

impl ColorMode {
    fn enabled(self) -> bool {
        match self {
            Self::Auto => std::io::stderr().is_terminal(),
            Self::Always => true,
            Self::Never => false,
        }
    }
}

/// Logging options
#[derive(Debug, Clone)]
pub struct LogOptions {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
    pub color: ColorMode,
    /// Optional file receiving uncoloured copies of every line
    pub file: Option<PathBuf>,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            color: ColorMode::Auto,
            file: None,
        }
    }
}

/// Line format shared by the stderr and file sinks
#[derive(Debug, Clone, Copy, Default)]
pub struct FolderLogFormat;

impl<S, N> FormatEvent<S, N> for FolderLogFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let severity = Severity::of(event);

        write!(
            writer,
            "{} [{}] [Thread ID: {}] ",
            Local::now().format(TIMESTAMP_FORMAT),
            severity,
            thread_label()
        )?;

        if writer.has_ansi_escapes() {
            write!(writer, "[{}] ", severity.paint())?;
        } else {
            write!(writer, "[{}] ", severity)?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Level as printed in a log line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Severity {
    Critical,
    Level(Level),
}

impl Severity {
    fn of(event: &Event<'_>) -> Self {
        let metadata = event.metadata();
        if *metadata.level() == Level::ERROR && metadata.target() == CRITICAL_TARGET {
            Self::Critical
        } else {
            Self::Level(*metadata.level())
        }
    }

    fn paint(self) -> String {
        let name = self.to_string();
        match self {
            Self::Critical => name.red().bold().to_string(),
            Self::Level(Level::ERROR) => name.red().to_string(),
            Self::Level(Level::WARN) => name.yellow().to_string(),
            Self::Level(Level::INFO) => name.green().to_string(),
            Self::Level(_) => name.dimmed().to_string(),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Critical => f.write_str("CRITICAL"),
            Self::Level(level) => write!(f, "{}", level),
        }
    }
}

/// Numeric part of the current thread id
fn thread_label() -> String {
    let raw = format!("{:?}", std::thread::current().id());
    raw.trim_start_matches("ThreadId(")
        .trim_end_matches(')')
        .to_string()
}

/// Install the global subscriber
///
/// Returns the file writer guard when a log file is configured; keep it alive
/// until exit so buffered lines get flushed.
pub fn init(options: &LogOptions) -> Result<Option<WorkerGuard>> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&options.level)
            .with_context(|| format!("Invalid log level: {}", options.level))?,
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .event_format(FolderLogFormat)
        .with_writer(std::io::stderr)
        .with_ansi(options.color.enabled());

    let (file_layer, guard) = match &options.file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            let file_name = path
                .file_name()
                .with_context(|| format!("Log file has no file name: {}", path.display()))?;

            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

            let appender = tracing_appender::rolling::never(&dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .event_format(FolderLogFormat)
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install logger")?;

    Ok(guard)
}
