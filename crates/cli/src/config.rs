//! Runtime configuration
//!
//! Settings come from the environment and can be overridden by CLI flags.
//! The heartbeat period, unless pinned by a flag, is re-read from the
//! environment at the start of every session.

use dirwatch_core::{NameFilter, DEFAULT_MARKER};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Folder to watch
pub const FOLDER_VAR: &str = "MONITORED_FOLDER";
/// Heartbeat period in seconds
pub const PERIOD_VAR: &str = "PERIODICITY";

pub const DEFAULT_FOLDER: &str = "./watched_folder";
pub const DEFAULT_PERIOD_SECS: u64 = 5;

/// Rejected heartbeat period value
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PeriodError {
    #[error("not a whole number of seconds: {0:?}")]
    NotANumber(String),

    #[error("must be positive, got {0}")]
    NotPositive(i64),
}

/// Parse a heartbeat period given in whole seconds
pub fn parse_period(raw: &str) -> Result<Duration, PeriodError> {
    let secs: i64 = raw
        .trim()
        .parse()
        .map_err(|_| PeriodError::NotANumber(raw.to_string()))?;

    if secs <= 0 {
        return Err(PeriodError::NotPositive(secs));
    }

    Ok(Duration::from_secs(secs as u64))
}

/// Period from an optional raw value, falling back to the default
pub fn period_or_default(raw: Option<&str>) -> Duration {
    let default = Duration::from_secs(DEFAULT_PERIOD_SECS);

    match raw {
        None => default,
        Some(raw) => parse_period(raw).unwrap_or_else(|e| {
            warn!(
                "Invalid {} value ({}), using {}s",
                PERIOD_VAR, e, DEFAULT_PERIOD_SECS
            );
            default
        }),
    }
}

/// Where the heartbeat period comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodSource {
    /// Pinned for the lifetime of the process
    Fixed(Duration),
    /// Read from `PERIODICITY` each time it is resolved
    Env,
}

impl PeriodSource {
    /// Current period
    pub fn resolve(&self) -> Duration {
        match self {
            Self::Fixed(period) => *period,
            Self::Env => period_or_default(std::env::var(PERIOD_VAR).ok().as_deref()),
        }
    }
}

/// Everything the supervisor needs
#[derive(Debug, Clone)]
pub struct Settings {
    /// Configured folder (drives every existence wait)
    pub folder: PathBuf,
    /// Heartbeat period source
    pub period: PeriodSource,
    /// Create/delete reporting filter
    pub filter: NameFilter,
}

impl Settings {
    /// Settings from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Settings from an arbitrary variable lookup
    ///
    /// An empty `MONITORED_FOLDER` counts as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let folder = lookup(FOLDER_VAR)
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_FOLDER.to_string());

        Self {
            folder: PathBuf::from(folder),
            period: PeriodSource::Env,
            filter: NameFilter::new(DEFAULT_MARKER),
        }
    }

    /// Override the folder
    pub fn with_folder(mut self, folder: Option<PathBuf>) -> Self {
        if let Some(folder) = folder {
            self.folder = folder;
        }
        self
    }

    /// Pin the period to a number of seconds
    pub fn with_period_secs(mut self, secs: Option<u64>) -> Self {
        if let Some(secs) = secs.filter(|s| *s > 0) {
            self.period = PeriodSource::Fixed(Duration::from_secs(secs));
        }
        self
    }

    /// Replace the create/delete marker
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.filter = NameFilter::new(marker);
        self
    }
}
