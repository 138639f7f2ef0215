//! Error types for the watch lifecycle

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised below the supervisor loop
///
/// None of these terminate the process. The supervisor turns each of them
/// into a retry decision.
#[derive(Error, Debug)]
pub enum WatchError {
    /// The path disappeared between the existence check and the metadata read
    #[error("folder not found: {path}")]
    PathNotFound { path: PathBuf },

    /// Metadata could not be read for a reason other than absence
    #[error("failed to read metadata for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The heartbeat loop failed while probing the watched folder
    #[error("unexpected monitoring failure for {path}: {source}")]
    Monitoring {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl WatchError {
    /// Build an error from a metadata read, mapping `NotFound` to `PathNotFound`
    pub fn from_metadata(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::PathNotFound { path }
        } else {
            Self::Io { path, source: err }
        }
    }

    /// Whether the failure is the expected vanish-before-read race
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::PathNotFound { .. })
    }
}
