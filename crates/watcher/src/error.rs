//! Errors raised while setting up a folder subscription

use std::path::PathBuf;
use thiserror::Error;

/// Failure to start an [`EventWatcher`](crate::EventWatcher)
#[derive(Error, Debug)]
pub enum WatcherError {
    /// The notification backend refused the subscription
    #[error("failed to watch {path}: {source}")]
    Subscribe {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },

    /// The path could not be made absolute
    #[error("invalid watch path {path}: {source}")]
    InvalidPath {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The dispatch thread could not be spawned
    #[error("failed to spawn event dispatch thread: {0}")]
    Spawn(#[source] std::io::Error),
}
