//! Folder identity from creation time
//!
//! Two incarnations of the same path (deleted, then recreated) get different
//! ids as long as they were created in different seconds. The id is only used
//! to correlate log lines, never compared against the OS.

use crate::error::WatchError;
use std::fmt;
use std::fs::Metadata;
use std::path::Path;
use std::time::UNIX_EPOCH;

/// Identifier of one folder incarnation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FolderId(String);

impl FolderId {
    /// Build an id from whole seconds since the Unix epoch
    pub fn from_secs(secs: i64) -> Self {
        Self(secs.to_string())
    }

    /// Get the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolve the identity of the folder currently at `path`
///
/// Returns `WatchError::PathNotFound` when the folder vanished after the
/// caller saw it exist.
pub fn resolve_identity(path: &Path) -> Result<FolderId, WatchError> {
    let metadata = std::fs::metadata(path).map_err(|e| WatchError::from_metadata(path, e))?;
    Ok(FolderId::from_secs(creation_secs(&metadata)))
}

/// Creation time in whole seconds, truncated toward zero
///
/// Uses the birth time when the platform reports it and falls back to the
/// inode change time on Unix.
fn creation_secs(metadata: &Metadata) -> i64 {
    if let Ok(created) = metadata.created() {
        return match created.duration_since(UNIX_EPOCH) {
            Ok(since) => since.as_secs() as i64,
            Err(before) => -(before.duration().as_secs() as i64),
        };
    }

    fallback_secs(metadata)
}

#[cfg(unix)]
fn fallback_secs(metadata: &Metadata) -> i64 {
    use std::os::unix::fs::MetadataExt;
    metadata.ctime()
}

#[cfg(not(unix))]
fn fallback_secs(metadata: &Metadata) -> i64 {
    metadata
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
