//! Watch targets

use crate::error::WatchError;
use crate::identity::{resolve_identity, FolderId};
use std::path::{Path, PathBuf};

/// A folder confirmed to exist, with the identity it had when first seen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchTarget {
    path: PathBuf,
    identity: FolderId,
}

impl WatchTarget {
    /// Resolve a target for the folder currently at `path`
    ///
    /// The stored path is made absolute (lexically, without resolving
    /// symlinks) so it can be compared against paths reported by the OS.
    pub fn resolve(path: &Path) -> Result<Self, WatchError> {
        let identity = resolve_identity(path)?;
        let path = std::path::absolute(path).map_err(|e| WatchError::from_metadata(path, e))?;
        Ok(Self { path, identity })
    }

    /// Absolute path of the folder at resolution time
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Identity captured at resolution time
    pub fn identity(&self) -> &FolderId {
        &self.identity
    }
}
