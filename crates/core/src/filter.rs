//! Child name filtering for create and delete reporting

use std::path::Path;

/// Substring that marks a child as reportable
pub const DEFAULT_MARKER: &str = "content-banned";

/// Base-name substring filter
///
/// Only the final path component is inspected, so a marker appearing in a
/// parent directory name does not make every child reportable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameFilter {
    marker: String,
}

impl NameFilter {
    /// Create a filter for the given marker
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    /// The marker this filter looks for
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Check whether the base name of `path` contains the marker
    pub fn matches(&self, path: &Path) -> bool {
        path.file_name()
            .map(|name| name.to_string_lossy().contains(self.marker.as_str()))
            .unwrap_or(false)
    }
}

impl Default for NameFilter {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER)
    }
}
