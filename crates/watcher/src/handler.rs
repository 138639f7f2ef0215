//! Callback seam between the event watcher and its owner

use std::path::Path;

/// Receives classified events on the watcher's dispatch thread
///
/// Callbacks run concurrently with whatever owns the watcher, so
/// implementations must only touch shared state through synchronized cells.
pub trait EventHandler: Send + 'static {
    /// A direct child of the watched folder was created
    fn on_create(&self, path: &Path);

    /// A direct child of the watched folder was deleted
    fn on_delete(&self, path: &Path);

    /// Something was renamed from `from` to `to`
    ///
    /// This covers both children of the watched folder and the folder itself.
    fn on_move(&self, from: &Path, to: &Path);
}
