//! Classification of raw notify events

use notify::event::{ModifyKind, RenameMode};
use notify::EventKind;
use std::path::{Path, PathBuf};

/// Folder event after classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsEvent {
    /// Direct child created
    Created(PathBuf),
    /// Direct child deleted
    Deleted(PathBuf),
    /// Rename with both ends known
    Moved { from: PathBuf, to: PathBuf },
}

/// Classify a notify event for a watch on `watched`
///
/// The watcher also subscribes to the parent of `watched`, so create and
/// delete reports are narrowed to direct children of `watched`. Renames are
/// passed through regardless of location; deciding whether a rename concerns
/// the folder itself is the handler's job.
///
/// Half renames (`From` or `To` alone) are dropped. Backends that can pair
/// them also emit a `Both` event, which is the one we report.
pub fn classify(event: notify::Event, watched: &Path) -> Vec<FsEvent> {
    match event.kind {
        EventKind::Create(_) => event
            .paths
            .into_iter()
            .filter(|p| is_direct_child(p, watched))
            .map(FsEvent::Created)
            .collect(),
        EventKind::Remove(_) => event
            .paths
            .into_iter()
            .filter(|p| is_direct_child(p, watched))
            .map(FsEvent::Deleted)
            .collect(),
        EventKind::Modify(ModifyKind::Name(RenameMode::Both | RenameMode::Any))
            if event.paths.len() >= 2 =>
        {
            let mut paths = event.paths.into_iter();
            match (paths.next(), paths.next()) {
                (Some(from), Some(to)) => vec![FsEvent::Moved { from, to }],
                _ => Vec::new(),
            }
        }
        _ => Vec::new(),
    }
}

fn is_direct_child(path: &Path, watched: &Path) -> bool {
    path.parent() == Some(watched)
}
