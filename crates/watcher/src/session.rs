//! Watch session: heartbeat loop plus rename/delete detection
//!
//! One session covers one incarnation of the watched folder. Two activities
//! run side by side:
//! - the heartbeat loop (this task), which logs status every period while
//!   the tracked path exists
//! - the event watcher's dispatch thread, which reports marked children and
//!   detects a rename of the folder itself
//!
//! They share a [`SessionCell`]. Only the move handler writes to it.

use crate::handler::EventHandler;
use crate::watcher::EventWatcher;
use dirwatch_core::{
    FolderId, NameFilter, SessionCell, SessionState, WatchError, WatchTarget, CRITICAL_TARGET,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// How a session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The folder stopped existing
    Deleted,
    /// The folder itself was renamed
    Renamed { to: PathBuf },
    /// The subscription or the heartbeat failed
    Failed,
}

/// One watch session over a resolved target
pub struct WatchSession {
    target: WatchTarget,
    period: Duration,
    filter: NameFilter,
    cell: Arc<SessionCell>,
}

impl WatchSession {
    /// Create a session logging a heartbeat every `period`
    pub fn new(target: WatchTarget, period: Duration) -> Self {
        let cell = Arc::new(SessionCell::new(target.path().to_path_buf()));
        Self {
            target,
            period,
            filter: NameFilter::default(),
            cell,
        }
    }

    /// Use a different filter for create/delete reporting
    pub fn with_filter(mut self, filter: NameFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Shared state of this session
    pub fn cell(&self) -> Arc<SessionCell> {
        Arc::clone(&self.cell)
    }

    /// Run the session to completion
    ///
    /// Never returns an error: failures are logged and reported as
    /// [`SessionOutcome::Failed`]. The event watcher is released and the
    /// termination line logged before this returns, and also if the future is
    /// dropped early or the heartbeat panics.
    pub async fn run(self) -> SessionOutcome {
        let termination = Termination {
            cell: Arc::clone(&self.cell),
            identity: self.target.identity().clone(),
        };

        let handler = SessionHandler {
            cell: Arc::clone(&self.cell),
            filter: self.filter.clone(),
        };

        let failed = match EventWatcher::start(self.target.path(), handler) {
            Ok(watcher) => {
                let result = self.heartbeat().await;
                release(watcher).await;

                match result {
                    Ok(()) => false,
                    Err(e) => {
                        error!(
                            target: CRITICAL_TARGET,
                            "Error monitoring folder {}: {}",
                            self.cell.path().display(),
                            e
                        );
                        true
                    }
                }
            }
            Err(e) => {
                error!(
                    target: CRITICAL_TARGET,
                    "Error monitoring folder {}: {}",
                    self.cell.path().display(),
                    e
                );
                true
            }
        };

        // Read before terminating: a rename dispatched while stopping still counts
        let outcome = match self.cell.state() {
            SessionState::Renamed => SessionOutcome::Renamed {
                to: self.cell.path(),
            },
            _ if failed => SessionOutcome::Failed,
            _ => SessionOutcome::Deleted,
        };
        drop(termination);

        outcome
    }

    /// Log status every period until the folder is gone or renamed
    async fn heartbeat(&self) -> Result<(), WatchError> {
        while self.cell.is_active() {
            let path = self.cell.path();
            let exists = tokio::fs::try_exists(&path)
                .await
                .map_err(|source| WatchError::Monitoring {
                    path: path.clone(),
                    source,
                })?;

            if !exists {
                break;
            }

            info!(
                "Monitoring folder {} (ID: {})",
                path.display(),
                self.target.identity()
            );

            tokio::select! {
                _ = tokio::time::sleep(self.period) => {}
                _ = self.cell.changed() => {}
            }
        }

        Ok(())
    }
}

/// Ends the session state and logs the termination line when dropped
struct Termination {
    cell: Arc<SessionCell>,
    identity: FolderId,
}

impl Drop for Termination {
    fn drop(&mut self) {
        self.cell.advance(SessionState::Terminated);
        error!(
            target: CRITICAL_TARGET,
            "Folder {} (ID: {}) monitoring terminated.",
            self.cell.path().display(),
            self.identity
        );
    }
}

/// Stop the watcher off the async worker (stopping joins a thread)
async fn release(watcher: EventWatcher) {
    let path = watcher.path().to_path_buf();
    let stopped = tokio::task::spawn_blocking(move || {
        let mut watcher = watcher;
        watcher.stop();
    })
    .await;

    if let Err(e) = stopped {
        warn!("Failed to stop event watcher for {}: {}", path.display(), e);
    }
}

/// Event callbacks for one session
struct SessionHandler {
    cell: Arc<SessionCell>,
    filter: NameFilter,
}

impl EventHandler for SessionHandler {
    fn on_create(&self, path: &Path) {
        if self.filter.matches(path) {
            info!("File created: {}", path.display());
        }
    }

    fn on_delete(&self, path: &Path) {
        if self.filter.matches(path) {
            info!("File deleted: {}", path.display());
        }
    }

    fn on_move(&self, from: &Path, to: &Path) {
        let from_abs = std::path::absolute(from).unwrap_or_else(|_| from.to_path_buf());
        if !self.cell.is_tracking(&from_abs) {
            return;
        }

        if self.cell.mark_renamed(to.to_path_buf()) {
            warn!("Folder renamed from {} to {}", from.display(), to.display());
        }
    }
}
