//! Session state and the shared session cell
//!
//! The cell is written by exactly one party (the move handler) and read by
//! the heartbeat loop. State only ever moves forward:
//! `Active -> Renamed -> Terminated` or `Active -> Terminated`.

use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU8, Ordering};
use tokio::sync::Notify;

/// Lifecycle state of one watch session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum SessionState {
    /// Watcher running, heartbeat looping
    Active = 0,
    /// The watched folder itself was renamed; shutdown pending
    Renamed = 1,
    /// Session finished
    Terminated = 2,
}

impl SessionState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Active,
            1 => Self::Renamed,
            _ => Self::Terminated,
        }
    }
}

/// Shared, single-writer state of a running session
#[derive(Debug)]
pub struct SessionCell {
    /// Currently tracked path (rebound on rename)
    path: RwLock<PathBuf>,
    /// `SessionState` as u8
    state: AtomicU8,
    /// Wakes the heartbeat loop out of its sleep
    wake: Notify,
}

impl SessionCell {
    /// Create a cell in the `Active` state tracking `path`
    pub fn new(path: PathBuf) -> Self {
        Self {
            path: RwLock::new(path),
            state: AtomicU8::new(SessionState::Active as u8),
            wake: Notify::new(),
        }
    }

    /// Snapshot of the tracked path
    pub fn path(&self) -> PathBuf {
        self.path.read().clone()
    }

    /// Check whether `candidate` is the tracked path
    pub fn is_tracking(&self, candidate: &Path) -> bool {
        *self.path.read() == candidate
    }

    /// Current state
    pub fn state(&self) -> SessionState {
        SessionState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Whether the session is still `Active`
    pub fn is_active(&self) -> bool {
        self.state() == SessionState::Active
    }

    /// Move forward to `next`
    ///
    /// Returns false (and changes nothing) if the session is already at or
    /// past `next`.
    pub fn advance(&self, next: SessionState) -> bool {
        let advanced = self
            .state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                (next as u8 > current).then_some(next as u8)
            })
            .is_ok();

        if advanced {
            self.wake.notify_one();
        }
        advanced
    }

    /// Record that the watched folder was renamed to `to`
    ///
    /// Only takes effect from `Active`. The path is rebound under the write
    /// lock so a reader never sees `Renamed` paired with the old path.
    pub fn mark_renamed(&self, to: PathBuf) -> bool {
        let mut path = self.path.write();
        let renamed = self
            .state
            .compare_exchange(
                SessionState::Active as u8,
                SessionState::Renamed as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok();

        if renamed {
            *path = to;
        }
        drop(path);

        if renamed {
            self.wake.notify_one();
        }
        renamed
    }

    /// Wait until someone signals a state change
    ///
    /// A signal sent while nobody was waiting is kept, so the next call
    /// returns immediately.
    pub async fn changed(&self) {
        self.wake.notified().await
    }
}
