//! Folder watching for dirwatch
//!
//! This crate provides:
//! - `EventWatcher`: a non-recursive notify subscription with a dispatch thread
//! - Classification of raw notify events into create/delete/move
//! - `WatchSession`: the heartbeat loop and rename/delete state machine

pub mod error;
pub mod event;
pub mod handler;
pub mod session;
pub mod watcher;


pub use error::WatcherError;
pub use event::{classify, FsEvent};
pub use handler::EventHandler;
pub use session::{SessionOutcome, WatchSession};
pub use watcher::EventWatcher;
