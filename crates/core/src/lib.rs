//! Core primitives for dirwatch
//!
//! This crate provides the pieces the watch lifecycle is built from:
//! - Existence polling for a path that may not exist yet
//! - Folder identity derived from creation time
//! - `WatchTarget` (a path confirmed to exist, plus its identity)
//! - Session state and the shared single-writer cell
//! - Child name filtering

pub mod error;
pub mod existence;
pub mod filter;
pub mod identity;
pub mod state;
pub mod target;

// Re-export main types for convenience
pub use error::WatchError;
pub use existence::{wait_for_existence, wait_for_existence_every, POLL_INTERVAL};
pub use filter::{NameFilter, DEFAULT_MARKER};
pub use identity::{resolve_identity, FolderId};
pub use state::{SessionCell, SessionState};
pub use target::WatchTarget;

/// Target for errors that end a session or a lifecycle pass
///
/// Log these at ERROR; the CLI's formatter tags them `CRITICAL`.
pub const CRITICAL_TARGET: &str = "dirwatch::critical";

/// Common result type used throughout dirwatch-core
pub type Result<T> = std::result::Result<T, WatchError>;
