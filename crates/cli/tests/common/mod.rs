//! Common utilities for integration tests

pub mod logs;

// Re-export commonly used items
pub use cli::{DirwatchProcess, ProcessOutput};
pub use logs::LogCapture;
