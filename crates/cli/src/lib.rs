//! dirwatch CLI library
//!
//! Configuration, log formatting and the supervisor loop behind the
//! `dirwatch` binary.

pub mod config;
pub mod logging;
pub mod supervisor;

pub use config::{PeriodSource, Settings};
pub use logging::{ColorMode, LogOptions};
pub use supervisor::Supervisor;
