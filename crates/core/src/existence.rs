//! Existence polling
//!
//! Suspends the caller until a path shows up on disk.

use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Fixed cadence used while waiting for the folder to appear
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Wait until `path` exists, checking once per [`POLL_INTERVAL`]
///
/// Never fails: an unreadable path is treated as not existing yet.
pub async fn wait_for_existence(path: &Path) {
    wait_for_existence_every(path, POLL_INTERVAL).await
}

/// Same as [`wait_for_existence`] with an explicit poll interval
pub async fn wait_for_existence_every(path: &Path, interval: Duration) {
    info!("Waiting for folder {} to be created...", path.display());

    loop {
        match tokio::fs::try_exists(path).await {
            Ok(true) => return,
            Ok(false) => {}
            Err(e) => debug!("Existence probe for {} failed: {}", path.display(), e),
        }
        tokio::time::sleep(interval).await;
    }
}
