//! Supervisor loop
//!
//! Drives the folder lifecycle forever: wait for the configured folder,
//! resolve its identity, run a watch session on its own task, repeat. A
//! deleted or renamed folder is picked up again as soon as something appears
//! at the configured path.

use crate::config::{PeriodSource, Settings};
use dirwatch_core::{
    wait_for_existence_every, NameFilter, WatchTarget, CRITICAL_TARGET, POLL_INTERVAL,
};
use std::convert::Infallible;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, error, info};
use watcher::{SessionOutcome, WatchSession};

/// Top-level driver for one configured folder
#[derive(Debug, Clone)]
pub struct Supervisor {
    folder: PathBuf,
    period: PeriodSource,
    filter: NameFilter,
    poll_interval: Duration,
}

impl Supervisor {
    pub fn new(settings: Settings) -> Self {
        Self {
            folder: settings.folder,
            period: settings.period,
            filter: settings.filter,
            poll_interval: POLL_INTERVAL,
        }
    }

    /// Override the existence poll interval
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Configured folder
    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Run until the surrounding task is cancelled
    pub async fn run(self) -> Infallible {
        loop {
            self.run_once().await;
        }
    }

    /// One lifecycle iteration
    ///
    /// Returns `None` when no session ran (identity resolution failed) or the
    /// session task died. A failed or dead session costs one poll interval
    /// before returning, so a folder that cannot be watched is retried at the
    /// existence-poll cadence.
    pub async fn run_once(&self) -> Option<SessionOutcome> {
        // Always the configured path, never where a renamed folder went
        wait_for_existence_every(&self.folder, self.poll_interval).await;

        let target = match WatchTarget::resolve(&self.folder) {
            Ok(target) => target,
            Err(e) => {
                error!(
                    target: CRITICAL_TARGET,
                    "Failed to get folder ID for {}: {}",
                    self.folder.display(),
                    e
                );
                // Gone again: the next existence wait blocks on its own.
                // Anything else would spin without a pause.
                if !e.is_not_found() {
                    tokio::time::sleep(self.poll_interval).await;
                }
                return None;
            }
        };

        info!(
            "Folder {} of ID {} is created",
            self.folder.display(),
            target.identity()
        );

        let session =
            WatchSession::new(target, self.period.resolve()).with_filter(self.filter.clone());

        let outcome = match tokio::spawn(session.run()).await {
            Ok(outcome) => {
                debug!("Session for {} ended: {:?}", self.folder.display(), outcome);
                Some(outcome)
            }
            Err(e) => {
                error!(
                    target: CRITICAL_TARGET,
                    "Watch session for {} aborted: {}",
                    self.folder.display(),
                    e
                );
                None
            }
        };

        if let Some(delay) = self.retry_delay(outcome.as_ref()) {
            tokio::time::sleep(delay).await;
        }
        outcome
    }

    /// Pause owed after a session before the next existence wait
    fn retry_delay(&self, outcome: Option<&SessionOutcome>) -> Option<Duration> {
        match outcome {
            // The folder is still there, so the next pass would start at once
            Some(SessionOutcome::Failed) | None => Some(self.poll_interval),
            Some(SessionOutcome::Deleted | SessionOutcome::Renamed { .. }) => None,
        }
    }
}
