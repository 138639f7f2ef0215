//! Non-recursive folder subscription
//!
//! Raw notify events are forwarded over a crossbeam channel to a dispatch
//! thread, classified, and handed to an [`EventHandler`].

use crate::error::WatcherError;
use crate::event::{classify, FsEvent};
use crate::handler::EventHandler;
use crossbeam_channel::{Receiver, Sender};
use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::thread::JoinHandle;
use tracing::{debug, warn};

type RawEvent = notify::Result<notify::Event>;

/// Running subscription on one folder
///
/// Dropping the watcher stops it, so the subscription is released on every
/// exit path of its owner.
pub struct EventWatcher {
    /// Absolute path being watched
    path: PathBuf,

    /// Notification backend (dropping it ends OS delivery)
    backend: Option<RecommendedWatcher>,

    /// Dropped to tell the dispatch thread to finish
    shutdown_tx: Option<Sender<()>>,

    /// Thread running handler callbacks
    dispatcher: Option<JoinHandle<()>>,
}

impl EventWatcher {
    /// Start watching `path` and dispatching events to `handler`
    ///
    /// Only direct children are observed. The parent folder is subscribed as
    /// well so that a rename of `path` itself arrives with both ends.
    pub fn start<H: EventHandler>(path: &Path, handler: H) -> Result<Self, WatcherError> {
        let path = std::path::absolute(path).map_err(|source| WatcherError::InvalidPath {
            path: path.to_path_buf(),
            source,
        })?;

        let (event_tx, event_rx) = crossbeam_channel::unbounded::<RawEvent>();
        let (shutdown_tx, shutdown_rx) = crossbeam_channel::bounded::<()>(0);

        let mut backend = RecommendedWatcher::new(
            move |res: RawEvent| {
                let _ = event_tx.send(res);
            },
            Config::default(),
        )
        .map_err(|source| WatcherError::Subscribe {
            path: path.clone(),
            source,
        })?;

        backend
            .watch(&path, RecursiveMode::NonRecursive)
            .map_err(|source| WatcherError::Subscribe {
                path: path.clone(),
                source,
            })?;

        if let Some(parent) = path.parent() {
            if let Err(e) = backend.watch(parent, RecursiveMode::NonRecursive) {
                warn!(
                    "Cannot watch {} for renames of {}: {}",
                    parent.display(),
                    path.display(),
                    e
                );
            }
        }

        // Callbacks log through whatever sink was active when we started
        let dispatch = tracing::dispatcher::get_default(|current| current.clone());
        let watched = path.clone();
        let dispatcher = std::thread::Builder::new()
            .name("dirwatch-events".to_string())
            .spawn(move || {
                tracing::dispatcher::with_default(&dispatch, || {
                    dispatch_loop(&watched, &handler, &event_rx, &shutdown_rx)
                })
            })
            .map_err(WatcherError::Spawn)?;

        debug!("Event watcher started for {}", path.display());

        Ok(Self {
            path,
            backend: Some(backend),
            shutdown_tx: Some(shutdown_tx),
            dispatcher: Some(dispatcher),
        })
    }

    /// Absolute path being watched
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the subscription is still live
    pub fn is_running(&self) -> bool {
        self.backend.is_some()
    }

    /// Stop watching and wait for the dispatch thread to finish
    ///
    /// Calling it again is a no-op.
    pub fn stop(&mut self) {
        let Some(backend) = self.backend.take() else {
            return;
        };

        drop(backend);
        drop(self.shutdown_tx.take());

        if let Some(handle) = self.dispatcher.take() {
            // A handler stopping its own watcher must not join itself
            if handle.thread().id() != std::thread::current().id() && handle.join().is_err() {
                warn!("Event dispatch for {} panicked", self.path.display());
            }
        }

        debug!("Event watcher stopped for {}", self.path.display());
    }
}

impl Drop for EventWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for EventWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventWatcher")
            .field("path", &self.path)
            .field("running", &self.is_running())
            .finish()
    }
}

fn dispatch_loop<H: EventHandler>(
    watched: &Path,
    handler: &H,
    events: &Receiver<RawEvent>,
    shutdown: &Receiver<()>,
) {
    loop {
        crossbeam_channel::select! {
            recv(events) -> msg => match msg {
                Ok(raw) => handle_raw(watched, handler, raw),
                Err(_) => return,
            },
            recv(shutdown) -> _ => {
                // Deliver whatever the backend queued before it went away
                for raw in events.try_iter() {
                    handle_raw(watched, handler, raw);
                }
                return;
            }
        }
    }
}

fn handle_raw<H: EventHandler>(watched: &Path, handler: &H, raw: RawEvent) {
    match raw {
        Ok(event) => {
            for fs_event in classify(event, watched) {
                match fs_event {
                    FsEvent::Created(path) => handler.on_create(&path),
                    FsEvent::Deleted(path) => handler.on_delete(&path),
                    FsEvent::Moved { from, to } => handler.on_move(&from, &to),
                }
            }
        }
        Err(e) => warn!("Watch error on {}: {}", watched.display(), e),
    }
}
