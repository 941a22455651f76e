// src/config/store.rs

//! Hot-reloadable configuration.
//!
//! [`ConfigStore::poll`] is cheap when nothing changed (a single stat), so it
//! is meant to run on a short interval. Readers call
//! [`ConfigStore::current`] and get an `Arc` to an immutable snapshot; a
//! newer publish never touches a snapshot someone already holds.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, SystemTime};

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::config::loader::load_with;
use crate::config::model::PlotConfig;
use crate::fs::{FileSystem, RealFileSystem};

/// How often [`ConfigStore::spawn_poller`] re-checks the file by default.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// What a single [`ConfigStore::poll`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Modification time matches the last observation.
    Unchanged,
    /// A new snapshot was published.
    Loaded,
    /// Stat, read or parse failed; the previous snapshot is still current.
    Failed,
}

#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    fs: Arc<dyn FileSystem>,
    current: RwLock<Option<Arc<PlotConfig>>>,
    last_modified: Mutex<Option<SystemTime>>,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_filesystem(path, Arc::new(RealFileSystem))
    }

    pub fn with_filesystem(path: impl Into<PathBuf>, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            path: path.into(),
            fs,
            current: RwLock::new(None),
            last_modified: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The most recently published snapshot, if any load has succeeded yet.
    pub fn current(&self) -> Option<Arc<PlotConfig>> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Re-read the file if its modification time changed.
    ///
    /// The new modification time is remembered even when the file fails to
    /// read or parse, so a broken file is only retried after it changes
    /// again.
    pub fn poll(&self) -> PollOutcome {
        let modified = match self.fs.modified(&self.path) {
            Ok(m) => m,
            Err(err) => {
                warn!(path = ?self.path, error = %err, "failed to stat config file");
                return PollOutcome::Failed;
            }
        };

        // Held for the whole reload so concurrent polls cannot publish out of
        // order.
        let mut last_modified = self
            .last_modified
            .lock()
            .unwrap_or_else(|e| e.into_inner());

        if *last_modified == Some(modified) {
            debug!(path = ?self.path, "config file unchanged");
            return PollOutcome::Unchanged;
        }
        *last_modified = Some(modified);

        match load_with(self.fs.as_ref(), &self.path) {
            Ok(config) => {
                self.publish(config);
                info!(path = ?self.path, "new configuration loaded");
                PollOutcome::Loaded
            }
            Err(err) => {
                warn!(path = ?self.path, error = %err, "failed to process config file");
                PollOutcome::Failed
            }
        }
    }

    fn publish(&self, config: PlotConfig) {
        let snapshot = Arc::new(config);
        let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
        *current = Some(snapshot);
    }

    /// Poll once right away, then every `interval`, on a background task.
    ///
    /// Dropping the returned handle does not stop the poller; abort it.
    pub fn spawn_poller(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            info!(path = ?self.path, ?interval, "config poller started");
            loop {
                // The first tick completes immediately.
                ticker.tick().await;

                // Stat and read are blocking; keep them off the runtime workers.
                let store = Arc::clone(&self);
                if let Err(err) = tokio::task::spawn_blocking(move || store.poll()).await {
                    warn!(path = ?self.path, error = %err, "config poll task failed");
                }
            }
        })
    }
}
