//! Configuration file watcher for hot reload.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::observability::metrics;
use crate::state::SiteState;

/// Watches the configuration file and publishes rebuilt site state.
///
/// Parsing, validation, route compilation and catalog scanning all happen on
/// the watcher thread, so a reload that fails any of them never reaches the
/// request path.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<Arc<SiteState>>,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher.
    ///
    /// Returns the watcher and a receiver for rebuilt site state.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<Arc<SiteState>>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching the file in a background thread.
    ///
    /// The returned watcher must be kept alive for as long as reloads are wanted.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx.clone();
        let path = self.path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                    tracing::info!(path = ?path, "Config file change detected, reloading");
                    match reload(&path) {
                        Ok(state) => {
                            let _ = tx.send(Arc::new(state));
                        }
                        Err(e) => {
                            metrics::record_reload(false);
                            tracing::error!(error = %e, "Failed to reload config, keeping current site state");
                        }
                    }
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = ?e, "Watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Config watcher started");
        Ok(watcher)
    }
}

fn reload(path: &Path) -> Result<SiteState, crate::config::ConfigError> {
    let config = load_config(path)?;
    SiteState::build(config)
}
