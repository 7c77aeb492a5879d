//! Polling watcher for `config.json`.
//!
//! The event loop calls [`ConfigWatcher::poll`] once per [`POLL_INTERVAL`].
//! A newer modification time triggers a reload; a reload that fails keeps
//! the previously published snapshot.

use super::AppConfig;
use crate::storage;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

pub struct ConfigWatcher {
    path: PathBuf,
    last_modified: Option<SystemTime>,
    snapshot: Arc<AppConfig>,
}

impl ConfigWatcher {
    /// Loads the configuration, falling back to the built-in defaults when
    /// the file is missing, unreadable or malformed. The defaults are then
    /// written back so the file on disk is always valid after first run.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let snapshot = match read_config(&path) {
            Ok(config) => {
                log::info!("[CONFIG] Loaded {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("[CONFIG] {}; using built-in defaults", e);
                let config = AppConfig::default();
                if let Err(e) = write_config(&path, &config) {
                    log::error!("[CONFIG] Could not write defaults to {}: {}", path.display(), e);
                }
                config
            }
        };

        let last_modified = modified_time(&path);
        Self {
            path,
            last_modified,
            snapshot: Arc::new(snapshot),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The currently published configuration.
    pub fn snapshot(&self) -> Arc<AppConfig> {
        Arc::clone(&self.snapshot)
    }

    /// Checks the file's modification time and reloads if it advanced.
    ///
    /// Returns the new snapshot when one was published.
    pub fn poll(&mut self) -> Option<Arc<AppConfig>> {
        let modified = modified_time(&self.path)?;
        if self.last_modified.is_some_and(|last| modified <= last) {
            return None;
        }
        self.last_modified = Some(modified);

        match read_config(&self.path) {
            Ok(config) => {
                log::info!("[CONFIG] Reloaded {}", self.path.display());
                self.snapshot = Arc::new(config);
                Some(self.snapshot())
            }
            Err(e) => {
                log::warn!("[CONFIG] Reload failed, keeping previous settings: {}", e);
                None
            }
        }
    }
}

fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

fn write_config(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    let bytes = storage::to_pretty_json(config)?;
    storage::write_atomic(path, &bytes)?;
    Ok(())
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}
