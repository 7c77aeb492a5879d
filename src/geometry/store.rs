//! Durable window geometry.
//!
//! Both windows share one JSON document keyed by window name:
//!
//! ```json
//! {
//!     "region": { "x": 760, "y": 440, "width": 400, "height": 200 },
//!     "result": { "x": 100, "y": 100, "width": 400, "height": 200 }
//! }
//! ```
//!
//! Saving one window rewrites the document but keeps the other window's
//! record intact.

use super::Rect;
use crate::storage;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// The key each window's record is stored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowKey {
    /// The capture-region box.
    Region,
    /// The translation result panel.
    Result,
}

impl WindowKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            WindowKey::Region => "region",
            WindowKey::Result => "result",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GeometryPersistError {
    #[error("Failed to write window geometry: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode window geometry: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Handle to the geometry document. Cheap to clone; every call goes to disk.
#[derive(Debug, Clone)]
pub struct GeometryStore {
    path: PathBuf,
}

impl GeometryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads one window's record. Missing or unreadable documents yield
    /// `None`; the caller falls back to its default placement.
    pub fn load(&self, key: WindowKey) -> Option<Rect> {
        self.read_all().remove(&key)
    }

    /// Overwrites one window's record.
    ///
    /// A malformed document cannot be merged into. It is moved aside to
    /// `<name>.corrupt` and replaced by one holding only this record.
    pub fn save(&self, key: WindowKey, rect: Rect) -> Result<(), GeometryPersistError> {
        let mut records = match self.read_document() {
            Ok(records) => records,
            Err(ReadError::Malformed(e)) => {
                log::warn!(
                    "[GEOMETRY] {} is malformed ({}); other windows' records are lost",
                    self.path.display(),
                    e
                );
                match storage::set_aside(&self.path) {
                    Ok(aside) => log::warn!("[GEOMETRY] Moved it to {}", aside.display()),
                    Err(e) => log::warn!("[GEOMETRY] Could not move it aside: {}", e),
                }
                BTreeMap::new()
            }
            Err(ReadError::Io(e)) => {
                log::warn!(
                    "[GEOMETRY] Failed to read {} ({}); rewriting with {} only",
                    self.path.display(),
                    e,
                    key.as_str()
                );
                BTreeMap::new()
            }
        };
        records.insert(key, rect);
        let bytes = storage::to_pretty_json(&records)?;
        storage::write_atomic(&self.path, &bytes)?;
        log::debug!(
            "[GEOMETRY] Saved {} as {}x{} at {},{}",
            key.as_str(),
            rect.width,
            rect.height,
            rect.x,
            rect.y
        );
        Ok(())
    }

    /// Like [`save`](Self::save), but logs failures instead of returning them.
    pub fn save_or_log(&self, key: WindowKey, rect: Rect) {
        if let Err(e) = self.save(key, rect) {
            log::warn!("[GEOMETRY] Could not persist {} window: {}", key.as_str(), e);
        }
    }

    fn read_all(&self) -> BTreeMap<WindowKey, Rect> {
        self.read_document().unwrap_or_else(|e| {
            log::warn!("[GEOMETRY] Ignoring {}: {}", self.path.display(), e);
            BTreeMap::new()
        })
    }

    fn read_document(&self) -> Result<BTreeMap<WindowKey, Rect>, ReadError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum ReadError {
    #[error("unreadable: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}
