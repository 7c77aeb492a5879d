//! Capture archive and translation log.
//!
//! `CaptureHistory` is the dev-mode record of every capture cycle: an
//! ordered, append-only list rewritten wholesale (temp file + rename) on
//! each append. `TranslationLog` is the plain-text log of successful
//! translations, always on.

use crate::storage;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Timestamp format used in records and in the translation log.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureRecord {
    pub timestamp: String,
    pub image_path: Option<String>,
    pub detected_text: String,
    pub translated_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CaptureRecord {
    pub fn new(at: DateTime<Local>) -> Self {
        Self {
            timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
            image_path: None,
            detected_text: String::new(),
            translated_text: String::new(),
            error: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("Failed to write history: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode history: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug)]
pub struct CaptureHistory {
    path: PathBuf,
    records: Vec<CaptureRecord>,
}

impl CaptureHistory {
    /// Loads the prior run's records, or starts empty.
    ///
    /// An unparseable file is moved aside to `<name>.corrupt` so the next
    /// append does not silently overwrite it.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let records = match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<Vec<CaptureRecord>>(&contents) {
                Ok(records) => {
                    log::info!("[HISTORY] Loaded {} prior captures", records.len());
                    records
                }
                Err(e) => {
                    log::warn!("[HISTORY] {} is malformed ({}), starting fresh", path.display(), e);
                    set_aside(&path);
                    Vec::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                log::warn!("[HISTORY] Failed to read {}: {}", path.display(), e);
                Vec::new()
            }
        };
        Self { path, records }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> &[CaptureRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Appends a finished record and rewrites the file.
    ///
    /// The record stays in memory even if the write fails, so a later
    /// [`save`](Self::save) still persists it.
    pub fn append(&mut self, record: CaptureRecord) -> Result<(), HistoryError> {
        self.records.push(record);
        self.save()
    }

    pub fn save(&self) -> Result<(), HistoryError> {
        let bytes = storage::to_pretty_json(&self.records)?;
        storage::write_atomic(&self.path, &bytes)?;
        Ok(())
    }
}

fn set_aside(path: &Path) {
    if let Err(e) = storage::set_aside(path) {
        log::warn!("[HISTORY] Could not move aside {}: {}", path.display(), e);
    }
}

/// Append-only, human-readable log of successful translations.
#[derive(Debug, Clone)]
pub struct TranslationLog {
    path: PathBuf,
}

impl TranslationLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(
        &self,
        at: DateTime<Local>,
        original: &str,
        translated: &str,
    ) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        write!(
            file,
            "\n=== {} ===\nOriginal: {}\nTranslation: {}\n",
            at.format(TIMESTAMP_FORMAT),
            original,
            translated
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
    }

    fn record(text: &str) -> CaptureRecord {
        CaptureRecord {
            detected_text: text.to_string(),
            ..CaptureRecord::new(at())
        }
    }

    #[test]
    fn record_timestamp_has_second_resolution() {
        assert_eq!(CaptureRecord::new(at()).timestamp, "2024-03-09 14:05:07");
    }

    #[test]
    fn error_field_is_omitted_when_absent() {
        let json = serde_json::to_value(record("x")).unwrap();
        assert!(json.get("error").is_none());
        assert!(json.get("image_path").unwrap().is_null());
    }

    #[test]
    fn history_survives_a_restart_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dev_logs").join("capture_data.json");

        let mut history = CaptureHistory::load(&path);
        history.append(record("one")).unwrap();
        history.append(record("two")).unwrap();

        let mut reloaded = CaptureHistory::load(&path);
        reloaded.append(record("three")).unwrap();

        let texts: Vec<_> = CaptureHistory::load(&path)
            .records()
            .iter()
            .map(|r| r.detected_text.clone())
            .collect();
        assert_eq!(texts, ["one", "two", "three"]);
    }

    #[test]
    fn non_ascii_text_is_stored_unescaped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capture_data.json");
        let mut history = CaptureHistory::load(&path);
        history.append(record("こんにちは")).unwrap();

        assert!(std::fs::read_to_string(&path).unwrap().contains("こんにちは"));
    }

    #[test]
    fn corrupt_history_is_set_aside() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capture_data.json");
        std::fs::write(&path, "[{ broken").unwrap();

        let history = CaptureHistory::load(&path);
        assert!(history.is_empty());
        assert!(dir.path().join("capture_data.json.corrupt").exists());
    }

    #[test]
    fn translation_log_appends_blocks() {
        let dir = tempfile::tempdir().unwrap();
        let log = TranslationLog::new(dir.path().join("translation_log.txt"));

        log.append(at(), "Hello", "Halo").unwrap();
        log.append(at(), "Cat", "Kucing").unwrap();

        let text = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(
            text,
            "\n=== 2024-03-09 14:05:07 ===\nOriginal: Hello\nTranslation: Halo\n\
             \n=== 2024-03-09 14:05:07 ===\nOriginal: Cat\nTranslation: Kucing\n"
        );
    }
}
