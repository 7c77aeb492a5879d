//! On-disk locations.
//!
//! Everything lives under one base directory:
//!   Linux:   ~/.config/ocr-overlay/
//!   macOS:   ~/Library/Application Support/ocr-overlay/
//!   Windows: %APPDATA%/ocr-overlay/
//!
//! `OCR_OVERLAY_HOME` overrides the base directory.

use std::path::{Path, PathBuf};

pub const HOME_ENV: &str = "OCR_OVERLAY_HOME";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    base: PathBuf,
}

impl AppPaths {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Resolves the base directory from the environment or the platform
    /// config directory.
    pub fn from_env() -> Self {
        match std::env::var_os(HOME_ENV) {
            Some(home) if !home.is_empty() => Self::new(home),
            _ => Self::new(default_base_dir()),
        }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn config_file(&self) -> PathBuf {
        self.base.join("config.json")
    }

    pub fn geometry_file(&self) -> PathBuf {
        self.base.join("window_position.json")
    }

    pub fn translation_log(&self) -> PathBuf {
        self.base.join("translation_log.txt")
    }

    pub fn dev_logs_dir(&self) -> PathBuf {
        self.base.join("dev_logs")
    }

    pub fn images_dir(&self) -> PathBuf {
        self.dev_logs_dir().join("images")
    }

    pub fn history_file(&self) -> PathBuf {
        self.dev_logs_dir().join("capture_data.json")
    }
}

fn default_base_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ocr-overlay")
}
