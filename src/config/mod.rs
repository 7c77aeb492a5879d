//! User configuration: the `config.json` document and its live reload.
//!
//! `AppConfig` is an immutable value. The watcher publishes a fresh
//! `Arc<AppConfig>` whenever the file changes; everyone else reads by value.

mod watcher;

pub use watcher::{ConfigError, ConfigWatcher, POLL_INTERVAL};

use crate::geometry::Rect;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Persist every capture image and a structured capture history.
    pub dev_mode: bool,
    pub text: TextStyle,
    pub layout: Layout,
    pub translation: TranslationConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dev_mode: true,
            text: TextStyle::default(),
            layout: Layout::default(),
            translation: TranslationConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: u32,
    pub font_bold: bool,
    pub font_color: String,
    pub background_color: String,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "Arial".to_string(),
            font_size: 22,
            font_bold: true,
            font_color: "#FFFFFF".to_string(),
            background_color: "#000000".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub padding: Padding,
    pub margin: Margin,
    /// Where the result panel opens when no saved position exists.
    pub result_window: Rect,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            padding: Padding::default(),
            margin: Margin::default(),
            result_window: Rect::new(100, 100, 400, 200),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Padding {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl Default for Padding {
    fn default() -> Self {
        Self {
            left: 20,
            right: 20,
            top: 50,
            bottom: 50,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margin {
    pub left: u32,
    pub right: u32,
}

impl Default for Margin {
    fn default() -> Self {
        Self { left: 20, right: 20 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    /// Source language code, or `auto` to let the backend detect it.
    pub source: String,
    pub target: String,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            source: "auto".to_string(),
            target: "id".to_string(),
        }
    }
}
