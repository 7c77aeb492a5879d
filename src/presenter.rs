//! The result panel: shows pipeline status and the translated text, and
//! hosts the "capture" and "quit" controls.
//!
//! `ResultPresenter` keeps the panel's state (title, body, visibility,
//! focus, geometry) and mirrors every change to its [`ResultSurface`].

use crate::config::{AppConfig, Margin, Padding};
use crate::geometry::{DragTracker, GeometryStore, Interaction, Pointer, Rect, Size, WindowKey};
use serde::{Deserialize, Serialize};

/// Smallest size the result panel may be resized to.
pub const RESULT_MIN_SIZE: Size = Size {
    width: 200,
    height: 100,
};

/// Title shown whenever the panel holds a final result.
pub const RESULT_TITLE: &str = "Translation Result";

pub const FOCUSED_OPACITY: f32 = 1.0;
pub const UNFOCUSED_OPACITY: f32 = 0.8;

/// Something the user asked the panel to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Capture,
    Quit,
}

/// The panel's window, as seen by the presenter.
pub trait ResultSurface: Send {
    fn set_title(&mut self, title: &str);
    fn set_text(&mut self, text: &str);
    fn set_visible(&mut self, visible: bool);
    fn set_opacity(&mut self, opacity: f32);
    fn set_geometry(&mut self, rect: Rect);
    fn apply_style(&mut self, style: &SurfaceStyle);
}

/// Visual styling of the panel, derived from the `text` and `layout`
/// sections of the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SurfaceStyle {
    pub font_family: String,
    pub font_size: u32,
    pub font_bold: bool,
    pub font_color: String,
    pub background_color: String,
    pub padding: Padding,
    pub margin: Margin,
}

impl SurfaceStyle {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            font_family: config.text.font_family.clone(),
            font_size: config.text.font_size,
            font_bold: config.text.font_bold,
            font_color: config.text.font_color.clone(),
            background_color: config.text.background_color.clone(),
            padding: config.layout.padding,
            margin: config.layout.margin,
        }
    }
}

pub struct ResultPresenter {
    surface: Box<dyn ResultSurface>,
    tracker: DragTracker,
    store: GeometryStore,
    style: SurfaceStyle,
    title: String,
    text: String,
    visible: bool,
    focused: bool,
}

impl ResultPresenter {
    /// Opens the panel at its saved position, or at `layout.result_window`
    /// on first run.
    pub fn new(surface: Box<dyn ResultSurface>, store: GeometryStore, config: &AppConfig) -> Self {
        let rect = store
            .load(WindowKey::Result)
            .unwrap_or(config.layout.result_window);

        let mut presenter = Self {
            surface,
            tracker: DragTracker::new(rect, RESULT_MIN_SIZE),
            store,
            style: SurfaceStyle::from_config(config),
            title: RESULT_TITLE.to_string(),
            text: String::new(),
            visible: true,
            focused: true,
        };

        presenter.surface.set_geometry(presenter.tracker.rect());
        presenter.surface.apply_style(&presenter.style);
        presenter.surface.set_title(&presenter.title);
        presenter.surface.set_opacity(FOCUSED_OPACITY);
        presenter.surface.set_visible(true);
        presenter
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn opacity(&self) -> f32 {
        if self.focused {
            FOCUSED_OPACITY
        } else {
            UNFOCUSED_OPACITY
        }
    }

    pub fn rect(&self) -> Rect {
        self.tracker.rect()
    }

    pub fn style(&self) -> &SurfaceStyle {
        &self.style
    }

    /// Shows an in-progress status both as the title and as the body.
    pub fn show_progress(&mut self, status: &str) {
        self.set_title(status);
        self.set_text(status.to_string());
    }

    /// Shows a final result. Runs of whitespace collapse to single spaces.
    pub fn display(&mut self, text: &str) {
        self.set_text(normalize_whitespace(text));
        self.set_title(RESULT_TITLE);
    }

    pub fn hide(&mut self) {
        self.set_visible(false);
    }

    pub fn show(&mut self) {
        self.set_visible(true);
    }

    pub fn set_focused(&mut self, focused: bool) {
        if self.focused != focused {
            self.focused = focused;
            self.surface.set_opacity(self.opacity());
        }
    }

    /// Re-styles the panel in place after a configuration reload.
    pub fn apply_config(&mut self, config: &AppConfig) {
        let style = SurfaceStyle::from_config(config);
        if style != self.style {
            self.style = style;
            self.surface.apply_style(&self.style);
            log::debug!("[PRESENTER] Style updated");
        }
    }

    pub fn begin_interaction(&mut self, pointer: Pointer) -> Interaction {
        self.tracker.begin(pointer)
    }

    pub fn update_interaction(&mut self, pointer: Pointer) -> Option<Rect> {
        let rect = self.tracker.update(pointer)?;
        self.surface.set_geometry(rect);
        Some(rect)
    }

    pub fn end_interaction(&mut self) {
        if self.tracker.end().is_some() {
            self.persist();
        }
    }

    /// Adopts geometry changed outside a drag. Ignored while a drag is in
    /// progress.
    pub fn reload_geometry(&mut self, rect: Rect) {
        if self.tracker.interaction().is_none() {
            self.tracker.set_rect(rect);
        }
    }

    pub fn persist(&self) {
        self.store.save_or_log(WindowKey::Result, self.rect());
    }

    fn set_title(&mut self, title: &str) {
        if self.title != title {
            self.title = title.to_string();
            self.surface.set_title(&self.title);
        }
    }

    fn set_text(&mut self, text: String) {
        self.text = text;
        self.surface.set_text(&self.text);
    }

    fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            self.visible = visible;
            self.surface.set_visible(visible);
        }
    }
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
