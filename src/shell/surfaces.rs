//! Tauri webview windows behind the presenter and region traits.
//!
//! Geometry and visibility go straight to the window; everything the page
//! draws (border, title, text, style, opacity) is sent as an event for the
//! page's script to render.

use crate::geometry::Rect;
use crate::presenter::{ResultSurface, SurfaceStyle};
use crate::region::{BorderDecoration, RegionSurface};
use tauri::{Emitter, PhysicalPosition, PhysicalSize, WebviewWindow};

pub const REGION_LABEL: &str = "region";
pub const RESULT_LABEL: &str = "result";

fn place(window: &WebviewWindow, rect: Rect) {
    let position = PhysicalPosition::new(rect.x, rect.y);
    let size = PhysicalSize::new(rect.width.max(1) as u32, rect.height.max(1) as u32);
    if let Err(e) = window.set_position(position).and_then(|_| window.set_size(size)) {
        log::warn!("[SHELL] Failed to place {}: {}", window.label(), e);
    }
}

fn send<S: serde::Serialize + Clone>(window: &WebviewWindow, event: &str, payload: S) {
    if let Err(e) = window.emit(event, payload) {
        log::warn!("[SHELL] Failed to emit {} to {}: {}", event, window.label(), e);
    }
}

pub struct TauriRegionSurface {
    window: WebviewWindow,
}

impl TauriRegionSurface {
    pub fn new(window: WebviewWindow) -> Self {
        Self { window }
    }
}

impl RegionSurface for TauriRegionSurface {
    fn set_geometry(&mut self, rect: Rect) {
        place(&self.window, rect);
    }

    fn redraw_border(&mut self, border: &BorderDecoration) {
        send(&self.window, "region-border", border.clone());
    }
}

pub struct TauriResultSurface {
    window: WebviewWindow,
}

impl TauriResultSurface {
    pub fn new(window: WebviewWindow) -> Self {
        Self { window }
    }
}

impl ResultSurface for TauriResultSurface {
    fn set_title(&mut self, title: &str) {
        if let Err(e) = self.window.set_title(title) {
            log::debug!("[SHELL] set_title failed: {}", e);
        }
        send(&self.window, "result-title", title.to_string());
    }

    fn set_text(&mut self, text: &str) {
        send(&self.window, "result-text", text.to_string());
    }

    fn set_visible(&mut self, visible: bool) {
        let result = if visible {
            self.window.show()
        } else {
            self.window.hide()
        };
        if let Err(e) = result {
            log::warn!("[SHELL] Failed to toggle result window: {}", e);
        }
    }

    fn set_opacity(&mut self, opacity: f32) {
        send(&self.window, "result-opacity", opacity);
    }

    fn set_geometry(&mut self, rect: Rect) {
        place(&self.window, rect);
    }

    fn apply_style(&mut self, style: &SurfaceStyle) {
        send(&self.window, "result-style", style.clone());
    }
}
