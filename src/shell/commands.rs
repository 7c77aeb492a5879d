//! Tauri command handlers: the pages' way into the event loop.

use crate::app::{AppEvent, PointerPhase, SurfaceKind};
use crate::geometry::{Point, Pointer};
use crate::presenter::Intent;
use tokio::sync::mpsc::UnboundedSender;

/// Managed state: the sending half of the event loop's channel.
pub struct EventSender(pub UnboundedSender<AppEvent>);

impl EventSender {
    pub fn send(&self, event: AppEvent) -> Result<(), String> {
        self.0.send(event).map_err(|e| e.to_string())
    }
}

/// Tauri command: a mouse press, drag sample or release on one of the
/// windows. Coordinates are physical pixels.
#[tauri::command]
pub fn pointer_event(
    state: tauri::State<'_, EventSender>,
    target: SurfaceKind,
    phase: PointerPhase,
    local_x: i32,
    local_y: i32,
    screen_x: i32,
    screen_y: i32,
) -> Result<(), String> {
    state.send(AppEvent::Pointer {
        target,
        phase,
        pointer: Pointer::new(Point::new(local_x, local_y), Point::new(screen_x, screen_y)),
    })
}

/// Tauri command: the result panel's Capture or Quit button.
#[tauri::command]
pub fn user_intent(state: tauri::State<'_, EventSender>, intent: Intent) -> Result<(), String> {
    log::info!("[SHELL] Intent: {:?}", intent);
    state.send(AppEvent::Intent(intent))
}
