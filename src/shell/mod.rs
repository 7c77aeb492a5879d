//! Desktop shell: Tauri windows, tray, and command handlers.
//!
//! This is the app shell that wires together:
//! - the region and result windows (surfaces.rs)
//! - Tauri commands carrying pointer input and intents (commands.rs)
//! - the system tray (tray.rs)
//! - the event loop in `crate::app`, spawned on Tauri's async runtime

mod commands;
mod surfaces;
mod tray;

use crate::app::{App, AppEvent, SurfaceKind, Surfaces};
use crate::capture::XcapGrabber;
use crate::geometry::{Rect, Size};
use crate::ocr::TesseractOcr;
use crate::paths::AppPaths;
use crate::pipeline::Collaborators;
use crate::presenter::Intent;
use crate::translate::GoogleTranslator;
use commands::EventSender;
use std::sync::Arc;
use surfaces::{TauriRegionSurface, TauriResultSurface, REGION_LABEL, RESULT_LABEL};
use tauri::{AppHandle, WebviewUrl, WebviewWindow, WebviewWindowBuilder, WindowEvent};
use tokio::sync::mpsc::UnboundedSender;

/// Used when the window system cannot report a primary monitor.
const FALLBACK_SCREEN: Size = Size {
    width: 1920,
    height: 1080,
};

/// Entry point, called from `main`.
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    env_logger::init();
    if let Ok(path) = dotenvy::dotenv() {
        log::info!("Loaded environment from {}", path.display());
    }

    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();

    let result = tauri::Builder::default()
        .manage(EventSender(tx.clone()))
        .invoke_handler(tauri::generate_handler![
            commands::pointer_event,
            commands::user_intent
        ])
        .setup(move |app| {
            let paths = AppPaths::from_env();
            log::info!("OCR Overlay starting up (state in {})", paths.base().display());

            let handle = app.handle().clone();
            let region = build_window(&handle, REGION_LABEL, "region.html", "Capture Region")?;
            let result = build_window(&handle, RESULT_LABEL, "result.html", "Translation Result")?;
            forward_window_events(&region, SurfaceKind::Region, tx.clone());
            forward_window_events(&result, SurfaceKind::Result, tx.clone());

            let ocr = TesseractOcr::locate().unwrap_or_else(|e| {
                log::error!("[OCR] {}; captures will fail until it is installed", e);
                TesseractOcr::with_command("tesseract")
            });
            let collaborators = Collaborators {
                grabber: Arc::new(XcapGrabber::new()),
                ocr: Arc::new(ocr),
                translator: Arc::new(GoogleTranslator::new()),
            };

            let surfaces = Surfaces {
                region: Box::new(TauriRegionSurface::new(region)),
                result: Box::new(TauriResultSurface::new(result)),
                screen: primary_screen(&handle),
            };
            let event_loop = App::new(&paths, surfaces, collaborators, tx.clone());

            tray::setup_tray(&handle)?;
            log::info!("System tray initialized, ready to capture");

            tauri::async_runtime::spawn(async move {
                event_loop.run(rx).await;
                handle.exit(0);
            });
            Ok(())
        })
        .run(tauri::generate_context!());

    if let Err(e) = result {
        log::error!("Error running OCR Overlay: {}", e);
        std::process::exit(1);
    }
}

fn build_window(
    app: &AppHandle,
    label: &str,
    page: &str,
    title: &str,
) -> tauri::Result<WebviewWindow> {
    WebviewWindowBuilder::new(app, label, WebviewUrl::App(page.into()))
        .title(title)
        .decorations(false)
        .transparent(true)
        .always_on_top(true)
        .skip_taskbar(true)
        .resizable(true)
        .build()
}

/// Relays window-manager geometry, focus and close events into the loop.
fn forward_window_events(
    window: &WebviewWindow,
    target: SurfaceKind,
    tx: UnboundedSender<AppEvent>,
) {
    let observed = window.clone();
    window.on_window_event(move |event| match event {
        WindowEvent::Moved(_) | WindowEvent::Resized(_) => {
            if let Some(rect) = window_rect(&observed) {
                let _ = tx.send(AppEvent::Geometry { target, rect });
            }
        }
        WindowEvent::Focused(focused) if target == SurfaceKind::Result => {
            let _ = tx.send(AppEvent::Focus(*focused));
        }
        WindowEvent::CloseRequested { api, .. } => {
            api.prevent_close();
            let _ = tx.send(AppEvent::Intent(Intent::Quit));
        }
        _ => {}
    });
}

fn window_rect(window: &WebviewWindow) -> Option<Rect> {
    let position = window.outer_position().ok()?;
    let size = window.inner_size().ok()?;
    Some(Rect::new(
        position.x,
        position.y,
        size.width as i32,
        size.height as i32,
    ))
}

fn primary_screen(app: &AppHandle) -> Size {
    match app.primary_monitor() {
        Ok(Some(monitor)) => {
            let size = monitor.size();
            Size::new(size.width as i32, size.height as i32)
        }
        _ => {
            log::warn!("[SHELL] No primary monitor reported, assuming 1920x1080");
            FALLBACK_SCREEN
        }
    }
}
