//! System tray icon and menu.
//!
//! Left-click captures, the same as the panel's Capture button. The menu
//! carries Quit, which goes through the normal save-and-exit path.

use super::commands::EventSender;
use crate::app::AppEvent;
use crate::presenter::Intent;
use tauri::{
    image::Image as TauriImage,
    menu::{MenuBuilder, MenuItemBuilder},
    tray::TrayIconBuilder,
    AppHandle, Manager,
};

pub fn setup_tray(app: &AppHandle) -> Result<(), Box<dyn std::error::Error>> {
    let capture_item = MenuItemBuilder::with_id("capture", "Capture").build(app)?;
    let quit_item = MenuItemBuilder::with_id("quit", "Quit OCR Overlay").build(app)?;
    let menu = MenuBuilder::new(app)
        .item(&capture_item)
        .separator()
        .item(&quit_item)
        .build()?;

    // Decode the PNG icon to RGBA for Tauri's Image type
    let icon_bytes = include_bytes!("../../icons/32x32.png");
    let icon_img = image::load_from_memory(icon_bytes)
        .map_err(|e| format!("Failed to decode tray icon: {}", e))?;
    let rgba = icon_img.to_rgba8();
    let (w, h) = (rgba.width(), rgba.height());
    let tray_icon = TauriImage::new_owned(rgba.into_raw(), w, h);

    let _tray = TrayIconBuilder::new()
        .icon(tray_icon)
        .tooltip("OCR Overlay: click to capture")
        .menu(&menu)
        .show_menu_on_left_click(false)
        .on_tray_icon_event(|tray_icon, event| {
            if let tauri::tray::TrayIconEvent::Click {
                button: tauri::tray::MouseButton::Left,
                button_state: tauri::tray::MouseButtonState::Up,
                ..
            } = event
            {
                log::info!("[SHELL] Tray clicked, capturing");
                forward(tray_icon.app_handle(), Intent::Capture);
            }
        })
        .on_menu_event(|app, event| match event.id().as_ref() {
            "capture" => forward(app, Intent::Capture),
            "quit" => {
                log::info!("[SHELL] Quit requested from tray menu");
                forward(app, Intent::Quit);
            }
            _ => {}
        })
        .build(app)?;

    Ok(())
}

fn forward(app: &AppHandle, intent: Intent) {
    if let Err(e) = app.state::<EventSender>().send(AppEvent::Intent(intent)) {
        log::error!("[SHELL] Event loop is gone: {}", e);
    }
}
