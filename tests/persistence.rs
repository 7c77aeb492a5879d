//! Window geometry, configuration reloads and shutdown, driven through
//! the event loop.

mod common;

use common::{open, state_dir, FakeTranslator, Fakes};
use filetime::FileTime;
use ocr_overlay_lib::app::{AppEvent, PointerPhase, SurfaceKind};
use ocr_overlay_lib::config::AppConfig;
use ocr_overlay_lib::geometry::{Point, Pointer, Rect};
use ocr_overlay_lib::presenter::Intent;
use std::path::Path;
use std::time::Duration;

fn pointer(
    target: SurfaceKind,
    phase: PointerPhase,
    local: (i32, i32),
    screen: (i32, i32),
) -> AppEvent {
    AppEvent::Pointer {
        target,
        phase,
        pointer: Pointer::new(Point::new(local.0, local.1), Point::new(screen.0, screen.1)),
    }
}

fn bump_mtime(path: &Path, secs_ahead: i64) {
    let now = FileTime::now();
    let later = FileTime::from_unix_time(now.unix_seconds() + secs_ahead, 0);
    filetime::set_file_mtime(path, later).unwrap();
}

fn fakes() -> Fakes {
    Fakes::new("Hello", FakeTranslator::answering("Halo"))
}

#[tokio::test]
async fn first_run_uses_default_placement() {
    let (_dir, paths) = state_dir();
    let h = open(&paths, &fakes());

    assert_eq!(h.app.region().rect(), Rect::new(760, 440, 400, 200));
    assert_eq!(h.app.presenter().rect(), Rect::new(100, 100, 400, 200));
}

#[tokio::test]
async fn dragged_windows_reopen_where_they_were_left() {
    let (_dir, paths) = state_dir();
    let fakes = fakes();
    let mut h = open(&paths, &fakes);

    // Move the region by (-60, -40).
    h.app.handle(pointer(SurfaceKind::Region, PointerPhase::Press, (200, 100), (960, 540)));
    h.app.handle(pointer(SurfaceKind::Region, PointerPhase::Drag, (200, 100), (900, 500)));
    h.app.handle(pointer(SurfaceKind::Region, PointerPhase::Release, (200, 100), (900, 500)));

    // Widen the result panel from its right edge.
    h.app.handle(pointer(SurfaceKind::Result, PointerPhase::Press, (398, 100), (498, 200)));
    h.app.handle(pointer(SurfaceKind::Result, PointerPhase::Drag, (398, 100), (548, 200)));
    h.app.handle(pointer(SurfaceKind::Result, PointerPhase::Release, (398, 100), (548, 200)));

    let region = h.app.region().rect();
    let panel = h.app.presenter().rect();
    assert_eq!(region, Rect::new(700, 400, 400, 200));
    assert_eq!(panel, Rect::new(100, 100, 450, 200));
    drop(h);

    let reopened = open(&paths, &fakes);
    assert_eq!(reopened.app.region().rect(), region);
    assert_eq!(reopened.app.presenter().rect(), panel);
}

#[tokio::test]
async fn undersized_resize_keeps_that_axis() {
    let (_dir, paths) = state_dir();
    let mut h = open(&paths, &fakes());

    // Bottom-right corner: shrink width by 350 (too far), height by 50.
    h.app.handle(pointer(SurfaceKind::Region, PointerPhase::Press, (395, 195), (1155, 635)));
    h.app.handle(pointer(SurfaceKind::Region, PointerPhase::Drag, (45, 145), (805, 585)));

    assert_eq!(h.app.region().rect(), Rect::new(760, 440, 400, 150));
    let borders = &h.region.lock().unwrap().borders;
    assert_eq!(borders.last().unwrap().height, 150);
}

#[tokio::test]
async fn undersized_saved_geometry_reopens_at_minimum_and_still_captures() {
    let (_dir, paths) = state_dir();
    std::fs::create_dir_all(paths.base()).unwrap();
    std::fs::write(
        paths.geometry_file(),
        r#"{
    "region": { "x": 10, "y": 10, "width": -40, "height": 20 },
    "result": { "x": 0, "y": 0, "width": 5, "height": 5 }
}"#,
    )
    .unwrap();
    let fakes = fakes();
    let mut h = open(&paths, &fakes);

    assert_eq!(h.app.region().rect(), Rect::new(10, 10, 100, 100));
    assert_eq!(h.app.presenter().rect(), Rect::new(0, 0, 200, 100));

    h.capture().await;
    assert_eq!(h.app.presenter().text(), "Halo");
    assert_eq!(*fakes.screen.grabs.lock().unwrap(), [Rect::new(10, 10, 100, 100)]);
}

#[tokio::test]
async fn malformed_config_at_startup_falls_back_and_is_rewritten() {
    let (_dir, paths) = state_dir();
    std::fs::create_dir_all(paths.base()).unwrap();
    std::fs::write(paths.config_file(), "{ \"dev_mode\": ").unwrap();

    let h = open(&paths, &fakes());

    assert_eq!(*h.app.config(), AppConfig::default());
    let on_disk: AppConfig =
        serde_json::from_str(&std::fs::read_to_string(paths.config_file()).unwrap()).unwrap();
    assert_eq!(on_disk, AppConfig::default());
}

#[tokio::test]
async fn config_edit_applies_without_reopening_windows() {
    let (_dir, paths) = state_dir();
    let fakes = fakes();
    let mut h = open(&paths, &fakes);
    let placements_before = h.result.lock().unwrap().geometry.len();

    std::fs::write(
        paths.config_file(),
        r#"{ "text": { "font_size": 30 }, "translation": { "source": "en", "target": "ja" } }"#,
    )
    .unwrap();
    bump_mtime(&paths.config_file(), 5);
    h.app.handle(AppEvent::ConfigTick);

    assert_eq!(h.app.config().translation.target, "ja");
    {
        let shown = h.result.lock().unwrap();
        assert_eq!(shown.styles.last().unwrap().font_size, 30);
        assert_eq!(shown.geometry.len(), placements_before);
    }

    h.capture().await;
    let calls = fakes.translator.calls.lock().unwrap().clone();
    assert_eq!(calls[0].1, "en");
    assert_eq!(calls[0].2, "ja");
}

#[tokio::test]
async fn broken_edit_keeps_running_settings() {
    let (_dir, paths) = state_dir();
    let mut h = open(&paths, &fakes());

    std::fs::write(paths.config_file(), "not json").unwrap();
    bump_mtime(&paths.config_file(), 5);
    h.app.handle(AppEvent::ConfigTick);

    assert_eq!(*h.app.config(), AppConfig::default());
}

#[tokio::test]
async fn focus_changes_panel_opacity() {
    let (_dir, paths) = state_dir();
    let mut h = open(&paths, &fakes());

    h.app.handle(AppEvent::Focus(false));
    assert_eq!(h.app.presenter().opacity(), 0.8);
    h.app.handle(AppEvent::Focus(true));
    assert_eq!(h.app.presenter().opacity(), 1.0);
    assert!(h.app.pipeline().is_idle());
}

#[tokio::test]
async fn quit_saves_state_and_stops_the_loop() {
    let (_dir, paths) = state_dir();
    let fakes = fakes();
    let h = open(&paths, &fakes);
    let sender = h.sender.clone();

    let event_loop = tokio::spawn(h.app.run(h.events));
    sender.send(AppEvent::Intent(Intent::Capture)).unwrap();
    sender.send(AppEvent::Intent(Intent::Quit)).unwrap();

    tokio::time::timeout(Duration::from_secs(5), event_loop)
        .await
        .expect("event loop did not stop")
        .unwrap();

    let geometry = std::fs::read_to_string(paths.geometry_file()).unwrap();
    assert!(geometry.contains("\"region\""));
    assert!(geometry.contains("\"result\""));
    assert!(paths.history_file().exists());
}
