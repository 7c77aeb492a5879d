//! Build script.
//!
//! Tauri code generation only runs for the desktop shell; the headless
//! library needs no build step.

fn main() {
    #[cfg(feature = "desktop")]
    tauri_build::build();
}
