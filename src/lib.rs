//! OCR Overlay: a draggable capture region whose contents are read with
//! OCR, translated, and shown in a companion panel.
//!
//! The library is the whole application minus the window system:
//! - `geometry` / `region` / `presenter`: the two windows' state
//! - `pipeline`: capture → OCR → translate → display
//! - `config` / `history` / `paths`: everything kept on disk
//! - `app`: the event loop tying them together
//!
//! The Tauri shell (feature `desktop`) supplies real windows and calls
//! [`run`].

pub mod app;
pub mod capture;
pub mod config;
pub mod geometry;
pub mod history;
pub mod ocr;
pub mod paths;
pub mod pipeline;
pub mod presenter;
pub mod region;
pub mod translate;

mod storage;

#[cfg(feature = "desktop")]
mod shell;

#[cfg(feature = "desktop")]
pub use shell::run;
