//! Screen capture domain: public API.
//!
//! The pipeline only sees the [`ScreenGrabber`] trait. The `xcap`-backed
//! implementation lives behind the `desktop` feature; the crop step it
//! relies on is pure and always available.

mod region;
#[cfg(feature = "desktop")]
mod screenshot;

pub use region::{crop_to_region, encode_png, CropError};
#[cfg(feature = "desktop")]
pub use screenshot::XcapGrabber;

use crate::geometry::Rect;
use image::DynamicImage;

/// Grabs the pixels currently shown inside a screen rectangle.
pub trait ScreenGrabber: Send + Sync {
    /// Returns an image of exactly `rect.width × rect.height` pixels.
    fn grab(&self, rect: Rect) -> Result<DynamicImage, CaptureError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Failed to enumerate monitors: {0}")]
    MonitorEnumeration(String),

    #[error("No monitor contains the capture region")]
    NoMonitor,

    #[error("Screen capture failed: {0}")]
    CaptureFailed(String),

    #[error(transparent)]
    Crop(#[from] CropError),
}
