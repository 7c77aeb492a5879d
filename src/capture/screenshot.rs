//! Screen capture using the `xcap` crate.
//!
//! This is the infrastructure layer: it talks to the OS. The monitor under
//! the region's top-left corner is captured whole, then cropped.

use super::{crop_to_region, CaptureError, ScreenGrabber};
use crate::geometry::{Point, Rect};
use image::DynamicImage;
use xcap::Monitor;

#[derive(Debug, Default, Clone, Copy)]
pub struct XcapGrabber;

impl XcapGrabber {
    pub fn new() -> Self {
        Self
    }
}

impl ScreenGrabber for XcapGrabber {
    fn grab(&self, rect: Rect) -> Result<DynamicImage, CaptureError> {
        let monitor = monitor_for(rect)?;
        let origin = Point::new(
            monitor.x().map_err(|e| CaptureError::MonitorEnumeration(e.to_string()))?,
            monitor.y().map_err(|e| CaptureError::MonitorEnumeration(e.to_string()))?,
        );

        let screen = monitor
            .capture_image()
            .map_err(|e| CaptureError::CaptureFailed(e.to_string()))?;

        Ok(crop_to_region(&DynamicImage::ImageRgba8(screen), origin, rect)?)
    }
}

fn monitor_for(rect: Rect) -> Result<Monitor, CaptureError> {
    if let Ok(monitor) = Monitor::from_point(rect.x, rect.y) {
        return Ok(monitor);
    }

    // Region corner is off every monitor: fall back to the primary one.
    let monitors = Monitor::all().map_err(|e| CaptureError::MonitorEnumeration(e.to_string()))?;
    let mut fallback = None;
    for monitor in monitors {
        if monitor.is_primary().unwrap_or(false) {
            return Ok(monitor);
        }
        fallback.get_or_insert(monitor);
    }
    fallback.ok_or(CaptureError::NoMonitor)
}
