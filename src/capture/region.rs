//! Pure region cropping logic (functional core).
//!
//! This module has zero infrastructure dependencies.
//! It takes pixel data in, returns pixel data out.

use crate::geometry::{Point, Rect};
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

/// Cuts `rect` (screen coordinates) out of a monitor image whose top-left
/// pixel sits at `monitor_origin`.
///
/// Bounds are half-open, so the result is exactly `rect.width × rect.height`.
pub fn crop_to_region(
    image: &DynamicImage,
    monitor_origin: Point,
    rect: Rect,
) -> Result<DynamicImage, CropError> {
    if rect.width <= 0 || rect.height <= 0 {
        return Err(CropError::ZeroDimension);
    }

    let (img_width, img_height) = (image.width() as i64, image.height() as i64);
    let left = rect.x as i64 - monitor_origin.x as i64;
    let top = rect.y as i64 - monitor_origin.y as i64;
    let right = left + rect.width as i64;
    let bottom = top + rect.height as i64;

    if left < 0 || top < 0 || right > img_width || bottom > img_height {
        return Err(CropError::OutOfBounds {
            requested: (rect.x, rect.y, rect.width, rect.height),
            image_size: (image.width(), image.height()),
        });
    }

    Ok(image.crop_imm(
        left as u32,
        top as u32,
        rect.width as u32,
        rect.height as u32,
    ))
}

/// Encodes an image as PNG bytes.
pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>, CropError> {
    let mut png_bytes: Vec<u8> = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png_bytes), ImageFormat::Png)
        .map_err(|e| CropError::EncodingFailed(e.to_string()))?;
    Ok(png_bytes)
}

#[derive(Debug, thiserror::Error)]
pub enum CropError {
    #[error("Crop rectangle has zero width or height")]
    ZeroDimension,

    #[error(
        "Crop rectangle ({},{},{},{}) exceeds screen bounds ({}x{})",
        requested.0, requested.1, requested.2, requested.3,
        image_size.0, image_size.1
    )]
    OutOfBounds {
        requested: (i32, i32, i32, i32),
        image_size: (u32, u32),
    },

    #[error("PNG encoding failed: {0}")]
    EncodingFailed(String),
}
