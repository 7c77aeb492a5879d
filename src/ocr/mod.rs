//! Optical character recognition.
//!
//! The pipeline calls [`OcrEngine::recognize`] on the cropped capture and
//! trims the result itself; engines return whatever text they found.

mod tesseract;

pub use tesseract::{TesseractOcr, TESSERACT_CMD_ENV};

use image::DynamicImage;

pub trait OcrEngine: Send + Sync {
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError>;
}

#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("Tesseract executable not found (install it or set TESSERACT_CMD)")]
    EngineNotFound,

    #[error("Failed to prepare image for OCR: {0}")]
    Encode(#[from] crate::capture::CropError),

    #[error("Failed to run OCR engine: {0}")]
    Io(#[from] std::io::Error),

    #[error("OCR engine failed ({status}): {stderr}")]
    EngineFailed { status: String, stderr: String },
}
