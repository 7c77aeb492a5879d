//! OCR via the `tesseract` command-line tool.
//!
//! The capture is piped to `tesseract stdin stdout` as PNG; recognized text
//! comes back on stdout. Nothing touches the filesystem.

use super::{OcrEngine, OcrError};
use crate::capture::encode_png;
use image::DynamicImage;
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Instant;

/// Environment variable naming the tesseract executable explicitly.
pub const TESSERACT_CMD_ENV: &str = "TESSERACT_CMD";

#[derive(Debug, Clone)]
pub struct TesseractOcr {
    command: PathBuf,
    language: Option<String>,
}

impl TesseractOcr {
    /// Finds tesseract via `TESSERACT_CMD` or on `PATH`.
    pub fn locate() -> Result<Self, OcrError> {
        let command = resolve_command(std::env::var_os(TESSERACT_CMD_ENV))
            .ok_or(OcrError::EngineNotFound)?;
        log::info!("[OCR] Using {}", command.display());
        Ok(Self::with_command(command))
    }

    pub fn with_command(command: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            language: None,
        }
    }

    /// Restricts recognition to a tesseract language pack (e.g. `eng`).
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn command(&self) -> &Path {
        &self.command
    }
}

fn resolve_command(explicit: Option<OsString>) -> Option<PathBuf> {
    match explicit {
        Some(cmd) if !cmd.is_empty() => Some(PathBuf::from(cmd)),
        _ => which::which("tesseract").ok(),
    }
}

impl OcrEngine for TesseractOcr {
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError> {
        let start = Instant::now();
        let png = encode_png(image)?;

        let mut command = Command::new(&self.command);
        command.arg("stdin").arg("stdout");
        if let Some(language) = &self.language {
            command.arg("-l").arg(language);
        }

        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(&png)?;
        }
        let output = child.wait_with_output()?;

        if !output.status.success() {
            return Err(OcrError::EngineFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        log::info!(
            "[OCR] {}x{} image -> {} chars in {}ms",
            image.width(),
            image.height(),
            text.trim().chars().count(),
            start.elapsed().as_millis()
        );
        Ok(text)
    }
}
