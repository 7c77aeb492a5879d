//! Capture → recognize → translate → display.
//!
//! `CapturePipeline` lives on the event loop and owns the status and the
//! capture history. Each accepted capture request produces a [`CycleJob`]:
//! a self-contained, `Send` unit of blocking work (grab, OCR, translate)
//! that the caller runs off the loop. The job reports stage changes through
//! a callback and returns a [`CycleOutcome`], which goes back to
//! [`CapturePipeline::finish`] for display and archiving.

use crate::capture::{CaptureError, ScreenGrabber};
use crate::config::AppConfig;
use crate::geometry::Rect;
use crate::history::{CaptureHistory, CaptureRecord, HistoryError, TranslationLog};
use crate::ocr::{OcrEngine, OcrError};
use crate::presenter::ResultPresenter;
use crate::translate::{TranslationError, Translator};
use chrono::{DateTime, Local};
use image::DynamicImage;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub const CAPTURING_STATUS: &str = "Capturing…";
pub const TRANSLATING_STATUS: &str = "Translating…";
pub const NO_TEXT_MESSAGE: &str = "No Text Detected";
/// Prefix of the message shown when a cycle dies without reporting back.
pub const CYCLE_ABORTED: &str = "Capture aborted";

/// Pause between hiding the result panel and grabbing the screen, so the
/// panel is gone from the frame being captured.
pub const HIDE_SETTLE_DELAY: Duration = Duration::from_millis(100);

const IMAGE_NAME_FORMAT: &str = "capture_%Y%m%d_%H%M%S.png";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStatus {
    Idle,
    Capturing,
    Recognizing,
    Translating,
    Displaying,
    Error,
}

/// A failed stage. The message is what the user sees.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Ocr(#[from] OcrError),

    #[error(transparent)]
    Translation(#[from] TranslationError),

    #[error("Failed to save capture image: {0}")]
    SaveImage(#[from] image::ImageError),

    #[error("Failed to create image directory: {0}")]
    ImageDir(#[from] std::io::Error),
}

/// The external services a cycle calls into.
#[derive(Clone)]
pub struct Collaborators {
    pub grabber: Arc<dyn ScreenGrabber>,
    pub ocr: Arc<dyn OcrEngine>,
    pub translator: Arc<dyn Translator>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleResult {
    NoText,
    Translated(String),
    Failed(String),
}

impl CycleResult {
    pub fn display_text(&self) -> &str {
        match self {
            CycleResult::NoText => NO_TEXT_MESSAGE,
            CycleResult::Translated(text) | CycleResult::Failed(text) => text,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CycleOutcome {
    pub record: CaptureRecord,
    pub result: CycleResult,
    /// `dev_mode` as it was when the cycle started.
    pub dev_mode: bool,
}

impl CycleOutcome {
    /// The outcome of a job that never returned (it panicked or was
    /// cancelled). Recorded like any other stage failure.
    pub fn aborted(dev_mode: bool, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut record = CaptureRecord::new(Local::now());
        record.error = Some(message.clone());
        Self {
            record,
            result: CycleResult::Failed(message),
            dev_mode,
        }
    }
}

/// The blocking part of one capture cycle.
pub struct CycleJob {
    rect: Rect,
    dev_mode: bool,
    source: String,
    target: String,
    images_dir: PathBuf,
    translation_log: TranslationLog,
    collaborators: Collaborators,
    settle: Duration,
}

impl CycleJob {
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn dev_mode(&self) -> bool {
        self.dev_mode
    }

    /// Runs the cycle to completion. `report` is told when recognition and
    /// translation start.
    pub fn run(self, report: &mut dyn FnMut(PipelineStatus)) -> CycleOutcome {
        let start = Instant::now();
        if !self.settle.is_zero() {
            std::thread::sleep(self.settle);
        }

        let grabbed = self.collaborators.grabber.grab(self.rect);
        let at = Local::now();
        let mut record = CaptureRecord::new(at);

        let result = match grabbed {
            Ok(image) => {
                report(PipelineStatus::Recognizing);
                self.process(&image, at, &mut record, report)
            }
            Err(e) => Err(e.into()),
        };

        let result = result.unwrap_or_else(|e| {
            let message = e.to_string();
            log::error!("[PIPELINE] Cycle failed: {}", message);
            record.error = Some(message.clone());
            CycleResult::Failed(message)
        });

        log::info!(
            "[PIPELINE] Cycle finished in {}ms ({})",
            start.elapsed().as_millis(),
            match &result {
                CycleResult::NoText => "no text",
                CycleResult::Translated(_) => "translated",
                CycleResult::Failed(_) => "failed",
            }
        );

        CycleOutcome {
            record,
            result,
            dev_mode: self.dev_mode,
        }
    }

    fn process(
        &self,
        image: &DynamicImage,
        at: DateTime<Local>,
        record: &mut CaptureRecord,
        report: &mut dyn FnMut(PipelineStatus),
    ) -> Result<CycleResult, PipelineError> {
        if self.dev_mode {
            let path = self.save_image(image, at)?;
            record.image_path = Some(path.display().to_string());
        }

        let ocr_start = Instant::now();
        let text = self.collaborators.ocr.recognize(image)?.trim().to_string();
        log::info!(
            "[PIPELINE] OCR: {} chars in {}ms",
            text.chars().count(),
            ocr_start.elapsed().as_millis()
        );
        record.detected_text = text.clone();

        if text.is_empty() {
            return Ok(CycleResult::NoText);
        }

        report(PipelineStatus::Translating);
        let translated = self
            .collaborators
            .translator
            .translate(&text, &self.source, &self.target)?;
        record.translated_text = translated.clone();

        if let Err(e) = self.translation_log.append(Local::now(), &text, &translated) {
            log::warn!(
                "[PIPELINE] Could not append to {}: {}",
                self.translation_log.path().display(),
                e
            );
        }

        Ok(CycleResult::Translated(translated))
    }

    fn save_image(
        &self,
        image: &DynamicImage,
        at: DateTime<Local>,
    ) -> Result<PathBuf, PipelineError> {
        std::fs::create_dir_all(&self.images_dir)?;
        let path = self.images_dir.join(at.format(IMAGE_NAME_FORMAT).to_string());
        image.save(&path)?;
        log::debug!("[PIPELINE] Saved capture to {}", path.display());
        Ok(path)
    }
}

pub struct CapturePipeline {
    status: PipelineStatus,
    history: CaptureHistory,
    translation_log: TranslationLog,
    images_dir: PathBuf,
    collaborators: Collaborators,
    settle: Duration,
}

impl CapturePipeline {
    pub fn new(
        collaborators: Collaborators,
        history: CaptureHistory,
        translation_log: TranslationLog,
        images_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            status: PipelineStatus::Idle,
            history,
            translation_log,
            images_dir: images_dir.into(),
            collaborators,
            settle: HIDE_SETTLE_DELAY,
        }
    }

    /// Overrides the pause between hiding the panel and grabbing.
    pub fn with_settle_delay(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    pub fn status(&self) -> PipelineStatus {
        self.status
    }

    pub fn is_idle(&self) -> bool {
        self.status == PipelineStatus::Idle
    }

    pub fn history(&self) -> &CaptureHistory {
        &self.history
    }

    /// Starts a cycle over `rect`. Returns `None`, changing nothing, if a
    /// cycle is already in flight.
    pub fn capture(
        &mut self,
        rect: Rect,
        config: &AppConfig,
        presenter: &mut ResultPresenter,
    ) -> Option<CycleJob> {
        if !self.is_idle() {
            log::info!("[PIPELINE] Capture ignored, cycle already {:?}", self.status);
            return None;
        }

        self.status = PipelineStatus::Capturing;
        presenter.show_progress(CAPTURING_STATUS);
        presenter.hide();
        log::info!(
            "[PIPELINE] Capturing {}x{} at {},{}",
            rect.width,
            rect.height,
            rect.x,
            rect.y
        );

        Some(CycleJob {
            rect,
            dev_mode: config.dev_mode,
            source: config.translation.source.clone(),
            target: config.translation.target.clone(),
            images_dir: self.images_dir.clone(),
            translation_log: self.translation_log.clone(),
            collaborators: self.collaborators.clone(),
            settle: self.settle,
        })
    }

    /// Applies a stage change reported by a running job.
    pub fn advance(&mut self, status: PipelineStatus, presenter: &mut ResultPresenter) {
        if self.is_idle() {
            return;
        }
        self.status = status;
        match status {
            PipelineStatus::Recognizing => presenter.show(),
            PipelineStatus::Translating => presenter.show_progress(TRANSLATING_STATUS),
            _ => {}
        }
    }

    /// Displays a finished cycle, archives it in dev mode, and returns to
    /// `Idle`.
    pub fn finish(&mut self, outcome: CycleOutcome, presenter: &mut ResultPresenter) {
        self.status = match outcome.result {
            CycleResult::Failed(_) => PipelineStatus::Error,
            CycleResult::Translated(_) => PipelineStatus::Displaying,
            CycleResult::NoText => self.status,
        };

        presenter.show();
        presenter.display(outcome.result.display_text());

        if outcome.dev_mode {
            if let Err(e) = self.history.append(outcome.record) {
                log::error!("[HISTORY] Failed to save {}: {}", self.history.path().display(), e);
            }
        }

        self.status = PipelineStatus::Idle;
    }

    /// Writes the capture history, as done on quit.
    pub fn save_history(&self) -> Result<(), HistoryError> {
        self.history.save()
    }
}
