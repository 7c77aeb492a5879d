//! Fakes for the window system, OCR and translation, plus a harness that
//! runs a real `App` against a temporary state directory.

#![allow(dead_code)]

use image::{DynamicImage, RgbaImage};
use ocr_overlay_lib::app::{App, AppEvent, PipelineEvent, Surfaces};
use ocr_overlay_lib::capture::{CaptureError, ScreenGrabber};
use ocr_overlay_lib::geometry::{Rect, Size};
use ocr_overlay_lib::ocr::{OcrEngine, OcrError};
use ocr_overlay_lib::paths::AppPaths;
use ocr_overlay_lib::pipeline::Collaborators;
use ocr_overlay_lib::presenter::{Intent, ResultSurface, SurfaceStyle};
use ocr_overlay_lib::region::{BorderDecoration, RegionSurface};
use ocr_overlay_lib::translate::{TranslationError, Translator};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

pub const SCREEN: Size = Size {
    width: 1920,
    height: 1080,
};

// ── Collaborators ───────────────────────────────────────────────────

/// Returns a blank image of the requested size. Optionally waits for a
/// signal before returning, to hold a cycle in flight, or panics after
/// logging the grab.
#[derive(Default)]
pub struct FakeScreen {
    pub grabs: Mutex<Vec<Rect>>,
    gate: Mutex<Option<mpsc::Receiver<()>>>,
    panics: bool,
}

impl FakeScreen {
    pub fn gated() -> (Self, mpsc::Sender<()>) {
        let (tx, rx) = mpsc::channel();
        let screen = Self {
            gate: Mutex::new(Some(rx)),
            ..Self::default()
        };
        (screen, tx)
    }

    pub fn panicking() -> Self {
        Self {
            panics: true,
            ..Self::default()
        }
    }
}

impl ScreenGrabber for FakeScreen {
    fn grab(&self, rect: Rect) -> Result<DynamicImage, CaptureError> {
        if let Some(gate) = self.gate.lock().unwrap().as_ref() {
            let _ = gate.recv_timeout(Duration::from_secs(5));
        }
        self.grabs.lock().unwrap().push(rect);
        if self.panics {
            panic!("display connection lost");
        }
        Ok(DynamicImage::ImageRgba8(RgbaImage::new(
            rect.width as u32,
            rect.height as u32,
        )))
    }
}

/// Answers with fixed text, or fails the way a crashed engine would.
pub struct FakeOcr {
    pub calls: AtomicUsize,
    reply: Result<String, String>,
}

impl FakeOcr {
    pub fn reading(text: &str) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            reply: Ok(text.to_string()),
        }
    }

    pub fn crashing(stderr: &str) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            reply: Err(stderr.to_string()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl OcrEngine for FakeOcr {
    fn recognize(&self, _image: &DynamicImage) -> Result<String, OcrError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone().map_err(|stderr| OcrError::EngineFailed {
            status: "exit status: 1".to_string(),
            stderr,
        })
    }
}

/// Records every call; answers with a fixed translation or a fixed error.
pub struct FakeTranslator {
    pub calls: Mutex<Vec<(String, String, String)>>,
    reply: Result<String, String>,
}

impl FakeTranslator {
    pub fn answering(text: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            reply: Ok(text.to_string()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            reply: Err(message.to_string()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Translator for FakeTranslator {
    fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, TranslationError> {
        self.calls
            .lock()
            .unwrap()
            .push((text.to_string(), source.to_string(), target.to_string()));
        self.reply.clone().map_err(TranslationError::Backend)
    }
}

// ── Surfaces ────────────────────────────────────────────────────────

#[derive(Default)]
pub struct RegionLog {
    pub geometry: Vec<Rect>,
    pub borders: Vec<BorderDecoration>,
}

pub struct FakeRegion(pub Arc<Mutex<RegionLog>>);

impl RegionSurface for FakeRegion {
    fn set_geometry(&mut self, rect: Rect) {
        self.0.lock().unwrap().geometry.push(rect);
    }

    fn redraw_border(&mut self, border: &BorderDecoration) {
        self.0.lock().unwrap().borders.push(border.clone());
    }
}

#[derive(Default)]
pub struct ResultLog {
    pub titles: Vec<String>,
    pub texts: Vec<String>,
    pub visible: Vec<bool>,
    pub opacity: Vec<f32>,
    pub geometry: Vec<Rect>,
    pub styles: Vec<SurfaceStyle>,
}

pub struct FakeResult(pub Arc<Mutex<ResultLog>>);

impl ResultSurface for FakeResult {
    fn set_title(&mut self, title: &str) {
        self.0.lock().unwrap().titles.push(title.to_string());
    }

    fn set_text(&mut self, text: &str) {
        self.0.lock().unwrap().texts.push(text.to_string());
    }

    fn set_visible(&mut self, visible: bool) {
        self.0.lock().unwrap().visible.push(visible);
    }

    fn set_opacity(&mut self, opacity: f32) {
        self.0.lock().unwrap().opacity.push(opacity);
    }

    fn set_geometry(&mut self, rect: Rect) {
        self.0.lock().unwrap().geometry.push(rect);
    }

    fn apply_style(&mut self, style: &SurfaceStyle) {
        self.0.lock().unwrap().styles.push(style.clone());
    }
}

// ── Harness ─────────────────────────────────────────────────────────

pub struct Harness {
    pub app: App,
    pub events: UnboundedReceiver<AppEvent>,
    pub sender: UnboundedSender<AppEvent>,
    pub region: Arc<Mutex<RegionLog>>,
    pub result: Arc<Mutex<ResultLog>>,
}

pub struct Fakes {
    pub screen: Arc<FakeScreen>,
    pub ocr: Arc<FakeOcr>,
    pub translator: Arc<FakeTranslator>,
}

impl Fakes {
    pub fn new(ocr_text: &str, translator: FakeTranslator) -> Self {
        Self {
            screen: Arc::new(FakeScreen::default()),
            ocr: Arc::new(FakeOcr::reading(ocr_text)),
            translator: Arc::new(translator),
        }
    }

    pub fn with_screen(mut self, screen: FakeScreen) -> Self {
        self.screen = Arc::new(screen);
        self
    }

    pub fn with_ocr(mut self, ocr: FakeOcr) -> Self {
        self.ocr = Arc::new(ocr);
        self
    }

    fn collaborators(&self) -> Collaborators {
        Collaborators {
            grabber: self.screen.clone(),
            ocr: self.ocr.clone(),
            translator: self.translator.clone(),
        }
    }
}

pub fn state_dir() -> (TempDir, AppPaths) {
    let dir = tempfile::tempdir().unwrap();
    let paths = AppPaths::new(dir.path());
    (dir, paths)
}

pub fn open(paths: &AppPaths, fakes: &Fakes) -> Harness {
    let region = Arc::new(Mutex::new(RegionLog::default()));
    let result = Arc::new(Mutex::new(ResultLog::default()));
    let (sender, events) = unbounded_channel();

    let surfaces = Surfaces {
        region: Box::new(FakeRegion(Arc::clone(&region))),
        result: Box::new(FakeResult(Arc::clone(&result))),
        screen: SCREEN,
    };
    let app = App::new(paths, surfaces, fakes.collaborators(), sender.clone())
        .with_settle_delay(Duration::ZERO);

    Harness {
        app,
        events,
        sender,
        region,
        result,
    }
}

impl Harness {
    /// Requests a capture and pumps pipeline events until the cycle
    /// finishes.
    pub async fn capture(&mut self) {
        self.app.handle(AppEvent::Intent(Intent::Capture));
        self.drain_cycle().await;
    }

    /// Pumps events until a cycle's `Finished` event has been handled.
    pub async fn drain_cycle(&mut self) {
        loop {
            let event = tokio::time::timeout(Duration::from_secs(5), self.events.recv())
                .await
                .expect("pipeline did not report in time")
                .expect("event channel closed");
            let finished = matches!(event, AppEvent::Pipeline(PipelineEvent::Finished(_)));
            self.app.handle(event);
            if finished {
                return;
            }
        }
    }
}
