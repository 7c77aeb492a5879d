//! The event loop.
//!
//! `App` owns every component. Window-system input, the config poll tick
//! and pipeline progress all arrive as [`AppEvent`]s on one channel and are
//! handled one at a time, so no component needs a lock. Capture cycles run
//! on tokio's blocking pool and report back through the same channel.

use crate::config::{AppConfig, ConfigWatcher, POLL_INTERVAL};
use crate::geometry::{GeometryStore, Pointer, Rect, Size};
use crate::history::{CaptureHistory, TranslationLog};
use crate::paths::AppPaths;
use crate::pipeline::{
    CapturePipeline, Collaborators, CycleJob, CycleOutcome, PipelineStatus, CYCLE_ABORTED,
};
use crate::presenter::{Intent, ResultPresenter, ResultSurface};
use crate::region::{RegionController, RegionSurface};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::time::MissedTickBehavior;

/// Which window an input event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceKind {
    Region,
    Result,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    Press,
    Drag,
    Release,
}

#[derive(Debug)]
pub enum PipelineEvent {
    Stage(PipelineStatus),
    Finished(CycleOutcome),
}

#[derive(Debug)]
pub enum AppEvent {
    Pointer {
        target: SurfaceKind,
        phase: PointerPhase,
        pointer: Pointer,
    },
    /// A window was moved or resized by something other than our drag
    /// handling (e.g. the window manager).
    Geometry { target: SurfaceKind, rect: Rect },
    Focus(bool),
    Intent(Intent),
    ConfigTick,
    Pipeline(PipelineEvent),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    Continue,
    Exit,
}

/// The two windows plus the screen they live on.
pub struct Surfaces {
    pub region: Box<dyn RegionSurface>,
    pub result: Box<dyn ResultSurface>,
    pub screen: Size,
}

pub struct App {
    config: ConfigWatcher,
    region: RegionController,
    presenter: ResultPresenter,
    pipeline: CapturePipeline,
    events: UnboundedSender<AppEvent>,
}

impl App {
    /// Loads configuration, geometry and history from `paths` and opens
    /// both windows.
    pub fn new(
        paths: &AppPaths,
        surfaces: Surfaces,
        collaborators: Collaborators,
        events: UnboundedSender<AppEvent>,
    ) -> Self {
        let config = ConfigWatcher::open(paths.config_file());
        let snapshot = config.snapshot();
        let store = GeometryStore::new(paths.geometry_file());

        let region = RegionController::new(surfaces.region, store.clone(), surfaces.screen);
        let presenter = ResultPresenter::new(surfaces.result, store, &snapshot);
        let pipeline = CapturePipeline::new(
            collaborators,
            CaptureHistory::load(paths.history_file()),
            TranslationLog::new(paths.translation_log()),
            paths.images_dir(),
        );

        log::info!(
            "[APP] Ready (dev mode {}, {} -> {})",
            if snapshot.dev_mode { "on" } else { "off" },
            snapshot.translation.source,
            snapshot.translation.target
        );

        Self {
            config,
            region,
            presenter,
            pipeline,
            events,
        }
    }

    /// Overrides the pause between hiding the panel and grabbing.
    pub fn with_settle_delay(mut self, settle: Duration) -> Self {
        self.pipeline = self.pipeline.with_settle_delay(settle);
        self
    }

    pub fn config(&self) -> Arc<AppConfig> {
        self.config.snapshot()
    }

    pub fn region(&self) -> &RegionController {
        &self.region
    }

    pub fn presenter(&self) -> &ResultPresenter {
        &self.presenter
    }

    pub fn pipeline(&self) -> &CapturePipeline {
        &self.pipeline
    }

    /// Processes events until the user quits.
    pub async fn run(mut self, mut events: UnboundedReceiver<AppEvent>) {
        let mut ticker = tokio::time::interval(POLL_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let event = tokio::select! {
                event = events.recv() => match event {
                    Some(event) => event,
                    None => break,
                },
                _ = ticker.tick() => AppEvent::ConfigTick,
            };

            if self.handle(event) == ControlFlow::Exit {
                break;
            }
        }
        log::info!("[APP] Event loop stopped");
    }

    /// Handles one event. Must be called from within a tokio runtime, since
    /// a capture request spawns blocking work.
    pub fn handle(&mut self, event: AppEvent) -> ControlFlow {
        match event {
            AppEvent::Pointer {
                target,
                phase,
                pointer,
            } => self.on_pointer(target, phase, pointer),
            AppEvent::Geometry { target, rect } => match target {
                SurfaceKind::Region => self.region.reload_geometry(rect),
                SurfaceKind::Result => self.presenter.reload_geometry(rect),
            },
            AppEvent::Focus(focused) => self.presenter.set_focused(focused),
            AppEvent::Intent(Intent::Capture) => self.start_capture(),
            AppEvent::Intent(Intent::Quit) => {
                self.shutdown();
                return ControlFlow::Exit;
            }
            AppEvent::ConfigTick => {
                if let Some(snapshot) = self.config.poll() {
                    self.presenter.apply_config(&snapshot);
                }
            }
            AppEvent::Pipeline(PipelineEvent::Stage(status)) => {
                self.pipeline.advance(status, &mut self.presenter)
            }
            AppEvent::Pipeline(PipelineEvent::Finished(outcome)) => {
                self.pipeline.finish(outcome, &mut self.presenter)
            }
        }
        ControlFlow::Continue
    }

    fn on_pointer(&mut self, target: SurfaceKind, phase: PointerPhase, pointer: Pointer) {
        match (target, phase) {
            (SurfaceKind::Region, PointerPhase::Press) => {
                self.region.begin_interaction(pointer);
            }
            (SurfaceKind::Region, PointerPhase::Drag) => {
                self.region.update_interaction(pointer);
            }
            (SurfaceKind::Region, PointerPhase::Release) => self.region.end_interaction(),
            (SurfaceKind::Result, PointerPhase::Press) => {
                self.presenter.begin_interaction(pointer);
            }
            (SurfaceKind::Result, PointerPhase::Drag) => {
                self.presenter.update_interaction(pointer);
            }
            (SurfaceKind::Result, PointerPhase::Release) => self.presenter.end_interaction(),
        }
    }

    fn start_capture(&mut self) {
        let config = self.config.snapshot();
        if let Some(job) = self
            .pipeline
            .capture(self.region.rect(), &config, &mut self.presenter)
        {
            spawn_cycle(job, self.events.clone());
        }
    }

    fn shutdown(&mut self) {
        log::info!("[APP] Quit requested, saving state");
        self.region.persist();
        self.presenter.persist();
        if self.config.snapshot().dev_mode {
            if let Err(e) = self.pipeline.save_history() {
                log::error!("[HISTORY] Failed to save on quit: {}", e);
            }
        }
    }
}

/// Runs `job` on the blocking pool. A second task waits for it, so the loop
/// always receives a `Finished` event, even when a collaborator panics.
fn spawn_cycle(job: CycleJob, events: UnboundedSender<AppEvent>) {
    let dev_mode = job.dev_mode();
    let stages = events.clone();
    let work = tokio::task::spawn_blocking(move || {
        job.run(&mut |status| {
            let _ = stages.send(AppEvent::Pipeline(PipelineEvent::Stage(status)));
        })
    });

    tokio::spawn(async move {
        let outcome = match work.await {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!("[PIPELINE] Cycle aborted: {}", e);
                CycleOutcome::aborted(dev_mode, format!("{}: {}", CYCLE_ABORTED, e))
            }
        };
        let _ = events.send(AppEvent::Pipeline(PipelineEvent::Finished(outcome)));
    });
}
