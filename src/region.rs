//! The capture region: a borderless, always-on-top box the user drags and
//! resizes over the text they want translated.
//!
//! `RegionController` owns the region's rectangle. Pointer samples arrive
//! from the window system; the controller turns them into geometry through
//! [`DragTracker`], pushes the result to the surface, and persists it when
//! the drag ends.

use crate::geometry::{
    DragTracker, GeometryStore, Interaction, Pointer, Rect, Size, WindowKey, MIN_REGION_SIZE,
};
use serde::Serialize;

/// Size of the region on first run, before any geometry has been saved.
pub const DEFAULT_REGION_SIZE: Size = Size {
    width: 400,
    height: 200,
};

const BORDER_COLOR: &str = "#00FF00";
const HANDLE_OUTLINE_COLOR: &str = "#FFFFFF";
const OUTLINE_INSET: i32 = 2;
const OUTLINE_WIDTH: i32 = 4;
const HANDLE_HALF_SIZE: i32 = 8;
const HANDLE_OUTLINE_WIDTH: i32 = 2;

/// The region's window, as seen by the controller.
pub trait RegionSurface: Send {
    fn set_geometry(&mut self, rect: Rect);
    fn redraw_border(&mut self, border: &BorderDecoration);
}

/// A rectangle in window-local coordinates, `(x0, y0)` to `(x1, y1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Shape {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outline {
    pub shape: Shape,
    pub stroke_width: i32,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Handle {
    pub shape: Shape,
    pub fill: &'static str,
    pub outline: &'static str,
    pub outline_width: i32,
}

/// What the region window paints: a green frame and four corner handles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BorderDecoration {
    pub width: i32,
    pub height: i32,
    pub outline: Outline,
    pub handles: [Handle; 4],
}

impl BorderDecoration {
    pub fn for_size(size: Size) -> Self {
        let (w, h) = (size.width, size.height);
        let handle = |cx: i32, cy: i32| Handle {
            shape: Shape {
                x0: cx - HANDLE_HALF_SIZE,
                y0: cy - HANDLE_HALF_SIZE,
                x1: cx + HANDLE_HALF_SIZE,
                y1: cy + HANDLE_HALF_SIZE,
            },
            fill: BORDER_COLOR,
            outline: HANDLE_OUTLINE_COLOR,
            outline_width: HANDLE_OUTLINE_WIDTH,
        };

        Self {
            width: w,
            height: h,
            outline: Outline {
                shape: Shape {
                    x0: OUTLINE_INSET,
                    y0: OUTLINE_INSET,
                    x1: w - OUTLINE_INSET,
                    y1: h - OUTLINE_INSET,
                },
                stroke_width: OUTLINE_WIDTH,
                color: BORDER_COLOR,
            },
            handles: [handle(0, 0), handle(w, 0), handle(0, h), handle(w, h)],
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

pub struct RegionController {
    surface: Box<dyn RegionSurface>,
    tracker: DragTracker,
    border: BorderDecoration,
    store: GeometryStore,
}

impl RegionController {
    /// Restores the saved region, or centres a default-sized one on
    /// `screen`, and paints it.
    pub fn new(surface: Box<dyn RegionSurface>, store: GeometryStore, screen: Size) -> Self {
        let rect = initial_rect(&store, screen);
        let tracker = DragTracker::new(rect, MIN_REGION_SIZE);
        let rect = tracker.rect();

        let mut controller = Self {
            surface,
            border: BorderDecoration::for_size(rect.size()),
            tracker,
            store,
        };
        controller.surface.set_geometry(rect);
        controller.surface.redraw_border(&controller.border);
        log::info!(
            "[REGION] {}x{} at {},{}",
            rect.width,
            rect.height,
            rect.x,
            rect.y
        );
        controller
    }

    pub fn rect(&self) -> Rect {
        self.tracker.rect()
    }

    pub fn border(&self) -> &BorderDecoration {
        &self.border
    }

    pub fn interaction(&self) -> Option<&Interaction> {
        self.tracker.interaction()
    }

    pub fn begin_interaction(&mut self, pointer: Pointer) -> Interaction {
        self.tracker.begin(pointer)
    }

    /// Applies one pointer sample of an in-progress drag. Samples outside a
    /// drag are ignored.
    pub fn update_interaction(&mut self, pointer: Pointer) -> Option<Rect> {
        let rect = self.tracker.update(pointer)?;
        self.surface.set_geometry(rect);
        self.refresh_border();
        Some(rect)
    }

    /// Finishes the drag and persists the resulting rectangle.
    pub fn end_interaction(&mut self) {
        if self.tracker.end().is_some() {
            self.persist();
        }
    }

    /// Adopts geometry changed outside a drag, such as a window-manager
    /// resize. Ignored while a drag is in progress: the drag owns the
    /// geometry until release.
    pub fn reload_geometry(&mut self, rect: Rect) {
        if self.tracker.interaction().is_some() {
            return;
        }
        self.tracker.set_rect(rect);
        self.refresh_border();
    }

    pub fn persist(&self) {
        self.store.save_or_log(WindowKey::Region, self.rect());
    }

    fn refresh_border(&mut self) {
        let size = self.rect().size();
        if self.border.size() != size {
            self.border = BorderDecoration::for_size(size);
        }
        self.surface.redraw_border(&self.border);
    }
}

/// The saved region rectangle, or the default one centred on `screen`.
pub fn initial_rect(store: &GeometryStore, screen: Size) -> Rect {
    store
        .load(WindowKey::Region)
        .unwrap_or_else(|| Rect::centered(screen, DEFAULT_REGION_SIZE))
}
