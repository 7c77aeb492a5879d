//! Window geometry (functional core).
//!
//! Rectangles, pointer samples, and the pure drag/resize math shared by the
//! capture region and the result panel. Nothing here touches a window; the
//! surfaces apply whatever `Rect` these functions hand back.

mod store;

pub use store::{GeometryPersistError, GeometryStore, WindowKey};

use serde::{Deserialize, Serialize};

/// Smallest width/height the capture region may be resized to.
pub const MIN_REGION_SIZE: Size = Size { width: 100, height: 100 };

/// Distance from a window edge (in window-local pixels) that grabs the edge
/// for resizing instead of moving the window.
pub const RESIZE_MARGIN: i32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// A window rectangle in screen coordinates.
///
/// Covers the half-open pixel range `[x, x + width) × [y, y + height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A `size` rectangle centered on a screen of `screen` dimensions.
    pub fn centered(screen: Size, size: Size) -> Self {
        Self {
            x: (screen.width - size.width) / 2,
            y: (screen.height - size.height) / 2,
            width: size.width,
            height: size.height,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// True if both dimensions respect `min` (and therefore are positive).
    pub fn fits(&self, min: Size) -> bool {
        self.width >= min.width && self.height >= min.height && self.width > 0 && self.height > 0
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }
}

/// Which window edges a resize drags. Corners set two flags at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Edges {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl Edges {
    pub fn is_empty(&self) -> bool {
        !(self.left || self.right || self.top || self.bottom)
    }
}

/// One pointer sample, in both window-local and screen-global coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pointer {
    pub local: Point,
    pub screen: Point,
}

impl Pointer {
    pub fn new(local: Point, screen: Point) -> Self {
        Self { local, screen }
    }
}

/// The edges within `margin` of a window-local pointer position.
pub fn edges_under(local: Point, size: Size, margin: i32) -> Edges {
    Edges {
        left: local.x < margin,
        right: local.x > size.width - margin,
        top: local.y < margin,
        bottom: local.y > size.height - margin,
    }
}

/// Translates the origin; the size never changes.
pub fn moved(rect: Rect, dx: i32, dy: i32) -> Rect {
    Rect {
        x: rect.x + dx,
        y: rect.y + dy,
        ..rect
    }
}

/// Applies a resize delta to the active edges.
///
/// Each axis is evaluated on its own: if the result would fall below `min`
/// on that axis, the axis keeps its current position and size (no clamping)
/// while the other axis still applies.
pub fn resized(rect: Rect, edges: Edges, dx: i32, dy: i32, min: Size) -> Rect {
    let (x, width) = resize_axis(rect.x, rect.width, edges.left, edges.right, dx, min.width);
    let (y, height) = resize_axis(rect.y, rect.height, edges.top, edges.bottom, dy, min.height);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn resize_axis(
    origin: i32,
    length: i32,
    near: bool,
    far: bool,
    delta: i32,
    min: i32,
) -> (i32, i32) {
    let (mut new_origin, mut new_length) = (origin, length);
    if far {
        new_length += delta;
    }
    if near {
        new_origin += delta;
        new_length -= delta;
    }
    if new_length < min {
        return (origin, length);
    }
    (new_origin, new_length)
}

/// State of an in-progress drag, captured at pointer-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interaction {
    pub edges: Edges,
    pub origin_pointer: Point,
    pub origin_rect: Rect,
    pub last_pointer: Point,
}

impl Interaction {
    pub fn is_move(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Drag/resize tracker for one borderless window.
///
/// Owns the window's rectangle and the interaction value object; callers
/// feed pointer samples and apply the rectangle it reports.
#[derive(Debug, Clone)]
pub struct DragTracker {
    rect: Rect,
    min: Size,
    margin: i32,
    interaction: Option<Interaction>,
}

impl DragTracker {
    /// Starts tracking `rect`. Sizes below `min` (including negative ones
    /// from a hand-edited file) are raised to it.
    pub fn new(rect: Rect, min: Size) -> Self {
        let mut tracker = Self {
            rect,
            min,
            margin: RESIZE_MARGIN,
            interaction: None,
        };
        tracker.set_rect(rect);
        tracker
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn min_size(&self) -> Size {
        self.min
    }

    pub fn interaction(&self) -> Option<&Interaction> {
        self.interaction.as_ref()
    }

    /// Replaces the rectangle from outside a drag (e.g. a window-manager
    /// resize). Sizes below the minimum are raised to it.
    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = Rect {
            width: rect.width.max(self.min.width),
            height: rect.height.max(self.min.height),
            ..rect
        };
    }

    pub fn begin(&mut self, pointer: Pointer) -> Interaction {
        let interaction = Interaction {
            edges: edges_under(pointer.local, self.rect.size(), self.margin),
            origin_pointer: pointer.screen,
            origin_rect: self.rect,
            last_pointer: pointer.screen,
        };
        self.interaction = Some(interaction);
        interaction
    }

    /// Advances the drag. Returns the new rectangle, or `None` when no
    /// interaction is in progress.
    pub fn update(&mut self, pointer: Pointer) -> Option<Rect> {
        let interaction = self.interaction.as_mut()?;
        let dx = pointer.screen.x - interaction.last_pointer.x;
        let dy = pointer.screen.y - interaction.last_pointer.y;
        interaction.last_pointer = pointer.screen;

        self.rect = if interaction.is_move() {
            moved(self.rect, dx, dy)
        } else {
            resized(self.rect, interaction.edges, dx, dy, self.min)
        };
        Some(self.rect)
    }

    /// Ends the drag. Returns the finished interaction, if there was one.
    pub fn end(&mut self) -> Option<Interaction> {
        self.interaction.take()
    }
}
