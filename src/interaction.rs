// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Pointer gesture handling for placed images.
//!
//! The controller drives one gesture at a time: dragging an item, or
//! resizing it from one of its four corner handles. It does not own the
//! item; every call borrows it for the duration of that call only.
//!
//! ```text
//! Idle --begin (on handle)--> Resizing --end/cancel--> Idle
//! Idle --begin (elsewhere)--> Dragging --end/cancel--> Idle
//! ```

use crate::models::placed_image::{ItemId, Placeable};
use crate::util::geometry::{Point, Rect};

/// Side length of the square corner handles, in canvas pixels.
pub const HANDLE_SIZE: f64 = 12.0;

/// Smallest edge length a resize may produce, in canvas pixels.
pub const MIN_EDGE: f64 = 10.0;

/// Corner of an item's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    /// Hit-test priority order.
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    pub fn opposite(self) -> Corner {
        match self {
            Corner::TopLeft => Corner::BottomRight,
            Corner::TopRight => Corner::BottomLeft,
            Corner::BottomLeft => Corner::TopRight,
            Corner::BottomRight => Corner::TopLeft,
        }
    }

    /// Position of this corner on `rect`.
    pub fn of(self, rect: &Rect) -> Point {
        match self {
            Corner::TopLeft => rect.min,
            Corner::TopRight => Point::new(rect.max.x, rect.min.y),
            Corner::BottomLeft => Point::new(rect.min.x, rect.max.y),
            Corner::BottomRight => rect.max,
        }
    }

    fn is_left(self) -> bool {
        matches!(self, Corner::TopLeft | Corner::BottomLeft)
    }

    fn is_top(self) -> bool {
        matches!(self, Corner::TopLeft | Corner::TopRight)
    }
}

/// What a gesture is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Drag,
    Resize(Corner),
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum Gesture {
    #[default]
    Idle,
    Dragging {
        item: ItemId,
        grab_offset: Point,
        start_position: Point,
    },
    Resizing {
        item: ItemId,
        corner: Corner,
        start_pointer: Point,
        start_rect: Rect,
        start_scale: (f64, f64),
    },
}

/// Gesture state machine for dragging and corner-resizing.
#[derive(Debug, Clone)]
pub struct InteractionController {
    gesture: Gesture,
    handle_size: f64,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionController {
    pub fn new() -> Self {
        Self {
            gesture: Gesture::Idle,
            handle_size: HANDLE_SIZE,
        }
    }

    /// Use a different handle size, e.g. to keep handles a constant size on
    /// screen while the view is zoomed.
    pub fn with_handle_size(mut self, size: f64) -> Self {
        if size.is_finite() && size > 0.0 {
            self.handle_size = size;
        }
        self
    }

    pub fn set_handle_size(&mut self, size: f64) {
        if size.is_finite() && size > 0.0 {
            self.handle_size = size;
        }
    }

    pub fn handle_size(&self) -> f64 {
        self.handle_size
    }

    pub fn is_idle(&self) -> bool {
        self.gesture == Gesture::Idle
    }

    /// Item targeted by the gesture in progress.
    pub fn active_item(&self) -> Option<ItemId> {
        match self.gesture {
            Gesture::Idle => None,
            Gesture::Dragging { item, .. } | Gesture::Resizing { item, .. } => Some(item),
        }
    }

    pub fn kind(&self) -> Option<GestureKind> {
        match self.gesture {
            Gesture::Idle => None,
            Gesture::Dragging { .. } => Some(GestureKind::Drag),
            Gesture::Resizing { corner, .. } => Some(GestureKind::Resize(corner)),
        }
    }

    /// Corner handle under `local_point`, given in item-local coordinates
    /// (origin at the item's top-left). Overlapping handles on tiny items
    /// resolve in [`Corner::ALL`] order.
    pub fn handle_at<P: Placeable + ?Sized>(&self, item: &P, local_point: Point) -> Option<Corner> {
        let (w, h) = item.effective_size();
        let rect = Rect::from_min_size(Point::ZERO, w, h);
        Corner::ALL
            .into_iter()
            .find(|corner| Rect::centered_square(corner.of(&rect), self.handle_size).contains(local_point))
    }

    /// Corner handle under a canvas-space point.
    pub fn handle_at_canvas<P: Placeable + ?Sized>(&self, item: &P, point: Point) -> Option<Corner> {
        self.handle_at(item, point - item.position())
    }

    /// Start a gesture on `item`. A press on a corner handle resizes,
    /// anything else drags.
    ///
    /// Returns `None` while a gesture on another item is still active; that
    /// gesture must be ended or cancelled first. A gesture already running
    /// on `item` is cancelled and restarted.
    pub fn begin<P: Placeable + ?Sized>(
        &mut self,
        item: &mut P,
        pointer: Point,
    ) -> Option<GestureKind> {
        match self.active_item() {
            Some(id) if id == item.id() => self.cancel(item),
            Some(id) => {
                log::warn!("Gesture on {} still active, not starting one on {}", id, item.id());
                return None;
            }
            None => {}
        }

        if let Some(corner) = self.handle_at_canvas(item, pointer) {
            self.gesture = Gesture::Resizing {
                item: item.id(),
                corner,
                start_pointer: pointer,
                start_rect: item.bounding_box(),
                start_scale: item.scale(),
            };
            log::debug!("Resize of {} started from {:?}", item.id(), corner);
            Some(GestureKind::Resize(corner))
        } else {
            self.gesture = Gesture::Dragging {
                item: item.id(),
                grab_offset: pointer - item.position(),
                start_position: item.position(),
            };
            item.set_dragging(true);
            log::debug!("Drag of {} started", item.id());
            Some(GestureKind::Drag)
        }
    }

    /// Feed a pointer move. Calls for an item other than the active one are
    /// ignored.
    pub fn update<P: Placeable + ?Sized>(&mut self, item: &mut P, pointer: Point) {
        match self.gesture {
            Gesture::Idle => {}
            Gesture::Dragging { item: id, grab_offset, .. } => {
                if id != item.id() {
                    return;
                }
                let target = pointer - grab_offset;
                item.set_position(item.snap_position(target));
            }
            Gesture::Resizing {
                item: id,
                corner,
                start_pointer,
                start_rect,
                ..
            } => {
                if id != item.id() {
                    return;
                }
                let grid = if item.snap_enabled() {
                    Some(item.grid_size())
                } else {
                    None
                };
                let rect = resized_rect(&start_rect, corner, pointer - start_pointer, grid);
                let (native_w, native_h) = item.native_size();
                item.set_position(rect.min);
                item.set_scale(rect.width() / native_w, rect.height() / native_h);
            }
        }
    }

    /// Finish the gesture at `pointer`. A drag with snapping enabled ends
    /// exactly on the grid.
    pub fn end<P: Placeable + ?Sized>(&mut self, item: &mut P, pointer: Point) -> Option<GestureKind> {
        if self.active_item() != Some(item.id()) {
            return None;
        }
        self.update(item, pointer);
        let kind = self.kind();
        if let Gesture::Dragging { .. } = self.gesture {
            let snapped = item.snap_position(item.position());
            item.set_position(snapped);
            item.set_dragging(false);
        }
        self.gesture = Gesture::Idle;
        log::debug!("Gesture {:?} on {} finished", kind, item.id());
        kind
    }

    /// Abort the gesture, putting the item back where it was when the
    /// gesture began.
    pub fn cancel<P: Placeable + ?Sized>(&mut self, item: &mut P) {
        match self.gesture {
            Gesture::Idle => return,
            Gesture::Dragging {
                item: id,
                start_position,
                ..
            } => {
                if id == item.id() {
                    item.set_position(start_position);
                    item.set_dragging(false);
                }
            }
            Gesture::Resizing {
                item: id,
                start_rect,
                start_scale,
                ..
            } => {
                if id == item.id() {
                    item.set_position(start_rect.min);
                    item.set_scale(start_scale.0, start_scale.1);
                }
            }
        }
        log::debug!("Gesture on {} cancelled", item.id());
        self.gesture = Gesture::Idle;
    }
}

/// Apply the minimum edge length and optional grid snapping to a size.
///
/// Snapping rounds each edge to the nearest multiple of `grid`, rounding
/// up instead whenever the nearest multiple would fall below [`MIN_EDGE`].
pub fn constrain_size(width: f64, height: f64, grid: Option<f64>) -> (f64, f64) {
    (constrain_edge(width, grid), constrain_edge(height, grid))
}

fn constrain_edge(length: f64, grid: Option<f64>) -> f64 {
    let length = if length.is_finite() {
        length.abs().max(MIN_EDGE)
    } else {
        MIN_EDGE
    };
    match grid.filter(|g| g.is_finite() && *g > 0.0) {
        Some(g) => {
            let snapped = (length / g).round() * g;
            if snapped < MIN_EDGE {
                (MIN_EDGE / g).ceil() * g
            } else {
                snapped
            }
        }
        None => length,
    }
}

/// Rectangle produced by dragging `corner` of `start` by `delta` while the
/// opposite corner stays put. The result never has a negative size, even
/// when the corner is dragged past the opposite one.
fn resized_rect(start: &Rect, corner: Corner, delta: Point, grid: Option<f64>) -> Rect {
    let anchor = corner.opposite().of(start);
    let moved = corner.of(start) + delta;
    let raw_w = moved.x - anchor.x;
    let raw_h = moved.y - anchor.y;
    let (w, h) = constrain_size(raw_w, raw_h, grid);

    let grows_left = if raw_w == 0.0 { corner.is_left() } else { raw_w < 0.0 };
    let grows_up = if raw_h == 0.0 { corner.is_top() } else { raw_h < 0.0 };
    let x = if grows_left { anchor.x - w } else { anchor.x };
    let y = if grows_up { anchor.y - h } else { anchor.y };
    Rect::from_min_size(Point::new(x, y), w, h)
}
