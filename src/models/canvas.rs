// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Canvas state management.
//!
//! The canvas owns the placed images and the grid. Grid and size changes
//! are pushed down to every item's cached snap state; placed items are
//! never moved by a canvas resize.

use super::grid::{GridMode, GridModel, GridSpacing};
use super::layout::DEFAULT_CANVAS_SIZE;
use super::placed_image::{ItemId, Placeable, PlacedImage};
use crate::error::{LayoutError, Result};
use crate::interaction::constrain_size;
use crate::io::media::ImageSource;
use crate::util::geometry::{denormalize_coordinates, normalize_coordinates, Point, Rect};
use std::path::Path;

/// Notifications for the surrounding UI.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasEvent {
    ItemAdded(ItemId),
    ItemRemoved(ItemId),
    SelectionChanged(Option<ItemId>),
    GridChanged,
    CanvasResized { width: f64, height: f64 },
    Cleared,
}

/// Partial grid update; only the fields that are `Some` are applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridUpdate {
    pub visible: Option<bool>,
    pub mode: Option<GridMode>,
    pub spacing: Option<f64>,
    pub snap_enabled: Option<bool>,
    pub line_color: Option<[u8; 4]>,
    pub line_width: Option<f32>,
}

/// The working surface and everything placed on it.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: f64,
    height: f64,
    items: Vec<PlacedImage>,
    grid: GridModel,
    selection: Option<ItemId>,
    next_id: u64,
    events: Vec<CanvasEvent>,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: DEFAULT_CANVAS_SIZE,
            height: DEFAULT_CANVAS_SIZE,
            items: Vec::new(),
            grid: GridModel::default(),
            selection: None,
            next_id: 1,
            events: Vec::new(),
        }
    }
}

impl Canvas {
    /// Create an empty canvas of the given size.
    pub fn new(width: f64, height: f64) -> Result<Self> {
        validate_size(width, height)?;
        Ok(Self {
            width,
            height,
            ..Self::default()
        })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn grid(&self) -> &GridModel {
        &self.grid
    }

    /// Grid spacing resolved to pixels for the current canvas width.
    pub fn grid_pixel_spacing(&self) -> f64 {
        self.grid.actual_pixel_spacing(self.width)
    }

    /// Add an image with known native dimensions. The item lands at the
    /// origin, on top of every existing item.
    pub fn add(
        &mut self,
        filepath: impl Into<String>,
        material_name: Option<String>,
        native_size: (u32, u32),
        mesh_index: u32,
    ) -> Result<ItemId> {
        let id = ItemId(self.next_id);
        let mut item = PlacedImage::new(id, filepath.into(), native_size.0, native_size.1)?;
        self.next_id += 1;

        if let Some(name) = material_name.filter(|n| !n.is_empty()) {
            item.material_name = name;
        }
        item.mesh_index = mesh_index;
        item.z_order = self.top_z() + 1.0;
        item.set_snap_to_grid(self.grid.snap_enabled, Some(self.grid_pixel_spacing()));

        log::info!(
            "Added image {} ({}x{}) as {}",
            item.filepath,
            native_size.0,
            native_size.1,
            id
        );
        self.items.push(item);
        self.events.push(CanvasEvent::ItemAdded(id));
        Ok(id)
    }

    /// Add an image from disk, probing its native size when none is given.
    pub fn add_from_file(
        &mut self,
        filepath: &Path,
        material_name: Option<String>,
        size: Option<(u32, u32)>,
        mesh_index: u32,
        source: &dyn ImageSource,
    ) -> Result<ItemId> {
        let native_size = match size {
            Some(size) => size,
            None => source.dimensions(filepath)?,
        };
        self.add(
            filepath.to_string_lossy().into_owned(),
            material_name,
            native_size,
            mesh_index,
        )
    }

    /// Remove an item. Returns it if it existed.
    pub fn remove(&mut self, id: ItemId) -> Option<PlacedImage> {
        let index = self.items.iter().position(|item| item.id() == id)?;
        let item = self.items.remove(index);
        if self.selection == Some(id) {
            self.select(None);
        }
        self.events.push(CanvasEvent::ItemRemoved(id));
        log::info!("Removed image {}, total: {}", id, self.items.len());
        Some(item)
    }

    /// Remove every item and reset the canvas to its default size.
    pub fn clear(&mut self) {
        self.items.clear();
        self.selection = None;
        self.width = DEFAULT_CANVAS_SIZE;
        self.height = DEFAULT_CANVAS_SIZE;
        self.push_grid_to_items();
        self.events.push(CanvasEvent::Cleared);
    }

    /// Change the canvas size. Items keep their pixel positions; only their
    /// cached grid spacing is refreshed.
    pub fn set_size(&mut self, width: f64, height: f64) -> Result<()> {
        validate_size(width, height)?;
        self.width = width;
        self.height = height;
        self.push_grid_to_items();
        self.events.push(CanvasEvent::CanvasResized { width, height });
        Ok(())
    }

    /// Apply a partial grid update. Nothing is applied if any field is invalid.
    pub fn set_grid(&mut self, update: GridUpdate) -> Result<()> {
        let mode = update.mode.unwrap_or_else(|| self.grid.mode());
        let value = update.spacing.unwrap_or_else(|| self.grid.spacing().value());
        let spacing = GridSpacing::new(mode, value)?;
        if let Some(width) = update.line_width {
            if !width.is_finite() || width <= 0.0 {
                return Err(LayoutError::invalid("grid line width", width as f64));
            }
        }

        self.grid.set_spacing_with_mode(spacing)?;
        if let Some(visible) = update.visible {
            self.grid.visible = visible;
        }
        if let Some(enabled) = update.snap_enabled {
            self.grid.snap_enabled = enabled;
        }
        if let Some(color) = update.line_color {
            self.grid.line_color = color;
        }
        if let Some(width) = update.line_width {
            self.grid.line_width = width;
        }

        self.push_grid_to_items();
        self.events.push(CanvasEvent::GridChanged);
        Ok(())
    }

    fn push_grid_to_items(&mut self) {
        let spacing = self.grid_pixel_spacing();
        let enabled = self.grid.snap_enabled;
        for item in &mut self.items {
            item.set_snap_to_grid(enabled, Some(spacing));
        }
    }

    pub fn items(&self) -> &[PlacedImage] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item(&self, id: ItemId) -> Option<&PlacedImage> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut PlacedImage> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    /// Items in paint order, bottom first.
    pub fn items_by_z(&self) -> Vec<&PlacedImage> {
        let mut sorted: Vec<&PlacedImage> = self.items.iter().collect();
        sorted.sort_by(|a, b| a.z_order().total_cmp(&b.z_order()));
        sorted
    }

    /// Topmost visible item under a canvas point.
    pub fn item_at(&self, point: Point) -> Option<ItemId> {
        self.items_by_z()
            .into_iter()
            .rev()
            .find(|item| item.is_visible() && item.contains(point))
            .map(|item| item.id())
    }

    pub fn selected(&self) -> Option<ItemId> {
        self.selection
    }

    /// Change the selection. Unknown ids clear it.
    pub fn select(&mut self, id: Option<ItemId>) {
        let id = id.filter(|id| self.item(*id).is_some());
        if self.selection != id {
            self.selection = id;
            self.events.push(CanvasEvent::SelectionChanged(id));
        }
    }

    /// Union of all item rectangles, or `None` when the canvas is empty.
    pub fn bounds(&self) -> Option<Rect> {
        self.items
            .iter()
            .map(|item| item.bounding_box())
            .reduce(|acc, rect| acc.union(&rect))
    }

    /// Raise an item above every other item.
    pub fn bring_to_front(&mut self, id: ItemId) {
        let others = self.other_z_orders(id);
        let top = others.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if let Some(item) = self.item_mut(id) {
            if item.z_order <= top {
                item.z_order = top + 1.0;
            }
        }
    }

    /// Lower an item below every other item.
    pub fn send_to_back(&mut self, id: ItemId) {
        let others = self.other_z_orders(id);
        let bottom = others.iter().copied().fold(f64::INFINITY, f64::min);
        if let Some(item) = self.item_mut(id) {
            if item.z_order >= bottom {
                item.z_order = bottom - 1.0;
            }
        }
    }

    fn other_z_orders(&self, id: ItemId) -> Vec<f64> {
        self.items
            .iter()
            .filter(|item| item.id() != id)
            .map(|item| item.z_order)
            .collect()
    }

    pub fn set_z_order(&mut self, id: ItemId, z: f64) -> Result<()> {
        if !z.is_finite() {
            return Err(LayoutError::invalid("z-order", z));
        }
        if let Some(item) = self.item_mut(id) {
            item.z_order = z;
        }
        Ok(())
    }

    pub fn set_visible(&mut self, id: ItemId, visible: bool) {
        if let Some(item) = self.item_mut(id) {
            item.visible = visible;
        }
    }

    /// Move an item from a numeric edit. The grid snap is applied only when
    /// the edit is committed, so values can be dragged between grid points.
    pub fn move_item(&mut self, id: ItemId, position: Point, commit: bool) {
        if let Some(item) = self.item_mut(id) {
            let position = if commit {
                item.snap_position(position)
            } else {
                position
            };
            item.set_position(position);
        }
    }

    /// Resize an item from a numeric edit. The minimum edge length always
    /// applies; grid rounding only once the edit is committed.
    pub fn resize_item(&mut self, id: ItemId, width: f64, height: f64, commit: bool) -> Result<()> {
        let Some(item) = self.item_mut(id) else {
            return Ok(());
        };
        let grid = (commit && item.snap_enabled()).then(|| item.grid_size());
        let (w, h) = constrain_size(width, height, grid);
        item.resize(w, h)
    }

    /// Canvas pixels to fractions of the canvas size.
    pub fn to_normalized(&self, point: Point) -> Point {
        normalize_coordinates(point.x, point.y, self.width, self.height)
    }

    /// Fractions of the canvas size to canvas pixels.
    pub fn from_normalized(&self, point: Point) -> Point {
        let (x, y) = denormalize_coordinates(&point, self.width, self.height);
        Point::new(x, y)
    }

    /// Take all notifications queued since the last call.
    pub fn drain_events(&mut self) -> Vec<CanvasEvent> {
        std::mem::take(&mut self.events)
    }

    fn top_z(&self) -> f64 {
        self.items
            .iter()
            .map(|item| item.z_order)
            .fold(f64::NEG_INFINITY, f64::max)
            .max(-1.0)
    }
}

fn validate_size(width: f64, height: f64) -> Result<()> {
    if !width.is_finite() || width <= 0.0 {
        return Err(LayoutError::invalid("canvas width", width));
    }
    if !height.is_finite() || height <= 0.0 {
        return Err(LayoutError::invalid("canvas height", height));
    }
    Ok(())
}
