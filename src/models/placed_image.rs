// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Placed image data structures.
//!
//! A [`PlacedImage`] is one texture placement on the canvas. Canvas and the
//! interaction controller only talk to it through the [`Placeable`] trait.

use super::layout::{ImageRecord, ScaleEncoding, ScaleRecord, SizeRecord};
use crate::error::{LayoutError, Result};
use crate::util::geometry::{normalize_coordinates, snap_value, Point, Rect};
use std::fmt;
use std::path::{Path, PathBuf};

/// Smallest scale factor an item may carry.
pub const MIN_SCALE: f64 = 1e-3;

/// Identifier of a placed image, unique for the lifetime of a canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub(crate) u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Operations shared by everything that can be placed on the canvas.
pub trait Placeable {
    fn id(&self) -> ItemId;

    fn position(&self) -> Point;

    fn set_position(&mut self, position: Point);

    /// Intrinsic pixel size, before scaling.
    fn native_size(&self) -> (f64, f64);

    fn scale(&self) -> (f64, f64);

    fn set_scale(&mut self, sx: f64, sy: f64);

    fn z_order(&self) -> f64;

    fn is_visible(&self) -> bool;

    fn snap_enabled(&self) -> bool;

    /// Resolved grid spacing in pixels.
    fn grid_size(&self) -> f64;

    fn snap_position(&self, position: Point) -> Point;

    fn is_dragging(&self) -> bool;

    fn set_dragging(&mut self, dragging: bool);

    fn to_normalized(&self, canvas_width: f64, canvas_height: f64, encoding: ScaleEncoding)
        -> ImageRecord;

    fn effective_size(&self) -> (f64, f64) {
        let (w, h) = self.native_size();
        let (sx, sy) = self.scale();
        (w * sx, h * sy)
    }

    /// Canvas-space rectangle covered by the item.
    fn bounding_box(&self) -> Rect {
        let (w, h) = self.effective_size();
        Rect::from_min_size(self.position(), w, h)
    }

    fn contains(&self, point: Point) -> bool {
        self.bounding_box().contains(point)
    }
}

/// One texture placed on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedImage {
    id: ItemId,
    pub filepath: String,
    pub material_name: String,
    pub mesh_index: u32,
    native_width: u32,
    native_height: u32,
    scale_x: f64,
    scale_y: f64,
    /// Top-left corner in canvas pixels.
    position: Point,
    rotation: f64,
    pub z_order: f64,
    pub visible: bool,
    snap_to_grid: bool,
    grid_size: f64,
    dragging: bool,
    /// Resolved location of `filepath`, when it differs from the string
    /// written in the layout.
    source_path: Option<PathBuf>,
}

impl PlacedImage {
    /// Create an item at the canvas origin with unit scale.
    ///
    /// Native dimensions must be non-zero.
    pub(crate) fn new(
        id: ItemId,
        filepath: String,
        native_width: u32,
        native_height: u32,
    ) -> Result<Self> {
        if native_width == 0 {
            return Err(LayoutError::invalid("image width", 0.0));
        }
        if native_height == 0 {
            return Err(LayoutError::invalid("image height", 0.0));
        }
        let material_name = default_material_name(&filepath);
        Ok(Self {
            id,
            filepath,
            material_name,
            mesh_index: 0,
            native_width,
            native_height,
            scale_x: 1.0,
            scale_y: 1.0,
            position: Point::ZERO,
            rotation: 0.0,
            z_order: 0.0,
            visible: true,
            snap_to_grid: true,
            grid_size: 50.0,
            dragging: false,
            source_path: None,
        })
    }

    pub fn native_width(&self) -> u32 {
        self.native_width
    }

    pub fn native_height(&self) -> u32 {
        self.native_height
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// File the image pixels are read from. This is `filepath` unless a
    /// relative path was resolved against the layout file's directory.
    pub fn source_path(&self) -> &Path {
        self.source_path
            .as_deref()
            .unwrap_or_else(|| Path::new(&self.filepath))
    }

    pub fn set_source_path(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        self.source_path = (path != Path::new(&self.filepath)).then_some(path);
    }

    /// Set the rotation, wrapped into `[0, 360)`.
    pub fn set_rotation(&mut self, degrees: f64) {
        if !degrees.is_finite() {
            return;
        }
        let wrapped = degrees.rem_euclid(360.0);
        // rem_euclid can round up to exactly 360 for tiny negative inputs
        self.rotation = if wrapped >= 360.0 { 0.0 } else { wrapped };
    }

    /// Scale the item so its effective size becomes `width` x `height`.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<()> {
        if !width.is_finite() || width <= 0.0 {
            return Err(LayoutError::invalid("width", width));
        }
        if !height.is_finite() || height <= 0.0 {
            return Err(LayoutError::invalid("height", height));
        }
        self.scale_x = width / self.native_width as f64;
        self.scale_y = height / self.native_height as f64;
        Ok(())
    }

    /// Update the cached snap state. While a drag is in progress a change of
    /// grid size re-snaps the current position right away.
    pub fn set_snap_to_grid(&mut self, enabled: bool, grid_size: Option<f64>) {
        let old_size = self.grid_size;
        self.snap_to_grid = enabled;
        if let Some(size) = grid_size.filter(|s| s.is_finite() && *s > 0.0) {
            self.grid_size = size;
        }
        if self.dragging && self.snap_to_grid && self.grid_size != old_size {
            self.position = self.snap_position(self.position);
        }
    }
}

impl Placeable for PlacedImage {
    fn id(&self) -> ItemId {
        self.id
    }

    fn position(&self) -> Point {
        self.position
    }

    fn set_position(&mut self, position: Point) {
        if position.x.is_finite() && position.y.is_finite() {
            self.position = position;
        }
    }

    fn native_size(&self) -> (f64, f64) {
        (self.native_width as f64, self.native_height as f64)
    }

    fn scale(&self) -> (f64, f64) {
        (self.scale_x, self.scale_y)
    }

    /// Non-positive or non-finite factors are coerced to [`MIN_SCALE`].
    fn set_scale(&mut self, sx: f64, sy: f64) {
        self.scale_x = coerce_scale(sx);
        self.scale_y = coerce_scale(sy);
    }

    fn z_order(&self) -> f64 {
        self.z_order
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn snap_enabled(&self) -> bool {
        self.snap_to_grid
    }

    fn grid_size(&self) -> f64 {
        self.grid_size
    }

    fn snap_position(&self, position: Point) -> Point {
        if !self.snap_to_grid {
            return position;
        }
        Point::new(
            snap_value(position.x, self.grid_size),
            snap_value(position.y, self.grid_size),
        )
    }

    fn is_dragging(&self) -> bool {
        self.dragging
    }

    fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
    }

    fn to_normalized(
        &self,
        canvas_width: f64,
        canvas_height: f64,
        encoding: ScaleEncoding,
    ) -> ImageRecord {
        let mut record = ImageRecord {
            filepath: self.filepath.clone(),
            material_name: self.material_name.clone(),
            mesh_index: self.mesh_index,
            size: Some(SizeRecord {
                width: self.native_width,
                height: self.native_height,
            }),
            rotation: self.rotation,
            z_index: self.z_order,
            visible: self.visible,
            ..ImageRecord::default()
        };

        if canvas_width <= 0.0 || canvas_height <= 0.0 {
            return record;
        }

        record.position =
            normalize_coordinates(self.position.x, self.position.y, canvas_width, canvas_height);
        record.scale = match encoding {
            ScaleEncoding::Multiplier => ScaleRecord {
                x: self.scale_x,
                y: self.scale_y,
            },
            ScaleEncoding::CanvasFraction => {
                let (w, h) = self.effective_size();
                ScaleRecord {
                    x: w / canvas_width,
                    y: h / canvas_height,
                }
            }
        };
        record
    }
}

fn coerce_scale(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        MIN_SCALE
    }
}

/// File name without its extension.
pub fn default_material_name(filepath: &str) -> String {
    Path::new(filepath)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(w: u32, h: u32) -> PlacedImage {
        PlacedImage::new(ItemId(1), "textures/brick_wall.png".to_string(), w, h).unwrap()
    }

    #[test]
    fn test_material_name_defaults_to_file_stem() {
        let image = item(64, 64);
        assert_eq!(image.material_name, "brick_wall");
        assert_eq!(default_material_name("noext"), "noext");
    }

    #[test]
    fn test_zero_native_size_is_rejected() {
        assert!(PlacedImage::new(ItemId(1), "a.png".into(), 0, 10).is_err());
        assert!(PlacedImage::new(ItemId(1), "a.png".into(), 10, 0).is_err());
    }

    #[test]
    fn test_resize_derives_scale() {
        let mut image = item(200, 100);
        image.resize(300.0, 50.0).unwrap();
        assert_eq!(image.scale(), (1.5, 0.5));
        assert_eq!(image.effective_size(), (300.0, 50.0));
    }

    #[test]
    fn test_resize_rejects_non_positive() {
        let mut image = item(200, 100);
        assert!(image.resize(0.0, 50.0).is_err());
        assert!(image.resize(50.0, -1.0).is_err());
        assert_eq!(image.scale(), (1.0, 1.0));
    }

    #[test]
    fn test_set_scale_coerces_non_positive() {
        let mut image = item(200, 100);
        image.set_scale(-2.0, 0.0);
        assert_eq!(image.scale(), (MIN_SCALE, MIN_SCALE));
        image.set_scale(f64::NAN, 2.0);
        assert_eq!(image.scale(), (MIN_SCALE, 2.0));
    }

    #[test]
    fn test_rotation_wraps() {
        let mut image = item(10, 10);
        image.set_rotation(370.0);
        assert!((image.rotation() - 10.0).abs() < 1e-9);
        image.set_rotation(-90.0);
        assert!((image.rotation() - 270.0).abs() < 1e-9);
        image.set_rotation(360.0);
        assert_eq!(image.rotation(), 0.0);
    }

    #[test]
    fn test_snap_position_identity_when_disabled() {
        let mut image = item(10, 10);
        image.set_snap_to_grid(false, Some(50.0));
        for p in [Point::new(3.3, 7.7), Point::new(-120.5, 999.9), Point::ZERO] {
            assert_eq!(image.snap_position(p), p);
        }
    }

    #[test]
    fn test_snap_position_nearest_grid_point() {
        let mut image = item(10, 10);
        image.set_snap_to_grid(true, Some(50.0));
        assert_eq!(image.snap_position(Point::new(74.0, 76.0)), Point::new(50.0, 100.0));
    }

    #[test]
    fn test_grid_change_mid_drag_resnaps() {
        let mut image = item(10, 10);
        image.set_snap_to_grid(true, Some(50.0));
        image.set_position(Point::new(150.0, 150.0));
        image.set_dragging(true);
        image.set_snap_to_grid(true, Some(40.0));
        assert_eq!(image.position(), Point::new(160.0, 160.0));
    }

    #[test]
    fn test_grid_change_when_idle_does_not_move() {
        let mut image = item(10, 10);
        image.set_snap_to_grid(true, Some(50.0));
        image.set_position(Point::new(150.0, 150.0));
        image.set_snap_to_grid(true, Some(40.0));
        assert_eq!(image.position(), Point::new(150.0, 150.0));
    }

    #[test]
    fn test_to_normalized_fractions() {
        let mut image = item(200, 100);
        image.set_position(Point::new(256.0, 128.0));
        image.set_scale(2.0, 1.0);

        let record = image.to_normalized(1024.0, 512.0, ScaleEncoding::Multiplier);
        assert_eq!(record.position, Point::new(0.25, 0.25));
        assert_eq!(record.scale, ScaleRecord { x: 2.0, y: 1.0 });
        assert_eq!(record.size, Some(SizeRecord { width: 200, height: 100 }));

        let record = image.to_normalized(1024.0, 512.0, ScaleEncoding::CanvasFraction);
        assert_eq!(record.scale, ScaleRecord { x: 400.0 / 1024.0, y: 100.0 / 512.0 });
    }

    #[test]
    fn test_to_normalized_zero_canvas_is_neutral() {
        let mut image = item(200, 100);
        image.set_position(Point::new(256.0, 128.0));
        let record = image.to_normalized(0.0, 512.0, ScaleEncoding::Multiplier);
        assert_eq!(record.position, Point::ZERO);
        assert_eq!(record.scale, ScaleRecord::default());
        assert_eq!(record.filepath, "textures/brick_wall.png");
    }
}
