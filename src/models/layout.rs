// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Persisted layout document.
//!
//! These types mirror the JSON layout file consumed by the external
//! pipeline. Positions are always fractions of the canvas; the meaning of
//! `scale` depends on the [`ScaleEncoding`] the serializer was built with.

use super::grid::GridMode;
use crate::util::geometry::Point;
use serde::{Deserialize, Serialize};

/// Layout format version written by this tool.
pub const LAYOUT_VERSION: &str = "1.0";

/// Canvas edge length used when a document or a reset does not say otherwise.
pub const DEFAULT_CANVAS_SIZE: f64 = 1024.0;

/// How the `scale` field of an image record is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScaleEncoding {
    /// Raw multipliers applied to the image's native size.
    #[default]
    Multiplier,
    /// Effective size as a fraction of the canvas width/height.
    CanvasFraction,
}

/// Complete layout document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutDocument {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default, alias = "canvas_size")]
    pub canvas: CanvasRecord,
    #[serde(default)]
    pub grid: GridRecord,
    #[serde(default)]
    pub images: Vec<ImageRecord>,
    /// Additional top-level fields, such as the export `lod` tag.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl LayoutDocument {
    /// The export level-of-detail tag, if present.
    pub fn lod(&self) -> Option<i64> {
        self.extra.get("lod").and_then(|v| v.as_i64())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasRecord {
    #[serde(default = "default_canvas_size")]
    pub width: f64,
    #[serde(default = "default_canvas_size")]
    pub height: f64,
}

impl Default for CanvasRecord {
    fn default() -> Self {
        Self {
            width: DEFAULT_CANVAS_SIZE,
            height: DEFAULT_CANVAS_SIZE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridRecord {
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default = "default_grid_size")]
    pub size: f64,
    #[serde(default = "default_true")]
    pub snap_enabled: bool,
    /// Unit of `size`. Files written before the unit was recorded use pixels.
    #[serde(default)]
    pub mode: GridMode,
}

impl Default for GridRecord {
    fn default() -> Self {
        Self {
            visible: true,
            size: default_grid_size(),
            snap_enabled: true,
            mode: GridMode::Pixels,
        }
    }
}

/// One placed image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    #[serde(default)]
    pub filepath: String,
    #[serde(default)]
    pub material_name: String,
    #[serde(default)]
    pub mesh_index: u32,
    /// Top-left corner as fractions of canvas width/height.
    #[serde(default)]
    pub position: Point,
    /// Native pixel size of the source image. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<SizeRecord>,
    #[serde(default)]
    pub scale: ScaleRecord,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default, rename = "zIndex")]
    pub z_index: f64,
    #[serde(default = "default_true")]
    pub visible: bool,
}

impl Default for ImageRecord {
    fn default() -> Self {
        Self {
            filepath: String::new(),
            material_name: String::new(),
            mesh_index: 0,
            position: Point::ZERO,
            size: None,
            scale: ScaleRecord::default(),
            rotation: 0.0,
            z_index: 0.0,
            visible: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeRecord {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleRecord {
    #[serde(default = "default_scale")]
    pub x: f64,
    #[serde(default = "default_scale")]
    pub y: f64,
}

impl Default for ScaleRecord {
    fn default() -> Self {
        Self { x: 1.0, y: 1.0 }
    }
}

fn default_version() -> String {
    LAYOUT_VERSION.to_string()
}

fn default_canvas_size() -> f64 {
    DEFAULT_CANVAS_SIZE
}

fn default_grid_size() -> f64 {
    50.0
}

fn default_scale() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}
