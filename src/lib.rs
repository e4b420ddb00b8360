// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Texture Layout Tool core.
//!
//! Places texture images on a canvas with an optional snapping grid, drives
//! drag and corner-resize gestures, and reads and writes the JSON layout
//! file consumed by the asset pipeline. Nothing in this crate depends on a
//! GUI toolkit; the desktop front end lives in the binary.

pub mod error;
pub mod interaction;
pub mod io;
pub mod models;
pub mod util;

pub use error::{LayoutError, Result};
pub use interaction::{Corner, GestureKind, InteractionController};
pub use models::canvas::{Canvas, CanvasEvent, GridUpdate};
pub use models::grid::{GridMode, GridModel, GridSpacing};
pub use models::placed_image::{ItemId, Placeable, PlacedImage};
pub use util::geometry::{Point, Rect};
