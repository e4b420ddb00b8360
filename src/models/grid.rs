// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Grid model.
//!
//! The grid spacing carries an explicit unit: either absolute pixels or a
//! percentage of the canvas width. The model resolves the spacing to pixels
//! for a given canvas, places grid lines for rendering, and snaps points to
//! the nearest grid intersection.

use crate::error::{LayoutError, Result};
use crate::util::geometry::{snap_value, Point};
use serde::{Deserialize, Serialize};

/// Smallest accepted percentage spacing.
pub const MIN_PERCENT: f64 = 0.1;
/// Largest accepted percentage spacing.
pub const MAX_PERCENT: f64 = 100.0;

/// Upper bound on the lines drawn for a pixel-mode grid.
pub const MAX_PIXEL_LINES: usize = 8192;

/// Percentages whose line count is fixed rather than derived, so the
/// boundary lines never drift.
const EXACT_PERCENT_LINES: [(f64, usize); 4] = [(10.0, 11), (20.0, 6), (25.0, 5), (50.0, 3)];

/// Unit of the grid spacing value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridMode {
    #[default]
    Pixels,
    #[serde(rename = "percent")]
    PercentOfWidth,
}

/// Grid spacing tagged with its unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridSpacing {
    Pixels(f64),
    PercentOfWidth(f64),
}

impl GridSpacing {
    /// Build a spacing after validating (and, for percentages, clamping) the value.
    pub fn new(mode: GridMode, value: f64) -> Result<Self> {
        if !value.is_finite() || value <= 0.0 {
            return Err(LayoutError::invalid("grid spacing", value));
        }
        Ok(match mode {
            GridMode::Pixels => GridSpacing::Pixels(value),
            GridMode::PercentOfWidth => {
                GridSpacing::PercentOfWidth(value.clamp(MIN_PERCENT, MAX_PERCENT))
            }
        })
    }

    pub fn mode(&self) -> GridMode {
        match self {
            GridSpacing::Pixels(_) => GridMode::Pixels,
            GridSpacing::PercentOfWidth(_) => GridMode::PercentOfWidth,
        }
    }

    /// The raw value in the spacing's own unit.
    pub fn value(&self) -> f64 {
        match *self {
            GridSpacing::Pixels(v) | GridSpacing::PercentOfWidth(v) => v,
        }
    }
}

/// Grid settings owned by the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct GridModel {
    pub visible: bool,
    spacing: GridSpacing,
    pub snap_enabled: bool,
    /// RGBA, unmultiplied.
    pub line_color: [u8; 4],
    pub line_width: f32,
}

impl Default for GridModel {
    fn default() -> Self {
        Self {
            visible: true,
            spacing: GridSpacing::Pixels(50.0),
            snap_enabled: true,
            line_color: [200, 200, 200, 255],
            line_width: 1.0,
        }
    }
}

impl GridModel {
    pub fn new(spacing: GridSpacing) -> Self {
        Self {
            spacing,
            ..Self::default()
        }
    }

    pub fn spacing(&self) -> GridSpacing {
        self.spacing
    }

    pub fn mode(&self) -> GridMode {
        self.spacing.mode()
    }

    /// Set the spacing in the current unit. Non-positive values are rejected
    /// and leave the model unchanged.
    pub fn set_spacing(&mut self, value: f64) -> Result<()> {
        self.spacing = GridSpacing::new(self.mode(), value)?;
        Ok(())
    }

    /// Switch the spacing unit, keeping the numeric value.
    pub fn set_mode(&mut self, mode: GridMode) {
        if mode == self.mode() {
            return;
        }
        // The current value is already positive, so this cannot fail.
        if let Ok(spacing) = GridSpacing::new(mode, self.spacing.value()) {
            self.spacing = spacing;
        }
    }

    pub fn set_spacing_with_mode(&mut self, spacing: GridSpacing) -> Result<()> {
        self.spacing = GridSpacing::new(spacing.mode(), spacing.value())?;
        Ok(())
    }

    /// Spacing in canvas pixels for a canvas of the given width.
    pub fn actual_pixel_spacing(&self, canvas_width: f64) -> f64 {
        match self.spacing {
            GridSpacing::Pixels(px) => px,
            GridSpacing::PercentOfWidth(pct) => canvas_width * pct / 100.0,
        }
    }

    /// Pixel offsets of the grid lines along one axis of length `canvas_size`.
    ///
    /// The first line is at 0 and the last exactly at `canvas_size`. In
    /// percentage mode the axis is divided into a fixed number of equal
    /// steps; in pixel mode lines sit on multiples of the spacing, followed
    /// by a closing line on the far edge.
    pub fn line_positions(&self, canvas_size: f64) -> Vec<f64> {
        if canvas_size <= 0.0 || !canvas_size.is_finite() {
            return vec![0.0];
        }

        match self.spacing {
            GridSpacing::PercentOfWidth(pct) => {
                let count = percent_line_count(pct);
                let steps = (count - 1) as f64;
                (0..count)
                    .map(|i| {
                        if i == count - 1 {
                            canvas_size
                        } else {
                            canvas_size * i as f64 / steps
                        }
                    })
                    .collect()
            }
            GridSpacing::Pixels(px) => {
                // Sub-pixel spacings draw every n-th line, keeping at most
                // one line per pixel and MAX_PIXEL_LINES overall.
                let min_step = (canvas_size / MAX_PIXEL_LINES as f64).max(1.0);
                let step = if px < min_step {
                    (min_step / px).ceil() * px
                } else {
                    px
                };
                let mut lines = Vec::new();
                let edge = canvas_size - canvas_size * 1e-9;
                let mut k = 0u64;
                loop {
                    let offset = k as f64 * step;
                    if offset >= edge {
                        break;
                    }
                    lines.push(offset);
                    k += 1;
                }
                lines.push(canvas_size);
                lines
            }
        }
    }

    /// Snap a point to the nearest grid intersection. Identity when snapping
    /// is disabled. Points outside the canvas are snapped too.
    pub fn snap(&self, point: Point, canvas_width: f64) -> Point {
        if !self.snap_enabled {
            return point;
        }
        let spacing = self.actual_pixel_spacing(canvas_width);
        Point::new(snap_value(point.x, spacing), snap_value(point.y, spacing))
    }
}

/// Number of grid lines for a percentage spacing.
fn percent_line_count(pct: f64) -> usize {
    if let Some(&(_, count)) = EXACT_PERCENT_LINES.iter().find(|(p, _)| *p == pct) {
        return count;
    }
    ((100.0 / pct).floor() as usize + 1).max(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn percent_grid(pct: f64) -> GridModel {
        GridModel::new(GridSpacing::new(GridMode::PercentOfWidth, pct).unwrap())
    }

    #[test]
    fn test_round_percentages_have_exact_line_counts() {
        for (pct, expected) in [(10.0, 11), (20.0, 6), (25.0, 5), (50.0, 3)] {
            let lines = percent_grid(pct).line_positions(1000.0);
            assert_eq!(lines.len(), expected, "spacing {}%", pct);
            assert_eq!(lines[0], 0.0);
            assert_eq!(*lines.last().unwrap(), 1000.0);
        }
    }

    #[test]
    fn test_half_canvas_lines() {
        let lines = percent_grid(50.0).line_positions(1024.0);
        assert_eq!(lines, vec![0.0, 512.0, 1024.0]);
    }

    #[test]
    fn test_general_percentage_is_evenly_spread() {
        // floor(100 / 30) + 1 = 4 lines
        let lines = percent_grid(30.0).line_positions(900.0);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], 0.0);
        assert!((lines[1] - 300.0).abs() < 1e-9);
        assert!((lines[2] - 600.0).abs() < 1e-9);
        assert_eq!(lines[3], 900.0);

        let lines = percent_grid(100.0).line_positions(640.0);
        assert_eq!(lines, vec![0.0, 640.0]);
    }

    #[test]
    fn test_percentage_is_clamped() {
        let mut grid = percent_grid(50.0);
        grid.set_spacing(250.0).unwrap();
        assert_eq!(grid.spacing(), GridSpacing::PercentOfWidth(100.0));
        grid.set_spacing(0.01).unwrap();
        assert_eq!(grid.spacing(), GridSpacing::PercentOfWidth(0.1));
    }

    #[test]
    fn test_non_positive_spacing_is_rejected() {
        let mut grid = GridModel::default();
        assert!(grid.set_spacing(0.0).is_err());
        assert!(grid.set_spacing(-5.0).is_err());
        assert!(grid.set_spacing(f64::NAN).is_err());
        assert_eq!(grid.spacing(), GridSpacing::Pixels(50.0));
    }

    #[test]
    fn test_actual_pixel_spacing() {
        let grid = GridModel::default();
        assert_eq!(grid.actual_pixel_spacing(2048.0), 50.0);

        let grid = percent_grid(25.0);
        assert_eq!(grid.actual_pixel_spacing(800.0), 200.0);
    }

    #[test]
    fn test_pixel_lines_close_on_far_edge() {
        let mut grid = GridModel::default();
        grid.set_spacing(300.0).unwrap();
        assert_eq!(grid.line_positions(1000.0), vec![0.0, 300.0, 600.0, 900.0, 1000.0]);

        grid.set_spacing(250.0).unwrap();
        assert_eq!(grid.line_positions(1000.0), vec![0.0, 250.0, 500.0, 750.0, 1000.0]);
    }

    #[test]
    fn test_tiny_pixel_spacing_limits_line_count() {
        let mut grid = GridModel::default();
        grid.set_spacing(0.001).unwrap();
        let lines = grid.line_positions(4096.0);
        assert!(lines.len() <= 4097, "{} lines", lines.len());
        assert_eq!(lines[0], 0.0);
        assert_eq!(*lines.last().unwrap(), 4096.0);
        // Drawn lines still sit on multiples of the spacing.
        assert!((lines[1] / 0.001 - (lines[1] / 0.001).round()).abs() < 1e-6);

        grid.set_spacing(2.0).unwrap();
        assert!(grid.line_positions(1_000_000.0).len() <= MAX_PIXEL_LINES + 1);
        // Snapping keeps the exact spacing.
        assert_eq!(grid.actual_pixel_spacing(1_000_000.0), 2.0);
    }

    #[test]
    fn test_snap_is_idempotent() {
        let mut grid = GridModel::default();
        for spacing in [0.3, 7.0, 33.3, 50.0, 128.0] {
            grid.set_spacing(spacing).unwrap();
            for &(x, y) in &[(0.0, 0.0), (12.7, 99.1), (-41.2, 1003.9), (5000.5, -0.2)] {
                let once = grid.snap(Point::new(x, y), 1024.0);
                let twice = grid.snap(once, 1024.0);
                assert!((once.x - twice.x).abs() < 1e-9);
                assert!((once.y - twice.y).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_snap_disabled_is_identity() {
        let mut grid = GridModel::default();
        grid.snap_enabled = false;
        let p = Point::new(13.37, 42.42);
        assert_eq!(grid.snap(p, 1024.0), p);
    }

    #[test]
    fn test_snap_uses_canvas_width_in_percent_mode() {
        let grid = percent_grid(10.0);
        let snapped = grid.snap(Point::new(130.0, 260.0), 1000.0);
        assert_eq!(snapped, Point::new(100.0, 300.0));
    }

    #[test]
    fn test_set_mode_keeps_value() {
        let mut grid = GridModel::default();
        grid.set_spacing(20.0).unwrap();
        grid.set_mode(GridMode::PercentOfWidth);
        assert_eq!(grid.spacing(), GridSpacing::PercentOfWidth(20.0));
        grid.set_mode(GridMode::Pixels);
        assert_eq!(grid.spacing(), GridSpacing::Pixels(20.0));
    }
}
