// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides the point and rectangle types used by the layout
//! core, coordinate transformations between canvas pixels and normalized
//! (fraction of canvas) coordinates, and the nearest-multiple snap rule.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// A 2D point or offset in canvas pixels (or fractions, once normalized).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Axis-aligned rectangle. `min` is the top-left corner; width and height
/// are never negative.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    pub fn from_min_size(min: Point, width: f64, height: f64) -> Self {
        Self::from_corners(min, Point::new(min.x + width, min.y + height))
    }

    /// Build a rectangle from any two opposite corners, in any order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Half-open containment: the right and bottom edges are outside.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x < self.max.x && p.y >= self.min.y && p.y < self.max.y
    }

    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            min: Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    /// A square of side `size` centered on `center`.
    pub fn centered_square(center: Point, size: f64) -> Rect {
        let half = size / 2.0;
        Rect {
            min: Point::new(center.x - half, center.y - half),
            max: Point::new(center.x + half, center.y + half),
        }
    }
}

/// Convert pixel coordinates to normalized coordinates (0.0 to 1.0).
///
/// Returns the origin when either dimension is not positive.
pub fn normalize_coordinates(pixel_x: f64, pixel_y: f64, width: f64, height: f64) -> Point {
    if width <= 0.0 || height <= 0.0 {
        return Point::ZERO;
    }
    Point {
        x: pixel_x / width,
        y: pixel_y / height,
    }
}

/// Convert normalized coordinates to pixel coordinates.
pub fn denormalize_coordinates(point: &Point, width: f64, height: f64) -> (f64, f64) {
    (point.x * width, point.y * height)
}

/// Round `value` to the nearest multiple of `spacing`.
///
/// A non-positive spacing leaves the value untouched.
pub fn snap_value(value: f64, spacing: f64) -> f64 {
    if spacing <= 0.0 || !spacing.is_finite() {
        return value;
    }
    (value / spacing).round() * spacing
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_denormalize_roundtrip() {
        let width = 1920.0;
        let height = 1080.0;
        let pixel_x = 960.0;
        let pixel_y = 540.0;

        let normalized = normalize_coordinates(pixel_x, pixel_y, width, height);
        let (denorm_x, denorm_y) = denormalize_coordinates(&normalized, width, height);

        assert!((denorm_x - pixel_x).abs() < 0.0001);
        assert!((denorm_y - pixel_y).abs() < 0.0001);
    }

    #[test]
    fn test_normalize_corners() {
        let width = 1920.0;
        let height = 1080.0;

        // Top-left corner
        let tl = normalize_coordinates(0.0, 0.0, width, height);
        assert_eq!(tl.x, 0.0);
        assert_eq!(tl.y, 0.0);

        // Bottom-right corner
        let br = normalize_coordinates(1920.0, 1080.0, width, height);
        assert_eq!(br.x, 1.0);
        assert_eq!(br.y, 1.0);
    }

    #[test]
    fn test_normalize_zero_canvas() {
        let p = normalize_coordinates(100.0, 50.0, 0.0, 600.0);
        assert_eq!(p, Point::ZERO);
    }

    #[test]
    fn test_snap_value_nearest_multiple() {
        assert_eq!(snap_value(210.0, 50.0), 200.0);
        assert_eq!(snap_value(230.0, 50.0), 250.0);
        assert_eq!(snap_value(-30.0, 50.0), -50.0);
        assert_eq!(snap_value(42.0, 0.0), 42.0);
    }

    #[test]
    fn test_rect_from_corners_is_normalized() {
        let r = Rect::from_corners(Point::new(100.0, 80.0), Point::new(20.0, 10.0));
        assert_eq!(r.min, Point::new(20.0, 10.0));
        assert_eq!(r.width(), 80.0);
        assert_eq!(r.height(), 70.0);
        assert!(r.contains(Point::new(20.0, 10.0)));
        assert!(!r.contains(Point::new(100.0, 80.0)));
    }
}
