#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! Two coordinate spaces live here:
//!
//! - **Grid space**: integer cells, origin at the top-left of the drawer grid.
//!   [`GridRect`] footprints, [`GridSize`] bounds, and [`CellCoord`] drop cells.
//! - **Screen space**: host units (CSS pixels, canvas units, ...) as `f64`.
//!   [`ScreenPoint`] pointer positions and [`ScreenRect`] bounding rects.

use serde::{Deserialize, Serialize};

/// Axis-aligned footprint of a placed item in grid cells.
///
/// Coordinates are signed because an item may be moved partially outside the
/// grid; that state is legal and only reported through validity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridRect {
    /// Left edge (inclusive).
    pub x: i32,
    /// Top edge (inclusive).
    pub y: i32,
    /// Width in cells.
    pub width: i32,
    /// Height in cells.
    pub height: i32,
}

impl GridRect {
    /// Create a new footprint.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Same size, different origin.
    #[inline]
    pub const fn at(&self, x: i32, y: i32) -> Self {
        Self::new(x, y, self.width, self.height)
    }

    /// Open-interval overlap test on both axes.
    ///
    /// Rectangles that only share an edge do not overlap.
    #[inline]
    pub const fn overlaps(&self, other: &GridRect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// True when all four edges lie within `[0, grid]`.
    #[inline]
    pub const fn in_bounds(&self, grid: GridSize) -> bool {
        self.x >= 0 && self.y >= 0 && self.right() <= grid.x && self.bottom() <= grid.y
    }
}

/// Free-function form of [`GridRect::overlaps`].
#[inline]
pub const fn overlaps(a: &GridRect, b: &GridRect) -> bool {
    a.overlaps(b)
}

/// Free-function form of [`GridRect::in_bounds`].
#[inline]
pub const fn in_bounds(rect: &GridRect, grid: GridSize) -> bool {
    rect.in_bounds(grid)
}

/// Grid dimensions in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    /// Columns.
    pub x: i32,
    /// Rows.
    pub y: i32,
}

impl GridSize {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Largest dimension; the outer radius of a ring search.
    #[inline]
    pub const fn max_dim(&self) -> i32 {
        if self.x > self.y { self.x } else { self.y }
    }

    /// Check if either dimension is non-positive.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.x <= 0 || self.y <= 0
    }

    /// The whole grid as a rectangle at the origin.
    #[inline]
    pub const fn as_rect(&self) -> GridRect {
        GridRect::new(0, 0, self.x, self.y)
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self::new(4, 4)
    }
}

/// One grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CellCoord {
    pub x: i32,
    pub y: i32,
}

impl CellCoord {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A pointer position in host units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(&self, other: ScreenPoint) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Component-wise `self - other`.
    #[must_use]
    pub fn offset_from(&self, other: ScreenPoint) -> ScreenPoint {
        ScreenPoint::new(self.x - other.x, self.y - other.y)
    }
}

/// A host bounding rectangle (`getBoundingClientRect`-shaped).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenRect {
    #[inline]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Top-left corner.
    #[inline]
    pub const fn origin(&self) -> ScreenPoint {
        ScreenPoint::new(self.left, self.top)
    }

    /// Check if the rectangle has no usable area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Closed containment test; the far edges count as inside.
    #[inline]
    pub fn contains(&self, point: ScreenPoint) -> bool {
        point.x >= self.left
            && point.x <= self.right()
            && point.y >= self.top
            && point.y <= self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = GridRect::new(0, 0, 2, 2);
        let b = GridRect::new(2, 0, 2, 2);
        let c = GridRect::new(0, 2, 2, 2);
        assert!(!a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert!(!overlaps(&b, &a));
    }

    #[test]
    fn corner_overlap_detected() {
        let a = GridRect::new(0, 0, 2, 2);
        let b = GridRect::new(1, 1, 2, 2);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn containment_is_overlap() {
        let outer = GridRect::new(0, 0, 4, 4);
        let inner = GridRect::new(1, 1, 1, 1);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn overlap_needs_both_axes() {
        // Same columns, disjoint rows.
        let a = GridRect::new(0, 0, 3, 1);
        let b = GridRect::new(0, 5, 3, 1);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn in_bounds_edges() {
        let grid = GridSize::new(4, 4);
        assert!(GridRect::new(0, 0, 4, 4).in_bounds(grid));
        assert!(GridRect::new(3, 3, 1, 1).in_bounds(grid));
        assert!(!GridRect::new(3, 3, 2, 1).in_bounds(grid));
        assert!(!GridRect::new(-1, 0, 1, 1).in_bounds(grid));
        assert!(!GridRect::new(0, -1, 1, 1).in_bounds(grid));
        assert!(!in_bounds(&GridRect::new(0, 4, 1, 1), grid));
    }

    #[test]
    fn grid_size_helpers() {
        assert_eq!(GridSize::new(3, 7).max_dim(), 7);
        assert_eq!(GridSize::new(9, 2).max_dim(), 9);
        assert!(GridSize::new(0, 3).is_empty());
        assert!(!GridSize::default().is_empty());
        assert_eq!(GridSize::new(5, 6).as_rect(), GridRect::new(0, 0, 5, 6));
    }

    #[test]
    fn rect_at_keeps_size() {
        let r = GridRect::new(1, 2, 3, 4);
        assert_eq!(r.at(7, 8), GridRect::new(7, 8, 3, 4));
        assert_eq!(r.right(), 4);
        assert_eq!(r.bottom(), 6);
    }

    #[test]
    fn screen_point_distance() {
        let a = ScreenPoint::new(50.0, 50.0);
        let b = ScreenPoint::new(60.0, 60.0);
        assert!((a.distance(b) - 200f64.sqrt()).abs() < 1e-9);
        assert_eq!(b.offset_from(a), ScreenPoint::new(10.0, 10.0));
    }

    #[test]
    fn screen_rect_contains_far_edge() {
        let r = ScreenRect::new(0.0, 0.0, 400.0, 400.0);
        assert!(r.contains(ScreenPoint::new(400.0, 400.0)));
        assert!(r.contains(ScreenPoint::new(0.0, 0.0)));
        assert!(!r.contains(ScreenPoint::new(400.1, 10.0)));
        assert_eq!(r.origin(), ScreenPoint::new(0.0, 0.0));
    }

    #[test]
    fn screen_rect_empty() {
        assert!(ScreenRect::new(0.0, 0.0, 0.0, 10.0).is_empty());
        assert!(ScreenRect::new(0.0, 0.0, 10.0, f64::NAN).is_empty());
        assert!(!ScreenRect::new(5.0, 5.0, 1.0, 1.0).is_empty());
    }
}
