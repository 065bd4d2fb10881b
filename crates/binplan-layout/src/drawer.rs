#![forbid(unsafe_code)]

//! Drawer fitting.
//!
//! Converts physical drawer and model dimensions into grid units. One grid
//! unit is [`GRID_UNIT_MM`] millimetres.

use binplan_core::geometry::GridSize;
use serde::{Deserialize, Serialize};

/// Edge length of one grid cell in millimetres.
pub const GRID_UNIT_MM: f64 = 42.0;

/// Grid that fits inside a drawer, plus the unused margin per axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawerFit {
    pub width_mm: f64,
    pub depth_mm: f64,
    pub grid: GridSize,
    /// `width_mm - grid.x * GRID_UNIT_MM`.
    pub gap_width_mm: f64,
    /// `depth_mm - grid.y * GRID_UNIT_MM`.
    pub gap_depth_mm: f64,
}

impl DrawerFit {
    /// Largest whole grid that fits a drawer. Negative or non-finite inputs
    /// count as zero.
    #[must_use]
    pub fn from_drawer_mm(width_mm: f64, depth_mm: f64) -> Self {
        let width_mm = sanitize(width_mm);
        let depth_mm = sanitize(depth_mm);
        let units_x = whole_units(width_mm);
        let units_y = whole_units(depth_mm);
        Self {
            width_mm,
            depth_mm,
            grid: GridSize::new(units_x, units_y),
            gap_width_mm: width_mm - f64::from(units_x) * GRID_UNIT_MM,
            gap_depth_mm: depth_mm - f64::from(units_y) * GRID_UNIT_MM,
        }
    }

    #[must_use]
    pub fn has_gap(&self) -> bool {
        self.gap_width_mm > 0.0 || self.gap_depth_mm > 0.0
    }
}

fn sanitize(mm: f64) -> f64 {
    if mm.is_finite() && mm > 0.0 { mm } else { 0.0 }
}

fn whole_units(mm: f64) -> i32 {
    // Saturating float-to-int cast.
    (mm / GRID_UNIT_MM).floor() as i32
}

/// Catalog footprint for a model bounding box: whole units rounded up per
/// axis, smaller value first.
#[must_use]
pub fn footprint_units(x_mm: f64, y_mm: f64) -> (i32, i32) {
    let a = (sanitize(x_mm) / GRID_UNIT_MM).ceil() as i32;
    let b = (sanitize(y_mm) / GRID_UNIT_MM).ceil() as i32;
    (a.min(b), a.max(b))
}
