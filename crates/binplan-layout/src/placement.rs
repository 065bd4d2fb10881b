#![forbid(unsafe_code)]

//! Nearest-free-cell search.
//!
//! Used by duplicate and paste to find a legal spot near a preferred cell.
//! The preferred cell is tried first; after that the search walks square
//! rings of growing Chebyshev radius, visiting only the ring boundary in
//! ascending `dx` then ascending `dy` order. The order is part of the
//! contract: identical inputs always produce the identical cell.

use binplan_core::geometry::{CellCoord, GridRect, GridSize};

/// True when a `width x height` footprint at `cell` is inside the grid and
/// clear of every rectangle in `occupied`.
#[must_use]
pub fn is_free(
    cell: CellCoord,
    width: i32,
    height: i32,
    grid: GridSize,
    occupied: &[GridRect],
) -> bool {
    let candidate = GridRect::new(cell.x, cell.y, width, height);
    candidate.in_bounds(grid) && !occupied.iter().any(|r| r.overlaps(&candidate))
}

/// Find the closest legal cell to `start`.
///
/// Returns `None` once every ring up to `grid.max_dim()` has been exhausted.
#[must_use]
pub fn find_free_cell(
    start: CellCoord,
    width: i32,
    height: i32,
    grid: GridSize,
    occupied: &[GridRect],
) -> Option<CellCoord> {
    if is_free(start, width, height, grid, occupied) {
        return Some(start);
    }
    let max_radius = grid.max_dim();
    for radius in 1..=max_radius {
        for dx in -radius..=radius {
            for dy in -radius..=radius {
                if dx.abs().max(dy.abs()) != radius {
                    continue;
                }
                let cell =
                    CellCoord::new(start.x.saturating_add(dx), start.y.saturating_add(dy));
                if is_free(cell, width, height, grid, occupied) {
                    binplan_core::trace!(
                        start_x = start.x,
                        start_y = start.y,
                        found_x = cell.x,
                        found_y = cell.y,
                        radius,
                        "placement search found cell"
                    );
                    return Some(cell);
                }
            }
        }
    }
    binplan_core::trace!(
        start_x = start.x,
        start_y = start.y,
        width,
        height,
        "placement search exhausted"
    );
    None
}
