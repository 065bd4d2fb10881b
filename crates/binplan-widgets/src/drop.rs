#![forbid(unsafe_code)]

//! Drop resolution.
//!
//! Maps a release point onto the registered drop target's grid and invokes
//! its callback. The floating indicator is hidden first so it cannot shadow
//! the hit test.

use binplan_core::geometry::{CellCoord, GridSize, ScreenPoint, ScreenRect};

use crate::drag::DragHost;
use crate::registry::{ActiveDrag, DragRegistry};

/// Grid cell under `point`, clamped to the grid.
///
/// Returns `None` for an empty rect or grid.
#[must_use]
pub fn cell_at(rect: ScreenRect, grid: GridSize, point: ScreenPoint) -> Option<CellCoord> {
    if rect.is_empty() || grid.is_empty() {
        return None;
    }
    let cell_w = rect.width / f64::from(grid.x);
    let cell_h = rect.height / f64::from(grid.y);
    let col = ((point.x - rect.left) / cell_w).floor() as i32;
    let row = ((point.y - rect.top) / cell_h).floor() as i32;
    Some(CellCoord::new(col.clamp(0, grid.x - 1), row.clamp(0, grid.y - 1)))
}

/// Resolve a release for `active` and fire the drop callback.
///
/// Returns the cell handed to the callback, or `None` when the release missed
/// the target, no target is mounted, or the target has no area.
pub fn resolve_drop<H>(
    registry: &mut DragRegistry,
    host: &mut H,
    active: &ActiveDrag,
    release: ScreenPoint,
) -> Option<CellCoord>
where
    H: DragHost + ?Sized,
{
    if let Some(indicator) = active.indicator {
        host.set_indicator_visible(indicator, false);
    }

    let Some(target) = registry.drop_target_mut() else {
        binplan_core::debug!("drop ignored: no target mounted");
        return None;
    };
    let hit = host.element_at(release);
    let on_target =
        hit.is_some_and(|el| el == target.element || host.is_within(el, target.element));
    if !on_target {
        binplan_core::debug!(x = release.x, y = release.y, "drop ignored: released off target");
        return None;
    }
    let rect = host.element_rect(target.element)?;
    let Some(cell) = cell_at(rect, target.grid, release) else {
        binplan_core::debug!("drop ignored: target has no area");
        return None;
    };

    binplan_core::debug!(
        source = active.source.0,
        cell_x = cell.x,
        cell_y = cell.y,
        "drop resolved"
    );
    target.dispatch(&active.payload, cell);
    Some(cell)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn far_corner_clamps_to_last_cell() {
        let rect = ScreenRect::new(0.0, 0.0, 400.0, 400.0);
        let grid = GridSize::new(4, 4);
        assert_eq!(
            cell_at(rect, grid, ScreenPoint::new(400.0, 400.0)),
            Some(CellCoord::new(3, 3))
        );
    }

    #[test]
    fn floors_within_cells() {
        let rect = ScreenRect::new(100.0, 50.0, 300.0, 200.0);
        let grid = GridSize::new(3, 4);
        assert_eq!(
            cell_at(rect, grid, ScreenPoint::new(199.9, 50.0)),
            Some(CellCoord::new(0, 0))
        );
        assert_eq!(
            cell_at(rect, grid, ScreenPoint::new(200.0, 149.0)),
            Some(CellCoord::new(1, 1))
        );
    }

    #[test]
    fn outside_points_clamp_to_zero() {
        let rect = ScreenRect::new(10.0, 10.0, 100.0, 100.0);
        assert_eq!(
            cell_at(rect, GridSize::new(2, 2), ScreenPoint::new(0.0, -5.0)),
            Some(CellCoord::new(0, 0))
        );
    }

    #[test]
    fn empty_rect_or_grid_yields_nothing() {
        let p = ScreenPoint::new(0.0, 0.0);
        assert_eq!(cell_at(ScreenRect::new(0.0, 0.0, 0.0, 100.0), GridSize::new(4, 4), p), None);
        assert_eq!(cell_at(ScreenRect::new(0.0, 0.0, 100.0, 100.0), GridSize::new(0, 4), p), None);
    }
}
