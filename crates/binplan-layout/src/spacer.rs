#![forbid(unsafe_code)]

//! Decorative spacer geometry.
//!
//! When a drawer is not an exact multiple of the grid unit, the leftover
//! margin can be filled with spacer strips. This module turns the margin and
//! a per-axis [`SpacerMode`] into at most four strips, each with its physical
//! size and a render rectangle in percent of the drawer.
//!
//! Horizontal strips (left/right) consume the width gap and span the full
//! depth. Vertical strips (top/bottom) consume the depth gap and span the
//! full width.

use serde::{Deserialize, Serialize};

/// How the gap on one axis is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpacerMode {
    #[default]
    None,
    /// One strip holding the whole gap on the leading edge.
    OneSided,
    /// Half the gap on each opposing edge.
    Symmetrical,
}

/// Spacer modes for both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SpacerConfig {
    pub horizontal: SpacerMode,
    pub vertical: SpacerMode,
}

impl SpacerConfig {
    #[must_use]
    pub const fn new(horizontal: SpacerMode, vertical: SpacerMode) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    #[must_use]
    pub const fn with_horizontal(mut self, mode: SpacerMode) -> Self {
        self.horizontal = mode;
        self
    }

    #[must_use]
    pub const fn with_vertical(mut self, mode: SpacerMode) -> Self {
        self.vertical = mode;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpacerEdge {
    Left,
    Right,
    Top,
    Bottom,
}

/// Rectangle in percent of the drawer's width and depth.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PercentRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// One spacer strip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComputedSpacer {
    pub edge: SpacerEdge,
    /// Thickness of the strip in millimetres.
    pub size_mm: f64,
    pub render: PercentRect,
}

/// Compute spacer strips for a drawer's leftover margin.
///
/// Returns strips in left, right, top, bottom order. A mode of
/// [`SpacerMode::None`], a non-positive gap, or a non-positive drawer
/// dimension yields nothing for that axis.
#[must_use]
pub fn compute_spacers(
    gap_width_mm: f64,
    gap_depth_mm: f64,
    config: SpacerConfig,
    drawer_width_mm: f64,
    drawer_depth_mm: f64,
) -> Vec<ComputedSpacer> {
    let mut out = Vec::with_capacity(4);
    if !(drawer_width_mm > 0.0 && drawer_depth_mm > 0.0) {
        return out;
    }

    for (side, size_mm) in axis_strips(config.horizontal, gap_width_mm) {
        let pct = size_mm / drawer_width_mm * 100.0;
        let (edge, left) = match side {
            Side::Leading => (SpacerEdge::Left, 0.0),
            Side::Trailing => (SpacerEdge::Right, 100.0 - pct),
        };
        out.push(ComputedSpacer {
            edge,
            size_mm,
            render: PercentRect {
                left,
                top: 0.0,
                width: pct,
                height: 100.0,
            },
        });
    }

    for (side, size_mm) in axis_strips(config.vertical, gap_depth_mm) {
        let pct = size_mm / drawer_depth_mm * 100.0;
        let (edge, top) = match side {
            Side::Leading => (SpacerEdge::Top, 0.0),
            Side::Trailing => (SpacerEdge::Bottom, 100.0 - pct),
        };
        out.push(ComputedSpacer {
            edge,
            size_mm,
            render: PercentRect {
                left: 0.0,
                top,
                width: 100.0,
                height: pct,
            },
        });
    }

    binplan_core::trace!(count = out.len(), "spacers computed");
    out
}

#[derive(Clone, Copy)]
enum Side {
    Leading,
    Trailing,
}

/// Strips for one axis with their thickness in millimetres.
fn axis_strips(mode: SpacerMode, gap_mm: f64) -> Vec<(Side, f64)> {
    if gap_mm.is_nan() || gap_mm <= 0.0 {
        return Vec::new();
    }
    match mode {
        SpacerMode::None => Vec::new(),
        SpacerMode::OneSided => vec![(Side::Leading, gap_mm)],
        SpacerMode::Symmetrical => {
            let half = gap_mm / 2.0;
            vec![(Side::Leading, half), (Side::Trailing, half)]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn none_mode_yields_nothing() {
        let out = compute_spacers(10.0, 10.0, SpacerConfig::default(), 178.0, 136.0);
        assert!(out.is_empty());
    }

    #[test]
    fn one_sided_is_leading_edge() {
        let config = SpacerConfig::new(SpacerMode::OneSided, SpacerMode::OneSided);
        let out = compute_spacers(10.0, 20.0, config, 200.0, 100.0);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].edge, SpacerEdge::Left);
        assert!(close(out[0].size_mm, 10.0));
        assert!(close(out[0].render.width, 5.0));
        assert!(close(out[0].render.height, 100.0));
        assert_eq!(out[1].edge, SpacerEdge::Top);
        assert!(close(out[1].render.height, 20.0));
        assert!(close(out[1].render.width, 100.0));
    }

    #[test]
    fn symmetrical_splits_gap() {
        let config = SpacerConfig::default().with_horizontal(SpacerMode::Symmetrical);
        let out = compute_spacers(20.0, 0.0, config, 200.0, 100.0);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].edge, SpacerEdge::Left);
        assert_eq!(out[1].edge, SpacerEdge::Right);
        assert!(close(out[0].size_mm, 10.0));
        assert!(close(out[1].size_mm, 10.0));
        assert!(close(out[1].render.left, 95.0));
        assert!(close(out[1].render.width, 5.0));
    }

    #[test]
    fn four_strips_max() {
        let config = SpacerConfig::new(SpacerMode::Symmetrical, SpacerMode::Symmetrical);
        let out = compute_spacers(8.0, 6.0, config, 176.0, 132.0);
        let edges: Vec<_> = out.iter().map(|s| s.edge).collect();
        assert_eq!(
            edges,
            vec![SpacerEdge::Left, SpacerEdge::Right, SpacerEdge::Top, SpacerEdge::Bottom]
        );
    }

    #[test]
    fn non_positive_gap_or_drawer_yields_nothing() {
        let config = SpacerConfig::new(SpacerMode::OneSided, SpacerMode::Symmetrical);
        assert!(compute_spacers(0.0, -3.0, config, 100.0, 100.0).is_empty());
        assert!(compute_spacers(5.0, 5.0, config, 0.0, 100.0).is_empty());
        assert!(compute_spacers(f64::NAN, 0.0, config, 100.0, 100.0).is_empty());
    }
}
