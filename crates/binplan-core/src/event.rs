#![forbid(unsafe_code)]

//! Canonical pointer event types.
//!
//! The host (browser glue, canvas shell, test harness) converts whatever raw
//! input it receives into [`PointerEvent`]s. Mouse, touch, and pen all share
//! one stream; each contact is identified by an opaque `pointer_id`.
//!
//! # Design Notes
//!
//! - Positions are in host units ([`ScreenPoint`]), not grid cells.
//! - `is_primary` mirrors the DOM notion: the first finger of a multi-touch
//!   gesture, or the only mouse pointer.
//! - `over_control` is set by the host when the press landed on an
//!   interactive control (button, input, ...) nested inside a draggable.

use serde::{Deserialize, Serialize};

use crate::geometry::ScreenPoint;

/// Opaque handle to a host element (drag source, drop surface, indicator).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub u64);

/// Device class that produced a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerKind {
    #[default]
    Mouse,
    Touch,
    Pen,
}

/// Pointer button for press/release events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Phase of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum PointerPhase {
    Down { button: PointerButton },
    Move,
    Up { button: PointerButton },
    Cancel,
}

/// One normalized pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub pointer_id: u32,
    pub kind: PointerKind,
    pub phase: PointerPhase,
    pub position: ScreenPoint,
    pub is_primary: bool,
    pub over_control: bool,
}

impl PointerEvent {
    /// Create a primary mouse event.
    #[must_use]
    pub const fn new(pointer_id: u32, phase: PointerPhase, position: ScreenPoint) -> Self {
        Self {
            pointer_id,
            kind: PointerKind::Mouse,
            phase,
            position,
            is_primary: true,
            over_control: false,
        }
    }

    /// Primary-button press.
    #[must_use]
    pub const fn down(pointer_id: u32, x: f64, y: f64) -> Self {
        Self::new(
            pointer_id,
            PointerPhase::Down {
                button: PointerButton::Primary,
            },
            ScreenPoint::new(x, y),
        )
    }

    /// Movement.
    #[must_use]
    pub const fn moved(pointer_id: u32, x: f64, y: f64) -> Self {
        Self::new(pointer_id, PointerPhase::Move, ScreenPoint::new(x, y))
    }

    /// Primary-button release.
    #[must_use]
    pub const fn up(pointer_id: u32, x: f64, y: f64) -> Self {
        Self::new(
            pointer_id,
            PointerPhase::Up {
                button: PointerButton::Primary,
            },
            ScreenPoint::new(x, y),
        )
    }

    /// Host-initiated cancellation (touch interrupted, capture lost).
    #[must_use]
    pub const fn cancel(pointer_id: u32, x: f64, y: f64) -> Self {
        Self::new(pointer_id, PointerPhase::Cancel, ScreenPoint::new(x, y))
    }

    /// Set the device kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: PointerKind) -> Self {
        self.kind = kind;
        self
    }

    /// Mark as a non-primary contact (second finger, extra pen).
    #[must_use]
    pub const fn secondary_contact(mut self) -> Self {
        self.is_primary = false;
        self
    }

    /// Mark the press as landing on an interactive control.
    #[must_use]
    pub const fn over_control(mut self) -> Self {
        self.over_control = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_default_to_primary_mouse() {
        let ev = PointerEvent::down(7, 1.0, 2.0);
        assert_eq!(ev.pointer_id, 7);
        assert_eq!(ev.kind, PointerKind::Mouse);
        assert!(ev.is_primary);
        assert!(!ev.over_control);
        assert_eq!(ev.position, ScreenPoint::new(1.0, 2.0));
    }

    #[test]
    fn builders_compose() {
        let ev = PointerEvent::down(3, 5.0, 5.0)
            .with_kind(PointerKind::Touch)
            .secondary_contact()
            .over_control();
        assert_eq!(ev.kind, PointerKind::Touch);
        assert!(!ev.is_primary);
        assert!(ev.over_control);
        assert_eq!(ev.pointer_id, 3);
    }

    #[test]
    fn phase_equality() {
        let phase = PointerPhase::Down {
            button: PointerButton::Primary,
        };
        assert_eq!(phase, PointerPhase::Down { button: PointerButton::Primary });
        assert_ne!(PointerPhase::Move, PointerPhase::Cancel);
    }
}
