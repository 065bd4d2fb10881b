#![forbid(unsafe_code)]

//! Direct-manipulation layer: pointer drag sources, the drop registry, and
//! drop resolution onto the grid.
//!
//! The host feeds [`PointerEvent`](binplan_core::PointerEvent)s to each
//! [`PointerDragSource`] together with the session's [`DragRegistry`] and a
//! [`DragHost`]. A completed drag lands in the registered
//! [`DropTargetConfig`]'s callback as a payload plus grid cell.

pub mod drag;
pub mod drop;
pub mod headless;
pub mod registry;

pub use drag::{
    DEFAULT_DRAG_THRESHOLD, DragCancelReason, DragConfig, DragConfigError, DragEffect, DragHost,
    DragNoopReason, DragSourceState, DragTransition, Draggable, ENV_DRAG_THRESHOLD,
    PointerDragSource,
};
pub use drop::{cell_at, resolve_drop};
pub use headless::{HeadlessHost, HostCall, IndicatorState};
pub use registry::{ActiveDrag, DragRegistry, DropCallback, DropTargetConfig};
