#![forbid(unsafe_code)]

//! Core: geometry primitives, pointer events, and logging.

pub mod event;
pub mod geometry;
pub mod logging;

pub use event::{ElementId, PointerButton, PointerEvent, PointerKind, PointerPhase};
pub use geometry::{CellCoord, GridRect, GridSize, ScreenPoint, ScreenRect, in_bounds, overlaps};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, info, trace, warn};
