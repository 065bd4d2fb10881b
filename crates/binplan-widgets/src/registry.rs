#![forbid(unsafe_code)]

//! Drop target registry and active-drag channel.
//!
//! One [`DragRegistry`] per editing session. It holds at most one
//! [`ActiveDrag`] and at most one [`DropTargetConfig`]. Drag sources and the
//! drop resolver share it by `&mut` borrow; nothing here is global.

use std::fmt;

use binplan_core::event::ElementId;
use binplan_core::geometry::{CellCoord, GridSize, ScreenPoint};
use binplan_layout::store::DropPayload;

/// The drag in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveDrag {
    pub payload: DropPayload,
    /// Element the drag started from.
    pub source: ElementId,
    /// Contact position relative to the source's top-left corner.
    pub offset: ScreenPoint,
    /// Floating visual, if the host created one.
    pub indicator: Option<ElementId>,
    pub pointer_id: u32,
}

/// Callback invoked with the payload and target cell of a successful drop.
pub type DropCallback = Box<dyn FnMut(&DropPayload, CellCoord)>;

/// The mounted grid surface.
pub struct DropTargetConfig {
    pub element: ElementId,
    /// Grid dimensions in cells.
    pub grid: GridSize,
    on_drop: DropCallback,
}

impl DropTargetConfig {
    pub fn new<F>(element: ElementId, grid: GridSize, on_drop: F) -> Self
    where
        F: FnMut(&DropPayload, CellCoord) + 'static,
    {
        Self {
            element,
            grid,
            on_drop: Box::new(on_drop),
        }
    }

    /// Invoke the drop callback.
    pub fn dispatch(&mut self, payload: &DropPayload, cell: CellCoord) {
        (self.on_drop)(payload, cell);
    }
}

impl fmt::Debug for DropTargetConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DropTargetConfig")
            .field("element", &self.element)
            .field("grid", &self.grid)
            .finish_non_exhaustive()
    }
}

/// Active-drag slot plus drop-target slot.
#[derive(Debug, Default)]
pub struct DragRegistry {
    active: Option<ActiveDrag>,
    target: Option<DropTargetConfig>,
}

impl DragRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount a drop target, replacing any existing one.
    pub fn register_drop_target(&mut self, config: DropTargetConfig) {
        if let Some(previous) = &self.target {
            binplan_core::debug!(
                previous = previous.element.0,
                next = config.element.0,
                "drop target replaced"
            );
        }
        self.target = Some(config);
    }

    /// Unmount the target if it is `element`. Returns whether it was removed.
    pub fn unregister_drop_target(&mut self, element: ElementId) -> bool {
        if self.target.as_ref().is_some_and(|t| t.element == element) {
            self.target = None;
            return true;
        }
        false
    }

    pub fn drop_target(&self) -> Option<&DropTargetConfig> {
        self.target.as_ref()
    }

    pub fn drop_target_mut(&mut self) -> Option<&mut DropTargetConfig> {
        self.target.as_mut()
    }

    /// Claim the active-drag slot. Hands the drag back if the slot is taken.
    pub fn begin(&mut self, drag: ActiveDrag) -> Result<(), ActiveDrag> {
        if self.active.is_some() {
            return Err(drag);
        }
        self.active = Some(drag);
        Ok(())
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&ActiveDrag> {
        self.active.as_ref()
    }

    /// The active drag, if `source` owns it.
    pub fn active_for(&self, source: ElementId) -> Option<&ActiveDrag> {
        self.active.as_ref().filter(|a| a.source == source)
    }

    /// Release the slot if `source` owns it.
    pub fn take_active_for(&mut self, source: ElementId) -> Option<ActiveDrag> {
        if self.active.as_ref().is_some_and(|a| a.source == source) {
            return self.active.take();
        }
        None
    }
}
