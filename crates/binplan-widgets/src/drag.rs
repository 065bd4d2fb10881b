#![forbid(unsafe_code)]

//! Pointer-driven drag sources.
//!
//! A [`PointerDragSource`] turns raw [`PointerEvent`]s for one host element
//! into either a tap or a drag. It never relies on a platform drag API: the
//! host only answers geometry queries and manages the floating indicator
//! through [`DragHost`].
//!
//! ```text
//! Idle -> Pressed -> Idle          (tap, or cancel)
//!            \-> Dragging -> Idle  (drop, release elsewhere, cancel, teardown)
//! ```
//!
//! # Invariants
//!
//! 1. A source tracks at most one contact; presses from other contacts while
//!    tracking are ignored.
//! 2. A press is ignored while any source owns the active-drag slot in the
//!    [`DragRegistry`].
//! 3. `on_drag_start` and `on_drag_end` fire exactly once per drag, in that
//!    order. `on_tap` never fires for a gesture that became a drag.
//! 4. Every call to [`PointerDragSource::handle_event`] returns a
//!    [`DragTransition`] with a strictly increasing `transition_id`.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Fallback |
//! |---------|-------|----------|
//! | No bounding rect at press | Element detached | Offset is zero |
//! | No indicator created | Host declined | Drag proceeds without a visual |
//! | Release off target | Hit test misses | Drag ends, nothing dropped |

use std::fmt;

use binplan_core::event::{ElementId, PointerButton, PointerEvent, PointerPhase};
use binplan_core::geometry::{CellCoord, ScreenPoint, ScreenRect};
use binplan_layout::store::DropPayload;
use serde::{Deserialize, Serialize};

use crate::drop::resolve_drop;
use crate::registry::{ActiveDrag, DragRegistry};

// ---------------------------------------------------------------------------
// Host seam
// ---------------------------------------------------------------------------

/// Host services the drag protocol needs.
///
/// Implemented by the rendering layer (DOM glue, canvas shell) or by
/// [`HeadlessHost`](crate::headless::HeadlessHost) in tests.
pub trait DragHost {
    /// Current bounding rect of an element, if it is attached.
    fn element_rect(&self, element: ElementId) -> Option<ScreenRect>;

    /// Topmost element under `point`.
    fn element_at(&self, point: ScreenPoint) -> Option<ElementId>;

    /// `element` is `ancestor` or nested inside it.
    fn is_within(&self, element: ElementId, ancestor: ElementId) -> bool;

    /// Clone `source`'s visual as a floating indicator with its top-left at
    /// `at`. Returns `None` if the host cannot provide one.
    fn create_indicator(&mut self, source: ElementId, at: ScreenPoint) -> Option<ElementId>;

    fn move_indicator(&mut self, indicator: ElementId, at: ScreenPoint);

    fn set_indicator_visible(&mut self, indicator: ElementId, visible: bool);

    fn remove_indicator(&mut self, indicator: ElementId);

    /// Toggle the "being dragged" mark on a source element.
    fn set_dragging(&mut self, source: ElementId, dragging: bool);
}

// ---------------------------------------------------------------------------
// Draggable
// ---------------------------------------------------------------------------

/// Something that can be picked up.
pub trait Draggable {
    /// Payload delivered to the drop callback. Captured once, at drag start.
    fn drag_payload(&self) -> DropPayload;

    /// Press and release without crossing the threshold.
    fn on_tap(&mut self) {}

    /// Called once when the threshold is crossed.
    fn on_drag_start(&mut self) {}

    /// Called once when the drag ends. `dropped` is `true` if the release
    /// landed on the drop target.
    fn on_drag_end(&mut self, _dropped: bool) {}
}

impl Draggable for DropPayload {
    fn drag_payload(&self) -> DropPayload {
        self.clone()
    }
}

// ---------------------------------------------------------------------------
// DragConfig
// ---------------------------------------------------------------------------

/// Default movement, in host units, before a press becomes a drag.
pub const DEFAULT_DRAG_THRESHOLD: f64 = 5.0;

/// Environment variable overriding the drag threshold.
pub const ENV_DRAG_THRESHOLD: &str = "BINPLAN_DRAG_THRESHOLD";

/// Drag gesture configuration.
///
/// Deserialization goes through [`DragConfig::new`], so a stored config
/// with a bad threshold is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDragConfig")]
pub struct DragConfig {
    threshold: f64,
}

#[derive(Deserialize)]
struct RawDragConfig {
    threshold: f64,
}

impl TryFrom<RawDragConfig> for DragConfig {
    type Error = DragConfigError;

    fn try_from(raw: RawDragConfig) -> Result<Self, Self::Error> {
        Self::new(raw.threshold)
    }
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_DRAG_THRESHOLD,
        }
    }
}

impl DragConfig {
    /// Config with an explicit threshold.
    pub fn new(threshold: f64) -> Result<Self, DragConfigError> {
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(DragConfigError::InvalidThreshold { threshold });
        }
        Ok(Self { threshold })
    }

    /// Replace the threshold.
    pub fn with_threshold(self, threshold: f64) -> Result<Self, DragConfigError> {
        Self::new(threshold)
    }

    /// Read [`ENV_DRAG_THRESHOLD`] through `get_env`; unset means default.
    pub fn from_env_with<F>(get_env: F) -> Result<Self, DragConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(raw) = get_env(ENV_DRAG_THRESHOLD) else {
            return Ok(Self::default());
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }
        let threshold = trimmed
            .parse::<f64>()
            .map_err(|_| DragConfigError::Unparsable { value: raw.clone() })?;
        Self::new(threshold)
    }

    /// Read the process environment.
    pub fn from_env() -> Result<Self, DragConfigError> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    #[must_use]
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Euclidean distance from `origin` to `current` is at least the
    /// threshold.
    #[must_use]
    pub fn crossed(&self, origin: ScreenPoint, current: ScreenPoint) -> bool {
        let dx = current.x - origin.x;
        let dy = current.y - origin.y;
        dx * dx + dy * dy >= self.threshold * self.threshold
    }
}

/// Drag configuration errors.
#[derive(Debug, Clone, PartialEq)]
pub enum DragConfigError {
    InvalidThreshold { threshold: f64 },
    Unparsable { value: String },
}

impl fmt::Display for DragConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidThreshold { threshold } => {
                write!(f, "drag threshold must be finite and > 0 (got {threshold})")
            }
            Self::Unparsable { value } => {
                write!(f, "{ENV_DRAG_THRESHOLD}={value:?} is not a number")
            }
        }
    }
}

impl std::error::Error for DragConfigError {}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

/// Lifecycle state of one drag source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DragSourceState {
    Idle,
    Pressed {
        pointer_id: u32,
        origin: ScreenPoint,
        /// Contact position relative to the element's top-left corner.
        offset: ScreenPoint,
    },
    Dragging {
        pointer_id: u32,
        origin: ScreenPoint,
        offset: ScreenPoint,
        current: ScreenPoint,
    },
}

impl DragSourceState {
    #[must_use]
    pub const fn pointer_id(&self) -> Option<u32> {
        match self {
            Self::Idle => None,
            Self::Pressed { pointer_id, .. } | Self::Dragging { pointer_id, .. } => {
                Some(*pointer_id)
            }
        }
    }
}

/// Why an event was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragNoopReason {
    /// Move/up/cancel with nothing tracked.
    NotTracking,
    NonPrimaryContact,
    NonPrimaryButton,
    /// Press landed on a nested interactive control.
    InteractiveControl,
    ContactAlreadyTracked,
    /// Another source owns the active-drag slot.
    OtherDragActive,
    PointerMismatch,
    ThresholdNotReached,
}

/// Why a gesture ended without a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragCancelReason {
    PointerCancel,
    Teardown,
}

/// Effect of one step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum DragEffect {
    Pressed {
        pointer_id: u32,
        origin: ScreenPoint,
    },
    Tap {
        pointer_id: u32,
    },
    DragStarted {
        pointer_id: u32,
        origin: ScreenPoint,
        current: ScreenPoint,
    },
    IndicatorMoved {
        pointer_id: u32,
        at: ScreenPoint,
    },
    /// Released over the drop target; the callback received `cell`.
    Dropped {
        pointer_id: u32,
        cell: CellCoord,
    },
    /// Released anywhere else.
    DragEnded {
        pointer_id: u32,
    },
    Canceled {
        pointer_id: u32,
        was_dragging: bool,
        reason: DragCancelReason,
    },
    Noop {
        reason: DragNoopReason,
    },
}

/// One observable protocol step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragTransition {
    pub transition_id: u64,
    pub from: DragSourceState,
    pub to: DragSourceState,
    pub effect: DragEffect,
}

/// Tap/drag recognizer bound to one host element.
#[derive(Debug)]
pub struct PointerDragSource<D> {
    element: ElementId,
    draggable: D,
    config: DragConfig,
    state: DragSourceState,
    transition_counter: u64,
}

impl<D: Draggable> PointerDragSource<D> {
    pub fn new(element: ElementId, draggable: D) -> Self {
        Self::with_config(element, draggable, DragConfig::default())
    }

    pub fn with_config(element: ElementId, draggable: D, config: DragConfig) -> Self {
        Self {
            element,
            draggable,
            config,
            state: DragSourceState::Idle,
            transition_counter: 0,
        }
    }

    #[must_use]
    pub const fn element(&self) -> ElementId {
        self.element
    }

    #[must_use]
    pub const fn state(&self) -> DragSourceState {
        self.state
    }

    #[must_use]
    pub const fn config(&self) -> DragConfig {
        self.config
    }

    pub fn draggable(&self) -> &D {
        &self.draggable
    }

    pub fn draggable_mut(&mut self) -> &mut D {
        &mut self.draggable
    }

    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(self.state, DragSourceState::Dragging { .. })
    }

    /// Feed one pointer event.
    pub fn handle_event<H>(
        &mut self,
        event: &PointerEvent,
        registry: &mut DragRegistry,
        host: &mut H,
    ) -> DragTransition
    where
        H: DragHost + ?Sized,
    {
        let from = self.state;
        let effect = match (self.state, event.phase) {
            (DragSourceState::Idle, PointerPhase::Down { button }) => {
                self.press(event, button, registry, host)
            }
            (DragSourceState::Idle, _) => DragEffect::Noop {
                reason: DragNoopReason::NotTracking,
            },
            (_, PointerPhase::Down { .. }) => DragEffect::Noop {
                reason: DragNoopReason::ContactAlreadyTracked,
            },
            (state, _) if state.pointer_id() != Some(event.pointer_id) => DragEffect::Noop {
                reason: DragNoopReason::PointerMismatch,
            },
            (
                DragSourceState::Pressed {
                    pointer_id,
                    origin,
                    offset,
                },
                PointerPhase::Move,
            ) => {
                if !self.config.crossed(origin, event.position) {
                    DragEffect::Noop {
                        reason: DragNoopReason::ThresholdNotReached,
                    }
                } else if registry.is_dragging() {
                    DragEffect::Noop {
                        reason: DragNoopReason::OtherDragActive,
                    }
                } else {
                    self.start_drag(pointer_id, origin, offset, event.position, registry, host)
                }
            }
            (DragSourceState::Pressed { pointer_id, .. }, PointerPhase::Up { .. }) => {
                self.state = DragSourceState::Idle;
                self.draggable.on_tap();
                DragEffect::Tap { pointer_id }
            }
            (DragSourceState::Pressed { pointer_id, .. }, PointerPhase::Cancel) => {
                self.state = DragSourceState::Idle;
                DragEffect::Canceled {
                    pointer_id,
                    was_dragging: false,
                    reason: DragCancelReason::PointerCancel,
                }
            }
            (
                DragSourceState::Dragging {
                    pointer_id,
                    origin,
                    offset,
                    ..
                },
                PointerPhase::Move,
            ) => {
                let at = event.position.offset_from(offset);
                if let Some(indicator) = registry
                    .active_for(self.element)
                    .and_then(|active| active.indicator)
                {
                    host.move_indicator(indicator, at);
                }
                self.state = DragSourceState::Dragging {
                    pointer_id,
                    origin,
                    offset,
                    current: event.position,
                };
                DragEffect::IndicatorMoved { pointer_id, at }
            }
            (DragSourceState::Dragging { pointer_id, .. }, PointerPhase::Up { .. }) => {
                let active = registry.take_active_for(self.element);
                let cell = active
                    .as_ref()
                    .and_then(|active| resolve_drop(registry, host, active, event.position));
                self.finish_drag(active.as_ref(), host, cell.is_some());
                self.state = DragSourceState::Idle;
                match cell {
                    Some(cell) => DragEffect::Dropped { pointer_id, cell },
                    None => DragEffect::DragEnded { pointer_id },
                }
            }
            (DragSourceState::Dragging { pointer_id, .. }, PointerPhase::Cancel) => {
                self.cancel_drag(registry, host);
                DragEffect::Canceled {
                    pointer_id,
                    was_dragging: true,
                    reason: DragCancelReason::PointerCancel,
                }
            }
        };
        self.record(from, effect)
    }

    /// Release whatever this source is tracking without dropping.
    ///
    /// Returns `None` when idle.
    pub fn teardown<H>(
        &mut self,
        registry: &mut DragRegistry,
        host: &mut H,
    ) -> Option<DragTransition>
    where
        H: DragHost + ?Sized,
    {
        let from = self.state;
        let effect = match self.state {
            DragSourceState::Idle => return None,
            DragSourceState::Pressed { pointer_id, .. } => {
                self.state = DragSourceState::Idle;
                DragEffect::Canceled {
                    pointer_id,
                    was_dragging: false,
                    reason: DragCancelReason::Teardown,
                }
            }
            DragSourceState::Dragging { pointer_id, .. } => {
                self.cancel_drag(registry, host);
                DragEffect::Canceled {
                    pointer_id,
                    was_dragging: true,
                    reason: DragCancelReason::Teardown,
                }
            }
        };
        Some(self.record(from, effect))
    }

    fn press<H>(
        &mut self,
        event: &PointerEvent,
        button: PointerButton,
        registry: &DragRegistry,
        host: &H,
    ) -> DragEffect
    where
        H: DragHost + ?Sized,
    {
        let reason = if !event.is_primary {
            Some(DragNoopReason::NonPrimaryContact)
        } else if button != PointerButton::Primary {
            Some(DragNoopReason::NonPrimaryButton)
        } else if event.over_control {
            Some(DragNoopReason::InteractiveControl)
        } else if registry.is_dragging() {
            Some(DragNoopReason::OtherDragActive)
        } else {
            None
        };
        if let Some(reason) = reason {
            return DragEffect::Noop { reason };
        }

        let offset = host
            .element_rect(self.element)
            .map(|rect| event.position.offset_from(rect.origin()))
            .unwrap_or_default();
        self.state = DragSourceState::Pressed {
            pointer_id: event.pointer_id,
            origin: event.position,
            offset,
        };
        DragEffect::Pressed {
            pointer_id: event.pointer_id,
            origin: event.position,
        }
    }

    fn start_drag<H>(
        &mut self,
        pointer_id: u32,
        origin: ScreenPoint,
        offset: ScreenPoint,
        current: ScreenPoint,
        registry: &mut DragRegistry,
        host: &mut H,
    ) -> DragEffect
    where
        H: DragHost + ?Sized,
    {
        let indicator = host.create_indicator(self.element, current.offset_from(offset));
        let active = ActiveDrag {
            payload: self.draggable.drag_payload(),
            source: self.element,
            offset,
            indicator,
            pointer_id,
        };
        if let Err(rejected) = registry.begin(active) {
            // Lost a race for the slot; undo the visual.
            if let Some(indicator) = rejected.indicator {
                host.remove_indicator(indicator);
            }
            return DragEffect::Noop {
                reason: DragNoopReason::OtherDragActive,
            };
        }
        host.set_dragging(self.element, true);
        self.draggable.on_drag_start();
        self.state = DragSourceState::Dragging {
            pointer_id,
            origin,
            offset,
            current,
        };
        DragEffect::DragStarted {
            pointer_id,
            origin,
            current,
        }
    }

    fn finish_drag<H>(&mut self, active: Option<&ActiveDrag>, host: &mut H, dropped: bool)
    where
        H: DragHost + ?Sized,
    {
        if let Some(indicator) = active.and_then(|active| active.indicator) {
            host.remove_indicator(indicator);
        }
        host.set_dragging(self.element, false);
        self.draggable.on_drag_end(dropped);
    }

    fn cancel_drag<H>(&mut self, registry: &mut DragRegistry, host: &mut H)
    where
        H: DragHost + ?Sized,
    {
        let active = registry.take_active_for(self.element);
        self.finish_drag(active.as_ref(), host, false);
        self.state = DragSourceState::Idle;
    }

    fn record(&mut self, from: DragSourceState, effect: DragEffect) -> DragTransition {
        self.transition_counter = self.transition_counter.saturating_add(1);
        let transition = DragTransition {
            transition_id: self.transition_counter,
            from,
            to: self.state,
            effect,
        };
        if matches!(effect, DragEffect::Noop { .. }) {
            binplan_core::trace!(
                element = self.element.0,
                transition_id = transition.transition_id,
                ?effect,
                "drag event ignored"
            );
        } else {
            binplan_core::debug!(
                element = self.element.0,
                transition_id = transition.transition_id,
                ?effect,
                "drag transition"
            );
        }
        transition
    }
}
