#![forbid(unsafe_code)]

//! In-memory [`DragHost`].
//!
//! Models a retained element tree with bounding rects, parent links, and
//! floating indicators. Hit testing checks visible indicators first, then
//! elements from most recently added to oldest, so an indicator left visible
//! over the release point shadows whatever is underneath it.
//!
//! Every mutating host call is recorded in [`HeadlessHost::calls`].

use std::collections::{BTreeMap, BTreeSet};

use binplan_core::event::ElementId;
use binplan_core::geometry::{ScreenPoint, ScreenRect};

use crate::drag::DragHost;

/// Recorded host mutation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostCall {
    CreateIndicator { source: ElementId, indicator: ElementId, at: ScreenPoint },
    MoveIndicator { indicator: ElementId, at: ScreenPoint },
    SetIndicatorVisible { indicator: ElementId, visible: bool },
    RemoveIndicator { indicator: ElementId },
    SetDragging { source: ElementId, dragging: bool },
}

/// A live floating indicator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorState {
    pub source: ElementId,
    pub rect: ScreenRect,
    pub visible: bool,
}

#[derive(Debug, Clone, Copy)]
struct Node {
    id: ElementId,
    parent: Option<ElementId>,
    rect: ScreenRect,
}

#[derive(Debug, Default)]
pub struct HeadlessHost {
    nodes: Vec<Node>,
    indicators: BTreeMap<ElementId, IndicatorState>,
    dragging: BTreeSet<ElementId>,
    calls: Vec<HostCall>,
    next_id: u64,
    indicators_enabled: bool,
}

impl HeadlessHost {
    #[must_use]
    pub fn new() -> Self {
        Self {
            indicators_enabled: true,
            ..Self::default()
        }
    }

    /// Host that declines to create indicators.
    #[must_use]
    pub fn without_indicators() -> Self {
        Self::default()
    }

    fn allocate(&mut self) -> ElementId {
        self.next_id = self.next_id.saturating_add(1);
        ElementId(self.next_id)
    }

    /// Add a top-level element.
    pub fn add_element(&mut self, rect: ScreenRect) -> ElementId {
        let id = self.allocate();
        self.nodes.push(Node {
            id,
            parent: None,
            rect,
        });
        id
    }

    /// Add an element nested inside `parent`.
    pub fn add_child(&mut self, parent: ElementId, rect: ScreenRect) -> ElementId {
        let id = self.allocate();
        self.nodes.push(Node {
            id,
            parent: Some(parent),
            rect,
        });
        id
    }

    /// Move or resize an element. Returns `false` for unknown ids.
    pub fn set_rect(&mut self, element: ElementId, rect: ScreenRect) -> bool {
        match self.nodes.iter_mut().find(|n| n.id == element) {
            Some(node) => {
                node.rect = rect;
                true
            }
            None => false,
        }
    }

    /// Detach an element; its rect queries return `None` afterwards.
    pub fn remove_element(&mut self, element: ElementId) -> bool {
        let before = self.nodes.len();
        self.nodes.retain(|n| n.id != element);
        before != self.nodes.len()
    }

    pub fn indicator(&self, indicator: ElementId) -> Option<&IndicatorState> {
        self.indicators.get(&indicator)
    }

    #[must_use]
    pub fn live_indicators(&self) -> usize {
        self.indicators.len()
    }

    #[must_use]
    pub fn is_dragging(&self, source: ElementId) -> bool {
        self.dragging.contains(&source)
    }

    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    /// Drain the call log.
    pub fn take_calls(&mut self) -> Vec<HostCall> {
        std::mem::take(&mut self.calls)
    }

    fn parent_of(&self, element: ElementId) -> Option<ElementId> {
        self.nodes
            .iter()
            .find(|n| n.id == element)
            .and_then(|n| n.parent)
    }
}

impl DragHost for HeadlessHost {
    fn element_rect(&self, element: ElementId) -> Option<ScreenRect> {
        self.nodes
            .iter()
            .find(|n| n.id == element)
            .map(|n| n.rect)
            .or_else(|| self.indicators.get(&element).map(|i| i.rect))
    }

    fn element_at(&self, point: ScreenPoint) -> Option<ElementId> {
        let indicator = self
            .indicators
            .iter()
            .rev()
            .find(|(_, state)| state.visible && state.rect.contains(point))
            .map(|(id, _)| *id);
        indicator.or_else(|| {
            self.nodes
                .iter()
                .rev()
                .find(|n| n.rect.contains(point))
                .map(|n| n.id)
        })
    }

    fn is_within(&self, element: ElementId, ancestor: ElementId) -> bool {
        let mut current = Some(element);
        // Parent chains are acyclic by construction; the bound guards bad input.
        for _ in 0..=self.nodes.len() {
            match current {
                Some(id) if id == ancestor => return true,
                Some(id) => current = self.parent_of(id),
                None => return false,
            }
        }
        false
    }

    fn create_indicator(&mut self, source: ElementId, at: ScreenPoint) -> Option<ElementId> {
        if !self.indicators_enabled {
            return None;
        }
        let size = self.element_rect(source).unwrap_or_default();
        let indicator = self.allocate();
        self.indicators.insert(
            indicator,
            IndicatorState {
                source,
                rect: ScreenRect::new(at.x, at.y, size.width, size.height),
                visible: true,
            },
        );
        self.calls.push(HostCall::CreateIndicator {
            source,
            indicator,
            at,
        });
        Some(indicator)
    }

    fn move_indicator(&mut self, indicator: ElementId, at: ScreenPoint) {
        if let Some(state) = self.indicators.get_mut(&indicator) {
            state.rect.left = at.x;
            state.rect.top = at.y;
        }
        self.calls.push(HostCall::MoveIndicator { indicator, at });
    }

    fn set_indicator_visible(&mut self, indicator: ElementId, visible: bool) {
        if let Some(state) = self.indicators.get_mut(&indicator) {
            state.visible = visible;
        }
        self.calls
            .push(HostCall::SetIndicatorVisible { indicator, visible });
    }

    fn remove_indicator(&mut self, indicator: ElementId) {
        self.indicators.remove(&indicator);
        self.calls.push(HostCall::RemoveIndicator { indicator });
    }

    fn set_dragging(&mut self, source: ElementId, dragging: bool) {
        if dragging {
            self.dragging.insert(source);
        } else {
            self.dragging.remove(&source);
        }
        self.calls.push(HostCall::SetDragging { source, dragging });
    }
}
