#![forbid(unsafe_code)]

//! Editor session.
//!
//! An [`EditorSession`] owns exactly one [`GridStore`] and one
//! [`DragRegistry`]. Mounting the grid registers a drop target whose callback
//! forwards every drop into [`GridStore::handle_drop`], so a completed drag
//! mutates the store before the releasing `pointerup` returns.
//!
//! The drop target's grid dimensions are re-read from the store before every
//! pointer event, so resizing through [`store_mut`](EditorSession::store_mut)
//! still resolves drops against the current grid.
//!
//! Both are kept behind `Rc<RefCell<_>>`. Do not hold a
//! [`store_mut`](EditorSession::store_mut) borrow across a call to
//! [`handle_pointer`](EditorSession::handle_pointer); a drop would need the
//! store mutably.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use binplan_core::event::{ElementId, PointerEvent};
use binplan_core::geometry::{CellCoord, GridSize};
use binplan_layout::bom::{BomLine, aggregate_bom};
use binplan_layout::catalog::Catalog;
use binplan_layout::drawer::DrawerFit;
use binplan_layout::record::LayoutDocument;
use binplan_layout::spacer::{ComputedSpacer, SpacerConfig, compute_spacers};
use binplan_layout::store::{DropPayload, GridStore, InstanceId};
use binplan_widgets::drag::{DragConfig, DragHost, DragTransition, Draggable, PointerDragSource};
use binplan_widgets::registry::{DragRegistry, DropTargetConfig};

/// One editing session: placements, drag registry, and drawer geometry.
pub struct EditorSession<C> {
    store: Rc<RefCell<GridStore<C>>>,
    registry: Rc<RefCell<DragRegistry>>,
    grid_element: Option<ElementId>,
    drawer: Option<DrawerFit>,
    drag_config: DragConfig,
}

impl<C: Catalog + 'static> EditorSession<C> {
    /// Session over a bare grid with no drawer dimensions.
    pub fn new(catalog: C, grid: GridSize) -> Self {
        Self {
            store: Rc::new(RefCell::new(GridStore::new(catalog, grid))),
            registry: Rc::new(RefCell::new(DragRegistry::new())),
            grid_element: None,
            drawer: None,
            drag_config: DragConfig::default(),
        }
    }

    /// Session sized to the largest grid that fits a drawer.
    pub fn for_drawer(catalog: C, width_mm: f64, depth_mm: f64) -> Self {
        let fit = DrawerFit::from_drawer_mm(width_mm, depth_mm);
        let mut session = Self::new(catalog, fit.grid);
        session.drawer = Some(fit);
        session
    }

    /// Threshold used by sources created through this session.
    #[must_use]
    pub fn with_drag_config(mut self, config: DragConfig) -> Self {
        self.drag_config = config;
        self
    }

    pub fn drag_config(&self) -> DragConfig {
        self.drag_config
    }

    pub fn drawer(&self) -> Option<&DrawerFit> {
        self.drawer.as_ref()
    }

    pub fn store(&self) -> Ref<'_, GridStore<C>> {
        self.store.borrow()
    }

    pub fn store_mut(&self) -> RefMut<'_, GridStore<C>> {
        self.store.borrow_mut()
    }

    /// Shared handle to the store, for draggables that mutate it directly.
    pub fn store_handle(&self) -> Rc<RefCell<GridStore<C>>> {
        Rc::clone(&self.store)
    }

    pub fn registry(&self) -> Ref<'_, DragRegistry> {
        self.registry.borrow()
    }

    pub fn grid_element(&self) -> Option<ElementId> {
        self.grid_element
    }

    /// Register `element` as the drop surface, replacing any previous one.
    pub fn mount_grid(&mut self, element: ElementId) {
        let grid = self.store.borrow().grid_size();
        let store = Rc::clone(&self.store);
        let config =
            DropTargetConfig::new(element, grid, move |payload: &DropPayload, cell: CellCoord| {
                store.borrow_mut().handle_drop(payload, cell);
            });
        self.registry.borrow_mut().register_drop_target(config);
        self.grid_element = Some(element);
        binplan_core::debug!(element = element.0, x = grid.x, y = grid.y, "grid mounted");
    }

    /// Unregister the drop surface. Returns whether one was mounted.
    pub fn unmount_grid(&mut self) -> bool {
        let Some(element) = self.grid_element.take() else {
            return false;
        };
        self.registry.borrow_mut().unregister_drop_target(element)
    }

    /// Resize the grid by hand. Drawer dimensions no longer apply and are
    /// dropped; a mounted surface is re-registered with the new size.
    pub fn set_grid_size(&mut self, grid: GridSize) {
        self.store.borrow_mut().set_grid_size(grid);
        self.drawer = None;
        if let Some(element) = self.grid_element {
            self.mount_grid(element);
        }
    }

    /// Replace the layout with a saved document. The drawer is dropped, as
    /// with [`set_grid_size`](Self::set_grid_size).
    pub fn load_document(&mut self, document: &LayoutDocument) -> crate::Result<()> {
        self.store.borrow_mut().load_document(document)?;
        self.drawer = None;
        if let Some(element) = self.grid_element {
            self.mount_grid(element);
        }
        Ok(())
    }

    /// Drag source for a palette entry.
    pub fn catalog_source(
        &self,
        element: ElementId,
        item_id: impl Into<String>,
    ) -> PointerDragSource<DropPayload> {
        PointerDragSource::with_config(
            element,
            DropPayload::Catalog {
                item_id: item_id.into(),
            },
            self.drag_config,
        )
    }

    /// Drag source for an item already on the grid.
    pub fn instance_source(
        &self,
        element: ElementId,
        instance_id: InstanceId,
    ) -> PointerDragSource<DropPayload> {
        PointerDragSource::with_config(
            element,
            DropPayload::Existing { instance_id },
            self.drag_config,
        )
    }

    /// Route one pointer event through `source`.
    pub fn handle_pointer<D, H>(
        &self,
        source: &mut PointerDragSource<D>,
        event: &PointerEvent,
        host: &mut H,
    ) -> DragTransition
    where
        D: Draggable,
        H: DragHost + ?Sized,
    {
        self.sync_drop_target();
        let mut registry = self.registry.borrow_mut();
        source.handle_event(event, &mut registry, host)
    }

    fn sync_drop_target(&self) {
        let grid = self.store.borrow().grid_size();
        let mut registry = self.registry.borrow_mut();
        if let Some(target) = registry.drop_target_mut() {
            if target.grid != grid {
                binplan_core::debug!(x = grid.x, y = grid.y, "drop target grid resynced");
                target.grid = grid;
            }
        }
    }

    /// Tear down a source that is being unmounted.
    pub fn teardown_source<D, H>(
        &self,
        source: &mut PointerDragSource<D>,
        host: &mut H,
    ) -> Option<DragTransition>
    where
        D: Draggable,
        H: DragHost + ?Sized,
    {
        let mut registry = self.registry.borrow_mut();
        source.teardown(&mut registry, host)
    }

    /// Bill of materials for the current placements.
    pub fn bom(&self) -> Vec<BomLine> {
        let store = self.store.borrow();
        aggregate_bom(store.items(), store.catalog())
    }

    /// Spacer strips for the drawer margin. Empty without drawer dimensions
    /// or once the grid no longer matches the drawer.
    pub fn spacers(&self, config: SpacerConfig) -> Vec<ComputedSpacer> {
        match &self.drawer {
            Some(fit) if fit.grid == self.store.borrow().grid_size() => compute_spacers(
                fit.gap_width_mm,
                fit.gap_depth_mm,
                config,
                fit.width_mm,
                fit.depth_mm,
            ),
            _ => Vec::new(),
        }
    }
}
