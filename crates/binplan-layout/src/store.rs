#![forbid(unsafe_code)]

//! Grid state store.
//!
//! [`GridStore`] owns the placed items of one editing session, the current
//! selection, and the clipboard. Every mutator is a plain `&mut self` call
//! whose effect is visible to the next call.
//!
//! # Validity
//!
//! Overlapping or out-of-bounds items are legal state. Validity is advisory
//! and recomputed from scratch on every [`GridStore::items_with_validity`]
//! read. Only add, duplicate, and paste search for a legal cell; move and
//! rotate never reject.
//!
//! # No-ops
//!
//! Unknown catalog ids, unknown instance ids, and searches with no free cell
//! are silent no-ops. Mutators return `bool` or `Option` so callers can tell.

use std::fmt;

use binplan_core::geometry::{CellCoord, GridRect, GridSize};
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::placement::find_free_cell;
use crate::record::{LayoutDocument, LayoutRecord, RecordError};
use crate::rotation::{Rotation, RotationDirection};

/// Unique handle for one placement, allocated by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(pub u64);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "inst-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Customization
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WallPattern {
    #[default]
    None,
    Hexgrid,
    Grid,
    Voronoi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LipStyle {
    #[default]
    Normal,
    Reduced,
    Minimum,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FingerSlide {
    #[default]
    None,
    Rounded,
    Chamfered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WallCutout {
    #[default]
    None,
    Vertical,
    Horizontal,
    Both,
}

/// Per-instance bin options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BinCustomization {
    pub wall_pattern: WallPattern,
    pub lip_style: LipStyle,
    pub finger_slide: FingerSlide,
    pub wall_cutout: WallCutout,
}

impl BinCustomization {
    #[must_use]
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Grouping key for BOM lines.
    ///
    /// The all-default customization has the empty fingerprint, the same as
    /// no customization at all.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        if self.is_default() {
            return String::new();
        }
        format!(
            "wall={:?};lip={:?};slide={:?};cutout={:?}",
            self.wall_pattern, self.lip_style, self.finger_slide, self.wall_cutout
        )
    }
}

/// Fingerprint of an optional customization.
#[must_use]
pub fn customization_fingerprint(customization: Option<&BinCustomization>) -> String {
    customization.map(BinCustomization::fingerprint).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// One placement on the grid.
///
/// `width`/`height` are the footprint for the current rotation, never the
/// catalog's unrotated size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedItem {
    pub instance_id: InstanceId,
    pub item_id: String,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub rotation: Rotation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customization: Option<BinCustomization>,
}

impl PlacedItem {
    #[must_use]
    pub const fn rect(&self) -> GridRect {
        GridRect::new(self.x, self.y, self.width, self.height)
    }
}

/// A placed item plus its advisory validity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacedItemWithValidity {
    #[serde(flatten)]
    pub item: PlacedItem,
    pub is_valid: bool,
}

/// `item` is in bounds and no other instance overlaps it.
#[must_use]
pub fn is_valid(item: &PlacedItem, all_items: &[PlacedItem], grid: GridSize) -> bool {
    let rect = item.rect();
    rect.in_bounds(grid)
        && !all_items
            .iter()
            .any(|other| other.instance_id != item.instance_id && other.rect().overlaps(&rect))
}

/// Shape of a copied item. Carries no identity or position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipboardEntry {
    pub item_id: String,
    pub width: i32,
    pub height: i32,
    pub rotation: Rotation,
    pub customization: Option<BinCustomization>,
}

impl From<&PlacedItem> for ClipboardEntry {
    fn from(item: &PlacedItem) -> Self {
        Self {
            item_id: item.item_id.clone(),
            width: item.width,
            height: item.height,
            rotation: item.rotation,
            customization: item.customization,
        }
    }
}

/// What a completed drag carries to the drop callback.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DropPayload {
    /// Place a new instance of a catalog item.
    Catalog { item_id: String },
    /// Move an existing placement.
    Existing { instance_id: InstanceId },
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Placed items, selection, and clipboard for one editing session.
#[derive(Debug)]
pub struct GridStore<C> {
    catalog: C,
    grid: GridSize,
    items: Vec<PlacedItem>,
    selected: Option<InstanceId>,
    clipboard: Vec<ClipboardEntry>,
    next_instance: u64,
}

impl<C: Catalog> GridStore<C> {
    /// Empty store over `grid`.
    pub fn new(catalog: C, grid: GridSize) -> Self {
        Self {
            catalog,
            grid,
            items: Vec::new(),
            selected: None,
            clipboard: Vec::new(),
            next_instance: 1,
        }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn grid_size(&self) -> GridSize {
        self.grid
    }

    /// Change the grid. Existing items are kept; validity follows on read.
    pub fn set_grid_size(&mut self, grid: GridSize) {
        binplan_core::debug!(x = grid.x, y = grid.y, "grid resized");
        self.grid = grid;
    }

    /// Items in z-order.
    pub fn items(&self) -> &[PlacedItem] {
        &self.items
    }

    pub fn item(&self, id: InstanceId) -> Option<&PlacedItem> {
        self.items.iter().find(|item| item.instance_id == id)
    }

    pub fn selected(&self) -> Option<InstanceId> {
        self.selected
    }

    pub fn selected_item(&self) -> Option<&PlacedItem> {
        self.selected.and_then(|id| self.item(id))
    }

    pub fn clipboard(&self) -> &[ClipboardEntry] {
        &self.clipboard
    }

    /// Items with validity recomputed against the current grid.
    pub fn items_with_validity(&self) -> Vec<PlacedItemWithValidity> {
        self.items
            .iter()
            .map(|item| PlacedItemWithValidity {
                item: item.clone(),
                is_valid: is_valid(item, &self.items, self.grid),
            })
            .collect()
    }

    pub fn invalid_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| !is_valid(item, &self.items, self.grid))
            .count()
    }

    fn allocate_id(&mut self) -> InstanceId {
        let id = InstanceId(self.next_instance);
        self.next_instance = self.next_instance.saturating_add(1);
        id
    }

    fn position_of(&self, id: InstanceId) -> Option<usize> {
        self.items.iter().position(|item| item.instance_id == id)
    }

    fn occupied(&self) -> Vec<GridRect> {
        self.items.iter().map(PlacedItem::rect).collect()
    }

    fn insert_from_entry(&mut self, entry: &ClipboardEntry, cell: CellCoord) -> InstanceId {
        let instance_id = self.allocate_id();
        self.items.push(PlacedItem {
            instance_id,
            item_id: entry.item_id.clone(),
            x: cell.x,
            y: cell.y,
            width: entry.width,
            height: entry.height,
            rotation: entry.rotation,
            customization: entry.customization,
        });
        instance_id
    }

    /// Place a new rotation-0 instance of `item_id` at `(x, y)` and select it.
    ///
    /// The position is accepted as given, even if it overlaps.
    pub fn add_item(&mut self, item_id: &str, x: i32, y: i32) -> Option<InstanceId> {
        let Some(def) = self.catalog.get_item_by_id(item_id) else {
            binplan_core::trace!(item_id, "add ignored: unknown catalog id");
            return None;
        };
        let (width, height) = (def.width_units, def.height_units);
        let instance_id = self.allocate_id();
        self.items.push(PlacedItem {
            instance_id,
            item_id: item_id.to_string(),
            x,
            y,
            width,
            height,
            rotation: Rotation::Deg0,
            customization: None,
        });
        self.selected = Some(instance_id);
        binplan_core::debug!(instance = instance_id.0, item_id, x, y, "item added");
        Some(instance_id)
    }

    /// Overwrite an item's position unconditionally.
    pub fn move_item(&mut self, id: InstanceId, x: i32, y: i32) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| item.instance_id == id) else {
            binplan_core::trace!(instance = id.0, "move ignored: unknown instance");
            return false;
        };
        item.x = x;
        item.y = y;
        binplan_core::debug!(instance = id.0, x, y, "item moved");
        true
    }

    /// Quarter-turn an item in place, swapping its footprint.
    pub fn rotate_item(&mut self, id: InstanceId, direction: RotationDirection) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| item.instance_id == id) else {
            binplan_core::trace!(instance = id.0, "rotate ignored: unknown instance");
            return false;
        };
        let next = item.rotation.step(direction);
        let (width, height) = item.rotation.footprint_after(next, item.width, item.height);
        item.rotation = next;
        item.width = width;
        item.height = height;
        binplan_core::debug!(
            instance = id.0,
            rotation = next.degrees(),
            width,
            height,
            "item rotated"
        );
        true
    }

    /// Replace an item's customization.
    pub fn set_customization(
        &mut self,
        id: InstanceId,
        customization: Option<BinCustomization>,
    ) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| item.instance_id == id) else {
            return false;
        };
        item.customization = customization;
        true
    }

    pub fn delete_item(&mut self, id: InstanceId) -> bool {
        let Some(idx) = self.position_of(id) else {
            binplan_core::trace!(instance = id.0, "delete ignored: unknown instance");
            return false;
        };
        self.items.remove(idx);
        if self.selected == Some(id) {
            self.selected = None;
        }
        binplan_core::debug!(instance = id.0, "item deleted");
        true
    }

    /// Remove every item and clear the selection. The clipboard survives.
    pub fn clear_all(&mut self) {
        binplan_core::debug!(count = self.items.len(), "grid cleared");
        self.items.clear();
        self.selected = None;
    }

    /// Select an instance, or clear the selection with `None`.
    ///
    /// Selecting an unknown id leaves the current selection alone.
    pub fn select_item(&mut self, id: Option<InstanceId>) -> bool {
        match id {
            None => {
                self.selected = None;
                true
            }
            Some(id) if self.position_of(id).is_some() => {
                self.selected = Some(id);
                true
            }
            Some(_) => false,
        }
    }

    /// Copy the selected item to the nearest free cell right-and-down of it.
    pub fn duplicate_item(&mut self) -> Option<InstanceId> {
        let source = self.selected_item()?;
        let entry = ClipboardEntry::from(source);
        let start = CellCoord::new(source.x.saturating_add(1), source.y.saturating_add(1));
        let occupied = self.occupied();
        let Some(cell) = find_free_cell(start, entry.width, entry.height, self.grid, &occupied)
        else {
            binplan_core::trace!("duplicate ignored: no free cell");
            return None;
        };
        let instance_id = self.insert_from_entry(&entry, cell);
        self.selected = Some(instance_id);
        binplan_core::debug!(instance = instance_id.0, x = cell.x, y = cell.y, "item duplicated");
        Some(instance_id)
    }

    /// Put the selected item's shape on the clipboard.
    ///
    /// With nothing selected the clipboard is left untouched.
    pub fn copy_items(&mut self) -> bool {
        let Some(source) = self.selected_item() else {
            return false;
        };
        self.clipboard = vec![ClipboardEntry::from(source)];
        true
    }

    /// Place every clipboard entry near the grid center.
    ///
    /// Each entry searches against the current items, including entries
    /// placed earlier in this call. Entries with no free cell are dropped.
    /// The last inserted item becomes the selection.
    pub fn paste_items(&mut self) -> Vec<InstanceId> {
        let entries = self.clipboard.clone();
        let mut placed = Vec::with_capacity(entries.len());
        for entry in &entries {
            let start = CellCoord::new(
                ((self.grid.x - entry.width) / 2).max(0),
                ((self.grid.y - entry.height) / 2).max(0),
            );
            let Some(cell) =
                find_free_cell(start, entry.width, entry.height, self.grid, &self.occupied())
            else {
                binplan_core::trace!(item_id = entry.item_id.as_str(), "paste entry dropped");
                continue;
            };
            placed.push(self.insert_from_entry(entry, cell));
        }
        if let Some(&last) = placed.last() {
            self.selected = Some(last);
        }
        binplan_core::debug!(count = placed.len(), "clipboard pasted");
        placed
    }

    /// Apply a drop from the drag protocol.
    pub fn handle_drop(&mut self, payload: &DropPayload, cell: CellCoord) -> bool {
        match payload {
            DropPayload::Catalog { item_id } => self.add_item(item_id, cell.x, cell.y).is_some(),
            DropPayload::Existing { instance_id } => self.move_item(*instance_id, cell.x, cell.y),
        }
    }

    /// Replace all items with `records`.
    ///
    /// Instance ids are reallocated and the selection is cleared. Records are
    /// checked before anything changes, so a failure leaves the store as is.
    pub fn load_records(&mut self, records: &[LayoutRecord]) -> Result<(), RecordError> {
        let decoded = records
            .iter()
            .map(LayoutRecord::decode)
            .collect::<Result<Vec<_>, _>>()?;
        self.items.clear();
        self.selected = None;
        for (record, rotation) in records.iter().zip(decoded) {
            let instance_id = self.allocate_id();
            self.items.push(PlacedItem {
                instance_id,
                item_id: record.item_id.clone(),
                x: record.x,
                y: record.y,
                width: record.width,
                height: record.height,
                rotation,
                customization: record.customization,
            });
        }
        binplan_core::debug!(count = self.items.len(), "records loaded");
        Ok(())
    }

    /// Export items as persistence records, in z-order.
    pub fn to_records(&self) -> Vec<LayoutRecord> {
        self.items.iter().map(LayoutRecord::from).collect()
    }

    /// Replace grid size and items from a saved document.
    pub fn load_document(&mut self, document: &LayoutDocument) -> Result<(), RecordError> {
        self.load_records(&document.records)?;
        self.grid = document.grid;
        Ok(())
    }

    pub fn to_document(&self) -> LayoutDocument {
        LayoutDocument {
            grid: self.grid,
            records: self.to_records(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogItem, Library};

    fn library() -> Library {
        Library::from_items(vec![
            CatalogItem::new("bin-1x1", "1x1 Bin", 1, 1, "#3B82F6"),
            CatalogItem::new("bin-2x2", "2x2 Bin", 2, 2, "#10B981"),
            CatalogItem::new("bin-1x3", "1x3 Bin", 1, 3, "#EF4444"),
        ])
        .expect("valid library")
    }

    fn store() -> GridStore<Library> {
        GridStore::new(library(), GridSize::new(4, 4))
    }

    #[test]
    fn add_selects_and_uses_base_size() {
        let mut s = store();
        let id = s.add_item("bin-1x3", 0, 0).expect("known id");
        assert_eq!(s.selected(), Some(id));
        let item = s.item(id).expect("present");
        assert_eq!((item.width, item.height), (1, 3));
        assert_eq!(item.rotation, Rotation::Deg0);
        assert!(item.customization.is_none());
    }

    #[test]
    fn add_unknown_is_noop() {
        let mut s = store();
        assert_eq!(s.add_item("nope", 0, 0), None);
        assert!(s.items().is_empty());
        assert_eq!(s.selected(), None);
    }

    #[test]
    fn overlapping_add_is_accepted_but_invalid() {
        let mut s = store();
        let a = s.add_item("bin-1x1", 0, 0).expect("a");
        let b = s.add_item("bin-2x2", 0, 0).expect("b");
        let view = s.items_with_validity();
        assert_eq!(view.len(), 2);
        assert!(view.iter().any(|v| !v.is_valid));
        assert_eq!(s.invalid_count(), 2);
        assert_ne!(a, b);
    }

    #[test]
    fn move_is_unconditional() {
        let mut s = store();
        let id = s.add_item("bin-2x2", 0, 0).expect("id");
        assert!(s.move_item(id, 3, 3));
        let item = s.item(id).expect("present");
        assert_eq!((item.x, item.y), (3, 3));
        assert_eq!(s.invalid_count(), 1);
        assert!(!s.move_item(InstanceId(999), 0, 0));
    }

    #[test]
    fn rotate_swaps_dims() {
        let mut s = store();
        let id = s.add_item("bin-1x3", 0, 0).expect("id");
        assert!(s.rotate_item(id, RotationDirection::Clockwise));
        let item = s.item(id).expect("present");
        assert_eq!(item.rotation, Rotation::Deg90);
        assert_eq!((item.width, item.height), (3, 1));
        assert!(s.rotate_item(id, RotationDirection::CounterClockwise));
        let item = s.item(id).expect("present");
        assert_eq!(item.rotation, Rotation::Deg0);
        assert_eq!((item.width, item.height), (1, 3));
    }

    #[test]
    fn delete_clears_selection() {
        let mut s = store();
        let a = s.add_item("bin-1x1", 0, 0).expect("a");
        let b = s.add_item("bin-1x1", 1, 0).expect("b");
        assert!(s.select_item(Some(a)));
        assert!(s.delete_item(b));
        assert_eq!(s.selected(), Some(a));
        assert!(s.delete_item(a));
        assert_eq!(s.selected(), None);
        assert!(!s.delete_item(a));
    }

    #[test]
    fn select_unknown_keeps_current() {
        let mut s = store();
        let a = s.add_item("bin-1x1", 0, 0).expect("a");
        assert!(!s.select_item(Some(InstanceId(42))));
        assert_eq!(s.selected(), Some(a));
        assert!(s.select_item(None));
        assert_eq!(s.selected(), None);
    }

    #[test]
    fn duplicate_searches_from_down_right() {
        let mut s = store();
        let a = s.add_item("bin-1x1", 0, 0).expect("a");
        let dup = s.duplicate_item().expect("free cell");
        let item = s.item(dup).expect("present");
        assert_eq!((item.x, item.y), (1, 1));
        assert_eq!(s.selected(), Some(dup));
        assert_ne!(dup, a);
    }

    #[test]
    fn duplicate_without_selection_is_noop() {
        let mut s = store();
        s.add_item("bin-1x1", 0, 0);
        s.select_item(None);
        assert_eq!(s.duplicate_item(), None);
        assert_eq!(s.items().len(), 1);
    }

    #[test]
    fn duplicate_on_full_grid_is_noop() {
        let mut s = GridStore::new(library(), GridSize::new(2, 2));
        s.add_item("bin-2x2", 0, 0);
        assert_eq!(s.duplicate_item(), None);
        assert_eq!(s.items().len(), 1);
    }

    #[test]
    fn duplicate_from_extreme_coordinates_is_noop() {
        for x in [i32::MAX, i32::MIN] {
            let mut s = store();
            let a = s.add_item("bin-1x1", 0, 0).expect("a");
            assert!(s.move_item(a, x, 0));
            assert_eq!(s.duplicate_item(), None);
            assert_eq!(s.items().len(), 1);
            assert_eq!(s.invalid_count(), 1);
        }
    }

    #[test]
    fn duplicate_keeps_rotation_and_customization() {
        let mut s = store();
        let a = s.add_item("bin-1x3", 0, 0).expect("a");
        s.rotate_item(a, RotationDirection::Clockwise);
        let custom = BinCustomization {
            lip_style: LipStyle::Reduced,
            ..BinCustomization::default()
        };
        s.set_customization(a, Some(custom));
        let dup = s.duplicate_item().expect("free cell");
        let item = s.item(dup).expect("present");
        assert_eq!(item.rotation, Rotation::Deg90);
        assert_eq!((item.width, item.height), (3, 1));
        assert_eq!(item.customization, Some(custom));
    }

    #[test]
    fn copy_without_selection_keeps_clipboard() {
        let mut s = store();
        s.add_item("bin-1x1", 0, 0);
        assert!(s.copy_items());
        s.select_item(None);
        assert!(!s.copy_items());
        assert_eq!(s.clipboard().len(), 1);
        assert_eq!(s.clipboard()[0].item_id, "bin-1x1");
    }

    #[test]
    fn paste_starts_at_grid_center() {
        let mut s = store();
        s.add_item("bin-2x2", 0, 0);
        s.copy_items();
        let placed = s.paste_items();
        assert_eq!(placed.len(), 1);
        // Center (1,1) collides with the source; the ring walk lands on (0,2).
        let item = s.item(placed[0]).expect("present");
        assert_eq!((item.x, item.y), (0, 2));
        assert_eq!(s.selected(), Some(placed[0]));
        assert_eq!(s.invalid_count(), 0);
    }

    #[test]
    fn paste_on_empty_clipboard_does_nothing() {
        let mut s = store();
        s.add_item("bin-1x1", 0, 0);
        assert!(s.paste_items().is_empty());
        assert_eq!(s.items().len(), 1);
    }

    #[test]
    fn clear_all_keeps_clipboard() {
        let mut s = store();
        s.add_item("bin-1x1", 0, 0);
        s.copy_items();
        s.clear_all();
        assert!(s.items().is_empty());
        assert_eq!(s.selected(), None);
        assert_eq!(s.clipboard().len(), 1);
    }

    #[test]
    fn handle_drop_routes_payloads() {
        let mut s = store();
        assert!(s.handle_drop(
            &DropPayload::Catalog {
                item_id: "bin-1x1".into()
            },
            CellCoord::new(2, 3)
        ));
        let id = s.selected().expect("added");
        assert!(s.handle_drop(&DropPayload::Existing { instance_id: id }, CellCoord::new(0, 1)));
        let item = s.item(id).expect("present");
        assert_eq!((item.x, item.y), (0, 1));
        assert!(!s.handle_drop(
            &DropPayload::Catalog {
                item_id: "ghost".into()
            },
            CellCoord::new(0, 0)
        ));
    }

    #[test]
    fn shrinking_grid_invalidates_on_read() {
        let mut s = store();
        s.add_item("bin-1x1", 3, 3);
        assert_eq!(s.invalid_count(), 0);
        s.set_grid_size(GridSize::new(3, 3));
        assert_eq!(s.invalid_count(), 1);
    }

    #[test]
    fn fingerprint_default_matches_none() {
        assert_eq!(
            customization_fingerprint(Some(&BinCustomization::default())),
            customization_fingerprint(None)
        );
        let hex = BinCustomization {
            wall_pattern: WallPattern::Hexgrid,
            ..BinCustomization::default()
        };
        assert!(!hex.fingerprint().is_empty());
        assert_ne!(
            hex.fingerprint(),
            BinCustomization {
                wall_cutout: WallCutout::Both,
                ..BinCustomization::default()
            }
            .fingerprint()
        );
    }
}
