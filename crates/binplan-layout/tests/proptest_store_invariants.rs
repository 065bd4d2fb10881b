//! Property-based invariant tests for the placement store.
//!
//! 1. Four quarter turns in one direction restore rotation and footprint.
//! 2. A clockwise turn followed by a counter-clockwise turn is the identity.
//! 3. Two overlapping items are never both valid.
//! 4. An in-bounds item with no overlaps is valid.
//! 5. A found cell is always in bounds and collision-free.
//! 6. The search is deterministic.
//! 7. Duplicate succeeds exactly when some free cell exists within reach.

use binplan_core::geometry::{CellCoord, GridRect, GridSize};
use binplan_layout::catalog::{CatalogItem, Library};
use binplan_layout::placement::{find_free_cell, is_free};
use binplan_layout::rotation::{Rotation, RotationDirection};
use binplan_layout::store::{GridStore, InstanceId, PlacedItem, is_valid};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn library() -> Library {
    let mut items = Vec::new();
    for w in 1..=3 {
        for h in 1..=3 {
            let (id, name) = (format!("bin-{w}x{h}"), format!("{w}x{h} Bin"));
            items.push(CatalogItem::new(id, name, w, h, "#3B82F6"));
        }
    }
    Library::from_items(items).expect("valid library")
}

fn direction_strategy() -> impl Strategy<Value = RotationDirection> {
    prop_oneof![
        Just(RotationDirection::Clockwise),
        Just(RotationDirection::CounterClockwise)
    ]
}

fn placed(id: u64, rect: GridRect) -> PlacedItem {
    PlacedItem {
        instance_id: InstanceId(id),
        item_id: "bin".into(),
        x: rect.x,
        y: rect.y,
        width: rect.width,
        height: rect.height,
        rotation: Rotation::Deg0,
        customization: None,
    }
}

fn rect_strategy() -> impl Strategy<Value = GridRect> {
    (-2i32..=8, -2i32..=8, 1i32..=4, 1i32..=4).prop_map(|(x, y, w, h)| GridRect::new(x, y, w, h))
}

fn occupied_strategy() -> impl Strategy<Value = Vec<GridRect>> {
    prop::collection::vec((0i32..6, 0i32..6, 1i32..=3, 1i32..=3), 0..8)
        .prop_map(|v| v.into_iter().map(|(x, y, w, h)| GridRect::new(x, y, w, h)).collect())
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Four quarter turns restore the item
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn four_turns_restore(w in 1i32..=3, h in 1i32..=3, dir in direction_strategy()) {
        let mut store = GridStore::new(library(), GridSize::new(6, 6));
        let id = store.add_item(&format!("bin-{w}x{h}"), 0, 0).expect("known id");
        let before = store.item(id).expect("present").clone();
        for _ in 0..4 {
            prop_assert!(store.rotate_item(id, dir));
        }
        prop_assert_eq!(store.item(id).expect("present"), &before);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. cw then ccw is the identity
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn turn_and_back_is_identity(
        w in 1i32..=3,
        h in 1i32..=3,
        pre_turns in 0usize..4,
        dir in direction_strategy(),
    ) {
        let mut store = GridStore::new(library(), GridSize::new(6, 6));
        let id = store.add_item(&format!("bin-{w}x{h}"), 1, 1).expect("known id");
        for _ in 0..pre_turns {
            store.rotate_item(id, RotationDirection::Clockwise);
        }
        let before = store.item(id).expect("present").clone();
        store.rotate_item(id, dir);
        store.rotate_item(id, dir.reversed());
        prop_assert_eq!(store.item(id).expect("present"), &before);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Overlapping pairs are never both valid
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn overlapping_pair_not_both_valid(a in rect_strategy(), b in rect_strategy()) {
        let grid = GridSize::new(8, 8);
        let items = vec![placed(1, a), placed(2, b)];
        if a.overlaps(&b) {
            prop_assert!(!(is_valid(&items[0], &items, grid) && is_valid(&items[1], &items, grid)));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. In-bounds and clear implies valid
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn clear_in_bounds_item_is_valid(a in rect_strategy(), others in occupied_strategy()) {
        let grid = GridSize::new(8, 8);
        let mut items = vec![placed(0, a)];
        items.extend(others.iter().enumerate().map(|(i, r)| placed(i as u64 + 1, *r)));
        let clear = others.iter().all(|r| !r.overlaps(&a));
        if a.in_bounds(grid) && clear {
            prop_assert!(is_valid(&items[0], &items, grid));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5-6. Search results are legal and deterministic
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn found_cell_is_legal_and_stable(
        sx in -3i32..10,
        sy in -3i32..10,
        w in 1i32..=3,
        h in 1i32..=3,
        occupied in occupied_strategy(),
    ) {
        let grid = GridSize::new(6, 6);
        let start = CellCoord::new(sx, sy);
        let first = find_free_cell(start, w, h, grid, &occupied);
        let second = find_free_cell(start, w, h, grid, &occupied);
        prop_assert_eq!(first, second);
        if let Some(cell) = first {
            prop_assert!(is_free(cell, w, h, grid, &occupied));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Duplicate lands on a valid cell whenever one is reachable
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn duplicate_matches_reachability(
        placements in prop::collection::vec((1i32..=3, 1i32..=3, 0i32..5, 0i32..5), 1..6),
    ) {
        let grid = GridSize::new(5, 5);
        let mut store = GridStore::new(library(), grid);
        for (w, h, x, y) in &placements {
            store.add_item(&format!("bin-{w}x{h}"), *x, *y);
        }
        let source = store.selected_item().expect("last add selected").clone();
        let occupied: Vec<GridRect> = store.items().iter().map(PlacedItem::rect).collect();

        // Every cell within radius max_dim of the start is a candidate.
        let start = CellCoord::new(source.x + 1, source.y + 1);
        let r = grid.max_dim();
        let reachable = (-r..=r).any(|dx| {
            (-r..=r).any(|dy| {
                let cell = CellCoord::new(start.x + dx, start.y + dy);
                is_free(cell, source.width, source.height, grid, &occupied)
            })
        });

        let before = store.items().len();
        match store.duplicate_item() {
            Some(dup) => {
                prop_assert!(reachable);
                let item = store.item(dup).expect("present");
                let cell = CellCoord::new(item.x, item.y);
                prop_assert!(is_free(cell, item.width, item.height, grid, &occupied));
                prop_assert_eq!(store.items().len(), before + 1);
            }
            None => {
                prop_assert!(!reachable);
                prop_assert_eq!(store.items().len(), before);
            }
        }
    }
}
