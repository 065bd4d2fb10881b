#![forbid(unsafe_code)]

//! Bill-of-materials aggregation.
//!
//! Placements are grouped by `(item_id, customization fingerprint)`. A
//! placement with no customization and one with the all-default
//! customization land in the same group. Groups whose item id is unknown to
//! the catalog are dropped.

use std::collections::HashMap;

use serde::Serialize;

use crate::catalog::Catalog;
use crate::store::{BinCustomization, PlacedItem, customization_fingerprint};

/// One aggregated line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BomLine {
    pub item_id: String,
    pub name: String,
    pub width_units: i32,
    pub height_units: i32,
    pub color: String,
    pub categories: Vec<String>,
    pub quantity: u32,
    /// `None` for the default group.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customization: Option<BinCustomization>,
}

/// Aggregate placements into BOM lines sorted by display name.
///
/// Ties keep first-appearance order.
#[must_use]
pub fn aggregate_bom<C: Catalog + ?Sized>(items: &[PlacedItem], catalog: &C) -> Vec<BomLine> {
    let mut index: HashMap<(String, String), usize> = HashMap::new();
    let mut lines: Vec<BomLine> = Vec::new();

    for item in items {
        let fingerprint = customization_fingerprint(item.customization.as_ref());
        let key = (item.item_id.clone(), fingerprint);
        if let Some(&at) = index.get(&key) {
            lines[at].quantity = lines[at].quantity.saturating_add(1);
            continue;
        }
        let Some(def) = catalog.get_item_by_id(&item.item_id) else {
            binplan_core::trace!(item_id = item.item_id.as_str(), "bom: unknown catalog id");
            continue;
        };
        let customization = item.customization.filter(|c| !c.is_default());
        index.insert(key, lines.len());
        lines.push(BomLine {
            item_id: def.id.clone(),
            name: def.name.clone(),
            width_units: def.width_units,
            height_units: def.height_units,
            color: def.color.clone(),
            categories: def.categories.clone(),
            quantity: 1,
            customization,
        });
    }

    // Stable sort keeps first-appearance order among equal names.
    lines.sort_by(|a, b| a.name.cmp(&b.name));
    lines
}

/// Sum of quantities across lines.
#[must_use]
pub fn total_quantity(lines: &[BomLine]) -> u32 {
    lines.iter().fold(0u32, |acc, line| acc.saturating_add(line.quantity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogItem, Library};
    use crate::rotation::Rotation;
    use crate::store::{InstanceId, LipStyle, WallPattern};

    fn library() -> Library {
        Library::from_items(vec![
            CatalogItem::new("bin-1x1", "1x1 Bin", 1, 1, "#3B82F6"),
            CatalogItem::new("bin-2x1", "2x1 Bin", 2, 1, "#10B981"),
            CatalogItem::new("alpha", "1x1 Bin", 1, 1, "#EF4444"),
        ])
        .expect("valid")
    }

    fn placed(id: u64, item_id: &str, customization: Option<BinCustomization>) -> PlacedItem {
        PlacedItem {
            instance_id: InstanceId(id),
            item_id: item_id.into(),
            x: 0,
            y: 0,
            width: 1,
            height: 1,
            rotation: Rotation::Deg0,
            customization,
        }
    }

    #[test]
    fn default_and_missing_customization_merge() {
        let items = vec![
            placed(1, "bin-1x1", None),
            placed(2, "bin-1x1", Some(BinCustomization::default())),
        ];
        let lines = aggregate_bom(&items, &library());
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 2);
        assert_eq!(lines[0].customization, None);
    }

    #[test]
    fn distinct_customizations_split() {
        let hex = BinCustomization {
            wall_pattern: WallPattern::Hexgrid,
            ..BinCustomization::default()
        };
        let reduced = BinCustomization {
            lip_style: LipStyle::Reduced,
            ..BinCustomization::default()
        };
        let items = vec![placed(1, "bin-1x1", Some(hex)), placed(2, "bin-1x1", Some(reduced))];
        let lines = aggregate_bom(&items, &library());
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.quantity == 1));
        assert_eq!(lines[0].customization, Some(hex));
        assert_eq!(lines[1].customization, Some(reduced));
    }

    #[test]
    fn unknown_ids_dropped_and_sorted_by_name() {
        let items = vec![
            placed(1, "bin-2x1", None),
            placed(2, "ghost", None),
            placed(3, "bin-1x1", None),
            placed(4, "alpha", None),
        ];
        let lines = aggregate_bom(&items, &library());
        let ids: Vec<_> = lines.iter().map(|l| l.item_id.as_str()).collect();
        // "1x1 Bin" ties resolve by first appearance.
        assert_eq!(ids, vec!["bin-1x1", "alpha", "bin-2x1"]);
        assert_eq!(total_quantity(&lines), 3);
    }

    #[test]
    fn empty_input() {
        assert!(aggregate_bom(&[], &library()).is_empty());
        assert_eq!(total_quantity(&[]), 0);
    }
}
