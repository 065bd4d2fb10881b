#![forbid(unsafe_code)]

//! Placement model for drawer layouts.
//!
//! - [`catalog`]: item definitions and the library index.
//! - [`store`]: placed items, selection, clipboard, and validity.
//! - [`placement`]: deterministic nearest-free-cell search.
//! - [`rotation`]: quarter-turn state table.
//! - [`drawer`], [`spacer`]: physical drawer fit and margin strips.
//! - [`bom`]: bill-of-materials aggregation.
//! - [`record`]: persistence shapes.

pub mod bom;
pub mod catalog;
pub mod drawer;
pub mod placement;
pub mod record;
pub mod rotation;
pub mod spacer;
pub mod store;

pub use bom::{BomLine, aggregate_bom, total_quantity};
pub use catalog::{Catalog, CatalogError, CatalogItem, Library, LibraryIndex};
pub use drawer::{DrawerFit, GRID_UNIT_MM, footprint_units};
pub use placement::find_free_cell;
pub use record::{LayoutDocument, LayoutRecord, RecordError};
pub use rotation::{Rotation, RotationDirection};
pub use spacer::{
    ComputedSpacer, PercentRect, SpacerConfig, SpacerEdge, SpacerMode, compute_spacers,
};
pub use store::{
    BinCustomization, ClipboardEntry, DropPayload, FingerSlide, GridStore, InstanceId, LipStyle,
    PlacedItem, PlacedItemWithValidity, WallCutout, WallPattern, is_valid,
};
