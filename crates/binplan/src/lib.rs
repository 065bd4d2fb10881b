#![forbid(unsafe_code)]

//! binplan public facade crate.
//!
//! Re-exports the placement model and drag protocol, and provides
//! [`EditorSession`], which wires a drop surface to the grid store.

use std::fmt;

pub mod session;

pub use session::EditorSession;

// --- Core re-exports -------------------------------------------------------

pub use binplan_core::event::{ElementId, PointerButton, PointerEvent, PointerKind, PointerPhase};
pub use binplan_core::geometry::{CellCoord, GridRect, GridSize, ScreenPoint, ScreenRect};
#[cfg(feature = "tracing-json")]
pub use binplan_core::logging::init_json_logging;

// --- Layout re-exports -----------------------------------------------------

pub use binplan_layout::{
    BinCustomization, BomLine, Catalog, CatalogError, CatalogItem, ComputedSpacer, DrawerFit,
    DropPayload, GridStore, InstanceId, LayoutDocument, LayoutRecord, Library, PlacedItem,
    PlacedItemWithValidity, RecordError, Rotation, RotationDirection, SpacerConfig, SpacerMode,
};

// --- Widget re-exports -----------------------------------------------------

pub use binplan_widgets::{
    DragConfig, DragConfigError, DragEffect, DragHost, DragRegistry, DragTransition, Draggable,
    PointerDragSource,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error for binplan boundaries.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Library index could not be loaded.
    Catalog(CatalogError),
    /// Saved layout could not be read.
    Record(RecordError),
    /// Drag configuration was rejected.
    DragConfig(DragConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Catalog(err) => write!(f, "{err}"),
            Self::Record(err) => write!(f, "{err}"),
            Self::DragConfig(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Catalog(err) => Some(err),
            Self::Record(err) => Some(err),
            Self::DragConfig(err) => Some(err),
        }
    }
}

impl From<CatalogError> for Error {
    fn from(err: CatalogError) -> Self {
        Self::Catalog(err)
    }
}

impl From<RecordError> for Error {
    fn from(err: RecordError) -> Self {
        Self::Record(err)
    }
}

impl From<DragConfigError> for Error {
    fn from(err: DragConfigError) -> Self {
        Self::DragConfig(err)
    }
}

/// Standard result type for binplan APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Load a library index and open a session over a drawer.
///
/// The drag threshold comes from `BINPLAN_DRAG_THRESHOLD` via `get_env`.
pub fn open_session_with<F>(
    library_json: &str,
    width_mm: f64,
    depth_mm: f64,
    get_env: F,
) -> Result<EditorSession<Library>>
where
    F: Fn(&str) -> Option<String>,
{
    let library = Library::from_json_str(library_json)?;
    let drag_config = DragConfig::from_env_with(get_env)?;
    Ok(EditorSession::for_drawer(library, width_mm, depth_mm).with_drag_config(drag_config))
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        CellCoord, DragHost, DropPayload, EditorSession, ElementId, Error, GridSize, Library,
        PointerEvent, Result, RotationDirection, ScreenRect,
    };

    pub use crate::{core, layout, widgets};
}

pub use binplan_core as core;
pub use binplan_layout as layout;
pub use binplan_widgets as widgets;
