#![forbid(unsafe_code)]

//! Persistence record shapes.
//!
//! These mirror what a saved layout looks like on the wire. Loading and
//! saving against a backend is the host's job; the store only converts to
//! and from these records.

use std::fmt;

use binplan_core::geometry::GridSize;
use serde::{Deserialize, Serialize};

use crate::rotation::Rotation;
use crate::store::{BinCustomization, PlacedItem};

/// One saved placement. Carries no instance identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRecord {
    pub item_id: String,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    /// Degrees; must be a quarter turn.
    #[serde(default)]
    pub rotation: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customization: Option<BinCustomization>,
}

impl LayoutRecord {
    /// Check the record and return its rotation.
    pub fn decode(&self) -> Result<Rotation, RecordError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(RecordError::InvalidSize {
                item_id: self.item_id.clone(),
                width: self.width,
                height: self.height,
            });
        }
        Rotation::from_degrees(self.rotation).ok_or_else(|| RecordError::InvalidRotation {
            item_id: self.item_id.clone(),
            degrees: self.rotation,
        })
    }
}

impl From<&PlacedItem> for LayoutRecord {
    fn from(item: &PlacedItem) -> Self {
        Self {
            item_id: item.item_id.clone(),
            x: item.x,
            y: item.y,
            width: item.width,
            height: item.height,
            rotation: item.rotation.degrees(),
            customization: item.customization,
        }
    }
}

/// A saved layout: grid dimensions plus records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutDocument {
    pub grid: GridSize,
    pub records: Vec<LayoutRecord>,
}

impl LayoutDocument {
    pub fn from_json_str(json: &str) -> Result<Self, RecordError> {
        serde_json::from_str(json).map_err(|err| RecordError::Json(err.to_string()))
    }

    pub fn to_json_string(&self) -> Result<String, RecordError> {
        serde_json::to_string_pretty(self).map_err(|err| RecordError::Json(err.to_string()))
    }
}

/// Record decoding failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    Json(String),
    InvalidRotation { item_id: String, degrees: u16 },
    InvalidSize { item_id: String, width: i32, height: i32 },
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(msg) => write!(f, "layout document JSON error: {msg}"),
            Self::InvalidRotation { item_id, degrees } => {
                write!(f, "record for {item_id:?} has rotation {degrees}, expected a quarter turn")
            }
            Self::InvalidSize {
                item_id,
                width,
                height,
            } => write!(f, "record for {item_id:?} has non-positive size {width}x{height}"),
        }
    }
}

impl std::error::Error for RecordError {}
