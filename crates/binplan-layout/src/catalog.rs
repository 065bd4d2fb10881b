#![forbid(unsafe_code)]

//! Catalog seam and library index format.
//!
//! The editor never owns item definitions; it asks a [`Catalog`] for them.
//! [`Library`] is the on-disk index (`index.json`) produced by the library
//! builder tooling:
//!
//! ```json
//! {
//!   "version": "1.0.0",
//!   "items": [
//!     { "id": "bin-1x1", "name": "1x1 Bin", "widthUnits": 1, "heightUnits": 1,
//!       "color": "#3B82F6", "categories": ["bin"], "imageUrl": "bin-1x1.png" }
//!   ]
//! }
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// A reusable item definition referenced by placements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    /// Unrotated width in grid units.
    pub width_units: i32,
    /// Unrotated depth in grid units.
    pub height_units: i32,
    pub color: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl CatalogItem {
    /// Build an item with no categories or image.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        width_units: i32,
        height_units: i32,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            width_units,
            height_units,
            color: color.into(),
            categories: Vec::new(),
            image_url: None,
        }
    }

    /// Attach categories.
    #[must_use]
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Attach an image reference.
    #[must_use]
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Derive an item from a model file name such as `"Utensils 1x3.stl"`.
    ///
    /// The id is [`to_kebab_case`] of the name, the display name comes from
    /// [`generate_display_name`], the size from [`extract_dimensions`], and
    /// the image is the `.png` rendered next to the model.
    pub fn from_model_file(file_name: &str, color: &str) -> Result<Self, CatalogError> {
        let (width_units, height_units) =
            extract_dimensions(file_name).ok_or_else(|| CatalogError::MissingDimensions {
                file_name: file_name.to_string(),
            })?;
        let color = color_hex(color).ok_or_else(|| CatalogError::InvalidColor {
            input: color.to_string(),
        })?;
        let item = Self::new(
            to_kebab_case(file_name),
            generate_display_name(file_name, width_units, height_units),
            width_units,
            height_units,
            color,
        )
        .with_image_url(format!("{}.png", file_stem(file_name)));
        validate_item(&item)?;
        Ok(item)
    }
}

/// Item lookup used by the store and the BOM aggregator.
///
/// A missing id is never an error at this layer; callers treat `None` as a
/// silent no-op.
pub trait Catalog {
    fn get_item_by_id(&self, id: &str) -> Option<&CatalogItem>;
}

impl<C: Catalog + ?Sized> Catalog for &C {
    fn get_item_by_id(&self, id: &str) -> Option<&CatalogItem> {
        (**self).get_item_by_id(id)
    }
}

/// Serialized library index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryIndex {
    pub version: String,
    pub items: Vec<CatalogItem>,
}

/// Validated, indexed library.
#[derive(Debug, Clone, Default)]
pub struct Library {
    version: String,
    items: Vec<CatalogItem>,
    by_id: HashMap<String, usize>,
}

/// Current library index version written by [`Library::to_index`].
pub const LIBRARY_INDEX_VERSION: &str = "1.0.0";

impl Library {
    /// Build from items, rejecting malformed definitions.
    pub fn from_items(items: Vec<CatalogItem>) -> Result<Self, CatalogError> {
        Self::from_index(LibraryIndex {
            version: LIBRARY_INDEX_VERSION.to_string(),
            items,
        })
    }

    /// Build from a deserialized index.
    pub fn from_index(index: LibraryIndex) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for item in &index.items {
            validate_item(item)?;
            if !seen.insert(item.id.as_str()) {
                return Err(CatalogError::DuplicateId {
                    id: item.id.clone(),
                });
            }
        }
        let by_id = index
            .items
            .iter()
            .enumerate()
            .map(|(idx, item)| (item.id.clone(), idx))
            .collect();
        Ok(Self {
            version: index.version,
            items: index.items,
            by_id,
        })
    }

    /// Parse an `index.json` document.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let index: LibraryIndex =
            serde_json::from_str(json).map_err(|err| CatalogError::Parse(err.to_string()))?;
        Self::from_index(index)
    }

    /// Serialize back to the index shape.
    #[must_use]
    pub fn to_index(&self) -> LibraryIndex {
        LibraryIndex {
            version: self.version.clone(),
            items: self.items.clone(),
        }
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    #[must_use]
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items tagged with `category`, in library order.
    pub fn in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a CatalogItem> {
        self.items
            .iter()
            .filter(move |item| item.categories.iter().any(|c| c == category))
    }
}

impl Catalog for Library {
    fn get_item_by_id(&self, id: &str) -> Option<&CatalogItem> {
        self.by_id.get(id).map(|&idx| &self.items[idx])
    }
}

fn validate_item(item: &CatalogItem) -> Result<(), CatalogError> {
    if item.id.trim().is_empty() {
        return Err(CatalogError::EmptyId);
    }
    if item.width_units <= 0 || item.height_units <= 0 {
        return Err(CatalogError::InvalidDimensions {
            id: item.id.clone(),
            width_units: item.width_units,
            height_units: item.height_units,
        });
    }
    Ok(())
}

/// Library loading failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    Parse(String),
    EmptyId,
    DuplicateId {
        id: String,
    },
    InvalidDimensions {
        id: String,
        width_units: i32,
        height_units: i32,
    },
    /// Model file name carries no `WxH` size token.
    MissingDimensions {
        file_name: String,
    },
    /// Neither a palette name nor a `#RRGGBB` literal.
    InvalidColor {
        input: String,
    },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "library index is not valid JSON: {msg}"),
            Self::EmptyId => write!(f, "library item has an empty id"),
            Self::DuplicateId { id } => write!(f, "library item id {id:?} appears more than once"),
            Self::MissingDimensions { file_name } => {
                write!(f, "no WxH size found in model file name {file_name:?}")
            }
            Self::InvalidColor { input } => write!(f, "{input:?} is not a known color or #RRGGBB"),
            Self::InvalidDimensions {
                id,
                width_units,
                height_units,
            } => write!(
                f,
                "library item {id:?} has non-positive size {width_units}x{height_units}"
            ),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Normalize a file or display name into a library id.
///
/// Drops the extension, lowercases, maps spaces/underscores to hyphens,
/// strips anything not `[a-z0-9-]`, and collapses hyphen runs.
///
/// ```
/// # use binplan_layout::catalog::to_kebab_case;
/// assert_eq!(to_kebab_case("Utensils 1x3.stl"), "utensils-1x3");
/// ```
#[must_use]
pub fn to_kebab_case(name: &str) -> String {
    let stem = file_stem(name);
    let mut out = String::with_capacity(stem.len());
    for ch in stem.chars().flat_map(char::to_lowercase) {
        let mapped = match ch {
            ' ' | '_' | '-' => '-',
            c if c.is_ascii_lowercase() || c.is_ascii_digit() => c,
            _ => continue,
        };
        if mapped == '-' && out.ends_with('-') {
            continue;
        }
        out.push(mapped);
    }
    out.trim_matches('-').to_string()
}

fn file_stem(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.contains(' ') => stem,
        _ => name,
    }
}

/// Spans of a size token scanned at `start`: optional leading whitespace,
/// `W`, `x`/`X`, `H`, optional trailing whitespace.
struct SizeToken {
    width: Range<usize>,
    height: Range<usize>,
    end: usize,
}

fn size_token_at(chars: &[char], start: usize) -> Option<SizeToken> {
    let run_end = |from: usize, pred: fn(&char) -> bool| {
        chars[from..]
            .iter()
            .position(|c| !pred(c))
            .map_or(chars.len(), |n| from + n)
    };
    let w_start = run_end(start, |c| c.is_whitespace());
    let w_end = run_end(w_start, char::is_ascii_digit);
    if w_end == w_start || !matches!(chars.get(w_end), Some('x' | 'X')) {
        return None;
    }
    let h_start = w_end + 1;
    let h_end = run_end(h_start, char::is_ascii_digit);
    if h_end == h_start {
        return None;
    }
    Some(SizeToken {
        width: w_start..w_end,
        height: h_start..h_end,
        end: run_end(h_end, |c| c.is_whitespace()),
    })
}

/// First `WxH` size token in a file name, case-insensitive. `None` when
/// there is none or a side does not fit in an `i32`.
///
/// ```
/// # use binplan_layout::catalog::extract_dimensions;
/// assert_eq!(extract_dimensions("Utensils 1x3.stl"), Some((1, 3)));
/// assert_eq!(extract_dimensions("Spacer.stl"), None);
/// ```
#[must_use]
pub fn extract_dimensions(file_name: &str) -> Option<(i32, i32)> {
    let chars: Vec<char> = file_name.chars().collect();
    let token = (0..chars.len())
        .filter(|&i| chars[i].is_ascii_digit() && (i == 0 || !chars[i - 1].is_ascii_digit()))
        .find_map(|i| size_token_at(&chars, i))?;
    let parse = |span: Range<usize>| -> Option<i32> {
        chars[span].iter().collect::<String>().parse().ok()
    };
    Some((parse(token.width)?, parse(token.height)?))
}

/// Display name in the library's `"WxH Name"` form.
///
/// Every size token is removed from the stem, whitespace is collapsed, and
/// the given size is put in front.
///
/// ```
/// # use binplan_layout::catalog::generate_display_name;
/// assert_eq!(generate_display_name("Utensils 1x3.stl", 1, 3), "1x3 Utensils");
/// ```
#[must_use]
pub fn generate_display_name(file_name: &str, width_units: i32, height_units: i32) -> String {
    let chars: Vec<char> = file_stem(file_name).chars().collect();
    let mut stripped = String::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        match size_token_at(&chars, i) {
            Some(token) => {
                stripped.push(' ');
                i = token.end;
            }
            None => {
                stripped.push(chars[i]);
                i += 1;
            }
        }
    }
    let name = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    format!("{width_units}x{height_units} {name}").trim_end().to_string()
}

const NAMED_COLORS: [(&str, &str); 20] = [
    ("blue", "#3B82F6"),
    ("green", "#10B981"),
    ("red", "#EF4444"),
    ("purple", "#A855F7"),
    ("yellow", "#F59E0B"),
    ("orange", "#F97316"),
    ("pink", "#EC4899"),
    ("indigo", "#6366F1"),
    ("teal", "#14B8A6"),
    ("cyan", "#06B6D4"),
    ("gray", "#6B7280"),
    ("grey", "#6B7280"),
    ("slate", "#64748B"),
    ("lime", "#84CC16"),
    ("emerald", "#10B981"),
    ("sky", "#0EA5E9"),
    ("violet", "#8B5CF6"),
    ("fuchsia", "#D946EF"),
    ("rose", "#F43F5E"),
    ("amber", "#F59E0B"),
];

/// Resolve a color name or hex literal to a `#RRGGBB` string.
///
/// Accepts palette names case-insensitively and `#RRGGBB` literals (with or
/// without the leading `#`).
#[must_use]
pub fn color_hex(input: &str) -> Option<String> {
    let trimmed = input.trim();
    let lower = trimmed.to_ascii_lowercase();
    if let Some((_, hex)) = NAMED_COLORS.iter().find(|(name, _)| *name == lower) {
        return Some((*hex).to_string());
    }
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
    (digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit()))
        .then(|| format!("#{}", digits.to_ascii_uppercase()))
}
