//! # Table Overlay Layout
//!
//! The overlay is a two-column field/value grid anchored at the bottom-left
//! corner of the canvas. Rows follow form declaration order exactly,
//! including repeated field names.
//!
//! - [`layout`]: column widths, row height and table footprint

pub mod layout;

pub use layout::{MIN_COL1_CHARS, MIN_COL2_CHARS, TableLayout, layout_table};

use serde::{Deserialize, Serialize};

/// One table row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldEntry {
    pub field: String,
    pub value: String,
}

impl FieldEntry {
    /// Create an entry. The value is trimmed.
    pub fn new(field: impl Into<String>, value: impl AsRef<str>) -> Self {
        Self {
            field: field.into(),
            value: value.as_ref().trim().to_string(),
        }
    }
}
