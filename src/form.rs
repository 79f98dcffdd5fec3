//! # Form Descriptors
//!
//! The form a field worker fills in before composing photos. A form declares
//! its field names in order; that order becomes the table row order.
//!
//! ## JSON shape
//!
//! ```json
//! {
//!   "_id": "665f...",
//!   "formName": "공정사진",
//!   "fields": ["공사일자", "현장명", "공종"],
//!   "fieldOptions": { "공종": ["토목", "건축", "설비"] },
//!   "folderStructure": ["현장명", "공종"],
//!   "isActive": true
//! }
//! ```
//!
//! Values are kept separately as a `field → value` map, mirroring how a form
//! screen holds its state.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::table::FieldEntry;

/// Substrings marking a field as a date (matched case-insensitively).
pub const DATE_KEYWORDS: [&str; 4] = ["일자", "날짜", "공사일", "date"];

/// Current values keyed by field name.
pub type FormValues = HashMap<String, String>;

/// A form definition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDescriptor {
    #[serde(rename = "_id", default)]
    pub id: String,
    pub form_name: String,
    #[serde(default)]
    pub fields: Vec<String>,
    /// Optional enumerated choices per field.
    #[serde(default)]
    pub field_options: BTreeMap<String, Vec<String>>,
    /// Fields whose values name uploaded files.
    #[serde(default)]
    pub folder_structure: Vec<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl FormDescriptor {
    /// Choices for `field`, if it is enumerated.
    pub fn options_for(&self, field: &str) -> Option<&[String]> {
        self.field_options
            .get(field)
            .map(Vec::as_slice)
            .filter(|opts| !opts.is_empty())
    }
}

/// Whether `field` should get a date picker (and an ISO date value).
pub fn is_date_field(field: &str) -> bool {
    let lower = field.to_lowercase();
    DATE_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Initial values for a freshly selected form: date fields get `today`
/// as `YYYY-MM-DD`, everything else starts empty.
pub fn initial_values(form: &FormDescriptor, today: NaiveDate) -> FormValues {
    let iso = today.format("%Y-%m-%d").to_string();
    form.fields
        .iter()
        .map(|field| {
            let value = if is_date_field(field) {
                iso.clone()
            } else {
                String::new()
            };
            (field.clone(), value)
        })
        .collect()
}

/// Every field is required. Returns missing fields in declaration order.
pub fn missing_fields<'a>(form: &'a FormDescriptor, values: &FormValues) -> Vec<&'a str> {
    form.fields
        .iter()
        .filter(|field| {
            values
                .get(field.as_str())
                .is_none_or(|v| v.trim().is_empty())
        })
        .map(String::as_str)
        .collect()
}

/// Table rows for the form, in declaration order, values trimmed.
pub fn entries(form: &FormDescriptor, values: &FormValues) -> Vec<FieldEntry> {
    form.fields
        .iter()
        .map(|field| {
            let value = values.get(field).map(String::as_str).unwrap_or("");
            FieldEntry::new(field.clone(), value)
        })
        .collect()
}

/// Only forms currently accepting uploads.
pub fn active_forms(forms: Vec<FormDescriptor>) -> Vec<FormDescriptor> {
    forms.into_iter().filter(|f| f.is_active).collect()
}

/// File name for an uploaded composite.
///
/// Folder-structure fields are replaced by their values (or kept as the
/// field name when the value is empty) and joined with `_`. Without a folder
/// structure the stem is the form name. The photo number `n` (counting from
/// 1) always follows the stem, so photos of one batch never share a name.
pub fn upload_file_name(
    form: &FormDescriptor,
    values: &FormValues,
    index: usize,
    timestamp_ms: i64,
) -> String {
    let stem = form
        .folder_structure
        .iter()
        .map(|field| match values.get(field).map(|v| v.trim()) {
            Some(v) if !v.is_empty() => v.to_string(),
            _ => field.clone(),
        })
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_");

    let stem = if stem.is_empty() {
        form.form_name.as_str()
    } else {
        stem.as_str()
    };
    format!("{}_{}_{}.jpg", sanitize(stem), index + 1, timestamp_ms)
}

/// File name for a composite saved to the device gallery.
pub fn gallery_file_name(index: usize, timestamp_ms: i64) -> String {
    format!("합성이미지_{}_{}.jpg", index + 1, timestamp_ms)
}

/// Path separators in values would otherwise escape the target directory.
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '-',
            c => c,
        })
        .collect()
}
