//! # Composite Configuration
//!
//! Canvas aspect, table styling and export settings for one composition batch.
//!
//! Configuration is plain JSON. Every field has a default, so an empty object
//! is a valid configuration:
//!
//! ```
//! use sitestamp::config::CompositeConfig;
//!
//! let config = CompositeConfig::from_json_str(r#"{
//!     "canvas": { "aspect": { "width": 16, "height": 9 } },
//!     "table": { "fontSize": 14, "backgroundColor": "rgba(255,255,255,0.85)" }
//! }"#).unwrap();
//!
//! assert_eq!(config.canvas.width_fraction, 0.7);
//! let style = config.table.validate().unwrap();
//! assert_eq!(style.font_size, 14.0);
//! ```
//!
//! ## Table style
//!
//! [`TableStyleConfig`] is the raw, deserialized form. It is turned into a
//! [`TableStyle`] exactly once with [`TableStyleConfig::validate`]; layout and
//! rendering only ever accept the validated form.
//!
//! ```text
//! ┌──────────────┬────────────────────┐  ─┐
//! │ pad │ field  │ pad │ value        │   │ rowHeight
//! ├──────────────┼────────────────────┤  ─┘
//! │ ...          │ ...                │
//! └──────────────┴────────────────────┘
//!   col1Width       col2Width
//! ```

mod color;

pub use color::Color;

use std::ops::Deref;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SitestampError};
use crate::export::FitMode;

/// Reference aspect ratio for the canvas. Both sides must be positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AspectConfig {
    pub width: f64,
    pub height: f64,
}

impl AspectConfig {
    pub const FOUR_BY_THREE: Self = Self {
        width: 4.0,
        height: 3.0,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(SitestampError::Configuration(format!(
                "aspect width must be positive, got {}",
                self.width
            )));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(SitestampError::Configuration(format!(
                "aspect height must be positive, got {}",
                self.height
            )));
        }
        Ok(())
    }
}

impl Default for AspectConfig {
    fn default() -> Self {
        Self::FOUR_BY_THREE
    }
}

/// Canvas sizing relative to the host display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CanvasConfig {
    pub aspect: AspectConfig,
    /// Fraction of the available display width the canvas occupies.
    pub width_fraction: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            aspect: AspectConfig::default(),
            width_fraction: 0.7,
        }
    }
}

/// Scale the table font with the canvas width.
///
/// ```text
/// font = max(min_font_size, floor(canvas_width * font_size / reference_width))
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontScale {
    /// Canvas width at which `font_size` applies unscaled.
    pub reference_width: f64,
    #[serde(default = "default_min_font_size")]
    pub min_font_size: f64,
}

fn default_min_font_size() -> f64 {
    10.0
}

/// Raw table style as read from configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableStyleConfig {
    pub cell_padding_x: f64,
    pub cell_padding_y: f64,
    pub font_size: f64,
    /// Explicit row height. Derived from the font size when absent.
    pub row_height: Option<f64>,
    pub background_color: Color,
    pub border_color: Color,
    pub border_width: f64,
    pub text_color: Color,
    /// Lower bound of the table width as a fraction of canvas width.
    pub width_ratio_min: f64,
    /// Upper bound of the table width as a fraction of canvas width.
    pub width_ratio_max: f64,
    pub font_scale: Option<FontScale>,
}

impl Default for TableStyleConfig {
    fn default() -> Self {
        Self {
            cell_padding_x: 8.0,
            cell_padding_y: 4.0,
            font_size: 16.0,
            row_height: None,
            background_color: Color::WHITE,
            border_color: Color::BLACK,
            border_width: 1.0,
            text_color: Color::BLACK,
            width_ratio_min: 0.5,
            width_ratio_max: 0.95,
            font_scale: None,
        }
    }
}

impl TableStyleConfig {
    /// Check every constraint and freeze the style.
    ///
    /// Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<TableStyle> {
        positive("fontSize", self.font_size)?;
        non_negative("cellPaddingX", self.cell_padding_x)?;
        non_negative("cellPaddingY", self.cell_padding_y)?;
        non_negative("borderWidth", self.border_width)?;
        if let Some(h) = self.row_height {
            positive("rowHeight", h)?;
        }
        if let Some(scale) = &self.font_scale {
            positive("fontScale.referenceWidth", scale.reference_width)?;
            positive("fontScale.minFontSize", scale.min_font_size)?;
        }

        for (name, ratio) in [
            ("widthRatioMin", self.width_ratio_min),
            ("widthRatioMax", self.width_ratio_max),
        ] {
            if !(0.0..=1.0).contains(&ratio) {
                return Err(SitestampError::Configuration(format!(
                    "{} must be within [0, 1], got {}",
                    name, ratio
                )));
            }
        }
        if self.width_ratio_min > self.width_ratio_max {
            return Err(SitestampError::Configuration(format!(
                "widthRatioMin ({}) exceeds widthRatioMax ({})",
                self.width_ratio_min, self.width_ratio_max
            )));
        }

        Ok(TableStyle(self.clone()))
    }
}

fn positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SitestampError::Configuration(format!(
            "{} must be positive, got {}",
            name, value
        )))
    }
}

fn non_negative(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SitestampError::Configuration(format!(
            "{} must not be negative, got {}",
            name, value
        )))
    }
}

/// A validated, immutable table style.
///
/// Only obtainable through [`TableStyleConfig::validate`]. Dereferences to the
/// underlying config for read access.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TableStyle(TableStyleConfig);

impl TableStyle {
    /// Font size in effect for a canvas of the given width.
    pub fn font_size_for(&self, canvas_width: u32) -> f64 {
        match &self.0.font_scale {
            Some(scale) => {
                let scaled = (canvas_width as f64 * self.0.font_size / scale.reference_width).floor();
                scaled.max(scale.min_font_size)
            }
            None => self.0.font_size,
        }
    }

    /// Row height for the given effective font size.
    pub fn row_height_for(&self, font_size: f64) -> f64 {
        self.0
            .row_height
            .unwrap_or_else(|| (font_size * ROW_HEIGHT_FACTOR).round())
    }
}

/// Row height relative to font size when none is configured.
pub const ROW_HEIGHT_FACTOR: f64 = 2.2;

impl Deref for TableStyle {
    type Target = TableStyleConfig;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Default for TableStyle {
    fn default() -> Self {
        Self(TableStyleConfig::default())
    }
}

/// Settings for the encoded artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportConfig {
    /// JPEG quality, 1-100.
    pub quality: u8,
    pub fit: FitMode,
    /// Canvas color behind the photo.
    pub background: Color,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            quality: 90,
            fit: FitMode::Cover,
            background: Color::WHITE,
        }
    }
}

impl ExportConfig {
    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.quality) {
            return Err(SitestampError::Configuration(format!(
                "JPEG quality must be within 1-100, got {}",
                self.quality
            )));
        }
        Ok(())
    }
}

/// Top-level configuration for a composition batch.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositeConfig {
    pub canvas: CanvasConfig,
    pub table: TableStyleConfig,
    pub export: ExportConfig,
}

impl CompositeConfig {
    /// Parse configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
