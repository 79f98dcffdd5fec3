//! # Composition Specs
//!
//! A [`CompositionSpec`] is the complete, immutable instruction set for one
//! render: canvas size, photo placement, rotation, table rows, table layout
//! and style. A rendering backend given the same spec and photo must produce
//! the same image.
//!
//! ## Pipeline
//!
//! ```text
//! DisplayMetrics ──► resolve_canvas ──► CanvasDims ──┬─► normalize_rotation ──► EffectivePlacement
//!                                                     │
//! entries + style ──────────────────────────────────┴─► layout_table ──► TableLayout
//!                                                                              │
//!                          CompositionSpec::build ◄────────────────────────────┘
//! ```
//!
//! [`Composer`] runs the whole pipeline from a validated configuration.
//!
//! ## Example
//!
//! ```
//! use sitestamp::compose::Composer;
//! use sitestamp::config::CompositeConfig;
//! use sitestamp::geometry::{DisplayMetrics, Rotation};
//! use sitestamp::table::FieldEntry;
//!
//! let composer = Composer::new(&CompositeConfig::default()).unwrap();
//! let entries = vec![FieldEntry::new("공사일자", "2024-01-01")];
//! let spec = composer
//!     .compose(DisplayMetrics::new(400.0), Rotation::Deg90, &entries)
//!     .unwrap();
//!
//! assert_eq!((spec.canvas().width, spec.canvas().height), (280, 210));
//! assert_eq!(spec.placement().draw_width, 210);
//! assert!(spec.layout().overflowing);
//! ```

use std::sync::Arc;

use serde::Serialize;

use crate::config::{CanvasConfig, CompositeConfig, TableStyle};
use crate::error::{Result, SitestampError};
use crate::geometry::{
    CanvasDims, DisplayMetrics, EffectivePlacement, Rotation, normalize_rotation, resolve_canvas,
};
use crate::table::{FieldEntry, TableLayout, layout_table};
use crate::text::{Monospace, TextMeasure};

/// Immutable description of one render pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionSpec {
    canvas: CanvasDims,
    placement: EffectivePlacement,
    rotation: Rotation,
    entries: Vec<FieldEntry>,
    layout: TableLayout,
    style: TableStyle,
}

impl CompositionSpec {
    /// Assemble a spec, checking that the parts agree with each other.
    ///
    /// A mismatch here is a logic defect upstream and is reported as
    /// [`SitestampError::Invariant`].
    pub fn build(
        canvas: CanvasDims,
        placement: EffectivePlacement,
        rotation: Rotation,
        entries: &[FieldEntry],
        layout: TableLayout,
        style: &TableStyle,
    ) -> Result<Self> {
        if layout.table_width > canvas.width as f64 {
            return Err(SitestampError::Invariant(format!(
                "table width {} exceeds canvas width {}",
                layout.table_width, canvas.width
            )));
        }
        if placement != normalize_rotation(canvas, rotation) {
            return Err(SitestampError::Invariant(format!(
                "placement {:?} does not match {}° rotation on {}x{} canvas",
                placement,
                rotation.degrees(),
                canvas.width,
                canvas.height
            )));
        }
        if layout.row_count != entries.len() {
            return Err(SitestampError::Invariant(format!(
                "layout has {} rows but {} entries were given",
                layout.row_count,
                entries.len()
            )));
        }

        Ok(Self {
            canvas,
            placement,
            rotation,
            entries: entries.to_vec(),
            layout,
            style: style.clone(),
        })
    }

    pub fn canvas(&self) -> CanvasDims {
        self.canvas
    }

    pub fn placement(&self) -> EffectivePlacement {
        self.placement
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn entries(&self) -> &[FieldEntry] {
        &self.entries
    }

    pub fn layout(&self) -> &TableLayout {
        &self.layout
    }

    pub fn style(&self) -> &TableStyle {
        &self.style
    }

    /// Top-left corner of the table. Anchored bottom-left on the canvas.
    pub fn table_origin(&self) -> (f64, f64) {
        (0.0, self.canvas.height as f64 - self.layout.table_height)
    }

    /// The caller omits the table when there are no rows.
    pub fn has_table(&self) -> bool {
        !self.entries.is_empty()
    }
}

/// Runs resolve → normalize → layout → build from one validated configuration.
#[derive(Clone)]
pub struct Composer {
    canvas: CanvasConfig,
    style: TableStyle,
    measure: Arc<dyn TextMeasure>,
}

impl std::fmt::Debug for Composer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Composer")
            .field("canvas", &self.canvas)
            .field("style", &self.style)
            .finish_non_exhaustive()
    }
}

impl Composer {
    /// Composer using the monospace width approximation.
    pub fn new(config: &CompositeConfig) -> Result<Self> {
        Self::with_measure(config, Arc::new(Monospace::default()))
    }

    /// Composer with an injected text width oracle.
    pub fn with_measure(config: &CompositeConfig, measure: Arc<dyn TextMeasure>) -> Result<Self> {
        config.canvas.aspect.validate()?;
        let style = config.table.validate()?;
        Ok(Self {
            canvas: config.canvas,
            style,
            measure,
        })
    }

    pub fn style(&self) -> &TableStyle {
        &self.style
    }

    pub fn canvas_for(&self, metrics: DisplayMetrics) -> Result<CanvasDims> {
        resolve_canvas(metrics, self.canvas.aspect, self.canvas.width_fraction)
    }

    /// Produce the composition spec for one photo.
    pub fn compose(
        &self,
        metrics: DisplayMetrics,
        rotation: Rotation,
        entries: &[FieldEntry],
    ) -> Result<CompositionSpec> {
        let canvas = self.canvas_for(metrics)?;
        let placement = normalize_rotation(canvas, rotation);
        let layout = layout_table(entries, &self.style, canvas.width, self.measure.as_ref());
        CompositionSpec::build(canvas, placement, rotation, entries, layout, &self.style)
    }
}
