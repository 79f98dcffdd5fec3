//! # Capture Export
//!
//! The boundary between the geometry engine and pixels. A [`CaptureExporter`]
//! turns a [`CompositionSpec`] plus a photo into one encoded image.
//!
//! ## Output contract
//!
//! - exactly one artifact per `capture` call
//! - JPEG, quality 0.9 unless configured otherwise
//! - pixel dimensions exactly `canvas.width × canvas.height`
//!
//! `capture` takes `&mut self`: an exporter models a single render surface,
//! so only one photo can be bound to it at a time and captures are
//! serialized by the borrow checker rather than by a settle delay.

mod raster;

pub use raster::RasterExporter;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::compose::CompositionSpec;
use crate::error::Result;

/// How the photo fills its draw box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitMode {
    /// Scale both axes independently to the box.
    Stretch,
    /// Scale to cover the box, cropping the overflow evenly.
    #[default]
    Cover,
    /// Scale to fit inside the box, leaving the background visible.
    Contain,
}

/// One encoded composite image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeArtifact {
    pub width: u32,
    pub height: u32,
    /// Encoded JPEG bytes.
    pub bytes: Vec<u8>,
}

impl CompositeArtifact {
    pub fn format(&self) -> &'static str {
        "jpeg"
    }

    pub fn mime_type(&self) -> &'static str {
        "image/jpeg"
    }
}

/// A render surface that can rasterize a spec.
pub trait CaptureExporter {
    /// Bind `photo` to the surface, render `spec`, and encode the result.
    fn capture(&mut self, spec: &CompositionSpec, photo: &DynamicImage)
    -> Result<CompositeArtifact>;
}
