//! Canvas dimension resolution.
//!
//! The canvas is derived once per layout pass from the display width and a
//! configured aspect ratio. It never swaps with rotation; only the photo drawn
//! inside it does (see [`super::rotation`]).

use serde::{Deserialize, Serialize};

use crate::config::AspectConfig;
use crate::error::{Result, SitestampError};

/// Display information supplied by the host once per layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayMetrics {
    /// Available width in pixels.
    pub available_width: f64,
}

impl DisplayMetrics {
    pub fn new(available_width: f64) -> Self {
        Self { available_width }
    }
}

/// Width × height of the logical canvas in whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanvasDims {
    pub width: u32,
    pub height: u32,
}

impl CanvasDims {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Resolve the canvas size for a display.
///
/// ```text
/// width  = floor(available_width * width_fraction)
/// height = floor(width * aspect.height / aspect.width)
/// ```
///
/// ## Example
///
/// ```
/// use sitestamp::config::AspectConfig;
/// use sitestamp::geometry::{CanvasDims, DisplayMetrics, resolve_canvas};
///
/// let dims = resolve_canvas(DisplayMetrics::new(400.0), AspectConfig::new(4.0, 3.0), 0.7).unwrap();
/// assert_eq!(dims, CanvasDims::new(280, 210));
/// ```
pub fn resolve_canvas(
    metrics: DisplayMetrics,
    aspect: AspectConfig,
    width_fraction: f64,
) -> Result<CanvasDims> {
    aspect.validate()?;
    if !(width_fraction.is_finite() && width_fraction > 0.0) {
        return Err(SitestampError::Configuration(format!(
            "width fraction must be positive, got {}",
            width_fraction
        )));
    }
    if !(metrics.available_width.is_finite() && metrics.available_width >= 0.0) {
        return Err(SitestampError::Configuration(format!(
            "available width must be a non-negative number, got {}",
            metrics.available_width
        )));
    }

    let width = (metrics.available_width * width_fraction).floor();
    let height = (width * aspect.height / aspect.width).floor();

    if width > u32::MAX as f64 || height > u32::MAX as f64 {
        return Err(SitestampError::Configuration(format!(
            "canvas {}x{} does not fit in pixel coordinates",
            width, height
        )));
    }

    let dims = CanvasDims::new(width as u32, height as u32);
    log::debug!(
        "resolved canvas {}x{} from available width {} (fraction {}, aspect {}:{})",
        dims.width,
        dims.height,
        metrics.available_width,
        width_fraction,
        aspect.width,
        aspect.height
    );
    Ok(dims)
}
