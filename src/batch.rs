//! # Batch Composition
//!
//! A batch is every photo taken for one form submission. All specs are
//! planned before the first capture, so the table and placement are fixed
//! by the time pixels are produced. Captures then run one at a time on a
//! single exporter.
//!
//! Progress is reported after each capture. The callback may stop the batch
//! by returning [`ControlFlow::Break`]; artifacts produced so far are dropped.

use std::ops::ControlFlow;

use image::DynamicImage;
use log::{debug, info};
use rayon::prelude::*;

use crate::compose::{Composer, CompositionSpec};
use crate::error::{Result, SitestampError};
use crate::export::{CaptureExporter, CompositeArtifact};
use crate::geometry::{DisplayMetrics, Rotation};
use crate::table::FieldEntry;

/// Progress after one capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    /// Zero-based index of the photo just captured.
    pub index: usize,
    pub total: usize,
    /// Rounded completion percentage, `1..=100`.
    pub percent: u8,
}

impl BatchProgress {
    fn after(index: usize, total: usize) -> Self {
        let percent = ((index + 1) as f64 / total as f64 * 100.0).round() as u8;
        Self {
            index,
            total,
            percent,
        }
    }
}

/// Result of a batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// One artifact per photo, in photo order.
    Completed(Vec<CompositeArtifact>),
    /// Stopped by the progress callback after `captured` photos.
    Abandoned { captured: usize },
}

impl BatchOutcome {
    pub fn artifacts(&self) -> Option<&[CompositeArtifact]> {
        match self {
            BatchOutcome::Completed(artifacts) => Some(artifacts),
            BatchOutcome::Abandoned { .. } => None,
        }
    }
}

/// Compute one spec per photo rotation.
///
/// Specs are independent, so they are built in parallel; the returned order
/// matches `rotations`.
pub fn plan_batch(
    composer: &Composer,
    metrics: DisplayMetrics,
    rotations: &[Rotation],
    entries: &[FieldEntry],
) -> Result<Vec<CompositionSpec>> {
    let specs = rotations
        .par_iter()
        .map(|&rotation| composer.compose(metrics, rotation, entries))
        .collect::<Result<Vec<_>>>()?;
    debug!("planned {} composite(s)", specs.len());
    Ok(specs)
}

/// Capture every planned spec with its photo, in order.
pub fn capture_batch<E, F>(
    exporter: &mut E,
    specs: &[CompositionSpec],
    photos: &[DynamicImage],
    mut on_progress: F,
) -> Result<BatchOutcome>
where
    E: CaptureExporter + ?Sized,
    F: FnMut(BatchProgress) -> ControlFlow<()>,
{
    if specs.len() != photos.len() {
        return Err(SitestampError::Contract(format!(
            "{} specs planned for {} photos",
            specs.len(),
            photos.len()
        )));
    }

    let total = specs.len();
    let mut artifacts = Vec::with_capacity(total);
    for (index, (spec, photo)) in specs.iter().zip(photos).enumerate() {
        artifacts.push(exporter.capture(spec, photo)?);
        let progress = BatchProgress::after(index, total);
        debug!("captured {}/{} ({}%)", index + 1, total, progress.percent);
        if on_progress(progress).is_break() {
            info!("batch abandoned after {} of {} captures", index + 1, total);
            return Ok(BatchOutcome::Abandoned {
                captured: index + 1,
            });
        }
    }

    info!("batch completed: {} composite(s)", total);
    Ok(BatchOutcome::Completed(artifacts))
}
