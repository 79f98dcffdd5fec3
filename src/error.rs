//! # Error Types
//!
//! This module defines error types used throughout the sitestamp library.
//!
//! The geometry engine only ever produces the first three variants. The
//! remaining ones belong to the raster backend, configuration loading and
//! the CLI.

use thiserror::Error;

/// Main error type for sitestamp operations
#[derive(Debug, Error)]
pub enum SitestampError {
    /// Non-positive aspect ratio, font size, padding or similar. Never defaulted.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Rotation outside {0, 90, 180, 270}
    #[error("Invalid rotation: {0} degrees (expected 0, 90, 180 or 270)")]
    InvalidRotation(i32),

    /// Internal invariant violated (logic defect)
    #[error("Invariant violated: {0}")]
    Invariant(String),

    /// Capture backend produced output that breaks the artifact contract
    #[error("Capture contract violated: {0}")]
    Contract(String),

    /// Image decoding, processing or encoding error
    #[error("Image error: {0}")]
    Image(String),

    /// Font loading error
    #[error("Font error: {0}")]
    Font(String),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, SitestampError>;

impl From<image::ImageError> for SitestampError {
    fn from(e: image::ImageError) -> Self {
        SitestampError::Image(e.to_string())
    }
}
