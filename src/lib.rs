//! # Sitestamp - Site Photo Composition Library
//!
//! Sitestamp stamps construction-site photos with a form table. Each photo
//! is drawn rotation-corrected onto a fixed-aspect canvas, and a two-column
//! field/value table is anchored to the canvas's bottom-left corner. It
//! provides:
//!
//! - **Canvas geometry**: display width + aspect ratio → canvas pixels
//! - **Rotation normalization**: quarter turns → photo draw box and offset
//! - **Table layout**: column widths clamped between readable floors and
//!   the canvas width
//! - **Capture export**: spec + photo → one JPEG of exactly canvas size
//!
//! ## Quick Start
//!
//! ```
//! use image::{DynamicImage, RgbImage};
//! use sitestamp::{
//!     compose::Composer,
//!     config::CompositeConfig,
//!     export::{CaptureExporter, RasterExporter},
//!     geometry::{DisplayMetrics, Rotation},
//!     table::FieldEntry,
//! };
//!
//! let config = CompositeConfig::default();
//! let composer = Composer::new(&config)?;
//!
//! let entries = vec![
//!     FieldEntry::new("공사일자", "2024-01-01"),
//!     FieldEntry::new("현장명", "A동 신축공사"),
//! ];
//! let spec = composer.compose(DisplayMetrics::new(400.0), Rotation::Deg90, &entries)?;
//!
//! let photo = DynamicImage::ImageRgb8(RgbImage::new(40, 30));
//! let mut exporter = RasterExporter::new(config.export)?;
//! let artifact = exporter.capture(&spec, &photo)?;
//!
//! assert_eq!((artifact.width, artifact.height), (280, 210));
//! # Ok::<(), sitestamp::SitestampError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`geometry`] | Canvas sizing and rotation placement |
//! | [`table`] | Field entries and table layout |
//! | [`text`] | Text measurement and glyph painting |
//! | [`compose`] | Composition specs and the [`Composer`] pipeline |
//! | [`export`] | Capture exporters and JPEG artifacts |
//! | [`batch`] | Multi-photo planning and serial capture |
//! | [`form`] | Form descriptors, default values and file naming |
//! | [`config`] | JSON configuration |
//! | [`error`] | Error types |

pub mod batch;
pub mod compose;
pub mod config;
pub mod error;
pub mod export;
pub mod form;
pub mod geometry;
pub mod table;
pub mod text;

// Re-exports for convenience
pub use compose::{Composer, CompositionSpec};
pub use config::CompositeConfig;
pub use error::SitestampError;
pub use export::{CaptureExporter, CompositeArtifact, RasterExporter};
