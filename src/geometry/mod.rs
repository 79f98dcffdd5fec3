//! # Canvas Geometry
//!
//! Fixed canvas sizing and rotation-aware photo placement.
//!
//! ## Modules
//!
//! - [`canvas`]: display width + aspect ratio → canvas dimensions
//! - [`rotation`]: quarter-turn rotation → photo draw box and centering offset

pub mod canvas;
pub mod rotation;

pub use canvas::{CanvasDims, DisplayMetrics, resolve_canvas};
pub use rotation::{EffectivePlacement, Rotation, normalize_degrees, normalize_rotation};
