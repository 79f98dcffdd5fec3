//! Rotation in quarter turns and the resulting photo draw box.
//!
//! ```text
//!   0° / 180°                 90° / 270°
//!   ┌──────────────┐          ┌───┬──────┬───┐
//!   │              │          │   │      │   │  draw box = canvas with
//!   │  draw box =  │          │   │ draw │   │  sides swapped, centered:
//!   │    canvas    │          │   │ box  │   │  offset may be negative
//!   └──────────────┘          └───┴──────┴───┘  (overflow is clipped)
//! ```

use serde::{Deserialize, Serialize};

use super::CanvasDims;
use crate::error::{Result, SitestampError};

/// Clockwise rotation of the photo in 90° steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [
        Rotation::Deg0,
        Rotation::Deg90,
        Rotation::Deg180,
        Rotation::Deg270,
    ];

    /// Accepts exactly 0, 90, 180 or 270.
    pub fn from_degrees(degrees: i32) -> Result<Self> {
        match degrees {
            0 => Ok(Rotation::Deg0),
            90 => Ok(Rotation::Deg90),
            180 => Ok(Rotation::Deg180),
            270 => Ok(Rotation::Deg270),
            other => Err(SitestampError::InvalidRotation(other)),
        }
    }

    pub fn degrees(self) -> i32 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// Next quarter turn clockwise, wrapping 270° back to 0°.
    pub fn rotate_clockwise(self) -> Self {
        match self {
            Rotation::Deg0 => Rotation::Deg90,
            Rotation::Deg90 => Rotation::Deg180,
            Rotation::Deg180 => Rotation::Deg270,
            Rotation::Deg270 => Rotation::Deg0,
        }
    }

    /// Whether this rotation swaps width and height.
    pub fn swaps_axes(self) -> bool {
        self.degrees() % 180 != 0
    }
}

impl TryFrom<i32> for Rotation {
    type Error = SitestampError;

    fn try_from(degrees: i32) -> Result<Self> {
        Rotation::from_degrees(degrees)
    }
}

impl From<Rotation> for i32 {
    fn from(r: Rotation) -> Self {
        r.degrees()
    }
}

/// Where the (rotated) photo is drawn on the canvas.
///
/// Offsets are relative to the canvas origin and may be negative or land on
/// half pixels when the canvas sides differ by an odd amount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectivePlacement {
    pub draw_width: u32,
    pub draw_height: u32,
    pub offset_x: f64,
    pub offset_y: f64,
}

/// Compute the draw box for a photo rotated by `rotation` on `canvas`.
///
/// ## Example
///
/// ```
/// use sitestamp::geometry::{CanvasDims, Rotation, normalize_rotation};
///
/// let p = normalize_rotation(CanvasDims::new(280, 210), Rotation::Deg90);
/// assert_eq!((p.draw_width, p.draw_height), (210, 280));
/// assert_eq!((p.offset_x, p.offset_y), (35.0, -35.0));
/// ```
pub fn normalize_rotation(canvas: CanvasDims, rotation: Rotation) -> EffectivePlacement {
    if !rotation.swaps_axes() {
        return EffectivePlacement {
            draw_width: canvas.width,
            draw_height: canvas.height,
            offset_x: 0.0,
            offset_y: 0.0,
        };
    }

    let draw_width = canvas.height;
    let draw_height = canvas.width;
    EffectivePlacement {
        draw_width,
        draw_height,
        offset_x: (canvas.width as f64 - draw_width as f64) / 2.0,
        offset_y: (canvas.height as f64 - draw_height as f64) / 2.0,
    }
}

/// Checked variant taking raw degrees.
pub fn normalize_degrees(canvas: CanvasDims, degrees: i32) -> Result<EffectivePlacement> {
    Ok(normalize_rotation(canvas, Rotation::from_degrees(degrees)?))
}
