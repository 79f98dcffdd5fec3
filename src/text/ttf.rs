//! TrueType/OpenType painter backed by `ab_glyph`.
//!
//! No font is bundled. Callers load one from disk (a Hangul-capable face is
//! needed for Korean form labels) and inject it as both the layout oracle and
//! the painter.

use std::path::Path;

use ab_glyph::{Font, FontArc, ScaleFont};
use image::RgbaImage;

use super::{GlyphPainter, TextMeasure, blend_pixel};
use crate::config::Color;
use crate::error::{Result, SitestampError};

/// A loaded outline font.
#[derive(Clone)]
pub struct TtfFont {
    font: FontArc,
}

impl std::fmt::Debug for TtfFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtfFont").finish_non_exhaustive()
    }
}

impl TtfFont {
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let font = FontArc::try_from_vec(data)
            .map_err(|e| SitestampError::Font(format!("failed to parse font: {}", e)))?;
        Ok(Self { font })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        log::debug!("loaded font {} ({} bytes)", path.display(), data.len());
        Self::from_bytes(data)
    }
}

impl TextMeasure for TtfFont {
    fn text_width(&self, text: &str, font_size: f64) -> f64 {
        let scaled = self.font.as_scaled(font_size as f32);
        text.chars()
            .map(|ch| scaled.h_advance(self.font.glyph_id(ch)))
            .sum::<f32>() as f64
    }
}

impl GlyphPainter for TtfFont {
    fn line_height(&self, font_size: f64) -> f64 {
        let scaled = self.font.as_scaled(font_size as f32);
        (scaled.ascent() - scaled.descent()).ceil() as f64
    }

    fn draw_text(
        &self,
        canvas: &mut RgbaImage,
        text: &str,
        x: i64,
        y: i64,
        font_size: f64,
        color: Color,
        bold: bool,
    ) {
        let pixel_height = font_size as f32;
        let scaled = self.font.as_scaled(pixel_height);
        let baseline_y = y as f32 + scaled.ascent();

        let strikes: &[f32] = if bold { &[0.0, 1.0] } else { &[0.0] };
        for &dx_bold in strikes {
            let mut caret_x = x as f32 + dx_bold;
            for ch in text.chars() {
                let glyph_id = self.font.glyph_id(ch);
                let glyph = glyph_id
                    .with_scale_and_position(pixel_height, ab_glyph::point(caret_x, baseline_y));
                caret_x += scaled.h_advance(glyph_id);

                if let Some(outlined) = self.font.outline_glyph(glyph) {
                    let bounds = outlined.px_bounds();
                    outlined.draw(|px, py, coverage| {
                        let gx = px as i64 + bounds.min.x as i64;
                        let gy = py as i64 + bounds.min.y as i64;
                        blend_pixel(canvas, gx, gy, color, coverage);
                    });
                }
            }
        }
    }
}
