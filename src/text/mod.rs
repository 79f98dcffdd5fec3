//! # Text Measurement and Painting
//!
//! Table layout needs to know how wide a string is. Exact glyph metrics depend
//! on the rendering backend, so width is answered by a pluggable oracle
//! ([`TextMeasure`]). Identical oracle answers always produce identical
//! layouts.
//!
//! | Type | Measures | Paints | Notes |
//! |------|----------|--------|-------|
//! | [`Monospace`] | yes | no | char width = font size (fallback policy) |
//! | [`BitmapFont`] | yes | yes | Spleen bitmap font, nearest-neighbour scaled |
//! | [`TtfFont`] | yes | yes | any TTF/OTF via `ab_glyph`, anti-aliased |

mod bitmap;
mod ttf;

pub use bitmap::BitmapFont;
pub use ttf::TtfFont;

use std::borrow::Cow;
use std::sync::Arc;

use image::RgbaImage;

use crate::config::Color;

/// Suffix appended to text cut off at a cell edge.
pub const ELLIPSIS: &str = "...";

/// Width oracle for single-line text.
pub trait TextMeasure: Send + Sync {
    /// Advance width of `text` in pixels at `font_size` pixels.
    fn text_width(&self, text: &str, font_size: f64) -> f64;
}

/// Monospace approximation: every character is `font_size * advance_ratio` wide.
///
/// With the default ratio of 1.0 this is the fallback used when no real text
/// measurement is available. It deliberately over-estimates Latin text and
/// fits full-width Hangul.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Monospace {
    pub advance_ratio: f64,
}

impl Default for Monospace {
    fn default() -> Self {
        Self { advance_ratio: 1.0 }
    }
}

impl TextMeasure for Monospace {
    fn text_width(&self, text: &str, font_size: f64) -> f64 {
        text.chars().count() as f64 * font_size * self.advance_ratio
    }
}

/// A text backend that can also rasterize.
pub trait GlyphPainter: TextMeasure {
    /// Height of one line of text at `font_size`.
    fn line_height(&self, font_size: f64) -> f64 {
        font_size
    }

    /// Draw `text` with the top-left of its line box at (`x`, `y`).
    ///
    /// Pixels outside the canvas are skipped. `bold` is allowed to be
    /// synthesized.
    #[allow(clippy::too_many_arguments)]
    fn draw_text(
        &self,
        canvas: &mut RgbaImage,
        text: &str,
        x: i64,
        y: i64,
        font_size: f64,
        color: Color,
        bold: bool,
    );
}

/// Layout oracle and painter for one composition run.
///
/// An outline font measures and paints. Without one, layout falls back to
/// [`Monospace`] and [`BitmapFont`] paints; cell text is still truncated
/// against the painter's own metrics.
pub fn text_stack(font: Option<TtfFont>) -> (Arc<dyn TextMeasure>, Box<dyn GlyphPainter>) {
    match font {
        Some(font) => (Arc::new(font.clone()), Box::new(font)),
        None => (Arc::new(Monospace::default()), Box::new(BitmapFont::new())),
    }
}

/// Cut `text` so it fits in `max_width`, ending in [`ELLIPSIS`] when shortened.
///
/// Returns the input unchanged when it already fits. When not even the
/// ellipsis fits, returns an empty string.
pub fn truncate_to_width<'a>(
    text: &'a str,
    max_width: f64,
    font_size: f64,
    measure: &dyn TextMeasure,
) -> Cow<'a, str> {
    if measure.text_width(text, font_size) <= max_width {
        return Cow::Borrowed(text);
    }
    if measure.text_width(ELLIPSIS, font_size) > max_width {
        return Cow::Borrowed("");
    }

    // Longest char-boundary prefix that still fits with the ellipsis.
    let boundaries: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    for &end in boundaries.iter().rev() {
        let candidate = format!("{}{}", text[..end].trim_end(), ELLIPSIS);
        if measure.text_width(&candidate, font_size) <= max_width {
            return Cow::Owned(candidate);
        }
    }
    Cow::Borrowed(ELLIPSIS)
}

/// Source-over blend of `color` at `coverage` (0.0-1.0) into one canvas pixel.
pub(crate) fn blend_pixel(canvas: &mut RgbaImage, x: i64, y: i64, color: Color, coverage: f32) {
    if x < 0 || y < 0 || x >= canvas.width() as i64 || y >= canvas.height() as i64 {
        return;
    }
    let alpha = (color.a as f32 / 255.0) * coverage.clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return;
    }

    let dst = canvas.get_pixel_mut(x as u32, y as u32);
    let src = [color.r, color.g, color.b];
    for c in 0..3 {
        let blended = src[c] as f32 * alpha + dst[c] as f32 * (1.0 - alpha);
        dst[c] = blended.round().clamp(0.0, 255.0) as u8;
    }
    let dst_a = dst[3] as f32 / 255.0;
    dst[3] = ((alpha + dst_a * (1.0 - alpha)) * 255.0).round().clamp(0.0, 255.0) as u8;
}
