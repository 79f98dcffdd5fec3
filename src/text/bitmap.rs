//! Spleen bitmap font painter.
//!
//! Glyphs come from the Spleen font family and are scaled nearest-neighbour
//! to a cell `font_size` tall and half as wide. Characters missing from
//! Spleen (Hangul, most CJK) render as a box outline of the same cell size,
//! so layout stays predictable even when glyph coverage is not.

use image::RgbaImage;
use spleen_font::{FONT_6X12, FONT_8X16, FONT_12X24, PSF2Font};

use super::{GlyphPainter, TextMeasure, blend_pixel};
use crate::config::Color;

/// Spleen glyph cells are twice as tall as they are wide.
const CELL_ASPECT: f64 = 0.5;

/// Bitmap font backed by Spleen.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitmapFont;

impl BitmapFont {
    pub fn new() -> Self {
        Self
    }

    /// Glyph cell for a font size, in whole pixels (at least 1×1).
    pub fn cell_size(font_size: f64) -> (u32, u32) {
        let height = font_size.round().max(1.0) as u32;
        let width = (font_size * CELL_ASPECT).round().max(1.0) as u32;
        (width, height)
    }
}

impl TextMeasure for BitmapFont {
    fn text_width(&self, text: &str, font_size: f64) -> f64 {
        let (cell_w, _) = Self::cell_size(font_size);
        text.chars().count() as f64 * cell_w as f64
    }
}

impl GlyphPainter for BitmapFont {
    fn line_height(&self, font_size: f64) -> f64 {
        Self::cell_size(font_size).1 as f64
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
        let (cell_w, cell_h) = Self::cell_size(font_size);
        let (data, src_w, src_h) = face_for(cell_h);
        let mut font = PSF2Font::new(data).ok();

        let mut caret = x;
        for ch in text.chars() {
            let glyph = font
                .as_mut()
                .and_then(|f| source_bitmap(f, ch, src_w, src_h))
                .unwrap_or_else(|| box_bitmap(src_w, src_h));

            let strikes: &[i64] = if bold { &[0, 1] } else { &[0] };
            for &dx_bold in strikes {
                for dy in 0..cell_h as usize {
                    for dx in 0..cell_w as usize {
                        let sx = dx * src_w / cell_w as usize;
                        let sy = dy * src_h / cell_h as usize;
                        if glyph[sy * src_w + sx] {
                            blend_pixel(
                                canvas,
                                caret + dx as i64 + dx_bold,
                                y + dy as i64,
                                color,
                                1.0,
                            );
                        }
                    }
                }
            }
            caret += cell_w as i64;
        }
    }
}

/// Smallest Spleen face at least as tall as the cell; cells over 24px scale
/// the largest face up. Returns the face data and its glyph size.
fn face_for(cell_h: u32) -> (&'static [u8], usize, usize) {
    match cell_h {
        0..=12 => (FONT_6X12, 6, 12),
        13..=16 => (FONT_8X16, 8, 16),
        _ => (FONT_12X24, 12, 24),
    }
}

/// Read one Spleen glyph into a `src_w × src_h` on/off bitmap.
fn source_bitmap(font: &mut PSF2Font, ch: char, src_w: usize, src_h: usize) -> Option<Vec<bool>> {
    let utf8 = ch.to_string();
    let glyph = font.glyph_for_utf8(utf8.as_bytes())?;

    let mut bitmap = vec![false; src_w * src_h];
    for (row_y, row) in glyph.enumerate() {
        for (col_x, on) in row.enumerate() {
            if row_y < src_h && col_x < src_w {
                bitmap[row_y * src_w + col_x] = on;
            }
        }
    }
    Some(bitmap)
}

/// Box outline for characters the font does not cover.
fn box_bitmap(w: usize, h: usize) -> Vec<bool> {
    let mut bitmap = vec![false; w * h];
    for x in 1..w - 1 {
        bitmap[w + x] = true;
        bitmap[(h - 2) * w + x] = true;
    }
    for y in 1..h - 1 {
        bitmap[y * w + 1] = true;
        bitmap[y * w + w - 2] = true;
    }
    bitmap
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn blank(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba([255, 255, 255, 255]))
    }

    fn dark_pixels(img: &RgbaImage) -> usize {
        img.pixels().filter(|p| p[0] < 128).count()
    }

    #[test]
    fn test_cell_size() {
        assert_eq!(BitmapFont::cell_size(24.0), (12, 24));
        assert_eq!(BitmapFont::cell_size(16.0), (8, 16));
        assert_eq!(BitmapFont::cell_size(0.2), (1, 1));
    }

    #[test]
    fn test_face_selection() {
        assert_eq!(face_for(10).1, 6);
        assert_eq!(face_for(12).2, 12);
        assert_eq!(face_for(14).1, 8);
        assert_eq!(face_for(16).2, 16);
        assert_eq!(face_for(17).1, 12);
        assert_eq!(face_for(40).2, 24);
    }

    #[test]
    fn test_draw_mid_size_face() {
        let mut img = blank(32, 14);
        BitmapFont.draw_text(&mut img, "Ab", 0, 0, 14.0, Color::BLACK, false);
        assert!(dark_pixels(&img) > 0);
    }

    #[test]
    fn test_measure_matches_cells() {
        let font = BitmapFont::new();
        assert_eq!(font.text_width("ABCD", 24.0), 48.0);
        assert_eq!(font.text_width("공사", 16.0), 16.0);
    }

    #[test]
    fn test_draw_ascii() {
        let mut img = blank(64, 24);
        BitmapFont.draw_text(&mut img, "Hi", 0, 0, 24.0, Color::BLACK, false);
        assert!(dark_pixels(&img) > 0);
        // Nothing drawn past the two cells
        for y in 0..24 {
            for x in 24..64 {
                assert_eq!(img.get_pixel(x, y)[0], 255);
            }
        }
    }

    #[test]
    fn test_bold_is_heavier() {
        let mut regular = blank(40, 16);
        let mut bold = blank(40, 16);
        BitmapFont.draw_text(&mut regular, "Field", 0, 0, 16.0, Color::BLACK, false);
        BitmapFont.draw_text(&mut bold, "Field", 0, 0, 16.0, Color::BLACK, true);
        assert!(dark_pixels(&bold) > dark_pixels(&regular));
    }

    #[test]
    fn test_uncovered_char_draws_box() {
        let mut img = blank(12, 24);
        BitmapFont.draw_text(&mut img, "\u{AC00}", 0, 0, 24.0, Color::BLACK, false);
        assert!(dark_pixels(&img) > 0);
    }

    #[test]
    fn test_clipped_draw_does_not_panic() {
        let mut img = blank(10, 10);
        BitmapFont.draw_text(&mut img, "overflow", -5, -5, 24.0, Color::BLACK, true);
        BitmapFont.draw_text(&mut img, "overflow", 8, 8, 24.0, Color::BLACK, false);
    }
}
