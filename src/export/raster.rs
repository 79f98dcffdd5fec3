//! In-memory raster backend built on the `image` crate.
//!
//! ## Layers (bottom to top)
//!
//! 1. Background fill
//! 2. Photo: rotated, fitted to the draw box, placed at the placement offset
//! 3. Table background (alpha blended)
//! 4. Cell text, row separators, column divider
//! 5. Outer table border

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};

use super::{CaptureExporter, CompositeArtifact, FitMode};
use crate::compose::CompositionSpec;
use crate::config::{Color, ExportConfig};
use crate::error::{Result, SitestampError};
use crate::geometry::Rotation;
use crate::text::{BitmapFont, GlyphPainter, blend_pixel, truncate_to_width};

/// Renders specs into JPEG artifacts.
pub struct RasterExporter {
    config: ExportConfig,
    painter: Box<dyn GlyphPainter>,
    filter: FilterType,
}

impl RasterExporter {
    /// Exporter drawing text with the built-in bitmap font.
    pub fn new(config: ExportConfig) -> Result<Self> {
        Self::with_painter(config, Box::new(BitmapFont::new()))
    }

    pub fn with_painter(config: ExportConfig, painter: Box<dyn GlyphPainter>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            painter,
            filter: FilterType::Triangle,
        })
    }

    /// Resampling filter for the photo (Triangle by default).
    pub fn filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }

    /// Render `spec` over `photo` without encoding.
    pub fn render(&self, spec: &CompositionSpec, photo: &DynamicImage) -> RgbaImage {
        let canvas_dims = spec.canvas();
        let mut canvas = RgbaImage::from_pixel(
            canvas_dims.width,
            canvas_dims.height,
            self.config.background.to_rgba(),
        );

        self.draw_photo(&mut canvas, spec, photo);
        if spec.has_table() {
            self.draw_table(&mut canvas, spec);
        }
        canvas
    }

    fn draw_photo(&self, canvas: &mut RgbaImage, spec: &CompositionSpec, photo: &DynamicImage) {
        let placement = spec.placement();
        let (box_w, box_h) = (placement.draw_width, placement.draw_height);
        if box_w == 0 || box_h == 0 || photo.width() == 0 || photo.height() == 0 {
            return;
        }

        let rotated = match spec.rotation() {
            Rotation::Deg0 => photo.clone(),
            Rotation::Deg90 => photo.rotate90(),
            Rotation::Deg180 => photo.rotate180(),
            Rotation::Deg270 => photo.rotate270(),
        };

        let (fitted, inset_x, inset_y) = match self.config.fit {
            FitMode::Stretch => (rotated.resize_exact(box_w, box_h, self.filter), 0, 0),
            FitMode::Cover => (rotated.resize_to_fill(box_w, box_h, self.filter), 0, 0),
            FitMode::Contain => {
                let scaled = rotated.resize(box_w, box_h, self.filter);
                let dx = (box_w - scaled.width().min(box_w)) as i64 / 2;
                let dy = (box_h - scaled.height().min(box_h)) as i64 / 2;
                (scaled, dx, dy)
            }
        };

        let x = placement.offset_x.floor() as i64 + inset_x;
        let y = placement.offset_y.floor() as i64 + inset_y;
        imageops::overlay(canvas, &fitted.to_rgba8(), x, y);
    }

    fn draw_table(&self, canvas: &mut RgbaImage, spec: &CompositionSpec) {
        let layout = spec.layout();
        let style = spec.style();
        let font_size = layout.font_size;

        let (_, origin_y) = spec.table_origin();
        let top = origin_y.round() as i64;
        let width = layout.table_width.round() as i64;
        let height = layout.table_height.round() as i64;
        let (col1, col2) = layout.cell_widths();
        let divider_x = col1.round() as i64;

        fill_rect(canvas, 0, top, width, height, style.background_color);

        let pad_x = style.cell_padding_x;
        let line_height = self.painter.line_height(font_size);
        for (i, entry) in spec.entries().iter().enumerate() {
            let row_top = top + (i as f64 * layout.row_height).round() as i64;
            let text_y = row_top + ((layout.row_height - line_height) / 2.0).round() as i64;

            let field = truncate_to_width(
                &entry.field,
                col1 - 2.0 * pad_x,
                font_size,
                self.painter.as_ref(),
            );
            self.painter.draw_text(
                canvas,
                &field,
                pad_x.round() as i64,
                text_y,
                font_size,
                style.text_color,
                true,
            );

            let value = truncate_to_width(
                entry.value.trim(),
                col2 - 2.0 * pad_x,
                font_size,
                self.painter.as_ref(),
            );
            self.painter.draw_text(
                canvas,
                &value,
                divider_x + pad_x.round() as i64,
                text_y,
                font_size,
                style.text_color,
                false,
            );

            if i + 1 < spec.entries().len() {
                let row_bottom = top + ((i + 1) as f64 * layout.row_height).round() as i64 - 1;
                fill_rect(canvas, 0, row_bottom, width, 1, style.border_color);
            }
        }

        fill_rect(canvas, divider_x, top, 1, height, style.border_color);

        let border = style.border_width.round() as i64;
        if border > 0 {
            fill_rect(canvas, 0, top, width, border, style.border_color);
            fill_rect(canvas, 0, top + height - border, width, border, style.border_color);
            fill_rect(canvas, 0, top, border, height, style.border_color);
            fill_rect(canvas, width - border, top, border, height, style.border_color);
        }
    }

    fn encode(&self, canvas: RgbaImage) -> Result<Vec<u8>> {
        let rgb = DynamicImage::ImageRgba8(canvas).to_rgb8();
        let mut bytes = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut bytes, self.config.quality);
        DynamicImage::ImageRgb8(rgb).write_with_encoder(encoder)?;
        Ok(bytes)
    }
}

impl CaptureExporter for RasterExporter {
    fn capture(
        &mut self,
        spec: &CompositionSpec,
        photo: &DynamicImage,
    ) -> Result<CompositeArtifact> {
        let canvas_dims = spec.canvas();
        if canvas_dims.area() == 0 {
            return Err(SitestampError::Contract(format!(
                "cannot capture an empty {}x{} canvas",
                canvas_dims.width, canvas_dims.height
            )));
        }

        let canvas = self.render(spec, photo);
        let bytes = self.encode(canvas)?;

        let (width, height) = image::ImageReader::new(Cursor::new(&bytes))
            .with_guessed_format()?
            .into_dimensions()?;
        if (width, height) != (canvas_dims.width, canvas_dims.height) {
            return Err(SitestampError::Contract(format!(
                "encoded {}x{} but the canvas is {}x{}",
                width, height, canvas_dims.width, canvas_dims.height
            )));
        }

        log::debug!(
            "captured {}x{} composite ({} bytes, quality {})",
            width,
            height,
            bytes.len(),
            self.config.quality
        );
        Ok(CompositeArtifact {
            width,
            height,
            bytes,
        })
    }
}

fn fill_rect(canvas: &mut RgbaImage, x: i64, y: i64, w: i64, h: i64, color: Color) {
    let x_start = x.max(0);
    let y_start = y.max(0);
    let x_end = (x + w).min(canvas.width() as i64);
    let y_end = (y + h).min(canvas.height() as i64);
    for py in y_start..y_end {
        for px in x_start..x_end {
            blend_pixel(canvas, px, py, color, 1.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::Composer;
    use crate::config::{CompositeConfig, TableStyleConfig};
    use crate::geometry::DisplayMetrics;
    use crate::table::FieldEntry;
    use image::{Rgb, RgbImage, Rgba};

    /// Red on the left half, blue on the right half.
    fn split_photo(w: u32, h: u32) -> DynamicImage {
        let mut img = RgbImage::new(w, h);
        for y in 0..h {
            for x in 0..w {
                let px = if x < w / 2 { Rgb([255, 0, 0]) } else { Rgb([0, 0, 255]) };
                img.put_pixel(x, y, px);
            }
        }
        DynamicImage::ImageRgb8(img)
    }

    fn spec(rotation: Rotation, entries: &[FieldEntry]) -> CompositionSpec {
        Composer::new(&CompositeConfig::default())
            .unwrap()
            .compose(DisplayMetrics::new(400.0), rotation, entries)
            .unwrap()
    }

    fn exporter(fit: FitMode) -> RasterExporter {
        RasterExporter::new(ExportConfig {
            fit,
            ..Default::default()
        })
        .unwrap()
        .filter(FilterType::Nearest)
    }

    fn close(px: &Rgba<u8>, rgb: [u8; 3]) -> bool {
        (0..3).all(|c| (px[c] as i32 - rgb[c] as i32).abs() <= 2)
    }

    const RED: [u8; 3] = [255, 0, 0];
    const BLUE: [u8; 3] = [0, 0, 255];

    #[test]
    fn test_render_matches_canvas() {
        let img = exporter(FitMode::Cover).render(&spec(Rotation::Deg0, &[]), &split_photo(64, 48));
        assert_eq!(img.dimensions(), (280, 210));
        assert!(close(img.get_pixel(10, 100), RED));
        assert!(close(img.get_pixel(270, 100), BLUE));
    }

    #[test]
    fn test_quarter_turn_leaves_side_bands() {
        // 90° box is 210 wide centered at x=35; columns left of it stay background.
        let img = exporter(FitMode::Stretch).render(&spec(Rotation::Deg90, &[]), &split_photo(64, 48));
        assert_eq!(img.get_pixel(10, 100), &Rgba([255, 255, 255, 255]));
        assert_eq!(img.get_pixel(270, 100), &Rgba([255, 255, 255, 255]));
        assert_ne!(img.get_pixel(140, 100), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_rotation_moves_photo_content() {
        // After a 90° clockwise turn the left (red) half ends up on top.
        let img = exporter(FitMode::Stretch).render(&spec(Rotation::Deg90, &[]), &split_photo(64, 48));
        assert!(close(img.get_pixel(140, 5), RED));
        assert!(close(img.get_pixel(140, 205), BLUE));
    }

    #[test]
    fn test_contain_letterboxes() {
        // A very wide photo in contain mode leaves background above and below.
        let img = exporter(FitMode::Contain).render(&spec(Rotation::Deg0, &[]), &split_photo(400, 50));
        assert_eq!(img.get_pixel(140, 2), &Rgba([255, 255, 255, 255]));
        assert!(close(img.get_pixel(10, 105), RED));
    }

    #[test]
    fn test_table_drawn_bottom_left() {
        let entries = vec![FieldEntry::new("Date", "2024-01-01")];
        let img = exporter(FitMode::Cover).render(&spec(Rotation::Deg0, &entries), &split_photo(64, 48));
        // Border pixel at the table's bottom-left corner
        assert_eq!(img.get_pixel(0, 209), &Rgba([0, 0, 0, 255]));
        // Table background above the photo (white, not red)
        let row_top = 210 - 35;
        assert_eq!(img.get_pixel(3, row_top as u32 + 2), &Rgba([255, 255, 255, 255]));
        // Above the table the photo is untouched
        assert!(close(img.get_pixel(3, row_top as u32 - 5), RED));
    }

    #[test]
    fn test_overflowing_value_is_truncated_inside_table() {
        let value = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
        let entries = vec![FieldEntry::new("Memo", value)];
        let spec = spec(Rotation::Deg0, &entries);
        let layout = spec.layout();
        assert!(layout.overflowing);

        let white = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 6, Rgb([255, 255, 255])));
        let exporter = exporter(FitMode::Cover);
        let img = exporter.render(&spec, &white);

        let right = layout.table_width.round() as u32;
        let top = (210.0 - layout.table_height) as u32;
        for y in top..210 {
            for x in right..280 {
                assert_eq!(img.get_pixel(x, y)[0], 255, "ink at ({}, {})", x, y);
            }
        }

        // The value cell holds text that was cut to end in an ellipsis.
        let (_, col2) = layout.cell_widths();
        let shown = truncate_to_width(
            value,
            col2 - 2.0 * spec.style().cell_padding_x,
            layout.font_size,
            &BitmapFont::new(),
        );
        assert!(shown.ends_with("..."), "got {}", shown);
        assert!(shown.len() < value.len());
        let value_x = layout.cell_widths().0.round() as u32 + 10;
        let inked = (top + 1..209)
            .flat_map(|y| (value_x..right - 2).map(move |x| (x, y)))
            .filter(|&(x, y)| img.get_pixel(x, y)[0] < 128)
            .count();
        assert!(inked > 0);
    }

    #[test]
    fn test_translucent_table_background() {
        let config = CompositeConfig {
            table: TableStyleConfig {
                background_color: Color::rgba(255, 255, 255, 128),
                border_width: 0.0,
                ..Default::default()
            },
            ..Default::default()
        };
        let spec = Composer::new(&config)
            .unwrap()
            .compose(DisplayMetrics::new(400.0), Rotation::Deg0, &[FieldEntry::new("a", "b")])
            .unwrap();
        let img = exporter(FitMode::Cover).render(&spec, &split_photo(64, 48));
        let px = img.get_pixel(3, 180);
        // Red showing through white at ~50%
        assert!(px[0] >= 250, "got {:?}", px);
        assert!(px[1] > 100 && px[1] < 160, "got {:?}", px);
    }

    #[test]
    fn test_capture_jpeg_contract() {
        let entries = vec![FieldEntry::new("공사일자", "2024-01-01")];
        let mut exporter = exporter(FitMode::Cover);
        let artifact = exporter
            .capture(&spec(Rotation::Deg270, &entries), &split_photo(64, 48))
            .unwrap();
        assert_eq!((artifact.width, artifact.height), (280, 210));
        assert_eq!(artifact.format(), "jpeg");
        // JPEG SOI marker
        assert_eq!(&artifact.bytes[..2], &[0xFF, 0xD8]);
        let decoded = image::load_from_memory(&artifact.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (280, 210));
    }

    #[test]
    fn test_render_is_deterministic() {
        let entries = vec![FieldEntry::new("현장", "서울")];
        let spec = spec(Rotation::Deg180, &entries);
        let photo = split_photo(30, 20);
        let exporter = exporter(FitMode::Cover);
        assert_eq!(exporter.render(&spec, &photo), exporter.render(&spec, &photo));
    }

    #[test]
    fn test_empty_canvas_is_contract_error() {
        let spec = Composer::new(&CompositeConfig::default())
            .unwrap()
            .compose(DisplayMetrics::new(0.0), Rotation::Deg0, &[])
            .unwrap();
        let err = exporter(FitMode::Cover).capture(&spec, &split_photo(4, 4));
        assert!(matches!(err, Err(SitestampError::Contract(_))));
    }

    #[test]
    fn test_rejects_bad_quality() {
        let err = RasterExporter::new(ExportConfig {
            quality: 0,
            ..Default::default()
        });
        assert!(matches!(err, Err(SitestampError::Configuration(_))));
    }
}
