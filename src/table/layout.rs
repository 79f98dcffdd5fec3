//! Two-column table layout.
//!
//! ## Algorithm
//!
//! ```text
//! char = max(measured "가", fontSize)
//! col1 = max(widest field,  MIN_COL1_CHARS × char) + 2 × padX
//! col2 = max(widest value,  MIN_COL2_CHARS × char) + 2 × padX
//! raw  = col1 + col2
//! tableWidth  = clamp(raw, ratioMin × canvas, ratioMax × canvas)
//! rowHeight   = style.rowHeight ?? round(font × 2.2)
//! tableHeight = rows × rowHeight
//! ```
//!
//! Clamping never re-partitions the content widths. When `raw` exceeds the
//! ceiling the layout is flagged `overflowing` and the renderer truncates
//! cell text with an ellipsis.

use serde::{Deserialize, Serialize};

use super::FieldEntry;
use crate::config::TableStyle;
use crate::text::TextMeasure;

/// Minimum width of the field column, in characters.
pub const MIN_COL1_CHARS: usize = 5;
/// Minimum width of the value column, in characters.
pub const MIN_COL2_CHARS: usize = 7;

/// Computed table footprint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableLayout {
    /// Content-driven width of the field column (padding included).
    pub col1_width: f64,
    /// Content-driven width of the value column (padding included).
    pub col2_width: f64,
    pub row_height: f64,
    /// `raw_table_width` clamped to the canvas-relative bounds.
    pub table_width: f64,
    pub table_height: f64,
    /// `col1_width + col2_width` before clamping.
    pub raw_table_width: f64,
    /// `raw_table_width` exceeds the ceiling; cell text must be truncated.
    pub overflowing: bool,
    pub row_count: usize,
    /// Font size the layout was computed with.
    pub font_size: f64,
    /// Smallest width column 1 may be rendered at.
    pub col1_floor: f64,
    /// Smallest width column 2 may be rendered at.
    pub col2_floor: f64,
}

impl TableLayout {
    /// Rendered widths of the two cells. Always sums to `table_width`.
    ///
    /// Column 1 keeps its content width and column 2 takes the rest. If that
    /// would push column 2 under its floor, column 1 gives back width down to
    /// its own floor.
    pub fn cell_widths(&self) -> (f64, f64) {
        let mut col1 = self.col1_width.min(self.table_width);
        let mut col2 = self.table_width - col1;
        if col2 < self.col2_floor {
            let give = (self.col2_floor - col2).min((col1 - self.col1_floor).max(0.0));
            col1 -= give;
            col2 += give;
        }
        (col1, col2)
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }
}

/// Lay out `entries` for a canvas `canvas_width` pixels wide.
///
/// Infallible: a [`TableStyle`] can only exist once its font size, paddings
/// and ratios have been validated.
///
/// ## Example
///
/// ```
/// use sitestamp::config::TableStyle;
/// use sitestamp::table::{FieldEntry, layout_table};
/// use sitestamp::text::Monospace;
///
/// let entries = vec![FieldEntry::new("공사일자", "2024-01-01")];
/// let layout = layout_table(&entries, &TableStyle::default(), 280, &Monospace::default());
///
/// assert_eq!(layout.col1_width, 96.0);
/// assert_eq!(layout.col2_width, 176.0);
/// assert!(layout.overflowing);
/// ```
pub fn layout_table(
    entries: &[FieldEntry],
    style: &TableStyle,
    canvas_width: u32,
    measure: &dyn TextMeasure,
) -> TableLayout {
    let font_size = style.font_size_for(canvas_width);
    let padding = 2.0 * style.cell_padding_x;

    let col1_floor = column_floor(MIN_COL1_CHARS, font_size, measure) + padding;
    let col2_floor = column_floor(MIN_COL2_CHARS, font_size, measure) + padding;

    let widest_field = entries
        .iter()
        .map(|e| measure.text_width(&e.field, font_size))
        .fold(0.0, f64::max);
    let widest_value = entries
        .iter()
        .map(|e| measure.text_width(e.value.trim(), font_size))
        .fold(0.0, f64::max);

    let col1_width = (widest_field + padding).max(col1_floor);
    let col2_width = (widest_value + padding).max(col2_floor);
    let raw_table_width = col1_width + col2_width;

    let floor = style.width_ratio_min * canvas_width as f64;
    let ceiling = style.width_ratio_max * canvas_width as f64;
    let table_width = raw_table_width.clamp(floor, ceiling);
    let overflowing = raw_table_width > ceiling;

    let row_height = style.row_height_for(font_size);
    let row_count = entries.len();
    let table_height = row_count as f64 * row_height;

    if overflowing {
        log::warn!(
            "table content width {} exceeds ceiling {} on a {}px canvas; cells will be truncated",
            raw_table_width,
            ceiling,
            canvas_width
        );
    }
    log::debug!(
        "table layout: {} rows, columns {}+{}, width {} (bounds {}..{}), height {}",
        row_count,
        col1_width,
        col2_width,
        table_width,
        floor,
        ceiling,
        table_height
    );

    TableLayout {
        col1_width,
        col2_width,
        row_height,
        table_width,
        table_height,
        raw_table_width,
        overflowing,
        row_count,
        font_size,
        col1_floor,
        col2_floor,
    }
}

/// Content width of a column floor: `chars` reference glyphs as measured,
/// never less than `chars × font_size`.
fn column_floor(chars: usize, font_size: f64, measure: &dyn TextMeasure) -> f64 {
    let measured = measure.text_width(&"가".repeat(chars), font_size);
    measured.max(chars as f64 * font_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TableStyleConfig;
    use crate::text::Monospace;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    fn mono() -> Monospace {
        Monospace::default()
    }

    #[test]
    fn test_reference_example() {
        let entries = vec![FieldEntry::new("공사일자", "2024-01-01")];
        let layout = layout_table(&entries, &TableStyle::default(), 280, &mono());

        assert_eq!(layout.col1_width, 96.0);
        assert_eq!(layout.col2_width, 176.0);
        assert_eq!(layout.raw_table_width, 272.0);
        assert!(approx(layout.table_width, 266.0));
        assert!(layout.overflowing);
        assert_eq!(layout.row_height, 35.0);
        assert_eq!(layout.table_height, 35.0);
    }

    #[test]
    fn test_empty_entries_hit_floors() {
        let layout = layout_table(&[], &TableStyle::default(), 280, &mono());
        assert_eq!(layout.col1_width, 5.0 * 16.0 + 16.0);
        assert_eq!(layout.col2_width, 7.0 * 16.0 + 16.0);
        assert_eq!(layout.table_height, 0.0);
        assert_eq!(layout.row_count, 0);
        assert!(layout.is_empty());
    }

    #[test]
    fn test_floor_clamp_widens_table() {
        // Floors alone: 96 + 128 = 224 < 0.5 × 600 = 300
        let entries = vec![FieldEntry::new("a", "b")];
        let layout = layout_table(&entries, &TableStyle::default(), 600, &mono());
        assert_eq!(layout.raw_table_width, 224.0);
        assert!(approx(layout.table_width, 300.0));
        assert!(!layout.overflowing);

        let (c1, c2) = layout.cell_widths();
        assert_eq!(c1, 96.0);
        assert!(approx(c2, 204.0));
    }

    #[test]
    fn test_value_is_trimmed() {
        let entries = vec![FieldEntry {
            field: "위치".to_string(),
            value: "   A동   ".to_string(),
        }];
        let layout = layout_table(&entries, &TableStyle::default(), 1000, &mono());
        // "A동" is 2 chars, well under the floor
        assert_eq!(layout.col2_width, 128.0);
    }

    #[test]
    fn test_duplicates_are_separate_rows() {
        let entries = vec![
            FieldEntry::new("비고", "x"),
            FieldEntry::new("비고", "y"),
            FieldEntry::new("비고", "z"),
        ];
        let layout = layout_table(&entries, &TableStyle::default(), 280, &mono());
        assert_eq!(layout.row_count, 3);
        assert_eq!(layout.table_height, 3.0 * layout.row_height);
    }

    #[test]
    fn test_height_scales_with_rows() {
        for rows in [0usize, 1, 20] {
            let entries: Vec<FieldEntry> = (0..rows)
                .map(|i| FieldEntry::new(format!("field{}", i), "value"))
                .collect();
            let layout = layout_table(&entries, &TableStyle::default(), 280, &mono());
            assert_eq!(layout.table_height, rows as f64 * layout.row_height);
        }
    }

    #[test]
    fn test_explicit_row_height() {
        let style = TableStyleConfig {
            row_height: Some(30.0),
            ..Default::default()
        }
        .validate()
        .unwrap();
        let entries = vec![FieldEntry::new("a", "b"), FieldEntry::new("c", "d")];
        let layout = layout_table(&entries, &style, 280, &mono());
        assert_eq!(layout.row_height, 30.0);
        assert_eq!(layout.table_height, 60.0);
    }

    #[test]
    fn test_bounds_hold_for_long_content() {
        let long = "x".repeat(200);
        for canvas in [0u32, 1, 100, 280, 1080] {
            let entries = vec![FieldEntry::new(long.clone(), long.clone())];
            let style = TableStyle::default();
            let layout = layout_table(&entries, &style, canvas, &mono());
            let floor = style.width_ratio_min * canvas as f64;
            let ceiling = style.width_ratio_max * canvas as f64;
            assert!(layout.table_width >= floor - 1e-9);
            assert!(layout.table_width <= ceiling + 1e-9);
            assert!(layout.table_width <= canvas as f64);
        }
    }

    #[test]
    fn test_cell_widths_protect_value_floor() {
        // Long field, short value, narrow ceiling
        let entries = vec![FieldEntry::new("x".repeat(30), "1")];
        let layout = layout_table(&entries, &TableStyle::default(), 400, &mono());
        assert!(layout.overflowing);
        let (c1, c2) = layout.cell_widths();
        assert!(approx(c1 + c2, layout.table_width));
        assert!(c2 >= layout.col2_floor - 1e-9);
        assert!(c1 >= layout.col1_floor - 1e-9);
    }

    #[test]
    fn test_oracle_drives_widths() {
        let narrow = Monospace { advance_ratio: 0.5 };
        let entries = vec![FieldEntry::new("abcdefghij", "v")];
        let layout = layout_table(&entries, &TableStyle::default(), 1000, &narrow);
        // 10 chars × 8px + 16 padding
        assert_eq!(layout.col1_width, 96.0);
        // floors never shrink below chars × font: 7 × 16 + 16
        assert_eq!(layout.col2_width, 128.0);
    }

    #[test]
    fn test_narrow_oracle_keeps_char_floors() {
        use crate::text::BitmapFont;

        // Bitmap cells are half a font size wide; floors still count full chars.
        let entries = vec![FieldEntry::new("공사일자", "2024-01-01")];
        let layout = layout_table(&entries, &TableStyle::default(), 280, &BitmapFont::new());
        assert_eq!(layout.col1_floor, 96.0);
        assert_eq!(layout.col2_floor, 128.0);
        assert_eq!(layout.col1_width, 96.0);
        assert_eq!(layout.col2_width, 128.0);
        assert_eq!(layout.raw_table_width, 224.0);
        assert!(!layout.overflowing);
    }

    #[test]
    fn test_wide_oracle_raises_floors() {
        let wide = Monospace { advance_ratio: 1.5 };
        let layout = layout_table(&[], &TableStyle::default(), 280, &wide);
        // 5 × 24 + 16 and 7 × 24 + 16
        assert_eq!(layout.col1_floor, 136.0);
        assert_eq!(layout.col2_floor, 184.0);
    }

    #[test]
    fn test_font_scale_applies() {
        let style = TableStyleConfig {
            font_scale: Some(crate::config::FontScale {
                reference_width: 560.0,
                min_font_size: 10.0,
            }),
            ..Default::default()
        }
        .validate()
        .unwrap();
        let layout = layout_table(&[], &style, 280, &mono());
        assert_eq!(layout.font_size, 10.0);
        assert_eq!(layout.col1_width, 5.0 * 10.0 + 16.0);
    }

    #[test]
    fn test_deterministic() {
        let entries = vec![FieldEntry::new("현장명", "서울 강남구 테헤란로 427")];
        let a = layout_table(&entries, &TableStyle::default(), 280, &mono());
        let b = layout_table(&entries, &TableStyle::default(), 280, &mono());
        assert_eq!(a, b);
    }
}
