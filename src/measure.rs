//! Table sizing from column content and font heuristics.

use std::collections::HashMap;

use unicode_width::UnicodeWidthStr;

use crate::config::DiagramOptions;
use crate::schema::{Column, Table};

/// Average glyph width as a fraction of the font size. This is a display-cell
/// heuristic, not real font metrics; callers may only rely on the estimate
/// being deterministic and monotonic in the text length.
pub const AVG_CHAR_WIDTH: f64 = 0.6;

/// Fixed padding under the last visible column row.
pub const FOOTER_PAD: f64 = 6.0;

/// Computed on-canvas dimensions of one table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableSize {
    pub width: f64,
    pub height: f64,
    pub visible_columns: usize,
    pub truncated: bool,
}

/// Estimated pixel width of `text` at `font_size`.
/// Wide glyphs count as two display cells.
pub fn text_width(text: &str, font_size: f64) -> f64 {
    UnicodeWidthStr::width(text) as f64 * font_size * AVG_CHAR_WIDTH
}

/// One rendered column line: key glyph, name, optional type and nullability.
pub fn column_line(table: &Table, column: &Column, options: &DiagramOptions) -> String {
    let glyph = if table.is_primary_key(&column.name) {
        "◆ "
    } else if table.is_foreign_key(&column.name) {
        "◇ "
    } else {
        "  "
    };
    let mut line = format!("{}{}", glyph, column.name);
    if options.show_data_types {
        line.push_str(" : ");
        line.push_str(&column.data_type);
        if !column.nullable {
            line.push_str(" NOT NULL");
        }
    }
    line
}

/// The synthetic line shown in place of columns beyond `max_columns`.
pub fn overflow_line(hidden: usize) -> String {
    format!("… and {} more columns", hidden)
}

/// Compute a table's dimensions. Width is the widest of the floor, the title,
/// and every visible column line (plus the overflow line when truncated),
/// capped at the configured maximum. Always positive.
pub fn table_size(table: &Table, options: &DiagramOptions) -> TableSize {
    let total = table.columns.len();
    let visible_columns = total.min(options.max_columns);
    let truncated = total > options.max_columns;

    let mut width = text_width(table.label(), options.header_font_size)
        .max(options.min_table_width);
    for column in &table.columns[..visible_columns] {
        width = width.max(text_width(
            &column_line(table, column, options),
            options.font_size,
        ));
    }
    if truncated {
        width = width.max(text_width(
            &overflow_line(total - visible_columns),
            options.font_size,
        ));
    }
    width = width.min(options.max_table_width);

    let mut height =
        options.table_header_height + visible_columns as f64 * options.column_row_height;
    if truncated {
        height += options.column_row_height;
    }
    height += FOOTER_PAD;

    TableSize {
        width,
        height,
        visible_columns,
        truncated,
    }
}

/// Pass-scoped memo of sizing results, keyed by table name. Rebuilt for every
/// generation; never shared across calls.
#[derive(Debug, Default)]
pub struct SizeCache {
    sizes: HashMap<String, TableSize>,
}

impl SizeCache {
    pub fn get_or_compute(&mut self, table: &Table, options: &DiagramOptions) -> TableSize {
        if let Some(size) = self.sizes.get(&table.name) {
            return *size;
        }
        let size = table_size(table, options);
        self.sizes.insert(table.name.clone(), size);
        size
    }
}
