//! Grid placement of tables and canvas bounds.

use std::collections::HashMap;

use crate::config::DiagramOptions;
use crate::geometry::{Point, Rect};
use crate::measure::SizeCache;
use crate::schema::Table;

/// Number of grid columns used for `count` tables.
pub fn columns_per_row(count: usize) -> usize {
    ((count as f64 * 1.2).sqrt().ceil() as usize).max(1)
}

/// Assign every table a top-left position, packing input order into rows.
///
/// Horizontal advance uses the widest table seen so far in the row, and the
/// row advance its tallest member, so one oversized table widens every later
/// cell in its row. Predictable O(n) over optimal packing, on purpose: this
/// is a documentation aid, not a bin packer.
pub fn place_tables(
    tables: &[Table],
    sizes: &mut SizeCache,
    options: &DiagramOptions,
) -> HashMap<String, Point> {
    let per_row = columns_per_row(tables.len());
    let mut positions = HashMap::with_capacity(tables.len());

    let mut x = options.canvas_margin;
    let mut y = options.canvas_margin;
    let mut row_max_width: f64 = 0.0;
    let mut row_max_height: f64 = 0.0;

    for (i, table) in tables.iter().enumerate() {
        if i > 0 && i % per_row == 0 {
            y += row_max_height + options.table_padding;
            x = options.canvas_margin;
            row_max_width = 0.0;
            row_max_height = 0.0;
        }

        let size = sizes.get_or_compute(table, options);
        positions.insert(table.name.clone(), Point::new(x, y));

        row_max_width = row_max_width.max(size.width);
        row_max_height = row_max_height.max(size.height);
        x += row_max_width + options.table_padding;
    }

    positions
}

/// Bounding rectangles for placed tables, keyed by table name.
pub fn table_rects(
    tables: &[Table],
    positions: &HashMap<String, Point>,
    sizes: &mut SizeCache,
    options: &DiagramOptions,
) -> HashMap<String, Rect> {
    let mut rects = HashMap::with_capacity(tables.len());
    for table in tables {
        let Some(position) = positions.get(&table.name) else {
            continue;
        };
        let size = sizes.get_or_compute(table, options);
        rects.insert(
            table.name.clone(),
            Rect::new(position.x, position.y, size.width, size.height),
        );
    }
    rects
}

/// Canvas dimensions covering every rectangle plus the margin on all sides.
pub fn canvas_bounds<'a>(
    rects: impl Iterator<Item = &'a Rect>,
    options: &DiagramOptions,
) -> (f64, f64) {
    let mut max_right: f64 = 0.0;
    let mut max_bottom: f64 = 0.0;
    for rect in rects {
        max_right = max_right.max(rect.right());
        max_bottom = max_bottom.max(rect.bottom());
    }
    (
        max_right + options.canvas_margin,
        max_bottom + options.canvas_margin,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Column;

    fn tables(count: usize) -> Vec<Table> {
        (0..count)
            .map(|i| {
                Table::new(
                    format!("table_{}", i),
                    vec![Column::new("id", "INTEGER", false)],
                    [],
                    vec![],
                )
                .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_columns_per_row() {
        assert_eq!(columns_per_row(0), 1);
        assert_eq!(columns_per_row(1), 2);
        assert_eq!(columns_per_row(2), 2);
        assert_eq!(columns_per_row(5), 3);
        assert_eq!(columns_per_row(12), 4);
    }

    #[test]
    fn test_rows_wrap() {
        let options = DiagramOptions::default();
        let tables = tables(5);
        let mut sizes = SizeCache::default();
        let positions = place_tables(&tables, &mut sizes, &options);

        // 5 tables wrap after 3 columns: two rows.
        assert_eq!(positions["table_0"].y, options.canvas_margin);
        assert_eq!(positions["table_1"].y, options.canvas_margin);
        assert_eq!(positions["table_2"].y, options.canvas_margin);
        assert!(positions["table_3"].y > options.canvas_margin);
        assert_eq!(positions["table_3"].y, positions["table_4"].y);
        assert_eq!(positions["table_3"].x, options.canvas_margin);
    }

    #[test]
    fn test_positions_start_at_margin_and_advance() {
        let options = DiagramOptions::default();
        let tables = tables(2);
        let mut sizes = SizeCache::default();
        let positions = place_tables(&tables, &mut sizes, &options);

        let first = positions["table_0"];
        let second = positions["table_1"];
        assert_eq!(first.x, options.canvas_margin);
        assert_eq!(first.y, options.canvas_margin);
        assert!(second.x > first.x);
        assert_eq!(second.y, first.y);
    }

    #[test]
    fn test_canvas_bounds_cover_all_rects() {
        let options = DiagramOptions::default();
        let tables = tables(7);
        let mut sizes = SizeCache::default();
        let positions = place_tables(&tables, &mut sizes, &options);
        let rects = table_rects(&tables, &positions, &mut sizes, &options);
        let (width, height) = canvas_bounds(rects.values(), &options);

        for rect in rects.values() {
            assert!(rect.right() + options.canvas_margin <= width + 1e-9);
            assert!(rect.bottom() + options.canvas_margin <= height + 1e-9);
        }
    }

    #[test]
    fn test_placement_is_deterministic() {
        let options = DiagramOptions::default();
        let tables = tables(9);
        let mut sizes_a = SizeCache::default();
        let mut sizes_b = SizeCache::default();
        let a = place_tables(&tables, &mut sizes_a, &options);
        let b = place_tables(&tables, &mut sizes_b, &options);
        assert_eq!(a, b);
    }
}
