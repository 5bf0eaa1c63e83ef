//! Connection-point selection between two table rectangles.

use serde::Serialize;

use crate::config::DiagramOptions;
use crate::geometry::{Point, Rect};
use crate::schema::Table;

/// Text-baseline nudge applied to column-aligned rows.
const BASELINE_OFFSET: f64 = 2.0;

/// Weight for directly opposing left/right side pairs.
const WEIGHT_OPPOSING: f64 = 0.6;
/// Weight when either side is left or right.
const WEIGHT_HORIZONTAL: f64 = 0.8;
/// Weight for the remaining side pairs.
const WEIGHT_DEFAULT: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

/// Resolved anchor pair for one relationship.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectionPoints {
    /// Routing start, offset outward by the connection margin.
    pub start: Point,
    /// Routing end, offset outward by the connection margin.
    pub end: Point,
    pub from_side: Side,
    pub to_side: Side,
    /// Marker point on the source table boundary itself.
    pub table_edge_start: Point,
    /// Marker point on the target table boundary itself.
    pub table_edge_end: Point,
}

/// Y coordinate of the `index`-th visible column row on `rect`.
pub fn column_row_y(rect: &Rect, index: usize, options: &DiagramOptions) -> f64 {
    rect.y
        + options.table_header_height
        + index as f64 * options.column_row_height
        + options.column_row_height / 2.0
        + BASELINE_OFFSET
}

/// Y coordinate of a named column's row on `rect`. Falls back to the vertical
/// center when the column is unknown or truncated out of the visible subset.
pub fn column_anchor_y(
    rect: &Rect,
    table: &Table,
    column: &str,
    options: &DiagramOptions,
) -> f64 {
    let visible = table.columns.len().min(options.max_columns);
    match table.column_index(column) {
        Some(index) if index < visible => column_row_y(rect, index, options),
        _ => rect.center_y(),
    }
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    side: Side,
    /// Margin-adjusted routing anchor.
    anchor: Point,
    /// The literal point on the table boundary.
    edge: Point,
}

fn candidates(rect: &Rect, column_y: f64, margin: f64) -> [Candidate; 4] {
    [
        Candidate {
            side: Side::Left,
            anchor: Point::new(rect.x - margin, column_y),
            edge: Point::new(rect.x, column_y),
        },
        Candidate {
            side: Side::Right,
            anchor: Point::new(rect.right() + margin, column_y),
            edge: Point::new(rect.right(), column_y),
        },
        Candidate {
            side: Side::Top,
            anchor: Point::new(rect.center_x(), rect.y - margin),
            edge: Point::new(rect.center_x(), rect.y),
        },
        Candidate {
            side: Side::Bottom,
            anchor: Point::new(rect.center_x(), rect.bottom() + margin),
            edge: Point::new(rect.center_x(), rect.bottom()),
        },
    ]
}

fn pair_weight(from: Side, to: Side) -> f64 {
    let is_horizontal = |side: Side| matches!(side, Side::Left | Side::Right);
    if (from == Side::Left && to == Side::Right) || (from == Side::Right && to == Side::Left) {
        WEIGHT_OPPOSING
    } else if is_horizontal(from) || is_horizontal(to) {
        WEIGHT_HORIZONTAL
    } else {
        WEIGHT_DEFAULT
    }
}

/// Pick the side pair minimizing anchor distance weighted by the horizontal
/// preference. Ties keep the earliest combination in left/right/top/bottom
/// order, so resolution is deterministic.
pub fn resolve(
    from_rect: &Rect,
    from_table: &Table,
    from_column: &str,
    to_rect: &Rect,
    to_table: &Table,
    to_column: &str,
    options: &DiagramOptions,
) -> ConnectionPoints {
    let from_y = column_anchor_y(from_rect, from_table, from_column, options);
    let to_y = column_anchor_y(to_rect, to_table, to_column, options);

    let from_candidates = candidates(from_rect, from_y, options.connection_margin);
    let to_candidates = candidates(to_rect, to_y, options.connection_margin);

    let mut best_score = f64::INFINITY;
    let mut best = (from_candidates[0], to_candidates[0]);

    for from in &from_candidates {
        for to in &to_candidates {
            let score = from.anchor.distance_to(&to.anchor) * pair_weight(from.side, to.side);
            if score < best_score {
                best_score = score;
                best = (*from, *to);
            }
        }
    }

    ConnectionPoints {
        start: best.0.anchor,
        end: best.1.anchor,
        from_side: best.0.side,
        to_side: best.1.side,
        table_edge_start: best.0.edge,
        table_edge_end: best.1.edge,
    }
}
