//! Diagram assembly: sizing, placement, routing, figure emission.

use std::collections::HashMap;

use crate::config::DiagramOptions;
use crate::geometry::{path_length, Point, Rect};
use crate::measure::{self, SizeCache};
use crate::schema::{Relationship, Table};

use super::anchors::{self, ConnectionPoints, Side};
use super::path::{render_path, PathGeometry};
use super::placement;
use super::routing::{self, Route, Router, RouteStrategy};
use super::types::{
    ColumnRow, DebugLayer, Diagram, EdgeLabel, RelationshipFigure, RoutedRelationship,
    TableFigure, UnresolvedRelationship,
};

/// Maximum characters of a constraint name kept in an edge label.
const LABEL_MAX_CHARS: usize = 24;
/// Vertical lift of an edge label above the path midpoint.
const LABEL_LIFT: f64 = 4.0;
/// Canvas used when there are no tables to lay out.
const PLACEHOLDER_WIDTH: f64 = 480.0;
const PLACEHOLDER_HEIGHT: f64 = 240.0;

/// Diagram generation pipeline. All intermediate state (sizes, rectangles)
/// is scoped to one `generate` call.
pub struct DiagramEngine {
    options: DiagramOptions,
}

impl Default for DiagramEngine {
    fn default() -> Self {
        Self {
            options: DiagramOptions::default(),
        }
    }
}

impl DiagramEngine {
    pub fn new(options: DiagramOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DiagramOptions {
        &self.options
    }

    /// Produce the full set of draw instructions for one schema. Never
    /// fails: unresolvable relationships degrade to annotated placeholders
    /// and routing always falls back to a valid path.
    pub fn generate(&self, tables: &[Table], relationships: &[Relationship]) -> Diagram {
        if tables.is_empty() {
            return Diagram {
                width: PLACEHOLDER_WIDTH,
                height: PLACEHOLDER_HEIGHT,
                relationships: Vec::new(),
                tables: Vec::new(),
                placeholder: Some("No tables to display".to_string()),
                debug: None,
            };
        }

        let mut sizes = SizeCache::default();
        let positions = placement::place_tables(tables, &mut sizes, &self.options);
        let rects = placement::table_rects(tables, &positions, &mut sizes, &self.options);
        let (width, height) = placement::canvas_bounds(rects.values(), &self.options);

        let table_lookup: HashMap<&str, &Table> =
            tables.iter().map(|t| (t.name.as_str(), t)).collect();
        let router = Router::new(&self.options, width, height);

        let mut debug = self.options.debug_paths.then(DebugLayer::default);
        let relationship_figures = relationships
            .iter()
            .map(|rel| {
                self.relationship_figure(rel, &table_lookup, &rects, &router, debug.as_mut())
            })
            .collect();

        if let Some(layer) = debug.as_mut() {
            let clearance = self.options.collision_buffer + self.options.visual_buffer;
            layer.buffer_zones = rects.values().map(|r| r.expand(clearance)).collect();
        }

        let table_figures = tables
            .iter()
            .map(|table| self.table_figure(table, &rects, &mut sizes))
            .collect();

        Diagram {
            width,
            height,
            relationships: relationship_figures,
            tables: table_figures,
            placeholder: None,
            debug,
        }
    }

    /// Resolve a table by name, falling back to a display-name scan for
    /// schema-qualified references.
    fn resolve_table<'t>(
        &self,
        name: &str,
        table_lookup: &HashMap<&str, &'t Table>,
        rects: &HashMap<String, Rect>,
    ) -> Option<(&'t Table, Rect)> {
        if let (Some(table), Some(rect)) = (table_lookup.get(name), rects.get(name)) {
            return Some((*table, *rect));
        }
        table_lookup
            .values()
            .find(|table| table.label() == name)
            .and_then(|table| rects.get(&table.name).map(|rect| (*table, *rect)))
    }

    fn relationship_figure(
        &self,
        rel: &Relationship,
        table_lookup: &HashMap<&str, &Table>,
        rects: &HashMap<String, Rect>,
        router: &Router<'_>,
        debug: Option<&mut DebugLayer>,
    ) -> RelationshipFigure {
        let Some((from_table, from_rect)) = self.resolve_table(&rel.from_table, table_lookup, rects)
        else {
            return unresolved(rel, &rel.from_table);
        };
        let Some((to_table, to_rect)) = self.resolve_table(&rel.to_table, table_lookup, rects)
        else {
            return unresolved(rel, &rel.to_table);
        };

        let (connection, route) = if from_table.name == to_table.name {
            self.self_reference(&from_rect, from_table, rel)
        } else {
            let connection = anchors::resolve(
                &from_rect,
                from_table,
                &rel.from_column,
                &to_rect,
                to_table,
                &rel.to_column,
                &self.options,
            );
            // Everything except the two endpoint tables is an obstacle.
            let obstacles: Vec<Rect> = rects
                .iter()
                .filter(|(name, _)| {
                    name.as_str() != from_table.name.as_str()
                        && name.as_str() != to_table.name.as_str()
                })
                .map(|(_, rect)| *rect)
                .collect();
            let route = router.route(connection.start, connection.end, &obstacles);
            (connection, route)
        };

        let path = render_path(&route.waypoints).unwrap_or(PathGeometry {
            data: String::new(),
            arrow_head: Vec::new(),
        });

        let label = self.options.show_constraints.then(|| EdgeLabel {
            text: truncate_label(&rel.constraint_name),
            position: label_position(&route.waypoints),
        });

        if let Some(layer) = debug {
            layer.waypoint_markers.extend(route.waypoints.iter().copied());
            layer.strategies.push(format!(
                "{} -> {}: {:?}",
                rel.from_table, rel.to_table, route.strategy
            ));
        }

        RelationshipFigure::Routed(RoutedRelationship {
            from_table: from_table.name.clone(),
            to_table: to_table.name.clone(),
            from_side: connection.from_side,
            to_side: connection.to_side,
            waypoints: route.waypoints,
            path,
            start_marker: connection.table_edge_start,
            end_marker: connection.table_edge_end,
            label,
            arity: from_table.relation_kind(&rel.from_column),
            strategy: route.strategy,
        })
    }

    /// A relationship from a table to itself loops off the right edge
    /// between the two column rows.
    fn self_reference(
        &self,
        rect: &Rect,
        table: &Table,
        rel: &Relationship,
    ) -> (ConnectionPoints, Route) {
        let from_y = anchors::column_anchor_y(rect, table, &rel.from_column, &self.options);
        let to_y = anchors::column_anchor_y(rect, table, &rel.to_column, &self.options);
        let waypoints = routing::self_loop(rect, from_y, to_y);
        let connection = ConnectionPoints {
            start: waypoints[0],
            end: waypoints[waypoints.len() - 1],
            from_side: Side::Right,
            to_side: Side::Right,
            table_edge_start: Point::new(rect.right(), from_y),
            table_edge_end: Point::new(rect.right(), to_y),
        };
        (
            connection,
            Route {
                waypoints,
                strategy: RouteStrategy::Direct,
            },
        )
    }

    fn table_figure(
        &self,
        table: &Table,
        rects: &HashMap<String, Rect>,
        sizes: &mut SizeCache,
    ) -> TableFigure {
        let rect = rects[&table.name];
        let size = sizes.get_or_compute(table, &self.options);

        let rows = table
            .columns
            .iter()
            .take(size.visible_columns)
            .enumerate()
            .map(|(index, column)| ColumnRow {
                text: measure::column_line(table, column, &self.options),
                y: anchors::column_row_y(&rect, index, &self.options),
                primary_key: table.is_primary_key(&column.name),
                foreign_key: table.is_foreign_key(&column.name),
            })
            .collect();

        let truncation_note = size
            .truncated
            .then(|| measure::overflow_line(table.columns.len() - size.visible_columns));

        TableFigure {
            name: table.name.clone(),
            title: table.label().to_string(),
            rect,
            header_height: self.options.table_header_height,
            rows,
            truncation_note,
        }
    }
}

fn unresolved(rel: &Relationship, missing: &str) -> RelationshipFigure {
    RelationshipFigure::Unresolved(UnresolvedRelationship {
        from_table: rel.from_table.clone(),
        to_table: rel.to_table.clone(),
        constraint_name: rel.constraint_name.clone(),
        reason: format!("table `{}` not found", missing),
    })
}

fn truncate_label(name: &str) -> String {
    if name.chars().count() <= LABEL_MAX_CHARS {
        name.to_string()
    } else {
        let head: String = name.chars().take(LABEL_MAX_CHARS - 1).collect();
        format!("{}…", head)
    }
}

/// Label anchor at the path's arc-length midpoint, lifted off the line.
fn label_position(waypoints: &[Point]) -> Point {
    let total = path_length(waypoints);
    if waypoints.len() < 2 || total < 1e-9 {
        return waypoints.first().copied().unwrap_or(Point::new(0.0, 0.0));
    }

    let mut remaining = total / 2.0;
    for segment in waypoints.windows(2) {
        let length = segment[0].distance_to(&segment[1]);
        if length >= remaining {
            let t = remaining / length;
            return Point::new(
                segment[0].x + (segment[1].x - segment[0].x) * t,
                segment[0].y + (segment[1].y - segment[0].y) * t - LABEL_LIFT,
            );
        }
        remaining -= length;
    }
    waypoints[waypoints.len() - 1]
}
