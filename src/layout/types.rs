//! Draw-instruction types emitted by the diagram engine.

use serde::Serialize;

use crate::geometry::{Point, Rect};
use crate::schema::RelationKind;

use super::anchors::Side;
use super::path::PathGeometry;
use super::routing::RouteStrategy;

/// The complete set of draw instructions for one generation pass.
///
/// Relationships are listed before tables: consumers draw in list order, so
/// connector lines end up underneath the table boxes.
#[derive(Debug, Clone, Serialize)]
pub struct Diagram {
    pub width: f64,
    pub height: f64,
    pub relationships: Vec<RelationshipFigure>,
    pub tables: Vec<TableFigure>,
    /// Explanatory message shown instead of a layout when there is nothing
    /// to draw.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<DebugLayer>,
}

/// One table box with its header and visible column rows.
#[derive(Debug, Clone, Serialize)]
pub struct TableFigure {
    pub name: String,
    pub title: String,
    pub rect: Rect,
    pub header_height: f64,
    pub rows: Vec<ColumnRow>,
    /// The `… and N more columns` line, present when rows were cut off.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncation_note: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnRow {
    pub text: String,
    /// Baseline Y in canvas coordinates.
    pub y: f64,
    pub primary_key: bool,
    pub foreign_key: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RelationshipFigure {
    Routed(RoutedRelationship),
    Unresolved(UnresolvedRelationship),
}

#[derive(Debug, Clone, Serialize)]
pub struct RoutedRelationship {
    pub from_table: String,
    pub to_table: String,
    pub from_side: Side,
    pub to_side: Side,
    pub waypoints: Vec<Point>,
    pub path: PathGeometry,
    /// Connection marker on the source table boundary.
    pub start_marker: Point,
    /// Connection marker on the target table boundary.
    pub end_marker: Point,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<EdgeLabel>,
    pub arity: RelationKind,
    pub strategy: RouteStrategy,
}

/// Annotated placeholder for a relationship whose endpoint could not be
/// resolved to a placed table.
#[derive(Debug, Clone, Serialize)]
pub struct UnresolvedRelationship {
    pub from_table: String,
    pub to_table: String,
    pub constraint_name: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EdgeLabel {
    pub text: String,
    pub position: Point,
}

/// Diagnostic overlay emitted when `debug_paths` is set. Pure visualization
/// over the same geometry the router used.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DebugLayer {
    /// Obstacle rectangles inflated by the routing clearance.
    pub buffer_zones: Vec<Rect>,
    pub waypoint_markers: Vec<Point>,
    /// One `from -> to: strategy` line per routed relationship.
    pub strategies: Vec<String>,
}
