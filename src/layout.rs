//! Layout pipeline: placement, connection points, routing, path generation.

pub mod anchors;
pub mod engine;
pub mod path;
pub mod placement;
pub mod routing;
pub mod types;

pub use anchors::{ConnectionPoints, Side};
pub use engine::DiagramEngine;
pub use path::PathGeometry;
pub use routing::{simplify_path, Route, RouteStrategy, Router};
pub use types::{
    ColumnRow, DebugLayer, Diagram, EdgeLabel, RelationshipFigure, RoutedRelationship,
    TableFigure, UnresolvedRelationship,
};
