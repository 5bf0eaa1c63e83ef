//! Diagram generation options.
//!
//! Values are taken as given; sanity-checking pathological configurations is
//! the job of the configuration layer that feeds this crate.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DiagramOptions {
    /// Lower clamp on computed table width.
    pub min_table_width: f64,
    /// Upper clamp on computed table width.
    pub max_table_width: f64,
    pub table_header_height: f64,
    pub column_row_height: f64,
    /// Spacing between neighboring tables on the canvas grid.
    pub table_padding: f64,
    /// Empty border kept around the occupied canvas region.
    pub canvas_margin: f64,
    /// Outward offset from a table edge to its routing anchor.
    pub connection_margin: f64,
    /// Obstacle inflation applied during intersection tests.
    pub collision_buffer: f64,
    /// Extra visual clearance added on top of the collision buffer.
    pub visual_buffer: f64,
    /// Distance from the canvas margin to the detour band.
    pub safe_zone_offset: f64,
    /// Y of the top lane used by the perimeter fallback route.
    pub routing_spacing_top: f64,
    /// Inset of the side lane used by the perimeter fallback route.
    pub routing_spacing_side: f64,
    pub font_size: f64,
    pub header_font_size: f64,
    /// Column rows shown before the rest collapse into one overflow line.
    pub max_columns: usize,
    pub show_data_types: bool,
    pub show_constraints: bool,
    /// Emit buffer zones and waypoint markers alongside the figures.
    pub debug_paths: bool,
}

impl Default for DiagramOptions {
    fn default() -> Self {
        Self {
            min_table_width: 160.0,
            max_table_width: 360.0,
            table_header_height: 32.0,
            column_row_height: 22.0,
            table_padding: 48.0,
            canvas_margin: 60.0,
            connection_margin: 12.0,
            collision_buffer: 8.0,
            visual_buffer: 4.0,
            safe_zone_offset: 20.0,
            routing_spacing_top: 30.0,
            routing_spacing_side: 30.0,
            font_size: 12.0,
            header_font_size: 14.0,
            max_columns: 20,
            show_data_types: true,
            show_constraints: true,
            debug_paths: false,
        }
    }
}
