//! Obstacle-avoiding route computation between two anchors.
//!
//! Strategies run in a fixed order and the first candidate whose segments all
//! clear the buffered obstacle set wins. The perimeter fallback always
//! produces a path, so routing never fails outright.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::Serialize;

use crate::config::DiagramOptions;
use crate::geometry::{segment_intersects_rect, Point, Rect};

/// Cell size of the uniform routing grid.
pub const GRID_CELL_SIZE: f64 = 20.0;
/// Scaled integer step costs so the search can stay in u32.
const AXIS_COST: u32 = 1000;
const DIAGONAL_COST: u32 = 1414;
/// Dot-product threshold above which two directions count as collinear.
const COLLINEAR_DOT: f64 = 0.95;
/// Horizontal offset of a self-reference loop from the table edge.
const SELF_LOOP_OFFSET: f64 = 25.0;

/// Which strategy produced a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteStrategy {
    Direct,
    MarginDetour,
    GridSearch,
    Perimeter,
}

#[derive(Debug, Clone)]
pub struct Route {
    pub waypoints: Vec<Point>,
    pub strategy: RouteStrategy,
}

pub struct Router<'a> {
    options: &'a DiagramOptions,
    canvas_width: f64,
    canvas_height: f64,
}

impl<'a> Router<'a> {
    pub fn new(options: &'a DiagramOptions, canvas_width: f64, canvas_height: f64) -> Self {
        Self {
            options,
            canvas_width,
            canvas_height,
        }
    }

    /// Route from `start` to `end` around `obstacles`. Never fails; the
    /// perimeter fallback covers exhaustion.
    pub fn route(&self, start: Point, end: Point, obstacles: &[Rect]) -> Route {
        if let Some(waypoints) = self.try_direct(start, end, obstacles) {
            return Route {
                waypoints,
                strategy: RouteStrategy::Direct,
            };
        }
        if let Some(waypoints) = self.try_margin_detour(start, end, obstacles) {
            return Route {
                waypoints,
                strategy: RouteStrategy::MarginDetour,
            };
        }
        if let Some(waypoints) = self.try_grid_search(start, end, obstacles) {
            return Route {
                waypoints,
                strategy: RouteStrategy::GridSearch,
            };
        }
        Route {
            waypoints: self.perimeter_fallback(start, end),
            strategy: RouteStrategy::Perimeter,
        }
    }

    fn clearance(&self) -> f64 {
        self.options.collision_buffer + self.options.visual_buffer
    }

    /// Whether every segment of `path` clears every buffered obstacle.
    pub fn is_clear(&self, path: &[Point], obstacles: &[Rect]) -> bool {
        let buffer = self.clearance();
        path.windows(2).all(|segment| {
            obstacles
                .iter()
                .all(|rect| !segment_intersects_rect(&segment[0], &segment[1], rect, buffer))
        })
    }

    /// Two-bend L routes: horizontal-then-vertical, then the transpose.
    fn try_direct(&self, start: Point, end: Point, obstacles: &[Rect]) -> Option<Vec<Point>> {
        let horizontal_first = vec![start, Point::new(end.x, start.y), end];
        let vertical_first = vec![start, Point::new(start.x, end.y), end];
        [horizontal_first, vertical_first]
            .into_iter()
            .find(|candidate| self.is_clear(candidate, obstacles))
            .map(|candidate| simplify_path(&candidate))
    }

    /// Detour through the safe band inside the canvas margin. The band side
    /// follows the quadrants both anchors occupy relative to canvas center;
    /// mixed pairs try the top band, then the bottom.
    fn try_margin_detour(&self, start: Point, end: Point, obstacles: &[Rect]) -> Option<Vec<Point>> {
        let band = self.options.canvas_margin - self.options.safe_zone_offset;
        let center_x = self.canvas_width / 2.0;
        let center_y = self.canvas_height / 2.0;

        let horizontal_band =
            |y: f64| vec![start, Point::new(start.x, y), Point::new(end.x, y), end];
        let vertical_band = |x: f64| vec![start, Point::new(x, start.y), Point::new(x, end.y), end];

        let candidates: Vec<Vec<Point>> = if start.y < center_y && end.y < center_y {
            vec![horizontal_band(band)]
        } else if start.y >= center_y && end.y >= center_y {
            vec![horizontal_band(self.canvas_height - band)]
        } else if start.x < center_x && end.x < center_x {
            vec![vertical_band(band)]
        } else if start.x >= center_x && end.x >= center_x {
            vec![vertical_band(self.canvas_width - band)]
        } else {
            vec![
                horizontal_band(band),
                horizontal_band(self.canvas_height - band),
            ]
        };

        candidates
            .into_iter()
            .find(|candidate| self.is_clear(candidate, obstacles))
            .map(|candidate| simplify_path(&candidate))
    }

    /// Shortest path over a uniform grid with 8-directional steps. Cells
    /// whose center falls inside a buffered obstacle are blocked.
    fn try_grid_search(&self, start: Point, end: Point, obstacles: &[Rect]) -> Option<Vec<Point>> {
        let cols = (self.canvas_width / GRID_CELL_SIZE).ceil() as usize;
        let rows = (self.canvas_height / GRID_CELL_SIZE).ceil() as usize;
        if cols == 0 || rows == 0 {
            return None;
        }

        let buffer = self.clearance();
        let cell_center = |col: usize, row: usize| {
            Point::new(
                (col as f64 + 0.5) * GRID_CELL_SIZE,
                (row as f64 + 0.5) * GRID_CELL_SIZE,
            )
        };
        let blocked: Vec<bool> = (0..rows * cols)
            .map(|index| {
                let center = cell_center(index % cols, index / cols);
                obstacles.iter().any(|rect| rect.expand(buffer).contains(&center))
            })
            .collect();

        let to_cell = |p: Point| {
            let col = ((p.x / GRID_CELL_SIZE).floor() as isize).clamp(0, cols as isize - 1) as usize;
            let row = ((p.y / GRID_CELL_SIZE).floor() as isize).clamp(0, rows as isize - 1) as usize;
            (col, row)
        };
        let (start_col, start_row) = to_cell(start);
        let (end_col, end_row) = to_cell(end);
        let start_index = start_row * cols + start_col;
        let goal_index = end_row * cols + end_col;
        if blocked[start_index] || blocked[goal_index] {
            return None;
        }

        // Min-heap entries ordered by estimated total cost.
        #[derive(Copy, Clone, Eq, PartialEq)]
        struct OpenEntry {
            estimate: u32,
            index: usize,
        }
        impl Ord for OpenEntry {
            fn cmp(&self, other: &Self) -> Ordering {
                other
                    .estimate
                    .cmp(&self.estimate)
                    .then_with(|| other.index.cmp(&self.index))
            }
        }
        impl PartialOrd for OpenEntry {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        let heuristic = |index: usize| -> u32 {
            let col = index % cols;
            let row = index / cols;
            (col.abs_diff(end_col) + row.abs_diff(end_row)) as u32 * AXIS_COST
        };

        const STEPS: [(isize, isize, u32); 8] = [
            (1, 0, AXIS_COST),
            (-1, 0, AXIS_COST),
            (0, 1, AXIS_COST),
            (0, -1, AXIS_COST),
            (1, 1, DIAGONAL_COST),
            (1, -1, DIAGONAL_COST),
            (-1, 1, DIAGONAL_COST),
            (-1, -1, DIAGONAL_COST),
        ];

        let mut best_cost = vec![u32::MAX; rows * cols];
        let mut came_from = vec![usize::MAX; rows * cols];
        let mut open = BinaryHeap::new();
        best_cost[start_index] = 0;
        open.push(OpenEntry {
            estimate: heuristic(start_index),
            index: start_index,
        });

        let mut found = false;
        while let Some(OpenEntry { estimate, index }) = open.pop() {
            if index == goal_index {
                found = true;
                break;
            }
            if estimate > best_cost[index].saturating_add(heuristic(index)) {
                continue; // stale entry
            }
            let col = (index % cols) as isize;
            let row = (index / cols) as isize;
            for &(dc, dr, step_cost) in &STEPS {
                let next_col = col + dc;
                let next_row = row + dr;
                if next_col < 0
                    || next_row < 0
                    || next_col >= cols as isize
                    || next_row >= rows as isize
                {
                    continue;
                }
                let next = next_row as usize * cols + next_col as usize;
                if blocked[next] {
                    continue;
                }
                let tentative = best_cost[index].saturating_add(step_cost);
                if tentative < best_cost[next] {
                    best_cost[next] = tentative;
                    came_from[next] = index;
                    open.push(OpenEntry {
                        estimate: tentative.saturating_add(heuristic(next)),
                        index: next,
                    });
                }
            }
        }
        if !found {
            return None;
        }

        let mut cells = vec![goal_index];
        let mut current = goal_index;
        while current != start_index {
            current = came_from[current];
            if current == usize::MAX {
                return None;
            }
            cells.push(current);
        }
        cells.reverse();

        let mut waypoints = Vec::with_capacity(cells.len() + 2);
        waypoints.push(start);
        for index in cells {
            waypoints.push(cell_center(index % cols, index / cols));
        }
        waypoints.push(end);
        Some(simplify_path(&waypoints))
    }

    /// Fixed route along the top lane and the side lane nearest the
    /// destination. It stays outside the occupied canvas region, so it cannot
    /// cross an in-bounds obstacle even when every other strategy failed.
    fn perimeter_fallback(&self, start: Point, end: Point) -> Vec<Point> {
        let top_y = self.options.routing_spacing_top;
        let side_x = if end.x < self.canvas_width / 2.0 {
            self.options.routing_spacing_side
        } else {
            self.canvas_width - self.options.routing_spacing_side
        };
        simplify_path(&[
            start,
            Point::new(start.x, top_y),
            Point::new(side_x, top_y),
            Point::new(side_x, end.y),
            end,
        ])
    }
}

/// Waypoints for a self-referencing relationship: a loop off the right edge
/// of the table, entering at the source row and arriving at the target row.
pub fn self_loop(rect: &Rect, from_y: f64, to_y: f64) -> Vec<Point> {
    let x = rect.right();
    let loop_x = x + SELF_LOOP_OFFSET;
    let to_y = if (to_y - from_y).abs() < 1.0 {
        from_y + SELF_LOOP_OFFSET
    } else {
        to_y
    };
    vec![
        Point::new(x, from_y),
        Point::new(loop_x, from_y),
        Point::new(loop_x, to_y),
        Point::new(x, to_y),
    ]
}

/// Drop interior waypoints whose incoming and outgoing directions are nearly
/// collinear, along with zero-length segments. Endpoints are preserved.
pub fn simplify_path(points: &[Point]) -> Vec<Point> {
    if points.len() <= 2 {
        return points.to_vec();
    }

    let mut result = vec![points[0]];
    for i in 1..points.len() - 1 {
        let previous = result[result.len() - 1];
        let current = points[i];
        let next = points[i + 1];
        let (Some(incoming), Some(outgoing)) = (unit(previous, current), unit(current, next))
        else {
            continue; // duplicate point
        };
        if incoming.0 * outgoing.0 + incoming.1 * outgoing.1 > COLLINEAR_DOT {
            continue;
        }
        result.push(current);
    }
    result.push(points[points.len() - 1]);
    result
}

fn unit(a: Point, b: Point) -> Option<(f64, f64)> {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let length = (dx * dx + dy * dy).sqrt();
    if length < 1e-9 {
        None
    } else {
        Some((dx / length, dy / length))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router_fixture(options: &DiagramOptions) -> Router<'_> {
        Router::new(options, 400.0, 300.0)
    }

    #[test]
    fn test_unobstructed_route_is_direct() {
        let options = DiagramOptions::default();
        let router = router_fixture(&options);
        let start = Point::new(50.0, 150.0);
        let end = Point::new(350.0, 150.0);

        let route = router.route(start, end, &[]);
        assert_eq!(route.strategy, RouteStrategy::Direct);
        // Aligned anchors collapse to a single horizontal segment.
        assert_eq!(route.waypoints, vec![start, end]);
    }

    #[test]
    fn test_direct_l_route_keeps_one_bend() {
        let options = DiagramOptions::default();
        let router = router_fixture(&options);
        let start = Point::new(50.0, 100.0);
        let end = Point::new(350.0, 200.0);

        let route = router.route(start, end, &[]);
        assert_eq!(route.strategy, RouteStrategy::Direct);
        assert_eq!(route.waypoints.len(), 3);
        assert_eq!(route.waypoints[1], Point::new(end.x, start.y));
    }

    #[test]
    fn test_obstacle_between_forces_detour() {
        let options = DiagramOptions::default();
        let router = router_fixture(&options);
        let start = Point::new(50.0, 150.0);
        let end = Point::new(350.0, 150.0);
        // A table directly between the anchors.
        let wall = Rect::new(180.0, 100.0, 40.0, 100.0);

        let route = router.route(start, end, &[wall]);
        assert_ne!(route.strategy, RouteStrategy::Direct);
        assert!(route.waypoints.len() >= 2);
        assert_eq!(route.waypoints[0], start);
        assert_eq!(*route.waypoints.last().unwrap(), end);
        assert!(router.is_clear(&route.waypoints, &[wall]));
    }

    #[test]
    fn test_tall_obstacle_falls_through_to_grid_search() {
        let options = DiagramOptions::default();
        let router = router_fixture(&options);
        let start = Point::new(50.0, 150.0);
        let end = Point::new(350.0, 150.0);
        // Tall enough to cut both margin bands, but the top grid row stays open.
        let wall = Rect::new(180.0, 30.0, 40.0, 260.0);

        let route = router.route(start, end, &[wall]);
        assert_eq!(route.strategy, RouteStrategy::GridSearch);
        assert_eq!(route.waypoints[0], start);
        assert_eq!(*route.waypoints.last().unwrap(), end);
        assert!(router.is_clear(&route.waypoints, &[wall]));
    }

    #[test]
    fn test_full_wall_falls_back_to_perimeter() {
        let options = DiagramOptions::default();
        let router = router_fixture(&options);
        let start = Point::new(50.0, 150.0);
        let end = Point::new(350.0, 150.0);
        let wall = Rect::new(180.0, 0.0, 40.0, 300.0);

        let route = router.route(start, end, &[wall]);
        assert_eq!(route.strategy, RouteStrategy::Perimeter);
        assert!(route.waypoints.len() >= 2);
        assert_eq!(route.waypoints[0], start);
        assert_eq!(*route.waypoints.last().unwrap(), end);
    }

    #[test]
    fn test_blocked_endpoint_cell_reaches_perimeter() {
        let options = DiagramOptions::default();
        let router = router_fixture(&options);
        // Start sits inside a buffered obstacle: every strategy is rejected.
        let start = Point::new(200.0, 150.0);
        let end = Point::new(350.0, 150.0);
        let wall = Rect::new(150.0, 100.0, 100.0, 100.0);

        let route = router.route(start, end, &[wall]);
        assert_eq!(route.strategy, RouteStrategy::Perimeter);
    }

    #[test]
    fn test_simplify_drops_collinear_points() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(50.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 80.0),
        ];
        let simplified = simplify_path(&points);
        assert_eq!(
            simplified,
            vec![
                Point::new(0.0, 0.0),
                Point::new(100.0, 0.0),
                Point::new(100.0, 80.0),
            ]
        );
    }

    #[test]
    fn test_simplify_drops_duplicate_points() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(40.0, 0.0),
            Point::new(40.0, 40.0),
        ];
        let simplified = simplify_path(&points);
        assert_eq!(
            simplified,
            vec![
                Point::new(0.0, 0.0),
                Point::new(40.0, 0.0),
                Point::new(40.0, 40.0),
            ]
        );
    }

    #[test]
    fn test_simplify_is_idempotent() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(20.0, 1.0),
            Point::new(20.0, 50.0),
            Point::new(60.0, 50.0),
        ];
        let once = simplify_path(&points);
        let twice = simplify_path(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_self_loop_shape() {
        let rect = Rect::new(100.0, 100.0, 160.0, 80.0);
        let loop_points = self_loop(&rect, 120.0, 150.0);
        assert_eq!(loop_points.len(), 4);
        assert_eq!(loop_points[0], Point::new(rect.right(), 120.0));
        assert_eq!(loop_points[3], Point::new(rect.right(), 150.0));
        assert!(loop_points[1].x > rect.right());
    }
}
