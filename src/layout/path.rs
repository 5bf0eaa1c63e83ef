//! Smooth curve generation from routed waypoints.

use std::fmt::Write;

use serde::Serialize;

use crate::geometry::Point;

/// Upper bound on the rounded-corner radius.
const MAX_CORNER_RADIUS: f64 = 15.0;
/// Length of each arrowhead stroke.
const ARROW_LENGTH: f64 = 10.0;
/// Arrowhead stroke angle off the incoming direction, in radians.
const ARROW_ANGLE: f64 = 30.0 * std::f64::consts::PI / 180.0;

/// Curve description ready for vector rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathGeometry {
    /// SVG-style path data for the connector line.
    pub data: String,
    /// Two short strokes forming the terminal arrowhead.
    pub arrow_head: Vec<[Point; 2]>,
}

/// Convert waypoints into a rounded path with a terminal arrowhead.
/// Fewer than two points renders nothing.
pub fn render_path(waypoints: &[Point]) -> Option<PathGeometry> {
    if waypoints.len() < 2 {
        return None;
    }

    let mut data = String::new();
    write!(&mut data, "M {} {}", waypoints[0].x, waypoints[0].y).unwrap();

    for i in 1..waypoints.len() - 1 {
        let previous = waypoints[i - 1];
        let current = waypoints[i];
        let next = waypoints[i + 1];
        let incoming_length = previous.distance_to(&current);
        let outgoing_length = current.distance_to(&next);

        // Clamp so the curve control points never overrun either segment.
        let radius = MAX_CORNER_RADIUS
            .min(incoming_length / 2.0)
            .min(outgoing_length / 2.0);
        if radius < 1e-9 {
            write!(&mut data, " L {} {}", current.x, current.y).unwrap();
            continue;
        }

        let entry = Point::new(
            current.x - (current.x - previous.x) / incoming_length * radius,
            current.y - (current.y - previous.y) / incoming_length * radius,
        );
        let exit = Point::new(
            current.x + (next.x - current.x) / outgoing_length * radius,
            current.y + (next.y - current.y) / outgoing_length * radius,
        );
        write!(
            &mut data,
            " L {} {} Q {} {} {} {}",
            entry.x, entry.y, current.x, current.y, exit.x, exit.y
        )
        .unwrap();
    }

    let last = waypoints[waypoints.len() - 1];
    write!(&mut data, " L {} {}", last.x, last.y).unwrap();

    Some(PathGeometry {
        data,
        arrow_head: arrowhead_strokes(waypoints),
    })
}

/// Two strokes angled off the incoming direction at the final waypoint.
fn arrowhead_strokes(waypoints: &[Point]) -> Vec<[Point; 2]> {
    let tip = waypoints[waypoints.len() - 1];
    // Last point that actually gives the arrival direction.
    let Some(from) = waypoints[..waypoints.len() - 1]
        .iter()
        .rev()
        .find(|p| p.distance_to(&tip) > 1e-9)
    else {
        return Vec::new();
    };

    let back_angle = (from.y - tip.y).atan2(from.x - tip.x);
    [-ARROW_ANGLE, ARROW_ANGLE]
        .iter()
        .map(|offset| {
            let angle = back_angle + offset;
            [
                tip,
                Point::new(
                    tip.x + ARROW_LENGTH * angle.cos(),
                    tip.y + ARROW_LENGTH * angle.sin(),
                ),
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_input_renders_nothing() {
        assert!(render_path(&[]).is_none());
        assert!(render_path(&[Point::new(1.0, 2.0)]).is_none());
    }

    #[test]
    fn test_straight_segment_has_no_curve() {
        let geometry = render_path(&[Point::new(0.0, 0.0), Point::new(100.0, 0.0)]).unwrap();
        assert_eq!(geometry.data, "M 0 0 L 100 0");
        assert_eq!(geometry.arrow_head.len(), 2);
    }

    #[test]
    fn test_corner_emits_quadratic() {
        let geometry = render_path(&[
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 80.0),
        ])
        .unwrap();
        assert!(geometry.data.starts_with("M 0 0"));
        assert!(geometry.data.contains(" Q 100 0 "));
        // The curve enters the corner a radius early and exits a radius late.
        assert!(geometry.data.contains(" L 85 0"));
        assert!(geometry.data.contains("100 15"));
        assert!(geometry.data.ends_with("L 100 80"));
    }

    #[test]
    fn test_radius_clamped_on_short_segments() {
        let geometry = render_path(&[
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 60.0),
        ])
        .unwrap();
        // Radius is half the 10-unit incoming segment, not the 15 maximum.
        assert!(geometry.data.contains(" L 5 0"));
        assert!(geometry.data.contains("10 5"));
    }

    #[test]
    fn test_arrowhead_points_backwards() {
        let geometry = render_path(&[Point::new(0.0, 0.0), Point::new(100.0, 0.0)]).unwrap();
        for stroke in &geometry.arrow_head {
            assert_eq!(stroke[0], Point::new(100.0, 0.0));
            // Strokes trail behind the tip, one above and one below the line.
            assert!(stroke[1].x < 100.0);
        }
        let ys: Vec<f64> = geometry.arrow_head.iter().map(|s| s[1].y).collect();
        assert!(ys[0] * ys[1] < 0.0);
    }

    #[test]
    fn test_duplicate_tail_still_finds_direction() {
        let geometry = render_path(&[
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 0.0),
        ])
        .unwrap();
        assert_eq!(geometry.arrow_head.len(), 2);
    }
}
