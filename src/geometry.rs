//! Geometry primitives shared by placement, routing, and path generation.

use serde::{Deserialize, Serialize};

const EPSILON: f64 = 1e-9;

/// A point in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// An axis-aligned rectangle in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    pub fn center(&self) -> Point {
        Point::new(self.center_x(), self.center_y())
    }

    /// Grow the rectangle by `by` units on every side.
    pub fn expand(&self, by: f64) -> Rect {
        Rect::new(
            self.x - by,
            self.y - by,
            self.width + by * 2.0,
            self.height + by * 2.0,
        )
    }

    pub fn contains(&self, p: &Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }
}

/// Signed area of the triangle (a, b, c); zero when collinear.
fn orientation(a: &Point, b: &Point, c: &Point) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Whether `p` lies within the bounding box of segment (a, b).
/// Only meaningful once `p` is known to be collinear with the segment.
fn on_segment(a: &Point, b: &Point, p: &Point) -> bool {
    p.x >= a.x.min(b.x) - EPSILON
        && p.x <= a.x.max(b.x) + EPSILON
        && p.y >= a.y.min(b.y) - EPSILON
        && p.y <= a.y.max(b.y) + EPSILON
}

/// Whether segments (a, b) and (c, d) intersect, including collinear overlap.
pub fn segments_intersect(a: &Point, b: &Point, c: &Point, d: &Point) -> bool {
    let d1 = orientation(c, d, a);
    let d2 = orientation(c, d, b);
    let d3 = orientation(a, b, c);
    let d4 = orientation(a, b, d);

    if ((d1 > EPSILON && d2 < -EPSILON) || (d1 < -EPSILON && d2 > EPSILON))
        && ((d3 > EPSILON && d4 < -EPSILON) || (d3 < -EPSILON && d4 > EPSILON))
    {
        return true;
    }

    (d1.abs() <= EPSILON && on_segment(c, d, a))
        || (d2.abs() <= EPSILON && on_segment(c, d, b))
        || (d3.abs() <= EPSILON && on_segment(a, b, c))
        || (d4.abs() <= EPSILON && on_segment(a, b, d))
}

/// Whether segment (a, b) touches `rect` expanded by `buffer` on every side.
pub fn segment_intersects_rect(a: &Point, b: &Point, rect: &Rect, buffer: f64) -> bool {
    let r = rect.expand(buffer);

    if r.contains(a) || r.contains(b) {
        return true;
    }

    let top_left = Point::new(r.x, r.y);
    let top_right = Point::new(r.right(), r.y);
    let bottom_right = Point::new(r.right(), r.bottom());
    let bottom_left = Point::new(r.x, r.bottom());

    segments_intersect(a, b, &top_left, &top_right)
        || segments_intersect(a, b, &top_right, &bottom_right)
        || segments_intersect(a, b, &bottom_right, &bottom_left)
        || segments_intersect(a, b, &bottom_left, &top_left)
}

/// Total length of a polyline.
pub fn path_length(points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|pair| pair[0].distance_to(&pair[1]))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(a.distance_to(&b), 5.0);
    }

    #[test]
    fn test_rect_accessors() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(r.right(), 110.0);
        assert_eq!(r.bottom(), 70.0);
        assert_eq!(r.center_x(), 60.0);
        assert_eq!(r.center_y(), 45.0);
    }

    #[test]
    fn test_rect_expand() {
        let r = Rect::new(10.0, 10.0, 20.0, 20.0).expand(5.0);
        assert_eq!(r.x, 5.0);
        assert_eq!(r.y, 5.0);
        assert_eq!(r.width, 30.0);
        assert_eq!(r.height, 30.0);
    }

    #[test]
    fn test_segments_crossing() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 10.0);
        let c = Point::new(0.0, 10.0);
        let d = Point::new(10.0, 0.0);
        assert!(segments_intersect(&a, &b, &c, &d));
    }

    #[test]
    fn test_segments_parallel() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        let c = Point::new(0.0, 5.0);
        let d = Point::new(10.0, 5.0);
        assert!(!segments_intersect(&a, &b, &c, &d));
    }

    #[test]
    fn test_segments_collinear_overlap() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        let c = Point::new(5.0, 0.0);
        let d = Point::new(15.0, 0.0);
        assert!(segments_intersect(&a, &b, &c, &d));
    }

    #[test]
    fn test_segments_collinear_disjoint() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(4.0, 0.0);
        let c = Point::new(5.0, 0.0);
        let d = Point::new(9.0, 0.0);
        assert!(!segments_intersect(&a, &b, &c, &d));
    }

    #[test]
    fn test_segment_rect_pass_through() {
        let rect = Rect::new(40.0, 40.0, 20.0, 20.0);
        let a = Point::new(0.0, 50.0);
        let b = Point::new(100.0, 50.0);
        assert!(segment_intersects_rect(&a, &b, &rect, 0.0));
    }

    #[test]
    fn test_segment_rect_buffer() {
        let rect = Rect::new(40.0, 40.0, 20.0, 20.0);
        let a = Point::new(0.0, 35.0);
        let b = Point::new(100.0, 35.0);
        // Clears the bare rect but not a 10-unit buffer around it.
        assert!(!segment_intersects_rect(&a, &b, &rect, 0.0));
        assert!(segment_intersects_rect(&a, &b, &rect, 10.0));
    }

    #[test]
    fn test_segment_rect_endpoint_inside() {
        let rect = Rect::new(40.0, 40.0, 20.0, 20.0);
        let a = Point::new(50.0, 50.0);
        let b = Point::new(200.0, 200.0);
        assert!(segment_intersects_rect(&a, &b, &rect, 0.0));
    }

    #[test]
    fn test_path_length() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
        ];
        assert_eq!(path_length(&points), 20.0);
        assert_eq!(path_length(&points[..1]), 0.0);
    }
}
