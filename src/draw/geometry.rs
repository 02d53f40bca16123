//! Plane geometry helpers shared by the renderer and the annotation passes.
//!
//! Everything here is a pure function over [`Point`]; nothing holds state.

use std::f64::consts::PI;

/// A point (or vector) in logical overlay space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

pub fn deg_to_rad(deg: f64) -> f64 {
    deg * PI / 180.0
}

pub fn rad_to_deg(rad: f64) -> f64 {
    rad * 180.0 / PI
}

pub fn distance_squared(a: Point, b: Point) -> f64 {
    let x = a.x - b.x;
    let y = a.y - b.y;
    x * x + y * y
}

pub fn distance(a: Point, b: Point) -> f64 {
    distance_squared(a, b).sqrt()
}

/// Interior angle at `b` formed by the segments `a-b` and `b-c`, in radians.
///
/// Uses the law of cosines. Degenerate corners (a zero-length side) yield `NaN`.
pub fn corner_angle(a: Point, b: Point, c: Point) -> f64 {
    let ab = distance(a, b);
    let bc = distance(b, c);
    let ac = distance(a, c);
    let cos = (bc * bc + ab * ab - ac * ac) / (2.0 * bc * ab);
    // Rounding can push collinear corners just outside acos' domain.
    cos.clamp(-1.0, 1.0).acos()
}

/// Polar angle of a vector, in radians.
pub fn polar_angle(v: Point) -> f64 {
    v.y.atan2(v.x)
}

/// Direction angle of the segment from `a` to `b`, in radians.
pub fn angle_between(a: Point, b: Point) -> f64 {
    (b.y - a.y).atan2(b.x - a.x)
}

/// Unit vector in the direction of `v`; the zero vector stays zero.
pub fn normalize(v: Point) -> Point {
    let length = (v.x * v.x + v.y * v.y).sqrt();
    if length == 0.0 {
        return Point::ZERO;
    }
    Point::new(v.x / length, v.y / length)
}

pub fn scale(v: Point, factor: f64) -> Point {
    Point::new(v.x * factor, v.y * factor)
}

/// Rotates `point` by `radians` around `pivot`.
pub fn rotate_about(point: Point, radians: f64, pivot: Point) -> Point {
    let (sin, cos) = radians.sin_cos();
    let tx = point.x - pivot.x;
    let ty = point.y - pivot.y;
    Point::new(pivot.x + cos * tx - sin * ty, pivot.y + sin * tx + cos * ty)
}

/// Arithmetic mean of a point sequence, `None` when empty.
pub fn centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let (x, y) = points
        .iter()
        .fold((0.0, 0.0), |(x, y), p| (x + p.x, y + p.y));
    let n = points.len() as f64;
    Some(Point::new(x / n, y / n))
}

pub fn midpoint(a: Point, b: Point) -> Point {
    Point::new((a.x + b.x) * 0.5, (a.y + b.y) * 0.5)
}

/// Corners of a rectangle in the order top-left, top-right, bottom-right, bottom-left.
///
/// `rotation` is in degrees and turns the rectangle around its center.
pub fn rect_corners(x: f64, y: f64, width: f64, height: f64, rotation: f64) -> [Point; 4] {
    let pivot = Point::new(x + width * 0.5, y + height * 0.5);
    let radians = deg_to_rad(rotation);
    [
        Point::new(x, y),
        Point::new(x + width, y),
        Point::new(x + width, y + height),
        Point::new(x, y + height),
    ]
    .map(|corner| rotate_about(corner, radians, pivot))
}

/// The four sides of a rectangle, following [`rect_corners`] order.
pub fn rect_edges(x: f64, y: f64, width: f64, height: f64, rotation: f64) -> [(Point, Point); 4] {
    let [lt, rt, rb, lb] = rect_corners(x, y, width, height, rotation);
    [(lt, rt), (rt, rb), (rb, lb), (lb, lt)]
}

/// Consecutive segments of a path, plus the closing segment when `closed`.
pub fn path_edges(points: &[Point], closed: bool) -> Vec<(Point, Point)> {
    let mut edges: Vec<(Point, Point)> = points.windows(2).map(|w| (w[0], w[1])).collect();
    if closed && points.len() > 2 {
        edges.push((points[points.len() - 1], points[0]));
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS
    }

    #[test]
    fn rect_corners_without_rotation_follow_edges() {
        let corners = rect_corners(10.0, 20.0, 30.0, 40.0, 0.0);
        assert_eq!(
            corners,
            [
                Point::new(10.0, 20.0),
                Point::new(40.0, 20.0),
                Point::new(40.0, 60.0),
                Point::new(10.0, 60.0),
            ]
        );
    }

    #[test]
    fn full_turn_matches_unrotated_corners() {
        let base = rect_corners(-5.0, 3.0, 12.5, 7.0, 0.0);
        let turned = rect_corners(-5.0, 3.0, 12.5, 7.0, 360.0);
        for (a, b) in base.iter().zip(turned.iter()) {
            assert!(close(*a, *b), "{a:?} != {b:?}");
        }
    }

    #[test]
    fn quarter_turn_keeps_center() {
        let corners = rect_corners(0.0, 0.0, 4.0, 2.0, 90.0);
        let center = centroid(&corners).unwrap();
        assert!(close(center, Point::new(2.0, 1.0)));
        assert!(close(corners[0], Point::new(3.0, -1.0)));
    }

    #[test]
    fn right_angle_from_law_of_cosines() {
        let angle = corner_angle(
            Point::new(0.0, 1.0),
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
        );
        assert!((rad_to_deg(angle) - 90.0).abs() < EPS);
    }

    #[test]
    fn collinear_corner_is_straight() {
        let angle = corner_angle(
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(2.0, 0.0),
        );
        assert!((rad_to_deg(angle) - 180.0).abs() < 1e-6);
    }

    #[test]
    fn normalize_handles_zero_vector() {
        assert_eq!(normalize(Point::ZERO), Point::ZERO);
        let unit = normalize(Point::new(3.0, 4.0));
        assert!(close(unit, Point::new(0.6, 0.8)));
    }

    #[test]
    fn path_edges_wrap_only_when_closed() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
        ];
        assert_eq!(path_edges(&points, false).len(), 2);
        let closed = path_edges(&points, true);
        assert_eq!(closed.len(), 3);
        assert_eq!(closed[2], (points[2], points[0]));
    }

    #[test]
    fn angles_and_distances() {
        assert_eq!(distance(Point::new(0.0, 0.0), Point::new(3.0, 4.0)), 5.0);
        assert_eq!(distance_squared(Point::new(1.0, 1.0), Point::new(2.0, 3.0)), 5.0);
        assert!((polar_angle(Point::new(0.0, 1.0)) - PI / 2.0).abs() < EPS);
        assert!((angle_between(Point::new(1.0, 1.0), Point::new(0.0, 1.0)) - PI).abs() < EPS);
        assert!(centroid(&[]).is_none());
    }
}
