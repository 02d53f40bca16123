//! Canonical shape records produced by argument normalization.

use super::geometry::{self, Point};

/// A normalized, drawable geometric entity in logical coordinates.
///
/// Shapes are rebuilt from the queued raw arguments on every repaint and are
/// never stored between frames.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// Single dot
    Point { x: f64, y: f64 },
    /// Half-line starting at (x, y) heading along (dx, dy)
    Ray { x: f64, y: f64, dx: f64, dy: f64 },
    /// Segment, polyline or polygon
    Path {
        points: Vec<Point>,
        /// Closed paths of more than two points paint as filled polygons
        closed: bool,
    },
    /// Rectangle with a rotation in degrees around its center
    Rectangle {
        x: f64,
        y: f64,
        /// Always positive after normalization
        width: f64,
        /// Always positive after normalization
        height: f64,
        rotation: f64,
    },
    /// Axis-aligned ellipse centered on (x, y)
    Ellipse { x: f64, y: f64, rx: f64, ry: f64 },
    /// Text label anchored at (x, y)
    Text { x: f64, y: f64, content: String },
    /// Independently normalized shapes drawn with one color
    Group { shapes: Vec<Shape> },
}

impl Shape {
    /// Short tag used in log output.
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Point { .. } => "point",
            Shape::Ray { .. } => "ray",
            Shape::Path { .. } => "path",
            Shape::Rectangle { .. } => "rectangle",
            Shape::Ellipse { .. } => "ellipse",
            Shape::Text { .. } => "text",
            Shape::Group { .. } => "group",
        }
    }

    /// Vertices the annotation passes work on.
    ///
    /// Only rectangles and paths of at least three points have corners; every
    /// other shape returns `None`.
    pub fn corners(&self) -> Option<Vec<Point>> {
        match self {
            Shape::Rectangle {
                x,
                y,
                width,
                height,
                rotation,
            } => Some(geometry::rect_corners(*x, *y, *width, *height, *rotation).to_vec()),
            Shape::Path { points, .. } if points.len() >= 3 => Some(points.clone()),
            _ => None,
        }
    }

    /// Whether the corner sequence wraps around from the last vertex to the first.
    pub fn is_closed(&self) -> bool {
        match self {
            Shape::Rectangle { .. } => true,
            Shape::Path { points, closed } => *closed && points.len() > 2,
            _ => false,
        }
    }

    /// Sides of an annotatable shape, empty for everything else.
    pub fn edges(&self) -> Vec<(Point, Point)> {
        match self {
            Shape::Rectangle {
                x,
                y,
                width,
                height,
                rotation,
            } => geometry::rect_edges(*x, *y, *width, *height, *rotation).to_vec(),
            Shape::Path { points, closed } if points.len() >= 3 => {
                geometry::path_edges(points, *closed)
            }
            _ => Vec::new(),
        }
    }

    /// Leaf shapes in drawing order, descending into groups.
    pub fn leaves(&self) -> Vec<&Shape> {
        match self {
            Shape::Group { shapes } => shapes.iter().flat_map(Shape::leaves).collect(),
            other => vec![other],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_rectangles_and_polygons_have_corners() {
        assert!(Shape::Point { x: 1.0, y: 2.0 }.corners().is_none());
        let segment = Shape::Path {
            points: vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)],
            closed: false,
        };
        assert!(segment.corners().is_none());
        assert!(segment.edges().is_empty());

        let rect = Shape::Rectangle {
            x: 0.0,
            y: 0.0,
            width: 2.0,
            height: 1.0,
            rotation: 0.0,
        };
        assert_eq!(rect.corners().map(|c| c.len()), Some(4));
        assert_eq!(rect.edges().len(), 4);
        assert!(rect.is_closed());
    }

    #[test]
    fn open_polyline_has_no_wrapping_edge() {
        let path = Shape::Path {
            points: vec![
                Point::new(0.0, 0.0),
                Point::new(1.0, 0.0),
                Point::new(1.0, 1.0),
            ],
            closed: false,
        };
        assert!(!path.is_closed());
        assert_eq!(path.edges().len(), 2);
    }

    #[test]
    fn leaves_flatten_nested_groups() {
        let group = Shape::Group {
            shapes: vec![
                Shape::Point { x: 0.0, y: 0.0 },
                Shape::Group {
                    shapes: vec![Shape::Ellipse {
                        x: 1.0,
                        y: 1.0,
                        rx: 2.0,
                        ry: 2.0,
                    }],
                },
            ],
        };
        let kinds: Vec<_> = group.leaves().iter().map(|s| s.kind()).collect();
        assert_eq!(kinds, ["point", "ellipse"]);
    }
}
