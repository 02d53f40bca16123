//! Turns loose call arguments into one canonical [`Shape`].
//!
//! Dispatch is an ordered table of predicate/constructor rules; the first rule
//! whose predicate accepts the argument list decides the shape, and a
//! constructor that cannot build from the data yields no shape at all.

use super::args::{is_vector, is_vector_map};
use crate::draw::{DrawOptions, Point, Shape};
use serde_json::{Map, Value};

struct Rule {
    name: &'static str,
    applies: fn(&[&Value]) -> bool,
    build: fn(&[&Value], &DrawOptions) -> Option<Shape>,
}

const RULES: [Rule; 8] = [
    Rule {
        name: "group",
        applies: is_group,
        build: build_group,
    },
    Rule {
        name: "object",
        applies: is_single_object,
        build: build_object,
    },
    Rule {
        name: "path",
        applies: is_point_list,
        build: build_point_list,
    },
    Rule {
        name: "ray",
        applies: is_single_number,
        build: build_ray,
    },
    Rule {
        name: "text",
        applies: is_text,
        build: build_text,
    },
    Rule {
        name: "rectangle",
        applies: is_rectangle,
        build: build_rectangle,
    },
    Rule {
        name: "circle",
        applies: is_circle,
        build: build_circle,
    },
    Rule {
        name: "point",
        applies: is_point,
        build: build_point,
    },
];

/// Normalizes shape arguments into a shape, or `None` when nothing matches.
pub fn normalize(args: &[&Value], options: &DrawOptions) -> Option<Shape> {
    let rule = RULES.iter().find(|rule| (rule.applies)(args))?;
    (rule.build)(args, options)
}

/// Name of the rule that claims `args`, for diagnostics and tests.
pub fn classify(args: &[&Value]) -> Option<&'static str> {
    RULES
        .iter()
        .find(|rule| (rule.applies)(args))
        .map(|rule| rule.name)
}

// =============================================================================
// Predicates
// =============================================================================

fn is_group(args: &[&Value]) -> bool {
    !args.is_empty() && args.iter().all(|arg| arg.is_array())
}

fn is_single_object(args: &[&Value]) -> bool {
    matches!(args, [Value::Object(_)])
}

fn is_point_list(args: &[&Value]) -> bool {
    args.len() >= 2 && args.iter().all(|arg| is_vector(arg))
}

fn is_single_number(args: &[&Value]) -> bool {
    matches!(args, [Value::Number(_)])
}

fn is_text(args: &[&Value]) -> bool {
    match args.split_first() {
        Some((first, rest)) => first.is_string() && rest.len() <= 2 && is_numbers(rest),
        None => false,
    }
}

fn is_rectangle(args: &[&Value]) -> bool {
    matches!(args.len(), 4 | 5) && is_numbers(args)
}

fn is_circle(args: &[&Value]) -> bool {
    args.len() == 3 && is_numbers(args)
}

fn is_point(args: &[&Value]) -> bool {
    args.len() == 2 && is_numbers(args)
}

fn is_numbers(args: &[&Value]) -> bool {
    args.iter().all(|arg| arg.is_number())
}

// =============================================================================
// Constructors
// =============================================================================

fn build_group(args: &[&Value], options: &DrawOptions) -> Option<Shape> {
    let elements: Vec<&Value> = match args {
        [Value::Array(items)] => items.iter().collect(),
        arrays => arrays.to_vec(),
    };
    let shapes: Vec<Shape> = elements
        .into_iter()
        .filter_map(|element| match element {
            Value::Array(items) => {
                let member_args: Vec<&Value> = items.iter().collect();
                normalize(&member_args, options)
            }
            single => normalize(&[single], options),
        })
        .collect();
    if shapes.is_empty() {
        None
    } else {
        Some(Shape::Group { shapes })
    }
}

fn build_object(args: &[&Value], options: &DrawOptions) -> Option<Shape> {
    let map = args.first()?.as_object()?;
    if is_vector_map(map) {
        let points: Vec<Point> = map.values().filter_map(vector).collect();
        return Some(path(points, options));
    }

    let has = |key: &str| map.contains_key(key);
    if has("width") || has("height") {
        let rotation = number(map, "rotation").unwrap_or(0.0);
        rectangle(
            number(map, "x")?,
            number(map, "y")?,
            number(map, "width"),
            number(map, "height"),
            rotation,
        )
    } else if has("r") || has("rx") || has("ry") {
        let r = number(map, "r");
        ellipse(
            number(map, "x")?,
            number(map, "y")?,
            number(map, "rx").or(r),
            number(map, "ry").or(r),
        )
    } else if has("text") {
        let content = match map.get("text")? {
            Value::String(text) => text.clone(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        Some(Shape::Text {
            x: number(map, "x").unwrap_or(0.0),
            y: number(map, "y").unwrap_or(0.0),
            content,
        })
    } else if has("dx") || has("dy") {
        Some(Shape::Ray {
            x: number(map, "x")?,
            y: number(map, "y")?,
            dx: number(map, "dx").unwrap_or(0.0),
            dy: number(map, "dy").unwrap_or(0.0),
        })
    } else if let (Some(x), Some(y)) = (number(map, "x"), number(map, "y")) {
        Some(Shape::Point { x, y })
    } else {
        Some(Shape::Point {
            x: number(map, "pageX")?,
            y: number(map, "pageY")?,
        })
    }
}

fn build_point_list(args: &[&Value], options: &DrawOptions) -> Option<Shape> {
    let points: Vec<Point> = args.iter().filter_map(|arg| vector(arg)).collect();
    Some(path(points, options))
}

/// Legacy single-number encoding: negative is a horizontal ray at y = |n|,
/// anything else a vertical ray at x = n.
fn build_ray(args: &[&Value], _options: &DrawOptions) -> Option<Shape> {
    let n = args.first()?.as_f64()?;
    if n < 0.0 {
        Some(Shape::Ray {
            x: 0.0,
            y: -n,
            dx: 1.0,
            dy: 0.0,
        })
    } else {
        Some(Shape::Ray {
            x: n,
            y: 0.0,
            dx: 0.0,
            dy: 1.0,
        })
    }
}

fn build_text(args: &[&Value], _options: &DrawOptions) -> Option<Shape> {
    let (first, rest) = args.split_first()?;
    let coordinate = |i: usize| rest.get(i).and_then(|v| v.as_f64()).unwrap_or(0.0);
    Some(Shape::Text {
        x: coordinate(0),
        y: coordinate(1),
        content: first.as_str()?.to_string(),
    })
}

fn build_rectangle(args: &[&Value], _options: &DrawOptions) -> Option<Shape> {
    let n = numbers(args)?;
    rectangle(n[0], n[1], Some(n[2]), Some(n[3]), n.get(4).copied().unwrap_or(0.0))
}

fn build_circle(args: &[&Value], _options: &DrawOptions) -> Option<Shape> {
    let n = numbers(args)?;
    ellipse(n[0], n[1], Some(n[2]), Some(n[2]))
}

fn build_point(args: &[&Value], _options: &DrawOptions) -> Option<Shape> {
    let n = numbers(args)?;
    Some(Shape::Point { x: n[0], y: n[1] })
}

// =============================================================================
// Field helpers
// =============================================================================

fn number(map: &Map<String, Value>, key: &str) -> Option<f64> {
    map.get(key).and_then(Value::as_f64)
}

fn numbers(args: &[&Value]) -> Option<Vec<f64>> {
    args.iter().map(|arg| arg.as_f64()).collect()
}

fn vector(value: &Value) -> Option<Point> {
    let map = value.as_object()?;
    Some(Point::new(number(map, "x")?, number(map, "y")?))
}

fn path(points: Vec<Point>, options: &DrawOptions) -> Shape {
    let closed = points.len() > 2 && options.closes_paths();
    Shape::Path { points, closed }
}

/// Builds a rectangle with positive extents.
///
/// A missing or zero extent copies the other one; a negative extent moves the
/// origin to the opposite edge.
fn rectangle(
    x: f64,
    y: f64,
    width: Option<f64>,
    height: Option<f64>,
    rotation: f64,
) -> Option<Shape> {
    let given = |v: Option<f64>| v.filter(|v| *v != 0.0);
    let (width, height) = match (given(width), given(height)) {
        (Some(w), Some(h)) => (w, h),
        (Some(w), None) => (w, w),
        (None, Some(h)) => (h, h),
        (None, None) => return None,
    };
    let (x, width) = if width < 0.0 { (x + width, -width) } else { (x, width) };
    let (y, height) = if height < 0.0 {
        (y + height, -height)
    } else {
        (y, height)
    };
    Some(Shape::Rectangle {
        x,
        y,
        width,
        height,
        rotation,
    })
}

/// Builds an ellipse; one radius infers the other, zero radii draw nothing.
fn ellipse(x: f64, y: f64, rx: Option<f64>, ry: Option<f64>) -> Option<Shape> {
    let given = |v: Option<f64>| v.map(f64::abs).filter(|v| *v > 0.0);
    let (rx, ry) = match (given(rx), given(ry)) {
        (Some(rx), Some(ry)) => (rx, ry),
        (Some(r), None) | (None, Some(r)) => (r, r),
        (None, None) => return None,
    };
    Some(Shape::Ellipse { x, y, rx, ry })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn norm(values: &[Value]) -> Option<Shape> {
        let args: Vec<&Value> = values.iter().collect();
        normalize(&args, &DrawOptions::default())
    }

    fn rule(values: &[Value]) -> Option<&'static str> {
        let args: Vec<&Value> = values.iter().collect();
        classify(&args)
    }

    #[test]
    fn dispatch_matrix() {
        assert_eq!(rule(&[json!([[0, 0]])]), Some("group"));
        assert_eq!(rule(&[json!([1, 2]), json!([3, 4])]), Some("group"));
        assert_eq!(rule(&[json!({"x": 1, "y": 2})]), Some("object"));
        assert_eq!(
            rule(&[json!({"x": 1, "y": 2}), json!({"x": 3, "y": 4})]),
            Some("path")
        );
        assert_eq!(rule(&[json!(5)]), Some("ray"));
        assert_eq!(rule(&[json!("hi")]), Some("text"));
        assert_eq!(rule(&[json!("hi"), json!(1), json!(2)]), Some("text"));
        assert_eq!(rule(&[json!(1), json!(2), json!(3), json!(4)]), Some("rectangle"));
        assert_eq!(rule(&[json!(1), json!(2), json!(3), json!(4), json!(45)]), Some("rectangle"));
        assert_eq!(rule(&[json!(1), json!(2), json!(3)]), Some("circle"));
        assert_eq!(rule(&[json!(1), json!(2)]), Some("point"));
        assert_eq!(rule(&[json!(1), json!(2), json!(3), json!(4), json!(5), json!(6)]), None);
        assert_eq!(rule(&[json!("hi"), json!(1), json!(2), json!(3)]), None);
        assert_eq!(rule(&[]), None);
    }

    #[test]
    fn four_and_five_numbers_make_rectangles() {
        assert_eq!(
            norm(&[json!(10), json!(20), json!(30), json!(40)]),
            Some(Shape::Rectangle {
                x: 10.0,
                y: 20.0,
                width: 30.0,
                height: 40.0,
                rotation: 0.0
            })
        );
        let rotated = norm(&[json!(0), json!(0), json!(2), json!(2), json!(45)]);
        assert!(matches!(rotated, Some(Shape::Rectangle { rotation, .. }) if rotation == 45.0));
    }

    #[test]
    fn rectangle_extents_default_and_fold() {
        assert_eq!(
            norm(&[json!({"x": 0, "y": 0, "width": 5})]),
            Some(Shape::Rectangle {
                x: 0.0,
                y: 0.0,
                width: 5.0,
                height: 5.0,
                rotation: 0.0
            })
        );
        assert_eq!(
            norm(&[json!(10), json!(10), json!(-4), json!(0)]),
            Some(Shape::Rectangle {
                x: 6.0,
                y: 6.0,
                width: 4.0,
                height: 4.0,
                rotation: 0.0
            })
        );
        assert_eq!(norm(&[json!({"x": 0, "y": 0, "width": 0})]), None);
    }

    #[test]
    fn single_number_ray_encoding() {
        assert_eq!(
            norm(&[json!(-7)]),
            Some(Shape::Ray {
                x: 0.0,
                y: 7.0,
                dx: 1.0,
                dy: 0.0
            })
        );
        assert_eq!(
            norm(&[json!(3)]),
            Some(Shape::Ray {
                x: 3.0,
                y: 0.0,
                dx: 0.0,
                dy: 1.0
            })
        );
        assert_eq!(
            norm(&[json!(0)]),
            Some(Shape::Ray {
                x: 0.0,
                y: 0.0,
                dx: 0.0,
                dy: 1.0
            })
        );
    }

    #[test]
    fn text_defaults_position_to_origin() {
        assert_eq!(
            norm(&[json!("label"), json!(4)]),
            Some(Shape::Text {
                x: 4.0,
                y: 0.0,
                content: "label".into()
            })
        );
        assert_eq!(
            norm(&[json!({"text": 100, "x": 95})]),
            Some(Shape::Text {
                x: 95.0,
                y: 0.0,
                content: "100".into()
            })
        );
    }

    #[test]
    fn ellipse_radii_infer_each_other() {
        assert_eq!(
            norm(&[json!(1), json!(2), json!(-3)]),
            Some(Shape::Ellipse {
                x: 1.0,
                y: 2.0,
                rx: 3.0,
                ry: 3.0
            })
        );
        assert_eq!(
            norm(&[json!({"x": 0, "y": 0, "ry": 4})]),
            Some(Shape::Ellipse {
                x: 0.0,
                y: 0.0,
                rx: 4.0,
                ry: 4.0
            })
        );
        assert_eq!(
            norm(&[json!({"x": 0, "y": 0, "rx": 2, "ry": 6})]),
            Some(Shape::Ellipse {
                x: 0.0,
                y: 0.0,
                rx: 2.0,
                ry: 6.0
            })
        );
        assert_eq!(norm(&[json!(0), json!(0), json!(0)]), None);
    }

    #[test]
    fn vector_object_is_path_in_insertion_order() {
        let shape = norm(&[json!({
            "z": {"x": 0, "y": 0},
            "a": {"x": 10, "y": 0},
            "m": {"x": 10, "y": 10}
        })]);
        assert_eq!(
            shape,
            Some(Shape::Path {
                points: vec![
                    Point::new(0.0, 0.0),
                    Point::new(10.0, 0.0),
                    Point::new(10.0, 10.0)
                ],
                closed: true
            })
        );
    }

    #[test]
    fn two_points_stay_an_open_segment_and_open_marker_is_honored() {
        let a = json!({"x": 0, "y": 0});
        let b = json!({"x": 5, "y": 5});
        let c = json!({"x": 0, "y": 5});
        assert!(matches!(
            norm(&[a.clone(), b.clone()]),
            Some(Shape::Path { closed: false, .. })
        ));
        let args = [&a, &b, &c];
        assert!(matches!(
            normalize(&args, &DrawOptions::open()),
            Some(Shape::Path { closed: false, .. })
        ));
        assert!(matches!(
            normalize(&args, &DrawOptions::default()),
            Some(Shape::Path { closed: true, .. })
        ));
    }

    #[test]
    fn group_elements_normalize_independently() {
        let shape = norm(&[json!([[5, 5], [5, 5, 10], ["#1 5,5", 21, -1], {"x": 1, "y": 1}, [1, 2, 3, 4, 5, 6]])]);
        let Some(Shape::Group { shapes }) = shape else {
            panic!("expected group, got {shape:?}");
        };
        let kinds: Vec<_> = shapes.iter().map(Shape::kind).collect();
        assert_eq!(kinds, ["point", "ellipse", "text", "point"]);
    }

    #[test]
    fn malformed_objects_draw_nothing() {
        assert_eq!(norm(&[json!({"x": 5})]), None);
        assert_eq!(norm(&[json!({"text": null})]), None);
        assert_eq!(norm(&[json!({"width": 3})]), None);
        assert_eq!(norm(&[json!([])]), None);
        assert_eq!(
            norm(&[json!({"pageX": 3, "pageY": 4})]),
            Some(Shape::Point { x: 3.0, y: 4.0 })
        );
    }
}
