//! Raw call arguments and the split into shape data, options and annotation requests.

use crate::draw::{DrawOptions, Point};
use serde_json::{Map, Value};

/// Derived overlay requested for a drawn shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Annotation {
    /// `•i x, y` next to every vertex
    Coordinates,
    /// `∠i deg` inside every corner
    Angles,
    /// `i↔j len` at every edge midpoint
    Lengths,
}

/// One argument of a draw or setter call, stored verbatim in the queue.
#[derive(Clone, Debug, PartialEq)]
pub enum Arg {
    /// Loose JSON-like value: number, string, array or object
    Value(Value),
    /// Typed options pushed by chain methods
    Options(DrawOptions),
    /// Annotation pass to run after the shape is painted
    Annotate(Annotation),
}

impl Arg {
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Arg::Value(value) => Some(value),
            _ => None,
        }
    }
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Arg::Value(value)
    }
}

impl From<f64> for Arg {
    fn from(value: f64) -> Self {
        Arg::Value(Value::from(value))
    }
}

impl From<i32> for Arg {
    fn from(value: i32) -> Self {
        Arg::Value(Value::from(value))
    }
}

impl From<i64> for Arg {
    fn from(value: i64) -> Self {
        Arg::Value(Value::from(value))
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Arg::Value(Value::from(value))
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Arg::Value(Value::from(value))
    }
}

impl From<Point> for Arg {
    fn from(point: Point) -> Self {
        Arg::Value(serde_json::json!({ "x": point.x, "y": point.y }))
    }
}

impl From<DrawOptions> for Arg {
    fn from(options: DrawOptions) -> Self {
        Arg::Options(options)
    }
}

impl From<Annotation> for Arg {
    fn from(annotation: Annotation) -> Self {
        Arg::Annotate(annotation)
    }
}

/// Builds a `Vec<Arg>` from heterogeneous expressions.
///
/// ```
/// use wayhud::hud_args;
/// use serde_json::json;
/// let args = hud_args![10, 20.5, "label", json!({"x": 1, "y": 2})];
/// assert_eq!(args.len(), 4);
/// ```
#[macro_export]
macro_rules! hud_args {
    ($($arg:expr),* $(,)?) => {
        vec![$($crate::hud::Arg::from($arg)),*]
    };
}

/// Object keys that mark an object as a shape description rather than options.
const SHAPE_KEYS: [&str; 12] = [
    "x", "y", "width", "height", "r", "rx", "ry", "text", "dx", "dy", "pageX", "pageY",
];

/// A draw call's arguments sorted by role.
#[derive(Debug, Default)]
pub struct SplitArgs<'a> {
    /// Values that describe the shape, in call order
    pub shapes: Vec<&'a Value>,
    /// All option objects merged left to right
    pub options: DrawOptions,
    pub annotations: Vec<Annotation>,
}

/// Whether `value` is an object with exactly the numeric fields `x` and `y`.
pub fn is_vector(value: &Value) -> bool {
    match value {
        Value::Object(map) => {
            map.len() == 2
                && map.get("x").is_some_and(Value::is_number)
                && map.get("y").is_some_and(Value::is_number)
        }
        _ => false,
    }
}

/// Whether `map` is a non-empty object whose every value is a vector.
pub fn is_vector_map(map: &Map<String, Value>) -> bool {
    !map.is_empty() && map.values().all(is_vector)
}

/// Whether a loose value describes a shape (as opposed to carrying options).
pub fn describes_shape(value: &Value) -> bool {
    match value {
        Value::Number(_) | Value::String(_) | Value::Array(_) => true,
        Value::Object(map) => {
            SHAPE_KEYS.iter().any(|key| map.contains_key(*key)) || is_vector_map(map)
        }
        Value::Null | Value::Bool(_) => false,
    }
}

/// Sorts call arguments: annotation requests, options (merged), shape values.
///
/// Typed options and loose objects that carry no shape field are merged in
/// call order, so a later `color` overrides an earlier one.
pub fn split_arguments(args: &[Arg]) -> SplitArgs<'_> {
    let mut split = SplitArgs::default();
    for arg in args {
        match arg {
            Arg::Annotate(annotation) => split.annotations.push(*annotation),
            Arg::Options(options) => split.options.merge(options.clone()),
            Arg::Value(value) if describes_shape(value) => split.shapes.push(value),
            Arg::Value(Value::Object(map)) => split.options.merge(DrawOptions::from_json(map)),
            Arg::Value(_) => {}
        }
    }
    split
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn split_sorts_by_role() {
        let args = vec![
            Arg::from(10),
            Arg::from(json!({"color": " red "})),
            Arg::from(20),
            Arg::from(Annotation::Angles),
            Arg::from(DrawOptions::open()),
        ];
        let split = split_arguments(&args);
        assert_eq!(split.shapes, [&json!(10), &json!(20)]);
        assert_eq!(split.options.color.as_deref(), Some("red"));
        assert_eq!(split.options.closed, Some(false));
        assert_eq!(split.annotations, [Annotation::Angles]);
    }

    #[test]
    fn objects_with_shape_keys_are_shapes() {
        assert!(describes_shape(&json!({"x": 1, "y": 2})));
        assert!(describes_shape(&json!({"width": 3})));
        assert!(describes_shape(&json!({"pageX": 1, "pageY": 2})));
        assert!(describes_shape(&json!({"a": {"x": 0, "y": 0}, "b": {"x": 1, "y": 1}})));
        assert!(!describes_shape(&json!({"color": "teal"})));
        assert!(!describes_shape(&json!({})));
        assert!(!describes_shape(&Value::Null));
    }

    #[test]
    fn vectors_need_exactly_two_numeric_fields() {
        assert!(is_vector(&json!({"x": 1, "y": 2.5})));
        assert!(!is_vector(&json!({"x": 1, "y": "2"})));
        assert!(!is_vector(&json!({"x": 1, "y": 2, "r": 3})));
    }

    #[test]
    fn later_options_override_earlier_ones() {
        let args = hud_args![
            DrawOptions::with_color("blue"),
            json!({"color": "green", "fontSize": 20})
        ];
        let split = split_arguments(&args);
        assert_eq!(split.options.color.as_deref(), Some("green"));
        assert_eq!(split.options.font_size, Some(20.0));
        assert!(split.shapes.is_empty());
    }
}
