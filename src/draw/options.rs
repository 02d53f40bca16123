//! Per-call draw options and text placement hints.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Horizontal anchor of a text run relative to its position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical anchor of a text run relative to its position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextBaseline {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// Options attached to a single draw call.
///
/// Every field is optional; [`DrawOptions::merge`] layers a later set over an
/// earlier one key by key, which is how chained calls accumulate.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawOptions {
    /// Palette name or hex string, stored trimmed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// `Some(false)` keeps a path of more than two points open
    #[serde(default, alias = "closePath", skip_serializing_if = "Option::is_none")]
    pub closed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    /// Enables the background plate behind text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_baseline: Option<TextBaseline>,
}

impl DrawOptions {
    pub fn with_color(color: &str) -> Self {
        Self {
            color: Some(color.trim().to_string()),
            ..Self::default()
        }
    }

    pub fn open() -> Self {
        Self {
            closed: Some(false),
            ..Self::default()
        }
    }

    /// Reads options out of a loose JSON object, ignoring unknown keys.
    ///
    /// A key holding a value of the wrong type is skipped on its own; the rest
    /// of the object still applies.
    pub fn from_json(object: &Map<String, Value>) -> Self {
        let mut options = Self::default();
        for (key, value) in object {
            let mut single = Map::new();
            single.insert(key.clone(), value.clone());
            match serde_json::from_value::<DrawOptions>(Value::Object(single)) {
                Ok(parsed) => options.merge(parsed),
                Err(err) => log::debug!("Ignoring draw option '{}': {}", key, err),
            }
        }
        options
    }

    /// Shallow merge: every field set in `other` overwrites the one in `self`.
    pub fn merge(&mut self, other: DrawOptions) {
        if let Some(color) = other.color {
            self.color = Some(color.trim().to_string());
        }
        if other.closed.is_some() {
            self.closed = other.closed;
        }
        if other.font_size.is_some() {
            self.font_size = other.font_size;
        }
        if other.font_family.is_some() {
            self.font_family = other.font_family;
        }
        if other.background_color.is_some() {
            self.background_color = other.background_color;
        }
        if other.border_color.is_some() {
            self.border_color = other.border_color;
        }
        if other.border_width.is_some() {
            self.border_width = other.border_width;
        }
        if other.padding.is_some() {
            self.padding = other.padding;
        }
        if other.text_align.is_some() {
            self.text_align = other.text_align;
        }
        if other.text_baseline.is_some() {
            self.text_baseline = other.text_baseline;
        }
    }

    /// Whether a path should close into a polygon (default: yes).
    pub fn closes_paths(&self) -> bool {
        self.closed != Some(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn later_keys_win() {
        let mut options = DrawOptions::with_color("red");
        options.merge(DrawOptions::open());
        options.merge(DrawOptions::with_color("  #00ff00 "));
        assert_eq!(options.color.as_deref(), Some("#00ff00"));
        assert_eq!(options.closed, Some(false));
        assert!(!options.closes_paths());
    }

    #[test]
    fn json_objects_accept_legacy_keys() {
        let value = json!({"closePath": false, "fontSize": 14, "textAlign": "center", "bogus": 1});
        let options = DrawOptions::from_json(value.as_object().unwrap());
        assert_eq!(options.closed, Some(false));
        assert_eq!(options.font_size, Some(14.0));
        assert_eq!(options.text_align, Some(TextAlign::Center));
    }

    #[test]
    fn bad_field_does_not_poison_object() {
        let value = json!({"color": 7, "padding": 3});
        let options = DrawOptions::from_json(value.as_object().unwrap());
        assert_eq!(options.color, None);
        assert_eq!(options.padding, Some(3.0));
    }
}
