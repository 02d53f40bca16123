//! Font descriptor for overlay text.

/// Font configuration for text rendering.
///
/// Describes which font to use, including family name, weight, and style.
/// Weight follows the zoom level so labels keep roughly the same apparent
/// stroke thickness at every scale.
#[derive(Debug, Clone, PartialEq)]
pub struct FontDescriptor {
    /// Font family name (e.g., "Monospace", "Sans", "JetBrains Mono")
    pub family: String,

    /// Font weight (e.g., "normal", "heavy", "light")
    pub weight: String,

    /// Font style (e.g., "normal", "italic", "oblique")
    pub style: String,
}

impl FontDescriptor {
    pub fn new(family: String, weight: String, style: String) -> Self {
        Self {
            family,
            weight,
            style,
        }
    }

    /// Picks the weight for a zoom factor: heavy below 2x, light from 2x upward.
    pub fn for_zoom(family: &str, scale: f64) -> Self {
        let weight = if scale < 2.0 { "heavy" } else { "light" };
        Self::new(family.to_string(), weight.to_string(), "normal".to_string())
    }

    /// Converts this font descriptor to a Pango font description string.
    ///
    /// Format: "Family Style Weight Size", for example "Monospace Heavy 12".
    pub fn to_pango_string(&self, size: f64) -> String {
        let mut parts = vec![self.family.clone()];

        if self.style.to_lowercase() != "normal" {
            parts.push(capitalize_first(&self.style));
        }

        if self.weight.to_lowercase() != "normal" {
            parts.push(capitalize_first(&self.weight));
        }

        // Pango accepts fractional sizes; keep two decimals so device scaling survives.
        let size = (size * 100.0).round() / 100.0;
        parts.push(format!("{}", size));

        parts.join(" ")
    }
}

impl Default for FontDescriptor {
    fn default() -> Self {
        Self::for_zoom("Monospace", 1.0)
    }
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}
