//! RGBA color type and the fixed overlay palette.

/// Represents an RGBA color with floating-point components.
///
/// All components are in the range 0.0 (minimum) to 1.0 (maximum).
///
/// # Examples
///
/// ```
/// use wayhud::draw::Color;
/// let teal = Color::parse("#14b8a6").unwrap();
/// assert_eq!(Color::parse("teal"), Some(teal));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red component (0.0 = no red, 1.0 = full red)
    pub r: f64,
    /// Green component (0.0 = no green, 1.0 = full green)
    pub g: f64,
    /// Blue component (0.0 = no blue, 1.0 = full blue)
    pub b: f64,
    /// Alpha/transparency (0.0 = fully transparent, 1.0 = fully opaque)
    pub a: f64,
}

impl Color {
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Parses a palette name, `white`/`black`, or a `#rgb`, `#rrggbb`, `#rrggbbaa` hex string.
    ///
    /// Surrounding whitespace is ignored and names are case-insensitive.
    pub fn parse(spec: &str) -> Option<Self> {
        let spec = spec.trim();
        if let Some(hex) = spec.strip_prefix('#') {
            return Self::from_hex(hex);
        }
        match spec.to_lowercase().as_str() {
            "white" => Some(WHITE),
            "black" => Some(BLACK),
            "transparent" => Some(TRANSPARENT),
            name => palette_hex(name).and_then(|hex| Self::from_hex(&hex[1..])),
        }
    }

    fn from_hex(hex: &str) -> Option<Self> {
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(|v| v as f64 / 255.0);
        let short = |i: usize| channel(&hex[i..i + 1].repeat(2));
        match hex.len() {
            3 => Some(Self::new(short(0)?, short(1)?, short(2)?, 1.0)),
            6 => Some(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                1.0,
            )),
            8 => Some(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                channel(&hex[6..8])?,
            )),
            _ => None,
        }
    }

    /// Formats the color as `#rrggbb`, dropping alpha.
    pub fn to_hex(&self) -> String {
        let byte = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", byte(self.r), byte(self.g), byte(self.b))
    }
}

/// Predefined white color (R=1.0, G=1.0, B=1.0)
pub const WHITE: Color = Color {
    r: 1.0,
    g: 1.0,
    b: 1.0,
    a: 1.0,
};

/// Predefined black color (R=0.0, G=0.0, B=0.0)
pub const BLACK: Color = Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};

pub const TRANSPARENT: Color = Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 0.0,
};

// ============================================================================
// Palette
// ============================================================================

/// Named overlay colors in cycling order.
///
/// Default shape colors walk this table two entries at a time so consecutive
/// shapes never land on neighbouring hues.
pub const PALETTE: [(&str, &str); 17] = [
    ("red", "#ef4444"),
    ("orange", "#f97316"),
    ("amber", "#f59e0b"),
    ("yellow", "#eab308"),
    ("lime", "#84cc16"),
    ("green", "#22c55e"),
    ("emerald", "#10b981"),
    ("teal", "#14b8a6"),
    ("cyan", "#06b6d4"),
    ("sky", "#0ea5e9"),
    ("blue", "#3b82f6"),
    ("indigo", "#6366f1"),
    ("violet", "#8b5cf6"),
    ("purple", "#a855f7"),
    ("fuchsia", "#d946ef"),
    ("pink", "#ec4899"),
    ("rose", "#f43f5e"),
];

/// Looks up the hex string of a palette entry by name.
pub fn palette_hex(name: &str) -> Option<&'static str> {
    PALETTE
        .iter()
        .find(|(entry, _)| entry.eq_ignore_ascii_case(name))
        .map(|(_, hex)| *hex)
}

/// Hex string of the palette entry at `index` (wrapping).
pub fn palette_at(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()].1
}

/// Returns the palette index that follows `index` in the default color cycle.
///
/// Steps by two; when the end is reached it restarts on the opposite parity so
/// the second lap covers the entries skipped by the first.
pub fn next_palette_index(index: usize) -> usize {
    if index + 2 < PALETTE.len() {
        index + 2
    } else if index % 2 == 0 {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_forms() {
        assert_eq!(Color::parse("#fff"), Some(WHITE));
        assert_eq!(Color::parse("  #000000 "), Some(BLACK));
        let half = Color::parse("#ff000080").unwrap();
        assert_eq!(half.r, 1.0);
        assert!((half.a - 128.0 / 255.0).abs() < 1e-12);
        assert!(Color::parse("#12").is_none());
        assert!(Color::parse("#gggggg").is_none());
    }

    #[test]
    fn palette_names_resolve() {
        assert_eq!(Color::parse("Red").unwrap().to_hex(), "#ef4444");
        assert_eq!(palette_hex("rose"), Some("#f43f5e"));
        assert!(Color::parse("chartreuse").is_none());
    }

    #[test]
    fn cycle_skips_neighbours_and_flips_parity() {
        let mut index = 0;
        let mut seen = vec![index];
        for _ in 0..PALETTE.len() {
            index = next_palette_index(index);
            seen.push(index);
        }
        assert_eq!(&seen[..9], &[0, 2, 4, 6, 8, 10, 12, 14, 16]);
        assert_eq!(seen[9], 1);
        assert_eq!(next_palette_index(15), 0);
        assert_eq!(palette_at(PALETTE.len()), PALETTE[0].1);
    }
}
