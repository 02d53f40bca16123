//! Transform state rebuilt on every repaint, and the viewport it maps into.

use crate::draw::{Color, Point, Transform, color};

/// View geometry reported by the surface collaborator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Logical width in pixels
    pub width: u32,
    /// Logical height in pixels
    pub height: u32,
    /// Device pixels per logical pixel
    pub pixel_ratio: f64,
    /// Scroll position of the host view; shapes move opposite to it
    pub scroll: Point,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            pixel_ratio: 1.0,
            scroll: Point::ZERO,
        }
    }
}

impl Viewport {
    /// Device buffer size: logical size times the pixel ratio, rounded up.
    pub fn device_size(&self) -> (u32, u32) {
        let scale = |v: u32| (v as f64 * self.pixel_ratio).ceil() as u32;
        (scale(self.width), scale(self.height))
    }
}

/// Mutable drawing state that queued setters act on during replay.
///
/// Every field returns to its default when a repaint starts and whenever a
/// queued clear replays.
#[derive(Clone, Debug, PartialEq)]
pub struct TransformState {
    pub scale: f64,
    pub translate: Point,
    pub strength: f64,
    /// Beats the palette cycle, loses to an explicit per-call color
    pub override_color: Option<String>,
    /// Fractional digits kept when formatting annotation values
    pub precision: Option<usize>,
    pub opacity: f64,
    /// Next palette entry handed out by [`TransformState::next_color`]
    pub color_index: usize,
    default_strength: f64,
}

impl Default for TransformState {
    fn default() -> Self {
        Self::new(2.0)
    }
}

impl TransformState {
    pub fn new(default_strength: f64) -> Self {
        let default_strength = default_strength.max(1.0);
        Self {
            scale: 1.0,
            translate: Point::ZERO,
            strength: default_strength,
            override_color: None,
            precision: None,
            opacity: 1.0,
            color_index: 0,
            default_strength,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.default_strength);
    }

    /// Sets the zoom factor, clamped to at least 1.
    pub fn set_scale(&mut self, scale: f64) {
        self.scale = at_least_one(scale);
    }

    /// Sets the base stroke width, clamped to at least 1.
    pub fn set_strength(&mut self, strength: f64) {
        self.strength = at_least_one(strength);
    }

    pub fn set_opacity(&mut self, opacity: f64) {
        self.opacity = if opacity.is_nan() {
            1.0
        } else {
            opacity.clamp(0.0, 1.0)
        };
    }

    pub fn set_translate(&mut self, translate: Point) {
        if translate.x.is_finite() && translate.y.is_finite() {
            self.translate = translate;
        }
    }

    /// Sets or clears the override color; blank strings clear it.
    pub fn set_color(&mut self, color: Option<&str>) {
        self.override_color = color
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);
    }

    /// Sets the digit count for annotation values; negative counts mean zero.
    pub fn set_precision(&mut self, digits: Option<i64>) {
        self.precision = digits.map(|d| d.max(0) as usize);
    }

    /// Color for a shape without an explicit color.
    ///
    /// The override color wins when it parses; otherwise the palette cycle
    /// hands out its current entry and advances.
    pub fn next_color(&mut self) -> Color {
        if let Some(color) = self.override_color.as_deref().and_then(Color::parse) {
            return color;
        }
        let hex = color::palette_at(self.color_index);
        self.color_index = color::next_palette_index(self.color_index);
        Color::parse(hex).unwrap_or(color::WHITE)
    }

    /// Snapshot of the logical-to-device mapping for `viewport`.
    pub fn transform(&self, viewport: &Viewport) -> Transform {
        Transform {
            scale: self.scale,
            translate: self.translate,
            scroll_offset: Point::new(-viewport.scroll.x, -viewport.scroll.y),
            pixel_ratio: viewport.pixel_ratio,
            strength: self.strength,
            opacity: self.opacity,
        }
    }
}

fn at_least_one(value: f64) -> f64 {
    if value.is_nan() { 1.0 } else { value.max(1.0) }
}
