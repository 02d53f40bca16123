//! Paints canonical shapes through a [`Surface`].

use super::color::{BLACK, Color, WHITE};
use super::font::FontDescriptor;
use super::geometry::Point;
use super::options::{DrawOptions, TextAlign, TextBaseline};
use super::shape::Shape;
use super::surface::{Surface, TextMetrics};
use crate::config::DrawingConfig;

/// Length of the segment painted for a ray, in logical units.
pub const RAY_LENGTH: f64 = 10_000.0;

/// Block character used for the text background plate.
const PLATE_GLYPH: char = '█';

/// Logical-to-device mapping plus the stroke parameters derived from it.
///
/// `device = (scroll_offset + translate + logical) * scale * pixel_ratio`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// Zoom factor, never below 1
    pub scale: f64,
    pub translate: Point,
    /// Negated scroll position of the host view
    pub scroll_offset: Point,
    /// Device pixels per logical pixel (output scale)
    pub pixel_ratio: f64,
    /// Base stroke width in logical units
    pub strength: f64,
    /// Global alpha for strokes and text
    pub opacity: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            translate: Point::ZERO,
            scroll_offset: Point::ZERO,
            pixel_ratio: 1.0,
            strength: 2.0,
            opacity: 1.0,
        }
    }
}

impl Transform {
    pub fn to_device(&self, p: Point) -> Point {
        let factor = self.scale * self.pixel_ratio;
        Point::new(
            (self.scroll_offset.x + self.translate.x + p.x) * factor,
            (self.scroll_offset.y + self.translate.y + p.y) * factor,
        )
    }

    /// Converts a logical length (radius, font size, padding) to device pixels.
    pub fn scaled(&self, length: f64) -> f64 {
        length * self.scale * self.pixel_ratio
    }

    /// Device stroke width; constant in logical units regardless of zoom.
    pub fn stroke_width(&self) -> f64 {
        self.strength / self.scale * self.pixel_ratio
    }

    /// Radius of a point marker, in device pixels.
    pub fn dot_radius(&self) -> f64 {
        0.5 + self.stroke_width() * 1.5
    }
}

/// Rendering constants that come from configuration rather than from calls.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderStyle {
    pub font_family: String,
    pub font_size: f64,
    /// Absolute alpha of polygon and ellipse fills
    pub fill_alpha: f64,
    pub label_font_size: f64,
    /// Font size used to measure labels before placing them
    pub label_measure_font_size: f64,
    pub angle_label_offset: f64,
    pub label_text_color: Color,
    pub label_background: Color,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            font_family: "Monospace".to_string(),
            font_size: 12.0,
            fill_alpha: 0.05,
            label_font_size: 8.0,
            label_measure_font_size: 9.0,
            angle_label_offset: 30.0,
            label_text_color: WHITE,
            label_background: BLACK,
        }
    }
}

impl From<&DrawingConfig> for RenderStyle {
    fn from(config: &DrawingConfig) -> Self {
        let defaults = Self::default();
        Self {
            font_family: config.font_family.clone(),
            font_size: config.font_size,
            fill_alpha: config.fill_alpha,
            label_font_size: config.label_font_size,
            label_measure_font_size: config.label_measure_font_size,
            angle_label_offset: config.angle_label_offset,
            label_text_color: config.label_text_color.to_color(defaults.label_text_color),
            label_background: config.label_background.to_color(defaults.label_background),
        }
    }
}

/// Paints shapes for one draw action.
///
/// Holds a snapshot of the transform taken when the action replays, so state
/// changes queued later in the same frame do not leak backwards.
pub struct Renderer<'a> {
    surface: &'a mut dyn Surface,
    transform: Transform,
    style: &'a RenderStyle,
}

impl<'a> Renderer<'a> {
    pub fn new(surface: &'a mut dyn Surface, transform: Transform, style: &'a RenderStyle) -> Self {
        Self {
            surface,
            transform,
            style,
        }
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn style(&self) -> &RenderStyle {
        self.style
    }

    /// Renders a single shape, descending into groups.
    pub fn render_shape(&mut self, shape: &Shape, color: Color, options: &DrawOptions) {
        self.surface.set_global_alpha(self.transform.opacity);
        match shape {
            Shape::Point { x, y } => self.render_dot(Point::new(*x, *y), color),
            Shape::Ray { x, y, dx, dy } => {
                let start = Point::new(*x, *y);
                let end = Point::new(x + dx * RAY_LENGTH, y + dy * RAY_LENGTH);
                self.render_polyline(&[start, end], color);
            }
            Shape::Path { points, closed } => self.render_path(points, *closed, color),
            Shape::Rectangle { .. } => {
                if let Some(corners) = shape.corners() {
                    self.render_polygon(&corners, color);
                }
            }
            Shape::Ellipse { x, y, rx, ry } => {
                self.render_ellipse(Point::new(*x, *y), *rx, *ry, color)
            }
            Shape::Text { x, y, content } => {
                self.render_text(content, Point::new(*x, *y), color, options)
            }
            Shape::Group { shapes } => {
                for member in shapes {
                    self.render_shape(member, color, options);
                }
            }
        }
    }

    fn set_path_style(&mut self, color: Color) {
        self.surface.set_stroke_color(color);
        self.surface.set_line_width(self.transform.stroke_width());
        self.surface.set_fill_color(color);
    }

    /// Fills the current path at the fixed fill alpha, then restores opacity.
    ///
    /// The fill alpha replaces the global opacity rather than scaling it.
    fn fill_translucent(&mut self) {
        self.surface.set_global_alpha(self.style.fill_alpha);
        self.surface.fill();
        self.surface.set_global_alpha(self.transform.opacity);
    }

    fn trace(&mut self, points: &[Point]) {
        let transform = self.transform;
        let mut device = points.iter().map(|p| transform.to_device(*p));
        if let Some(first) = device.next() {
            self.surface.move_to(first.x, first.y);
        }
        for p in device {
            self.surface.line_to(p.x, p.y);
        }
    }

    fn render_dot(&mut self, at: Point, color: Color) {
        let center = self.transform.to_device(at);
        let radius = self.transform.dot_radius();
        self.surface.begin_path();
        self.surface.set_fill_color(color);
        self.surface.ellipse(center.x, center.y, radius, radius);
        self.surface.fill();
    }

    fn render_path(&mut self, points: &[Point], closed: bool, color: Color) {
        match points {
            [] => {}
            [single] => self.render_dot(*single, color),
            _ if closed && points.len() > 2 => self.render_polygon(points, color),
            _ => self.render_polyline(points, color),
        }
    }

    fn render_polyline(&mut self, points: &[Point], color: Color) {
        self.surface.begin_path();
        self.set_path_style(color);
        self.trace(points);
        self.surface.stroke();
    }

    fn render_polygon(&mut self, points: &[Point], color: Color) {
        self.surface.begin_path();
        self.set_path_style(color);
        self.trace(points);
        self.surface.close_path();
        self.fill_translucent();
        self.surface.stroke();
    }

    fn render_ellipse(&mut self, center: Point, rx: f64, ry: f64, color: Color) {
        let center = self.transform.to_device(center);
        self.surface.begin_path();
        self.set_path_style(color);
        self.surface
            .ellipse(center.x, center.y, self.transform.scaled(rx), self.transform.scaled(ry));
        self.fill_translucent();
        self.surface.stroke();
    }

    fn apply_font(&mut self, options: &DrawOptions) {
        let family = options
            .font_family
            .as_deref()
            .unwrap_or(&self.style.font_family);
        let size = options.font_size.unwrap_or(self.style.font_size);
        let font = FontDescriptor::for_zoom(family, self.transform.scale);
        self.surface.set_font(&font, self.transform.scaled(size));
    }

    /// Measures `text` with the font `options` select, in logical units.
    pub fn measure_text(&mut self, text: &str, options: &DrawOptions) -> TextMetrics {
        self.apply_font(options);
        let metrics = self.surface.measure_text(text);
        let factor = self.transform.scale * self.transform.pixel_ratio;
        TextMetrics {
            width: metrics.width / factor,
            height: metrics.height / factor,
        }
    }

    /// Paints a text run, with the optional background plate behind it.
    ///
    /// The plate is a run of block glyphs as long as the text, stroked wide in
    /// the border color, stroked narrower in the background color, then filled.
    pub fn render_text(&mut self, content: &str, at: Point, color: Color, options: &DrawOptions) {
        let position = self.transform.to_device(at);
        self.surface.set_fill_color(color);
        self.apply_font(options);
        self.surface
            .set_text_baseline(options.text_baseline.unwrap_or(TextBaseline::Top));
        self.surface
            .set_text_align(options.text_align.unwrap_or(TextAlign::Left));

        if let Some(background) = options.background_color.as_deref().and_then(Color::parse) {
            let border = options
                .border_color
                .as_deref()
                .and_then(Color::parse)
                .unwrap_or(color);
            let padding = options.padding.unwrap_or(2.0);
            let border_width = options.border_width.unwrap_or(2.0);
            let plate: String = std::iter::repeat_n(PLATE_GLYPH, content.chars().count()).collect();

            self.surface.save();
            self.surface
                .set_line_width(self.transform.scaled(padding + border_width + 2.0));
            self.surface.set_stroke_color(border);
            self.surface.stroke_text(&plate, position.x, position.y);

            self.surface
                .set_line_width(self.transform.scaled(padding + border_width));
            self.surface.set_stroke_color(background);
            self.surface.stroke_text(&plate, position.x, position.y);

            self.surface.set_fill_color(background);
            self.surface.fill_text(&plate, position.x, position.y);
            self.surface.restore();
        }

        self.surface.fill_text(content, position.x, position.y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::recording::{PaintOp, RecordingSurface};

    fn red() -> Color {
        Color::parse("red").unwrap()
    }

    #[test]
    fn device_mapping_applies_scroll_translate_scale_and_ratio() {
        let transform = Transform {
            scale: 2.0,
            translate: Point::new(5.0, 0.0),
            scroll_offset: Point::new(-10.0, -20.0),
            pixel_ratio: 1.5,
            ..Transform::default()
        };
        assert_eq!(transform.to_device(Point::new(15.0, 30.0)), Point::new(30.0, 30.0));
        assert_eq!(transform.stroke_width(), 1.5);
        assert_eq!(transform.scaled(4.0), 12.0);
    }

    #[test]
    fn dot_is_a_filled_circle() {
        let mut surface = RecordingSurface::new();
        let style = RenderStyle::default();
        let mut renderer = Renderer::new(&mut surface, Transform::default(), &style);
        renderer.render_shape(&Shape::Point { x: 10.0, y: 20.0 }, red(), &DrawOptions::default());
        assert!(surface.ops().contains(&PaintOp::Ellipse(10.0, 20.0, 3.5, 3.5)));
        assert_eq!(surface.count(|op| *op == PaintOp::Fill), 1);
        assert_eq!(surface.count(|op| *op == PaintOp::Stroke), 0);
    }

    #[test]
    fn closed_path_fills_at_fixed_alpha_under_stroke() {
        let mut surface = RecordingSurface::new();
        let style = RenderStyle::default();
        let transform = Transform {
            opacity: 0.5,
            ..Transform::default()
        };
        let triangle = Shape::Path {
            points: vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(0.0, 10.0),
            ],
            closed: true,
        };
        Renderer::new(&mut surface, transform, &style).render_shape(
            &triangle,
            red(),
            &DrawOptions::default(),
        );
        let ops = surface.ops();
        let fill = ops.iter().position(|op| *op == PaintOp::Fill).unwrap();
        assert_eq!(ops[fill - 1], PaintOp::SetGlobalAlpha(0.05));
        assert_eq!(ops[fill + 1], PaintOp::SetGlobalAlpha(0.5));
        assert_eq!(ops[fill + 2], PaintOp::Stroke);
        assert!(ops.contains(&PaintOp::ClosePath));
    }

    #[test]
    fn open_path_and_ray_are_stroked_only() {
        let mut surface = RecordingSurface::new();
        let style = RenderStyle::default();
        let mut renderer = Renderer::new(&mut surface, Transform::default(), &style);
        renderer.render_shape(
            &Shape::Ray {
                x: 3.0,
                y: 0.0,
                dx: 0.0,
                dy: 1.0,
            },
            red(),
            &DrawOptions::default(),
        );
        assert!(surface.ops().contains(&PaintOp::LineTo(3.0, RAY_LENGTH)));
        assert_eq!(surface.count(|op| *op == PaintOp::Fill), 0);
        assert_eq!(surface.count(|op| *op == PaintOp::ClosePath), 0);
    }

    #[test]
    fn text_plate_is_drawn_before_glyphs() {
        let mut surface = RecordingSurface::new();
        let style = RenderStyle::default();
        let options = DrawOptions {
            background_color: Some("#000".to_string()),
            ..DrawOptions::default()
        };
        Renderer::new(&mut surface, Transform::default(), &style).render_shape(
            &Shape::Text {
                x: 1.0,
                y: 2.0,
                content: "abc".to_string(),
            },
            WHITE,
            &options,
        );
        assert_eq!(
            surface.count(|op| matches!(op, PaintOp::StrokeText(t, _, _) if t == "███")),
            2
        );
        assert_eq!(surface.filled_text(), ["███", "abc"]);
        assert!(surface.ops().contains(&PaintOp::SetLineWidth(6.0)));
    }
}
