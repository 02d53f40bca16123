//! The 2D drawing surface the overlay paints into, and its Cairo/Pango implementation.

use super::color::{BLACK, Color};
use super::font::FontDescriptor;
use super::options::{TextAlign, TextBaseline};

/// Measured extent of a text run, in device pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
}

/// Immediate-mode 2D context with canvas-like semantics.
///
/// Paths persist across `stroke`/`fill` until the next `begin_path`, style
/// setters apply to subsequent operations, and `save`/`restore` push and pop
/// the style state (colors, line width, alpha, font, text anchors).
pub trait Surface {
    /// Wipes the whole surface to transparent.
    fn clear(&mut self);
    fn save(&mut self);
    fn restore(&mut self);
    fn set_global_alpha(&mut self, alpha: f64);
    fn set_stroke_color(&mut self, color: Color);
    fn set_fill_color(&mut self, color: Color);
    fn set_line_width(&mut self, width: f64);
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn close_path(&mut self);
    /// Adds a full axis-aligned ellipse as a new sub-path.
    fn ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64);
    fn stroke(&mut self);
    fn fill(&mut self);
    fn set_font(&mut self, font: &FontDescriptor, size: f64);
    fn set_text_align(&mut self, align: TextAlign);
    fn set_text_baseline(&mut self, baseline: TextBaseline);
    fn measure_text(&mut self, text: &str) -> TextMetrics;
    fn fill_text(&mut self, text: &str, x: f64, y: f64);
    fn stroke_text(&mut self, text: &str, x: f64, y: f64);
}

#[derive(Clone, Debug)]
struct PaintStyle {
    stroke: Color,
    fill: Color,
    alpha: f64,
    line_width: f64,
    font: String,
    align: TextAlign,
    baseline: TextBaseline,
}

impl Default for PaintStyle {
    fn default() -> Self {
        Self {
            stroke: BLACK,
            fill: BLACK,
            alpha: 1.0,
            line_width: 1.0,
            font: FontDescriptor::default().to_pango_string(12.0),
            align: TextAlign::Left,
            baseline: TextBaseline::Top,
        }
    }
}

/// [`Surface`] backed by a Cairo context, with Pango for text.
///
/// Cairo has a single source pattern, so stroke and fill colors (and the
/// canvas-style global alpha) are tracked here and applied per operation.
pub struct CairoSurface<'a> {
    ctx: &'a cairo::Context,
    style: PaintStyle,
    stack: Vec<PaintStyle>,
}

impl<'a> CairoSurface<'a> {
    pub fn new(ctx: &'a cairo::Context) -> Self {
        ctx.set_line_cap(cairo::LineCap::Round);
        ctx.set_line_join(cairo::LineJoin::Round);
        // Best antialiasing (gray) avoids color fringing on a composited ARGB overlay.
        ctx.set_antialias(cairo::Antialias::Best);
        Self {
            ctx,
            style: PaintStyle::default(),
            stack: Vec::new(),
        }
    }

    fn set_source(&self, color: Color) {
        self.ctx
            .set_source_rgba(color.r, color.g, color.b, color.a * self.style.alpha);
    }

    /// Builds a layout for `text` in the current font and returns it with its
    /// top-left origin after applying the text anchors.
    fn layout_at(&self, text: &str, x: f64, y: f64) -> (pango::Layout, f64, f64) {
        let layout = pangocairo::functions::create_layout(self.ctx);
        let font_desc = pango::FontDescription::from_string(&self.style.font);
        layout.set_font_description(Some(&font_desc));
        layout.set_text(text);

        let (width, height) = layout.pixel_size();
        let (width, height) = (width as f64, height as f64);
        let left = match self.style.align {
            TextAlign::Left => x,
            TextAlign::Center => x - width / 2.0,
            TextAlign::Right => x - width,
        };
        let top = match self.style.baseline {
            TextBaseline::Top => y,
            TextBaseline::Middle => y - height / 2.0,
            TextBaseline::Bottom => y - height,
        };
        (layout, left, top)
    }
}

impl Surface for CairoSurface<'_> {
    fn clear(&mut self) {
        let _ = self.ctx.save();
        self.ctx.set_operator(cairo::Operator::Clear);
        let _ = self.ctx.paint();
        let _ = self.ctx.restore();
        self.ctx.new_path();
    }

    fn save(&mut self) {
        self.stack.push(self.style.clone());
    }

    fn restore(&mut self) {
        if let Some(style) = self.stack.pop() {
            self.style = style;
        }
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.style.alpha = alpha.clamp(0.0, 1.0);
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.style.stroke = color;
    }

    fn set_fill_color(&mut self, color: Color) {
        self.style.fill = color;
    }

    fn set_line_width(&mut self, width: f64) {
        self.style.line_width = width;
    }

    fn begin_path(&mut self) {
        self.ctx.new_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ctx.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ctx.line_to(x, y);
    }

    fn close_path(&mut self) {
        self.ctx.close_path();
    }

    fn ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64) {
        if rx <= 0.0 || ry <= 0.0 {
            return;
        }
        self.ctx.new_sub_path();
        let _ = self.ctx.save();
        self.ctx.translate(cx, cy);
        self.ctx.scale(rx, ry);
        self.ctx.arc(0.0, 0.0, 1.0, 0.0, 2.0 * std::f64::consts::PI);
        let _ = self.ctx.restore();
    }

    fn stroke(&mut self) {
        self.set_source(self.style.stroke);
        self.ctx.set_line_width(self.style.line_width);
        let _ = self.ctx.stroke_preserve();
    }

    fn fill(&mut self) {
        self.set_source(self.style.fill);
        let _ = self.ctx.fill_preserve();
    }

    fn set_font(&mut self, font: &FontDescriptor, size: f64) {
        self.style.font = font.to_pango_string(size);
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.style.align = align;
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.style.baseline = baseline;
    }

    fn measure_text(&mut self, text: &str) -> TextMetrics {
        let (layout, _, _) = self.layout_at(text, 0.0, 0.0);
        let (ink, _logical) = layout.pixel_extents();
        TextMetrics {
            width: ink.width() as f64,
            height: ink.height() as f64,
        }
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        let (layout, left, top) = self.layout_at(text, x, y);
        // Text never joins the shape path under construction.
        self.ctx.new_path();
        self.ctx.move_to(left, top);
        self.set_source(self.style.fill);
        pangocairo::functions::show_layout(self.ctx, &layout);
        self.ctx.new_path();
    }

    fn stroke_text(&mut self, text: &str, x: f64, y: f64) {
        let (layout, left, top) = self.layout_at(text, x, y);
        self.ctx.new_path();
        self.ctx.move_to(left, top);
        pangocairo::functions::layout_path(self.ctx, &layout);
        self.set_source(self.style.stroke);
        self.ctx.set_line_width(self.style.line_width);
        let _ = self.ctx.stroke();
    }
}
