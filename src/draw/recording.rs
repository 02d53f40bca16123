//! In-memory [`Surface`] that records every primitive call.
//!
//! Used by tests to compare paint sequences without rasterizing anything.

use super::color::Color;
use super::font::FontDescriptor;
use super::options::{TextAlign, TextBaseline};
use super::surface::{Surface, TextMetrics};

/// One primitive call issued against a surface.
#[derive(Clone, Debug, PartialEq)]
pub enum PaintOp {
    /// Wipes the surface
    Clear,
    Save,
    Restore,
    SetGlobalAlpha(f64),
    SetStrokeColor(Color),
    SetFillColor(Color),
    SetLineWidth(f64),
    /// Starts a new path
    BeginPath,
    MoveTo(f64, f64),
    LineTo(f64, f64),
    ClosePath,
    /// Adds an ellipse sub-path: center then radii
    Ellipse(f64, f64, f64, f64),
    /// Strokes the current path
    Stroke,
    /// Fills the current path
    Fill,
    /// Pango font string, e.g. "Monospace Heavy 12"
    SetFont(String),
    SetTextAlign(TextAlign),
    SetTextBaseline(TextBaseline),
    FillText(String, f64, f64),
    StrokeText(String, f64, f64),
}

/// Surface that appends a [`PaintOp`] per call.
///
/// Text metrics are synthetic: every character is 0.6 em wide and a line is
/// one em tall, which keeps label placement deterministic.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    ops: Vec<PaintOp>,
    font_size: f64,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            ops: Vec::new(),
            font_size: 12.0,
        }
    }

    pub fn ops(&self) -> &[PaintOp] {
        &self.ops
    }

    pub fn take(&mut self) -> Vec<PaintOp> {
        std::mem::take(&mut self.ops)
    }

    /// Every text run painted with `fill_text`, in order.
    pub fn filled_text(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                PaintOp::FillText(text, _, _) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, matches: impl Fn(&PaintOp) -> bool) -> usize {
        self.ops.iter().filter(|op| matches(op)).count()
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self) {
        self.ops.push(PaintOp::Clear);
    }

    fn save(&mut self) {
        self.ops.push(PaintOp::Save);
    }

    fn restore(&mut self) {
        self.ops.push(PaintOp::Restore);
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.ops.push(PaintOp::SetGlobalAlpha(alpha));
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.ops.push(PaintOp::SetStrokeColor(color));
    }

    fn set_fill_color(&mut self, color: Color) {
        self.ops.push(PaintOp::SetFillColor(color));
    }

    fn set_line_width(&mut self, width: f64) {
        self.ops.push(PaintOp::SetLineWidth(width));
    }

    fn begin_path(&mut self) {
        self.ops.push(PaintOp::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ops.push(PaintOp::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ops.push(PaintOp::LineTo(x, y));
    }

    fn close_path(&mut self) {
        self.ops.push(PaintOp::ClosePath);
    }

    fn ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64) {
        self.ops.push(PaintOp::Ellipse(cx, cy, rx, ry));
    }

    fn stroke(&mut self) {
        self.ops.push(PaintOp::Stroke);
    }

    fn fill(&mut self) {
        self.ops.push(PaintOp::Fill);
    }

    fn set_font(&mut self, font: &FontDescriptor, size: f64) {
        self.font_size = size;
        self.ops.push(PaintOp::SetFont(font.to_pango_string(size)));
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.ops.push(PaintOp::SetTextAlign(align));
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.ops.push(PaintOp::SetTextBaseline(baseline));
    }

    fn measure_text(&mut self, text: &str) -> TextMetrics {
        TextMetrics {
            width: text.chars().count() as f64 * self.font_size * 0.6,
            height: self.font_size,
        }
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        self.ops.push(PaintOp::FillText(text.to_string(), x, y));
    }

    fn stroke_text(&mut self, text: &str, x: f64, y: f64) {
        self.ops.push(PaintOp::StrokeText(text.to_string(), x, y));
    }
}
