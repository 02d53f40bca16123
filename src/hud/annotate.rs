//! Coordinate, angle and length labels derived from a drawn shape.

use super::args::Annotation;
use crate::draw::geometry::{self, Point};
use crate::draw::{Color, DrawOptions, Renderer, Shape, TextAlign, TextBaseline};

/// Formats an annotation value.
///
/// Without a precision the default float formatting is used. With one, the
/// fractional digits are truncated (never rounded) to that many; values with no
/// fractional part, and a precision of zero, print as integers.
pub fn format_value(value: f64, precision: Option<usize>) -> String {
    let text = value.to_string();
    let Some(digits) = precision else {
        return text;
    };
    match text.split_once('.') {
        Some((whole, fraction)) if digits > 0 => {
            let kept: String = fraction.chars().take(digits).collect();
            format!("{whole}.{kept}")
        }
        Some((whole, _)) => whole.to_string(),
        None => text,
    }
}

/// Where a label sits relative to its anchor point.
#[derive(Clone, Copy, Debug, Default)]
struct Placement {
    align: Option<TextAlign>,
    baseline: Option<TextBaseline>,
    offset: Point,
}

/// Runs one annotation pass over `shape`; no-op for shapes without corners.
pub fn annotate(
    renderer: &mut Renderer<'_>,
    pass: Annotation,
    shape: &Shape,
    color: Color,
    precision: Option<usize>,
) {
    let Some(corners) = shape.corners() else {
        return;
    };
    match pass {
        Annotation::Coordinates => coordinates(renderer, &corners, color, precision),
        Annotation::Angles => angles(renderer, &corners, shape.is_closed(), color, precision),
        Annotation::Lengths => lengths(renderer, shape, color, precision),
    }
}

fn coordinates(renderer: &mut Renderer<'_>, corners: &[Point], color: Color, precision: Option<usize>) {
    let Some(center) = geometry::centroid(corners) else {
        return;
    };
    for (index, corner) in corners.iter().enumerate() {
        let text = format!(
            "•{index} {}, {}",
            format_value(corner.x, precision),
            format_value(corner.y, precision)
        );
        let placement = Placement {
            align: Some(if corner.x > center.x {
                TextAlign::Left
            } else {
                TextAlign::Right
            }),
            baseline: Some(if corner.y > center.y {
                TextBaseline::Bottom
            } else {
                TextBaseline::Top
            }),
            offset: Point::new(4.0, 4.0),
        };
        label(renderer, *corner, &text, color, placement);
    }
}

/// Interior angle at every joint; wraps around when `closed`.
///
/// Labels are numbered by vertex index and pulled toward the centroid.
fn angles(
    renderer: &mut Renderer<'_>,
    corners: &[Point],
    closed: bool,
    color: Color,
    precision: Option<usize>,
) {
    let Some(center) = geometry::centroid(corners) else {
        return;
    };
    let n = corners.len();
    let joints: Vec<usize> = if closed {
        (0..n).collect()
    } else {
        (1..n.saturating_sub(1)).collect()
    };
    let offset = renderer.style().angle_label_offset;

    for joint in joints {
        let before = corners[(joint + n - 1) % n];
        let at = corners[joint];
        let after = corners[(joint + 1) % n];
        let angle = geometry::corner_angle(before, at, after);
        if !angle.is_finite() {
            continue;
        }
        let toward_center = geometry::normalize(Point::new(center.x - at.x, center.y - at.y));
        let shift = geometry::scale(toward_center, offset);
        let text = format!(
            "∠{joint} {}",
            format_value(geometry::rad_to_deg(angle), precision)
        );
        label(
            renderer,
            Point::new(at.x + shift.x, at.y + shift.y),
            &text,
            color,
            Placement::default(),
        );
    }
}

fn lengths(renderer: &mut Renderer<'_>, shape: &Shape, color: Color, precision: Option<usize>) {
    let edges = shape.edges();
    let count = edges.len();
    let wraps = shape.is_closed();
    for (index, (begin, end)) in edges.into_iter().enumerate() {
        let end_index = if wraps && index + 1 == count {
            0
        } else {
            index + 1
        };
        let text = format!(
            "{index}↔{end_index} {}",
            format_value(geometry::distance(begin, end), precision)
        );
        label(
            renderer,
            geometry::midpoint(begin, end),
            &text,
            color,
            Placement::default(),
        );
    }
}

/// Paints a label plate centered on `at`, pushed out by the placement.
///
/// The label is measured at the measuring size and painted at the (smaller)
/// label size, light text on a dark plate bordered in the shape color.
fn label(renderer: &mut Renderer<'_>, at: Point, text: &str, color: Color, placement: Placement) {
    let style = renderer.style().clone();
    let measure = DrawOptions {
        font_size: Some(style.label_measure_font_size),
        text_align: Some(TextAlign::Center),
        text_baseline: Some(TextBaseline::Middle),
        ..DrawOptions::default()
    };
    let size = renderer.measure_text(text, &measure);
    let half_width = size.width * 0.5;
    let half_height = size.height * 0.5;

    let mut shift = Point::ZERO;
    match placement.baseline {
        Some(TextBaseline::Bottom) => shift.y += half_height + placement.offset.y,
        Some(TextBaseline::Top) => shift.y -= half_height + placement.offset.y,
        _ => {}
    }
    match placement.align {
        Some(TextAlign::Left) => shift.x += half_width + placement.offset.x,
        Some(TextAlign::Right) => shift.x -= half_width + placement.offset.x,
        _ => {}
    }

    let options = DrawOptions {
        font_size: Some(style.label_font_size),
        background_color: Some(style.label_background.to_hex()),
        border_color: Some(color.to_hex()),
        ..measure
    };
    renderer.render_text(
        text,
        Point::new(at.x + shift.x, at.y + shift.y),
        style.label_text_color,
        &options,
    );
}
