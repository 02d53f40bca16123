//! Reset-and-replay repaint of the action queue.

use super::annotate::annotate;
use super::args::{Arg, split_arguments};
use super::core::{Diagnostics, Hud};
use super::normalize::normalize;
use super::queue::{Operation, QueuedAction};
use super::scheduler::{FrameClock, FrameToken};
use super::state::{TransformState, Viewport};
use crate::draw::{Color, Point, RenderStyle, Renderer, Surface};
use serde_json::Value;

impl<C: FrameClock> Hud<C> {
    /// Repaints if `token` is the pending frame; returns whether it painted.
    ///
    /// Tokens superseded by a later request are ignored.
    pub fn run_frame(&mut self, token: FrameToken, surface: &mut dyn Surface) -> bool {
        if !self.scheduler.fire(token) {
            log::trace!("Ignoring stale frame {:?}", token);
            return false;
        }
        self.repaint(surface);
        true
    }

    /// Resets the transform state, wipes `surface` and replays every queued
    /// action in order.
    ///
    /// Replaying an unchanged queue issues the same primitive calls every time.
    pub fn repaint(&mut self, surface: &mut dyn Surface) {
        self.state.reset();
        self.diagnostics.dropped = 0;
        surface.clear();

        let mut replay = Replay {
            state: &mut self.state,
            viewport: &self.viewport,
            style: &self.style,
            diagnostics: &mut self.diagnostics,
        };
        for action in self.queue.iter() {
            replay.apply(action, surface);
        }

        log::debug!(
            "Repainted {} actions ({} dropped shapes)",
            self.queue.len(),
            self.diagnostics.dropped
        );
    }
}

/// Borrowed pieces of a [`Hud`] that replay mutates, split from the queue.
struct Replay<'a> {
    state: &'a mut TransformState,
    viewport: &'a Viewport,
    style: &'a RenderStyle,
    diagnostics: &'a mut Diagnostics,
}

impl Replay<'_> {
    fn apply(&mut self, action: &QueuedAction, surface: &mut dyn Surface) {
        let args = action.args.as_slice();
        match action.operation {
            Operation::Draw => self.draw(args, surface),
            Operation::Clear => self.state.reset(),
            Operation::SetOpacity => {
                if let Some(opacity) = first_number(args) {
                    self.state.set_opacity(opacity);
                }
            }
            Operation::SetTranslate => {
                if let Some(translate) = translation(args) {
                    self.state.set_translate(translate);
                }
            }
            Operation::SetScale => {
                if let Some(scale) = first_number(args) {
                    self.state.set_scale(scale);
                }
            }
            Operation::SetStrength => {
                if let Some(strength) = first_number(args) {
                    self.state.set_strength(strength);
                }
            }
            Operation::SetColor => {
                let color = args.first().and_then(Arg::as_value).and_then(Value::as_str);
                self.state.set_color(color);
            }
            Operation::SetPrecision => {
                let digits = first_number(args).map(|d| d.trunc() as i64);
                self.state.set_precision(digits);
            }
        }
    }

    fn draw(&mut self, args: &[Arg], surface: &mut dyn Surface) {
        let split = split_arguments(args);
        // An explicit color beats both the override color and the cycle.
        let color = match split.options.color.as_deref().and_then(Color::parse) {
            Some(color) => color,
            None => self.state.next_color(),
        };

        let Some(shape) = normalize(&split.shapes, &split.options) else {
            self.diagnostics.record(args);
            return;
        };

        let transform = self.state.transform(self.viewport);
        let mut renderer = Renderer::new(surface, transform, self.style);
        for leaf in shape.leaves() {
            renderer.render_shape(leaf, color, &split.options);
            for pass in &split.annotations {
                annotate(&mut renderer, *pass, leaf, color, self.state.precision);
            }
        }
    }
}

fn first_number(args: &[Arg]) -> Option<f64> {
    args.first()?.as_value()?.as_f64()
}

/// Reads `(x, y)` or `{x, y}` translation arguments.
fn translation(args: &[Arg]) -> Option<Point> {
    let values: Vec<&Value> = args.iter().filter_map(Arg::as_value).collect();
    match values.as_slice() {
        [Value::Object(map), ..] => Some(Point::new(
            map.get("x").and_then(Value::as_f64)?,
            map.get("y").and_then(Value::as_f64)?,
        )),
        [x, y, ..] => Some(Point::new(x.as_f64()?, y.as_f64()?)),
        _ => None,
    }
}
