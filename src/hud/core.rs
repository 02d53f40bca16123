//! The overlay context: action queue, transform state, viewport and scheduler.

use super::args::Arg;
use super::builder::DrawHandle;
use super::queue::{ActionQueue, Operation, QueuedAction};
use super::scheduler::{FrameClock, FrameToken, PolledClock, RedrawScheduler};
use super::state::{TransformState, Viewport};
use crate::config::Config;
use crate::draw::{Point, RenderStyle};
use std::fmt;

/// Callback receiving the raw arguments of a draw action that drew nothing.
pub type DroppedShapeCallback = Box<dyn FnMut(&[Arg])>;

#[derive(Default)]
pub(super) struct Diagnostics {
    pub(super) callback: Option<DroppedShapeCallback>,
    pub(super) dropped: usize,
}

impl Diagnostics {
    pub(super) fn record(&mut self, args: &[Arg]) {
        self.dropped += 1;
        if let Some(callback) = self.callback.as_mut() {
            callback(args);
        }
    }
}

/// One overlay's retained drawing context.
///
/// Calls queue actions verbatim; nothing is normalized or painted until a
/// repaint replays the queue into a [`Surface`](crate::draw::Surface). Every
/// mutation requests a redraw from the frame clock, and requests made before
/// the next refresh collapse into one.
///
/// ```
/// use wayhud::hud::Hud;
/// use wayhud::hud_args;
/// use wayhud::draw::RecordingSurface;
///
/// let mut hud = Hud::new();
/// hud.draw(hud_args![10, 20, 30, 40]).teal().corners();
///
/// let mut surface = RecordingSurface::new();
/// hud.repaint(&mut surface);
/// assert_eq!(surface.filled_text().iter().filter(|t| t.starts_with('•')).count(), 4);
/// ```
pub struct Hud<C: FrameClock = PolledClock> {
    pub(super) queue: ActionQueue,
    pub(super) state: TransformState,
    pub(super) viewport: Viewport,
    pub(super) scheduler: RedrawScheduler<C>,
    pub(super) style: RenderStyle,
    pub(super) diagnostics: Diagnostics,
    anchor_site: Option<String>,
    pending_site: Option<String>,
}

impl Hud<PolledClock> {
    /// Context with default configuration and a polled frame clock.
    pub fn new() -> Self {
        Self::from_config(&Config::default())
    }

    pub fn from_config(config: &Config) -> Self {
        Self::with_clock(PolledClock::new(), config)
    }

    /// Frame requested by the last change, if a repaint is owed.
    pub fn due_frame(&self) -> Option<FrameToken> {
        self.scheduler.clock().due()
    }

    /// Disarms and returns the owed frame; the host paints it with [`Hud::run_frame`].
    pub fn take_due_frame(&mut self) -> Option<FrameToken> {
        self.scheduler.clock_mut().take_due()
    }
}

impl Default for Hud<PolledClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: FrameClock> Hud<C> {
    pub fn with_clock(clock: C, config: &Config) -> Self {
        let viewport = Viewport {
            pixel_ratio: config.overlay.default_pixel_ratio,
            ..Viewport::default()
        };
        Self {
            queue: ActionQueue::new(),
            state: TransformState::new(config.drawing.default_strength),
            viewport,
            scheduler: RedrawScheduler::new(clock),
            style: RenderStyle::from(&config.drawing),
            diagnostics: Diagnostics::default(),
            anchor_site: None,
            pending_site: None,
        }
    }

    // =========================================================================
    // Drawing
    // =========================================================================

    /// Tags the next queued call with a call-site token.
    ///
    /// The first token ever seen becomes the frame anchor. Any later call
    /// tagged with the anchor clears the queue before it is queued, so a
    /// per-frame update loop that starts with its anchored call never piles up
    /// duplicate entries.
    pub fn site(&mut self, token: impl Into<String>) -> &mut Self {
        self.pending_site = Some(token.into());
        self
    }

    /// Queues a draw call and returns its chain handle.
    pub fn draw(&mut self, args: Vec<Arg>) -> DrawHandle<'_, C> {
        let index = self.enqueue(QueuedAction::new(Operation::Draw, args));
        DrawHandle::new(self, index)
    }

    /// Queues a keyed draw call, replacing any action with the same id in place.
    pub fn upsert(&mut self, id: impl Into<String>, args: Vec<Arg>) -> DrawHandle<'_, C> {
        let index = self.enqueue(QueuedAction::keyed(id, Operation::Draw, args));
        DrawHandle::new(self, index)
    }

    /// Removes a keyed action; returns whether it existed.
    ///
    /// Queues nothing, so a pending call-site tag is dropped here instead of
    /// carrying over to the next queued call.
    pub fn remove(&mut self, id: &str) -> bool {
        self.pending_site = None;
        let removed = self.queue.remove(id);
        if removed {
            self.scheduler.schedule();
        }
        removed
    }

    /// Empties the queue (keyed actions included) and resets the transform
    /// state at the start of the next repaint.
    pub fn clear(&mut self) -> &mut Self {
        self.pending_site = None;
        self.truncate();
        self
    }

    /// Starts a new frame of immediate-style calls; same as [`Hud::clear`].
    pub fn begin_frame(&mut self) -> &mut Self {
        self.clear()
    }

    // =========================================================================
    // Queued setters
    // =========================================================================

    pub fn set_opacity(&mut self, opacity: f64) -> &mut Self {
        self.command(Operation::SetOpacity, vec![Arg::from(opacity)])
    }

    /// Sets the translation from `(x, y)` or `{x, y}`.
    pub fn translate(&mut self, args: Vec<Arg>) -> &mut Self {
        self.command(Operation::SetTranslate, args)
    }

    /// Sets the zoom factor; values below 1 replay as 1.
    pub fn set_scale(&mut self, scale: f64) -> &mut Self {
        self.command(Operation::SetScale, vec![Arg::from(scale)])
    }

    /// Sets the base stroke width; values below 1 replay as 1.
    pub fn set_strength(&mut self, strength: f64) -> &mut Self {
        self.command(Operation::SetStrength, vec![Arg::from(strength)])
    }

    /// Sets the override color used instead of the palette cycle.
    pub fn set_color(&mut self, color: &str) -> &mut Self {
        self.command(Operation::SetColor, vec![Arg::from(color)])
    }

    /// Truncates annotation values to `digits` fractional digits.
    pub fn set_precision(&mut self, digits: i64) -> &mut Self {
        self.command(Operation::SetPrecision, vec![Arg::from(digits)])
    }

    /// Queues any operation with raw arguments.
    ///
    /// [`Operation::Draw`] queues like [`Hud::draw`] and [`Operation::Clear`]
    /// truncates like [`Hud::clear`].
    pub fn command(&mut self, operation: Operation, args: Vec<Arg>) -> &mut Self {
        if operation == Operation::Clear {
            return self.clear();
        }
        self.enqueue(QueuedAction::new(operation, args));
        self
    }

    // =========================================================================
    // Viewport notifications
    // =========================================================================

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        if self.viewport != viewport {
            self.viewport = viewport;
            self.scheduler.schedule();
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.set_viewport(Viewport {
            width,
            height,
            ..self.viewport
        });
    }

    /// Resynchronizes the scroll offset; shapes stay pinned to content coordinates.
    pub fn scroll_to(&mut self, x: f64, y: f64) {
        self.set_viewport(Viewport {
            scroll: Point::new(x, y),
            ..self.viewport
        });
    }

    pub fn set_device_pixel_ratio(&mut self, ratio: f64) {
        let ratio = if ratio.is_finite() && ratio > 0.0 {
            ratio
        } else {
            1.0
        };
        self.set_viewport(Viewport {
            pixel_ratio: ratio,
            ..self.viewport
        });
    }

    // =========================================================================
    // Introspection and diagnostics
    // =========================================================================

    pub fn queue(&self) -> &ActionQueue {
        &self.queue
    }

    /// Transform state as left by the most recent repaint.
    pub fn state(&self) -> &TransformState {
        &self.state
    }

    pub fn style(&self) -> &RenderStyle {
        &self.style
    }

    pub fn scheduler(&self) -> &RedrawScheduler<C> {
        &self.scheduler
    }

    /// Registers a callback for draw actions that produce no shape.
    pub fn on_dropped(&mut self, callback: impl FnMut(&[Arg]) + 'static) {
        self.diagnostics.callback = Some(Box::new(callback));
    }

    /// Draw actions that produced no shape during the most recent repaint.
    pub fn dropped_shapes(&self) -> usize {
        self.diagnostics.dropped
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn truncate(&mut self) {
        self.queue.truncate_to_clear();
        self.scheduler.schedule();
    }

    fn enqueue(&mut self, action: QueuedAction) -> usize {
        if let Some(site) = self.pending_site.take() {
            match &self.anchor_site {
                None => {
                    log::debug!("Frame anchor set to call site '{}'", site);
                    self.anchor_site = Some(site);
                    self.truncate();
                }
                Some(anchor) if *anchor == site => self.truncate(),
                Some(_) => {}
            }
        }
        let index = self.queue.enqueue(action);
        self.scheduler.schedule();
        index
    }

    /// Appends an argument to a queued action; used by chain handles.
    pub(super) fn push_arg(&mut self, index: usize, arg: Arg) {
        self.queue.push_arg(index, arg);
    }
}

impl<C: FrameClock> fmt::Debug for Hud<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hud")
            .field("queue", &self.queue)
            .field("state", &self.state)
            .field("viewport", &self.viewport)
            .field("pending_frame", &self.scheduler.pending())
            .field("dropped", &self.diagnostics.dropped)
            .finish()
    }
}
