//! Retained-mode diagnostic drawing context.
//!
//! Calls are queued verbatim and replayed into a [`Surface`](crate::draw::Surface)
//! on the next refresh:
//! - [`args`]: raw call arguments and their split by role
//! - [`normalize`]: the overload rule table turning arguments into a [`Shape`](crate::draw::Shape)
//! - [`queue`] and [`scheduler`]: the action queue and coalesced redraw requests
//! - [`state`]: transform state rebuilt on every repaint
//! - [`annotate`]: coordinate, angle and length labels
//! - [`builder`]: the chain handle returned by [`Hud::draw`]

pub mod annotate;
pub mod args;
pub mod builder;
mod core;
pub mod normalize;
pub mod queue;
mod replay;
pub mod scheduler;
pub mod state;


pub use annotate::format_value;
pub use args::{Annotation, Arg};
pub use builder::{ChainMethod, DrawHandle, UnknownChainMethod};
pub use self::core::{DroppedShapeCallback, Hud};
pub use queue::{ActionQueue, Operation, QueuedAction};
pub use scheduler::{FrameClock, FrameToken, PolledClock, RedrawScheduler};
pub use state::{TransformState, Viewport};
