//! Rendering primitives and shape definitions.
//!
//! This module defines the drawing types the overlay is built from:
//! - [`Color`]: RGBA color plus the fixed named palette
//! - [`Shape`]: canonical shape records (points, rays, paths, rectangles, ...)
//! - [`geometry`]: pure plane-geometry helpers
//! - [`Surface`]: the 2D context shapes are painted into, with Cairo and
//!   recording implementations
//! - [`Renderer`]: maps shapes through a [`Transform`] onto a surface

pub mod color;
pub mod font;
pub mod geometry;
pub mod options;
pub mod recording;
pub mod render;
pub mod shape;
pub mod surface;

// Re-export commonly used types at module level
pub use color::Color;
pub use font::FontDescriptor;
pub use geometry::Point;
pub use options::{DrawOptions, TextAlign, TextBaseline};
pub use recording::{PaintOp, RecordingSurface};
pub use render::{RenderStyle, Renderer, Transform};
pub use shape::Shape;
pub use surface::{CairoSurface, Surface, TextMetrics};
