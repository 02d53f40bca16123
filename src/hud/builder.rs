//! Chainable handle returned by [`Hud::draw`].

use super::args::{Annotation, Arg};
use super::core::Hud;
use super::scheduler::FrameClock;
use crate::draw::{DrawOptions, color};
use std::str::FromStr;
use thiserror::Error;

/// A chain method named by string, as scripts spell them.
#[derive(Clone, Debug, PartialEq)]
pub enum ChainMethod {
    /// Explicit color: palette name or hex string
    Color(String),
    /// Extra options merged into the call
    Options(DrawOptions),
    /// Keeps a path of more than two points open
    Open,
    Annotate(Annotation),
    /// Dumps the raw arguments to the log
    Log,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown chain method '{0}'")]
pub struct UnknownChainMethod(pub String);

impl FromStr for ChainMethod {
    type Err = UnknownChainMethod;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let name = name.trim();
        let method = match name {
            "open" | "openPath" | "line" => ChainMethod::Open,
            "corners" | "points" | "coords" | "coordinates" => {
                ChainMethod::Annotate(Annotation::Coordinates)
            }
            "angle" | "angles" | "deg" | "rad" => ChainMethod::Annotate(Annotation::Angles),
            "length" | "lengths" | "size" | "edges" | "dimensions" => {
                ChainMethod::Annotate(Annotation::Lengths)
            }
            "log" => ChainMethod::Log,
            hex if hex.starts_with('#') => ChainMethod::Color(hex.to_string()),
            other => match color::palette_hex(other) {
                Some(hex) => ChainMethod::Color(hex.to_string()),
                None => return Err(UnknownChainMethod(other.to_string())),
            },
        };
        Ok(method)
    }
}

/// Generates one shortcut per palette entry, e.g. `.red()`, `.teal()`.
macro_rules! palette_shortcuts {
    ($($name:ident),* $(,)?) => {
        $(
            #[doc = concat!("Colors the shape `", stringify!($name), "` from the palette.")]
            pub fn $name(self) -> Self {
                self.color(color::palette_hex(stringify!($name)).unwrap_or(stringify!($name)))
            }
        )*
    };
}

/// Handle on a queued draw action.
///
/// Every method appends to the action's argument list in place, so options
/// chained after the call still reach the next repaint.
pub struct DrawHandle<'a, C: FrameClock> {
    hud: &'a mut Hud<C>,
    index: usize,
}

impl<'a, C: FrameClock> DrawHandle<'a, C> {
    pub(super) fn new(hud: &'a mut Hud<C>, index: usize) -> Self {
        Self { hud, index }
    }

    fn push(self, arg: Arg) -> Self {
        self.hud.push_arg(self.index, arg);
        self
    }

    /// Sets an explicit color (palette name or hex); surrounding whitespace is ignored.
    pub fn color(self, color: &str) -> Self {
        self.push(Arg::Options(DrawOptions::with_color(color)))
    }

    /// Merges arbitrary options into the call.
    pub fn options(self, options: DrawOptions) -> Self {
        self.push(Arg::Options(options))
    }

    palette_shortcuts!(
        red, orange, amber, yellow, lime, green, emerald, teal, cyan, sky, blue, indigo, violet,
        purple, fuchsia, pink, rose,
    );

    /// Labels every vertex with its coordinates.
    pub fn corners(self) -> Self {
        self.push(Arg::Annotate(Annotation::Coordinates))
    }

    pub fn coordinates(self) -> Self {
        self.corners()
    }

    /// Labels every corner with its interior angle in degrees.
    pub fn angles(self) -> Self {
        self.push(Arg::Annotate(Annotation::Angles))
    }

    /// Labels every edge with its length.
    pub fn lengths(self) -> Self {
        self.push(Arg::Annotate(Annotation::Lengths))
    }

    pub fn edges(self) -> Self {
        self.lengths()
    }

    /// Keeps a path open instead of closing it into a polygon.
    pub fn open(self) -> Self {
        self.push(Arg::Options(DrawOptions::open()))
    }

    /// Logs the call's raw arguments; does not affect rendering.
    pub fn log(self) -> Self {
        if let Some(action) = self.hud.queue().get(self.index) {
            log::info!("{:?}", action.args);
        }
        self
    }

    /// Applies a chain method selected at runtime.
    pub fn apply(self, method: ChainMethod) -> Self {
        match method {
            ChainMethod::Color(color) => self.color(&color),
            ChainMethod::Options(options) => self.options(options),
            ChainMethod::Open => self.open(),
            ChainMethod::Annotate(pass) => self.push(Arg::Annotate(pass)),
            ChainMethod::Log => self.log(),
        }
    }

    /// Queue position of the action this handle edits.
    pub fn index(&self) -> usize {
        self.index
    }
}
