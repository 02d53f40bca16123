//! Hosts that own a [`Hud`](crate::hud::Hud) and hand it surfaces to paint.

use anyhow::Result;
use std::path::PathBuf;

use crate::config::Config;

pub mod offscreen;
pub mod wayland;

pub use offscreen::{OffscreenOptions, render_png};

/// Run the overlay on a wlr-layer-shell compositor until the script ends
/// (when configured to) or the compositor closes the surface.
///
/// # Arguments
/// * `config` - Loaded configuration
/// * `script` - Script file to execute, or `None` for standard input
pub fn run_wayland(config: Config, script: Option<PathBuf>) -> Result<()> {
    wayland::WaylandBackend::new(config, script).run()
}
