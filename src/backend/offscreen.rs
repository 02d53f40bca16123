//! Headless host: executes a script once and writes the frame as PNG.

use anyhow::{Context, Result};
use log::{debug, info};
use std::fs::File;
use std::path::PathBuf;

use crate::config::Config;
use crate::draw::CairoSurface;
use crate::hud::Hud;
use crate::script;

/// Output geometry and script source for [`render_png`].
#[derive(Debug, Clone)]
pub struct OffscreenOptions {
    pub output: PathBuf,
    pub script: Option<PathBuf>,
    /// Logical width in pixels
    pub width: u32,
    /// Logical height in pixels
    pub height: u32,
    /// Device pixels per logical pixel; the config default when `None`
    pub pixel_ratio: Option<f64>,
}

/// Runs the script into a fresh [`Hud`] and saves one repaint as PNG.
///
/// Returns the number of script lines that failed and were skipped.
pub fn render_png(config: &Config, options: &OffscreenOptions) -> Result<usize> {
    let mut hud = Hud::from_config(config);
    hud.resize(options.width, options.height);
    hud.set_device_pixel_ratio(
        options
            .pixel_ratio
            .unwrap_or(config.overlay.default_pixel_ratio),
    );

    let reader = script::open(options.script.as_deref())?;
    let failed = script::run(&mut hud, reader)?;
    debug!("Script queued {} actions", hud.queue().len());

    let (width, height) = hud.viewport().device_size();
    let image = cairo::ImageSurface::create(cairo::Format::ARgb32, width as i32, height as i32)
        .context("Failed to create image surface")?;
    {
        let ctx = cairo::Context::new(&image).context("Failed to create Cairo context")?;
        let mut surface = CairoSurface::new(&ctx);
        hud.repaint(&mut surface);
    }
    image.flush();

    let mut file = File::create(&options.output)
        .with_context(|| format!("Failed to create {}", options.output.display()))?;
    image
        .write_to_png(&mut file)
        .with_context(|| format!("Failed to write PNG to {}", options.output.display()))?;

    info!(
        "Rendered {}x{} frame to {} ({} dropped shapes)",
        width,
        height,
        options.output.display(),
        hud.dropped_shapes()
    );
    Ok(failed)
}
