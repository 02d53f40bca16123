use clap::{ArgAction, Parser};
use std::path::PathBuf;

use wayhud::backend::{self, OffscreenOptions};
use wayhud::config::Config;

#[derive(Parser, Debug)]
#[command(name = "wayhud")]
#[command(
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("WAYHUD_GIT_HASH"), ")"),
    about = "Diagnostic geometry overlay for Wayland compositors"
)]
struct Cli {
    /// Show the overlay and execute script commands until the input ends
    #[arg(long, short = 'a', action = ArgAction::SetTrue, conflicts_with = "render")]
    active: bool,

    /// Execute the script offscreen and write the frame to this PNG file
    #[arg(long, short = 'r', value_name = "OUT.png")]
    render: Option<PathBuf>,

    /// Script of JSON command lines (default: standard input)
    #[arg(long, short = 's', value_name = "FILE")]
    script: Option<PathBuf>,

    /// Offscreen frame width in logical pixels
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Offscreen frame height in logical pixels
    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Device pixels per logical pixel for offscreen frames
    #[arg(long, value_name = "RATIO")]
    pixel_ratio: Option<f64>,

    /// Configuration file (default: ~/.config/wayhud/config.toml)
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,
}

fn load_config(path: Option<&PathBuf>) -> Config {
    let loaded = match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    loaded.unwrap_or_else(|e| {
        log::warn!("Failed to load config: {:#}. Using defaults.", e);
        Config::default()
    })
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    if let Some(output) = cli.render {
        let config = load_config(cli.config.as_ref());
        let options = OffscreenOptions {
            output,
            script: cli.script,
            width: cli.width,
            height: cli.height,
            pixel_ratio: cli.pixel_ratio,
        };
        let failed = backend::render_png(&config, &options)?;
        if failed > 0 {
            log::warn!("{} script lines were skipped", failed);
        }
    } else if cli.active {
        if std::env::var("WAYLAND_DISPLAY").is_err() {
            log::error!("WAYLAND_DISPLAY not set - the overlay requires Wayland.");
            log::error!("Use --render OUT.png to draw without a compositor.");
            return Err(anyhow::anyhow!("Wayland environment required"));
        }

        log::info!("Starting geometry overlay...");
        backend::run_wayland(load_config(cli.config.as_ref()), cli.script)?;
        log::info!("Geometry overlay closed.");
    } else {
        println!("wayhud: Diagnostic geometry overlay for Wayland compositors");
        println!();
        println!("Usage:");
        println!("  wayhud --active [--script FILE]     Show the overlay, read commands");
        println!("  wayhud --render OUT.png [--script FILE] [--width W] [--height H]");
        println!("                                      Draw offscreen into a PNG");
        println!("  wayhud --help                       Show help");
        println!();
        println!("Script lines are JSON objects, for example:");
        println!(r#"  {{"cmd": "draw", "args": [10, 20, 120, 80], "chain": ["teal", "corners"]}}"#);
        println!(r#"  {{"cmd": "scale", "args": [2]}}"#);
        println!();
        println!("Requirements for --active:");
        println!("  - Wayland compositor (Hyprland, Sway, etc.)");
        println!("  - wlr-layer-shell protocol support");
    }

    Ok(())
}
