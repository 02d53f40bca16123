// Connects to the compositor, maps a click-through overlay layer surface and
// drives the calloop event loop that feeds script lines to the hud and paints
// owed frames.
use anyhow::{Context, Result, anyhow};
use calloop::{
    EventLoop,
    channel::{self, Event},
};
use log::{debug, info, warn};
use smithay_client_toolkit::{
    compositor::{CompositorState, Region},
    output::OutputState,
    reexports::calloop_wayland_source::WaylandSource,
    registry::RegistryState,
    shell::{
        WaylandSurface,
        wlr_layer::{Anchor, KeyboardInteractivity, Layer, LayerShell},
    },
    shm::Shm,
};
use std::io::BufRead;
use std::path::PathBuf;
use std::thread;
use wayland_client::{Connection, globals::registry_queue_init};

use super::state::WaylandState;
use crate::{config::Config, script};

/// Consecutive failed renders tolerated before giving up.
const MAX_RENDER_FAILURES: u32 = 10;

/// Wayland overlay host.
pub struct WaylandBackend {
    config: Config,
    script: Option<PathBuf>,
}

impl WaylandBackend {
    pub fn new(config: Config, script: Option<PathBuf>) -> Self {
        Self { config, script }
    }

    pub fn run(self) -> Result<()> {
        info!("Starting Wayland backend");
        let Self {
            config,
            script: script_path,
        } = self;

        let conn =
            Connection::connect_to_env().context("Failed to connect to Wayland compositor")?;
        debug!("Connected to Wayland display");

        let (globals, event_queue) =
            registry_queue_init(&conn).context("Failed to initialize Wayland registry")?;
        let qh = event_queue.handle();

        let compositor_state =
            CompositorState::bind(&globals, &qh).context("wl_compositor not available")?;
        let layer_shell =
            LayerShell::bind(&globals, &qh).context("zwlr_layer_shell_v1 not available")?;
        let shm = Shm::bind(&globals, &qh).context("wl_shm not available")?;
        let output_state = OutputState::new(&globals, &qh);
        let registry_state = RegistryState::new(&globals);
        debug!("Bound compositor, layer shell and shm globals");

        debug!("  Buffer count: {}", config.performance.buffer_count);
        debug!("  VSync: {}", config.performance.enable_vsync);
        let exit_on_eof = config.overlay.exit_on_eof;

        let mut state = WaylandState::new(
            registry_state,
            compositor_state,
            layer_shell,
            shm,
            output_state,
            config,
        );

        info!("Creating layer shell surface");
        let wl_surface = state.compositor_state.create_surface(&qh);
        let layer_surface = state.layer_shell.create_layer_surface(
            &qh,
            wl_surface,
            Layer::Overlay,
            Some("wayhud"),
            None,
        );
        layer_surface.set_anchor(Anchor::all());
        layer_surface.set_keyboard_interactivity(KeyboardInteractivity::None);
        layer_surface.set_size(0, 0);
        layer_surface.set_exclusive_zone(-1);

        // An empty input region lets every pointer event fall through.
        let region =
            Region::new(&state.compositor_state).context("Failed to create input region")?;
        layer_surface
            .wl_surface()
            .set_input_region(Some(region.wl_region()));
        layer_surface.commit();
        state.surface.set_layer_surface(layer_surface);

        let mut event_loop: EventLoop<WaylandState> =
            EventLoop::try_new().context("Failed to create event loop")?;
        let loop_handle = event_loop.handle();

        WaylandSource::new(conn.clone(), event_queue)
            .insert(loop_handle.clone())
            .map_err(|err| anyhow!("Failed to insert Wayland source: {}", err.error))?;

        let (sender, lines) = channel::channel::<String>();
        loop_handle
            .insert_source(lines, move |event, _, state: &mut WaylandState| match event {
                Event::Msg(line) => state.handle_script_line(&line),
                Event::Closed => {
                    info!("Script input ended after {} lines", state.lines_read);
                    if exit_on_eof {
                        state.should_exit = true;
                    }
                }
            })
            .map_err(|err| anyhow!("Failed to insert script source: {}", err.error))?;
        spawn_script_reader(script::open(script_path.as_deref())?, sender)?;

        let mut consecutive_render_failures = 0u32;
        while !state.should_exit {
            event_loop
                .dispatch(None, &mut state)
                .context("Event loop dispatch failed")?;

            if !state.can_render() {
                continue;
            }
            let Some(token) = state.hud.take_due_frame() else {
                continue;
            };
            match state.render(&qh, token) {
                Ok(()) => consecutive_render_failures = 0,
                Err(e) => {
                    consecutive_render_failures += 1;
                    warn!(
                        "Rendering error (attempt {}/{}): {}",
                        consecutive_render_failures, MAX_RENDER_FAILURES, e
                    );
                    if consecutive_render_failures >= MAX_RENDER_FAILURES {
                        return Err(e.context(format!(
                            "Too many consecutive render failures ({})",
                            consecutive_render_failures
                        )));
                    }
                }
            }
        }

        info!("Wayland backend exiting");
        Ok(())
    }
}

/// Reads script lines on a helper thread so the event loop never blocks on input.
///
/// The channel closes when the reader hits end of input or a read error.
fn spawn_script_reader(
    reader: Box<dyn BufRead + Send>,
    sender: channel::Sender<String>,
) -> Result<()> {
    thread::Builder::new()
        .name("wayhud-script".into())
        .spawn(move || {
            for line in reader.lines() {
                match line {
                    Ok(line) => {
                        if sender.send(line).is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        warn!("Failed to read script input: {}", err);
                        break;
                    }
                }
            }
        })
        .context("Failed to spawn script reader thread")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::time::Duration;

    #[test]
    fn script_reader_feeds_the_event_loop_then_closes() {
        let mut event_loop: EventLoop<(Vec<String>, bool)> = EventLoop::try_new().unwrap();
        let (sender, receiver) = channel::channel::<String>();
        event_loop
            .handle()
            .insert_source(receiver, |event, _, seen: &mut (Vec<String>, bool)| {
                match event {
                    Event::Msg(line) => seen.0.push(line),
                    Event::Closed => seen.1 = true,
                }
            })
            .map_err(|err| err.error)
            .unwrap();

        spawn_script_reader(Box::new(Cursor::new("first\nsecond\n")), sender).unwrap();
        let mut seen = (Vec::new(), false);
        for _ in 0..50 {
            if seen.1 {
                break;
            }
            event_loop
                .dispatch(Some(Duration::from_millis(100)), &mut seen)
                .unwrap();
        }
        assert!(seen.1, "channel never closed");
        assert_eq!(seen.0, ["first", "second"]);
    }
}
