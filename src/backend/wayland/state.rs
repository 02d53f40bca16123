// Holds the live Wayland protocol state shared by the event loop and the handler
// submodules; owns the `Hud` and paints its frames into shm buffers.
use anyhow::{Context, Result};
use log::debug;
use smithay_client_toolkit::{
    compositor::CompositorState, output::OutputState, registry::RegistryState,
    shell::{WaylandSurface, wlr_layer::LayerShell}, shm::Shm,
};
use wayland_client::{QueueHandle, protocol::wl_shm};

use crate::{
    config::Config,
    draw::CairoSurface,
    hud::{FrameToken, Hud},
    script,
};

use super::surface::SurfaceState;

/// Internal Wayland state shared across modules.
pub(super) struct WaylandState {
    // Wayland protocol objects
    pub(super) registry_state: RegistryState,
    pub(super) compositor_state: CompositorState,
    pub(super) layer_shell: LayerShell,
    pub(super) shm: Shm,
    pub(super) output_state: OutputState,

    // Surface and buffer management
    pub(super) surface: SurfaceState,

    pub(super) config: Config,
    pub(super) hud: Hud,

    /// Script lines received so far, for error messages
    pub(super) lines_read: usize,
    pub(super) should_exit: bool,
}

impl WaylandState {
    pub(super) fn new(
        registry_state: RegistryState,
        compositor_state: CompositorState,
        layer_shell: LayerShell,
        shm: Shm,
        output_state: OutputState,
        config: Config,
    ) -> Self {
        let hud = Hud::from_config(&config);
        Self {
            registry_state,
            compositor_state,
            layer_shell,
            shm,
            output_state,
            surface: SurfaceState::new(),
            config,
            hud,
            lines_read: 0,
            should_exit: false,
        }
    }

    /// Feeds one script line to the hud; bad lines are logged and skipped.
    pub(super) fn handle_script_line(&mut self, line: &str) {
        self.lines_read += 1;
        if let Err(err) = script::execute_line(&mut self.hud, self.lines_read, line) {
            log::warn!("{}", err);
        }
    }

    /// Pushes the surface geometry into the hud's viewport.
    pub(super) fn sync_viewport(&mut self) {
        self.hud.resize(self.surface.width(), self.surface.height());
        self.hud
            .set_device_pixel_ratio(f64::from(self.surface.buffer_scale()));
    }

    /// Whether the owed frame may be painted now.
    ///
    /// With vsync, painting waits for the previous frame callback.
    pub(super) fn can_render(&self) -> bool {
        self.surface.is_configured()
            && self.hud.due_frame().is_some()
            && (!self.surface.frame_callback_pending() || !self.config.performance.enable_vsync)
    }

    /// Replays the hud into a fresh shm buffer and commits it.
    pub(super) fn render(&mut self, qh: &QueueHandle<Self>, token: FrameToken) -> Result<()> {
        debug!("=== RENDER START ===");
        let buffer_count = self.config.performance.buffer_count as usize;
        let (width, height) = self.surface.buffer_size();

        let (buffer, canvas) = {
            let pool = self.surface.ensure_pool(&self.shm, buffer_count)?;
            pool.create_buffer(
                width as i32,
                height as i32,
                (width * 4) as i32,
                wl_shm::Format::Argb8888,
            )
            .context("Failed to create buffer")?
        };

        // SAFETY: `canvas` is a live SlotPool slice of exactly width * height * 4
        // bytes in ARGB32 layout with stride width * 4. The Cairo surface and
        // context are dropped before the buffer is attached, so Cairo never
        // touches the memory after it is handed to the compositor.
        let cairo_surface = unsafe {
            cairo::ImageSurface::create_for_data_unsafe(
                canvas.as_mut_ptr(),
                cairo::Format::ARgb32,
                width as i32,
                height as i32,
                (width * 4) as i32,
            )
            .context("Failed to create Cairo surface")?
        };
        let ctx = cairo::Context::new(&cairo_surface).context("Failed to create Cairo context")?;

        let painted = {
            let mut surface = CairoSurface::new(&ctx);
            self.hud.run_frame(token, &mut surface)
        };
        if !painted {
            debug!("Frame {:?} was superseded; nothing painted", token);
        }

        cairo_surface.flush();
        drop(ctx);
        drop(cairo_surface);

        let wl_surface = self
            .surface
            .layer_surface()
            .context("Layer surface not created")?
            .wl_surface()
            .clone();
        wl_surface.set_buffer_scale(self.surface.buffer_scale());
        wl_surface.attach(Some(buffer.wl_buffer()), 0, 0);
        wl_surface.damage_buffer(0, 0, width as i32, height as i32);

        if self.config.performance.enable_vsync {
            wl_surface.frame(qh, wl_surface.clone());
            self.surface.set_frame_callback_pending(true);
        }

        wl_surface.commit();
        debug!("=== RENDER COMPLETE ===");
        Ok(())
    }
}
