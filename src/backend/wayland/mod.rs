// Wayland overlay host using wlr-layer-shell.
mod backend;
mod handlers;
mod state;
mod surface;

pub use backend::WaylandBackend;
