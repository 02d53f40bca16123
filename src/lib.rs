//! Diagnostic geometry overlay.
//!
//! [`hud::Hud`] queues loosely typed draw calls and replays them into a
//! [`draw::Surface`] once per refresh. The binary drives it from a JSON-lines
//! script, either onto a click-through Wayland overlay or into a PNG.

pub mod backend;
pub mod config;
pub mod draw;
pub mod hud;
pub mod script;

pub use config::Config;
pub use hud::Hud;
