//! Configuration type definitions.

use super::enums::ColorSpec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Drawing-related settings.
///
/// These are the values a repaint starts from before any queued setter runs.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DrawingConfig {
    /// Stroke strength after a reset, in logical pixels (valid range: 1.0 - 20.0)
    #[serde(default = "default_strength")]
    pub default_strength: f64,

    /// Font size for text shapes in logical pixels (valid range: 6.0 - 72.0)
    #[serde(default = "default_font_size")]
    pub font_size: f64,

    /// Font family name for text rendering (e.g., "Monospace", "Sans", "JetBrains Mono")
    #[serde(default = "default_font_family")]
    pub font_family: String,

    /// Alpha of polygon and ellipse fills, independent of the global opacity (0.0 - 1.0)
    #[serde(default = "default_fill_alpha")]
    pub fill_alpha: f64,

    /// Font size of annotation labels
    #[serde(default = "default_label_font_size")]
    pub label_font_size: f64,

    /// Font size used when measuring annotation labels for placement
    #[serde(default = "default_label_measure_font_size")]
    pub label_measure_font_size: f64,

    /// Distance between a vertex and its angle label, toward the centroid
    #[serde(default = "default_angle_label_offset")]
    pub angle_label_offset: f64,

    /// Text color of annotation labels
    #[serde(default = "default_label_text_color")]
    pub label_text_color: ColorSpec,

    /// Plate color behind annotation labels
    #[serde(default = "default_label_background")]
    pub label_background: ColorSpec,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            default_strength: default_strength(),
            font_size: default_font_size(),
            font_family: default_font_family(),
            fill_alpha: default_fill_alpha(),
            label_font_size: default_label_font_size(),
            label_measure_font_size: default_label_measure_font_size(),
            angle_label_offset: default_angle_label_offset(),
            label_text_color: default_label_text_color(),
            label_background: default_label_background(),
        }
    }
}

/// Performance tuning options.
///
/// Most users won't need to change these from their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PerformanceConfig {
    /// Number of shm buffers to keep in the pool (valid range: 2 - 4)
    /// - 2 = double buffering (lower memory)
    /// - 3 = triple buffering
    /// - 4 = quad buffering (highest memory)
    #[serde(default = "default_buffer_count")]
    pub buffer_count: u32,

    /// Wait for compositor frame callbacks before repainting
    /// Set to false to repaint as soon as the queue changes
    #[serde(default = "default_enable_vsync")]
    pub enable_vsync: bool,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            buffer_count: default_buffer_count(),
            enable_vsync: default_enable_vsync(),
        }
    }
}

/// Overlay surface behavior.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct OverlayConfig {
    /// Device pixel ratio used until the compositor reports the output scale (>= 1.0)
    #[serde(default = "default_pixel_ratio")]
    pub default_pixel_ratio: f64,

    /// Close the overlay once the script input reaches end of file
    #[serde(default)]
    pub exit_on_eof: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            default_pixel_ratio: default_pixel_ratio(),
            exit_on_eof: false,
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_strength() -> f64 {
    2.0
}

fn default_font_size() -> f64 {
    12.0
}

fn default_font_family() -> String {
    "Monospace".to_string()
}

fn default_fill_alpha() -> f64 {
    0.05
}

fn default_label_font_size() -> f64 {
    8.0
}

fn default_label_measure_font_size() -> f64 {
    9.0
}

fn default_angle_label_offset() -> f64 {
    30.0
}

fn default_label_text_color() -> ColorSpec {
    ColorSpec::Name("white".to_string())
}

fn default_label_background() -> ColorSpec {
    ColorSpec::Name("black".to_string())
}

fn default_buffer_count() -> u32 {
    2
}

fn default_enable_vsync() -> bool {
    true
}

fn default_pixel_ratio() -> f64 {
    1.0
}
