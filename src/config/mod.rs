//! Configuration file support for wayhud.
//!
//! This module handles loading and validating user settings from the configuration file
//! located at `~/.config/wayhud/config.toml`. Settings include drawing defaults,
//! annotation label styling, buffer tuning and overlay behavior.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod enums;
pub mod types;

pub use enums::ColorSpec;
pub use types::{DrawingConfig, OverlayConfig, PerformanceConfig};

use anyhow::{Context, Result};
use log::{debug, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure containing all user settings.
///
/// This is the root configuration type that gets deserialized from the TOML file.
/// All fields have sensible defaults and will use those if not specified in the config file.
///
/// # Example TOML
/// ```toml
/// [drawing]
/// default_strength = 2.0
/// font_size = 12.0
/// font_family = "Monospace"
/// label_background = "#111827"
///
/// [performance]
/// buffer_count = 3
/// enable_vsync = true
///
/// [overlay]
/// exit_on_eof = true
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Drawing defaults (stroke strength, fonts, label styling)
    #[serde(default)]
    pub drawing: DrawingConfig,

    /// Performance tuning options
    #[serde(default)]
    pub performance: PerformanceConfig,

    /// Overlay surface behavior
    #[serde(default)]
    pub overlay: OverlayConfig,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped to the nearest valid value and a warning is logged.
    ///
    /// Validated ranges:
    /// - `default_strength`: 1.0 - 20.0
    /// - `font_size`: 6.0 - 72.0
    /// - `fill_alpha`: 0.0 - 1.0
    /// - `label_font_size`, `label_measure_font_size`: 4.0 - 72.0
    /// - `buffer_count`: 2 - 4
    /// - `default_pixel_ratio`: >= 1.0
    pub fn validate_and_clamp(&mut self) {
        // Strength: 1.0 - 20.0
        if !(1.0..=20.0).contains(&self.drawing.default_strength) {
            log::warn!(
                "Invalid default_strength {:.1}, clamping to 1.0-20.0 range",
                self.drawing.default_strength
            );
            self.drawing.default_strength = clamp_or(self.drawing.default_strength, 1.0, 20.0);
        }

        // Font size: 6.0 - 72.0
        if !(6.0..=72.0).contains(&self.drawing.font_size) {
            log::warn!(
                "Invalid font_size {:.1}, clamping to 6.0-72.0 range",
                self.drawing.font_size
            );
            self.drawing.font_size = clamp_or(self.drawing.font_size, 6.0, 72.0);
        }

        if !(0.0..=1.0).contains(&self.drawing.fill_alpha) {
            log::warn!(
                "Invalid fill_alpha {:.3}, clamping to 0.0-1.0",
                self.drawing.fill_alpha
            );
            self.drawing.fill_alpha = clamp_or(self.drawing.fill_alpha, 0.0, 1.0);
        }

        for (name, size) in [
            ("label_font_size", &mut self.drawing.label_font_size),
            (
                "label_measure_font_size",
                &mut self.drawing.label_measure_font_size,
            ),
        ] {
            if !(4.0..=72.0).contains(&*size) {
                log::warn!("Invalid {} {:.1}, clamping to 4.0-72.0 range", name, size);
                *size = clamp_or(*size, 4.0, 72.0);
            }
        }

        if !self.drawing.angle_label_offset.is_finite() {
            log::warn!(
                "Invalid angle_label_offset {}, falling back to 30",
                self.drawing.angle_label_offset
            );
            self.drawing.angle_label_offset = 30.0;
        }

        if self.drawing.font_family.trim().is_empty() {
            log::warn!("Empty font_family, falling back to 'Monospace'");
            self.drawing.font_family = "Monospace".to_string();
        }

        // Buffer count: 2 - 4
        if !(2..=4).contains(&self.performance.buffer_count) {
            log::warn!(
                "Invalid buffer_count {}, clamping to 2-4 range",
                self.performance.buffer_count
            );
            self.performance.buffer_count = self.performance.buffer_count.clamp(2, 4);
        }

        if self.overlay.default_pixel_ratio.is_nan() || self.overlay.default_pixel_ratio < 1.0 {
            log::warn!(
                "Invalid default_pixel_ratio {:.2}, using 1.0",
                self.overlay.default_pixel_ratio
            );
            self.overlay.default_pixel_ratio = 1.0;
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/wayhud/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("wayhud");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default location, or returns defaults if not found.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The config directory path cannot be determined
    /// - The file exists but cannot be read
    /// - The file exists but contains invalid TOML syntax
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Loads and validates configuration from an explicit path.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        // Validate and clamp values to acceptable ranges
        config.validate_and_clamp();

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// JSON schema of the configuration file, for editor tooling.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }
}

/// Clamps `value` into `min..=max`, mapping NaN to `min`.
fn clamp_or(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_sections_use_defaults() {
        let config: Config = toml::from_str("[drawing]\nfont_size = 14.0\n").unwrap();
        assert_eq!(config.drawing.font_size, 14.0);
        assert_eq!(config.drawing.default_strength, 2.0);
        assert_eq!(config.drawing.fill_alpha, 0.05);
        assert_eq!(config.performance.buffer_count, 2);
        assert!(!config.overlay.exit_on_eof);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let mut config: Config = toml::from_str(
            "[drawing]\ndefault_strength = 0.0\nfill_alpha = 3.0\nfont_family = \" \"\n\
             [performance]\nbuffer_count = 9\n[overlay]\ndefault_pixel_ratio = 0.5\n",
        )
        .unwrap();
        config.validate_and_clamp();
        assert_eq!(config.drawing.default_strength, 1.0);
        assert_eq!(config.drawing.fill_alpha, 1.0);
        assert_eq!(config.drawing.font_family, "Monospace");
        assert_eq!(config.performance.buffer_count, 4);
        assert_eq!(config.overlay.default_pixel_ratio, 1.0);
    }

    #[test]
    fn load_from_reads_and_validates_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[drawing]\nlabel_background = [10, 20, 30]\nfont_size = 100.0").unwrap();
        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.drawing.font_size, 72.0);
        assert_eq!(config.drawing.label_background, ColorSpec::Rgb([10, 20, 30]));
    }

    #[test]
    fn schema_names_every_section() {
        let schema = serde_json::to_value(Config::json_schema()).unwrap();
        let properties = schema["properties"].as_object().unwrap();
        for section in ["drawing", "performance", "overlay"] {
            assert!(properties.contains_key(section), "missing {section}");
        }
    }
}
