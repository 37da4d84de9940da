//! Tool configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. User values are
//! merged over stock defaults, so a config file only needs the keys it wants
//! to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [thumbnail]
//! width = 640               # Preview width in pixels; height follows the aspect ratio
//! sharpen = false           # Also sharpen after downscaling, using [sharpening]
//!
//! [sharpening]
//! enabled = true            # Sharpen layers and the flattened mosaic
//! sigma = 0.5               # Unsharp-mask blur radius
//! threshold = 0             # Minimum difference to sharpen (0 = all pixels)
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{Sharpening, THUMBNAIL_WIDTH, ThumbnailConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MosaicConfig {
    /// Preview thumbnail settings.
    pub thumbnail: ThumbnailSection,
    /// Unsharp-mask settings for layers and the mosaic.
    pub sharpening: SharpeningConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl MosaicConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.thumbnail.width == 0 {
            return Err(ConfigError::Validation(
                "thumbnail.width must be greater than 0".into(),
            ));
        }
        if !self.sharpening.sigma.is_finite() || self.sharpening.sigma <= 0.0 {
            return Err(ConfigError::Validation(
                "sharpening.sigma must be a positive number".into(),
            ));
        }
        if self.sharpening.threshold < 0 {
            return Err(ConfigError::Validation(
                "sharpening.threshold must not be negative".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Sharpening to apply, or `None` when disabled.
    pub fn sharpening(&self) -> Option<Sharpening> {
        self.sharpening.enabled.then_some(Sharpening {
            sigma: self.sharpening.sigma,
            threshold: self.sharpening.threshold,
        })
    }

    /// Thumbnail settings for [`create_thumbnail`](crate::imaging::create_thumbnail).
    ///
    /// The downscale is sharpened only when both `thumbnail.sharpen` and
    /// `sharpening.enabled` are set.
    pub fn thumbnail_config(&self) -> ThumbnailConfig {
        ThumbnailConfig {
            width: self.thumbnail.width,
            sharpening: self.sharpening().filter(|_| self.thumbnail.sharpen),
        }
    }
}

/// Preview thumbnail settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailSection {
    /// Output width in pixels.
    pub width: u32,
    /// Sharpen the downscaled preview.
    pub sharpen: bool,
}

impl Default for ThumbnailSection {
    fn default() -> Self {
        Self {
            width: THUMBNAIL_WIDTH,
            sharpen: false,
        }
    }
}

/// Unsharp-mask settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SharpeningConfig {
    pub enabled: bool,
    pub sigma: f32,
    pub threshold: i32,
}

impl Default for SharpeningConfig {
    fn default() -> Self {
        let light = Sharpening::light();
        Self {
            enabled: true,
            sigma: light.sigma,
            threshold: light.threshold,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel layer workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(MosaicConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(dir: &Path) -> Result<MosaicConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match load_raw_config(dir)? {
        Some(overlay) => merge_toml(base, overlay),
        None => base,
    };
    let config: MosaicConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Banner Mosaic Configuration
# ===========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Preview thumbnail
# ---------------------------------------------------------------------------
[thumbnail]
# Output width in pixels. Height follows the mosaic (960x884) or, for a
# standalone image, the image's own aspect ratio.
width = 640
# Sharpen again after downscaling, with the [sharpening] settings below.
# The mosaic itself is already sharpened, so this is off by default.
sharpen = false

# ---------------------------------------------------------------------------
# Sharpening
# ---------------------------------------------------------------------------
[sharpening]
# Unsharp mask applied to every resized layer and to the flattened mosaic.
enabled = true
sigma = 0.5
threshold = 0

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel layer workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
