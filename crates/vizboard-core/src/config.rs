//! Editor configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default minimum zoom level.
pub const DEFAULT_MIN_ZOOM: f64 = 0.1;
/// Default maximum zoom level.
pub const DEFAULT_MAX_ZOOM: f64 = 5.0;
/// Default grid cell size in world units.
pub const DEFAULT_GRID_SIZE: f64 = 20.0;
/// Default alignment snap distance in screen pixels.
pub const ALIGNMENT_SNAP_THRESHOLD: f64 = 4.0;
/// Default overshoot of guide lines past the aligned shapes, in world units.
pub const GUIDE_PADDING: f64 = 8.0;
/// Default minimum spacing between ruler ticks, in screen pixels.
pub const DEFAULT_RULER_SPACING: f64 = 50.0;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Camera limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Minimum allowed zoom level.
    pub min_zoom: f64,
    /// Maximum allowed zoom level.
    pub max_zoom: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
        }
    }
}

/// Snapping behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    /// Whether grid snapping is on. Alignment snapping is always on.
    pub enabled: bool,
    /// Alignment snap distance in screen pixels.
    pub alignment_threshold: f64,
    /// Guide overshoot in world units.
    pub guide_padding: f64,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            alignment_threshold: ALIGNMENT_SNAP_THRESHOLD,
            guide_padding: GUIDE_PADDING,
        }
    }
}

/// Grid and ruler settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Grid cell size in world units.
    pub size: f64,
    /// Minimum spacing between ruler ticks in screen pixels.
    pub ruler_min_spacing: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_GRID_SIZE,
            ruler_min_spacing: DEFAULT_RULER_SPACING,
        }
    }
}

/// Top-level editor configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub camera: CameraConfig,
    pub snap: SnapConfig,
    pub grid: GridConfig,
}

impl EditorConfig {
    /// Parse and validate a configuration from JSON.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::debug!("Loaded editor config from {}", path.display());
        Ok(config)
    }

    /// Check that all values are usable.
    pub fn validate(&self) -> ConfigResult<()> {
        let CameraConfig { min_zoom, max_zoom } = self.camera;
        if !min_zoom.is_finite() || !max_zoom.is_finite() || min_zoom <= 0.0 {
            return Err(invalid(format!(
                "zoom bounds must be finite and positive, got [{min_zoom}, {max_zoom}]"
            )));
        }
        if min_zoom > max_zoom {
            return Err(invalid(format!(
                "min_zoom {min_zoom} exceeds max_zoom {max_zoom}"
            )));
        }
        if !self.grid.size.is_finite() || self.grid.size <= 0.0 {
            return Err(invalid(format!(
                "grid size must be positive, got {}",
                self.grid.size
            )));
        }
        if !self.snap.alignment_threshold.is_finite() || self.snap.alignment_threshold < 0.0 {
            return Err(invalid(format!(
                "alignment threshold must be non-negative, got {}",
                self.snap.alignment_threshold
            )));
        }
        if !self.snap.guide_padding.is_finite() || self.snap.guide_padding < 0.0 {
            return Err(invalid(format!(
                "guide padding must be non-negative, got {}",
                self.snap.guide_padding
            )));
        }
        if !self.grid.ruler_min_spacing.is_finite() || self.grid.ruler_min_spacing <= 0.0 {
            return Err(invalid(format!(
                "ruler spacing must be positive, got {}",
                self.grid.ruler_min_spacing
            )));
        }
        Ok(())
    }
}

fn invalid(message: String) -> ConfigError {
    log::warn!("Rejected editor config: {}", message);
    ConfigError::Invalid(message)
}
