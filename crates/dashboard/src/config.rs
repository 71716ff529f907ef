//! Dashboard configuration.
//!
//! Values are layered: defaults, then an optional JSON file, then environment
//! variables. The binary applies its command-line flags last.

use std::env;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::color::Color;
use crate::heatmap::{
    DEFAULT_SAMPLE_DISTANCE_METERS, HeatmapGradientGenerator, MIN_SAMPLE_DISTANCE_METERS,
    StopAlignment, is_valid_sample_distance,
};

pub const ENV_SAMPLE_DISTANCE: &str = "HEATMAP_SAMPLE_DISTANCE_M";
pub const ENV_STOP_ALIGNMENT: &str = "HEATMAP_STOP_ALIGNMENT";
pub const ENV_DEFAULT_COLOR: &str = "ROUTE_DEFAULT_COLOR";
pub const ENV_HOUR_STRIDE: &str = "SUMMARY_HOUR_STRIDE";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Spacing between heatmap analysis samples, in meters.
    pub sample_distance_meters: f64,
    pub stop_alignment: StopAlignment,
    /// Route color when no speed gradient can be computed.
    pub default_route_color: Color,
    /// Hours per intraday bucket.
    pub hour_stride: u8,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            sample_distance_meters: DEFAULT_SAMPLE_DISTANCE_METERS,
            stop_alignment: StopAlignment::Window,
            default_route_color: crate::color::STEP_COUNT,
            hour_stride: 3,
        }
    }
}

impl DashboardConfig {
    /// Defaults overlaid with environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env()
    }

    /// Reads a JSON config file, then applies environment overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        info!("Loaded config from {}", path.display());
        config.with_env()
    }

    fn with_env(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| env::var(key).ok())
    }

    /// Applies overrides from `lookup` and validates the result.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(raw) = lookup(ENV_SAMPLE_DISTANCE) {
            self.sample_distance_meters = raw.trim().parse().map_err(|e| ConfigError::Invalid {
                key: ENV_SAMPLE_DISTANCE,
                reason: format!("{e}"),
            })?;
        }
        if let Some(raw) = lookup(ENV_STOP_ALIGNMENT) {
            self.stop_alignment = raw
                .trim()
                .parse()
                .map_err(|reason| ConfigError::Invalid {
                    key: ENV_STOP_ALIGNMENT,
                    reason,
                })?;
        }
        if let Some(raw) = lookup(ENV_DEFAULT_COLOR) {
            self.default_route_color =
                Color::from_hex(raw.trim()).map_err(|e| ConfigError::Invalid {
                    key: ENV_DEFAULT_COLOR,
                    reason: e.to_string(),
                })?;
        }
        if let Some(raw) = lookup(ENV_HOUR_STRIDE) {
            self.hour_stride = raw.trim().parse().map_err(|e| ConfigError::Invalid {
                key: ENV_HOUR_STRIDE,
                reason: format!("{e}"),
            })?;
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_valid_sample_distance(self.sample_distance_meters) {
            return Err(ConfigError::Invalid {
                key: "sample_distance_meters",
                reason: format!(
                    "must be at least {MIN_SAMPLE_DISTANCE_METERS}m, got {}",
                    self.sample_distance_meters
                ),
            });
        }
        if self.hour_stride == 0 || self.hour_stride > 24 {
            return Err(ConfigError::Invalid {
                key: "hour_stride",
                reason: format!("must be between 1 and 24, got {}", self.hour_stride),
            });
        }
        Ok(())
    }

    pub fn heatmap_generator(&self) -> HeatmapGradientGenerator {
        HeatmapGradientGenerator::new()
            .with_sample_distance(self.sample_distance_meters)
            .with_alignment(self.stop_alignment)
    }
}
