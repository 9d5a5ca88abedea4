//! Tunable constants for node geometry, curve routing and notifications.

use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Size given to a freshly placed node.
pub const DEFAULT_NODE_SIZE: Size = Size::new(250.0, 200.0);
/// Smallest size a node may be resized to.
pub const MIN_NODE_SIZE: Size = Size::new(200.0, 150.0);
/// Height of a node's title bar.
pub const HEADER_HEIGHT: f64 = 40.0;
/// Height of a single column row.
pub const COLUMN_HEIGHT: f64 = 36.0;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Canvas configuration.
///
/// Every field has a default, so a partial JSON document only overrides
/// the values it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Size of a newly placed node.
    pub default_node_size: Size,
    /// Per-dimension floor applied on resize.
    pub min_node_size: Size,
    /// Node title bar height, used for column anchors.
    pub header_height: f64,
    /// Column row height, used for column anchors.
    pub column_height: f64,
    /// Fraction of the horizontal anchor distance for the first control point.
    pub curve_control_near: f64,
    /// Fraction of the horizontal anchor distance for the second control point.
    pub curve_control_far: f64,
    /// Auto-clear delay for duplicate placement warnings.
    pub duplicate_placement_clear_ms: u64,
    /// Auto-clear delay for connection confirmations.
    pub connected_clear_ms: u64,
    /// Auto-clear delay for generic failures (e.g. a bad drag payload).
    pub failure_clear_ms: u64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            default_node_size: DEFAULT_NODE_SIZE,
            min_node_size: MIN_NODE_SIZE,
            header_height: HEADER_HEIGHT,
            column_height: COLUMN_HEIGHT,
            curve_control_near: 0.4,
            curve_control_far: 0.6,
            duplicate_placement_clear_ms: 3000,
            connected_clear_ms: 2000,
            failure_clear_ms: 3000,
        }
    }
}

impl CanvasConfig {
    /// Parse and validate a config from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Check that the metrics describe a usable canvas.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("default_node_size.width", self.default_node_size.width),
            ("default_node_size.height", self.default_node_size.height),
            ("min_node_size.width", self.min_node_size.width),
            ("min_node_size.height", self.min_node_size.height),
            ("header_height", self.header_height),
            ("column_height", self.column_height),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")));
            }
        }

        if self.min_node_size.width > self.default_node_size.width
            || self.min_node_size.height > self.default_node_size.height
        {
            return Err(ConfigError::Invalid(
                "min_node_size must not exceed default_node_size".to_string(),
            ));
        }

        for (name, ratio) in [
            ("curve_control_near", self.curve_control_near),
            ("curve_control_far", self.curve_control_far),
        ] {
            if !(0.0..=1.0).contains(&ratio) {
                return Err(ConfigError::Invalid(format!("{name} must be within [0, 1], got {ratio}")));
            }
        }

        Ok(())
    }

    pub fn duplicate_placement_delay(&self) -> Duration {
        Duration::from_millis(self.duplicate_placement_clear_ms)
    }

    pub fn connected_delay(&self) -> Duration {
        Duration::from_millis(self.connected_clear_ms)
    }

    pub fn failure_delay(&self) -> Duration {
        Duration::from_millis(self.failure_clear_ms)
    }
}
