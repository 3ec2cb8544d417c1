//! Engine tuning: proximity radii and hit-test margins.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Configuration for the interaction engine. All distances are in
/// surface-local pixels.
///
/// Missing JSON keys fall back to the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Radius around a target dot's center that counts as hovering it
    /// while dragging. Default: **20**.
    pub hover_radius: f64,

    /// Radius around an unconnected dot that shows the "drag to connect"
    /// hint while idle. Default: **24**.
    pub hint_radius: f64,

    /// Margin added on every side of a target dot's box for the tolerant
    /// drop test. Default: **12**.
    pub drop_margin: f64,

    /// Width of the invisible stroke around a connection curve that
    /// registers hover. Default: **18** (2px line + 8px on each side).
    pub connection_hit_width: f64,

    /// Max pointer travel between press and release for the gesture to
    /// count as a click. Default: **4**.
    pub click_slop: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hover_radius: 20.0,
            hint_radius: 24.0,
            drop_margin: 12.0,
            connection_hit_width: 18.0,
            click_slop: 4.0,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config object. Arrays and scalars are
    /// rejected.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        if !value.is_object() {
            return Err(ConfigError::Json("config must be a JSON object".to_string()));
        }
        let config: Self =
            serde_json::from_value(value).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let values = [
            ("hoverRadius", self.hover_radius),
            ("hintRadius", self.hint_radius),
            ("dropMargin", self.drop_margin),
            ("connectionHitWidth", self.connection_hit_width),
            ("clickSlop", self.click_slop),
        ];
        for (name, value) in values {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid { name, value });
            }
        }
        Ok(())
    }
}
