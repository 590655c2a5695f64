use serde::{Deserialize, Serialize};

use crate::constants::{
    FOCAL_LENGTH_MAX, FOCAL_LENGTH_MIN, FRAME_WINDOW, MIN_DRAG_LENGTH, ORBIT_RATE, SCULPT_RATE,
    SMOOTH_SCULPT_RATE, ZOOM_STEP,
};
use crate::error::ConfigError;

/// Pointer-driven camera and sculpt rates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Radians of orbit per pixel of drag.
    pub orbit_rate: f32,
    /// Sculpt strength per second, single button.
    pub sculpt_rate: f32,
    /// Sculpt strength per second, both buttons (smoothing).
    pub smooth_sculpt_rate: f32,
    pub zoom_step: f32,
    pub focal_min: f32,
    pub focal_max: f32,
    pub min_drag_length: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            orbit_rate: ORBIT_RATE,
            sculpt_rate: SCULPT_RATE,
            smooth_sculpt_rate: SMOOTH_SCULPT_RATE,
            zoom_step: ZOOM_STEP,
            focal_min: FOCAL_LENGTH_MIN,
            focal_max: FOCAL_LENGTH_MAX,
            min_drag_length: MIN_DRAG_LENGTH,
        }
    }
}

/// Host-level viewer configuration, loaded from RON.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub interaction: InteractionConfig,
    /// Frame durations kept for the rate display.
    pub frame_window: usize,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            interaction: InteractionConfig::default(),
            frame_window: FRAME_WINDOW,
        }
    }
}

impl ViewerConfig {
    /// Parse and validate a RON config. Missing fields take their defaults.
    pub fn from_ron_str(ron_str: &str) -> Result<Self, ConfigError> {
        let options = ron::Options::default();
        let config: ViewerConfig = options
            .from_str(ron_str)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse, or log a warning and fall back to defaults.
    pub fn from_ron_str_or_default(ron_str: &str) -> Self {
        match Self::from_ron_str(ron_str) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("{e}; using default viewer config");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let i = &self.interaction;
        if self.frame_window == 0 {
            return Err(ConfigError::Invalid("frame_window must be at least 1".into()));
        }
        if !(i.focal_min > 0.0 && i.focal_min < i.focal_max) {
            return Err(ConfigError::Invalid(format!(
                "focal range [{}, {}] is empty or non-positive",
                i.focal_min, i.focal_max
            )));
        }
        let rates = [
            ("orbit_rate", i.orbit_rate),
            ("sculpt_rate", i.sculpt_rate),
            ("smooth_sculpt_rate", i.smooth_sculpt_rate),
            ("zoom_step", i.zoom_step),
            ("min_drag_length", i.min_drag_length),
        ];
        for (name, value) in rates {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!("{name} must be >= 0, got {value}")));
            }
        }
        Ok(())
    }
}
