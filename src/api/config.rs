use std::f64::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

use crate::core::{CurveTuning, LabelLayoutConfig};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{PointerConfig, ReleasePolicy};

/// Tunable constants shared by every chart controller.
///
/// Serializable so hosts can persist and load a chart setup without inventing
/// an ad-hoc format. Every field falls back to its default when absent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartStyleConfig {
    #[serde(default = "default_radar_tension")]
    pub radar_tension: f64,
    #[serde(default = "default_line_tension")]
    pub line_tension: f64,
    /// Padding applied to both ends of the fan chart price domain.
    #[serde(default = "default_domain_padding_ratio")]
    pub domain_padding_ratio: f64,
    #[serde(default = "default_factor_padding_ratio")]
    pub factor_padding_ratio: f64,
    /// Start angle of the first radar axis; `-PI/2` is twelve o'clock.
    #[serde(default = "default_angle_offset_rad")]
    pub angle_offset_rad: f64,
    /// Floor applied to radar values so a zero never collapses onto the center.
    #[serde(default = "default_radar_min_value")]
    pub radar_min_value: f64,
    #[serde(default = "default_radar_max_value")]
    pub radar_max_value: f64,
    #[serde(default)]
    pub label_layout: LabelLayoutConfig,
    #[serde(default = "default_touch_release_delay_ms")]
    pub touch_release_delay_ms: f64,
    #[serde(default = "default_max_history_points")]
    pub max_history_points: usize,
    /// Furthest forecast horizon in years.
    #[serde(default = "default_fan_future_years")]
    pub fan_future_years: u32,
}

impl Default for ChartStyleConfig {
    fn default() -> Self {
        Self {
            radar_tension: default_radar_tension(),
            line_tension: default_line_tension(),
            domain_padding_ratio: default_domain_padding_ratio(),
            factor_padding_ratio: default_factor_padding_ratio(),
            angle_offset_rad: default_angle_offset_rad(),
            radar_min_value: default_radar_min_value(),
            radar_max_value: default_radar_max_value(),
            label_layout: LabelLayoutConfig::default(),
            touch_release_delay_ms: default_touch_release_delay_ms(),
            max_history_points: default_max_history_points(),
            fan_future_years: default_fan_future_years(),
        }
    }
}

impl ChartStyleConfig {
    #[must_use]
    pub fn with_radar_tension(mut self, tension: f64) -> Self {
        self.radar_tension = tension;
        self
    }

    #[must_use]
    pub fn with_line_tension(mut self, tension: f64) -> Self {
        self.line_tension = tension;
        self
    }

    #[must_use]
    pub fn with_label_layout(mut self, label_layout: LabelLayoutConfig) -> Self {
        self.label_layout = label_layout;
        self
    }

    #[must_use]
    pub fn with_touch_release_delay_ms(mut self, delay_ms: f64) -> Self {
        self.touch_release_delay_ms = delay_ms;
        self
    }

    pub fn validate(self) -> ChartResult<Self> {
        self.curve_tuning().validate()?;
        for (name, value) in [
            ("domain_padding_ratio", self.domain_padding_ratio),
            ("factor_padding_ratio", self.factor_padding_ratio),
            ("radar_min_value", self.radar_min_value),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "`{name}` must be finite and >= 0"
                )));
            }
        }
        if !self.angle_offset_rad.is_finite() {
            return Err(ChartError::InvalidData(
                "`angle_offset_rad` must be finite".to_owned(),
            ));
        }
        if !self.radar_max_value.is_finite() || self.radar_max_value <= self.radar_min_value {
            return Err(ChartError::InvalidData(
                "`radar_max_value` must be finite and above `radar_min_value`".to_owned(),
            ));
        }
        if self.max_history_points < 2 {
            return Err(ChartError::InvalidData(
                "`max_history_points` must be >= 2".to_owned(),
            ));
        }
        if self.fan_future_years == 0 {
            return Err(ChartError::InvalidData(
                "`fan_future_years` must be > 0".to_owned(),
            ));
        }
        self.label_layout.validate()?;
        self.pointer_config(ReleasePolicy::default()).validate()?;
        Ok(self)
    }

    #[must_use]
    pub fn curve_tuning(self) -> CurveTuning {
        CurveTuning {
            cyclic_tension: self.radar_tension,
            open_tension: self.line_tension,
        }
    }

    #[must_use]
    pub fn pointer_config(self, release_policy: ReleasePolicy) -> PointerConfig {
        PointerConfig {
            release_policy,
            touch_release_delay_ms: self.touch_release_delay_ms,
        }
    }

    pub fn to_json_pretty(self) -> ChartResult<String> {
        serde_json::to_string_pretty(&self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize style config: {e}")))
    }

    /// Parses and validates a config; absent fields take their defaults.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse style config: {e}")))?;
        config.validate()
    }
}

fn default_radar_tension() -> f64 {
    0.35
}

fn default_line_tension() -> f64 {
    0.30
}

fn default_domain_padding_ratio() -> f64 {
    0.11
}

fn default_factor_padding_ratio() -> f64 {
    0.15
}

fn default_angle_offset_rad() -> f64 {
    -FRAC_PI_2
}

fn default_radar_min_value() -> f64 {
    2.0
}

fn default_radar_max_value() -> f64 {
    100.0
}

fn default_touch_release_delay_ms() -> f64 {
    800.0
}

fn default_max_history_points() -> usize {
    200
}

fn default_fan_future_years() -> u32 {
    5
}
