use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Easing curves used by chart reveal animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Easing {
    Linear,
    /// `1 - (1 - t)^3`, the time-series reveal.
    #[default]
    EaseOutCubic,
    /// `1 - (1 - t)^4`, the radar reveal.
    EaseOutQuart,
}

impl Easing {
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseOutQuart => 1.0 - (1.0 - t).powi(4),
        }
    }
}

/// Frame-clock independent reveal progress.
///
/// Hosts feed elapsed milliseconds from whatever loop they run; geometry
/// consumers only ever see the eased `progress()` in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationDriver {
    duration_ms: f64,
    elapsed_ms: f64,
    easing: Easing,
}

impl AnimationDriver {
    pub fn new(duration_ms: f64, easing: Easing) -> ChartResult<Self> {
        if !duration_ms.is_finite() || duration_ms <= 0.0 {
            return Err(ChartError::InvalidData(
                "animation duration must be finite and > 0".to_owned(),
            ));
        }
        Ok(Self {
            duration_ms,
            elapsed_ms: 0.0,
            easing,
        })
    }

    /// 600 ms ease-out cubic, used for line reveals.
    #[must_use]
    pub fn line_reveal() -> Self {
        Self {
            duration_ms: 600.0,
            elapsed_ms: 0.0,
            easing: Easing::EaseOutCubic,
        }
    }

    /// 700 ms ease-out quartic, used for radar reveals.
    #[must_use]
    pub fn radar_reveal() -> Self {
        Self {
            duration_ms: 700.0,
            elapsed_ms: 0.0,
            easing: Easing::EaseOutQuart,
        }
    }

    /// Adds `delta_ms` of elapsed time and returns the eased progress.
    pub fn advance(&mut self, delta_ms: f64) -> f64 {
        if delta_ms.is_finite() && delta_ms > 0.0 {
            self.elapsed_ms = (self.elapsed_ms + delta_ms).min(self.duration_ms);
        }
        self.progress()
    }

    #[must_use]
    pub fn progress(&self) -> f64 {
        self.easing.apply(self.elapsed_ms / self.duration_ms)
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }

    /// Restarts from zero, e.g. after a dataset change.
    pub fn restart(&mut self) {
        self.elapsed_ms = 0.0;
    }
}
