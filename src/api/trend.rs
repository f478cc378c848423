use serde::{Deserialize, Serialize};

/// Direction of a change between two consecutive scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Up,
    Down,
    Flat,
}

impl TrendDirection {
    #[must_use]
    pub fn of(delta: f64) -> Self {
        if delta > 0.0 {
            TrendDirection::Up
        } else if delta < 0.0 {
            TrendDirection::Down
        } else {
            TrendDirection::Flat
        }
    }

    /// Triangle glyph drawn next to a delta; flat changes have none.
    #[must_use]
    pub const fn indicator(self) -> &'static str {
        match self {
            TrendDirection::Up => "▲",
            TrendDirection::Down => "▼",
            TrendDirection::Flat => "",
        }
    }
}

/// Signed change of a score versus a reference score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreDelta {
    pub value: f64,
    pub direction: TrendDirection,
}

impl ScoreDelta {
    #[must_use]
    pub fn between(previous: f64, current: f64) -> Self {
        let value = current - previous;
        Self {
            value,
            direction: TrendDirection::of(value),
        }
    }

    #[must_use]
    pub fn flat() -> Self {
        Self {
            value: 0.0,
            direction: TrendDirection::Flat,
        }
    }

    /// Pill text such as `▲ 3 pts` or `▼ 2 pts`; flat deltas read `0 pts`.
    #[must_use]
    pub fn pill_label(self) -> String {
        let magnitude = self.value.abs().round();
        match self.direction {
            TrendDirection::Flat => format!("{magnitude} pts"),
            direction => format!("{} {magnitude} pts", direction.indicator()),
        }
    }

    /// Compact inline form such as `▲3pts`, used next to the last chart point.
    #[must_use]
    pub fn compact_label(self) -> String {
        let magnitude = self.value.abs().round();
        format!("{}{magnitude}pts", self.direction.indicator())
    }
}
