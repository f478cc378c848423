use serde::{Deserialize, Serialize};

/// Upper bound on value-axis ticks before the step is widened.
pub const MAX_VALUE_TICKS: usize = 7;

/// Rounds a raw step to 1, 2, 5 or 10 times its power of ten.
#[must_use]
pub fn nice_step(raw_step: f64) -> f64 {
    if !raw_step.is_finite() || raw_step <= 0.0 {
        return 1.0;
    }
    let magnitude = 10f64.powf(raw_step.log10().floor());
    let normalized = raw_step / magnitude;
    let nice = if normalized < 1.5 {
        1.0
    } else if normalized < 3.5 {
        2.0
    } else if normalized < 7.5 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

fn ticks_with_step(min: f64, max: f64, step: f64) -> Vec<f64> {
    let first = (min / step).ceil();
    let mut ticks = Vec::new();
    let mut i = 0.0;
    loop {
        let value = (first + i) * step;
        if value > max {
            break;
        }
        ticks.push(value);
        i += 1.0;
    }
    ticks
}

/// Value ticks at a nice step covering `[min, max]`, at most `MAX_VALUE_TICKS`.
#[must_use]
pub fn nice_value_ticks(min: f64, max: f64) -> Vec<f64> {
    if !min.is_finite() || !max.is_finite() || max <= min {
        return Vec::new();
    }
    let mut step = nice_step((max - min) / 5.0);
    let mut ticks = ticks_with_step(min, max, step);
    while ticks.len() > MAX_VALUE_TICKS {
        step = nice_step(step * 2.0);
        ticks = ticks_with_step(min, max, step);
    }
    ticks
}

/// Relative time label on the history side of a forecast chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryMark {
    /// Position along the history span, `0` oldest and `1` today.
    pub fraction: f64,
    pub label: String,
}

/// Month marks for short histories, yearly marks otherwise.
#[must_use]
pub fn history_marks(history_years: f64) -> Vec<HistoryMark> {
    let mut marks = Vec::new();
    if !history_years.is_finite() || history_years <= 0.0 {
        return marks;
    }
    if history_years <= 1.5 {
        for months in [3u32, 6, 9] {
            let fraction = 1.0 - f64::from(months) / (history_years * 12.0);
            if fraction > 0.04 && fraction < 0.96 {
                marks.push(HistoryMark {
                    fraction,
                    label: format!("-{months}M"),
                });
            }
        }
    } else {
        let stride = if history_years <= 4.0 {
            1
        } else {
            ((history_years / 4.0).round() as u32).max(1)
        };
        let mut year = stride;
        while f64::from(year) < history_years {
            marks.push(HistoryMark {
                fraction: 1.0 - f64::from(year) / history_years,
                label: format!("-{year}Y"),
            });
            year += stride;
        }
    }
    marks
}
