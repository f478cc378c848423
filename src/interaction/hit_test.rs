use crate::core::cone::snap_to_nearest_anchor;
use crate::core::radial::RadialScale;
use crate::core::types::{PlotArea, ScreenPoint};

use super::{PointerDatum, ResolvedPointerDatum};

/// Maps a local pointer position to the datum under it.
///
/// Implementations are rebuilt whenever the dataset or layout changes, so the
/// pointer resolver never holds geometry of its own.
pub trait HitTester {
    fn hit_test(&self, local: ScreenPoint) -> Option<ResolvedPointerDatum>;
}

/// Nearest index of `len` evenly spaced samples across `plot`.
///
/// `index = round(fraction * (len - 1))` clamped to `[0, len - 1]`, where
/// `fraction = (x - plot.left) / plot.width`. Pointers left or right of the
/// plot resolve to `None`.
#[must_use]
pub fn resolve_series_index(x: f64, plot: PlotArea, len: usize) -> Option<usize> {
    if len == 0 || !x.is_finite() {
        return None;
    }
    let fraction = plot.fraction_x(x);
    if !(0.0..=1.0).contains(&fraction) {
        return None;
    }
    Some(index_for_fraction(fraction, len))
}

fn index_for_fraction(fraction: f64, len: usize) -> usize {
    let max_index = len.saturating_sub(1);
    let raw = (fraction * max_index as f64).round();
    (raw.max(0.0) as usize).min(max_index)
}

/// Hit tester for uniformly spaced time series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesHitTester {
    plot: PlotArea,
    points: Vec<ScreenPoint>,
}

impl SeriesHitTester {
    #[must_use]
    pub fn new(plot: PlotArea, points: Vec<ScreenPoint>) -> Self {
        Self { plot, points }
    }
}

impl HitTester for SeriesHitTester {
    fn hit_test(&self, local: ScreenPoint) -> Option<ResolvedPointerDatum> {
        let index = resolve_series_index(local.x, self.plot, self.points.len())?;
        Some(ResolvedPointerDatum {
            datum: PointerDatum::History { index },
            screen_position: self.points[index],
        })
    }
}

/// Hit tester for a history span followed by discrete forecast anchors.
///
/// The left `history_fraction` of the plot resolves to history indices; the
/// remainder is split into equal zones, one per anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastHitTester {
    plot: PlotArea,
    history_fraction: f64,
    history_points: Vec<ScreenPoint>,
    anchors: Vec<(u32, ScreenPoint)>,
}

impl ForecastHitTester {
    #[must_use]
    pub fn new(
        plot: PlotArea,
        history_fraction: f64,
        history_points: Vec<ScreenPoint>,
        anchors: Vec<(u32, ScreenPoint)>,
    ) -> Self {
        Self {
            plot,
            history_fraction: history_fraction.clamp(0.0, 1.0),
            history_points,
            anchors,
        }
    }

    /// Forecast-axis fraction (`0` today, `1` furthest horizon) for a plot fraction.
    #[must_use]
    pub fn future_fraction(&self, plot_fraction: f64) -> f64 {
        let span = 1.0 - self.history_fraction;
        if span <= 0.0 {
            return 1.0;
        }
        ((plot_fraction - self.history_fraction) / span).min(1.0)
    }
}

impl HitTester for ForecastHitTester {
    fn hit_test(&self, local: ScreenPoint) -> Option<ResolvedPointerDatum> {
        if !local.x.is_finite() {
            return None;
        }
        let fraction = self.plot.fraction_x(local.x);
        if !(0.0..=1.0).contains(&fraction) {
            return None;
        }

        if fraction <= self.history_fraction && !self.history_points.is_empty() {
            let within = if self.history_fraction > 0.0 {
                fraction / self.history_fraction
            } else {
                1.0
            };
            let index = index_for_fraction(within, self.history_points.len());
            return Some(ResolvedPointerDatum {
                datum: PointerDatum::History { index },
                screen_position: self.history_points[index],
            });
        }

        let horizons: Vec<u32> = self.anchors.iter().map(|(horizon, _)| *horizon).collect();
        let horizon = snap_to_nearest_anchor(self.future_fraction(fraction), &horizons)?;
        let screen_position = self
            .anchors
            .iter()
            .find(|(h, _)| *h == horizon)
            .map(|(_, point)| *point)?;
        Some(ResolvedPointerDatum {
            datum: PointerDatum::Future { horizon },
            screen_position,
        })
    }
}

/// Hit tester resolving the radar axis sector under the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialHitTester {
    scale: RadialScale,
    reach: f64,
}

impl RadialHitTester {
    /// `reach` is the hit radius in pixels around the center.
    #[must_use]
    pub fn new(scale: RadialScale, reach: f64) -> Self {
        Self { scale, reach }
    }
}

impl HitTester for RadialHitTester {
    fn hit_test(&self, local: ScreenPoint) -> Option<ResolvedPointerDatum> {
        let dx = local.x - self.scale.center.x;
        let dy = local.y - self.scale.center.y;
        if !(dx.hypot(dy) <= self.reach) {
            return None;
        }
        let index = self.scale.sector_at(local)?;
        Some(ResolvedPointerDatum {
            datum: PointerDatum::Category { index },
            screen_position: local,
        })
    }
}
