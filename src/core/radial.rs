use std::f64::consts::{FRAC_PI_2, TAU};

use serde::{Deserialize, Serialize};

use crate::core::types::{PillarScores, ScreenPoint};
use crate::error::{ChartError, ChartResult};

/// Start angle that puts category 0 at "12 o'clock".
pub const TWELVE_O_CLOCK: f64 = -FRAC_PI_2;

/// Maps category indices and values onto a circle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadialScale {
    pub center: ScreenPoint,
    pub radius: f64,
    pub max_value: f64,
    pub total_categories: usize,
    pub angle_offset: f64,
}

impl RadialScale {
    pub fn new(
        center: ScreenPoint,
        radius: f64,
        max_value: f64,
        total_categories: usize,
        angle_offset: f64,
    ) -> ChartResult<Self> {
        if !center.x.is_finite() || !center.y.is_finite() {
            return Err(ChartError::InvalidData(
                "radial center must be finite".to_owned(),
            ));
        }
        if !radius.is_finite() || radius <= 0.0 {
            return Err(ChartError::InvalidData(
                "radial radius must be finite and > 0".to_owned(),
            ));
        }
        if !max_value.is_finite() || max_value <= 0.0 {
            return Err(ChartError::InvalidData(
                "radial max value must be finite and > 0".to_owned(),
            ));
        }
        if total_categories == 0 {
            return Err(ChartError::InvalidData(
                "radial scale needs at least one category".to_owned(),
            ));
        }
        Ok(Self {
            center,
            radius,
            max_value,
            total_categories,
            angle_offset,
        })
    }

    /// Angle of the axis for `index` (fractional indices land between axes).
    #[must_use]
    pub fn angle(self, index: f64) -> f64 {
        self.angle_offset + TAU * index / self.total_categories as f64
    }

    #[must_use]
    pub fn point(self, index: usize, value: f64) -> ScreenPoint {
        self.point_at_angle(self.angle(index as f64), value)
    }

    #[must_use]
    pub fn point_at_angle(self, angle: f64, value: f64) -> ScreenPoint {
        let r = (value / self.max_value) * self.radius;
        ScreenPoint::new(
            self.center.x + r * angle.cos(),
            self.center.y + r * angle.sin(),
        )
    }

    /// Vertices of a pillar polygon with every value floored at `min_value`
    /// so a zero score never collapses its vertex onto the center.
    #[must_use]
    pub fn pillar_vertices(self, scores: &PillarScores, min_value: f64) -> Vec<ScreenPoint> {
        scores
            .ordered()
            .iter()
            .enumerate()
            .map(|(index, score)| {
                let score = if score.is_finite() { *score } else { 0.0 };
                self.point(index, score.max(min_value))
            })
            .collect()
    }

    /// Category whose angular sector contains `point`, or `None` at the center.
    ///
    /// Sectors are centered on each axis and span `TAU / total_categories`.
    #[must_use]
    pub fn sector_at(self, point: ScreenPoint) -> Option<usize> {
        let dx = point.x - self.center.x;
        let dy = point.y - self.center.y;
        if dx == 0.0 && dy == 0.0 {
            return None;
        }
        let step = TAU / self.total_categories as f64;
        let relative = (dy.atan2(dx) - self.angle_offset + step / 2.0).rem_euclid(TAU);
        Some(((relative / step).floor() as usize) % self.total_categories)
    }
}

/// Free-function form of `RadialScale::point`.
#[must_use]
pub fn radial_point(
    index: usize,
    value: f64,
    max_value: f64,
    center: ScreenPoint,
    radius: f64,
    total_categories: usize,
    angle_offset: f64,
) -> ScreenPoint {
    let angle = angle_offset + TAU * index as f64 / total_categories.max(1) as f64;
    let r = (value / max_value) * radius;
    ScreenPoint::new(center.x + r * angle.cos(), center.y + r * angle.sin())
}
