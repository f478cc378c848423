//! Curve fitting from ordered screen-space points to path geometry.
//!
//! Both fitters estimate the tangent at each vertex from its neighbors
//! (`p2 - p0`) and scale it by a shared tension, which is the Catmull-Rom
//! construction expressed as cubic Bezier control points:
//!
//! ```text
//! ctrl1 = p1 + (p2 - p0) * tension
//! ctrl2 = p2 - (p3 - p1) * tension
//! ```
//!
//! Tension comes from `CurveTuning` so every chart draws with the same
//! smoothness instead of a per-call-site constant.

use serde::{Deserialize, Serialize};

use crate::core::path::PathData;
use crate::core::types::ScreenPoint;
use crate::error::{ChartError, ChartResult};

/// Smoothness constants shared by all charts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveTuning {
    /// Tension for closed radar polygons.
    pub cyclic_tension: f64,
    /// Tension for open time-series lines.
    pub open_tension: f64,
}

impl Default for CurveTuning {
    fn default() -> Self {
        Self {
            cyclic_tension: 0.35,
            open_tension: 0.30,
        }
    }
}

impl CurveTuning {
    pub fn validate(self) -> ChartResult<Self> {
        for (name, value) in [
            ("cyclic_tension", self.cyclic_tension),
            ("open_tension", self.open_tension),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ChartError::InvalidData(format!(
                    "curve `{name}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(self)
    }
}

fn control_points(
    p0: ScreenPoint,
    p1: ScreenPoint,
    p2: ScreenPoint,
    p3: ScreenPoint,
    tension: f64,
) -> (ScreenPoint, ScreenPoint) {
    (
        ScreenPoint::new(
            p1.x + (p2.x - p0.x) * tension,
            p1.y + (p2.y - p0.y) * tension,
        ),
        ScreenPoint::new(
            p2.x - (p3.x - p1.x) * tension,
            p2.y - (p3.y - p1.y) * tension,
        ),
    )
}

/// Closed smooth loop through `points` using wraparound neighbors.
///
/// Emits one cubic segment per vertex (the last one returns to the first
/// point) followed by a close command. Fewer than three points yield an empty
/// path.
#[must_use]
pub fn cyclic_catmull_rom_to_bezier(points: &[ScreenPoint], tension: f64) -> PathData {
    let n = points.len();
    if n < 3 {
        return PathData::empty();
    }

    let mut path = PathData::with_capacity(n + 2);
    path.move_to(points[0]);
    for i in 0..n {
        let p0 = points[(i + n - 1) % n];
        let p1 = points[i];
        let p2 = points[(i + 1) % n];
        let p3 = points[(i + 2) % n];
        let (ctrl1, ctrl2) = control_points(p0, p1, p2, p3, tension);
        path.cubic_to(ctrl1, ctrl2, p2);
    }
    path.close();
    path
}

/// Open smooth curve through `points`, clamped at both ends.
///
/// Boundary vertices act as their own missing neighbor. Exactly two points
/// produce a single straight segment; zero or one point produce an empty path.
#[must_use]
pub fn open_cardinal_spline(points: &[ScreenPoint], tension: f64) -> PathData {
    let n = points.len();
    match n {
        0 | 1 => PathData::empty(),
        2 => polyline(points),
        _ => {
            let mut path = PathData::with_capacity(n);
            path.move_to(points[0]);
            for i in 0..n - 1 {
                let p0 = points[i.saturating_sub(1)];
                let p1 = points[i];
                let p2 = points[i + 1];
                let p3 = points[(i + 2).min(n - 1)];
                let (ctrl1, ctrl2) = control_points(p0, p1, p2, p3, tension);
                path.cubic_to(ctrl1, ctrl2, p2);
            }
            path
        }
    }
}

/// Straight segments through `points`; fewer than two points yield nothing.
#[must_use]
pub fn polyline(points: &[ScreenPoint]) -> PathData {
    if points.len() < 2 {
        return PathData::empty();
    }
    let mut path = PathData::with_capacity(points.len());
    path.move_to(points[0]);
    for point in &points[1..] {
        path.line_to(*point);
    }
    path
}

/// Closes an open line down to `baseline_y` and back to the starting X.
///
/// An empty line stays empty so callers keep rendering an empty state.
#[must_use]
pub fn area_under_curve(line: &PathData, baseline_y: f64, first_x: f64, last_x: f64) -> PathData {
    if line.is_empty() {
        return PathData::empty();
    }
    let mut area = PathData::with_capacity(line.len() + 3);
    area.extend(line);
    area.line_to(ScreenPoint::new(last_x, baseline_y));
    area.line_to(ScreenPoint::new(first_x, baseline_y));
    area.close();
    area
}

/// Scales every point toward `origin` by `progress` (0 = collapsed, 1 = full).
///
/// Reveal animations feed this with an eased progress value so geometry stays
/// independent of frame timing.
#[must_use]
pub fn scale_toward(points: &[ScreenPoint], origin: ScreenPoint, progress: f64) -> Vec<ScreenPoint> {
    let progress = progress.clamp(0.0, 1.0);
    points
        .iter()
        .map(|point| {
            ScreenPoint::new(
                origin.x + (point.x - origin.x) * progress,
                origin.y + (point.y - origin.y) * progress,
            )
        })
        .collect()
}
