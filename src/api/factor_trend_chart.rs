use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::config::ChartStyleConfig;
use crate::api::render_style::ChartPalette;
use crate::core::curves::{area_under_curve, polyline};
use crate::core::path::PathData;
use crate::core::scale::{LinearScale, ScaleDomain, index_x};
use crate::core::types::{Insets, PlotArea, ScreenPoint, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{PointerResolver, PointerState, ReleasePolicy, SeriesHitTester};
use crate::render::{
    CirclePrimitive, Color, LinePrimitive, PathPrimitive, RenderFrame, Renderer, TextHAlign,
    TextPrimitive,
};

pub const FACTOR_VIEWPORT: Viewport = Viewport {
    width: 420,
    height: 140,
};
pub const FACTOR_INSETS: Insets = Insets::new(16.0, 12.0, 28.0, 40.0);
/// Number of intervals between Y labels (five labels).
pub const FACTOR_Y_INTERVALS: usize = 4;
/// Every n-th period gets an X label; the last period always does.
pub const FACTOR_X_LABEL_STRIDE: usize = 4;
/// Horizontal tooltip anchor is kept within these canvas percentages.
pub const TOOLTIP_LEFT_PCT_RANGE: (f64, f64) = (12.0, 88.0);
/// Peer bar scale headroom over the largest value.
pub const PEER_BAR_HEADROOM: f64 = 1.1;

/// One reported value of a factor, e.g. quarterly net margin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorObservation {
    pub period: String,
    pub value: f64,
}

impl FactorObservation {
    #[must_use]
    pub fn new(period: impl Into<String>, value: f64) -> Self {
        Self {
            period: period.into(),
            value,
        }
    }
}

/// Drill-down series for one factor with optional reference levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorSeries {
    pub name: String,
    #[serde(default)]
    pub unit: String,
    pub observations: Vec<FactorObservation>,
    #[serde(default)]
    pub avg_3y: Option<f64>,
    #[serde(default)]
    pub sector_median: Option<f64>,
}

impl FactorSeries {
    #[must_use]
    pub fn new(name: impl Into<String>, unit: impl Into<String>, observations: Vec<FactorObservation>) -> Self {
        Self {
            name: name.into(),
            unit: unit.into(),
            observations,
            avg_3y: None,
            sector_median: None,
        }
    }

    #[must_use]
    pub fn with_avg_3y(mut self, value: f64) -> Self {
        self.avg_3y = Some(value);
        self
    }

    #[must_use]
    pub fn with_sector_median(mut self, value: f64) -> Self {
        self.sector_median = Some(value);
        self
    }

    /// `25.3%` style value with the series unit appended.
    #[must_use]
    pub fn format_value(&self, value: f64) -> String {
        format!("{value}{}", self.unit)
    }

    fn validate(&self) -> ChartResult<()> {
        if let Some(bad) = self.observations.iter().find(|o| !o.value.is_finite()) {
            return Err(ChartError::InvalidData(format!(
                "factor `{}` has a non-finite value for {}",
                self.name, bad.period
            )));
        }
        for (label, reference) in [("avg_3y", self.avg_3y), ("sector_median", self.sector_median)] {
            if reference.is_some_and(|v| !v.is_finite()) {
                return Err(ChartError::InvalidData(format!(
                    "factor `{}` has a non-finite `{label}`",
                    self.name
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    ThreeYearAverage,
    SectorMedian,
}

/// Horizontal dashed reference level.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceLine {
    pub kind: ReferenceKind,
    pub value: f64,
    pub y: f64,
    /// Legend text, e.g. `3Y avg (25%)`.
    pub legend: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisLabel {
    pub position: f64,
    pub text: String,
    pub index: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FactorTrendGeometry {
    pub plot: PlotArea,
    pub points: Vec<ScreenPoint>,
    pub line: PathData,
    pub area: PathData,
    pub references: Vec<ReferenceLine>,
    pub y_labels: Vec<AxisLabel>,
    pub x_labels: Vec<AxisLabel>,
}

/// Floating tooltip content for the hovered period.
#[derive(Debug, Clone, PartialEq)]
pub struct FactorTooltip {
    pub index: usize,
    pub period: String,
    pub value: f64,
    pub value_label: String,
    /// Tooltip center as a percentage of the canvas width, clamped.
    pub left_pct: f64,
    /// True when the point is close to the top edge and the tooltip drops below it.
    pub below_point: bool,
    pub screen_position: ScreenPoint,
}

/// One row of the peer comparison bars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerBar {
    pub ticker: String,
    pub value: f64,
    /// Bar length as a fraction of the track.
    pub fraction: f64,
    pub is_subject: bool,
}

/// Peer values sorted descending and scaled against the largest value or the
/// sector median, whichever is higher, plus headroom.
///
/// Returns the bars and the sector median's position on the same track.
#[must_use]
pub fn peer_bars(peers: &[(String, f64)], subject: &str, sector_median: f64) -> (Vec<PeerBar>, f64) {
    let max = peers
        .iter()
        .map(|(_, value)| *value)
        .fold(sector_median, f64::max)
        * PEER_BAR_HEADROOM;
    let scale = |value: f64| if max > 0.0 { value / max } else { 0.0 };
    let mut bars: Vec<PeerBar> = peers
        .iter()
        .map(|(ticker, value)| PeerBar {
            ticker: ticker.clone(),
            value: *value,
            fraction: scale(*value),
            is_subject: ticker.eq_ignore_ascii_case(subject),
        })
        .collect();
    bars.sort_by(|a, b| b.value.total_cmp(&a.value));
    (bars, scale(sector_median))
}

/// Straight-segment history of a single factor with reference levels.
#[derive(Debug, Clone)]
pub struct FactorTrendChart {
    config: ChartStyleConfig,
    palette: ChartPalette,
    series: FactorSeries,
    color: Color,
    plot: PlotArea,
    value_scale: LinearScale,
    pointer: PointerResolver,
}

impl FactorTrendChart {
    pub fn new(config: ChartStyleConfig, series: FactorSeries, color: Color) -> ChartResult<Self> {
        let config = config.validate()?;
        color.validate()?;
        series.validate()?;
        let plot = PlotArea::from_viewport(FACTOR_VIEWPORT, FACTOR_INSETS)?;
        let value_scale = value_scale_for(&series, plot, config.factor_padding_ratio)?;
        Ok(Self {
            config,
            palette: ChartPalette::default(),
            series,
            color,
            plot,
            value_scale,
            pointer: PointerResolver::new(config.pointer_config(ReleasePolicy::ToggleSameIndex)),
        })
    }

    #[must_use]
    pub fn with_palette(mut self, palette: ChartPalette) -> Self {
        self.palette = palette;
        self
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        FACTOR_VIEWPORT
    }

    #[must_use]
    pub fn series(&self) -> &FactorSeries {
        &self.series
    }

    #[must_use]
    pub fn value_scale(&self) -> LinearScale {
        self.value_scale
    }

    pub fn set_series(&mut self, series: FactorSeries) -> ChartResult<()> {
        series.validate()?;
        self.value_scale = value_scale_for(&series, self.plot, self.config.factor_padding_ratio)?;
        debug!(
            factor = %series.name,
            periods = series.observations.len(),
            "factor series replaced"
        );
        self.series = series;
        self.pointer.reset();
        Ok(())
    }

    #[must_use]
    pub fn points(&self) -> Vec<ScreenPoint> {
        let n = self.series.observations.len();
        self.series
            .observations
            .iter()
            .enumerate()
            .map(|(index, observation)| {
                ScreenPoint::new(
                    index_x(index, n, self.plot.left, self.plot.width),
                    self.value_scale.to_pixel(observation.value),
                )
            })
            .collect()
    }

    #[must_use]
    pub fn geometry(&self) -> FactorTrendGeometry {
        let points = self.points();
        let line = polyline(&points);
        let area = match (points.first(), points.last()) {
            (Some(first), Some(last)) => area_under_curve(&line, self.plot.bottom(), first.x, last.x),
            _ => PathData::empty(),
        };

        let unit = &self.series.unit;
        let mut references = Vec::with_capacity(2);
        if let Some(value) = self.series.avg_3y {
            references.push(ReferenceLine {
                kind: ReferenceKind::ThreeYearAverage,
                value,
                y: self.value_scale.to_pixel(value),
                legend: format!("3Y avg ({value}{unit})"),
            });
        }
        if let Some(value) = self.series.sector_median {
            references.push(ReferenceLine {
                kind: ReferenceKind::SectorMedian,
                value,
                y: self.value_scale.to_pixel(value),
                legend: format!("Sector median ({value}{unit})"),
            });
        }

        let domain = self.value_scale.domain();
        let step = (domain.max - domain.min) / FACTOR_Y_INTERVALS as f64;
        let y_labels = (0..=FACTOR_Y_INTERVALS)
            .map(|i| {
                let value = domain.min + i as f64 * step;
                AxisLabel {
                    position: self.value_scale.to_pixel(value),
                    text: format!("{value:.1}{unit}"),
                    index: None,
                }
            })
            .collect();

        let last = points.len().saturating_sub(1);
        let x_labels = self
            .series
            .observations
            .iter()
            .enumerate()
            .filter(|(index, _)| index % FACTOR_X_LABEL_STRIDE == 0 || *index == last)
            .map(|(index, observation)| AxisLabel {
                position: points[index].x,
                text: observation.period.clone(),
                index: Some(index),
            })
            .collect();

        FactorTrendGeometry {
            plot: self.plot,
            points,
            line,
            area,
            references,
            y_labels,
            x_labels,
        }
    }

    #[must_use]
    pub fn hit_tester(&self) -> SeriesHitTester {
        if self.series.observations.len() < 2 {
            return SeriesHitTester::new(self.plot, Vec::new());
        }
        SeriesHitTester::new(self.plot, self.points())
    }

    #[must_use]
    pub fn pointer_state(&self) -> PointerState {
        self.pointer.state()
    }

    pub fn pointer_move(&mut self, local: ScreenPoint) -> PointerState {
        let hit = self.hit_tester();
        self.pointer.pointer_move(local, &hit)
    }

    pub fn pointer_leave(&mut self) -> PointerState {
        self.pointer.pointer_leave()
    }

    pub fn click(&mut self, local: ScreenPoint) -> PointerState {
        let hit = self.hit_tester();
        self.pointer.click(local, &hit)
    }

    pub fn touch_start(&mut self, local: ScreenPoint) -> PointerState {
        let hit = self.hit_tester();
        self.pointer.touch_start(local, &hit)
    }

    pub fn touch_move(&mut self, local: ScreenPoint) -> PointerState {
        let hit = self.hit_tester();
        self.pointer.touch_move(local, &hit)
    }

    pub fn touch_end(&mut self, now_ms: f64) -> PointerState {
        self.pointer.touch_end(now_ms)
    }

    pub fn tick(&mut self, now_ms: f64) -> bool {
        self.pointer.tick(now_ms)
    }

    pub fn dismiss(&mut self) -> PointerState {
        self.pointer.dismiss()
    }

    #[must_use]
    pub fn tooltip(&self) -> Option<FactorTooltip> {
        let state = self.pointer.state();
        let resolved = state.resolved?;
        let index = state.hover_index()?;
        let observation = self.series.observations.get(index)?;
        let point = resolved.screen_position;
        let width = f64::from(FACTOR_VIEWPORT.width);
        let height = f64::from(FACTOR_VIEWPORT.height);
        let (lo, hi) = TOOLTIP_LEFT_PCT_RANGE;
        Some(FactorTooltip {
            index,
            period: observation.period.clone(),
            value: observation.value,
            value_label: self.series.format_value(observation.value),
            left_pct: (point.x / width * 100.0).clamp(lo, hi),
            below_point: (point.y - 8.0) / height * 100.0 < 15.0,
            screen_position: point,
        })
    }

    pub fn build_frame(&self) -> ChartResult<RenderFrame> {
        let palette = self.palette;
        let geometry = self.geometry();
        let plot = geometry.plot;
        let mut frame = RenderFrame::new(FACTOR_VIEWPORT);

        for label in &geometry.y_labels {
            frame.lines.push(LinePrimitive::new(
                ScreenPoint::new(plot.left, label.position),
                ScreenPoint::new(plot.right(), label.position),
                1.0,
                palette.grid,
            ));
            frame.texts.push(TextPrimitive::new(
                label.text.clone(),
                plot.left - 6.0,
                label.position + 3.5,
                8.0,
                palette.text_muted,
                TextHAlign::Right,
            ));
        }

        frame.push_path(PathPrimitive::filled(geometry.area, self.color.with_alpha(0.06)));

        for reference in &geometry.references {
            let (color, dash, gap) = match reference.kind {
                ReferenceKind::ThreeYearAverage => (self.color.with_alpha(0.55), 6.0, 4.0),
                ReferenceKind::SectorMedian => (Color::rgba(1.0, 1.0, 1.0, 0.35), 3.0, 4.0),
            };
            frame.lines.push(
                LinePrimitive::new(
                    ScreenPoint::new(plot.left, reference.y),
                    ScreenPoint::new(plot.right(), reference.y),
                    1.5,
                    color,
                )
                .dashed(dash, gap),
            );
        }

        frame.push_path(PathPrimitive::stroked(geometry.line, self.color, 2.0));

        let state = self.pointer.state();
        let hovered = state.hover_index();
        match (state.resolved, geometry.points.last()) {
            (Some(resolved), _) => {
                let point = resolved.screen_position;
                frame.lines.push(
                    LinePrimitive::new(
                        ScreenPoint::new(point.x, plot.top),
                        ScreenPoint::new(point.x, plot.bottom()),
                        1.0,
                        palette.text_primary.with_alpha(0.1),
                    )
                    .dashed(3.0, 2.0),
                );
                frame.circles.push(
                    CirclePrimitive::filled(point, 4.5, palette.card_background)
                        .with_stroke(self.color, 2.0),
                );
            }
            (None, Some(last)) => {
                frame
                    .circles
                    .push(CirclePrimitive::filled(*last, 8.0, self.color.with_alpha(0.12)));
                frame.circles.push(CirclePrimitive::filled(*last, 3.5, self.color));
            }
            (None, None) => {}
        }

        let baseline = f64::from(FACTOR_VIEWPORT.height) - 6.0;
        for label in &geometry.x_labels {
            let color = if label.index.is_some() && label.index == hovered {
                palette.text_secondary
            } else {
                palette.text_muted
            };
            frame.texts.push(TextPrimitive::new(
                label.text.clone(),
                label.position,
                baseline,
                7.5,
                color,
                TextHAlign::Center,
            ));
        }

        frame.validate()?;
        Ok(frame)
    }

    pub fn render<R: Renderer>(&self, renderer: &mut R) -> ChartResult<()> {
        let frame = self.build_frame()?;
        renderer.render(&frame)
    }
}

fn value_scale_for(series: &FactorSeries, plot: PlotArea, padding_ratio: f64) -> ChartResult<LinearScale> {
    let values = series
        .observations
        .iter()
        .map(|o| o.value)
        .chain(series.avg_3y)
        .chain(series.sector_median);
    let domain = match ScaleDomain::from_values(values, padding_ratio) {
        Some(domain) => domain,
        None => ScaleDomain::new(0.0, 1.0)?,
    };
    LinearScale::vertical(domain, plot.top, plot.height)
}
