//! Historical price line joined to a probability cone of forward returns.
//!
//! History and forecast share pixels-per-year: with `h` years of history and
//! `f` forecast years, history takes `h / (h + f)` of the plot width and
//! "today" sits at that boundary.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::config::ChartStyleConfig;
use crate::api::data_provider::{CompanySnapshot, DataProvider};
use crate::api::render_style::ChartPalette;
use crate::core::cone::{
    ConeLayout, Percentile, PercentileBracket, PercentileBracketSet, ProbabilityCone,
    fraction_positive, to_ten_scale,
};
use crate::core::curves::{area_under_curve, open_cardinal_spline};
use crate::core::labels::{LabelCandidate, resolve_label_collisions};
use crate::core::path::PathData;
use crate::core::scale::{LinearScale, ScaleDomain, index_x};
use crate::core::ticks::{HistoryMark, history_marks, nice_value_ticks};
use crate::core::types::{Insets, PlotArea, ScreenPoint, Viewport};
use crate::core::windowing::downsample_indices;
use crate::error::{ChartError, ChartResult};
use crate::interaction::{
    ForecastHitTester, PointerDatum, PointerResolver, PointerState, ReleasePolicy,
};
use crate::render::{
    CirclePrimitive, LinePrimitive, PathPrimitive, RectPrimitive, RenderFrame, Renderer,
    TextHAlign, TextPrimitive,
};

pub const FAN_VIEWPORT: Viewport = Viewport {
    width: 560,
    height: 270,
};
pub const FAN_INSETS: Insets = Insets::new(16.0, 22.0, 30.0, 50.0);
/// Horizons, in years, at which outcome statistics exist.
pub const FORECAST_HORIZONS: [u32; 3] = [1, 3, 5];
pub const WEEKS_PER_YEAR: f64 = 52.0;
pub const LABELED_PILL_WIDTH: f64 = 82.0;
pub const PLAIN_PILL_WIDTH: f64 = 66.0;
/// Horizontal gap between a pill and its anchor when flipped to one side.
pub const PILL_MARGIN: f64 = 6.0;

/// Visible history window of the fan chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HistoryPeriod {
    OneYear,
    ThreeYears,
    #[default]
    FiveYears,
    Max,
}

impl HistoryPeriod {
    pub const ALL: [HistoryPeriod; 4] = [
        HistoryPeriod::OneYear,
        HistoryPeriod::ThreeYears,
        HistoryPeriod::FiveYears,
        HistoryPeriod::Max,
    ];

    #[must_use]
    pub const fn weeks(self) -> usize {
        match self {
            HistoryPeriod::OneYear => 52,
            HistoryPeriod::ThreeYears => 156,
            HistoryPeriod::FiveYears => 260,
            HistoryPeriod::Max => 624,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            HistoryPeriod::OneYear => "1Y",
            HistoryPeriod::ThreeYears => "3Y",
            HistoryPeriod::FiveYears => "5Y",
            HistoryPeriod::Max => "Max",
        }
    }
}

/// `$213.49`
#[must_use]
pub fn format_usd(value: f64) -> String {
    format!("${value:.2}")
}

/// `+12.0%`, `-4.0%`, `0.0%`
#[must_use]
pub fn format_signed_percent(value: f64) -> String {
    let sign = if value > 0.0 { "+" } else { "" };
    format!("{sign}{value:.1}%")
}

/// Axis price label with at most two decimals (`$150`, `$212.5`).
#[must_use]
pub fn format_tick_price(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    format!("${}", if rounded == 0.0 { 0.0 } else { rounded })
}

/// Forecast horizon summarized while nothing is hovered.
#[must_use]
pub fn idle_horizon(history_years: f64) -> u32 {
    if history_years >= 5.0 {
        5
    } else if history_years >= 3.0 {
        3
    } else {
        1
    }
}

/// Left edge of a pill centered on `anchor_x`, flipped inward near the plot edges.
#[must_use]
pub fn pill_box_x(anchor_x: f64, width: f64, plot: PlotArea) -> f64 {
    if anchor_x + width / 2.0 + PILL_MARGIN > plot.right() {
        anchor_x - width - PILL_MARGIN
    } else if anchor_x - width / 2.0 - PILL_MARGIN < plot.left {
        anchor_x + PILL_MARGIN
    } else {
        anchor_x - width / 2.0
    }
}

/// Outcome statistics at one horizon, framed for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizonSummary {
    pub horizon: u32,
    pub median_price: f64,
    pub median_return_pct: f64,
    /// P25 return in percent.
    pub likely_low_pct: f64,
    /// P75 return in percent.
    pub likely_high_pct: f64,
    pub fraction_positive: f64,
    /// "N in 10 companies beat the market".
    pub in_ten: u8,
}

impl HorizonSummary {
    #[must_use]
    pub fn from_bracket(bracket: &PercentileBracket, current_price: f64) -> Self {
        let positive = fraction_positive(bracket);
        Self {
            horizon: bracket.horizon(),
            median_price: bracket.price_at(Percentile::P50, current_price),
            median_return_pct: bracket.median() * 100.0,
            likely_low_pct: bracket.get(Percentile::P25) * 100.0,
            likely_high_pct: bracket.get(Percentile::P75) * 100.0,
            fraction_positive: positive,
            in_ten: to_ten_scale(positive),
        }
    }
}

/// Content of the info strip for the datum under the pointer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FanTip {
    History {
        index: usize,
        price: f64,
        /// Historical price versus today, in percent.
        pct_vs_current: f64,
        weeks_ago: f64,
        /// Return from buying at `price` and holding until today, in percent.
        gain_pct: f64,
    },
    Today {
        price: f64,
        horizons: Vec<HorizonSummary>,
    },
    Future {
        summary: HorizonSummary,
    },
}

/// Price pill drawn next to the hovered datum.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineLabel {
    pub percentile: Option<Percentile>,
    pub text: String,
    pub anchor_x: f64,
    pub box_x: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub opacity: f64,
}

impl InlineLabel {
    /// Pill text, prefixed with the percentile when there is one.
    #[must_use]
    pub fn display_text(&self) -> String {
        match self.percentile {
            Some(p) => format!("{} {}", p.label(), self.text),
            None => self.text.clone(),
        }
    }
}

/// Derived positions shared by geometry, hit testing and labels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FanLayout {
    pub plot: PlotArea,
    pub history_years: f64,
    pub history_fraction: f64,
    pub now_x: f64,
    pub future_years: u32,
    pub price_scale: LinearScale,
}

impl FanLayout {
    /// X of a forecast horizon in years.
    #[must_use]
    pub fn future_x(&self, years: f64) -> f64 {
        self.now_x
            + years / f64::from(self.future_years) * self.plot.width * (1.0 - self.history_fraction)
    }

    /// X of a history mark placed at `fraction` of the history span.
    #[must_use]
    pub fn history_x(&self, fraction: f64) -> f64 {
        self.plot.left + fraction * self.plot.width * self.history_fraction
    }
}

fn display_prices(history: &[f64], max_points: usize) -> ChartResult<Vec<f64>> {
    if let Some(bad) = history.iter().position(|p| !p.is_finite()) {
        return Err(ChartError::InvalidData(format!(
            "price history sample {bad} is not finite"
        )));
    }
    Ok(downsample_indices(history.len(), max_points)
        .into_iter()
        .map(|index| history[index])
        .collect())
}

struct DerivedGeometry {
    layout: FanLayout,
    cone: ProbabilityCone,
    history_points: Vec<ScreenPoint>,
}

impl DerivedGeometry {
    fn compute(
        config: &ChartStyleConfig,
        current_price: f64,
        brackets: &PercentileBracketSet,
        horizons: &[u32],
        history: &[f64],
        display_prices: &[f64],
    ) -> ChartResult<Self> {
        let plot = PlotArea::from_viewport(FAN_VIEWPORT, FAN_INSETS)?;
        let future_years = config.fan_future_years;
        let history_years = history.len() as f64 / WEEKS_PER_YEAR;
        let history_fraction = history_years / (history_years + f64::from(future_years));
        let now_x = plot.left + plot.width * history_fraction;

        let mut extremes = Vec::with_capacity(2);
        if let Some(furthest) = horizons.iter().copied().filter(|h| *h > 0).max() {
            let bracket = brackets.get(furthest)?;
            extremes.push(bracket.price_at(Percentile::P10, current_price));
            extremes.push(bracket.price_at(Percentile::P90, current_price));
        }
        let domain = ScaleDomain::from_values(
            history
                .iter()
                .copied()
                .chain(extremes)
                .chain(std::iter::once(current_price)),
            config.domain_padding_ratio,
        )
        .ok_or_else(|| ChartError::InvalidData("fan chart has no finite prices".to_owned()))?;
        let price_scale = LinearScale::vertical(domain, plot.top, plot.height)?;

        let cone = ProbabilityCone::build(
            brackets,
            horizons,
            &ConeLayout {
                current_price,
                price_scale,
                origin_x: now_x,
                available_width: plot.width * (1.0 - history_fraction),
                max_horizon: future_years,
            },
        )?;
        let n = display_prices.len();
        let history_points = display_prices
            .iter()
            .enumerate()
            .map(|(index, price)| {
                ScreenPoint::new(
                    index_x(index, n, plot.left, plot.width * history_fraction),
                    price_scale.to_pixel(*price),
                )
            })
            .collect();
        Ok(Self {
            layout: FanLayout {
                plot,
                history_years,
                history_fraction,
                now_x,
                future_years,
                price_scale,
            },
            cone,
            history_points,
        })
    }
}

/// Forecast chart: weekly price history, "today" anchor and percentile cone.
#[derive(Debug, Clone)]
pub struct FanChart {
    config: ChartStyleConfig,
    palette: ChartPalette,
    current_price: f64,
    monk_score: f64,
    brackets: PercentileBracketSet,
    history: Vec<f64>,
    display_prices: Vec<f64>,
    horizons: Vec<u32>,
    layout: FanLayout,
    cone: ProbabilityCone,
    history_points: Vec<ScreenPoint>,
    pointer: PointerResolver,
}

impl FanChart {
    pub fn new(
        config: ChartStyleConfig,
        current_price: f64,
        monk_score: f64,
        brackets: PercentileBracketSet,
        history: Vec<f64>,
    ) -> ChartResult<Self> {
        let config = config.validate()?;
        if !current_price.is_finite() || current_price <= 0.0 {
            return Err(ChartError::InvalidData(
                "current price must be finite and > 0".to_owned(),
            ));
        }
        let horizons: Vec<u32> = std::iter::once(0)
            .chain(
                FORECAST_HORIZONS
                    .iter()
                    .copied()
                    .filter(|h| *h <= config.fan_future_years),
            )
            .collect();
        let display_prices = display_prices(&history, config.max_history_points)?;
        let derived = DerivedGeometry::compute(
            &config,
            current_price,
            &brackets,
            &horizons,
            &history,
            &display_prices,
        )?;
        Ok(Self {
            config,
            palette: ChartPalette::default(),
            current_price,
            monk_score,
            brackets,
            history,
            display_prices,
            horizons,
            layout: derived.layout,
            cone: derived.cone,
            history_points: derived.history_points,
            pointer: PointerResolver::new(config.pointer_config(ReleasePolicy::ReleaseOnAnyClick)),
        })
    }

    /// Builds a chart from provider data for `company` over `period`.
    pub fn from_provider<P: DataProvider>(
        config: ChartStyleConfig,
        provider: &P,
        company: &CompanySnapshot,
        period: HistoryPeriod,
    ) -> ChartResult<Self> {
        let brackets = provider.percentile_brackets(company.score_bucket())?;
        let history = provider.price_history(&company.ticker, period.weeks())?;
        Self::new(
            config,
            company.current_price_f64()?,
            company.monk_score,
            brackets,
            history,
        )
    }

    #[must_use]
    pub fn with_palette(mut self, palette: ChartPalette) -> Self {
        self.palette = palette;
        self
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        FAN_VIEWPORT
    }

    #[must_use]
    pub fn layout(&self) -> FanLayout {
        self.layout
    }

    #[must_use]
    pub fn cone(&self) -> &ProbabilityCone {
        &self.cone
    }

    /// Anchor horizons including `0` for today.
    #[must_use]
    pub fn horizons(&self) -> &[u32] {
        &self.horizons
    }

    #[must_use]
    pub fn history_points(&self) -> &[ScreenPoint] {
        &self.history_points
    }

    /// Prices after downsampling, aligned with `history_points`.
    #[must_use]
    pub fn display_prices(&self) -> &[f64] {
        &self.display_prices
    }

    /// Replaces the weekly price history (period switch) and clears any tip or pin.
    pub fn set_history(&mut self, history: Vec<f64>) -> ChartResult<()> {
        let display_prices = display_prices(&history, self.config.max_history_points)?;
        let derived = DerivedGeometry::compute(
            &self.config,
            self.current_price,
            &self.brackets,
            &self.horizons,
            &history,
            &display_prices,
        )?;
        self.history = history;
        self.display_prices = display_prices;
        self.layout = derived.layout;
        self.cone = derived.cone;
        self.history_points = derived.history_points;
        self.pointer.reset();
        debug!(
            weeks = self.history.len(),
            displayed = self.display_prices.len(),
            history_fraction = self.layout.history_fraction,
            "fan chart history replaced"
        );
        Ok(())
    }

    #[must_use]
    pub fn history_line(&self) -> PathData {
        open_cardinal_spline(&self.history_points, self.config.line_tension)
    }

    /// History line closed down to the baseline between the plot edge and today.
    #[must_use]
    pub fn history_area(&self) -> PathData {
        area_under_curve(
            &self.history_line(),
            self.layout.plot.bottom(),
            self.layout.plot.left,
            self.layout.now_x,
        )
    }

    #[must_use]
    pub fn value_ticks(&self) -> Vec<f64> {
        let domain = self.layout.price_scale.domain();
        nice_value_ticks(domain.min, domain.max)
    }

    #[must_use]
    pub fn history_marks(&self) -> Vec<HistoryMark> {
        history_marks(self.layout.history_years)
    }

    #[must_use]
    pub fn hit_tester(&self) -> ForecastHitTester {
        let anchors = self
            .horizons
            .iter()
            .filter_map(|horizon| match horizon {
                0 => Some((0, self.cone.origin)),
                h => self
                    .cone
                    .node(*h)
                    .map(|node| (*h, node.point(Percentile::P50))),
            })
            .collect();
        ForecastHitTester::new(
            self.layout.plot,
            self.layout.history_fraction,
            self.history_points.clone(),
            anchors,
        )
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

    /// Pins the hovered datum; any click while pinned releases.
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

    pub fn horizon_summary(&self, horizon: u32) -> ChartResult<HorizonSummary> {
        Ok(HorizonSummary::from_bracket(
            self.brackets.get(horizon)?,
            self.current_price,
        ))
    }

    /// Summary shown while idle, at the horizon matching the visible history.
    pub fn idle_summary(&self) -> ChartResult<HorizonSummary> {
        let horizon = idle_horizon(self.layout.history_years.round());
        self.horizon_summary(horizon)
    }

    pub fn tip(&self) -> ChartResult<Option<FanTip>> {
        let Some(datum) = self.pointer.state().datum() else {
            return Ok(None);
        };
        let tip = match datum {
            PointerDatum::History { index } => {
                let Some(price) = self.display_prices.get(index).copied() else {
                    return Ok(None);
                };
                let n = self.display_prices.len();
                let weeks_ago = if n > 1 {
                    (1.0 - index as f64 / (n - 1) as f64) * self.history.len() as f64
                } else {
                    0.0
                };
                FanTip::History {
                    index,
                    price,
                    pct_vs_current: (price / self.current_price - 1.0) * 100.0,
                    weeks_ago,
                    gain_pct: (self.current_price / price - 1.0) * 100.0,
                }
            }
            PointerDatum::Future { horizon: 0 } => FanTip::Today {
                price: self.current_price,
                horizons: self
                    .horizons
                    .iter()
                    .filter(|h| **h > 0)
                    .map(|h| self.horizon_summary(*h))
                    .collect::<ChartResult<Vec<_>>>()?,
            },
            PointerDatum::Future { horizon } => FanTip::Future {
                summary: self.horizon_summary(horizon)?,
            },
            PointerDatum::Category { .. } => return Ok(None),
        };
        Ok(Some(tip))
    }

    fn single_pill(&self, anchor_x: f64, text: String) -> InlineLabel {
        let plot = self.layout.plot;
        InlineLabel {
            percentile: None,
            text,
            anchor_x,
            box_x: pill_box_x(anchor_x, PLAIN_PILL_WIDTH, plot),
            top: plot.top + 3.0,
            width: PLAIN_PILL_WIDTH,
            height: self.config.label_layout.label_height,
            opacity: 1.0,
        }
    }

    /// Price pills for the hovered datum, stacked without overlap on forecast anchors.
    pub fn inline_labels(&self) -> ChartResult<Vec<InlineLabel>> {
        let state = self.pointer.state();
        let (Some(datum), Some(pointer)) = (state.datum(), state.tooltip) else {
            return Ok(Vec::new());
        };
        match datum {
            PointerDatum::History { index } => Ok(self
                .display_prices
                .get(index)
                .map(|price| vec![self.single_pill(pointer.x, format_usd(*price))])
                .unwrap_or_default()),
            PointerDatum::Future { horizon: 0 } => Ok(vec![
                self.single_pill(self.layout.now_x, format_usd(self.current_price)),
            ]),
            PointerDatum::Future { horizon } => {
                let bracket = self.brackets.get(horizon)?;
                let Some(node) = self.cone.node(horizon) else {
                    return Ok(Vec::new());
                };
                let stack = [Percentile::P90, Percentile::P50, Percentile::P10];
                let layout = self.config.label_layout;
                let candidates: Vec<LabelCandidate> = stack
                    .iter()
                    .enumerate()
                    .map(|(order, p)| LabelCandidate::new(node.y(*p), layout.label_height, order))
                    .collect();
                let plot = self.layout.plot;
                let placed = resolve_label_collisions(&candidates, plot.top, plot.bottom(), layout);
                let box_x = pill_box_x(node.x, LABELED_PILL_WIDTH, plot);
                Ok(placed
                    .iter()
                    .map(|label| {
                        let percentile = stack[label.priority_order];
                        InlineLabel {
                            percentile: Some(percentile),
                            text: format_usd(bracket.price_at(percentile, self.current_price)),
                            anchor_x: node.x,
                            box_x,
                            top: label.top,
                            width: LABELED_PILL_WIDTH,
                            height: label.height,
                            opacity: if percentile == Percentile::P50 { 1.0 } else { 0.55 },
                        }
                    })
                    .collect())
            }
            PointerDatum::Category { .. } => Ok(Vec::new()),
        }
    }

    pub fn build_frame(&self) -> ChartResult<RenderFrame> {
        let palette = self.palette;
        let layout = self.layout;
        let plot = layout.plot;
        let score_color = palette.score_color(self.monk_score);
        let mut frame = RenderFrame::new(FAN_VIEWPORT);

        for value in self.value_ticks() {
            let y = layout.price_scale.to_pixel(value);
            if y < plot.top - 2.0 || y > plot.bottom() + 2.0 {
                continue;
            }
            frame.lines.push(LinePrimitive::new(
                ScreenPoint::new(plot.left, y),
                ScreenPoint::new(plot.right(), y),
                0.5,
                palette.grid,
            ));
            frame.texts.push(TextPrimitive::new(
                format_tick_price(value),
                plot.left - 6.0,
                y + 3.5,
                8.5,
                palette.text_muted,
                TextHAlign::Right,
            ));
        }

        frame.lines.push(
            LinePrimitive::new(
                ScreenPoint::new(layout.now_x, plot.top),
                ScreenPoint::new(layout.now_x, plot.bottom()),
                1.0,
                palette.text_primary.with_alpha(0.08),
            )
            .dashed(3.0, 4.0),
        );
        frame.texts.push(
            TextPrimitive::new(
                "TODAY",
                layout.now_x + 5.0,
                plot.top + 9.0,
                7.5,
                palette.text_muted,
                TextHAlign::Left,
            )
            .bold(),
        );
        self.push_axis_label(&mut frame, layout.now_x, "Today".to_owned());

        for (path, opacity) in self.cone.bands.iter().zip([0.05, 0.11, 0.20]) {
            frame.push_path(PathPrimitive::filled(path.clone(), score_color.with_alpha(opacity)));
        }
        for edge in [&self.cone.edge_p10, &self.cone.edge_p90] {
            frame.push_path(PathPrimitive::stroked(
                edge.clone(),
                score_color.with_alpha(0.18),
                0.8,
            ));
        }
        frame.push_path(PathPrimitive::stroked(self.cone.median.clone(), score_color, 2.2));

        frame.push_path(PathPrimitive::filled(
            self.history_area(),
            palette.accent.with_alpha(0.06),
        ));
        frame.push_path(PathPrimitive::stroked(self.history_line(), palette.accent, 2.5));

        for mark in self.history_marks() {
            frame.texts.push(TextPrimitive::new(
                mark.label,
                layout.history_x(mark.fraction),
                plot.bottom() + 15.0,
                8.0,
                palette.text_muted,
                TextHAlign::Center,
            ));
        }
        let furthest = self.horizons.last().copied().unwrap_or(0);
        for node in &self.cone.nodes {
            self.push_axis_label(&mut frame, node.x, format!("+{}Y", node.horizon));
            if node.horizon == furthest {
                for (percentile, alpha) in [
                    (Percentile::P90, 0.38),
                    (Percentile::P50, 0.68),
                    (Percentile::P10, 0.38),
                ] {
                    frame.texts.push(TextPrimitive::new(
                        percentile.label(),
                        node.x + 6.0,
                        node.y(percentile) + 3.5,
                        7.0,
                        score_color.with_alpha(alpha),
                        TextHAlign::Left,
                    ));
                }
            }
        }

        let origin = self.cone.origin;
        frame.circles.push(CirclePrimitive::filled(origin, 12.0, score_color.with_alpha(0.07)));
        frame.circles.push(
            CirclePrimitive::filled(origin, 4.5, palette.card_background).with_stroke(score_color, 2.0),
        );
        frame.circles.push(CirclePrimitive::filled(origin, 2.0, score_color));

        let state = self.pointer.state();
        if let (Some(resolved), Some(pointer)) = (state.resolved, state.tooltip) {
            frame.lines.push(
                LinePrimitive::new(
                    ScreenPoint::new(pointer.x, plot.top),
                    ScreenPoint::new(pointer.x, plot.bottom()),
                    1.0,
                    palette.text_primary.with_alpha(0.10),
                )
                .dashed(2.0, 3.0),
            );
            let dot_color = match resolved.datum {
                PointerDatum::History { .. } => palette.accent,
                _ => score_color,
            };
            frame.circles.push(
                CirclePrimitive::filled(resolved.screen_position, 5.5, palette.card_background)
                    .with_stroke(dot_color, 1.8),
            );
            frame
                .circles
                .push(CirclePrimitive::filled(resolved.screen_position, 2.2, dot_color));
        }

        for label in self.inline_labels()? {
            let color = match label.percentile {
                None if matches!(state.datum(), Some(PointerDatum::History { .. })) => palette.accent,
                _ => score_color,
            };
            frame.rects.push(
                RectPrimitive::new(
                    label.box_x,
                    label.top,
                    label.width,
                    label.height,
                    palette.card_background.with_alpha(label.opacity),
                )
                .rounded(3.0)
                .with_stroke(color.with_alpha(0.22 * label.opacity)),
            );
            let mut text = TextPrimitive::new(
                label.display_text(),
                label.box_x + label.width / 2.0,
                label.top + 10.5,
                9.0,
                color.with_alpha(label.opacity),
                TextHAlign::Center,
            );
            if label.percentile == Some(Percentile::P50) {
                text = text.bold();
            }
            frame.texts.push(text);
        }

        frame.validate()?;
        Ok(frame)
    }

    fn push_axis_label(&self, frame: &mut RenderFrame, x: f64, text: String) {
        let bottom = self.layout.plot.bottom();
        frame.lines.push(LinePrimitive::new(
            ScreenPoint::new(x, bottom + 1.0),
            ScreenPoint::new(x, bottom + 5.0),
            0.7,
            self.palette.crosshair,
        ));
        frame.texts.push(TextPrimitive::new(
            text,
            x,
            bottom + 15.0,
            8.0,
            self.palette.text_muted,
            TextHAlign::Center,
        ));
    }

    pub fn render<R: Renderer>(&self, renderer: &mut R) -> ChartResult<()> {
        let frame = self.build_frame()?;
        renderer.render(&frame)
    }
}
