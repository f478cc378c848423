use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::config::ChartStyleConfig;
use crate::api::data_provider::{HistoryRange, ScoreSnapshot};
use crate::api::render_style::ChartPalette;
use crate::api::trend::ScoreDelta;
use crate::core::animation::AnimationDriver;
use crate::core::curves::{area_under_curve, open_cardinal_spline};
use crate::core::path::PathData;
use crate::core::primitives::round_one_decimal;
use crate::core::scale::{LinearScale, ScaleDomain, index_x};
use crate::core::types::{Insets, Pillar, PlotArea, ScreenPoint, Viewport};
use crate::error::ChartResult;
use crate::interaction::{PointerResolver, PointerState, ReleasePolicy, SeriesHitTester};
use crate::render::{
    CirclePrimitive, LinePrimitive, PathPrimitive, RectPrimitive, RenderFrame, Renderer,
    TextHAlign, TextPrimitive,
};

pub const EVOLUTION_VIEWPORT: Viewport = Viewport {
    width: 520,
    height: 250,
};
pub const EVOLUTION_INSETS: Insets = Insets::new(20.0, 24.0, 28.0, 32.0);
pub const EVOLUTION_GRID_VALUES: [f64; 6] = [0.0, 20.0, 40.0, 60.0, 80.0, 100.0];
pub const PEER_AVERAGE_SCORE: f64 = 50.0;
/// Upper bound on evenly strided X labels; first and last are always added.
pub const MAX_X_LABELS: usize = 8;

/// Which side of the crosshair the floating tooltip sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TooltipSide {
    Left,
    Right,
}

/// Tooltip content for the hovered history sample.
#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionTooltip {
    pub index: usize,
    pub date: NaiveDate,
    pub date_label: String,
    /// Overall score, or the active pillar's score.
    pub score: f64,
    pub pillar: Option<Pillar>,
    pub delta: ScoreDelta,
    pub peer_comparison: String,
    /// Crosshair position as a percentage of the canvas width.
    pub crosshair_pct: f64,
    pub side: TooltipSide,
    pub event: Option<String>,
    pub screen_position: ScreenPoint,
}

#[derive(Debug, Clone, PartialEq)]
pub struct XLabel {
    pub index: usize,
    pub x: f64,
    pub text: String,
}

/// Screen geometry of one evolution chart pass.
#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionGeometry {
    pub plot: PlotArea,
    pub main_points: Vec<ScreenPoint>,
    pub main_line: PathData,
    pub main_area: PathData,
    /// One line per pillar in `Pillar::ALL` order.
    pub pillar_lines: Vec<(Pillar, PathData)>,
    pub active_area: Option<PathData>,
    pub grid: Vec<(f64, f64)>,
    pub peer_average_y: f64,
    pub x_labels: Vec<XLabel>,
    /// Indices carrying an event annotation, at the displayed series' point.
    pub event_markers: Vec<(usize, ScreenPoint)>,
}

/// `Jan '21` style axis date.
#[must_use]
pub fn short_date_label(date: NaiveDate) -> String {
    date.format("%b '%y").to_string()
}

/// `Oct 30, 2025` style tooltip date.
#[must_use]
pub fn long_date_label(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// `"32pts above peer avg"`, `"5pts below peer avg"` or `"At peer avg"`.
///
/// Scores within five points of the average count as at the average.
#[must_use]
pub fn peer_comparison_label(score: f64) -> String {
    if score > PEER_AVERAGE_SCORE + 5.0 {
        format!("{}pts above peer avg", round_one_decimal(score - PEER_AVERAGE_SCORE))
    } else if score < PEER_AVERAGE_SCORE - 5.0 {
        format!("{}pts below peer avg", round_one_decimal(PEER_AVERAGE_SCORE - score))
    } else {
        "At peer avg".to_owned()
    }
}

/// Indices that get an X label: every `max(1, n / MAX_X_LABELS)`th plus the ends.
#[must_use]
pub fn x_label_indices(len: usize) -> Vec<usize> {
    let step = (len / MAX_X_LABELS).max(1);
    (0..len)
        .filter(|index| *index == 0 || *index == len - 1 || index % step == 0)
        .collect()
}

/// Score history line chart with range filtering and pillar drill-down.
#[derive(Debug, Clone)]
pub struct EvolutionChart {
    config: ChartStyleConfig,
    palette: ChartPalette,
    plot: PlotArea,
    y_scale: LinearScale,
    history: Vec<ScoreSnapshot>,
    range: HistoryRange,
    visible: Vec<ScoreSnapshot>,
    active_pillar: Option<Pillar>,
    animation: AnimationDriver,
    pointer: PointerResolver,
}

impl EvolutionChart {
    pub fn new(config: ChartStyleConfig, history: Vec<ScoreSnapshot>) -> ChartResult<Self> {
        let config = config.validate()?;
        let plot = PlotArea::from_viewport(EVOLUTION_VIEWPORT, EVOLUTION_INSETS)?;
        let y_scale = LinearScale::vertical(ScaleDomain::new(0.0, 100.0)?, plot.top, plot.height)?;
        let mut chart = Self {
            config,
            palette: ChartPalette::default(),
            plot,
            y_scale,
            history: Vec::new(),
            range: HistoryRange::Max,
            visible: Vec::new(),
            active_pillar: None,
            animation: AnimationDriver::line_reveal(),
            pointer: PointerResolver::new(config.pointer_config(ReleasePolicy::ToggleSameIndex)),
        };
        chart.set_history(history);
        Ok(chart)
    }

    #[must_use]
    pub fn with_palette(mut self, palette: ChartPalette) -> Self {
        self.palette = palette;
        self
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        EVOLUTION_VIEWPORT
    }

    #[must_use]
    pub fn plot(&self) -> PlotArea {
        self.plot
    }

    #[must_use]
    pub fn range(&self) -> HistoryRange {
        self.range
    }

    /// Samples inside the current range, oldest first.
    #[must_use]
    pub fn visible(&self) -> &[ScoreSnapshot] {
        &self.visible
    }

    /// Replaces the full history; resets pointer and reveal animation.
    pub fn set_history(&mut self, mut history: Vec<ScoreSnapshot>) {
        history.sort_by_key(|sample| sample.date);
        self.history = history;
        self.refresh_visible();
    }

    /// Switches the range filter. Returns `false` when the range is unchanged.
    pub fn set_range(&mut self, range: HistoryRange) -> bool {
        if range == self.range {
            return false;
        }
        self.range = range;
        self.refresh_visible();
        true
    }

    fn refresh_visible(&mut self) {
        self.visible = self.range.apply(&self.history);
        self.pointer.reset();
        self.animation.restart();
        debug!(
            range = self.range.label(),
            samples = self.visible.len(),
            "evolution dataset changed"
        );
    }

    #[must_use]
    pub fn active_pillar(&self) -> Option<Pillar> {
        self.active_pillar
    }

    /// Highlights one pillar; indices are unchanged so the pointer survives.
    pub fn set_active_pillar(&mut self, pillar: Option<Pillar>) {
        self.active_pillar = pillar;
    }

    pub fn advance_animation(&mut self, delta_ms: f64) -> f64 {
        self.animation.advance(delta_ms)
    }

    #[must_use]
    pub fn progress(&self) -> f64 {
        self.animation.progress()
    }

    fn displayed_value(&self, sample: &ScoreSnapshot) -> f64 {
        match self.active_pillar {
            Some(pillar) => sample.pillars.get(pillar),
            None => sample.monk_score,
        }
    }

    fn series_points<F>(&self, value: F) -> Vec<ScreenPoint>
    where
        F: Fn(&ScoreSnapshot) -> f64,
    {
        let n = self.visible.len();
        self.visible
            .iter()
            .enumerate()
            .map(|(index, sample)| {
                ScreenPoint::new(
                    index_x(index, n, self.plot.left, self.plot.width),
                    self.y_scale.to_pixel(value(sample)),
                )
            })
            .collect()
    }

    /// Points of the series the pointer resolves against.
    #[must_use]
    pub fn displayed_points(&self) -> Vec<ScreenPoint> {
        self.series_points(|sample| self.displayed_value(sample))
    }

    #[must_use]
    pub fn hit_tester(&self) -> SeriesHitTester {
        if self.visible.len() < 2 {
            return SeriesHitTester::new(self.plot, Vec::new());
        }
        SeriesHitTester::new(self.plot, self.displayed_points())
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

    /// Change of the displayed series between its last two samples.
    #[must_use]
    pub fn latest_delta(&self) -> Option<ScoreDelta> {
        let n = self.visible.len();
        if n < 2 {
            return None;
        }
        Some(ScoreDelta::between(
            self.displayed_value(&self.visible[n - 2]),
            self.displayed_value(&self.visible[n - 1]),
        ))
    }

    #[must_use]
    pub fn tooltip(&self) -> Option<EvolutionTooltip> {
        let index = self.pointer.state().hover_index()?;
        let sample = self.visible.get(index)?;
        // Follows the displayed series, which changes with the active pillar.
        let screen_position = self.displayed_points().get(index).copied()?;
        let score = self.displayed_value(sample);
        let delta = match index.checked_sub(1).and_then(|prev| self.visible.get(prev)) {
            Some(prev) => ScoreDelta::between(self.displayed_value(prev), score),
            None => ScoreDelta::flat(),
        };

        let n = self.visible.len();
        let width = f64::from(EVOLUTION_VIEWPORT.width);
        let x_pct = if n > 1 {
            index as f64 / (n - 1) as f64
        } else {
            0.5
        };
        let pad_left_pct = EVOLUTION_INSETS.left / width * 100.0;
        let pad_right_pct = EVOLUTION_INSETS.right / width * 100.0;
        let plot_pct = 100.0 - pad_left_pct - pad_right_pct;
        let crosshair_pct = pad_left_pct + x_pct * plot_pct;

        Some(EvolutionTooltip {
            index,
            date: sample.date,
            date_label: long_date_label(sample.date),
            score,
            pillar: self.active_pillar,
            delta,
            peer_comparison: peer_comparison_label(score),
            crosshair_pct,
            side: if crosshair_pct < 50.0 {
                TooltipSide::Right
            } else {
                TooltipSide::Left
            },
            event: sample.event.clone(),
            screen_position,
        })
    }

    #[must_use]
    pub fn geometry(&self) -> EvolutionGeometry {
        let tension = self.config.line_tension;
        let baseline = self.plot.bottom();
        let n = self.visible.len();
        let main_points = self.series_points(|sample| sample.monk_score);
        let main_line = open_cardinal_spline(&main_points, tension);
        let main_area = area_under_curve(
            &main_line,
            baseline,
            main_points.first().map_or(self.plot.left, |p| p.x),
            main_points.last().map_or(self.plot.left, |p| p.x),
        );

        let pillar_lines: Vec<(Pillar, PathData)> = Pillar::ALL
            .iter()
            .map(|pillar| {
                let points = self.series_points(|sample| sample.pillars.get(*pillar));
                (*pillar, open_cardinal_spline(&points, tension))
            })
            .collect();
        let active_area = self.active_pillar.map(|pillar| {
            let points = self.series_points(|sample| sample.pillars.get(pillar));
            let line = &pillar_lines[pillar.index()].1;
            area_under_curve(
                line,
                baseline,
                points.first().map_or(self.plot.left, |p| p.x),
                points.last().map_or(self.plot.left, |p| p.x),
            )
        });

        let displayed = self.displayed_points();
        let event_markers = self
            .visible
            .iter()
            .enumerate()
            .filter(|(_, sample)| sample.event.is_some())
            .map(|(index, _)| (index, displayed[index]))
            .collect();

        let x_labels = if n < 2 {
            Vec::new()
        } else {
            x_label_indices(n)
                .into_iter()
                .map(|index| XLabel {
                    index,
                    x: index_x(index, n, self.plot.left, self.plot.width),
                    text: short_date_label(self.visible[index].date),
                })
                .collect()
        };

        EvolutionGeometry {
            plot: self.plot,
            main_points,
            main_line,
            main_area,
            pillar_lines,
            active_area,
            grid: EVOLUTION_GRID_VALUES
                .iter()
                .map(|value| (*value, self.y_scale.to_pixel(*value)))
                .collect(),
            peer_average_y: self.y_scale.to_pixel(PEER_AVERAGE_SCORE),
            x_labels,
            event_markers,
        }
    }

    pub fn build_frame(&self) -> ChartResult<RenderFrame> {
        let geometry = self.geometry();
        let palette = self.palette;
        let plot = self.plot;
        let opacity = self.animation.progress();
        let hover = self.pointer.state().hover_index();
        let mut frame = RenderFrame::new(EVOLUTION_VIEWPORT);

        for (band, lower) in [80.0, 60.0, 40.0, 20.0, 0.0].into_iter().enumerate() {
            let top = self.y_scale.to_pixel(lower + 20.0);
            let bottom = self.y_scale.to_pixel(lower);
            frame.rects.push(RectPrimitive::new(
                plot.left,
                top,
                plot.width,
                bottom - top,
                palette.score_bands[band].with_alpha(0.025),
            ));
        }

        for (value, y) in &geometry.grid {
            frame.lines.push(LinePrimitive::new(
                ScreenPoint::new(plot.left, *y),
                ScreenPoint::new(plot.right(), *y),
                0.5,
                palette.grid,
            ));
            frame.texts.push(TextPrimitive::new(
                format!("{value}"),
                plot.left - 6.0,
                y + 3.0,
                8.0,
                palette.text_muted,
                TextHAlign::Right,
            ));
        }
        frame.lines.push(
            LinePrimitive::new(
                ScreenPoint::new(plot.left, geometry.peer_average_y),
                ScreenPoint::new(plot.right(), geometry.peer_average_y),
                0.8,
                palette.text_primary.with_alpha(0.12),
            )
            .dashed(3.0, 4.0),
        );
        frame.texts.push(TextPrimitive::new(
            "Avg",
            plot.right() + 4.0,
            geometry.peer_average_y + 3.0,
            7.0,
            palette.text_muted,
            TextHAlign::Left,
        ));
        for label in &geometry.x_labels {
            frame.texts.push(TextPrimitive::new(
                label.text.clone(),
                label.x,
                plot.bottom() + 14.0,
                7.5,
                palette.text_muted,
                TextHAlign::Center,
            ));
        }

        let n = self.visible.len();
        let displayed = self.displayed_points();
        match self.active_pillar {
            Some(active) => {
                for (pillar, line) in &geometry.pillar_lines {
                    if *pillar != active {
                        frame.push_path(PathPrimitive::stroked(
                            line.clone(),
                            palette.pillar_color(*pillar).with_alpha(0.12 * opacity),
                            1.0,
                        ));
                    }
                }
                let color = palette.pillar_color(active);
                if let Some(area) = &geometry.active_area {
                    frame.push_path(PathPrimitive::filled(
                        area.clone(),
                        color.with_alpha(0.08 * opacity),
                    ));
                }
                frame.push_path(PathPrimitive::stroked(
                    geometry.pillar_lines[active.index()].1.clone(),
                    color.with_alpha(0.9 * opacity),
                    2.0,
                ));
                for (index, point) in displayed.iter().enumerate() {
                    let radius = if hover == Some(index) {
                        4.5
                    } else if index + 1 == n {
                        3.5
                    } else {
                        2.5
                    };
                    frame
                        .circles
                        .push(CirclePrimitive::filled(*point, radius, color.with_alpha(opacity)));
                }
            }
            None => {
                let line_color = self
                    .visible
                    .last()
                    .map_or(palette.accent, |sample| palette.score_color(sample.monk_score));
                frame.push_path(PathPrimitive::filled(
                    geometry.main_area.clone(),
                    line_color.with_alpha(0.1 * opacity),
                ));
                frame.push_path(PathPrimitive::stroked(
                    geometry.main_line.clone(),
                    line_color.with_alpha(opacity),
                    2.5,
                ));
                if n >= 2 {
                    for (index, (point, sample)) in
                        geometry.main_points.iter().zip(&self.visible).enumerate()
                    {
                        let color = palette.score_color(sample.monk_score).with_alpha(opacity);
                        let hovered = hover == Some(index);
                        let last = index + 1 == n;
                        let radius = if hovered {
                            5.0
                        } else if last {
                            4.0
                        } else {
                            3.0
                        };
                        let mut dot = CirclePrimitive::filled(*point, radius, color);
                        if hovered || last {
                            dot = dot.with_stroke(color.with_alpha(0.3 * opacity), 2.0);
                        }
                        frame.circles.push(dot);
                    }
                }
            }
        }

        if let (Some(delta), Some(last)) = (self.latest_delta(), displayed.last()) {
            if delta.value != 0.0 {
                frame.texts.push(
                    TextPrimitive::new(
                        delta.compact_label(),
                        last.x + 8.0,
                        last.y + 3.5,
                        9.0,
                        palette.signed_color(delta.value).with_alpha(opacity),
                        TextHAlign::Left,
                    )
                    .bold(),
                );
            }
        }

        for (_, point) in &geometry.event_markers {
            frame.lines.push(
                LinePrimitive::new(
                    ScreenPoint::new(point.x, point.y - 8.0),
                    ScreenPoint::new(point.x, plot.top + 2.0),
                    0.6,
                    palette.accent.with_alpha(0.4 * opacity),
                )
                .dashed(2.0, 2.0),
            );
            frame.rects.push(
                RectPrimitive::new(
                    point.x - 4.5,
                    plot.top - 1.0,
                    9.0,
                    9.0,
                    palette.accent.with_alpha(0.3 * opacity),
                )
                .rounded(2.0),
            );
        }

        if let Some(index) = hover {
            let x = index_x(index, n, plot.left, plot.width);
            frame.lines.push(LinePrimitive::new(
                ScreenPoint::new(x, plot.top),
                ScreenPoint::new(x, plot.bottom()),
                0.8,
                palette.crosshair,
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
