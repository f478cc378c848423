use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::config::ChartStyleConfig;
use crate::api::data_provider::CompanySnapshot;
use crate::api::render_style::ChartPalette;
use crate::api::trend::ScoreDelta;
use crate::core::animation::AnimationDriver;
use crate::core::curves::cyclic_catmull_rom_to_bezier;
use crate::core::path::PathData;
use crate::core::radial::RadialScale;
use crate::core::types::{Pillar, PillarScores, ScreenPoint, Viewport};
use crate::error::ChartResult;
use crate::interaction::{
    PointerDatum, PointerResolver, PointerState, RadialHitTester, ReleasePolicy,
};
use crate::render::{
    CirclePrimitive, Color, LinePrimitive, PathPrimitive, RenderFrame, Renderer, TextHAlign,
    TextPrimitive,
};

pub const SNOWFLAKE_SIZE: u32 = 320;
pub const SNOWFLAKE_RADIUS: f64 = 120.0;
/// Concentric reference rings; the 50 ring doubles as the peer average.
pub const GRID_LEVELS: [f64; 4] = [25.0, 50.0, 75.0, 100.0];
pub const PEER_AVERAGE_LEVEL: f64 = 50.0;
/// Radial value at which axis labels are anchored, just outside the 100 ring.
pub const LABEL_ANCHOR_VALUE: f64 = 118.0;
/// Hit radius around each label anchor.
pub const LABEL_HIT_RADIUS: f64 = 26.0;

/// Headline sentence split into its emphasized lead and the remainder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub lead: &'static str,
    pub rest: &'static str,
}

impl Insight {
    #[must_use]
    pub fn for_score(score: f64) -> Self {
        let lead = if score >= 90.0 {
            "Extremely likely"
        } else if score >= 75.0 {
            "Very likely"
        } else if score >= 60.0 {
            "Likely"
        } else if score >= 45.0 {
            return Self {
                lead: "May perform",
                rest: " in line with market",
            };
        } else if score >= 30.0 {
            "Unlikely"
        } else {
            "Very unlikely"
        };
        Self {
            lead,
            rest: " to beat the market",
        }
    }

    #[must_use]
    pub fn sentence(self) -> String {
        format!("{}{}", self.lead, self.rest)
    }
}

/// Comparative phrase for the subject's overall score versus a peer's.
#[must_use]
pub fn peer_phrase(subject_score: f64, peer_score: f64) -> &'static str {
    let diff = subject_score - peer_score;
    if diff.abs() <= 5.0 {
        "As likely as"
    } else if diff > 15.0 {
        "Much more likely than"
    } else if diff > 0.0 {
        "More likely than"
    } else if diff < -15.0 {
        "Much less likely than"
    } else {
        "Less likely than"
    }
}

/// Comparison overlay drawn on the same axes as the subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerOverlay {
    pub ticker: String,
    pub monk_score: f64,
    pub pillars: PillarScores,
}

impl From<&CompanySnapshot> for PeerOverlay {
    fn from(company: &CompanySnapshot) -> Self {
        Self {
            ticker: company.ticker.clone(),
            monk_score: company.monk_score,
            pillars: company.pillars,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SnowflakeGeometry {
    pub main: PathData,
    /// Marker positions of the animated subject scores.
    pub markers: Vec<ScreenPoint>,
    pub comparison: Option<PathData>,
    pub comparison_markers: Vec<ScreenPoint>,
    pub grid_rings: Vec<(f64, PathData)>,
    /// Center-to-rim segment per axis.
    pub spokes: Vec<(ScreenPoint, ScreenPoint)>,
    pub label_anchors: Vec<ScreenPoint>,
}

/// Tooltip content for the pillar under the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnowflakeTooltip {
    pub pillar: Pillar,
    pub score: f64,
    pub color: Color,
    pub peer_score: Option<f64>,
    pub anchor: ScreenPoint,
}

/// Radar chart of the five pillar scores with an optional peer overlay.
#[derive(Debug, Clone)]
pub struct SnowflakeChart {
    config: ChartStyleConfig,
    palette: ChartPalette,
    scale: RadialScale,
    scores: PillarScores,
    monk_score: f64,
    prev_monk_score: Option<f64>,
    peer: Option<PeerOverlay>,
    animation: AnimationDriver,
    pointer: PointerResolver,
}

impl SnowflakeChart {
    pub fn new(config: ChartStyleConfig, scores: PillarScores, monk_score: f64) -> ChartResult<Self> {
        let config = config.validate()?;
        let center = f64::from(SNOWFLAKE_SIZE) / 2.0;
        let scale = RadialScale::new(
            ScreenPoint::new(center, center),
            SNOWFLAKE_RADIUS,
            config.radar_max_value,
            Pillar::ALL.len(),
            config.angle_offset_rad,
        )?;
        Ok(Self {
            config,
            palette: ChartPalette::default(),
            scale,
            scores,
            monk_score,
            prev_monk_score: None,
            peer: None,
            animation: AnimationDriver::radar_reveal(),
            pointer: PointerResolver::new(config.pointer_config(ReleasePolicy::ToggleSameIndex)),
        })
    }

    pub fn from_company(config: ChartStyleConfig, company: &CompanySnapshot) -> ChartResult<Self> {
        let mut chart = Self::new(config, company.pillars, company.monk_score)?;
        chart.prev_monk_score = company.prev_monk_score;
        Ok(chart)
    }

    #[must_use]
    pub fn with_palette(mut self, palette: ChartPalette) -> Self {
        self.palette = palette;
        self
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        Viewport::new(SNOWFLAKE_SIZE, SNOWFLAKE_SIZE)
    }

    #[must_use]
    pub fn scale(&self) -> RadialScale {
        self.scale
    }

    #[must_use]
    pub fn scores(&self) -> PillarScores {
        self.scores
    }

    /// Replaces the subject; pointer state and the reveal animation restart.
    pub fn set_company(&mut self, company: &CompanySnapshot) {
        self.scores = company.pillars;
        self.monk_score = company.monk_score;
        self.prev_monk_score = company.prev_monk_score;
        self.pointer.reset();
        self.animation.restart();
        debug!(ticker = %company.ticker, "snowflake subject replaced");
    }

    pub fn set_peer(&mut self, peer: Option<PeerOverlay>) {
        self.peer = peer;
    }

    #[must_use]
    pub fn peer(&self) -> Option<&PeerOverlay> {
        self.peer.as_ref()
    }

    pub fn advance_animation(&mut self, delta_ms: f64) -> f64 {
        self.animation.advance(delta_ms)
    }

    #[must_use]
    pub fn progress(&self) -> f64 {
        self.animation.progress()
    }

    #[must_use]
    pub fn score_delta(&self) -> ScoreDelta {
        self.prev_monk_score
            .map_or_else(ScoreDelta::flat, |prev| ScoreDelta::between(prev, self.monk_score))
    }

    #[must_use]
    pub fn insight(&self) -> Insight {
        Insight::for_score(self.monk_score)
    }

    #[must_use]
    pub fn peer_phrase(&self) -> Option<&'static str> {
        self.peer
            .as_ref()
            .map(|peer| peer_phrase(self.monk_score, peer.monk_score))
    }

    #[must_use]
    pub fn hit_tester(&self) -> RadialHitTester {
        let reach = self.scale.radius * LABEL_ANCHOR_VALUE / self.scale.max_value + LABEL_HIT_RADIUS;
        RadialHitTester::new(self.scale, reach)
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

    /// Tap on a pillar: pins it, or releases it when it is already pinned.
    pub fn click(&mut self, local: ScreenPoint) -> PointerState {
        let hit = self.hit_tester();
        self.pointer.click(local, &hit)
    }

    pub fn touch_start(&mut self, local: ScreenPoint) -> PointerState {
        let hit = self.hit_tester();
        self.pointer.touch_start(local, &hit)
    }

    pub fn touch_end(&mut self, now_ms: f64) -> PointerState {
        self.pointer.touch_end(now_ms)
    }

    pub fn tick(&mut self, now_ms: f64) -> bool {
        self.pointer.tick(now_ms)
    }

    /// Click on the surrounding card.
    pub fn dismiss(&mut self) -> PointerState {
        self.pointer.dismiss()
    }

    #[must_use]
    pub fn hovered_pillar(&self) -> Option<Pillar> {
        match self.pointer.state().datum()? {
            PointerDatum::Category { index } => Pillar::from_index(index),
            _ => None,
        }
    }

    #[must_use]
    pub fn tooltip(&self) -> Option<SnowflakeTooltip> {
        let pillar = self.hovered_pillar()?;
        let anchor = self.pointer.state().tooltip?;
        let score = self.scores.get(pillar);
        Some(SnowflakeTooltip {
            pillar,
            score,
            color: self.palette.score_color(score),
            peer_score: self.peer.as_ref().map(|peer| peer.pillars.get(pillar)),
            anchor,
        })
    }

    fn ring(&self, scores: &PillarScores) -> PathData {
        let vertices = self.scale.pillar_vertices(scores, self.config.radar_min_value);
        cyclic_catmull_rom_to_bezier(&vertices, self.config.radar_tension)
    }

    #[must_use]
    pub fn geometry(&self) -> SnowflakeGeometry {
        let progress = self.animation.progress();
        let animated = self.scores.scaled(progress);
        let markers = Pillar::ALL
            .iter()
            .map(|pillar| self.scale.point(pillar.index(), animated.get(*pillar)))
            .collect();
        let (comparison, comparison_markers) = match &self.peer {
            Some(peer) => (
                Some(self.ring(&peer.pillars)),
                Pillar::ALL
                    .iter()
                    .map(|pillar| self.scale.point(pillar.index(), peer.pillars.get(*pillar)))
                    .collect(),
            ),
            None => (None, Vec::new()),
        };
        let rim = self.scale.max_value;
        SnowflakeGeometry {
            main: self.ring(&animated),
            markers,
            comparison,
            comparison_markers,
            grid_rings: GRID_LEVELS
                .iter()
                .map(|level| (*level, self.ring(&PillarScores::uniform(*level))))
                .collect(),
            spokes: (0..Pillar::ALL.len())
                .map(|index| (self.scale.center, self.scale.point(index, rim)))
                .collect(),
            label_anchors: (0..Pillar::ALL.len())
                .map(|index| self.scale.point(index, LABEL_ANCHOR_VALUE))
                .collect(),
        }
    }

    pub fn build_frame(&self) -> ChartResult<RenderFrame> {
        let geometry = self.geometry();
        let palette = self.palette;
        let overall = palette.score_color(self.monk_score);
        let hovered = self.hovered_pillar();
        let progress = self.animation.progress();
        let mut frame = RenderFrame::new(self.viewport());

        for (level, ring) in &geometry.grid_rings {
            let primitive = if *level == PEER_AVERAGE_LEVEL {
                PathPrimitive::stroked(ring.clone(), Color::rgba(1.0, 1.0, 1.0, 0.22), 2.0)
                    .dashed(0.0, 8.0)
            } else {
                let alpha = if *level == self.scale.max_value { 0.06 } else { 0.03 };
                PathPrimitive::stroked(ring.clone(), Color::rgba(1.0, 1.0, 1.0, alpha), 0.5)
            };
            frame.push_path(primitive);
        }
        let peer_label_at = self
            .scale
            .point_at_angle(self.scale.angle(1.5), PEER_AVERAGE_LEVEL);
        frame.texts.push(TextPrimitive::new(
            "Peer Avg",
            peer_label_at.x + 4.0,
            peer_label_at.y - 4.0,
            7.5,
            Color::rgba(1.0, 1.0, 1.0, 0.20),
            TextHAlign::Left,
        ));

        for (index, (from, to)) in geometry.spokes.iter().enumerate() {
            let alpha = if hovered.map(Pillar::index) == Some(index) { 0.12 } else { 0.04 };
            frame
                .lines
                .push(LinePrimitive::new(*from, *to, 0.5, Color::rgba(1.0, 1.0, 1.0, alpha)));
        }

        if let (Some(peer), Some(comparison)) = (&self.peer, &geometry.comparison) {
            frame.push_path(PathPrimitive::stroked(
                comparison.clone(),
                palette.accent.with_alpha(0.4),
                1.2,
            ));
            for marker in &geometry.comparison_markers {
                frame
                    .circles
                    .push(CirclePrimitive::filled(*marker, 3.0, palette.accent.with_alpha(0.5)));
            }
            let angle = self.scale.angle(3.5);
            let avg = (peer.pillars.health + peer.pillars.payout) / 2.0;
            let at = self.scale.point_at_angle(angle, avg);
            frame.texts.push(TextPrimitive::new(
                peer.ticker.clone(),
                at.x - 4.0,
                at.y + 4.0,
                7.5,
                palette.accent.with_alpha(0.5),
                TextHAlign::Right,
            ));
        }

        frame.push_path(
            PathPrimitive::filled(geometry.main.clone(), overall.with_alpha(0.12))
                .with_stroke(overall, 2.0),
        );

        for pillar in Pillar::ALL {
            let index = pillar.index();
            let score = self.scores.get(pillar);
            let color = palette.score_color(score);
            let active = hovered == Some(pillar);
            let marker = geometry.markers[index];
            frame.circles.push(CirclePrimitive::filled(
                marker,
                if active { 5.0 } else { 3.5 },
                color,
            ));
            let anchor = geometry.label_anchors[index];
            frame.texts.push(
                TextPrimitive::new(
                    pillar.label().to_ascii_uppercase(),
                    anchor.x,
                    anchor.y - 6.0,
                    9.5,
                    if active { palette.text_primary } else { palette.text_muted },
                    TextHAlign::Center,
                )
                .bold(),
            );
            frame.texts.push(
                TextPrimitive::new(
                    format!("{}th", (score * progress).round()),
                    anchor.x,
                    anchor.y + 7.0,
                    12.0,
                    if active { color } else { palette.text_secondary },
                    TextHAlign::Center,
                )
                .bold(),
            );
        }

        frame.validate()?;
        Ok(frame)
    }

    pub fn render<R: Renderer>(&self, renderer: &mut R) -> ChartResult<()> {
        let frame = self.build_frame()?;
        renderer.render(&frame)
    }
}
