use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::path::PathData;
use crate::core::primitives::lerp;
use crate::core::scale::LinearScale;
use crate::core::types::ScreenPoint;
use crate::error::{ChartError, ChartResult};

/// Returned by `fraction_positive` when even P10 is a gain.
pub const ALL_POSITIVE_PERCENT: f64 = 97.0;
/// Returned by `fraction_positive` when even P90 is a loss.
pub const ALL_NEGATIVE_PERCENT: f64 = 3.0;

/// Tracked percentiles of an outcome distribution, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Percentile {
    P10,
    P25,
    P40,
    P50,
    P60,
    P75,
    P90,
}

impl Percentile {
    pub const ALL: [Percentile; 7] = [
        Percentile::P10,
        Percentile::P25,
        Percentile::P40,
        Percentile::P50,
        Percentile::P60,
        Percentile::P75,
        Percentile::P90,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Percentile::P10 => 0,
            Percentile::P25 => 1,
            Percentile::P40 => 2,
            Percentile::P50 => 3,
            Percentile::P60 => 4,
            Percentile::P75 => 5,
            Percentile::P90 => 6,
        }
    }

    /// Percentile rank on the 0..=100 scale.
    #[must_use]
    pub const fn rank(self) -> f64 {
        match self {
            Percentile::P10 => 10.0,
            Percentile::P25 => 25.0,
            Percentile::P40 => 40.0,
            Percentile::P50 => 50.0,
            Percentile::P60 => 60.0,
            Percentile::P75 => 75.0,
            Percentile::P90 => 90.0,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Percentile::P10 => "P10",
            Percentile::P25 => "P25",
            Percentile::P40 => "P40",
            Percentile::P50 => "P50",
            Percentile::P60 => "P60",
            Percentile::P75 => "P75",
            Percentile::P90 => "P90",
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct RawPercentileBracket {
    horizon: u32,
    p10: f64,
    p25: f64,
    p40: f64,
    p50: f64,
    p60: f64,
    p75: f64,
    p90: f64,
}

impl TryFrom<RawPercentileBracket> for PercentileBracket {
    type Error = ChartError;

    fn try_from(raw: RawPercentileBracket) -> ChartResult<Self> {
        PercentileBracket::new(
            raw.horizon,
            [raw.p10, raw.p25, raw.p40, raw.p50, raw.p60, raw.p75, raw.p90],
        )
    }
}

/// Empirical fractional returns (`0.12` = +12%) at one discrete horizon.
///
/// Returns are validated on construction to be finite and non-decreasing
/// from P10 to P90, which the zero-crossing interpolation relies on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPercentileBracket")]
pub struct PercentileBracket {
    horizon: u32,
    p10: f64,
    p25: f64,
    p40: f64,
    p50: f64,
    p60: f64,
    p75: f64,
    p90: f64,
}

impl PercentileBracket {
    /// Builds a bracket from returns ordered P10, P25, P40, P50, P60, P75, P90.
    pub fn new(horizon: u32, returns: [f64; 7]) -> ChartResult<Self> {
        if let Some(index) = returns.iter().position(|r| !r.is_finite()) {
            return Err(ChartError::MalformedBracket {
                horizon,
                detail: format!("{} return is not finite", Percentile::ALL[index].label()),
            });
        }
        for (i, pair) in returns.windows(2).enumerate() {
            if pair[1] < pair[0] {
                return Err(ChartError::MalformedBracket {
                    horizon,
                    detail: format!(
                        "{} ({}) is below {} ({})",
                        Percentile::ALL[i + 1].label(),
                        pair[1],
                        Percentile::ALL[i].label(),
                        pair[0]
                    ),
                });
            }
        }
        let [p10, p25, p40, p50, p60, p75, p90] = returns;
        Ok(Self {
            horizon,
            p10,
            p25,
            p40,
            p50,
            p60,
            p75,
            p90,
        })
    }

    #[must_use]
    pub fn horizon(&self) -> u32 {
        self.horizon
    }

    #[must_use]
    pub fn get(&self, percentile: Percentile) -> f64 {
        match percentile {
            Percentile::P10 => self.p10,
            Percentile::P25 => self.p25,
            Percentile::P40 => self.p40,
            Percentile::P50 => self.p50,
            Percentile::P60 => self.p60,
            Percentile::P75 => self.p75,
            Percentile::P90 => self.p90,
        }
    }

    #[must_use]
    pub fn median(&self) -> f64 {
        self.p50
    }

    /// `(return, rank)` pairs from P10 to P90.
    #[must_use]
    pub fn pairs(&self) -> [(f64, f64); 7] {
        Percentile::ALL.map(|p| (self.get(p), p.rank()))
    }

    /// Price implied by `percentile` when applied to `current_price`.
    #[must_use]
    pub fn price_at(&self, percentile: Percentile, current_price: f64) -> f64 {
        current_price * (1.0 + self.get(percentile))
    }
}

/// Brackets keyed by horizon in years, only at the horizons a provider supplies.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PercentileBracketSet {
    brackets: IndexMap<u32, PercentileBracket>,
}

impl PercentileBracketSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_brackets<I>(brackets: I) -> Self
    where
        I: IntoIterator<Item = PercentileBracket>,
    {
        let mut set = Self::new();
        for bracket in brackets {
            set.insert(bracket);
        }
        set
    }

    /// Inserts or replaces the bracket for its horizon, keeping horizons sorted.
    pub fn insert(&mut self, bracket: PercentileBracket) {
        self.brackets.insert(bracket.horizon(), bracket);
        self.brackets.sort_keys();
    }

    /// Bracket for `horizon`; an unknown horizon is a caller bug.
    pub fn get(&self, horizon: u32) -> ChartResult<&PercentileBracket> {
        self.brackets
            .get(&horizon)
            .ok_or(ChartError::MissingHorizon { horizon })
    }

    #[must_use]
    pub fn contains(&self, horizon: u32) -> bool {
        self.brackets.contains_key(&horizon)
    }

    #[must_use]
    pub fn horizons(&self) -> Vec<u32> {
        self.brackets.keys().copied().collect()
    }

    #[must_use]
    pub fn max_horizon(&self) -> Option<u32> {
        self.brackets.keys().copied().max()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.brackets.is_empty()
    }
}

/// Share of outcomes with a positive return, on the 0..=100 scale.
///
/// Finds the adjacent pair of tracked returns that straddles zero,
/// interpolates the percentile rank at the crossing and returns
/// `100 - rank`, rounded to a whole percent.
#[must_use]
pub fn fraction_positive(bracket: &PercentileBracket) -> f64 {
    let pairs = bracket.pairs();
    for window in pairs.windows(2) {
        let (ra, pa) = window[0];
        let (rb, pb) = window[1];
        if ra <= 0.0 && 0.0 <= rb {
            let t = if rb == ra { 0.0 } else { (0.0 - ra) / (rb - ra) };
            return (100.0 - lerp(pa, pb, t)).round();
        }
    }
    if pairs[0].0 > 0.0 {
        return ALL_POSITIVE_PERCENT;
    }
    if pairs[pairs.len() - 1].0 < 0.0 {
        return ALL_NEGATIVE_PERCENT;
    }
    if bracket.median() > 0.0 { 70.0 } else { 30.0 }
}

/// "N in 10" framing of a percentage, clamped to `1..=10`.
#[must_use]
pub fn to_ten_scale(percent: f64) -> u8 {
    (percent / 10.0).round().clamp(1.0, 10.0) as u8
}

/// X of a horizon on a forecast axis where `0` ("today") sits at `origin_x`.
#[must_use]
pub fn horizon_x_position(horizon: f64, max_horizon: f64, origin_x: f64, available_width: f64) -> f64 {
    if max_horizon <= 0.0 {
        return origin_x;
    }
    origin_x + (horizon / max_horizon) * available_width
}

/// Anchor owning the equal-width zone that contains `fraction`.
///
/// `[0, 1]` is split into one zone per anchor, `i/N .. (i+1)/N`, regardless of
/// the anchors' time distance. A fraction exactly on a boundary belongs to the
/// later zone; `1.0` belongs to the last anchor. Fractions are clamped first.
#[must_use]
pub fn snap_to_nearest_anchor(fraction: f64, anchors: &[u32]) -> Option<u32> {
    if anchors.is_empty() {
        return None;
    }
    let fraction = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };
    let zones = anchors.len();
    let index = ((fraction * zones as f64).floor() as usize).min(zones - 1);
    Some(anchors[index])
}

/// Screen-space cone cross-section at one horizon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConeNode {
    pub horizon: u32,
    pub x: f64,
    ys: [f64; 7],
}

impl ConeNode {
    #[must_use]
    pub fn y(&self, percentile: Percentile) -> f64 {
        self.ys[percentile.index()]
    }

    #[must_use]
    pub fn point(&self, percentile: Percentile) -> ScreenPoint {
        ScreenPoint::new(self.x, self.y(percentile))
    }
}

/// Layout inputs shared by every node of one cone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConeLayout {
    pub current_price: f64,
    pub price_scale: LinearScale,
    pub origin_x: f64,
    pub available_width: f64,
    pub max_horizon: u32,
}

impl ConeLayout {
    #[must_use]
    pub fn origin(&self) -> ScreenPoint {
        ScreenPoint::new(self.origin_x, self.price_scale.to_pixel(self.current_price))
    }

    #[must_use]
    pub fn horizon_x(&self, horizon: u32) -> f64 {
        horizon_x_position(
            f64::from(horizon),
            f64::from(self.max_horizon),
            self.origin_x,
            self.available_width,
        )
    }
}

/// Builds one node per requested horizon, left to right.
///
/// Horizon `0` is the origin and is skipped. Any other horizon missing from
/// `brackets` fails with `MissingHorizon`.
pub fn build_cone_nodes(
    brackets: &PercentileBracketSet,
    horizons: &[u32],
    layout: &ConeLayout,
) -> ChartResult<Vec<ConeNode>> {
    let mut nodes = Vec::with_capacity(horizons.len());
    for &horizon in horizons.iter().filter(|h| **h > 0) {
        let bracket = brackets.get(horizon)?;
        let ys = Percentile::ALL.map(|p| {
            layout
                .price_scale
                .to_pixel(bracket.price_at(p, layout.current_price))
        });
        nodes.push(ConeNode {
            horizon,
            x: layout.horizon_x(horizon),
            ys,
        });
    }
    nodes.sort_by_key(|node| node.horizon);
    Ok(nodes)
}

/// Closed band from `origin` out along `high` and back along `low`.
#[must_use]
pub fn band_path(origin: ScreenPoint, nodes: &[ConeNode], high: Percentile, low: Percentile) -> PathData {
    if nodes.is_empty() {
        return PathData::empty();
    }
    let mut path = PathData::with_capacity(nodes.len() * 2 + 2);
    path.move_to(origin);
    for node in nodes {
        path.line_to(node.point(high));
    }
    for node in nodes.iter().rev() {
        path.line_to(node.point(low));
    }
    path.close();
    path
}

/// Open polyline from `origin` through one percentile of every node.
#[must_use]
pub fn edge_path(origin: ScreenPoint, nodes: &[ConeNode], percentile: Percentile) -> PathData {
    if nodes.is_empty() {
        return PathData::empty();
    }
    let mut path = PathData::with_capacity(nodes.len() + 1);
    path.move_to(origin);
    for node in nodes {
        path.line_to(node.point(percentile));
    }
    path
}

/// Band pairs drawn from outermost to innermost.
pub const CONE_BANDS: [(Percentile, Percentile); 3] = [
    (Percentile::P90, Percentile::P10),
    (Percentile::P75, Percentile::P25),
    (Percentile::P60, Percentile::P40),
];

/// Complete fan geometry sharing one origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityCone {
    pub origin: ScreenPoint,
    pub nodes: Vec<ConeNode>,
    /// P10–P90, P25–P75, P40–P60 in that order.
    pub bands: Vec<PathData>,
    pub edge_p10: PathData,
    pub edge_p90: PathData,
    pub median: PathData,
}

impl ProbabilityCone {
    pub fn build(
        brackets: &PercentileBracketSet,
        horizons: &[u32],
        layout: &ConeLayout,
    ) -> ChartResult<Self> {
        let origin = layout.origin();
        let nodes = build_cone_nodes(brackets, horizons, layout)?;
        let bands = CONE_BANDS
            .iter()
            .map(|(high, low)| band_path(origin, &nodes, *high, *low))
            .collect();
        debug!(
            nodes = nodes.len(),
            origin_x = origin.x,
            origin_y = origin.y,
            "built probability cone"
        );
        Ok(Self {
            origin,
            edge_p10: edge_path(origin, &nodes, Percentile::P10),
            edge_p90: edge_path(origin, &nodes, Percentile::P90),
            median: edge_path(origin, &nodes, Percentile::P50),
            bands,
            nodes,
        })
    }

    #[must_use]
    pub fn node(&self, horizon: u32) -> Option<&ConeNode> {
        self.nodes.iter().find(|node| node.horizon == horizon)
    }
}
