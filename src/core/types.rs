use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Inner padding between the canvas edge and the plot rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Insets {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Insets {
    #[must_use]
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

/// Plot rectangle in canvas pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> ChartResult<Self> {
        if !left.is_finite() || !top.is_finite() || !width.is_finite() || !height.is_finite() {
            return Err(ChartError::InvalidData(
                "plot area bounds must be finite".to_owned(),
            ));
        }
        if width <= 0.0 || height <= 0.0 {
            return Err(ChartError::InvalidData(
                "plot area width and height must be > 0".to_owned(),
            ));
        }
        Ok(Self {
            left,
            top,
            width,
            height,
        })
    }

    /// Carves the plot rectangle out of a canvas using fixed insets.
    pub fn from_viewport(viewport: Viewport, insets: Insets) -> ChartResult<Self> {
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        Self::new(
            insets.left,
            insets.top,
            f64::from(viewport.width) - insets.left - insets.right,
            f64::from(viewport.height) - insets.top - insets.bottom,
        )
    }

    #[must_use]
    pub fn right(self) -> f64 {
        self.left + self.width
    }

    #[must_use]
    pub fn bottom(self) -> f64 {
        self.top + self.height
    }

    /// Horizontal position expressed as a fraction of the plot width.
    ///
    /// Values outside `[0, 1]` are returned as-is so callers can detect
    /// pointers beyond the plot edges.
    #[must_use]
    pub fn fraction_x(self, x: f64) -> f64 {
        (x - self.left) / self.width
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One sample of an ordered time series. Insertion order is chronological order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
    #[serde(default)]
    pub label: Option<String>,
}

impl TimeSeriesPoint {
    #[must_use]
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self {
            date,
            value,
            label: None,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// The five weighted sub-scores composing a MonkScore, in radar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pillar {
    Value,
    Growth,
    Profitability,
    Health,
    Payout,
}

impl Pillar {
    /// Fixed cyclic axis order shared by every radial chart instance.
    pub const ALL: [Pillar; 5] = [
        Pillar::Value,
        Pillar::Growth,
        Pillar::Profitability,
        Pillar::Health,
        Pillar::Payout,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Pillar::Value => 0,
            Pillar::Growth => 1,
            Pillar::Profitability => 2,
            Pillar::Health => 3,
            Pillar::Payout => 4,
        }
    }

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Pillar::Value => "value",
            Pillar::Growth => "growth",
            Pillar::Profitability => "profitability",
            Pillar::Health => "health",
            Pillar::Payout => "payout",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Pillar::Value => "Value",
            Pillar::Growth => "Growth",
            Pillar::Profitability => "Profitability",
            Pillar::Health => "Health",
            Pillar::Payout => "Payout",
        }
    }
}

/// Score per pillar. Any numeric range is accepted; dashboards use 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PillarScores {
    pub value: f64,
    pub growth: f64,
    pub profitability: f64,
    pub health: f64,
    pub payout: f64,
}

impl PillarScores {
    #[must_use]
    pub const fn new(value: f64, growth: f64, profitability: f64, health: f64, payout: f64) -> Self {
        Self {
            value,
            growth,
            profitability,
            health,
            payout,
        }
    }

    /// Same score on every axis, used for grid rings.
    #[must_use]
    pub const fn uniform(score: f64) -> Self {
        Self::new(score, score, score, score, score)
    }

    #[must_use]
    pub fn get(&self, pillar: Pillar) -> f64 {
        match pillar {
            Pillar::Value => self.value,
            Pillar::Growth => self.growth,
            Pillar::Profitability => self.profitability,
            Pillar::Health => self.health,
            Pillar::Payout => self.payout,
        }
    }

    /// Values in the fixed `Pillar::ALL` order.
    #[must_use]
    pub fn ordered(&self) -> [f64; 5] {
        Pillar::ALL.map(|pillar| self.get(pillar))
    }

    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(
            self.value * factor,
            self.growth * factor,
            self.profitability * factor,
            self.health * factor,
            self.payout * factor,
        )
    }
}

/// Coarse 10-point score range used to key historical outcome statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoreBucket {
    pub lower: u8,
}

impl ScoreBucket {
    #[must_use]
    pub fn for_score(score: f64) -> Self {
        let clamped = score.clamp(0.0, 99.0);
        let lower = ((clamped / 10.0).floor() as u8) * 10;
        Self { lower }
    }

    #[must_use]
    pub fn upper(self) -> u8 {
        self.lower + 10
    }

    /// Bucket key in the `"70-80"` form used by the outcome statistics store.
    #[must_use]
    pub fn key(self) -> String {
        format!("{}-{}", self.lower, self.upper())
    }
}
