use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::trace;

use crate::error::{ChartError, ChartResult};

/// Fixed-iteration label spacing constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelLayoutConfig {
    pub label_height: f64,
    pub min_gap: f64,
    pub passes: u32,
}

impl Default for LabelLayoutConfig {
    fn default() -> Self {
        Self {
            label_height: 15.0,
            min_gap: 2.0,
            passes: 3,
        }
    }
}

impl LabelLayoutConfig {
    pub fn validate(self) -> ChartResult<Self> {
        if !self.label_height.is_finite() || self.label_height <= 0.0 {
            return Err(ChartError::InvalidData(
                "label height must be finite and > 0".to_owned(),
            ));
        }
        if !self.min_gap.is_finite() || self.min_gap < 0.0 {
            return Err(ChartError::InvalidData(
                "label min gap must be finite and >= 0".to_owned(),
            ));
        }
        if self.passes == 0 {
            return Err(ChartError::InvalidData(
                "label layout needs at least one pass".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// Label wanting to sit vertically centered on `anchor_y`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelCandidate {
    pub anchor_y: f64,
    pub height: f64,
    pub priority_order: usize,
}

impl LabelCandidate {
    #[must_use]
    pub fn new(anchor_y: f64, height: f64, priority_order: usize) -> Self {
        Self {
            anchor_y,
            height,
            priority_order,
        }
    }
}

/// Resolved label box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacedLabel {
    pub top: f64,
    pub height: f64,
    pub priority_order: usize,
}

impl PlacedLabel {
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Spreads labels that share a vertical axis so they stop overlapping.
///
/// `candidates` must already be ordered top to bottom. Each pass walks
/// adjacent pairs and pushes both apart by half of their overlap (including
/// `min_gap`); afterwards every top edge is clamped into
/// `[bounds_top, bounds_bottom - height]`.
///
/// This is a cheap heuristic: pathological inputs may keep a small residual
/// overlap after `config.passes`.
#[must_use]
pub fn resolve_label_collisions(
    candidates: &[LabelCandidate],
    bounds_top: f64,
    bounds_bottom: f64,
    config: LabelLayoutConfig,
) -> Vec<PlacedLabel> {
    let mut placed: SmallVec<[PlacedLabel; 4]> = candidates
        .iter()
        .map(|candidate| PlacedLabel {
            top: candidate.anchor_y - candidate.height / 2.0,
            height: candidate.height,
            priority_order: candidate.priority_order,
        })
        .collect();

    for _ in 0..config.passes {
        for i in 1..placed.len() {
            let overlap = (placed[i - 1].top + placed[i - 1].height + config.min_gap) - placed[i].top;
            if overlap > 0.0 {
                placed[i - 1].top -= overlap / 2.0;
                placed[i].top += overlap / 2.0;
            }
        }
    }

    for label in &mut placed {
        let max_top = (bounds_bottom - label.height).max(bounds_top);
        label.top = label.top.clamp(bounds_top, max_top);
    }

    if placed
        .windows(2)
        .any(|pair| pair[0].bottom() > pair[1].top)
    {
        trace!(labels = placed.len(), "label layout left residual overlap");
    }

    placed.into_vec()
}
