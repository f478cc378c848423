//! Pointer interaction state shared by every chart.
//!
//! Each chart instance owns exactly one `PointerResolver`. Events are applied
//! synchronously in arrival order, so the most recent event always wins.

mod hit_test;
mod viewport_adapter;

pub use hit_test::{
    ForecastHitTester, HitTester, RadialHitTester, SeriesHitTester, resolve_series_index,
};
pub use viewport_adapter::{BoundingRectAdapter, ViewportAdapter};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::types::ScreenPoint;
use crate::error::{ChartError, ChartResult};

/// Coarse pointer phase derived from `PointerState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerPhase {
    Idle,
    Hovering,
    Pinned,
}

/// What a click does while a datum is pinned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ReleasePolicy {
    /// Clicking the pinned datum releases it; clicking another datum re-pins there.
    #[default]
    ToggleSameIndex,
    /// Any click while pinned releases.
    ReleaseOnAnyClick,
}

/// How the current pin was established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PinSource {
    /// Explicit click or tap; survives until the next click or dismissal.
    Click,
    /// Touch contact; released after the touch-end grace delay.
    Touch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatumKind {
    History,
    Future,
    Category,
    None,
}

/// Discrete datum a pointer can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PointerDatum {
    /// Sample index of a uniformly spaced series.
    History { index: usize },
    /// Forecast anchor horizon in years (`0` is today).
    Future { horizon: u32 },
    /// Axis index of a radial chart.
    Category { index: usize },
}

impl PointerDatum {
    #[must_use]
    pub fn kind(self) -> DatumKind {
        match self {
            PointerDatum::History { .. } => DatumKind::History,
            PointerDatum::Future { .. } => DatumKind::Future,
            PointerDatum::Category { .. } => DatumKind::Category,
        }
    }
}

/// Datum plus the screen position of its marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPointerDatum {
    pub datum: PointerDatum,
    pub screen_position: ScreenPoint,
}

/// Public pointer state exposed to presentation code. Read-only outside the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointerState {
    pub resolved: Option<ResolvedPointerDatum>,
    pub pinned: Option<PinSource>,
    /// Tooltip anchor relative to the chart's bounding box.
    pub tooltip: Option<ScreenPoint>,
}

impl PointerState {
    #[must_use]
    pub fn phase(&self) -> PointerPhase {
        match (self.resolved, self.pinned) {
            (None, _) => PointerPhase::Idle,
            (Some(_), None) => PointerPhase::Hovering,
            (Some(_), Some(_)) => PointerPhase::Pinned,
        }
    }

    #[must_use]
    pub fn is_pinned(&self) -> bool {
        self.pinned.is_some()
    }

    #[must_use]
    pub fn datum(&self) -> Option<PointerDatum> {
        self.resolved.map(|resolved| resolved.datum)
    }

    /// Hovered series index, when the resolved datum is a history sample.
    #[must_use]
    pub fn hover_index(&self) -> Option<usize> {
        match self.datum()? {
            PointerDatum::History { index } | PointerDatum::Category { index } => Some(index),
            PointerDatum::Future { .. } => None,
        }
    }

    #[must_use]
    pub fn kind(&self) -> DatumKind {
        self.datum().map_or(DatumKind::None, PointerDatum::kind)
    }
}

/// Tuning for touch handling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerConfig {
    pub release_policy: ReleasePolicy,
    /// Grace delay between touch end and release, so the last value stays readable.
    pub touch_release_delay_ms: f64,
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            release_policy: ReleasePolicy::ToggleSameIndex,
            touch_release_delay_ms: 800.0,
        }
    }
}

impl PointerConfig {
    pub fn validate(self) -> ChartResult<Self> {
        if !self.touch_release_delay_ms.is_finite() || self.touch_release_delay_ms < 0.0 {
            return Err(ChartError::InvalidData(
                "touch release delay must be finite and >= 0".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// Hover / pin / touch-scrub state machine.
///
/// `Idle -> Hovering -> Pinned -> Idle`. Moves are ignored while pinned by a
/// click; touch contact pins immediately and releases after a grace delay
/// unless a tap upgrades it to a click pin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerResolver {
    config: PointerConfig,
    state: PointerState,
    release_deadline_ms: Option<f64>,
}

impl PointerResolver {
    #[must_use]
    pub fn new(config: PointerConfig) -> Self {
        Self {
            config,
            state: PointerState::default(),
            release_deadline_ms: None,
        }
    }

    #[must_use]
    pub fn with_policy(release_policy: ReleasePolicy) -> Self {
        Self::new(PointerConfig {
            release_policy,
            ..PointerConfig::default()
        })
    }

    #[must_use]
    pub fn config(&self) -> PointerConfig {
        self.config
    }

    #[must_use]
    pub fn state(&self) -> PointerState {
        self.state
    }

    #[must_use]
    pub fn phase(&self) -> PointerPhase {
        self.state.phase()
    }

    #[must_use]
    pub fn pending_release_ms(&self) -> Option<f64> {
        self.release_deadline_ms
    }

    fn enter_idle(&mut self, reason: &'static str) {
        if self.state.phase() != PointerPhase::Idle {
            debug!(reason, "pointer -> idle");
        }
        self.state = PointerState::default();
        self.release_deadline_ms = None;
    }

    fn hover(&mut self, resolved: ResolvedPointerDatum, local: ScreenPoint) {
        let was = self.state.phase();
        self.state.resolved = Some(resolved);
        self.state.tooltip = Some(local);
        if was == PointerPhase::Idle {
            debug!(datum = ?resolved.datum, "pointer -> hovering");
        }
    }

    fn pin(&mut self, source: PinSource) {
        self.state.pinned = Some(source);
        self.release_deadline_ms = None;
        debug!(datum = ?self.state.datum(), ?source, "pointer -> pinned");
    }

    /// Pointer moved to `local`. Ignored while pinned.
    pub fn pointer_move(&mut self, local: ScreenPoint, hit: &impl HitTester) -> PointerState {
        if self.state.is_pinned() {
            return self.state;
        }
        match hit.hit_test(local) {
            Some(resolved) => self.hover(resolved, local),
            None => self.enter_idle("pointer outside plot"),
        }
        self.state
    }

    /// Pointer left the chart. Ignored while pinned.
    pub fn pointer_leave(&mut self) -> PointerState {
        if !self.state.is_pinned() {
            self.enter_idle("pointer left");
        }
        self.state
    }

    /// Click or tap at `local`.
    pub fn click(&mut self, local: ScreenPoint, hit: &impl HitTester) -> PointerState {
        match self.state.pinned {
            Some(PinSource::Touch) => {
                // The tap that follows a touch contact makes the pin explicit.
                if let Some(resolved) = hit.hit_test(local) {
                    self.hover(resolved, local);
                }
                self.pin(PinSource::Click);
            }
            Some(PinSource::Click) => match self.config.release_policy {
                ReleasePolicy::ReleaseOnAnyClick => self.enter_idle("click released pin"),
                ReleasePolicy::ToggleSameIndex => {
                    if let Some(resolved) = hit.hit_test(local) {
                        if Some(resolved.datum) == self.state.datum() {
                            self.enter_idle("click toggled pin off");
                        } else {
                            self.hover(resolved, local);
                            self.pin(PinSource::Click);
                        }
                    }
                }
            },
            None => {
                if self.state.resolved.is_none() {
                    if let Some(resolved) = hit.hit_test(local) {
                        self.hover(resolved, local);
                    }
                }
                if self.state.resolved.is_some() {
                    self.pin(PinSource::Click);
                }
            }
        }
        self.state
    }

    /// Touch contact: resolve and pin in one step.
    pub fn touch_start(&mut self, local: ScreenPoint, hit: &impl HitTester) -> PointerState {
        if self.state.pinned == Some(PinSource::Click) {
            return self.state;
        }
        match hit.hit_test(local) {
            Some(resolved) => {
                self.hover(resolved, local);
                self.pin(PinSource::Touch);
            }
            None => self.enter_idle("touch outside plot"),
        }
        self.state
    }

    /// Touch scrub: follows the finger while the pin came from touch.
    pub fn touch_move(&mut self, local: ScreenPoint, hit: &impl HitTester) -> PointerState {
        if self.state.pinned == Some(PinSource::Click) {
            return self.state;
        }
        match hit.hit_test(local) {
            Some(resolved) => {
                self.hover(resolved, local);
                self.release_deadline_ms = None;
            }
            None => self.enter_idle("touch scrubbed outside plot"),
        }
        self.state
    }

    /// Touch lifted at `now_ms`; schedules release after the grace delay.
    pub fn touch_end(&mut self, now_ms: f64) -> PointerState {
        if self.state.pinned != Some(PinSource::Click) && self.state.resolved.is_some() {
            self.release_deadline_ms = Some(now_ms + self.config.touch_release_delay_ms);
        }
        self.state
    }

    /// Applies a due touch release. Returns `true` when the state changed.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        match self.release_deadline_ms {
            Some(deadline) if now_ms >= deadline => {
                self.enter_idle("touch grace elapsed");
                true
            }
            _ => false,
        }
    }

    /// Releases a pin from outside the chart (e.g. a click on the surrounding card).
    pub fn dismiss(&mut self) -> PointerState {
        if self.state.is_pinned() {
            self.enter_idle("dismissed");
        }
        self.state
    }

    /// Dataset changed: indices may no longer exist, so always reset.
    pub fn reset(&mut self) -> PointerState {
        debug!("pointer reset for new dataset");
        self.state = PointerState::default();
        self.release_deadline_ms = None;
        self.state
    }
}
