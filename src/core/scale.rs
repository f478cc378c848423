use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{ChartError, ChartResult};

/// Span substituted for a zero-width domain so mapping never divides by zero.
pub const DEGENERATE_DOMAIN_SPAN: f64 = 1.0;

/// Numeric extent of one axis.
///
/// `max == min` is accepted and mapped with `DEGENERATE_DOMAIN_SPAN`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleDomain {
    pub min: f64,
    pub max: f64,
}

impl ScaleDomain {
    pub fn new(min: f64, max: f64) -> ChartResult<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(ChartError::InvalidData(
                "scale domain must be finite".to_owned(),
            ));
        }
        if max < min {
            return Err(ChartError::InvalidData(format!(
                "scale domain max ({max}) must be >= min ({min})"
            )));
        }
        Ok(Self { min, max })
    }

    /// Fits the union of all finite values and pads both ends by
    /// `padding_ratio` of the span.
    ///
    /// Returns `None` when no finite value is present. A flat input is padded
    /// around `DEGENERATE_DOMAIN_SPAN`.
    #[must_use]
    pub fn from_values<I>(values: I, padding_ratio: f64) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut lo: Option<OrderedFloat<f64>> = None;
        let mut hi: Option<OrderedFloat<f64>> = None;
        for value in values.into_iter().filter(|v| v.is_finite()) {
            let value = OrderedFloat(value);
            lo = Some(lo.map_or(value, |current| current.min(value)));
            hi = Some(hi.map_or(value, |current| current.max(value)));
        }
        let (min, max) = (lo?.into_inner(), hi?.into_inner());
        let raw = Self { min, max };
        let pad = raw.span() * padding_ratio.max(0.0);
        Some(Self {
            min: min - pad,
            max: max + pad,
        })
    }

    #[must_use]
    pub fn is_degenerate(self) -> bool {
        self.max == self.min
    }

    /// Effective span used for mapping.
    #[must_use]
    pub fn span(self) -> f64 {
        let span = self.max - self.min;
        if span == 0.0 {
            trace!(min = self.min, "degenerate scale domain, substituting unit span");
            DEGENERATE_DOMAIN_SPAN
        } else {
            span
        }
    }

    /// Position of `value` inside the domain, `0` at `min` and `1` at `max`.
    #[must_use]
    pub fn normalize(self, value: f64) -> f64 {
        (value - self.min) / self.span()
    }

    #[must_use]
    pub fn contains(self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Direction in which pixel coordinates grow relative to domain values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AxisDirection {
    /// Larger values map to larger pixel coordinates (X axes).
    #[default]
    Forward,
    /// Larger values map to smaller pixel coordinates (screen Y axes).
    Inverted,
}

/// Affine map from a value domain onto a pixel range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain: ScaleDomain,
    range_start: f64,
    range_length: f64,
    direction: AxisDirection,
}

impl LinearScale {
    pub fn new(
        domain: ScaleDomain,
        range_start: f64,
        range_length: f64,
        direction: AxisDirection,
    ) -> ChartResult<Self> {
        if !range_start.is_finite() || !range_length.is_finite() || range_length <= 0.0 {
            return Err(ChartError::InvalidData(
                "scale range must be finite with length > 0".to_owned(),
            ));
        }
        Ok(Self {
            domain,
            range_start,
            range_length,
            direction,
        })
    }

    /// Horizontal scale: `domain.min` lands on `left`.
    pub fn horizontal(domain: ScaleDomain, left: f64, width: f64) -> ChartResult<Self> {
        Self::new(domain, left, width, AxisDirection::Forward)
    }

    /// Vertical scale: `domain.max` lands on `top`, `domain.min` on `top + height`.
    pub fn vertical(domain: ScaleDomain, top: f64, height: f64) -> ChartResult<Self> {
        Self::new(domain, top, height, AxisDirection::Inverted)
    }

    #[must_use]
    pub fn domain(self) -> ScaleDomain {
        self.domain
    }

    #[must_use]
    pub fn direction(self) -> AxisDirection {
        self.direction
    }

    #[must_use]
    pub fn to_pixel(self, value: f64) -> f64 {
        match self.direction {
            AxisDirection::Forward => scale_x(value, self.domain, self.range_start, self.range_length),
            AxisDirection::Inverted => scale_y(value, self.domain, self.range_start, self.range_length),
        }
    }

    #[must_use]
    pub fn to_domain(self, pixel: f64) -> f64 {
        let normalized = (pixel - self.range_start) / self.range_length;
        let normalized = match self.direction {
            AxisDirection::Forward => normalized,
            AxisDirection::Inverted => 1.0 - normalized,
        };
        self.domain.min + normalized * self.domain.span()
    }
}

/// Forward affine map used for horizontal axes.
#[must_use]
pub fn scale_x(value: f64, domain: ScaleDomain, range_start: f64, range_length: f64) -> f64 {
    range_start + domain.normalize(value) * range_length
}

/// Inverted affine map for screen Y: a higher value yields a smaller Y.
#[must_use]
pub fn scale_y(value: f64, domain: ScaleDomain, range_start: f64, range_length: f64) -> f64 {
    range_start + range_length - domain.normalize(value) * range_length
}

/// X coordinate of sample `index` out of `total` evenly spaced samples.
///
/// A single sample sits at the horizontal center of the range.
#[must_use]
pub fn index_x(index: usize, total: usize, range_start: f64, range_length: f64) -> f64 {
    if total <= 1 {
        return range_start + range_length / 2.0;
    }
    range_start + (index as f64 / (total - 1) as f64) * range_length
}
