use serde::{Deserialize, Serialize};

use crate::core::types::ScreenPoint;
use crate::error::{ChartError, ChartResult};

/// Converts host (window/page) coordinates into chart-local coordinates.
///
/// The pointer resolver only ever sees local coordinates; hosts wrap whatever
/// bounding-box query their platform offers behind this trait.
pub trait ViewportAdapter {
    fn to_local_coordinates(&self, global_x: f64, global_y: f64) -> ScreenPoint;
}

/// Adapter for a chart drawn into a fixed view box and displayed at an
/// arbitrary client rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingRectAdapter {
    pub client_left: f64,
    pub client_top: f64,
    pub client_width: f64,
    pub client_height: f64,
    pub view_width: f64,
    pub view_height: f64,
}

impl BoundingRectAdapter {
    pub fn new(
        client_left: f64,
        client_top: f64,
        client_width: f64,
        client_height: f64,
        view_width: f64,
        view_height: f64,
    ) -> ChartResult<Self> {
        for (name, value) in [
            ("client_width", client_width),
            ("client_height", client_height),
            ("view_width", view_width),
            ("view_height", view_height),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "{name} must be finite and > 0"
                )));
            }
        }
        if !client_left.is_finite() || !client_top.is_finite() {
            return Err(ChartError::InvalidData(
                "client rect origin must be finite".to_owned(),
            ));
        }
        Ok(Self {
            client_left,
            client_top,
            client_width,
            client_height,
            view_width,
            view_height,
        })
    }

    /// Client rect displayed at exactly the view-box size.
    pub fn unscaled(client_left: f64, client_top: f64, width: f64, height: f64) -> ChartResult<Self> {
        Self::new(client_left, client_top, width, height, width, height)
    }
}

impl ViewportAdapter for BoundingRectAdapter {
    fn to_local_coordinates(&self, global_x: f64, global_y: f64) -> ScreenPoint {
        ScreenPoint::new(
            (global_x - self.client_left) * (self.view_width / self.client_width),
            (global_y - self.client_top) * (self.view_height / self.client_height),
        )
    }
}
