//! monkscore-charts: geometry, interaction and scene building for the
//! MonkScore dashboard charts.
//!
//! `core` is pure math (scales, curve fitting, probability cone, label
//! layout), `interaction` resolves pointer input into datums, `api` holds the
//! chart controllers, and `render` turns their frames into output.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{
    ChartPalette, ChartStyleConfig, DataProvider, EvolutionChart, FactorTrendChart, FanChart,
    InMemoryDataProvider, SnowflakeChart,
};
pub use error::{ChartError, ChartResult};
