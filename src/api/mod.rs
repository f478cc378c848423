//! Chart-level controllers and the contracts they are fed through.
//!
//! Each controller owns its geometry, pointer resolver and animation driver,
//! and materializes a validated `RenderFrame` on demand.

mod config;
mod data_provider;
mod evolution_chart;
mod factor_trend_chart;
mod fan_chart;
mod render_style;
mod snowflake_chart;
mod trend;

pub use config::ChartStyleConfig;
pub use data_provider::{
    CompanySnapshot, DataProvider, FetchTicket, HistoryRange, InMemoryDataProvider,
    RequestGenerations, ScoreSnapshot,
};
pub use evolution_chart::{
    EVOLUTION_GRID_VALUES, EVOLUTION_INSETS, EVOLUTION_VIEWPORT, EvolutionChart,
    EvolutionGeometry, EvolutionTooltip, MAX_X_LABELS, PEER_AVERAGE_SCORE, TooltipSide, XLabel,
    long_date_label, peer_comparison_label, short_date_label, x_label_indices,
};
pub use factor_trend_chart::{
    AxisLabel, FACTOR_INSETS, FACTOR_VIEWPORT, FactorObservation, FactorSeries, FactorTooltip,
    FactorTrendChart, FactorTrendGeometry, PeerBar, ReferenceKind, ReferenceLine, peer_bars,
};
pub use fan_chart::{
    FAN_INSETS, FAN_VIEWPORT, FORECAST_HORIZONS, FanChart, FanLayout, FanTip, HistoryPeriod,
    HorizonSummary, InlineLabel, LABELED_PILL_WIDTH, PLAIN_PILL_WIDTH, format_signed_percent,
    format_tick_price, format_usd, idle_horizon, pill_box_x,
};
pub use render_style::ChartPalette;
pub use snowflake_chart::{
    GRID_LEVELS, Insight, LABEL_ANCHOR_VALUE, LABEL_HIT_RADIUS, PEER_AVERAGE_LEVEL, PeerOverlay,
    SNOWFLAKE_RADIUS, SNOWFLAKE_SIZE, SnowflakeChart, SnowflakeGeometry, SnowflakeTooltip,
    peer_phrase,
};
pub use trend::{ScoreDelta, TrendDirection};
