pub mod animation;
pub mod cone;
pub mod curves;
pub mod labels;
pub mod path;
pub mod primitives;
pub mod radial;
pub mod scale;
pub mod ticks;
pub mod types;
pub mod windowing;

pub use animation::{AnimationDriver, Easing};
pub use cone::{
    CONE_BANDS, ConeLayout, ConeNode, Percentile, PercentileBracket, PercentileBracketSet,
    ProbabilityCone, band_path, build_cone_nodes, edge_path, fraction_positive,
    horizon_x_position, snap_to_nearest_anchor, to_ten_scale,
};
pub use curves::{
    CurveTuning, area_under_curve, cyclic_catmull_rom_to_bezier, open_cardinal_spline, polyline,
    scale_toward,
};
pub use labels::{LabelCandidate, LabelLayoutConfig, PlacedLabel, resolve_label_collisions};
pub use path::{PathCommand, PathData};
pub use radial::{RadialScale, TWELVE_O_CLOCK, radial_point};
pub use scale::{AxisDirection, LinearScale, ScaleDomain, index_x, scale_x, scale_y};
pub use ticks::{HistoryMark, history_marks, nice_step, nice_value_ticks};
pub use types::{
    Insets, Pillar, PillarScores, PlotArea, ScoreBucket, ScreenPoint, TimeSeriesPoint, Viewport,
};
pub use windowing::{downsample_indices, samples_in_date_window, trailing_months};
