use approx::assert_abs_diff_eq;
use monkscore_charts::core::{
    CurveTuning, PathCommand, PathData, ScreenPoint, area_under_curve,
    cyclic_catmull_rom_to_bezier, open_cardinal_spline, polyline, scale_toward,
};

fn pentagon() -> Vec<ScreenPoint> {
    vec![
        ScreenPoint::new(160.0, 40.0),
        ScreenPoint::new(274.1, 122.9),
        ScreenPoint::new(230.5, 257.1),
        ScreenPoint::new(89.5, 257.1),
        ScreenPoint::new(45.9, 122.9),
    ]
}

fn series() -> Vec<ScreenPoint> {
    vec![
        ScreenPoint::new(0.0, 100.0),
        ScreenPoint::new(10.0, 80.0),
        ScreenPoint::new(20.0, 90.0),
        ScreenPoint::new(30.0, 60.0),
    ]
}

#[test]
fn cyclic_fit_emits_one_segment_per_vertex_and_closes() {
    let points = pentagon();
    let path = cyclic_catmull_rom_to_bezier(&points, 0.35);

    assert_eq!(path.len(), 1 + points.len() + 1);
    assert!(path.is_closed());
    assert_eq!(path.start_point(), Some(points[0]));

    let cubic_ends: Vec<ScreenPoint> = path
        .commands()
        .iter()
        .filter_map(|command| match command {
            PathCommand::CubicTo { to, .. } => Some(*to),
            _ => None,
        })
        .collect();
    assert_eq!(cubic_ends.len(), 5);
    assert_eq!(cubic_ends[4], points[0]);
}

#[test]
fn cyclic_fit_needs_three_points() {
    let points = pentagon();
    assert!(cyclic_catmull_rom_to_bezier(&points[..2], 0.35).is_empty());
    assert!(cyclic_catmull_rom_to_bezier(&[], 0.35).is_empty());
}

#[test]
fn zero_tension_collapses_control_points_onto_vertices() {
    let points = pentagon();
    let path = cyclic_catmull_rom_to_bezier(&points, 0.0);
    match path.commands()[1] {
        PathCommand::CubicTo { ctrl1, ctrl2, to } => {
            assert_eq!(ctrl1, points[0]);
            assert_eq!(ctrl2, points[1]);
            assert_eq!(to, points[1]);
        }
        other => panic!("expected cubic segment, got {other:?}"),
    }
}

#[test]
fn cyclic_control_points_follow_neighbor_tangent() {
    let points = pentagon();
    let tension = 0.35;
    let path = cyclic_catmull_rom_to_bezier(&points, tension);
    let PathCommand::CubicTo { ctrl1, .. } = path.commands()[1] else {
        panic!("expected cubic segment");
    };
    // First segment: p0 wraps to the last vertex.
    let expected_x = points[0].x + (points[1].x - points[4].x) * tension;
    let expected_y = points[0].y + (points[1].y - points[4].y) * tension;
    assert_abs_diff_eq!(ctrl1.x, expected_x, epsilon = 1e-9);
    assert_abs_diff_eq!(ctrl1.y, expected_y, epsilon = 1e-9);
}

#[test]
fn open_spline_passes_through_every_point() {
    let points = series();
    let path = open_cardinal_spline(&points, 0.3);

    assert_eq!(path.len(), points.len());
    assert!(!path.is_closed());
    let ends: Vec<ScreenPoint> = path
        .commands()
        .iter()
        .skip(1)
        .filter_map(|command| match command {
            PathCommand::CubicTo { to, .. } => Some(*to),
            _ => None,
        })
        .collect();
    assert_eq!(ends, points[1..].to_vec());
}

#[test]
fn open_spline_clamps_tangents_at_the_ends() {
    let points = series();
    let tension = 0.3;
    let path = open_cardinal_spline(&points, tension);
    let PathCommand::CubicTo { ctrl1, .. } = path.commands()[1] else {
        panic!("expected cubic segment");
    };
    // The first vertex is its own missing left neighbor.
    assert_abs_diff_eq!(ctrl1.x, points[0].x + (points[1].x - points[0].x) * tension);
    assert_abs_diff_eq!(ctrl1.y, points[0].y + (points[1].y - points[0].y) * tension);
}

#[test]
fn short_open_inputs_degrade_gracefully() {
    let points = series();
    assert!(open_cardinal_spline(&points[..1], 0.3).is_empty());
    assert!(open_cardinal_spline(&[], 0.3).is_empty());

    let two = open_cardinal_spline(&points[..2], 0.3);
    assert_eq!(two.commands(), polyline(&points[..2]).commands());
    assert_eq!(two.to_svg(), "M0.0,100.0 L10.0,80.0");
}

#[test]
fn area_closes_down_to_the_baseline() {
    let points = series();
    let line = polyline(&points);
    let area = area_under_curve(&line, 120.0, 0.0, 30.0);

    let commands = area.commands();
    let n = commands.len();
    assert_eq!(n, line.len() + 3);
    assert_eq!(commands[n - 3], PathCommand::LineTo(ScreenPoint::new(30.0, 120.0)));
    assert_eq!(commands[n - 2], PathCommand::LineTo(ScreenPoint::new(0.0, 120.0)));
    assert_eq!(commands[n - 1], PathCommand::Close);

    assert!(area_under_curve(&PathData::empty(), 120.0, 0.0, 30.0).is_empty());
}

#[test]
fn svg_path_string_parses_back() {
    let path = cyclic_catmull_rom_to_bezier(&pentagon(), 0.35);
    let text = path.to_svg();
    let parsed: PathData = text.parse().expect("serialized path parses");
    assert_eq!(parsed.len(), path.len());
    assert_eq!(parsed.to_svg(), text);
}

#[test]
fn unsupported_path_commands_are_rejected() {
    assert!("M0,0 Q1,1 2,2".parse::<PathData>().is_err());
}

#[test]
fn scale_toward_interpolates_from_origin() {
    let origin = ScreenPoint::new(160.0, 160.0);
    let points = pentagon();

    let collapsed = scale_toward(&points, origin, 0.0);
    assert!(collapsed.iter().all(|p| *p == origin));

    let full = scale_toward(&points, origin, 1.0);
    for (a, b) in full.iter().zip(&points) {
        assert_abs_diff_eq!(a.x, b.x, epsilon = 1e-9);
        assert_abs_diff_eq!(a.y, b.y, epsilon = 1e-9);
    }
}

#[test]
fn curve_tuning_defaults_and_validation() {
    let tuning = CurveTuning::default();
    assert_eq!(tuning.cyclic_tension, 0.35);
    assert_eq!(tuning.open_tension, 0.30);
    assert!(tuning.validate().is_ok());

    let bad = CurveTuning {
        cyclic_tension: 1.5,
        ..tuning
    };
    assert!(bad.validate().is_err());
}
