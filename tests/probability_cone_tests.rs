use approx::assert_abs_diff_eq;
use monkscore_charts::ChartError;
use monkscore_charts::core::{
    ConeLayout, LinearScale, Percentile, PercentileBracket, PercentileBracketSet,
    ProbabilityCone, ScaleDomain, fraction_positive, horizon_x_position, snap_to_nearest_anchor,
    to_ten_scale,
};

fn bucket_70_80() -> PercentileBracketSet {
    PercentileBracketSet::from_brackets([
        PercentileBracket::new(1, [-0.18, -0.04, 0.06, 0.12, 0.19, 0.31, 0.52]).expect("1Y"),
        PercentileBracket::new(3, [-0.28, 0.05, 0.24, 0.38, 0.52, 0.78, 1.35]).expect("3Y"),
        PercentileBracket::new(5, [-0.12, 0.22, 0.52, 0.72, 0.96, 1.42, 2.48]).expect("5Y"),
    ])
}

fn layout() -> ConeLayout {
    let domain = ScaleDomain::new(100.0, 800.0).expect("valid domain");
    ConeLayout {
        current_price: 213.49,
        price_scale: LinearScale::vertical(domain, 16.0, 224.0).expect("valid scale"),
        origin_x: 300.0,
        available_width: 200.0,
        max_horizon: 5,
    }
}

#[test]
fn fraction_positive_interpolates_the_zero_crossing() {
    let brackets = bucket_70_80();

    // Crossing between P25 (-4%) and P40 (+6%): rank 31, so 69% positive.
    let one_year = fraction_positive(brackets.get(1).expect("1Y"));
    assert_eq!(one_year, 69.0);
    assert_eq!(to_ten_scale(one_year), 7);

    // Crossing between P10 (-12%) and P25 (+22%): rank ~15.3.
    let five_year = fraction_positive(brackets.get(5).expect("5Y"));
    assert_eq!(five_year, 85.0);
    assert_eq!(to_ten_scale(five_year), 9);
}

#[test]
fn brackets_entirely_on_one_side_use_fixed_extremes() {
    let all_gains = PercentileBracket::new(1, [0.01, 0.02, 0.03, 0.04, 0.05, 0.06, 0.07]).expect("valid");
    let all_losses =
        PercentileBracket::new(1, [-0.07, -0.06, -0.05, -0.04, -0.03, -0.02, -0.01]).expect("valid");

    assert_eq!(fraction_positive(&all_gains), 97.0);
    assert_eq!(fraction_positive(&all_losses), 3.0);
}

#[test]
fn ten_scale_is_clamped_to_one_through_ten() {
    assert_eq!(to_ten_scale(3.0), 1);
    assert_eq!(to_ten_scale(0.0), 1);
    assert_eq!(to_ten_scale(100.0), 10);
    assert_eq!(to_ten_scale(54.0), 5);
}

#[test]
fn decreasing_bracket_is_malformed() {
    let result = PercentileBracket::new(3, [-0.1, 0.2, 0.1, 0.3, 0.4, 0.5, 0.6]);
    assert!(matches!(
        result,
        Err(ChartError::MalformedBracket { horizon: 3, .. })
    ));

    let non_finite = PercentileBracket::new(1, [f64::NAN, 0.0, 0.1, 0.2, 0.3, 0.4, 0.5]);
    assert!(matches!(
        non_finite,
        Err(ChartError::MalformedBracket { horizon: 1, .. })
    ));
}

#[test]
fn bracket_set_reports_missing_horizons() {
    let brackets = bucket_70_80();
    assert_eq!(brackets.horizons(), vec![1, 3, 5]);
    assert_eq!(brackets.max_horizon(), Some(5));
    assert!(matches!(
        brackets.get(2),
        Err(ChartError::MissingHorizon { horizon: 2 })
    ));
}

#[test]
fn bracket_set_keeps_horizons_sorted() {
    let mut brackets = PercentileBracketSet::new();
    for horizon in [5, 1, 3] {
        brackets.insert(
            PercentileBracket::new(horizon, [0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6]).expect("valid"),
        );
    }
    assert_eq!(brackets.horizons(), vec![1, 3, 5]);
}

#[test]
fn price_at_applies_the_return() {
    let brackets = bucket_70_80();
    let five = brackets.get(5).expect("5Y");
    assert_abs_diff_eq!(five.price_at(Percentile::P50, 100.0), 172.0, epsilon = 1e-9);
    assert_abs_diff_eq!(five.price_at(Percentile::P10, 100.0), 88.0, epsilon = 1e-9);
}

#[test]
fn snap_zones_are_equal_width_with_boundaries_going_right() {
    let anchors = [0, 1, 3, 5];
    assert_eq!(snap_to_nearest_anchor(0.0, &anchors), Some(0));
    assert_eq!(snap_to_nearest_anchor(0.24, &anchors), Some(0));
    assert_eq!(snap_to_nearest_anchor(0.25, &anchors), Some(1));
    assert_eq!(snap_to_nearest_anchor(0.5, &anchors), Some(3));
    assert_eq!(snap_to_nearest_anchor(0.99, &anchors), Some(5));
    assert_eq!(snap_to_nearest_anchor(1.0, &anchors), Some(5));
}

#[test]
fn snap_clamps_out_of_range_fractions() {
    let anchors = [0, 1, 3, 5];
    assert_eq!(snap_to_nearest_anchor(-0.3, &anchors), Some(0));
    assert_eq!(snap_to_nearest_anchor(1.7, &anchors), Some(5));
    assert_eq!(snap_to_nearest_anchor(f64::NAN, &anchors), Some(0));
    assert_eq!(snap_to_nearest_anchor(0.5, &[]), None);
}

#[test]
fn horizon_positions_scale_linearly_from_origin() {
    assert_abs_diff_eq!(horizon_x_position(5.0, 5.0, 300.0, 200.0), 500.0);
    assert_abs_diff_eq!(horizon_x_position(1.0, 5.0, 300.0, 200.0), 340.0);
    assert_abs_diff_eq!(horizon_x_position(3.0, 0.0, 300.0, 200.0), 300.0);
}

#[test]
fn cone_builds_nodes_bands_and_edges_from_one_origin() {
    let brackets = bucket_70_80();
    let layout = layout();
    let cone = ProbabilityCone::build(&brackets, &[0, 1, 3, 5], &layout).expect("cone");

    assert_eq!(cone.nodes.len(), 3);
    assert_eq!(cone.origin, layout.origin());
    assert_abs_diff_eq!(cone.node(1).expect("1Y node").x, 340.0);
    assert_abs_diff_eq!(cone.node(5).expect("5Y node").x, 500.0);

    for node in &cone.nodes {
        assert!(node.y(Percentile::P90) < node.y(Percentile::P50));
        assert!(node.y(Percentile::P50) < node.y(Percentile::P10));
    }

    assert_eq!(cone.bands.len(), 3);
    assert!(cone.bands.iter().all(|band| band.is_closed()));
    for edge in [&cone.edge_p10, &cone.edge_p90, &cone.median] {
        assert_eq!(edge.start_point(), Some(cone.origin));
        assert!(!edge.is_closed());
    }
}

#[test]
fn cone_with_missing_bracket_fails() {
    let brackets = PercentileBracketSet::from_brackets([
        PercentileBracket::new(1, [-0.18, -0.04, 0.06, 0.12, 0.19, 0.31, 0.52]).expect("1Y"),
    ]);
    let result = ProbabilityCone::build(&brackets, &[0, 1, 3], &layout());
    assert!(matches!(
        result,
        Err(ChartError::MissingHorizon { horizon: 3 })
    ));
}

#[test]
fn cone_without_future_horizons_is_empty() {
    let cone = ProbabilityCone::build(&bucket_70_80(), &[0], &layout()).expect("cone");
    assert!(cone.nodes.is_empty());
    assert!(cone.median.is_empty());
    assert!(cone.bands.iter().all(|band| band.is_empty()));
}
