use monkscore_charts::core::{
    LabelCandidate, LabelLayoutConfig, LinearScale, PercentileBracket, PlotArea, ScaleDomain,
    ScreenPoint, cyclic_catmull_rom_to_bezier, downsample_indices, fraction_positive,
    resolve_label_collisions, snap_to_nearest_anchor,
};
use monkscore_charts::interaction::resolve_series_index;
use proptest::prelude::*;

proptest! {
    #[test]
    fn vertical_scale_round_trip_property(
        min in -1_000_000.0f64..1_000_000.0,
        span in 0.001f64..1_000_000.0,
        value_factor in 0.0f64..1.0
    ) {
        let domain = ScaleDomain::new(min, min + span).expect("valid domain");
        let scale = LinearScale::vertical(domain, 16.0, 224.0).expect("valid scale");
        let value = min + value_factor * span;

        let px = scale.to_pixel(value);
        prop_assert!((16.0 - 1e-6..=240.0 + 1e-6).contains(&px));
        prop_assert!((scale.to_domain(px) - value).abs() <= 1e-6 * span.max(1.0));
    }

    #[test]
    fn padded_domain_contains_every_value(
        values in prop::collection::vec(-10_000.0f64..10_000.0, 1..64),
        padding in 0.0f64..0.5
    ) {
        let domain = ScaleDomain::from_values(values.iter().copied(), padding).expect("domain");
        for value in &values {
            prop_assert!(domain.contains(*value));
        }
    }

    #[test]
    fn labels_stay_inside_their_bounds(
        anchors in prop::collection::vec(0.0f64..300.0, 0..8),
        height in 8.0f64..20.0
    ) {
        let mut anchors = anchors;
        anchors.sort_by(f64::total_cmp);
        let candidates: Vec<LabelCandidate> = anchors
            .iter()
            .enumerate()
            .map(|(order, y)| LabelCandidate::new(*y, height, order))
            .collect();

        let placed = resolve_label_collisions(&candidates, 16.0, 240.0, LabelLayoutConfig::default());
        prop_assert_eq!(placed.len(), candidates.len());
        for label in &placed {
            prop_assert!(label.top >= 16.0 - 1e-9);
            prop_assert!(label.bottom() <= 240.0 + 1e-9);
        }
    }

    #[test]
    fn snapped_anchor_is_always_one_of_the_anchors(fraction in -2.0f64..3.0) {
        let anchors = [0, 1, 3, 5];
        let snapped = snap_to_nearest_anchor(fraction, &anchors).expect("non-empty anchors");
        prop_assert!(anchors.contains(&snapped));
        if fraction >= 1.0 {
            prop_assert_eq!(snapped, 5);
        }
        if fraction < 0.25 {
            prop_assert_eq!(snapped, 0);
        }
    }

    #[test]
    fn positive_fraction_is_bounded(
        start in -1.0f64..1.0,
        steps in prop::collection::vec(0.0f64..0.5, 6)
    ) {
        let mut returns = [start; 7];
        for (i, step) in steps.iter().enumerate() {
            returns[i + 1] = returns[i] + step;
        }
        let bracket = PercentileBracket::new(1, returns).expect("non-decreasing bracket");
        let percent = fraction_positive(&bracket);
        prop_assert!((3.0..=97.0).contains(&percent));
        prop_assert_eq!(percent, percent.round());
    }

    #[test]
    fn closed_radar_has_one_cubic_per_vertex(
        radii in prop::collection::vec(1.0f64..120.0, 3..12),
        tension in 0.0f64..1.0
    ) {
        let n = radii.len();
        let vertices: Vec<ScreenPoint> = radii
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let angle = std::f64::consts::TAU * i as f64 / n as f64;
                ScreenPoint::new(160.0 + r * angle.cos(), 160.0 + r * angle.sin())
            })
            .collect();

        let path = cyclic_catmull_rom_to_bezier(&vertices, tension);
        prop_assert_eq!(path.len(), n + 2);
        prop_assert!(path.is_closed());
        prop_assert_eq!(path.start_point(), Some(vertices[0]));
    }

    #[test]
    fn series_index_is_in_range(x in 40.0f64..408.0, len in 1usize..500) {
        let plot = PlotArea::new(40.0, 16.0, 368.0, 96.0).expect("plot");
        let index = resolve_series_index(x, plot, len).expect("inside plot");
        prop_assert!(index < len);
    }

    #[test]
    fn downsampling_is_bounded_and_keeps_the_ends(len in 1usize..2_000, max_points in 2usize..400) {
        let kept = downsample_indices(len, max_points);
        prop_assert_eq!(kept.first().copied(), Some(0));
        prop_assert_eq!(kept.last().copied(), Some(len - 1));
        prop_assert!(kept.len() <= max_points + 1);
        prop_assert!(kept.windows(2).all(|pair| pair[0] < pair[1]));
    }
}
