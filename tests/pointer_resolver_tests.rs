use monkscore_charts::core::{PlotArea, RadialScale, ScreenPoint, TWELVE_O_CLOCK};
use monkscore_charts::interaction::{
    BoundingRectAdapter, DatumKind, ForecastHitTester, HitTester, PinSource, PointerConfig,
    PointerDatum, PointerPhase, PointerResolver, RadialHitTester, ReleasePolicy, SeriesHitTester,
    ViewportAdapter, resolve_series_index,
};

fn plot() -> PlotArea {
    PlotArea::new(0.0, 0.0, 100.0, 100.0).expect("valid plot")
}

fn five_samples() -> SeriesHitTester {
    let points = (0..5)
        .map(|i| ScreenPoint::new(f64::from(i) * 25.0, 50.0))
        .collect();
    SeriesHitTester::new(plot(), points)
}

fn at(x: f64) -> ScreenPoint {
    ScreenPoint::new(x, 40.0)
}

#[test]
fn series_index_rounds_to_nearest_sample() {
    assert_eq!(resolve_series_index(30.0, plot(), 5), Some(1));
    assert_eq!(resolve_series_index(38.0, plot(), 5), Some(2));
    assert_eq!(resolve_series_index(100.0, plot(), 5), Some(4));
    assert_eq!(resolve_series_index(-1.0, plot(), 5), None);
    assert_eq!(resolve_series_index(101.0, plot(), 5), None);
    assert_eq!(resolve_series_index(50.0, plot(), 0), None);
}

#[test]
fn move_hovers_and_leave_returns_to_idle() {
    let hit = five_samples();
    let mut resolver = PointerResolver::new(PointerConfig::default());
    assert_eq!(resolver.phase(), PointerPhase::Idle);

    let state = resolver.pointer_move(at(30.0), &hit);
    assert_eq!(state.phase(), PointerPhase::Hovering);
    assert_eq!(state.hover_index(), Some(1));
    assert_eq!(state.kind(), DatumKind::History);
    assert_eq!(state.tooltip, Some(at(30.0)));
    assert_eq!(
        state.resolved.map(|r| r.screen_position),
        Some(ScreenPoint::new(25.0, 50.0))
    );

    let state = resolver.pointer_leave();
    assert_eq!(state.phase(), PointerPhase::Idle);
    assert_eq!(state.kind(), DatumKind::None);
}

#[test]
fn moving_outside_the_plot_clears_hover() {
    let hit = five_samples();
    let mut resolver = PointerResolver::new(PointerConfig::default());
    resolver.pointer_move(at(30.0), &hit);
    let state = resolver.pointer_move(at(-5.0), &hit);
    assert_eq!(state.phase(), PointerPhase::Idle);
    assert!(state.tooltip.is_none());
}

#[test]
fn click_pins_and_freezes_the_datum() {
    let hit = five_samples();
    let mut resolver = PointerResolver::new(PointerConfig::default());
    resolver.pointer_move(at(30.0), &hit);
    let state = resolver.click(at(30.0), &hit);
    assert_eq!(state.phase(), PointerPhase::Pinned);
    assert_eq!(state.pinned, Some(PinSource::Click));

    let state = resolver.pointer_move(at(90.0), &hit);
    assert_eq!(state.hover_index(), Some(1));
    let state = resolver.pointer_leave();
    assert!(state.is_pinned());
}

#[test]
fn toggle_policy_releases_same_index_and_repins_other() {
    let hit = five_samples();
    let mut resolver = PointerResolver::with_policy(ReleasePolicy::ToggleSameIndex);
    resolver.click(at(50.0), &hit);
    assert_eq!(resolver.state().hover_index(), Some(2));

    let state = resolver.click(at(75.0), &hit);
    assert_eq!(state.phase(), PointerPhase::Pinned);
    assert_eq!(state.hover_index(), Some(3));

    let state = resolver.click(at(76.0), &hit);
    assert_eq!(state.phase(), PointerPhase::Idle);
}

#[test]
fn release_on_any_click_policy_unpins_anywhere() {
    let hit = five_samples();
    let mut resolver = PointerResolver::with_policy(ReleasePolicy::ReleaseOnAnyClick);
    resolver.click(at(50.0), &hit);
    assert!(resolver.state().is_pinned());

    let state = resolver.click(at(0.0), &hit);
    assert_eq!(state.phase(), PointerPhase::Idle);
}

#[test]
fn click_outside_the_plot_does_not_pin() {
    let hit = five_samples();
    let mut resolver = PointerResolver::new(PointerConfig::default());
    let state = resolver.click(at(-20.0), &hit);
    assert_eq!(state.phase(), PointerPhase::Idle);
}

#[test]
fn touch_pins_scrubs_and_releases_after_grace() {
    let hit = five_samples();
    let mut resolver = PointerResolver::new(PointerConfig::default());

    let state = resolver.touch_start(at(0.0), &hit);
    assert_eq!(state.pinned, Some(PinSource::Touch));
    assert_eq!(state.hover_index(), Some(0));

    let state = resolver.touch_move(at(100.0), &hit);
    assert_eq!(state.hover_index(), Some(4));

    resolver.touch_end(1_000.0);
    assert_eq!(resolver.pending_release_ms(), Some(1_800.0));
    assert!(!resolver.tick(1_799.0));
    assert!(resolver.state().is_pinned());
    assert!(resolver.tick(1_800.0));
    assert_eq!(resolver.phase(), PointerPhase::Idle);
    assert_eq!(resolver.pending_release_ms(), None);
}

#[test]
fn tap_after_touch_upgrades_to_click_pin() {
    let hit = five_samples();
    let mut resolver = PointerResolver::new(PointerConfig::default());
    resolver.touch_start(at(50.0), &hit);
    resolver.touch_end(0.0);

    let state = resolver.click(at(50.0), &hit);
    assert_eq!(state.pinned, Some(PinSource::Click));
    assert_eq!(resolver.pending_release_ms(), None);
    assert!(!resolver.tick(5_000.0));
    assert!(resolver.state().is_pinned());
}

#[test]
fn touch_is_ignored_while_click_pinned() {
    let hit = five_samples();
    let mut resolver = PointerResolver::new(PointerConfig::default());
    resolver.click(at(25.0), &hit);
    let state = resolver.touch_start(at(100.0), &hit);
    assert_eq!(state.hover_index(), Some(1));
    resolver.touch_end(0.0);
    assert_eq!(resolver.pending_release_ms(), None);
}

#[test]
fn dismiss_and_reset_clear_everything() {
    let hit = five_samples();
    let mut resolver = PointerResolver::new(PointerConfig::default());
    resolver.click(at(25.0), &hit);
    assert_eq!(resolver.dismiss().phase(), PointerPhase::Idle);

    resolver.touch_start(at(25.0), &hit);
    resolver.touch_end(0.0);
    let state = resolver.reset();
    assert_eq!(state.phase(), PointerPhase::Idle);
    assert_eq!(resolver.pending_release_ms(), None);
    assert!(!resolver.tick(10_000.0));
}

#[test]
fn custom_touch_delay_is_honored() {
    let hit = five_samples();
    let config = PointerConfig {
        touch_release_delay_ms: 250.0,
        ..PointerConfig::default()
    };
    let mut resolver = PointerResolver::new(config.validate().expect("valid config"));
    resolver.touch_start(at(25.0), &hit);
    resolver.touch_end(100.0);
    assert!(resolver.tick(350.0));

    let bad = PointerConfig {
        touch_release_delay_ms: -1.0,
        ..PointerConfig::default()
    };
    assert!(bad.validate().is_err());
}

#[test]
fn forecast_hit_tester_splits_history_and_anchor_zones() {
    let plot = PlotArea::new(50.0, 16.0, 488.0, 224.0).expect("valid plot");
    let history = vec![
        ScreenPoint::new(50.0, 100.0),
        ScreenPoint::new(172.0, 90.0),
        ScreenPoint::new(294.0, 80.0),
    ];
    let anchors = vec![
        (0, ScreenPoint::new(294.0, 80.0)),
        (1, ScreenPoint::new(342.8, 70.0)),
        (3, ScreenPoint::new(440.4, 60.0)),
        (5, ScreenPoint::new(538.0, 50.0)),
    ];
    let hit = ForecastHitTester::new(plot, 0.5, history, anchors);

    let in_history = hit.hit_test(ScreenPoint::new(50.0 + 0.25 * 488.0, 50.0)).expect("hit");
    assert_eq!(in_history.datum, PointerDatum::History { index: 1 });

    let middle_future = hit.hit_test(ScreenPoint::new(50.0 + 0.75 * 488.0, 50.0)).expect("hit");
    assert_eq!(middle_future.datum, PointerDatum::Future { horizon: 3 });
    assert_eq!(middle_future.screen_position, ScreenPoint::new(440.4, 60.0));

    let right_edge = hit.hit_test(ScreenPoint::new(538.0, 50.0)).expect("hit");
    assert_eq!(right_edge.datum, PointerDatum::Future { horizon: 5 });

    assert!(hit.hit_test(ScreenPoint::new(540.0, 50.0)).is_none());
    assert!(hit.hit_test(ScreenPoint::new(49.0, 50.0)).is_none());
}

#[test]
fn radial_hit_tester_resolves_sectors_within_reach() {
    let scale = RadialScale::new(ScreenPoint::new(160.0, 160.0), 120.0, 100.0, 5, TWELVE_O_CLOCK)
        .expect("valid scale");
    let hit = RadialHitTester::new(scale, 167.6);

    let top = hit.hit_test(ScreenPoint::new(160.0, 30.0)).expect("hit");
    assert_eq!(top.datum, PointerDatum::Category { index: 0 });
    assert_eq!(top.datum.kind(), DatumKind::Category);

    let label_area = hit.hit_test(scale.point(2, 130.0)).expect("hit");
    assert_eq!(label_area.datum, PointerDatum::Category { index: 2 });

    assert!(hit.hit_test(ScreenPoint::new(160.0, -20.0)).is_none());
}

#[test]
fn bounding_rect_adapter_maps_client_to_view_box() {
    let adapter = BoundingRectAdapter::new(100.0, 50.0, 280.0, 135.0, 560.0, 270.0)
        .expect("valid adapter");
    let local = adapter.to_local_coordinates(240.0, 117.5);
    assert_eq!(local, ScreenPoint::new(280.0, 135.0));

    let unscaled = BoundingRectAdapter::unscaled(10.0, 10.0, 320.0, 320.0).expect("valid adapter");
    assert_eq!(unscaled.to_local_coordinates(170.0, 10.0), ScreenPoint::new(160.0, 0.0));

    assert!(BoundingRectAdapter::new(0.0, 0.0, 0.0, 10.0, 10.0, 10.0).is_err());
}
