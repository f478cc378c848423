use approx::assert_abs_diff_eq;
use monkscore_charts::ChartError;
use monkscore_charts::api::{
    ChartStyleConfig, FactorObservation, FactorSeries, FactorTrendChart, ReferenceKind, peer_bars,
};
use monkscore_charts::core::ScreenPoint;
use monkscore_charts::interaction::PointerPhase;
use monkscore_charts::render::{Color, NullRenderer, SvgRenderer};

const NET_MARGIN: [f64; 18] = [
    23.5, 21.7, 25.9, 27.9, 26.7, 23.4, 25.3, 28.1, 24.6, 22.2, 26.3, 28.4, 23.8, 22.8, 25.0, 24.3,
    24.1, 25.3,
];

fn periods() -> Vec<String> {
    (21..=25)
        .flat_map(|year| (1..=4).map(move |quarter| format!("Q{quarter}'{year}")))
        .take(NET_MARGIN.len())
        .collect()
}

fn net_margin() -> FactorSeries {
    let observations = periods()
        .into_iter()
        .zip(NET_MARGIN)
        .map(|(period, value)| FactorObservation::new(period, value))
        .collect();
    FactorSeries::new("Net Margin", "%", observations)
        .with_avg_3y(25.0)
        .with_sector_median(12.4)
}

fn color() -> Color {
    Color::from_hex("#4ade80").expect("valid color")
}

fn chart() -> FactorTrendChart {
    FactorTrendChart::new(ChartStyleConfig::default(), net_margin(), color()).expect("chart")
}

fn over_index(chart: &FactorTrendChart, index: usize) -> ScreenPoint {
    let points = chart.points();
    ScreenPoint::new(points[index].x, 60.0)
}

#[test]
fn value_domain_includes_reference_levels() {
    let domain = chart().value_scale().domain();
    // 12.4..28.4 padded by 15% of the 16pt span.
    assert_abs_diff_eq!(domain.min, 10.0, epsilon = 1e-9);
    assert_abs_diff_eq!(domain.max, 30.8, epsilon = 1e-9);
}

#[test]
fn geometry_has_references_and_axis_labels() {
    let geometry = chart().geometry();
    assert_eq!(geometry.points.len(), 18);
    assert_abs_diff_eq!(geometry.points[0].x, 40.0);
    assert_abs_diff_eq!(geometry.points[17].x, 408.0);

    let legends: Vec<(&ReferenceKind, &str)> = geometry
        .references
        .iter()
        .map(|r| (&r.kind, r.legend.as_str()))
        .collect();
    assert_eq!(
        legends,
        vec![
            (&ReferenceKind::ThreeYearAverage, "3Y avg (25%)"),
            (&ReferenceKind::SectorMedian, "Sector median (12.4%)"),
        ]
    );
    assert!(geometry.references[1].y > geometry.references[0].y);

    let y_texts: Vec<&str> = geometry.y_labels.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(y_texts, vec!["10.0%", "15.2%", "20.4%", "25.6%", "30.8%"]);

    let x_indices: Vec<Option<usize>> = geometry.x_labels.iter().map(|l| l.index).collect();
    assert_eq!(
        x_indices,
        vec![Some(0), Some(4), Some(8), Some(12), Some(16), Some(17)]
    );
    assert_eq!(geometry.x_labels[0].text, "Q1'21");
    assert_eq!(geometry.x_labels[5].text, "Q2'25");
}

#[test]
fn tooltip_tracks_the_hovered_quarter() {
    let mut chart = chart();
    let target = over_index(&chart, 11);
    let state = chart.pointer_move(target);
    assert_eq!(state.hover_index(), Some(11));

    let tooltip = chart.tooltip().expect("tooltip");
    assert_eq!(tooltip.period, "Q4'23");
    assert_eq!(tooltip.value_label, "28.4%");
    assert!(tooltip.below_point);
    assert_eq!(tooltip.screen_position, chart.points()[11]);
}

#[test]
fn tooltip_anchor_is_clamped_near_the_edges() {
    let mut chart = chart();
    let first = over_index(&chart, 0);
    chart.pointer_move(first);
    let tooltip = chart.tooltip().expect("tooltip");
    assert_eq!(tooltip.left_pct, 12.0);
    assert!(!tooltip.below_point);

    let last = over_index(&chart, 17);
    chart.pointer_move(last);
    assert_eq!(chart.tooltip().expect("tooltip").left_pct, 88.0);
}

#[test]
fn clicking_the_same_quarter_toggles_the_pin() {
    let mut chart = chart();
    let target = over_index(&chart, 3);
    assert!(chart.click(target).is_pinned());
    let elsewhere = over_index(&chart, 9);
    chart.pointer_move(elsewhere);
    assert_eq!(chart.pointer_state().hover_index(), Some(3));
    assert!(!chart.click(target).is_pinned());
}

#[test]
fn replacing_the_series_clears_the_pointer() {
    let mut chart = chart();
    let target = over_index(&chart, 3);
    chart.click(target);

    let series = FactorSeries::new(
        "ROE",
        "%",
        vec![
            FactorObservation::new("Q1'25", 140.0),
            FactorObservation::new("Q2'25", 151.5),
        ],
    );
    chart.set_series(series).expect("series");
    assert_eq!(chart.pointer_state().phase(), PointerPhase::Idle);
    assert!(chart.geometry().references.is_empty());
}

#[test]
fn short_series_have_no_hover() {
    let single = FactorSeries::new("ROE", "%", vec![FactorObservation::new("Q1'25", 14.0)]);
    let mut chart = FactorTrendChart::new(ChartStyleConfig::default(), single, color()).expect("chart");
    let state = chart.pointer_move(ScreenPoint::new(200.0, 60.0));
    assert_eq!(state.phase(), PointerPhase::Idle);
    chart.build_frame().expect("frame");

    let empty = FactorSeries::new("ROE", "%", Vec::new());
    let chart = FactorTrendChart::new(ChartStyleConfig::default(), empty, color()).expect("chart");
    let domain = chart.value_scale().domain();
    assert_eq!((domain.min, domain.max), (0.0, 1.0));
    assert!(chart.geometry().line.is_empty());
    chart.build_frame().expect("frame");
}

#[test]
fn non_finite_values_are_rejected() {
    let series = FactorSeries::new("ROE", "%", vec![FactorObservation::new("Q1'25", f64::NAN)]);
    let result = FactorTrendChart::new(ChartStyleConfig::default(), series, color());
    assert!(matches!(result, Err(ChartError::InvalidData(_))));

    let series = net_margin().with_sector_median(f64::INFINITY);
    let result = FactorTrendChart::new(ChartStyleConfig::default(), series, color());
    assert!(matches!(result, Err(ChartError::InvalidData(_))));
}

#[test]
fn peer_bars_sort_descending_with_headroom() {
    let peers: Vec<(String, f64)> = [
        ("MSFT", 36.4),
        ("AAPL", 25.3),
        ("GOOG", 22.1),
        ("META", 20.8),
        ("AMZN", 9.2),
    ]
    .into_iter()
    .map(|(ticker, value)| (ticker.to_owned(), value))
    .collect();

    let (bars, median_fraction) = peer_bars(&peers, "aapl", 12.4);
    let tickers: Vec<&str> = bars.iter().map(|b| b.ticker.as_str()).collect();
    assert_eq!(tickers, vec!["MSFT", "AAPL", "GOOG", "META", "AMZN"]);
    assert!(bars[1].is_subject);
    assert_eq!(bars.iter().filter(|b| b.is_subject).count(), 1);
    assert_abs_diff_eq!(bars[0].fraction, 1.0 / 1.1, epsilon = 1e-12);
    assert_abs_diff_eq!(median_fraction, 12.4 / (36.4 * 1.1), epsilon = 1e-12);
}

#[test]
fn peer_bars_scale_against_a_dominant_median() {
    let peers = vec![("AAA".to_owned(), 5.0), ("BBB".to_owned(), 10.0)];
    let (bars, median_fraction) = peer_bars(&peers, "AAA", 20.0);
    assert_abs_diff_eq!(median_fraction, 1.0 / 1.1, epsilon = 1e-12);
    assert_abs_diff_eq!(bars[0].fraction, 10.0 / 22.0, epsilon = 1e-12);

    let (bars, median_fraction) = peer_bars(&[], "AAA", 0.0);
    assert!(bars.is_empty());
    assert_eq!(median_fraction, 0.0);
}

#[test]
fn frames_render_idle_and_hovered() {
    let mut chart = chart();
    let mut null = NullRenderer::default();
    chart.render(&mut null).expect("idle frame");
    assert_eq!(null.last_circle_count, 2);

    let target = over_index(&chart, 6);
    chart.pointer_move(target);
    let mut svg = SvgRenderer::new();
    chart.render(&mut svg).expect("hover frame");
    assert_eq!(svg.last_stats().circles_drawn, 1);
    assert!(svg.document().contains("Q1'21"));
    assert!(svg.document().contains("stroke-dasharray"));
}
