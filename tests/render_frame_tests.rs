use monkscore_charts::ChartError;
use monkscore_charts::core::{PathData, ScreenPoint, Viewport};
use monkscore_charts::render::{
    CirclePrimitive, Color, LinePrimitive, NullRenderer, PathPrimitive, RectPrimitive, RenderFrame,
    Renderer, SvgRenderer, TextHAlign, TextPrimitive,
};

fn triangle() -> PathData {
    "M0,0 L10,0 L5,8 Z".parse().expect("valid path")
}

fn red() -> Color {
    Color::rgb(1.0, 0.0, 0.0)
}

#[test]
fn empty_paths_are_skipped_when_pushed() {
    let mut frame = RenderFrame::new(Viewport::new(100, 50));
    frame.push_path(PathPrimitive::stroked(PathData::empty(), red(), 1.0));
    assert!(frame.is_empty());

    frame.push_path(PathPrimitive::filled(triangle(), red()));
    assert_eq!(frame.primitive_count(), 1);
    frame.validate().expect("valid frame");
}

#[test]
fn validation_rejects_bad_primitives() {
    let zero_viewport = RenderFrame::new(Viewport::new(0, 50));
    assert!(matches!(
        zero_viewport.validate(),
        Err(ChartError::InvalidViewport { width: 0, height: 50 })
    ));

    let bad_alpha = RenderFrame::new(Viewport::new(100, 50)).with_circle(CirclePrimitive::filled(
        ScreenPoint::new(5.0, 5.0),
        2.0,
        red().with_alpha(1.5),
    ));
    assert!(matches!(bad_alpha.validate(), Err(ChartError::InvalidData(_))));

    let empty_text = RenderFrame::new(Viewport::new(100, 50)).with_text(TextPrimitive::new(
        "",
        1.0,
        1.0,
        8.0,
        red(),
        TextHAlign::Left,
    ));
    assert!(empty_text.validate().is_err());

    let negative_rect = RenderFrame::new(Viewport::new(100, 50))
        .with_rect(RectPrimitive::new(0.0, 0.0, -1.0, 4.0, red()));
    assert!(negative_rect.validate().is_err());

    let empty_dash = RenderFrame::new(Viewport::new(100, 50)).with_line(
        LinePrimitive::new(ScreenPoint::new(0.0, 0.0), ScreenPoint::new(1.0, 1.0), 1.0, red())
            .dashed(0.0, 0.0),
    );
    assert!(empty_dash.validate().is_err());
}

#[test]
fn null_renderer_counts_primitives() {
    let frame = RenderFrame::new(Viewport::new(100, 50))
        .with_path(PathPrimitive::filled(triangle(), red()))
        .with_circle(CirclePrimitive::filled(ScreenPoint::new(5.0, 5.0), 2.0, red()))
        .with_text(TextPrimitive::new("Avg", 1.0, 1.0, 8.0, red(), TextHAlign::Left));

    let mut renderer = NullRenderer::default();
    renderer.render(&frame).expect("render");
    assert_eq!(renderer.frames_rendered, 1);
    assert_eq!(renderer.last_path_count, 1);
    assert_eq!(renderer.last_circle_count, 1);
    assert_eq!(renderer.last_text_count, 1);
}

#[test]
fn svg_document_writes_every_primitive() {
    let frame = RenderFrame::new(Viewport::new(200, 100))
        .with_path(PathPrimitive::filled(triangle(), red().with_alpha(0.25)).with_stroke(red(), 2.0))
        .with_line(
            LinePrimitive::new(ScreenPoint::new(0.0, 10.0), ScreenPoint::new(100.0, 10.0), 1.0, red())
                .dashed(3.0, 4.0),
        )
        .with_circle(CirclePrimitive::filled(ScreenPoint::new(5.0, 5.0), 3.5, red()))
        .with_rect(RectPrimitive::new(10.0, 10.0, 40.0, 15.0, red()).rounded(3.0))
        .with_text(
            TextPrimitive::new("P50 <$367.20>", 30.0, 20.0, 9.0, red(), TextHAlign::Center).bold(),
        );

    let mut renderer = SvgRenderer::new();
    renderer.render(&frame).expect("render");
    let svg = renderer.document();

    assert!(svg.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 200 100""#));
    assert!(svg.contains(r##"<path d="M0.0,0.0 L10.0,0.0 L5.0,8.0 Z" fill="#ff0000" fill-opacity="0.250" stroke="#ff0000" stroke-width="2""##));
    assert!(svg.contains(r#"stroke-dasharray="3,4""#));
    assert!(svg.contains(r#"<circle cx="5.0" cy="5.0" r="3.5""#));
    assert!(svg.contains(r#"rx="3""#));
    assert!(svg.contains(r#"text-anchor="middle" font-weight="700""#));
    assert!(svg.contains("P50 &lt;$367.20&gt;"));
    assert!(svg.trim_end().ends_with("</svg>"));

    let stats = renderer.last_stats();
    assert_eq!(
        (stats.paths_drawn, stats.lines_drawn, stats.circles_drawn, stats.rects_drawn, stats.texts_drawn),
        (1, 1, 1, 1, 1)
    );
    assert_eq!(renderer.backend_name(), "svg");
}

#[test]
fn svg_background_is_painted_first() {
    let renderer = SvgRenderer::new()
        .with_background(Color::from_hex("#0b0f14").expect("hex"))
        .expect("background");
    let svg = renderer
        .render_to_string(&RenderFrame::new(Viewport::new(10, 10)))
        .expect("svg");
    let lines: Vec<&str> = svg.lines().collect();
    assert_eq!(lines[1], r##"<rect x="0" y="0" width="10" height="10" fill="#0b0f14"/>"##);
}

#[test]
fn svg_renderer_keeps_the_previous_document_on_error() {
    let mut renderer = SvgRenderer::new();
    renderer
        .render(&RenderFrame::new(Viewport::new(10, 10)))
        .expect("render");
    let before = renderer.document().to_owned();

    let bad = RenderFrame::new(Viewport::new(10, 10)).with_circle(CirclePrimitive::filled(
        ScreenPoint::new(f64::NAN, 0.0),
        1.0,
        red(),
    ));
    assert!(renderer.render(&bad).is_err());
    assert_eq!(renderer.document(), before);
}

#[test]
fn colors_parse_from_hex() {
    let color = Color::from_hex("#4ade80").expect("hex");
    assert_eq!(color.to_hex(), "#4ade80");
    assert_eq!(color.alpha, 1.0);

    let translucent = Color::from_hex("#ff000080").expect("hex");
    assert_eq!(translucent.to_hex(), "#ff0000");
    assert!((translucent.alpha - 128.0 / 255.0).abs() < 1e-12);

    assert!(Color::from_hex("#12345").is_err());
    assert!(Color::from_hex("#zzzzzz").is_err());
}
