use std::fmt::{self, Write};

use crate::core::primitives::format_one_decimal;
use crate::error::{ChartError, ChartResult};
use crate::render::{
    CirclePrimitive, Color, LinePrimitive, PathPrimitive, RectPrimitive, RenderFrame, Renderer,
    StrokeStyle, TextHAlign, TextPrimitive,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SvgRenderStats {
    pub paths_drawn: usize,
    pub lines_drawn: usize,
    pub circles_drawn: usize,
    pub rects_drawn: usize,
    pub texts_drawn: usize,
}

/// Serializes frames into standalone SVG documents.
///
/// Coordinates are written with one decimal place, the same precision as
/// `PathData`'s path strings, so documents are stable across platforms.
#[derive(Debug, Default)]
pub struct SvgRenderer {
    background: Option<Color>,
    document: String,
    last_stats: SvgRenderStats,
}

impl SvgRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_background(mut self, color: Color) -> ChartResult<Self> {
        color.validate()?;
        self.background = Some(color);
        Ok(self)
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        "svg"
    }

    /// Document produced by the last successful `render` call.
    #[must_use]
    pub fn document(&self) -> &str {
        &self.document
    }

    #[must_use]
    pub fn last_stats(&self) -> SvgRenderStats {
        self.last_stats
    }

    /// Renders `frame` and returns the document without keeping it.
    pub fn render_to_string(&self, frame: &RenderFrame) -> ChartResult<String> {
        frame.validate()?;
        let mut out = String::with_capacity(256 + frame.primitive_count() * 96);
        write_document(&mut out, frame, self.background)
            .map_err(|e| ChartError::InvalidData(format!("failed to write svg document: {e}")))?;
        Ok(out)
    }
}

impl Renderer for SvgRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        self.document = self.render_to_string(frame)?;
        self.last_stats = SvgRenderStats {
            paths_drawn: frame.paths.len(),
            lines_drawn: frame.lines.len(),
            circles_drawn: frame.circles.len(),
            rects_drawn: frame.rects.len(),
            texts_drawn: frame.texts.len(),
        };
        Ok(())
    }
}

fn write_document(out: &mut String, frame: &RenderFrame, background: Option<Color>) -> fmt::Result {
    let (width, height) = (frame.viewport.width, frame.viewport.height);
    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}" width="{width}" height="{height}">"#
    )?;
    if let Some(color) = background {
        write!(out, r#"<rect x="0" y="0" width="{width}" height="{height}""#)?;
        write_paint(out, "fill", color)?;
        out.push_str("/>\n");
    }
    for path in &frame.paths {
        write_path(out, path)?;
    }
    for line in &frame.lines {
        write_line(out, line)?;
    }
    for circle in &frame.circles {
        write_circle(out, circle)?;
    }
    for rect in &frame.rects {
        write_rect(out, rect)?;
    }
    for text in &frame.texts {
        write_text(out, text)?;
    }
    out.push_str("</svg>\n");
    Ok(())
}

fn write_paint(out: &mut String, attr: &str, color: Color) -> fmt::Result {
    write!(out, r#" {attr}="{}""#, color.to_hex())?;
    if color.alpha < 1.0 {
        write!(out, r#" {attr}-opacity="{:.3}""#, color.alpha)?;
    }
    Ok(())
}

fn write_stroke(out: &mut String, color: Option<Color>, width: f64, style: StrokeStyle) -> fmt::Result {
    let Some(color) = color else {
        return Ok(());
    };
    write_paint(out, "stroke", color)?;
    write!(out, r#" stroke-width="{}""#, trim_number(width))?;
    if let StrokeStyle::Dashed { dash, gap } = style {
        write!(
            out,
            r#" stroke-dasharray="{},{}""#,
            trim_number(dash),
            trim_number(gap)
        )?;
    }
    Ok(())
}

fn write_path(out: &mut String, path: &PathPrimitive) -> fmt::Result {
    write!(out, r#"<path d="{}""#, path.path)?;
    match path.fill {
        Some(fill) => write_paint(out, "fill", fill)?,
        None => out.push_str(r#" fill="none""#),
    }
    write_stroke(out, path.stroke, path.stroke_width, path.style)?;
    if path.stroke.is_some() {
        out.push_str(r#" stroke-linejoin="round""#);
    }
    out.push_str("/>\n");
    Ok(())
}

fn write_line(out: &mut String, line: &LinePrimitive) -> fmt::Result {
    write!(
        out,
        r#"<line x1="{}" y1="{}" x2="{}" y2="{}""#,
        format_one_decimal(line.from.x),
        format_one_decimal(line.from.y),
        format_one_decimal(line.to.x),
        format_one_decimal(line.to.y)
    )?;
    write_stroke(out, Some(line.color), line.stroke_width, line.style)?;
    out.push_str("/>\n");
    Ok(())
}

fn write_circle(out: &mut String, circle: &CirclePrimitive) -> fmt::Result {
    write!(
        out,
        r#"<circle cx="{}" cy="{}" r="{}""#,
        format_one_decimal(circle.center.x),
        format_one_decimal(circle.center.y),
        trim_number(circle.radius)
    )?;
    match circle.fill {
        Some(fill) => write_paint(out, "fill", fill)?,
        None => out.push_str(r#" fill="none""#),
    }
    write_stroke(out, circle.stroke, circle.stroke_width, StrokeStyle::Solid)?;
    out.push_str("/>\n");
    Ok(())
}

fn write_rect(out: &mut String, rect: &RectPrimitive) -> fmt::Result {
    write!(
        out,
        r#"<rect x="{}" y="{}" width="{}" height="{}""#,
        format_one_decimal(rect.x),
        format_one_decimal(rect.y),
        format_one_decimal(rect.width),
        format_one_decimal(rect.height)
    )?;
    if rect.corner_radius > 0.0 {
        write!(out, r#" rx="{}""#, trim_number(rect.corner_radius))?;
    }
    write_paint(out, "fill", rect.fill)?;
    write_stroke(out, rect.stroke, 0.8, StrokeStyle::Solid)?;
    out.push_str("/>\n");
    Ok(())
}

fn write_text(out: &mut String, text: &TextPrimitive) -> fmt::Result {
    let anchor = match text.h_align {
        TextHAlign::Left => "start",
        TextHAlign::Center => "middle",
        TextHAlign::Right => "end",
    };
    write!(
        out,
        r#"<text x="{}" y="{}" font-size="{}" text-anchor="{anchor}""#,
        format_one_decimal(text.x),
        format_one_decimal(text.y),
        trim_number(text.font_size_px)
    )?;
    if text.bold {
        out.push_str(r#" font-weight="700""#);
    }
    write_paint(out, "fill", text.color)?;
    out.push('>');
    escape_text(out, &text.text);
    out.push_str("</text>\n");
    Ok(())
}

fn escape_text(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

/// Shortest representation up to two decimals (`2`, `0.5`, `1.25`).
fn trim_number(value: f64) -> String {
    let formatted = format!("{value:.2}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_owned()
    } else {
        trimmed.to_owned()
    }
}
