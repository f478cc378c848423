use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::primitives::format_one_decimal;
use crate::core::types::ScreenPoint;
use crate::error::{ChartError, ChartResult};

/// One absolute path command in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PathCommand {
    MoveTo(ScreenPoint),
    LineTo(ScreenPoint),
    CubicTo {
        ctrl1: ScreenPoint,
        ctrl2: ScreenPoint,
        to: ScreenPoint,
    },
    Close,
}

/// Ordered path geometry shared between the curve fitters and renderers.
///
/// Coordinates are kept at full precision; `Display` serializes them to the
/// SVG path syntax with one decimal place.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PathData {
    commands: Vec<PathCommand>,
}

impl PathData {
    /// The "no path" result returned for insufficient input.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            commands: Vec::with_capacity(capacity),
        }
    }

    pub fn move_to(&mut self, point: ScreenPoint) {
        self.commands.push(PathCommand::MoveTo(point));
    }

    pub fn line_to(&mut self, point: ScreenPoint) {
        self.commands.push(PathCommand::LineTo(point));
    }

    pub fn cubic_to(&mut self, ctrl1: ScreenPoint, ctrl2: ScreenPoint, to: ScreenPoint) {
        self.commands.push(PathCommand::CubicTo { ctrl1, ctrl2, to });
    }

    pub fn close(&mut self) {
        self.commands.push(PathCommand::Close);
    }

    #[must_use]
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    #[must_use]
    pub fn start_point(&self) -> Option<ScreenPoint> {
        match self.commands.first() {
            Some(PathCommand::MoveTo(point)) => Some(*point),
            _ => None,
        }
    }

    /// Last explicit vertex (ignores a trailing close command).
    #[must_use]
    pub fn end_point(&self) -> Option<ScreenPoint> {
        self.commands.iter().rev().find_map(|command| match command {
            PathCommand::MoveTo(point) | PathCommand::LineTo(point) => Some(*point),
            PathCommand::CubicTo { to, .. } => Some(*to),
            PathCommand::Close => None,
        })
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        matches!(self.commands.last(), Some(PathCommand::Close))
    }

    /// Appends another path's commands.
    pub fn extend(&mut self, other: &PathData) {
        self.commands.extend_from_slice(&other.commands);
    }

    #[must_use]
    pub fn to_svg(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PathData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = |point: &ScreenPoint| {
            format!(
                "{},{}",
                format_one_decimal(point.x),
                format_one_decimal(point.y)
            )
        };
        for (i, command) in self.commands.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match command {
                PathCommand::MoveTo(point) => write!(f, "M{}", p(point))?,
                PathCommand::LineTo(point) => write!(f, "L{}", p(point))?,
                PathCommand::CubicTo { ctrl1, ctrl2, to } => {
                    write!(f, "C{} {} {}", p(ctrl1), p(ctrl2), p(to))?
                }
                PathCommand::Close => f.write_str("Z")?,
            }
        }
        Ok(())
    }
}

impl FromStr for PathData {
    type Err = ChartError;

    /// Parses the absolute `M`/`L`/`C`/`Z` subset produced by `Display`.
    fn from_str(input: &str) -> ChartResult<Self> {
        let mut tokens = PathTokens::new(input);
        let mut path = PathData::empty();
        while let Some(op) = tokens.next_op()? {
            match op {
                'M' => path.move_to(tokens.point()?),
                'L' => path.line_to(tokens.point()?),
                'C' => {
                    let ctrl1 = tokens.point()?;
                    let ctrl2 = tokens.point()?;
                    let to = tokens.point()?;
                    path.cubic_to(ctrl1, ctrl2, to);
                }
                'Z' | 'z' => path.close(),
                other => {
                    return Err(ChartError::InvalidData(format!(
                        "unsupported path command `{other}`"
                    )));
                }
            }
        }
        Ok(path)
    }
}

struct PathTokens<'a> {
    rest: &'a str,
}

impl<'a> PathTokens<'a> {
    fn new(input: &'a str) -> Self {
        Self { rest: input }
    }

    fn skip_separators(&mut self) {
        self.rest = self
            .rest
            .trim_start_matches(|c: char| c.is_whitespace() || c == ',');
    }

    fn next_op(&mut self) -> ChartResult<Option<char>> {
        self.skip_separators();
        let Some(c) = self.rest.chars().next() else {
            return Ok(None);
        };
        if !c.is_ascii_alphabetic() {
            return Err(ChartError::InvalidData(format!(
                "expected path command, found `{c}`"
            )));
        }
        self.rest = &self.rest[c.len_utf8()..];
        Ok(Some(c))
    }

    fn number(&mut self) -> ChartResult<f64> {
        self.skip_separators();
        let end = self
            .rest
            .char_indices()
            .find(|&(i, c)| {
                !(c.is_ascii_digit() || c == '.' || ((c == '-' || c == '+') && i == 0))
            })
            .map_or(self.rest.len(), |(i, _)| i);
        let (literal, rest) = self.rest.split_at(end);
        self.rest = rest;
        literal
            .parse::<f64>()
            .map_err(|_| ChartError::InvalidData(format!("invalid path number `{literal}`")))
    }

    fn point(&mut self) -> ChartResult<ScreenPoint> {
        let x = self.number()?;
        let y = self.number()?;
        Ok(ScreenPoint::new(x, y))
    }
}
