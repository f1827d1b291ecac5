//! Named paths built from SVG path-command strings.

use kurbo::{BezPath, ParamCurve, ParamCurveArclen, PathEl, PathSeg, Point, Vec2};
use svgtypes::{SimplePathSegment, SimplifyingPathParser};
use thiserror::Error;

use super::segment::{ARCLEN_ACCURACY, unit_tangent};
use super::{LENGTH_EPSILON, perpendicular};

/// Path-command string could not be parsed.
#[derive(Debug, Error)]
#[error("invalid path data for `{name}`: {source}")]
pub struct ParseError {
    pub name: String,
    #[source]
    pub source: svgtypes::Error,
}

/// A named sequence of drawable segments.
///
/// Zero-length segments are dropped on construction, so every stored segment
/// has a positive length and the normalized parameter is well defined as long
/// as at least one segment remains.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    name: String,
    segments: Vec<PathSeg>,
    /// Arc length of each segment, parallel to `segments`.
    lengths: Vec<f64>,
    total_length: f64,
}

impl Path {
    /// Build from a `kurbo` path, keeping only segments with positive length.
    pub fn new(name: impl Into<String>, bez: &BezPath) -> Self {
        let (segments, lengths): (Vec<_>, Vec<_>) = bez
            .segments()
            .map(|seg| (seg, seg.arclen(ARCLEN_ACCURACY)))
            .filter(|(_, len)| *len > LENGTH_EPSILON && len.is_finite())
            .unzip();
        let total_length = lengths.iter().sum();
        Self {
            name: name.into(),
            segments,
            lengths,
            total_length,
        }
    }

    /// Parse an SVG `d` attribute.
    ///
    /// Relative commands, shorthand curves and `H`/`V` are resolved by
    /// svgtypes; elliptical arcs arrive already converted to cubics. `Z`
    /// closes the subpath with a line when it is not already closed.
    pub fn parse(name: impl Into<String>, data: &str) -> Result<Self, ParseError> {
        let name = name.into();
        let mut bez = BezPath::new();

        for item in SimplifyingPathParser::from(data) {
            let item = item.map_err(|source| ParseError {
                name: name.clone(),
                source,
            })?;
            bez.push(match item {
                SimplePathSegment::MoveTo { x, y } => PathEl::MoveTo(Point::new(x, y)),
                SimplePathSegment::LineTo { x, y } => PathEl::LineTo(Point::new(x, y)),
                SimplePathSegment::Quadratic { x1, y1, x, y } => {
                    PathEl::QuadTo(Point::new(x1, y1), Point::new(x, y))
                }
                SimplePathSegment::CurveTo {
                    x1,
                    y1,
                    x2,
                    y2,
                    x,
                    y,
                } => PathEl::CurveTo(Point::new(x1, y1), Point::new(x2, y2), Point::new(x, y)),
                SimplePathSegment::ClosePath => PathEl::ClosePath,
            });
        }

        Ok(Self::new(name, &bez))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn length(&self) -> f64 {
        self.total_length
    }

    pub fn start(&self) -> Option<Point> {
        self.segments.first().map(ParamCurve::start)
    }

    pub fn end(&self) -> Option<Point> {
        self.segments.last().map(ParamCurve::end)
    }

    /// Map a normalized parameter onto `(segment, local t)`.
    ///
    /// Each segment covers a share of `[0, 1]` proportional to its length.
    /// A parameter that falls exactly on a boundary resolves to the end of the
    /// earlier segment.
    fn locate(&self, t: f64) -> Option<(&PathSeg, f64)> {
        if self.segments.is_empty() || self.total_length <= LENGTH_EPSILON {
            return None;
        }
        let t = t.clamp(0.0, 1.0);
        let last = self.segments.len() - 1;
        if t >= 1.0 {
            return Some((&self.segments[last], 1.0));
        }

        let mut covered = 0.0;
        for (i, (segment, len)) in self.segments.iter().zip(&self.lengths).enumerate() {
            let share = len / self.total_length;
            if t <= covered + share || i == last {
                let local = ((t - covered) / share).clamp(0.0, 1.0);
                return Some((segment, local));
            }
            covered += share;
        }
        None
    }

    /// Position at normalized parameter `t ∈ [0, 1]`.
    pub fn point_at(&self, t: f64) -> Option<Point> {
        self.locate(t).map(|(seg, local)| seg.eval(local))
    }

    /// Unit normal at normalized parameter `t`: the unit tangent rotated
    /// by -90°.
    pub fn normal_at(&self, t: f64) -> Option<Vec2> {
        self.locate(t)
            .and_then(|(seg, local)| unit_tangent(seg, local))
            .map(perpendicular)
    }
}
