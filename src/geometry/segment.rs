use kurbo::{ParamCurve, ParamCurveDeriv, PathSeg, Vec2};

use super::unit;

/// Accuracy passed to `ParamCurveArclen::arclen`.
pub(super) const ARCLEN_ACCURACY: f64 = 1e-6;

/// First derivative of `seg` at local parameter `t`.
pub(super) fn derivative(seg: &PathSeg, t: f64) -> Vec2 {
    match seg {
        PathSeg::Line(line) => line.p1 - line.p0,
        PathSeg::Quad(quad) => quad.deriv().eval(t).to_vec2(),
        PathSeg::Cubic(cubic) => cubic.deriv().eval(t).to_vec2(),
    }
}

/// Unit tangent at `t`.
///
/// Where the derivative vanishes (a control point on top of an endpoint) the
/// derivative just inside the segment is used, then the chord.
pub(super) fn unit_tangent(seg: &PathSeg, t: f64) -> Option<Vec2> {
    const NUDGE: f64 = 1e-6;
    let inner = if t < 0.5 { t + NUDGE } else { t - NUDGE };
    unit(derivative(seg, t))
        .or_else(|| unit(derivative(seg, inner)))
        .or_else(|| unit(seg.end() - seg.start()))
}
