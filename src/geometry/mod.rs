//! Path geometry: parsing, evaluation and sampling.
//!
//! Segments are `kurbo` curves; this module adds the pieces the mask needs on
//! top: named paths with a length-weighted parameter, unit normals, and the
//! two sampling operations.
//!
//! # Modules
//!
//! - [`segment`]: tangents of `kurbo::PathSeg` with cusp fallbacks
//! - [`path`]: named paths built from SVG path-command strings
//! - [`sample`]: curve sampling and normal-offset sampling
//!
//! # Pipeline
//!
//! ```text
//! "M 0 0 C ..." ──► Path::parse ──► sample_along_curve ──► sample_normal_offsets
//!                                    (points + normals)      (offset band)
//! ```

mod path;
mod sample;
mod segment;

pub use kurbo::{Point, Vec2};
pub use path::Path;
pub use sample::{SampleError, sample_along_curve, sample_normal_offsets};

/// Lengths at or below this are treated as zero.
pub(crate) const LENGTH_EPSILON: f64 = 1e-9;

/// Unit vector in the direction of `v`, `None` for a zero or non-finite vector.
#[inline]
pub(crate) fn unit(v: Vec2) -> Option<Vec2> {
    let len = v.hypot();
    (len > LENGTH_EPSILON && len.is_finite()).then(|| v / len)
}

/// Rotate by -90°: `(x, y) -> (y, -x)`.
#[inline]
pub(crate) fn perpendicular(v: Vec2) -> Vec2 {
    Vec2::new(v.y, -v.x)
}
