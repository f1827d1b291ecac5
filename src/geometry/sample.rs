//! Curve sampling and normal-offset sampling.

use thiserror::Error;

use super::{Path, Point, Vec2};

/// Sampling failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SampleError {
    /// The path has no segments or no evaluable geometry.
    #[error("path `{name}` cannot be sampled: {reason}")]
    InvalidPath { name: String, reason: String },

    /// A sampling parameter is out of range.
    #[error("invalid sampling parameter: {0}")]
    InvalidParameter(String),
}

impl SampleError {
    fn invalid_path(path: &Path, reason: &str) -> Self {
        Self::InvalidPath {
            name: path.name().to_string(),
            reason: reason.to_string(),
        }
    }
}

/// A point on a curve together with the unit normal there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveSample {
    pub point: Point,
    pub normal: Vec2,
}

/// Evaluate `path` at `t = i / sample_count` for `i` in `0..=sample_count`.
///
/// Returns `sample_count + 1` samples ordered by increasing `t`.
pub fn sample_along_curve(
    path: &Path,
    sample_count: usize,
) -> Result<Vec<CurveSample>, SampleError> {
    if sample_count == 0 {
        return Err(SampleError::InvalidParameter(
            "sample count must be positive".to_string(),
        ));
    }
    if path.is_empty() {
        return Err(SampleError::invalid_path(path, "no drawable segments"));
    }

    (0..=sample_count)
        .map(|i| {
            let t = i as f64 / sample_count as f64;
            let point = path
                .point_at(t)
                .ok_or_else(|| SampleError::invalid_path(path, "zero length"))?;
            let normal = path
                .normal_at(t)
                .ok_or_else(|| SampleError::invalid_path(path, "undefined tangent"))?;
            if !(point.x.is_finite() && point.y.is_finite()) {
                return Err(SampleError::invalid_path(path, "non-finite coordinates"));
            }
            Ok(CurveSample { point, normal })
        })
        .collect()
}

/// Points along `±normal` around `point`, symmetric about it.
///
/// For `i` in `1..=offset_count / 2` the distance is
/// `i * max_distance / offset_count`; the positive side comes first in each
/// pair. `offset_count` must be even and positive.
pub fn sample_normal_offsets(
    point: Point,
    normal: Vec2,
    offset_count: usize,
    max_distance: f64,
) -> Result<Vec<Point>, SampleError> {
    if offset_count == 0 || offset_count % 2 != 0 {
        return Err(SampleError::InvalidParameter(format!(
            "offset count must be a positive even number, got {offset_count}"
        )));
    }
    if !(max_distance > 0.0 && max_distance.is_finite()) {
        return Err(SampleError::InvalidParameter(format!(
            "max distance must be positive, got {max_distance}"
        )));
    }

    let step = max_distance / offset_count as f64;
    let mut points = Vec::with_capacity(offset_count);
    for i in 1..=offset_count / 2 {
        let offset = normal * (i as f64 * step);
        points.push(point + offset);
        points.push(point - offset);
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_sample_count_and_endpoints() {
        let path = Path::parse("curve", "M 2 3 C 2 10 12 10 12 3 L 20 3").unwrap();
        for count in [1, 2, 7, 500] {
            let samples = sample_along_curve(&path, count).unwrap();
            assert_eq!(samples.len(), count + 1);
            assert!(samples[0].point.distance(path.start().unwrap()) < EPS);
            assert!(samples[count].point.distance(path.end().unwrap()) < EPS);
        }
    }

    #[test]
    fn test_normals_are_unit() {
        let path = Path::parse("curve", "M 0 0 Q 5 10 10 0").unwrap();
        for sample in sample_along_curve(&path, 50).unwrap() {
            assert!((sample.normal.hypot() - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn test_sampling_is_deterministic() {
        let path = Path::parse("curve", "M 0 0 A 5 5 0 0 1 10 0").unwrap();
        assert_eq!(
            sample_along_curve(&path, 64).unwrap(),
            sample_along_curve(&path, 64).unwrap()
        );
    }

    #[test]
    fn test_zero_sample_count_rejected() {
        let path = Path::parse("line", "M 0 0 L 1 1").unwrap();
        assert!(matches!(
            sample_along_curve(&path, 0),
            Err(SampleError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_empty_path_rejected() {
        let path = Path::parse("nothing", "M 4 4").unwrap();
        let err = sample_along_curve(&path, 10).unwrap_err();
        assert!(matches!(err, SampleError::InvalidPath { ref name, .. } if name == "nothing"));
    }

    #[test]
    fn test_normal_offsets_symmetric() {
        let base = Point::new(5.0, 5.0);
        let normal = Vec2::new(0.6, 0.8);
        let points = sample_normal_offsets(base, normal, 10, 10.0).unwrap();
        assert_eq!(points.len(), 10);

        for (i, pair) in points.chunks_exact(2).enumerate() {
            let (pos, neg) = (pair[0], pair[1]);
            let expected = (i + 1) as f64;
            assert!((pos.distance(base) - expected).abs() < EPS);
            assert!((neg.distance(base) - expected).abs() < EPS);
            // Collinear with the normal, on opposite sides.
            assert!((pos - base).cross(normal).abs() < EPS);
            assert!((neg - base).cross(normal).abs() < EPS);
            assert!((pos - base).dot(normal) > 0.0);
            assert!((neg - base).dot(normal) < 0.0);
        }
    }

    #[test]
    fn test_normal_offsets_odd_count_rejected() {
        let err = sample_normal_offsets(Point::ORIGIN, Vec2::new(1.0, 0.0), 3, 10.0);
        assert!(matches!(err, Err(SampleError::InvalidParameter(_))));
        let err = sample_normal_offsets(Point::ORIGIN, Vec2::new(1.0, 0.0), 0, 10.0);
        assert!(matches!(err, Err(SampleError::InvalidParameter(_))));
    }

    #[test]
    fn test_normal_offsets_bad_distance_rejected() {
        for distance in [0.0, -1.0, f64::NAN] {
            let err = sample_normal_offsets(Point::ORIGIN, Vec2::new(1.0, 0.0), 4, distance);
            assert!(matches!(err, Err(SampleError::InvalidParameter(_))));
        }
    }
}
