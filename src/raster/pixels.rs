use crate::geometry::{Path, Point, SampleError, sample_along_curve, sample_normal_offsets};

use super::{Pixel, RasterOptions};

/// Pixels covered by one path, sorted and deduplicated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PathPixels {
    pub pixels: Vec<Pixel>,
    /// Sample points that rounded to a coordinate outside the image.
    pub out_of_bounds: usize,
}

/// Sample `path` and round every curve and normal-offset point to a pixel.
///
/// Rounding is per axis, to the nearest integer with ties to even. Points
/// outside `width × height` are counted but not returned.
pub fn path_pixels(
    path: &Path,
    options: &RasterOptions,
    width: u32,
    height: u32,
) -> Result<PathPixels, SampleError> {
    let samples = sample_along_curve(path, options.sample_count)?;

    let mut pixels = Vec::with_capacity(samples.len() * (1 + options.offset_count));
    let mut out_of_bounds = 0;
    let mut push = |p: Point| match to_pixel(p, width, height) {
        Some(pixel) => pixels.push(pixel),
        None => out_of_bounds += 1,
    };

    for sample in &samples {
        push(sample.point);
        for offset in sample_normal_offsets(
            sample.point,
            sample.normal,
            options.offset_count,
            options.max_distance,
        )? {
            push(offset);
        }
    }

    pixels.sort_unstable();
    pixels.dedup();
    Ok(PathPixels {
        pixels,
        out_of_bounds,
    })
}

#[inline]
fn to_pixel(p: Point, width: u32, height: u32) -> Option<Pixel> {
    let x = p.x.round_ties_even();
    let y = p.y.round_ties_even();
    let in_range = |v: f64, limit: u32| v >= 0.0 && v < f64::from(limit);
    (in_range(x, width) && in_range(y, height)).then(|| (x as u32, y as u32))
}
