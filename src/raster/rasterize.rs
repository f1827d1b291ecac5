//! Incremental rasterizer and mask composition.

use std::collections::BTreeMap;

use image::{Luma, RgbaImage};

use crate::geometry::{Path, SampleError};
use crate::logger::ProgressLine;
use crate::utils::plural_count;
use crate::{debug, log};

use super::{
    IndexRaster, MASK_BACKGROUND, OwnershipBuilder, PixelOwnership, RasterOptions, path_pixels,
};

/// A path that was skipped instead of rasterized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPath {
    pub name: String,
    pub reason: String,
}

/// Summary of a rasterization run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RasterReport {
    pub rasterized: usize,
    pub skipped: Vec<SkippedPath>,
    /// Claims that overwrote another path's pixel.
    pub contested: usize,
    /// Sample points that fell outside the origin image.
    pub out_of_bounds: usize,
}

/// Result of adding one path.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PathOutcome {
    Rasterized { index: u16, pixels: usize },
    Skipped,
}

/// Everything a run produces.
#[derive(Debug, Clone)]
pub struct MaskOutput {
    /// Origin colors at claimed pixels, transparent elsewhere.
    pub mask: RgbaImage,
    /// Owning path index per pixel, 0 where unclaimed.
    pub index: IndexRaster,
    /// Path index → path name, for every rasterized path.
    pub mapping: BTreeMap<u16, String>,
    pub report: RasterReport,
}

/// Rasterizes paths one at a time against an origin image.
///
/// Indices start at 1 and are handed out in the order paths are added;
/// skipped paths do not consume an index. Once all `u16::MAX` indices are
/// taken, further paths are skipped.
struct Rasterizer<'a> {
    origin: &'a RgbaImage,
    options: &'a RasterOptions,
    ownership: OwnershipBuilder,
    mapping: BTreeMap<u16, String>,
    report: RasterReport,
}

impl<'a> Rasterizer<'a> {
    fn new(origin: &'a RgbaImage, options: &'a RasterOptions) -> Result<Self, SampleError> {
        options.validate()?;
        Ok(Self {
            origin,
            options,
            ownership: OwnershipBuilder::new(),
            mapping: BTreeMap::new(),
            report: RasterReport::default(),
        })
    }

    /// Sample `path` and claim its pixels.
    ///
    /// Paths that cannot be sampled, or that arrive after the index space is
    /// exhausted, are recorded as skipped; parameter errors are returned.
    fn add_path(&mut self, path: &Path) -> Result<PathOutcome, SampleError> {
        let Ok(index) = u16::try_from(self.mapping.len() + 1) else {
            let reason = format!("index raster holds at most {} paths", u16::MAX);
            return Ok(self.skip(path.name().to_string(), reason));
        };

        let (width, height) = self.origin.dimensions();
        let pixels = match path_pixels(path, self.options, width, height) {
            Ok(pixels) => pixels,
            Err(SampleError::InvalidPath { name, reason }) => return Ok(self.skip(name, reason)),
            Err(e) => return Err(e),
        };

        self.ownership.claim_all(&pixels.pixels, index);
        self.mapping.insert(index, path.name().to_string());
        self.report.rasterized += 1;
        self.report.out_of_bounds += pixels.out_of_bounds;

        Ok(PathOutcome::Rasterized {
            index,
            pixels: pixels.pixels.len(),
        })
    }

    fn skip(&mut self, name: String, reason: String) -> PathOutcome {
        log!("skip"; "{}: {}", name, reason);
        self.report.skipped.push(SkippedPath { name, reason });
        PathOutcome::Skipped
    }

    /// Compose the mask and index raster from the final ownership.
    fn finish(self) -> MaskOutput {
        let ownership = self.ownership.build();
        let (mask, index) = compose(self.origin, &ownership, self.options);
        let report = RasterReport {
            contested: ownership.contested(),
            ..self.report
        };
        MaskOutput {
            mask,
            index,
            mapping: self.mapping,
            report,
        }
    }
}

/// Rasterize `paths` in order against `origin`.
///
/// Options are validated before any path is touched. Paths that cannot be
/// sampled are skipped and listed in the report; the run continues.
pub fn rasterize(
    paths: &[Path],
    origin: &RgbaImage,
    options: &RasterOptions,
) -> Result<MaskOutput, SampleError> {
    let mut rasterizer = Rasterizer::new(origin, options)?;
    let mut progress = ProgressLine::new("rasterize", paths.len());
    for path in paths {
        if let PathOutcome::Rasterized { index, pixels } = rasterizer.add_path(path)? {
            debug!("rasterize"; "#{} {}: {} over length {:.1}",
                index, path.name(), plural_count(pixels, "pixel"), path.length());
        }
        progress.inc();
    }
    progress.finish();
    Ok(rasterizer.finish())
}

fn compose(
    origin: &RgbaImage,
    ownership: &PixelOwnership,
    options: &RasterOptions,
) -> (RgbaImage, IndexRaster) {
    let (width, height) = origin.dimensions();
    let mut mask = RgbaImage::from_pixel(width, height, MASK_BACKGROUND);
    let mut index = IndexRaster::new(width, height);

    for ((x, y), owner) in ownership.iter() {
        let source = *origin.get_pixel(x, y);
        let color = if source[3] == 0 {
            options.sentinel
        } else {
            source
        };
        mask.put_pixel(x, y, color);
        index.put_pixel(x, y, Luma([owner]));
    }

    (mask, index)
}
