//! Rasterization of sampled paths into pixel masks.
//!
//! # Modules
//!
//! - [`pixels`]: per-path pixel sets (curve samples plus the normal band)
//! - [`ownership`]: explicit last-write-wins pixel ownership
//! - [`rasterize`]: path-by-path rasterization and mask composition
//! - [`output`]: persistence of the mask, index raster and mapping
//!
//! # Architecture
//!
//! ```text
//! Path ──► path_pixels ──► OwnershipBuilder::claim ──┐
//! Path ──► path_pixels ──► OwnershipBuilder::claim ──┤  (caller order)
//!                                                    ▼
//!                                             PixelOwnership
//!                                                    │
//!                               origin image ──►  compose
//!                                                    ▼
//!                                 mask + index raster + index→name mapping
//! ```

mod output;
mod ownership;
mod pixels;
mod rasterize;

use image::{ImageBuffer, Luma, Rgba};

use crate::geometry::SampleError;

pub use output::OutputPaths;
pub use ownership::{OwnershipBuilder, PixelOwnership};
pub use pixels::path_pixels;
pub use rasterize::{MaskOutput, SkippedPath, rasterize};

/// Single-channel raster holding the owning path index per pixel (0 = none).
pub type IndexRaster = ImageBuffer<Luma<u16>, Vec<u16>>;

/// Integer pixel coordinate `(x, y)`.
pub type Pixel = (u32, u32);

/// Marker for claimed pixels whose origin color is fully transparent.
pub const DEFAULT_SENTINEL: Rgba<u8> = Rgba([0, 255, 0, 255]);

/// Background of a freshly created mask.
pub const MASK_BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 0]);

/// Sampling resolution and mask settings.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterOptions {
    /// Parameter steps along each path (`sample_count + 1` points).
    pub sample_count: usize,
    /// Normal-offset points per curve point. Must be even.
    pub offset_count: usize,
    /// Scale of the offset band: steps are `max_distance / offset_count`.
    pub max_distance: f64,
    /// Color written where the origin pixel is transparent.
    pub sentinel: Rgba<u8>,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            sample_count: 500,
            offset_count: 10,
            max_distance: 10.0,
            sentinel: DEFAULT_SENTINEL,
        }
    }
}

impl RasterOptions {
    /// Reject parameters that would fail every path.
    pub fn validate(&self) -> Result<(), SampleError> {
        if self.sample_count == 0 {
            return Err(SampleError::InvalidParameter(
                "sample count must be positive".to_string(),
            ));
        }
        if self.offset_count == 0 || self.offset_count % 2 != 0 {
            return Err(SampleError::InvalidParameter(format!(
                "offset count must be a positive even number, got {}",
                self.offset_count
            )));
        }
        if !(self.max_distance > 0.0 && self.max_distance.is_finite()) {
            return Err(SampleError::InvalidParameter(format!(
                "max distance must be positive, got {}",
                self.max_distance
            )));
        }
        Ok(())
    }
}
