use std::io::Cursor;
use std::path::PathBuf;

use anyhow::{Context, Result};
use image::{GrayImage, ImageFormat, Luma};

use super::{IndexRaster, MaskOutput};
use crate::utils::write_output;

/// Where `MaskOutput::save` writes each artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub mask: PathBuf,
    pub index: PathBuf,
    pub mapping: PathBuf,
}

impl MaskOutput {
    /// Encode every artifact, then write them.
    ///
    /// The index raster is 8-bit grayscale when every index fits in a byte,
    /// 16-bit otherwise. Encoding happens before any file is touched, so an
    /// encoding failure leaves no artifact behind.
    pub fn save(&self, paths: &OutputPaths) -> Result<()> {
        let mask = encode_png(|buf| self.mask.write_to(buf, ImageFormat::Png))
            .context("Failed to encode mask image")?;
        let index = encode_index(&self.index).context("Failed to encode index raster")?;
        let mapping =
            serde_json::to_string_pretty(&self.mapping).context("Failed to encode mapping")?;

        write_output(&paths.mask, &mask)?;
        write_output(&paths.index, &index)?;
        write_output(&paths.mapping, mapping.as_bytes())?;
        Ok(())
    }
}

fn encode_png(
    write: impl FnOnce(&mut Cursor<Vec<u8>>) -> image::ImageResult<()>,
) -> image::ImageResult<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    write(&mut buf)?;
    Ok(buf.into_inner())
}

fn encode_index(index: &IndexRaster) -> image::ImageResult<Vec<u8>> {
    let fits_u8 = index.pixels().all(|p| p[0] <= u16::from(u8::MAX));
    if fits_u8 {
        let narrow = GrayImage::from_fn(index.width(), index.height(), |x, y| {
            Luma([index.get_pixel(x, y)[0] as u8])
        });
        encode_png(|buf| narrow.write_to(buf, ImageFormat::Png))
    } else {
        encode_png(|buf| index.write_to(buf, ImageFormat::Png))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::fs;

    use image::{DynamicImage, Rgba, RgbaImage};
    use tempfile::TempDir;

    use super::*;
    use crate::raster::rasterize::RasterReport;

    fn output(max_index: u16) -> MaskOutput {
        let mut mask = RgbaImage::from_pixel(4, 4, Rgba([255, 255, 255, 0]));
        mask.put_pixel(1, 1, Rgba([9, 8, 7, 255]));
        let mut index = IndexRaster::new(4, 4);
        index.put_pixel(1, 1, Luma([max_index]));
        MaskOutput {
            mask,
            index,
            mapping: BTreeMap::from([(max_index, "river".to_string())]),
            report: RasterReport::default(),
        }
    }

    fn paths(dir: &TempDir) -> OutputPaths {
        OutputPaths {
            mask: dir.path().join("out/new_mask.png"),
            index: dir.path().join("out/new_mask_binary.png"),
            mapping: dir.path().join("out/mask.json"),
        }
    }

    #[test]
    fn test_save_small_index_as_8bit() {
        let dir = TempDir::new().unwrap();
        let paths = paths(&dir);
        output(1).save(&paths).unwrap();

        let mask = image::open(&paths.mask).unwrap().to_rgba8();
        assert_eq!(*mask.get_pixel(1, 1), Rgba([9, 8, 7, 255]));
        assert_eq!(mask.get_pixel(0, 0)[3], 0);

        let index = image::open(&paths.index).unwrap();
        assert!(matches!(index, DynamicImage::ImageLuma8(_)));
        assert_eq!(index.to_luma8().get_pixel(1, 1)[0], 1);

        let json = fs::read_to_string(&paths.mapping).unwrap();
        let mapping: BTreeMap<String, String> = serde_json::from_str(&json).unwrap();
        assert_eq!(mapping.get("1").map(String::as_str), Some("river"));
    }

    #[test]
    fn test_save_large_index_as_16bit() {
        let dir = TempDir::new().unwrap();
        let paths = paths(&dir);
        output(300).save(&paths).unwrap();

        let index = image::open(&paths.index).unwrap();
        assert!(matches!(index, DynamicImage::ImageLuma16(_)));
        assert_eq!(index.to_luma16().get_pixel(1, 1)[0], 300);
    }
}
