//! Rasterize command: link paths → mask, index raster and mapping.

use std::path::Path as FsPath;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::config::SvgmaskConfig;
use crate::geometry::Path;
use crate::raster::{OutputPaths, SkippedPath, rasterize};
use crate::utils::{plural_count, read_input};
use crate::{debug, log};

use super::RasterizeArgs;

/// One entry of the link JSON. Other fields are ignored.
#[derive(Debug, Clone, Deserialize)]
struct PathRecord {
    name: String,
    #[serde(default)]
    path: Option<String>,
}

/// Rasterize every link path against the origin image and save the results.
pub fn run_rasterize(args: &RasterizeArgs, config: &SvgmaskConfig) -> Result<()> {
    let options = config.raster_options()?;
    let records = load_records(&args.links)?;
    let origin = image::open(&args.origin)
        .with_context(|| format!("Failed to open origin image {}", args.origin.display()))?
        .to_rgba8();

    let (paths, mut skipped) = parse_records(records);
    let (width, height) = origin.dimensions();
    log!("rasterize"; "{} against {}x{} origin",
        plural_count(paths.len(), "path"), width, height);

    let output = rasterize(&paths, &origin, &options)?;
    let out = &config.output;
    output.save(&OutputPaths {
        mask: out.join(&out.mask),
        index: out.join(&out.index),
        mapping: out.join(&out.mapping),
    })?;

    let report = &output.report;
    skipped.extend(report.skipped.iter().cloned());
    if report.contested > 0 {
        log!("warning"; "{} claimed by more than one path, the later path kept them",
            plural_count(report.contested, "pixel"));
    }
    debug!("rasterize"; "{} fell outside the origin",
        plural_count(report.out_of_bounds, "sample"));
    log!("done"; "rasterized {}, skipped {} → {}",
        plural_count(report.rasterized, "path"), skipped.len(), out.dir.display());
    Ok(())
}

fn load_records(path: &FsPath) -> Result<Vec<PathRecord>> {
    let json = read_input(path)?;
    serde_json::from_str(&json).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Build paths in record order.
///
/// Records without path data are dropped before indexing; records whose data
/// does not parse are reported as skipped.
fn parse_records(records: Vec<PathRecord>) -> (Vec<Path>, Vec<SkippedPath>) {
    let mut paths = Vec::with_capacity(records.len());
    let mut skipped = Vec::new();

    for record in records {
        let Some(data) = record.path.filter(|d| !d.trim().is_empty()) else {
            debug!("skip"; "{}: no path data", record.name);
            continue;
        };
        match Path::parse(record.name.as_str(), &data) {
            Ok(path) => paths.push(path),
            Err(e) => {
                log!("skip"; "{}", e);
                skipped.push(SkippedPath {
                    name: record.name,
                    reason: e.source.to_string(),
                });
            }
        }
    }

    (paths, skipped)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    use super::*;
    use crate::config::SvgmaskConfig;

    fn records(json: &str) -> Vec<PathRecord> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_parse_records_filters_and_reports() {
        let (paths, skipped) = parse_records(records(
            r#"[
                {"name": "a", "path": "M 0 0 L 5 5", "source": "X"},
                {"name": "b", "path": ""},
                {"name": "c"},
                {"name": "d", "path": "M 0 0 L nope"},
                {"name": "e", "path": "M 1 1 H 9"}
            ]"#,
        ));
        let names: Vec<_> = paths.iter().map(Path::name).collect();
        assert_eq!(names, ["a", "e"]);
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].name, "d");
    }

    #[test]
    fn test_run_rasterize_writes_outputs() {
        let dir = TempDir::new().unwrap();
        let links = dir.path().join("link.json");
        let origin = dir.path().join("origin.png");
        fs::write(
            &links,
            r#"[{"name": "长江", "path": "M 2 8 L 14 8"}, {"name": "empty", "path": "M 3 3"}]"#,
        )
        .unwrap();
        RgbaImage::from_pixel(16, 16, Rgba([200, 100, 50, 255]))
            .save(&origin)
            .unwrap();

        let args = RasterizeArgs {
            links,
            origin,
            output: None,
            samples: None,
            offsets: None,
            max_distance: None,
            sentinel: None,
        };
        let mut config = SvgmaskConfig::default();
        config.output.dir = dir.path().join("out");
        config.sample.count = 50;
        config.sample.offsets = 4;
        config.sample.max_distance = 4.0;

        run_rasterize(&args, &config).unwrap();

        let mapping = fs::read_to_string(dir.path().join("out/mask.json")).unwrap();
        let mapping: serde_json::Value = serde_json::from_str(&mapping).unwrap();
        assert_eq!(mapping, serde_json::json!({"1": "长江"}));

        let index = image::open(dir.path().join("out/new_mask_binary.png"))
            .unwrap()
            .to_luma8();
        assert_eq!(index.get_pixel(8, 8)[0], 1);
        assert_eq!(index.get_pixel(0, 0)[0], 0);

        let mask = image::open(dir.path().join("out/new_mask.png"))
            .unwrap()
            .to_rgba8();
        assert_eq!(*mask.get_pixel(8, 8), Rgba([200, 100, 50, 255]));
        assert_eq!(mask.get_pixel(0, 0)[3], 0);
    }

    #[test]
    fn test_run_rasterize_missing_origin() {
        let dir = TempDir::new().unwrap();
        let links = dir.path().join("link.json");
        fs::write(&links, "[]").unwrap();

        let args = RasterizeArgs {
            links,
            origin: dir.path().join("missing.png"),
            output: None,
            samples: None,
            offsets: None,
            max_distance: None,
            sentinel: None,
        };
        let mut config = SvgmaskConfig::default();
        config.output.dir = dir.path().join("out");

        let err = run_rasterize(&args, &config).unwrap_err();
        assert!(err.to_string().contains("missing.png"));
        assert!(!dir.path().join("out").exists());
    }
}
