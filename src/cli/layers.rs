//! Layers command: map SVG → layers.json.

use anyhow::{Context, Result};

use crate::config::SvgmaskConfig;
use crate::svg::extract_layers;
use crate::utils::{plural_count, read_input};
use crate::{debug, log};

use super::LayersArgs;
use super::common::write_json;

/// Collect the shapes of every layer in the SVG named in `args`.
pub fn run_layers(args: &LayersArgs, config: &SvgmaskConfig) -> Result<()> {
    let svg = read_input(&args.svg)?;
    let layers =
        extract_layers(&svg).with_context(|| format!("Failed to extract {}", args.svg.display()))?;

    if layers.0.is_empty() {
        log!("warning"; "no layer groups under a top-level `g`");
    }
    for layer in &layers.0 {
        debug!("layers"; "{}: {}", layer.id, plural_count(layer.elements.len(), "element"));
    }
    let total: usize = layers.0.iter().map(|l| l.elements.len()).sum();
    log!("layers"; "found {} in {}",
        plural_count(total, "element"), plural_count(layers.0.len(), "layer"));

    let out = &config.output;
    let path = out.join(&out.layers);
    write_json(&path, &layers)?;

    log!("done"; "{}", path.display());
    Ok(())
}
