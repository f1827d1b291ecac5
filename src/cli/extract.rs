//! Extract command: map SVG → node.json and link.json.

use anyhow::{Context, Result};

use crate::config::SvgmaskConfig;
use crate::svg::extract_graph;
use crate::utils::{plural_count, read_input};
use crate::{debug, log};

use super::ExtractArgs;
use super::common::write_json;

/// Extract nodes and links from the SVG named in `args`.
pub fn run_extract(args: &ExtractArgs, config: &SvgmaskConfig) -> Result<()> {
    let svg = read_input(&args.svg)?;
    let graph =
        extract_graph(&svg).with_context(|| format!("Failed to extract {}", args.svg.display()))?;

    log!("extract"; "found {} and {}",
        plural_count(graph.nodes.len(), "node"), plural_count(graph.links.len(), "link"));

    if graph.nodes.is_empty() {
        log!("warning"; "no rects under a `node` group, links have no endpoints");
    }
    for link in &graph.links {
        if link.path.is_empty() {
            debug!("extract"; "link {} has no path data", link.name);
        }
    }

    let out = &config.output;
    let nodes_path = out.join(&out.nodes);
    let links_path = out.join(&out.links);
    write_json(&nodes_path, &graph.nodes)?;
    write_json(&links_path, &graph.links)?;

    log!("done"; "{}, {}", nodes_path.display(), links_path.display());
    Ok(())
}
