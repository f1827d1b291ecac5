//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// svgmask: map SVG extraction and path mask rasterization
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: svgmask.toml, optional)
    #[arg(short = 'C', long, global = true, default_value = "svgmask.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Extract nodes and links from a map SVG
    #[command(visible_alias = "e")]
    Extract {
        #[command(flatten)]
        args: ExtractArgs,
    },

    /// Rasterize link paths against an origin image
    #[command(visible_alias = "r")]
    Rasterize {
        #[command(flatten)]
        args: RasterizeArgs,
    },

    /// Collect per-layer shapes and labels from a map SVG
    #[command(visible_alias = "l")]
    Layers {
        #[command(flatten)]
        args: LayersArgs,
    },

    /// Decode byte-entity encoded element ids in an SVG
    #[command(visible_alias = "d")]
    DecodeIds {
        #[command(flatten)]
        args: DecodeArgs,
    },
}

/// Extract command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct ExtractArgs {
    /// Map SVG to read
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub svg: PathBuf,

    /// Output directory for node.json and link.json
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,
}

/// Rasterize command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct RasterizeArgs {
    /// Link JSON (array of objects with `name` and `path`)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub links: PathBuf,

    /// Origin image whose colors are copied into the mask
    #[arg(short = 'i', long, value_hint = clap::ValueHint::FilePath)]
    pub origin: PathBuf,

    /// Output directory for the mask, index raster and mapping
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Parameter steps along each path
    #[arg(short = 'n', long)]
    pub samples: Option<usize>,

    /// Normal-offset samples per curve point (even)
    #[arg(short = 'k', long)]
    pub offsets: Option<usize>,

    /// Scale of the normal-offset band
    #[arg(short = 'd', long)]
    pub max_distance: Option<f64>,

    /// Color for claimed pixels that are transparent in the origin (#rrggbb[aa])
    #[arg(long)]
    pub sentinel: Option<String>,
}

/// Layers command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct LayersArgs {
    /// Map SVG to read
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub svg: PathBuf,

    /// Output directory for layers.json
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,
}

/// Decode-ids command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct DecodeArgs {
    /// SVG with entity-encoded ids
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub input: PathBuf,

    /// Where to write the decoded SVG
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: PathBuf,
}
