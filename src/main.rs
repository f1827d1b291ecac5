//! svgmask - node/link extraction and path masks for map SVGs.

mod cli;
mod config;
mod geometry;
mod logger;
mod raster;
mod svg;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::SvgmaskConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = SvgmaskConfig::load(&cli)?;

    match &cli.command {
        Commands::Extract { args } => cli::extract::run_extract(args, &config),
        Commands::Rasterize { args } => cli::rasterize::run_rasterize(args, &config),
        Commands::Layers { args } => cli::layers::run_layers(args, &config),
        Commands::DecodeIds { args } => cli::decode::run_decode(args),
    }
}
