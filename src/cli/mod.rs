//! Command-line interface module.

mod args;
pub mod common;
pub mod decode;
pub mod extract;
pub mod layers;
pub mod rasterize;

pub use args::{Cli, Commands, DecodeArgs, ExtractArgs, LayersArgs, RasterizeArgs};
