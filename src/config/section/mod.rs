//! Configuration section definitions.
//!
//! Each module corresponds to a section in `svgmask.toml`:
//!
//! | Module   | TOML Section | Purpose                                |
//! |----------|--------------|----------------------------------------|
//! | `sample` | `[sample]`   | Curve and normal-offset resolution     |
//! | `mask`   | `[mask]`     | Mask composition (sentinel color)      |
//! | `output` | `[output]`   | Output directory and artifact names    |

mod mask;
mod output;
mod sample;

pub use mask::MaskConfig;
pub use output::OutputConfig;
pub use sample::SampleConfig;
