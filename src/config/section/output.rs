//! `[output]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [output]
//! dir = "out"                    # Relative to the config file
//! mask = "new_mask.png"          # Composed RGBA mask
//! index = "new_mask_binary.png"  # Path index raster
//! mapping = "mask.json"          # Index → path name
//! nodes = "node.json"            # Extracted nodes
//! links = "link.json"            # Extracted links
//! layers = "layers.json"         # Per-layer shapes
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Output directory and artifact file names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub mask: PathBuf,
    pub index: PathBuf,
    pub mapping: PathBuf,
    pub nodes: PathBuf,
    pub links: PathBuf,
    pub layers: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            mask: PathBuf::from("new_mask.png"),
            index: PathBuf::from("new_mask_binary.png"),
            mapping: PathBuf::from("mask.json"),
            nodes: PathBuf::from("node.json"),
            links: PathBuf::from("link.json"),
            layers: PathBuf::from("layers.json"),
        }
    }
}

impl OutputConfig {
    /// Join an artifact name with the output directory.
    pub fn join(&self, name: &Path) -> PathBuf {
        self.dir.join(name)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::config::test_parse_config;

    #[test]
    fn test_output_config() {
        let config = test_parse_config("[output]\ndir = \"out\"\nindex = \"owners.png\"");
        assert_eq!(config.output.dir, PathBuf::from("out"));
        assert_eq!(config.output.index, PathBuf::from("owners.png"));
        assert_eq!(config.output.mask, PathBuf::from("new_mask.png"));
        assert_eq!(config.output.layers, PathBuf::from("layers.json"));
        assert_eq!(
            config.output.join(&config.output.index),
            PathBuf::from("out/owners.png")
        );
    }
}
