//! Configuration management for `svgmask.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/   # [sample], [mask], [output]
//! ├── error      # ConfigError
//! ├── util       # config discovery, color parsing
//! └── mod.rs     # SvgmaskConfig (this file)
//! ```
//!
//! The config file is optional. When none is found the defaults reproduce the
//! classic run: 500 curve steps, 10 offsets over a distance of 10, an opaque
//! green sentinel, and outputs in the current directory. CLI flags override
//! file values.

mod error;
pub mod section;
mod util;

pub use error::ConfigError;
pub use section::{MaskConfig, OutputConfig, SampleConfig};
pub use util::parse_hex_color;

use util::find_config_file;

use crate::{
    cli::{Cli, Commands},
    debug, log,
    raster::RasterOptions,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::Path,
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing svgmask.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SvgmaskConfig {
    /// Sampling resolution
    pub sample: SampleConfig,

    /// Mask composition
    pub mask: MaskConfig,

    /// Output locations
    pub output: OutputConfig,
}

impl Default for SvgmaskConfig {
    fn default() -> Self {
        Self {
            sample: SampleConfig::default(),
            mask: MaskConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl SvgmaskConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd for the config file; falls back to defaults
    /// when there is none. Relative output paths in the file are resolved
    /// against the file's directory. `[sample]` and `[mask]` are only
    /// validated for `rasterize`, the one command that reads them.
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut config = match find_config_file(&cli.config) {
            Some(path) => {
                debug!("config"; "using {}", path.display());
                let mut config = Self::from_path(&path)?;
                if let Some(root) = path.parent() {
                    config.normalize_paths(root);
                }
                config
            }
            None => {
                debug!("config"; "no {} found, using defaults", cli.config.display());
                Self::default()
            }
        };

        config.apply_command_options(cli);
        if matches!(cli.command, Commands::Rasterize { .. }) {
            config.validate()?;
        }
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring: {}", display_path, fields.join(", "));
    }

    /// Resolve relative output directory against the config file's directory.
    fn normalize_paths(&mut self, root: &Path) {
        if self.output.dir.is_relative() {
            self.output.dir = root.join(&self.output.dir);
        }
    }

    /// Apply CLI overrides for the active command.
    fn apply_command_options(&mut self, cli: &Cli) {
        match &cli.command {
            Commands::Extract { args } => {
                if let Some(dir) = &args.output {
                    self.output.dir = dir.clone();
                }
            }
            Commands::Rasterize { args } => {
                if let Some(dir) = &args.output {
                    self.output.dir = dir.clone();
                }
                if let Some(count) = args.samples {
                    self.sample.count = count;
                }
                if let Some(offsets) = args.offsets {
                    self.sample.offsets = offsets;
                }
                if let Some(distance) = args.max_distance {
                    self.sample.max_distance = distance;
                }
                if let Some(sentinel) = &args.sentinel {
                    self.mask.sentinel = sentinel.clone();
                }
            }
            Commands::Layers { args } => {
                if let Some(dir) = &args.output {
                    self.output.dir = dir.clone();
                }
            }
            Commands::DecodeIds { .. } => {}
        }
    }

    /// Check every value the commands rely on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.raster_options().map(|_| ())
    }

    /// Rasterization options built from `[sample]` and `[mask]`.
    pub fn raster_options(&self) -> Result<RasterOptions, ConfigError> {
        let sentinel = parse_hex_color(&self.mask.sentinel).ok_or_else(|| {
            ConfigError::Validation(format!(
                "[mask] sentinel `{}` is not a #rrggbb or #rrggbbaa color",
                self.mask.sentinel
            ))
        })?;
        let options = RasterOptions {
            sample_count: self.sample.count,
            offset_count: self.sample.offsets,
            max_distance: self.sample.max_distance,
            sentinel,
        };
        options
            .validate()
            .map_err(|e| ConfigError::Validation(format!("[sample] {e}")))?;
        Ok(options)
    }
}

/// Parse a config snippet and fail the test on unknown fields.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> SvgmaskConfig {
    let (parsed, ignored) = SvgmaskConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use image::Rgba;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_classic_run() {
        let options = SvgmaskConfig::default().raster_options().unwrap();
        assert_eq!(options, RasterOptions::default());
    }

    #[test]
    fn test_unknown_fields_collected() {
        let (_, ignored) =
            SvgmaskConfig::parse_with_ignored("[sample]\ncount = 3\nsamples = 4").unwrap();
        assert_eq!(ignored, vec!["sample.samples".to_string()]);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            SvgmaskConfig::parse_with_ignored("[sample\ncount = 1"),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_sampling_errors_only_block_rasterize() {
        let dir = TempDir::new().unwrap();
        let config_file = dir.path().join("svgmask.toml");
        fs::write(&config_file, "[sample]\noffsets = 3\n\n[mask]\nsentinel = \"green\"").unwrap();
        let config_arg = config_file.to_str().unwrap();

        let extract =
            Cli::try_parse_from(["svgmask", "-C", config_arg, "extract", "--svg", "map.svg"])
                .unwrap();
        let config = SvgmaskConfig::load(&extract).unwrap();
        assert_eq!(config.sample.offsets, 3);
        assert_eq!(config.output.dir, dir.path().join("."));

        let decode = Cli::try_parse_from([
            "svgmask", "-C", config_arg, "decode-ids", "in.svg", "-o", "o.svg",
        ])
        .unwrap();
        assert!(SvgmaskConfig::load(&decode).is_ok());

        let rasterize = Cli::try_parse_from([
            "svgmask", "-C", config_arg, "rasterize", "-l", "link.json", "-i", "mask.png",
        ])
        .unwrap();
        let err = SvgmaskConfig::load(&rasterize).unwrap_err();
        assert!(format!("{err:#}").contains("sentinel"));
    }

    #[test]
    fn test_validation_errors() {
        let mut config = test_parse_config("[sample]\noffsets = 3");
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        config.sample.offsets = 4;
        config.mask.sentinel = "green".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("sentinel"));
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::try_parse_from([
            "svgmask",
            "rasterize",
            "-l",
            "link.json",
            "-i",
            "mask.png",
            "-o",
            "out",
            "-n",
            "50",
            "-k",
            "4",
            "-d",
            "2.5",
            "--sentinel",
            "#ff0000",
        ])
        .unwrap();
        let mut config = SvgmaskConfig::default();
        config.apply_command_options(&cli);

        assert_eq!(config.output.dir, PathBuf::from("out"));
        let options = config.raster_options().unwrap();
        assert_eq!(options.sample_count, 50);
        assert_eq!(options.offset_count, 4);
        assert_eq!(options.max_distance, 2.5);
        assert_eq!(options.sentinel, Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_normalize_relative_output_dir() {
        let mut config = test_parse_config("[output]\ndir = \"out\"");
        config.normalize_paths(Path::new("/maps"));
        assert_eq!(config.output.dir, PathBuf::from("/maps/out"));

        let mut config = test_parse_config("[output]\ndir = \"/abs\"");
        config.normalize_paths(Path::new("/maps"));
        assert_eq!(config.output.dir, PathBuf::from("/abs"));
    }
}
