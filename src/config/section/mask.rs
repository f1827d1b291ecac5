//! `[mask]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [mask]
//! sentinel = "#00ff00ff"   # Written where the origin pixel is transparent
//! ```

use serde::{Deserialize, Serialize};

/// Mask composition settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskConfig {
    /// Color for claimed pixels whose origin pixel is fully transparent.
    /// `#rrggbb` (opaque) or `#rrggbbaa`.
    pub sentinel: String,
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            sentinel: "#00ff00ff".to_string(),
        }
    }
}
