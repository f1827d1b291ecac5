//! `[sample]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [sample]
//! count = 500          # Parameter steps along each path
//! offsets = 10         # Normal-offset points per curve point (even)
//! max_distance = 10.0  # Offset steps are max_distance / offsets
//! ```

use serde::{Deserialize, Serialize};

/// Sampling resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleConfig {
    /// Parameter steps along each path; yields `count + 1` curve points.
    pub count: usize,

    /// Normal-offset points per curve point. Must be even.
    pub offsets: usize,

    /// Scale of the offset band around the curve.
    pub max_distance: f64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            count: 500,
            offsets: 10,
            max_distance: 10.0,
        }
    }
}
