//! Common utilities shared across CLI commands.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::utils::write_output;

/// Serialize `value` as pretty JSON and write it to `path`.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .with_context(|| format!("Failed to serialize {}", path.display()))?;
    write_output(path, json.as_bytes())
}
