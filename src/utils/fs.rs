//! File helpers with path-aware error context.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Write `content` to `path`, creating parent directories.
pub fn write_output(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

/// Read a UTF-8 input file.
pub fn read_input(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_output_creates_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a/b/out.txt");
        write_output(&path, b"hello").unwrap();
        assert_eq!(read_input(&path).unwrap(), "hello");
    }

    #[test]
    fn test_read_missing_input() {
        let dir = TempDir::new().unwrap();
        let err = read_input(&dir.path().join("missing.svg")).unwrap_err();
        assert!(err.to_string().contains("missing.svg"));
    }
}
