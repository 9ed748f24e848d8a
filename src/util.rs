use std::path::Path;

use anyhow::{Context, Result};

/// Write `content` to `path` via a temporary sibling file and a rename, so a
/// crash mid-write never leaves a truncated file behind.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let tmp_path = path.with_extension("json.tmp");

    std::fs::write(&tmp_path, content)
        .with_context(|| format!("failed to write tmp file {}", tmp_path.display()))?;

    std::fs::rename(&tmp_path, path)
        .with_context(|| format!("failed to rename tmp file to {}", path.display()))?;

    Ok(())
}
