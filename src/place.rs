use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::util::ensure_directory;

/// Move a file into place. Used only for already-valid names; an existing
/// destination is a logged skip, never an overwrite.
pub fn move_file(src: &Path, dst: &Path) -> Result<()> {
    if dst.exists() {
        warn!(dst = %dst.display(), "destination exists, skipping move");
        return Ok(());
    }

    if let Some(parent) = dst.parent() {
        ensure_directory(parent)?;
    }

    fs::rename(src, dst)
        .with_context(|| format!("failed to move {} -> {}", src.display(), dst.display()))?;

    info!(src = %src.display(), dst = %dst.display(), "moved");
    Ok(())
}

/// Copy a file into place, creating missing destination directories. The
/// rewrite path never destroys its source; collisions are logged skips.
pub fn copy_file(src: &Path, dst: &Path) -> Result<()> {
    if dst.exists() {
        warn!(dst = %dst.display(), "destination exists, skipping copy");
        return Ok(());
    }

    if let Some(parent) = dst.parent() {
        ensure_directory(parent)?;
    }

    fs::copy(src, dst)
        .with_context(|| format!("failed to copy {} -> {}", src.display(), dst.display()))?;

    info!(src = %src.display(), dst = %dst.display(), "copied");
    Ok(())
}
