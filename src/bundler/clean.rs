//! Build-artifact cleanup.

use std::io;
use std::path::Path;

use crate::bail;
use crate::cli::RuntimeConfig;

use super::error::{Error, Result};

/// Removes the directory and its contents if it exists.
async fn remove_dir_all(path: &Path) -> Result<()> {
    match tokio::fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()), // Idempotent
        Err(e) => Err(e.into()),
    }
}

/// Removes prior build artifacts from the project root.
///
/// Clears `build/`, `dist/`, and any `*.egg-info` metadata directories.
/// No-op when none exist; prior contents of these directories do not
/// survive a run.
pub async fn clean_build_dirs(project_dir: &Path, config: &RuntimeConfig) -> Result<()> {
    config.progress("Cleaning previous build artifacts...")?;

    for name in ["build", "dist"] {
        let path = project_dir.join(name);
        if path.exists() {
            remove_dir_all(&path).await?;
            config.indent(&format!("Removed: {}", path.display()))?;
        }
    }

    let pattern = project_dir.join("*.egg-info");
    let Some(pattern) = pattern.to_str() else {
        bail!("project path {} is not valid UTF-8", project_dir.display());
    };
    for entry in
        glob::glob(pattern).map_err(|e| Error::Generic(format!("bad glob pattern: {}", e)))?
    {
        let path = entry.map_err(|e| Error::Generic(format!("glob failed: {}", e)))?;
        if path.is_dir() {
            remove_dir_all(&path).await?;
        } else {
            tokio::fs::remove_file(&path).await?;
        }
        config.indent(&format!("Removed: {}", path.display()))?;
    }

    Ok(())
}
