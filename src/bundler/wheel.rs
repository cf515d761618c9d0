//! Wheel build, staging, verification, and publishing.

use std::path::Path;

use filetime::FileTime;
use path_absolutize::Absolutize;

use crate::cli::RuntimeConfig;
use crate::metadata::ProjectInfo;

use super::error::{Error, ErrorExt, Result};
use super::exec::{CommandRunner, CommandSpec};
use super::settings::Settings;

/// Invokes the build backend in wheel-only mode from the project root.
///
/// A non-zero exit is fatal; there is no partial-success state.
pub async fn build_wheel<R: CommandRunner>(
    runner: &R,
    settings: &Settings,
    config: &RuntimeConfig,
) -> Result<()> {
    config.progress("Building wheel...")?;

    let spec = CommandSpec::new(settings.python(), settings.project_dir())
        .args(["-m", "build", "--wheel"]);
    let output = runner.run_streamed(&spec).await?;
    if !output.success() {
        return Err(Error::CommandFailed {
            command: spec.display(),
            status: output.status,
        });
    }

    config.success("Wheel build succeeded")?;
    Ok(())
}

/// Copies the built wheel from the project's `dist/` into the output
/// directory when the two differ.
///
/// Paths are absolutized before comparison so relative spellings of the same
/// directory are not copied onto themselves. A missing built wheel is fatal.
pub async fn stage_wheel(
    settings: &Settings,
    info: &ProjectInfo,
    config: &RuntimeConfig,
) -> Result<()> {
    let wheel_file = info.wheel_file_name();
    let source = settings.dist_dir().join(&wheel_file);

    if !source.exists() {
        return Err(Error::MissingWheel { path: source });
    }

    let dist = settings.dist_dir();
    let dist = dist.absolutize().fs_context("resolving", &dist)?;
    let output = settings.output_dir();
    let output = output.absolutize().fs_context("resolving", output)?;

    if dist == output {
        config.indent(&format!("Wheel already in target directory: {}", wheel_file))?;
        return Ok(());
    }

    let target = settings.output_dir().join(&wheel_file);
    tokio::fs::copy(&source, &target)
        .await
        .fs_context("copying wheel to", &target)?;
    config.indent(&format!("Copied wheel to: {}", target.display()))?;
    Ok(())
}

/// Checks that the expected wheel exists in the output directory and
/// reports its size.
///
/// A missing wheel is a failure signal, not a panic.
pub async fn verify_build(
    output_dir: &Path,
    info: &ProjectInfo,
    config: &RuntimeConfig,
) -> Result<()> {
    config.progress("Verifying build output...")?;

    let expected = output_dir.join(info.wheel_file_name());
    if !expected.exists() {
        return Err(Error::MissingWheel { path: expected });
    }

    let metadata = tokio::fs::metadata(&expected)
        .await
        .fs_context("reading artifact metadata", &expected)?;
    config.success(&format!("Wheel file exists: {}", expected.display()))?;
    config.indent(&format!(
        "File size: {:.1} KB",
        metadata.len() as f64 / 1024.0
    ))?;

    Ok(())
}

/// Copies the versioned wheel to its fixed "latest" filename so downstream
/// consumers can reference a version-independent path.
///
/// Preserves permissions and mtime. A missing source wheel and an OS-level
/// copy failure are reported as distinct errors.
pub async fn publish_latest(
    output_dir: &Path,
    info: &ProjectInfo,
    config: &RuntimeConfig,
) -> Result<()> {
    config.progress("Publishing version-independent wheel copy...")?;

    let source = output_dir.join(info.wheel_file_name());
    let target = output_dir.join(info.latest_file_name());

    if !source.exists() {
        return Err(Error::MissingWheel { path: source });
    }

    tokio::fs::copy(&source, &target)
        .await
        .map_err(|e| Error::PublishCopy {
            from: source.clone(),
            to: target.clone(),
            source: e,
        })?;

    // fs::copy carries permissions; the mtime needs explicit preservation.
    let copy_err = |e| Error::PublishCopy {
        from: source.clone(),
        to: target.clone(),
        source: e,
    };
    let metadata = std::fs::metadata(&source).map_err(copy_err)?;
    filetime::set_file_mtime(&target, FileTime::from_last_modification_time(&metadata))
        .map_err(copy_err)?;

    config.success(&format!("Published as: {}", info.latest_file_name()))?;
    config.indent(&format!("Source file: {}", info.wheel_file_name()))?;
    Ok(())
}
