//! Dependency archive download and deduplication.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use path_absolutize::Absolutize;

use crate::cli::RuntimeConfig;
use crate::metadata::ProjectInfo;

use super::error::{ErrorExt, Result};
use super::exec::{CommandRunner, CommandSpec};
use super::settings::Settings;

/// Normalized package key for duplicate detection: the first hyphen-delimited
/// segment of the filename, lowercased, underscores replaced with hyphens.
///
/// Version and platform suffixes are discarded, so `Foo_Bar-1.0-py3-none-any.whl`
/// and `foo-bar-2.0.tar.gz` collide on `foo-bar`.
pub fn normalized_package_key(file_name: &str) -> String {
    file_name
        .split('-')
        .next()
        .unwrap_or(file_name)
        .to_lowercase()
        .replace('_', "-")
}

/// Downloads archives for the project itself plus each declared dependency.
///
/// Individual download failures are warnings, not errors: a missing archive
/// can still be fetched from the package index at install time. The stage as
/// a whole succeeds as long as the loop completes.
pub async fn download_dependencies<R: CommandRunner>(
    runner: &R,
    settings: &Settings,
    info: &ProjectInfo,
    config: &RuntimeConfig,
) -> Result<()> {
    if !settings.include_deps() {
        config.progress("Skipping dependency download")?;
        return Ok(());
    }

    config.progress("Downloading dependency archives...")?;
    if settings.use_source() {
        config.indent("Source archive mode (cross-platform)")?;
    } else {
        config.indent("Binary archive mode (current platform)")?;
    }

    let deps_dir = settings.dependencies_dir();
    tokio::fs::create_dir_all(&deps_dir)
        .await
        .fs_context("creating", &deps_dir)?;

    // pip runs from the project root, so it gets an absolute destination.
    let deps_dest = deps_dir
        .absolutize()
        .fs_context("resolving", &deps_dir)?
        .display()
        .to_string();

    // The build backend and wheel support must be importable before pip
    // can process the project's own source tree.
    config.indent("Installing build prerequisites...")?;
    let prereq = CommandSpec::new(settings.python(), settings.project_dir())
        .args(["-m", "pip", "install", "build", "wheel"]);
    match runner.run_streamed(&prereq).await {
        Ok(output) if output.success() => {}
        _ => config.warn("Failed to install build prerequisites, continuing")?,
    }

    let mut targets = vec![".".to_string()];
    targets.extend(info.dependencies.iter().cloned());

    for package in &targets {
        config.indent(&format!("Downloading: {}", package))?;

        let mut spec = CommandSpec::new(settings.python(), settings.project_dir())
            .args(["-m", "pip", "download", "--dest", deps_dest.as_str()]);
        if settings.use_source() {
            spec = spec.args(["--no-binary", ":all:"]);
        } else {
            spec = spec.arg("--prefer-binary");
        }
        spec = spec.arg(package.as_str());

        match runner.run_streamed(&spec).await {
            Ok(output) if output.success() => {}
            _ => config.warn(&format!(
                "Failed to download {}; it will be fetched from the package index at install time",
                package
            ))?,
        }
    }

    dedup_archives(&deps_dir, config).await?;

    config.success("Dependency download complete")?;
    Ok(())
}

/// Deletes archives whose normalized package key was already seen.
///
/// The survivor is the first file encountered in directory-iteration order,
/// which is not guaranteed to be the newest version. Returns the deleted
/// paths.
pub async fn dedup_archives(deps_dir: &Path, config: &RuntimeConfig) -> Result<Vec<PathBuf>> {
    config.indent("Removing duplicate archives...")?;

    let mut seen = HashSet::new();
    let mut removed = Vec::new();

    let mut entries = tokio::fs::read_dir(deps_dir)
        .await
        .fs_context("reading", deps_dir)?;
    while let Some(entry) = entries
        .next_entry()
        .await
        .fs_context("reading", deps_dir)?
    {
        let file_type = entry
            .file_type()
            .await
            .fs_context("inspecting", &entry.path())?;
        if !file_type.is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy().into_owned();
        if !seen.insert(normalized_package_key(&file_name)) {
            tokio::fs::remove_file(entry.path())
                .await
                .fs_context("removing", &entry.path())?;
            config.indent(&format!("  Removed duplicate: {}", file_name))?;
            removed.push(entry.path());
        }
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn quiet() -> RuntimeConfig {
        RuntimeConfig::new(false, true)
    }

    #[test]
    fn keys_are_lowercased_and_underscore_folded() {
        assert_eq!(
            normalized_package_key("MarkupSafe-2.1.3-cp311-cp311-manylinux.whl"),
            "markupsafe"
        );
        assert_eq!(
            normalized_package_key("typing_extensions-4.8.0-py3-none-any.whl"),
            "typing-extensions"
        );
        assert_eq!(normalized_package_key("demo_pkg-1.0.0.tar.gz"), "demo-pkg");
    }

    fn archive_keys(dir: &Path) -> Vec<String> {
        let mut keys: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| normalized_package_key(&e.unwrap().file_name().to_string_lossy()))
            .collect();
        keys.sort();
        keys
    }

    #[tokio::test]
    async fn duplicates_collapse_to_one_archive_per_key() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "a-1.0-py3-none-any.whl",
            "a-0.9-py3-none-any.whl",
            "A_pkg-2.0-py3-none-any.whl",
            "b-2.0-py3-none-any.whl",
        ] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }

        dedup_archives(dir.path(), &quiet()).await.unwrap();

        let keys = archive_keys(dir.path());
        let mut unique = keys.clone();
        unique.dedup();
        assert_eq!(keys, unique, "no two files share a normalized key");
        assert!(keys.contains(&"a".to_string()));
        assert!(keys.contains(&"b".to_string()));
    }

    #[tokio::test]
    async fn dedup_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a-1.0-py3-none-any.whl", "a-0.9-py3-none-any.whl"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }

        let first = dedup_archives(dir.path(), &quiet()).await.unwrap();
        let after_first = archive_keys(dir.path());

        let second = dedup_archives(dir.path(), &quiet()).await.unwrap();
        let after_second = archive_keys(dir.path());

        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
        assert_eq!(after_first, after_second);
    }

    #[tokio::test]
    async fn subdirectories_are_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("a-1.0-nested")).unwrap();
        fs::write(dir.path().join("a-1.0-py3-none-any.whl"), b"x").unwrap();

        let removed = dedup_archives(dir.path(), &quiet()).await.unwrap();
        assert!(removed.is_empty());
        assert!(dir.path().join("a-1.0-nested").exists());
    }
}
