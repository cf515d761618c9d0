//! Version reading, consistency checking, and bumping.
//!
//! The version string lives in three places: `pyproject.toml`, the package's
//! `__init__.py`, and (optionally) `.bumpversion.cfg`. The checker requires
//! every source actually present to agree; the bumper delegates the rewrite
//! to `bump-my-version` and re-reads the result, since the manifest mutates
//! underneath the process.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use semver::Version;

use crate::cli::RuntimeConfig;

use super::error::{Error, ErrorExt, Result};
use super::exec::{CommandRunner, CommandSpec};
use super::settings::Settings;

static MANIFEST_VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"version = "([^"]+)""#).expect("static pattern"));

static INIT_VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"__version__ = "([^"]+)""#).expect("static pattern"));

static BUMP_CFG_VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"current_version = ([^\n]+)").expect("static pattern"));

/// Which component of the semantic version to increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum BumpKind {
    /// Increment the patch component
    Patch,
    /// Increment the minor component
    Minor,
    /// Increment the major component
    Major,
}

impl BumpKind {
    /// Spelling the bump tool expects on its command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Patch => "patch",
            Self::Minor => "minor",
            Self::Major => "major",
        }
    }
}

impl fmt::Display for BumpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Versions collected from every source that declares one.
#[derive(Debug, Clone)]
pub struct VersionReport {
    sources: Vec<(String, String)>,
}

impl VersionReport {
    /// (source label, version) pairs in collection order.
    #[allow(dead_code)] // Public API - preserved for external consumers
    pub fn sources(&self) -> &[(String, String)] {
        &self.sources
    }

    /// True when every collected source carries the same version string.
    pub fn is_consistent(&self) -> bool {
        let mut distinct: Vec<&str> = self.sources.iter().map(|(_, v)| v.as_str()).collect();
        distinct.sort_unstable();
        distinct.dedup();
        distinct.len() == 1
    }

    /// The agreed version, when consistent.
    pub fn canonical(&self) -> Option<&str> {
        if self.is_consistent() {
            self.sources.first().map(|(_, v)| v.as_str())
        } else {
            None
        }
    }

    /// Builds the mismatch error carrying the full source table.
    pub fn mismatch_error(&self) -> Error {
        Error::VersionMismatch {
            versions: self.sources.clone(),
        }
    }
}

/// Old and new versions observed around a bump.
#[derive(Debug, Clone)]
pub struct BumpOutcome {
    /// Version before the bump tool ran
    pub old: Version,
    /// Version after the bump tool ran
    pub new: Version,
}

/// Extracts the version string from the manifest text.
///
/// Matches the first `version = "<value>"` line; the manifest is re-read on
/// every call because the bump stage rewrites it on disk.
pub async fn read_manifest_version(manifest_path: &Path) -> Result<String> {
    if !manifest_path.exists() {
        return Err(Error::MissingFile {
            path: manifest_path.to_path_buf(),
        });
    }

    let content = tokio::fs::read_to_string(manifest_path)
        .await
        .fs_context("reading", manifest_path)?;

    match MANIFEST_VERSION_RE.captures(&content) {
        Some(caps) => Ok(caps[1].to_string()),
        None => Err(Error::VersionNotFound {
            path: manifest_path.to_path_buf(),
        }),
    }
}

/// Extracts the `__version__` marker from the package init file.
async fn read_init_version(init_path: &Path) -> Result<String> {
    if !init_path.exists() {
        return Err(Error::MissingFile {
            path: init_path.to_path_buf(),
        });
    }

    let content = tokio::fs::read_to_string(init_path)
        .await
        .fs_context("reading", init_path)?;

    match INIT_VERSION_RE.captures(&content) {
        Some(caps) => Ok(caps[1].to_string()),
        None => Err(Error::VersionNotFound {
            path: init_path.to_path_buf(),
        }),
    }
}

/// Extracts `current_version` from the bump tool config, `None` when the
/// file does not exist (the config is optional).
async fn read_bump_config_version(cfg_path: &Path) -> Result<Option<String>> {
    if !cfg_path.exists() {
        return Ok(None);
    }

    let content = tokio::fs::read_to_string(cfg_path)
        .await
        .fs_context("reading", cfg_path)?;

    match BUMP_CFG_VERSION_RE.captures(&content) {
        Some(caps) => Ok(Some(caps[1].trim().to_string())),
        None => Err(Error::VersionNotFound {
            path: cfg_path.to_path_buf(),
        }),
    }
}

/// Path of the package init file carrying the `__version__` marker.
fn init_marker_path(project_dir: &Path, module_name: &str) -> PathBuf {
    project_dir
        .join("src")
        .join(module_name)
        .join("__init__.py")
}

/// Collects the version string from every declaring file and prints the
/// source table.
///
/// The init marker is required; the bump tool config is optional. This is a
/// pure read, nothing on disk is mutated. The caller decides whether an
/// inconsistent report is fatal.
pub async fn check_consistency(
    settings: &Settings,
    module_name: &str,
    config: &RuntimeConfig,
) -> Result<VersionReport> {
    config.progress("Checking version consistency...")?;

    let manifest_version = read_manifest_version(&settings.manifest_path()).await?;

    let init_path = init_marker_path(settings.project_dir(), module_name);
    let init_version = read_init_version(&init_path).await?;

    let cfg_path = settings.project_dir().join(".bumpversion.cfg");
    let cfg_version = read_bump_config_version(&cfg_path).await?;

    let mut sources = vec![
        ("pyproject.toml".to_string(), manifest_version),
        ("__init__.py".to_string(), init_version),
    ];
    if let Some(version) = cfg_version {
        sources.push((".bumpversion.cfg".to_string(), version));
    }

    config.indent("Versions found:")?;
    for (source, version) in &sources {
        config.indent(&format!("  {}: {}", source, version))?;
    }

    let report = VersionReport { sources };
    if let Some(version) = report.canonical() {
        config.success(&format!("Version consistency check passed: {}", version))?;
    }

    Ok(report)
}

/// Increments the version in-place via `bump-my-version` and reports the
/// old and new values.
///
/// The tool is probed with a no-op help invocation first; a failed probe
/// aborts with an install hint. Re-running bumps further, so this is not
/// safe to re-invoke expecting the same result.
pub async fn bump_version<R: CommandRunner>(
    runner: &R,
    settings: &Settings,
    kind: BumpKind,
    config: &RuntimeConfig,
) -> Result<BumpOutcome> {
    config.progress(&format!("Bumping {} version...", kind))?;

    let probe = CommandSpec::new("uv", settings.project_dir())
        .args(["run", "bump-my-version", "--help"]);
    match runner.run_captured(&probe).await {
        Ok(output) if output.success() => {
            log::debug!(
                "bump-my-version probe: {}",
                output.stdout.lines().next().unwrap_or("").trim()
            );
        }
        Ok(output) => {
            let detail = if output.stderr.trim().is_empty() {
                format!("probe exited with code {:?}", output.status)
            } else {
                format!("probe failed: {}", output.stderr.trim())
            };
            return Err(Error::ToolUnavailable {
                tool: "bump-my-version".to_string(),
                reason: format!("{}; install with: uv add --dev bump-my-version", detail),
            });
        }
        Err(e) => {
            return Err(Error::ToolUnavailable {
                tool: "bump-my-version".to_string(),
                reason: e.to_string(),
            });
        }
    }

    let old = read_manifest_version(&settings.manifest_path()).await?;
    config.indent(&format!("Current version: {}", old))?;

    let bump = CommandSpec::new("uv", settings.project_dir())
        .args(["run", "bump-my-version", "bump", kind.as_str()]);
    let output = runner.run_streamed(&bump).await?;
    if !output.success() {
        return Err(Error::CommandFailed {
            command: bump.display(),
            status: output.status,
        });
    }

    let new = read_manifest_version(&settings.manifest_path()).await?;
    let outcome = BumpOutcome {
        old: Version::parse(&old)?,
        new: Version::parse(&new)?,
    };

    config.success(&format!(
        "Version updated: {} -> {}",
        outcome.old, outcome.new
    ))?;
    Ok(outcome)
}
