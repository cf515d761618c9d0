//! Project metadata extraction from pyproject.toml

use crate::error::{BuildError, CliError, Result};
use std::path::Path;

/// Project descriptor extracted from `pyproject.toml`.
///
/// Read once at the start of a run and re-read after a version bump, since
/// the bump tool mutates the manifest underneath the process.
#[derive(Debug, Clone)]
pub struct ProjectInfo {
    /// Distribution name from `[project]` (may contain hyphens)
    pub name: String,

    /// Version string from `[project]` (e.g., "1.2.3")
    pub version: String,

    /// Declared dependency specifiers, in manifest order
    pub dependencies: Vec<String>,
}

impl ProjectInfo {
    /// Importable module name: the distribution name with hyphens replaced
    /// by underscores, as used in wheel filenames and the `src/` layout.
    pub fn module_name(&self) -> String {
        self.name.replace('-', "_")
    }

    /// Expected wheel filename for this project under the platform-neutral
    /// `py3-none-any` tag.
    pub fn wheel_file_name(&self) -> String {
        format!("{}-{}-py3-none-any.whl", self.module_name(), self.version)
    }

    /// Fixed version-independent filename the wheel is published under.
    pub fn latest_file_name(&self) -> String {
        format!("{}-latest.whl", self.module_name())
    }
}

/// Load the project descriptor from pyproject.toml (single read + parse)
///
/// Reads and parses the manifest exactly once, then extracts name, version,
/// and the dependency list from the parsed TOML value.
pub fn load_project(manifest_path: &Path) -> Result<ProjectInfo> {
    // Step 1: Read file once
    let manifest = std::fs::read_to_string(manifest_path).map_err(|e| {
        BuildError::Cli(CliError::ExecutionFailed {
            command: "read_pyproject".to_string(),
            reason: format!("Failed to read {}: {}", manifest_path.display(), e),
        })
    })?;

    // Step 2: Parse TOML once
    let toml_value: toml::Value = toml::from_str(&manifest)?;

    let project = toml_value.get("project").ok_or_else(|| {
        BuildError::Cli(CliError::InvalidArguments {
            reason: "No [project] section in pyproject.toml".to_string(),
        })
    })?;

    // Step 3: Extract fields from parsed TOML (no additional I/O)
    let name = project
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| {
            BuildError::Cli(CliError::InvalidArguments {
                reason: "Missing 'name' in [project]".to_string(),
            })
        })?
        .to_string();

    let version = project
        .get("version")
        .and_then(|v| v.as_str())
        .ok_or_else(|| {
            BuildError::Cli(CliError::InvalidArguments {
                reason: "Missing 'version' in [project]".to_string(),
            })
        })?
        .to_string();

    let dependencies = project
        .get("dependencies")
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default();

    Ok(ProjectInfo {
        name,
        version,
        dependencies,
    })
}
