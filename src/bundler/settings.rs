//! Pipeline configuration.

use std::path::{Path, PathBuf};

use super::error::{Error, Result};
use super::version::BumpKind;

/// Conventional distribution directory name, also the default output directory.
pub const DEFAULT_OUTPUT_DIR: &str = "dist";

/// Default Python interpreter used for build and pip invocations.
pub const DEFAULT_PYTHON: &str = "python3";

/// Resolved configuration for one packaging run.
///
/// Every stage receives its paths from here; nothing in the pipeline relies
/// on the process working directory.
#[derive(Debug, Clone)]
pub struct Settings {
    project_dir: PathBuf,
    output_dir: PathBuf,
    python: String,
    include_deps: bool,
    use_source: bool,
    bump: Option<BumpKind>,
}

impl Settings {
    /// Project root holding `pyproject.toml`.
    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// Destination directory for all produced artifacts.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Python interpreter for build and pip invocations.
    pub fn python(&self) -> &str {
        &self.python
    }

    /// Whether dependency archives should be downloaded.
    pub fn include_deps(&self) -> bool {
        self.include_deps
    }

    /// Whether downloads prefer source archives over prebuilt binaries.
    pub fn use_source(&self) -> bool {
        self.use_source
    }

    /// Version increment to apply, `None` when the bump is skipped.
    pub fn bump(&self) -> Option<BumpKind> {
        self.bump
    }

    /// Path to the project manifest.
    pub fn manifest_path(&self) -> PathBuf {
        self.project_dir.join("pyproject.toml")
    }

    /// Directory the build backend writes wheels into.
    pub fn dist_dir(&self) -> PathBuf {
        self.project_dir.join(DEFAULT_OUTPUT_DIR)
    }

    /// Directory dependency archives are downloaded into.
    pub fn dependencies_dir(&self) -> PathBuf {
        self.output_dir.join("dependencies")
    }
}

/// Builder for constructing [`Settings`].
///
/// # Examples
///
/// ```
/// use wheelsmith::bundler::{SettingsBuilder, BumpKind};
///
/// # fn example() -> wheelsmith::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .project_dir("demo-project")
///     .output_dir("release")
///     .include_deps(true)
///     .bump(Some(BumpKind::Minor))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct SettingsBuilder {
    project_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    python: Option<String>,
    include_deps: bool,
    use_source: bool,
    bump: Option<BumpKind>,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the project root.
    ///
    /// Default: the current directory.
    pub fn project_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.project_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the artifact output directory.
    ///
    /// Default: [`DEFAULT_OUTPUT_DIR`].
    pub fn output_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.output_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the Python interpreter.
    ///
    /// Default: [`DEFAULT_PYTHON`].
    pub fn python(mut self, python: impl Into<String>) -> Self {
        self.python = Some(python.into());
        self
    }

    /// Enables dependency archive downloads.
    ///
    /// Default: disabled.
    pub fn include_deps(mut self, include: bool) -> Self {
        self.include_deps = include;
        self
    }

    /// Prefers source archives over prebuilt binaries when downloading.
    ///
    /// Default: disabled (binary preference).
    pub fn use_source(mut self, use_source: bool) -> Self {
        self.use_source = use_source;
        self
    }

    /// Sets the version increment, `None` to skip the bump.
    ///
    /// Default: `None`.
    pub fn bump(mut self, bump: Option<BumpKind>) -> Self {
        self.bump = bump;
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the interpreter name is blank.
    pub fn build(self) -> Result<Settings> {
        let python = self.python.unwrap_or_else(|| DEFAULT_PYTHON.to_string());
        if python.trim().is_empty() {
            return Err(Error::Generic(
                "python interpreter name must not be empty".to_string(),
            ));
        }

        Ok(Settings {
            project_dir: self.project_dir.unwrap_or_else(|| PathBuf::from(".")),
            output_dir: self
                .output_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            python,
            include_deps: self.include_deps,
            use_source: self.use_source,
            bump: self.bump,
        })
    }
}
