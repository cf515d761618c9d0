//! Command line argument parsing and validation.
//!
//! This module provides CLI argument parsing using clap, with an extra
//! validation pass for constraints clap cannot express.

use clap::Parser;
use std::path::PathBuf;

use crate::bundler::{
    BumpKind, DEFAULT_OUTPUT_DIR, DEFAULT_PYTHON, Settings, SettingsBuilder,
};

/// Offline-capable wheel packager for Python projects
#[derive(Parser, Debug)]
#[command(
    name = "wheelsmith",
    version,
    about = "Builds offline-installable wheel bundles for Python projects",
    long_about = "Builds a distributable wheel from a Python project, optionally bundles its
dependency archives for offline installation, and generates a companion
shell installer.

Usage:
  wheelsmith                             # bump the patch version and build
  wheelsmith --bump-version minor        # bump the minor version and build
  wheelsmith --no-bump                   # build without touching the version
  wheelsmith --include-deps              # bundle dependency archives
  wheelsmith --include-deps --use-source # cross-platform dependency archives

Exit code 0 = all artifacts exist in the output directory."
)]
pub struct Args {
    /// Version increment to apply before building (default: patch)
    #[arg(long, value_enum, value_name = "KIND", conflicts_with = "no_bump")]
    pub bump_version: Option<BumpKind>,

    /// Skip the version increment; the consistency check still runs as a
    /// warning-only gate
    #[arg(long)]
    pub no_bump: bool,

    /// Download dependency archives into the output directory
    #[arg(long)]
    pub include_deps: bool,

    /// Download source archives instead of preferring prebuilt binaries
    #[arg(long)]
    pub use_source: bool,

    /// Destination directory for all produced artifacts
    #[arg(long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Project root containing pyproject.toml
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub project_dir: PathBuf,

    /// Python interpreter used for build and pip invocations
    #[arg(long, value_name = "EXE", default_value = DEFAULT_PYTHON)]
    pub python: String,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.python.trim().is_empty() {
            return Err("Python interpreter name cannot be empty".to_string());
        }

        if self.project_dir.as_os_str().is_empty() {
            return Err("Project directory cannot be empty".to_string());
        }

        Ok(())
    }

    /// Version increment the run should apply, `None` when skipped.
    ///
    /// Defaults to a patch bump when neither `--bump-version` nor
    /// `--no-bump` is given.
    pub fn bump(&self) -> Option<BumpKind> {
        if self.no_bump {
            None
        } else {
            Some(self.bump_version.unwrap_or(BumpKind::Patch))
        }
    }

    /// Builds pipeline settings from the parsed arguments.
    pub fn to_settings(&self) -> crate::bundler::Result<Settings> {
        SettingsBuilder::new()
            .project_dir(&self.project_dir)
            .output_dir(&self.output_dir)
            .python(self.python.clone())
            .include_deps(self.include_deps)
            .use_source(self.use_source)
            .bump(self.bump())
            .build()
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone, Copy)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: super::OutputManager,
}

impl From<&Args> for RuntimeConfig {
    fn from(_args: &Args) -> Self {
        Self::new(
            true,  // Always verbose
            false, // Never quiet
        )
    }
}

impl RuntimeConfig {
    /// Creates a runtime configuration with explicit output flags.
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            output: super::OutputManager::new(verbose, quiet),
        }
    }

    /// Get a reference to the output manager
    #[allow(dead_code)] // Public API - preserved for external consumers
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    /// Print verbose message if in verbose mode
    #[allow(dead_code)] // Public API - preserved for external consumers
    pub fn verbose(&self, message: &str) -> std::io::Result<()> {
        self.output.verbose(message)
    }

    /// Print progress message
    pub fn progress(&self, message: &str) -> std::io::Result<()> {
        self.output.progress(message)
    }

    /// Print success message if not in quiet mode
    pub fn success(&self, message: &str) -> std::io::Result<()> {
        self.output.success(message)
    }

    /// Print warning message if not in quiet mode
    pub fn warn(&self, message: &str) -> std::io::Result<()> {
        self.output.warn(message)
    }

    /// Print section header
    pub fn section(&self, title: &str) -> std::io::Result<()> {
        self.output.section(title)
    }

    /// Print indented text
    pub fn indent(&self, message: &str) -> std::io::Result<()> {
        self.output.indent(message)
    }
}
