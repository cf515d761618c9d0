//! Pipeline orchestration.
//!
//! This module provides the [`Pipeline`] orchestrator that sequences the
//! packaging stages: version management, cleanup, wheel build, dependency
//! download, installer generation, verification, and publishing. Stages run
//! strictly one after another; any fatal stage failure short-circuits the
//! rest, and side effects already applied (a version bump, deleted build
//! directories) are not rolled back.

use crate::cli::RuntimeConfig;
use crate::error::Result;
use crate::metadata;

use super::error::Error;
use super::exec::{CommandRunner, SystemRunner};
use super::settings::Settings;
use super::{clean, deps, installer, version, wheel};

/// Main pipeline orchestrator.
///
/// Coordinates the packaging stages over a [`Settings`] value and a
/// [`CommandRunner`], which external-tool invocations are routed through.
///
/// # Examples
///
/// ```no_run
/// use wheelsmith::bundler::{Pipeline, SettingsBuilder};
/// use wheelsmith::cli::RuntimeConfig;
///
/// # async fn example() -> wheelsmith::Result<()> {
/// let settings = SettingsBuilder::new()
///     .project_dir("my-project")
///     .include_deps(true)
///     .build()?;
///
/// let pipeline = Pipeline::new(settings);
/// pipeline.run(&RuntimeConfig::new(true, false)).await?;
/// # Ok(())
/// # }
/// ```
pub struct Pipeline<R = SystemRunner> {
    settings: Settings,
    runner: R,
}

impl Pipeline<SystemRunner> {
    /// Creates a pipeline that invokes real subprocesses.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            runner: SystemRunner,
        }
    }
}

impl<R: CommandRunner> Pipeline<R> {
    /// Creates a pipeline over a custom command runner.
    ///
    /// Tests use this to drive the full workflow with scripted subprocess
    /// results.
    #[allow(dead_code)] // Public API - preserved for external consumers
    pub fn with_runner(settings: Settings, runner: R) -> Self {
        Self { settings, runner }
    }

    /// Returns a reference to the pipeline settings.
    #[allow(dead_code)] // Public API - preserved for external consumers
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns a reference to the command runner.
    #[allow(dead_code)] // Public API - preserved for external consumers
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Runs the whole workflow.
    ///
    /// In bump mode an inconsistent version set aborts before the bump tool
    /// is invoked; with the bump skipped the same condition downgrades to a
    /// warning and the build proceeds.
    pub async fn run(&self, config: &RuntimeConfig) -> Result<()> {
        let settings = &self.settings;

        let manifest = settings.manifest_path();
        if !manifest.exists() {
            return Err(Error::MissingFile { path: manifest }.into());
        }

        // The project is loaded up front for the init-marker path and
        // re-read below, since a bump rewrites the manifest on disk.
        let preliminary = metadata::load_project(&manifest)?;
        let module_name = preliminary.module_name();

        match settings.bump() {
            Some(kind) => {
                config.progress(&format!("Version management: bumping {} version", kind))?;
                let report = version::check_consistency(settings, &module_name, config).await?;
                if !report.is_consistent() {
                    return Err(report.mismatch_error().into());
                }
                version::bump_version(&self.runner, settings, kind, config).await?;
            }
            None => {
                config.progress("Skipping version bump")?;
                match version::check_consistency(settings, &module_name, config).await {
                    Ok(report) if report.is_consistent() => {}
                    Ok(_) => config.warn("Versions are inconsistent, continuing anyway")?,
                    Err(e) => config.warn(&format!(
                        "Version consistency check failed ({}), continuing anyway",
                        e
                    ))?,
                }
            }
        }

        let info = metadata::load_project(&manifest)?;
        config.indent(&format!("Project: {}", info.name))?;
        config.indent(&format!("Version: {}", info.version))?;

        clean::clean_build_dirs(settings.project_dir(), config).await?;

        wheel::build_wheel(&self.runner, settings, config).await?;

        tokio::fs::create_dir_all(settings.output_dir()).await?;
        wheel::stage_wheel(settings, &info, config).await?;

        deps::download_dependencies(&self.runner, settings, &info, config).await?;

        installer::generate_install_script(settings.output_dir(), &info, config).await?;

        wheel::verify_build(settings.output_dir(), &info, config).await?;

        wheel::publish_latest(settings.output_dir(), &info, config).await?;

        self.print_summary(config).await?;
        Ok(())
    }

    /// Prints the final artifact listing and the install hint.
    async fn print_summary(&self, config: &RuntimeConfig) -> Result<()> {
        use anyhow::Context;

        config.section("Build complete")?;
        config.indent(&format!(
            "Output directory: {}",
            self.settings.output_dir().display()
        ))?;

        let mut files = Vec::new();
        let mut entries = tokio::fs::read_dir(self.settings.output_dir())
            .await
            .with_context(|| {
                format!(
                    "listing output directory {}",
                    self.settings.output_dir().display()
                )
            })?;
        while let Some(entry) = entries.next_entry().await? {
            let metadata = entry.metadata().await?;
            if metadata.is_file() {
                files.push((
                    entry.file_name().to_string_lossy().into_owned(),
                    metadata.len(),
                ));
            }
        }
        files.sort();

        for (name, len) in files {
            config.indent(&format!("{} ({:.1} KB)", name, len as f64 / 1024.0))?;
        }

        config.indent(&format!(
            "To install: cd {} && ./install.sh",
            self.settings.output_dir().display()
        ))?;
        Ok(())
    }
}
