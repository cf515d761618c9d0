//! Command line interface for wheelsmith.
//!
//! This module provides argument parsing, colored progress output, and the
//! entry point that hands a configured pipeline to the orchestrator.

mod args;
mod output;

pub use args::{Args, RuntimeConfig};
pub use output::OutputManager;

use crate::bundler::Pipeline;
use crate::error::{CliError, Result};

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    if let Err(reason) = args.validate() {
        return Err(CliError::InvalidArguments { reason }.into());
    }

    let config = RuntimeConfig::from(&args);
    let settings = args.to_settings()?;

    config.section("Wheelsmith wheel packager")?;

    let pipeline = Pipeline::new(settings);
    pipeline.run(&config).await?;

    Ok(0)
}
