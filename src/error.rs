//! Top-level error types for packaging operations.
//!
//! Stage-specific failures live in [`crate::bundler::error`]; this module
//! aggregates them with CLI, IO, and manifest errors for the orchestrator.

use thiserror::Error;

/// Result type alias for packaging operations
pub type Result<T> = std::result::Result<T, BuildError>;

/// Main error type for all packaging operations
#[derive(Error, Debug)]
pub enum BuildError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Stage errors from the packaging pipeline
    #[error("{0}")]
    Stage(#[from] crate::bundler::Error),

    /// Generic errors from anyhow
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Command execution failed
    #[error("Command execution failed: {command} - {reason}")]
    ExecutionFailed {
        /// Command that failed
        command: String,
        /// Reason for the error
        reason: String,
    },
}
