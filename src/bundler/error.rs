//! Error types for the packaging pipeline stages.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for pipeline stage operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by individual pipeline stages.
#[derive(Error, Debug)]
pub enum Error {
    /// Catch-all for one-off stage failures
    #[error("{0}")]
    Generic(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid semantic version text
    #[error("invalid version string: {0}")]
    Version(#[from] semver::Error),

    /// A file the stage requires does not exist
    #[error("required file missing: {}", path.display())]
    MissingFile {
        /// Path that was expected to exist
        path: PathBuf,
    },

    /// A version declaration could not be located in a file
    #[error("no version declaration found in {}", path.display())]
    VersionNotFound {
        /// File that was searched
        path: PathBuf,
    },

    /// Version strings disagree across the files that declare them
    #[error("inconsistent versions: {}", format_versions(versions))]
    VersionMismatch {
        /// (source label, version) pairs as found on disk
        versions: Vec<(String, String)>,
    },

    /// A required external tool could not be invoked
    #[error("{tool} is not available: {reason}")]
    ToolUnavailable {
        /// Tool that was probed
        tool: String,
        /// Probe failure detail, including an install hint
        reason: String,
    },

    /// An external command exited unsuccessfully
    #[error("command `{command}` failed{}", format_status(*status))]
    CommandFailed {
        /// Rendered command line
        command: String,
        /// Exit code, if the process terminated normally
        status: Option<i32>,
    },

    /// The built wheel is absent from where a stage expects it
    #[error("wheel file not found: {}", path.display())]
    MissingWheel {
        /// Expected wheel path
        path: PathBuf,
    },

    /// Copying the wheel to its fixed "latest" name failed at the OS level
    #[error("failed to copy {} to {}: {source}", from.display(), to.display())]
    PublishCopy {
        /// Source wheel path
        from: PathBuf,
        /// Destination path
        to: PathBuf,
        /// Underlying IO failure
        #[source]
        source: std::io::Error,
    },

    /// A value destined for the installer template contains characters
    /// that are not safe to splice into a shell script
    #[error("unsafe {field} for installer template: {value:?}")]
    UnsafeTemplateValue {
        /// Which template field was rejected
        field: &'static str,
        /// The offending value
        value: String,
    },
}

fn format_versions(versions: &[(String, String)]) -> String {
    versions
        .iter()
        .map(|(source, version)| format!("{}={}", source, version))
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_status(status: Option<i32>) -> String {
    match status {
        Some(code) => format!(" with exit code {}", code),
        None => " (terminated by signal)".to_string(),
    }
}

/// Returns early with a [`Error::Generic`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::bundler::error::Error::Generic(format!($($arg)*)))
    };
}

/// Extension trait for attaching path context to filesystem errors.
pub trait ErrorExt<T> {
    /// Wraps an IO failure with the action being attempted and the path involved.
    fn fs_context(self, action: &str, path: &Path) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, action: &str, path: &Path) -> Result<T> {
        self.map_err(|e| Error::Generic(format!("{} {}: {}", action, path.display(), e)))
    }
}
