//! Packaging pipeline for building offline-installable wheel bundles.
//!
//! Stages live in their own modules and are sequenced by the
//! [`Pipeline`] orchestrator. Every external tool invocation is routed
//! through the [`CommandRunner`] seam in [`exec`].

pub mod clean;
pub mod deps;
pub mod error;
pub mod exec;
pub mod installer;
pub mod orchestrator;
pub mod settings;
pub mod version;
pub mod wheel;

// Re-export commonly used types
pub use error::{Error, ErrorExt, Result};
pub use exec::{CommandOutput, CommandRunner, CommandSpec, SystemRunner};
pub use orchestrator::Pipeline;
pub use settings::{DEFAULT_OUTPUT_DIR, DEFAULT_PYTHON, Settings, SettingsBuilder};
pub use version::{BumpKind, BumpOutcome, VersionReport};
