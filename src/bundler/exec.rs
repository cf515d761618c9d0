//! External command execution.
//!
//! All subprocess invocations go through the [`CommandRunner`] trait so the
//! pipeline stages can be driven by a scripted fake in tests instead of real
//! subprocesses. The seam is deliberately narrow: an argument vector plus a
//! working directory in, an exit status plus captured output back.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;

use super::error::{Error, Result};

/// A fully-specified external command invocation.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
    cwd: PathBuf,
}

impl CommandSpec {
    /// Creates a command spec for `program` executed in `cwd`.
    pub fn new(program: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.into(),
        }
    }

    /// Appends a single argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends a sequence of arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Program name or path.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Argument vector, program excluded.
    pub fn argv(&self) -> &[String] {
        &self.args
    }

    /// Working directory the command runs in.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Renders the command line for log and error messages.
    pub fn display(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// Outcome of an external command.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    /// Exit code, `None` if the process was terminated by a signal
    pub status: Option<i32>,
    /// Captured stdout (empty for streamed invocations)
    pub stdout: String,
    /// Captured stderr (empty for streamed invocations)
    pub stderr: String,
}

impl CommandOutput {
    /// True when the command exited with code zero.
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Execution seam for external tools.
///
/// Stages accept any runner generically, which keeps them testable without
/// spawning real subprocesses.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Runs the command with stdout/stderr captured.
    ///
    /// Used for probe invocations whose output feeds error messages.
    async fn run_captured(&self, spec: &CommandSpec) -> Result<CommandOutput>;

    /// Runs the command with stdout/stderr inherited from this process.
    ///
    /// Used for long-running tools whose progress the user should see live.
    async fn run_streamed(&self, spec: &CommandSpec) -> Result<CommandOutput>;
}

/// [`CommandRunner`] backed by real subprocesses.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    async fn run_captured(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        log::debug!("running (captured): {}", spec.display());

        let output = Command::new(spec.program())
            .args(spec.argv())
            .current_dir(spec.cwd())
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| spawn_error(spec, &e))?;

        Ok(CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    async fn run_streamed(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        log::debug!("running: {}", spec.display());

        let status = Command::new(spec.program())
            .args(spec.argv())
            .current_dir(spec.cwd())
            .stdin(Stdio::null())
            .status()
            .await
            .map_err(|e| spawn_error(spec, &e))?;

        Ok(CommandOutput {
            status: status.code(),
            ..Default::default()
        })
    }
}

fn spawn_error(spec: &CommandSpec, e: &std::io::Error) -> Error {
    // A missing program gets a clearer message than the raw spawn failure.
    if which::which(spec.program()).is_err() {
        return Error::Generic(format!(
            "`{}` not found in PATH (needed for: {})",
            spec.program(),
            spec.display()
        ));
    }
    Error::Generic(format!("failed to spawn `{}`: {}", spec.display(), e))
}
