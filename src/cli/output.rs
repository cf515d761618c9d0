//! Colored terminal output for user-facing progress.

use std::io::{self, Write};

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Writes status lines with colored prefixes.
///
/// Every stage prints a line before and after acting, so a failed run
/// leaves a readable trail of which stage failed.
#[derive(Debug, Clone, Copy)]
pub struct OutputManager {
    verbose: bool,
    quiet: bool,
}

impl OutputManager {
    /// Creates an output manager.
    ///
    /// `verbose` enables extra detail lines; `quiet` suppresses all output.
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    fn prefixed(&self, prefix: &str, color: Color, message: &str) -> io::Result<()> {
        let mut stdout = StandardStream::stdout(ColorChoice::Auto);
        stdout.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
        write!(stdout, "{}", prefix)?;
        stdout.reset()?;
        writeln!(stdout, "{}", message)
    }

    /// Extra detail, shown only in verbose mode.
    pub fn verbose(&self, message: &str) -> io::Result<()> {
        if !self.verbose || self.quiet {
            return Ok(());
        }
        let mut stdout = StandardStream::stdout(ColorChoice::Auto);
        stdout.set_color(ColorSpec::new().set_dimmed(true))?;
        writeln!(stdout, "{}", message)?;
        stdout.reset()
    }

    /// Stage progress line.
    pub fn progress(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.prefixed("→ ", Color::Cyan, message)
    }

    /// Successful stage outcome.
    pub fn success(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.prefixed("✓ ", Color::Green, message)
    }

    /// Non-fatal problem the run continues past.
    pub fn warn(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.prefixed("⚠ ", Color::Yellow, message)
    }

    /// Bold section header with an underline.
    pub fn section(&self, title: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let mut stdout = StandardStream::stdout(ColorChoice::Auto);
        stdout.set_color(ColorSpec::new().set_bold(true))?;
        writeln!(stdout, "\n{}", title)?;
        stdout.reset()?;
        writeln!(stdout, "{}", "=".repeat(title.chars().count()))
    }

    /// Indented detail line under the current stage.
    pub fn indent(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let mut stdout = StandardStream::stdout(ColorChoice::Auto);
        writeln!(stdout, "   {}", message)
    }
}
