//! Wheelsmith - offline-capable wheel packager for Python projects.
//!
//! This binary builds a distributable wheel from a Python project, optionally
//! bundles its dependency archives for offline installation, and emits a
//! companion shell installer.

mod bundler;
mod cli;
mod error;
mod metadata;

use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Run CLI and get exit code
    let exit_code = match cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    process::exit(exit_code);
}
