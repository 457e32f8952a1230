//! New command: scaffold a manifest from the built-in template.
use std::path::PathBuf;

use anyhow::{Context as _, Result};

use crate::cli::NewOpts;
use crate::logging::Logger;
use crate::manifest::generator;
use crate::prompt::{Prompter, TerminalPrompter};

/// Run the new command.
///
/// Missing `--name` and `--out` values are asked for interactively.
///
/// # Errors
///
/// Returns an error if a prompt fails, the output location is not a
/// directory, or the file cannot be written.
pub fn run(opts: &NewOpts, log: &Logger) -> Result<()> {
    let path = create(opts, &TerminalPrompter)?;
    log.info(&format!("✔ manifest successfully created in {}", path.display()));
    Ok(())
}

/// Resolve the name and output directory, then write the manifest.
///
/// # Errors
///
/// See [`run`].
pub fn create(opts: &NewOpts, prompter: &dyn Prompter) -> Result<PathBuf> {
    let name = match &opts.name {
        Some(name) => name.clone(),
        None => prompter.ask(
            "Please enter the name of the manifest",
            Some(super::DEFAULT_MANIFEST_NAME),
        )?,
    };

    let out = match &opts.out {
        Some(out) => out.clone(),
        None => {
            let cwd = std::env::current_dir().context("Failed to read current directory")?;
            let answer = prompter.ask(
                "Please specify output location",
                Some(&cwd.display().to_string()),
            )?;
            PathBuf::from(answer.trim())
        }
    };

    generator::render_empty_manifest(name.trim(), &out)
}
