//! Remove command implementation.
use anyhow::Result;

use crate::cli::{ApplyOpts, GlobalOpts};
use crate::logging::Logger;
use crate::manifest::Direction;

/// Run the remove command.
///
/// # Errors
///
/// Returns an error if the manifest cannot be loaded or a step fails.
pub fn run(global: &GlobalOpts, opts: &ApplyOpts, log: &Logger) -> Result<()> {
    super::apply_direction(Direction::Remove, global, opts, log)
}
