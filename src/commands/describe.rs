//! Describe command: print a manifest's steps without running anything.
use std::fmt::Write as _;

use anyhow::{Context as _, Result};

use crate::cli::DescribeOpts;
use crate::manifest::{Direction, Manifest};
use crate::prompt::TerminalPrompter;

/// Run the describe command.
///
/// # Errors
///
/// Returns an error if the manifest path prompt fails or the manifest cannot
/// be loaded.
pub fn run(opts: &DescribeOpts) -> Result<()> {
    let path = super::resolve_manifest_path(opts.manifest.as_deref(), &TerminalPrompter)?;
    let manifest = Manifest::load(&path, &crate::engine_version())
        .with_context(|| format!("Failed to load manifest: {}", path.display()))?;
    println!("{}", render(&manifest));
    Ok(())
}

/// Human-readable description of `manifest`.
///
/// Each direction gets its own section, separated from the header and from
/// each other by a blank line.
#[must_use]
pub fn render(manifest: &Manifest) -> String {
    let mut lines = vec![
        format!("NAME: {}", manifest.name()),
        format!("VERSION: {}", manifest.version()),
        format!("PLATFORM: {}", manifest.platform().unwrap_or("any")),
    ];

    for direction in [Direction::Install, Direction::Remove] {
        lines.push(String::new());
        lines.push(format!("{} STEPS:", direction.to_string().to_uppercase()));
        if manifest.steps().is_empty() {
            lines.push("  (none)".to_string());
        }
        for step in manifest.steps() {
            let directive = step.directive(direction);
            let mut header = format!("  + {}", step.name);
            if !step.tags.is_empty() {
                let tags: Vec<&str> = step.tags.iter().map(String::as_str).collect();
                let _ = write!(header, " [{}]", tags.join(" "));
            }
            if let Some(skip) = &directive.skip {
                let _ = write!(header, " UNLESS {skip}");
            }
            lines.push(header);
            if directive.is_noop() {
                lines.push("      # no op".to_string());
            }
            lines.extend(directive.cmd.iter().map(|cmd| format!("      {cmd}")));
            lines.extend(
                directive
                    .prompts
                    .iter()
                    .map(|p| format!("      ? {} -> {{{{{}}}}}", p.prompt, p.var)),
            );
        }
    }
    lines.join("\n")
}
