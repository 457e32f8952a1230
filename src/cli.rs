//! Command-line interface definition.
use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI entry point for the provisioning engine.
#[derive(Parser, Debug)]
#[command(
    name = "gene_system",
    about = "Declarative machine provisioning from JSON manifests",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared across all subcommands.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Preview commands without running them (skip guards still run)
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Render undefined template variables as empty strings instead of failing
    #[arg(long, global = true)]
    pub allow_undefined: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the install directive of every selected step
    Install(ApplyOpts),
    /// Run the remove directive of every selected step
    Remove(ApplyOpts),
    /// Print a manifest's steps and commands
    Describe(DescribeOpts),
    /// Create a new manifest from a template
    New(NewOpts),
    /// Print version information
    Version,
}

impl Command {
    /// Name used for the per-command log file.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Install(_) => "install",
            Self::Remove(_) => "remove",
            Self::Describe(_) => "describe",
            Self::New(_) => "new",
            Self::Version => "version",
        }
    }
}

/// Options for the `install` and `remove` subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct ApplyOpts {
    /// Path to the manifest (asked interactively when omitted)
    #[arg(short, long)]
    pub manifest: Option<PathBuf>,

    /// Only run steps carrying at least one of these tags
    #[arg(long, value_delimiter = ',')]
    pub include_tags: Option<Vec<String>>,

    /// Skip steps carrying any of these tags
    #[arg(long, value_delimiter = ',')]
    pub exclude_tags: Option<Vec<String>>,

    /// Answer a prompt in advance (NAME=VALUE, repeatable)
    #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_var)]
    pub vars: Vec<(String, String)>,
}

/// Options for the `describe` subcommand.
#[derive(Parser, Debug, Clone, Default)]
pub struct DescribeOpts {
    /// Path to the manifest (asked interactively when omitted)
    #[arg(short, long)]
    pub manifest: Option<PathBuf>,
}

/// Options for the `new` subcommand.
#[derive(Parser, Debug, Clone, Default)]
pub struct NewOpts {
    /// Name of the manifest (asked interactively when omitted)
    #[arg(long)]
    pub name: Option<String>,

    /// Directory to write the manifest into (asked interactively when omitted)
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Parse a `NAME=VALUE` pair. The value may contain further `=` signs.
fn parse_var(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("variable name is empty in '{raw}'"));
    }
    Ok((name.to_string(), value.to_string()))
}
