//! Declarative machine provisioning engine.
//!
//! A JSON manifest describes named steps, each with an install and a remove
//! directive (shell command templates, an optional skip guard and optional
//! prompts) plus a set of tags. The engine selects steps by tag, checks skip
//! guards, collects prompt answers and runs the rendered commands in manifest
//! order through the host shell.
//!
//! The public API is organised into these layers:
//!
//! - **[`manifest`]**: parse and validate manifests, steps and tag filters
//! - **[`template`]**: `{{var}}` substitution into command templates
//! - **[`exec`]**: shell execution with first-failure-aborts semantics
//! - **[`commands`]**: top-level subcommands (`install`, `remove`, `describe`, `new`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod exec;
pub mod logging;
pub mod manifest;
pub mod platform;
pub mod prompt;
pub mod template;

/// Identifier of this engine inside manifest metadata.
///
/// Manifests record the engine version they were written for under
/// `metadata.gene_system.version`.
pub const ENGINE_ID: &str = "gene_system";

/// Version of the running engine.
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Parse [`ENGINE_VERSION`] into a [`semver::Version`].
#[must_use]
pub fn engine_version() -> semver::Version {
    semver::Version::parse(ENGINE_VERSION).unwrap_or_else(|_| semver::Version::new(0, 0, 0))
}
