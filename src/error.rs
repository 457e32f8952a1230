//! Domain-specific error types for the provisioning engine.
//!
//! Internal modules return typed errors (e.g., [`ManifestError`],
//! [`CommandError`]) while command handlers at the CLI boundary convert them
//! to [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! GeneError
//! ├── Manifest(ManifestError) — loading, parsing, compatibility
//! ├── Query(QueryError)       — malformed tag filters
//! ├── Template(TemplateError) — placeholder resolution
//! ├── Platform(PlatformError) — unsupported host, missing shell
//! ├── Command(CommandError)   — spawned commands failing
//! └── Prompt(PromptError)     — interactive input failures
//! ```

use thiserror::Error;

/// Top-level error type for the provisioning engine.
#[derive(Error, Debug)]
pub enum GeneError {
    /// The manifest could not be loaded or is not usable.
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),

    /// A tag filter was built without a proper tag set.
    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    /// A command template could not be rendered.
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    /// The host cannot run shell-based provisioning.
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    /// A spawned command failed.
    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    /// An interactive prompt could not be answered.
    #[error("Prompt error: {0}")]
    Prompt(#[from] PromptError),
}

/// Errors that arise while loading and validating a manifest.
#[derive(Error, Debug)]
pub enum ManifestError {
    /// The manifest path does not resolve to a readable file.
    #[error("Manifest not found: {path}")]
    NotFound {
        /// Path that was looked up.
        path: String,
    },

    /// The manifest file exists but could not be read.
    #[error("IO error reading manifest {path}: {source}")]
    Io {
        /// Path to the file that could not be read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The manifest file is not valid JSON.
    #[error("Invalid JSON in {path}: {message}")]
    Parse {
        /// Path to the offending file.
        path: String,
        /// Parser message, including line and column.
        message: String,
    },

    /// The document has the wrong shape (e.g. a field of the wrong type).
    #[error("Invalid manifest: {0}")]
    Invalid(String),

    /// `name`, `version` or `metadata` is absent.
    #[error("manifest is missing required attributes name, version and/or metadata")]
    MissingRequiredFields,

    /// The manifest targets a newer engine, or does not declare one.
    #[error(
        "provided manifest is invalid or incompatible with this version of gene_system \
         (manifest requires {declared}, engine is {engine})"
    )]
    IncompatibleVersion {
        /// Engine version declared by the manifest, or `"<none>"`.
        declared: String,
        /// Version of the running engine.
        engine: String,
    },
}

/// Errors that arise from building tag queries.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum QueryError {
    /// A tag filter was requested without any tags.
    #[error("Invalid tag query: {0}")]
    InvalidQuery(String),
}

/// Errors that arise from rendering command templates.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TemplateError {
    /// A placeholder names a variable that is not defined.
    #[error("Undefined variable '{name}' in template `{template}`")]
    UndefinedVariable {
        /// Name of the unresolved placeholder.
        name: String,
        /// Template that contained it.
        template: String,
    },
}

/// Errors that arise from host platform checks.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// The host is not a POSIX system.
    #[error("unsupported platform: {platform} (a POSIX host is required)")]
    Unsupported {
        /// Name of the detected platform.
        platform: String,
    },

    /// No POSIX shell could be located on `PATH`.
    #[error("shell '{0}' not found on PATH")]
    ShellNotFound(String),
}

/// Errors that arise from running commands on the host.
#[derive(Error, Debug)]
pub enum CommandError {
    /// A command exited with a nonzero status.
    #[error("command `{command}` failed - returned {code}")]
    Failed {
        /// The command template as written in the manifest.
        command: String,
        /// Exit status (`-1` when terminated by a signal).
        code: i32,
    },

    /// The shell process could not be spawned.
    #[error("failed to execute `{command}`: {source}")]
    Spawn {
        /// The rendered command line.
        command: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors that arise from interactive prompts.
#[derive(Error, Debug)]
pub enum PromptError {
    /// Input could not be read for the given prompt.
    #[error("could not read answer for '{prompt}': {message}")]
    Failed {
        /// Prompt text shown to the user.
        prompt: String,
        /// Reason reported by the terminal backend.
        message: String,
    },
}
