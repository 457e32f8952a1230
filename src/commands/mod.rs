//! Subcommand implementations.
pub mod apply;
pub mod describe;
pub mod install;
pub mod new;
pub mod remove;
pub mod version;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use crate::cli::{ApplyOpts, GlobalOpts};
use crate::exec::{CommandRunner, SystemExecutor};
use crate::logging::Logger;
use crate::manifest::{Direction, TagSet};
use crate::platform::Platform;
use crate::prompt::{Prompter, TerminalPrompter};
use crate::template::Policy;

/// Manifest file offered when none is given on the command line.
pub const DEFAULT_MANIFEST_NAME: &str = "manifest.json";

/// Return `given`, or ask for a manifest path.
///
/// # Errors
///
/// Returns an error if the prompt cannot be answered.
pub fn resolve_manifest_path(given: Option<&Path>, prompter: &dyn Prompter) -> Result<PathBuf> {
    if let Some(path) = given {
        return Ok(path.to_path_buf());
    }
    let answer = prompter.ask(
        "Please enter the path to the configuration manifest",
        Some(DEFAULT_MANIFEST_NAME),
    )?;
    Ok(PathBuf::from(answer.trim()))
}

/// Turn CLI options into [`apply::RunOptions`].
///
/// # Errors
///
/// Returns an error if a tag option holds no tags or the manifest path prompt
/// fails.
pub fn run_options(
    global: &GlobalOpts,
    opts: &ApplyOpts,
    prompter: &dyn Prompter,
) -> Result<apply::RunOptions> {
    Ok(apply::RunOptions {
        manifest_path: resolve_manifest_path(opts.manifest.as_deref(), prompter)?,
        include_tags: opts.include_tags.as_deref().map(TagSet::parse).transpose()?,
        exclude_tags: opts.exclude_tags.as_deref().map(TagSet::parse).transpose()?,
        variables: opts.vars.iter().cloned().collect::<BTreeMap<_, _>>(),
        dry_run: global.dry_run,
    })
}

/// Template policy selected by the global flags.
#[must_use]
pub const fn policy(global: &GlobalOpts) -> Policy {
    if global.allow_undefined {
        Policy::Permissive
    } else {
        Policy::Strict
    }
}

/// Shared body of `install` and `remove`: wire up the host collaborators,
/// run the manifest, print the summary.
///
/// # Errors
///
/// Returns an error if the host cannot run commands, the manifest cannot be
/// loaded, or a step fails.
pub fn apply_direction(
    direction: Direction,
    global: &GlobalOpts,
    opts: &ApplyOpts,
    log: &Logger,
) -> Result<()> {
    let host = Platform::detect();
    let executor = SystemExecutor::for_host(&host)?;
    let runner = CommandRunner::new(&host, &executor, policy(global), log)?;
    let prompter = TerminalPrompter;
    let run_opts = run_options(global, opts, &prompter)?;

    if global.dry_run {
        log.warn("dry run: commands are shown, not run");
    }

    let ctx = apply::Context {
        runner,
        prompter: &prompter,
        log,
        engine: crate::engine_version(),
        host,
    };

    let result = apply::run(direction, &run_opts, &ctx);
    log.print_summary();
    let report = result.with_context(|| {
        format!("{direction} of {} failed", run_opts.manifest_path.display())
    })?;
    log.debug(&format!(
        "{}: {} applied, {} skipped",
        report.manifest,
        report.applied(),
        report.skipped()
    ));
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::error::PromptError;

    struct FixedPrompter(&'static str);

    impl Prompter for FixedPrompter {
        fn ask(&self, _text: &str, _default: Option<&str>) -> Result<String, PromptError> {
            Ok(self.0.to_string())
        }
    }

    struct NoPrompter;

    impl Prompter for NoPrompter {
        fn ask(&self, text: &str, _default: Option<&str>) -> Result<String, PromptError> {
            Err(PromptError::Failed {
                prompt: text.to_string(),
                message: "not a terminal".to_string(),
            })
        }
    }

    #[test]
    fn explicit_manifest_path_is_not_prompted() {
        let path = Path::new("dev.json");
        assert_eq!(resolve_manifest_path(Some(path), &NoPrompter).unwrap(), path);
    }

    #[test]
    fn missing_manifest_path_is_prompted() {
        let path = resolve_manifest_path(None, &FixedPrompter(" other.json ")).unwrap();
        assert_eq!(path, PathBuf::from("other.json"));
    }

    #[test]
    fn prompt_failure_is_an_error() {
        assert!(resolve_manifest_path(None, &NoPrompter).is_err());
    }

    #[test]
    fn run_options_from_cli() {
        let global = GlobalOpts {
            dry_run: true,
            allow_undefined: false,
        };
        let opts = ApplyOpts {
            manifest: Some(PathBuf::from("m.json")),
            include_tags: Some(vec!["db".to_string(), "web".to_string()]),
            exclude_tags: None,
            vars: vec![("user".to_string(), "ada".to_string())],
        };
        let run = run_options(&global, &opts, &NoPrompter).unwrap();
        assert_eq!(run.manifest_path, PathBuf::from("m.json"));
        assert_eq!(run.include_tags.unwrap().tags(), vec!["db", "web"]);
        assert!(run.exclude_tags.is_none());
        assert_eq!(run.variables.get("user").map(String::as_str), Some("ada"));
        assert!(run.dry_run);
    }

    #[test]
    fn empty_tag_option_is_rejected() {
        let opts = ApplyOpts {
            manifest: Some(PathBuf::from("m.json")),
            exclude_tags: Some(vec![String::new()]),
            ..ApplyOpts::default()
        };
        let err = run_options(&GlobalOpts::default(), &opts, &NoPrompter).unwrap_err();
        assert!(err.to_string().contains("Invalid tag query"));
    }

    #[test]
    fn policy_follows_flag() {
        assert_eq!(policy(&GlobalOpts::default()), Policy::Strict);
        let global = GlobalOpts {
            allow_undefined: true,
            ..GlobalOpts::default()
        };
        assert_eq!(policy(&global), Policy::Permissive);
    }
}
