//! Install/remove orchestration.
//!
//! One run is a linear pass over the selected steps in manifest order. For
//! each step the skip guard is checked, prompts are answered and the commands
//! are run. The first failing command aborts the whole run.
use std::collections::BTreeMap;
use std::path::PathBuf;

use semver::Version;

use crate::error::GeneError;
use crate::exec::CommandRunner;
use crate::logging::{Log, StepStatus};
use crate::manifest::{Direction, Manifest, PromptSpec, Step, TagSet, validation};
use crate::platform::Platform;
use crate::prompt::Prompter;
use crate::template::Variables;

/// Inputs of one install or remove run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Manifest to load.
    pub manifest_path: PathBuf,
    /// Keep only steps carrying one of these tags.
    pub include_tags: Option<TagSet>,
    /// Drop steps carrying any of these tags.
    pub exclude_tags: Option<TagSet>,
    /// Prompt answers supplied in advance, keyed by prompt `var`.
    pub variables: BTreeMap<String, String>,
    /// Render and log commands instead of running them.
    pub dry_run: bool,
}

/// Collaborators shared by every step of a run.
pub struct Context<'a> {
    /// Renders and runs commands.
    pub runner: CommandRunner<'a>,
    /// Answers prompts.
    pub prompter: &'a dyn Prompter,
    /// Receives progress output and step results.
    pub log: &'a dyn Log,
    /// Version of the running engine.
    pub engine: Version,
    /// Host the run happens on.
    pub host: Platform,
}

impl std::fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("runner", &self.runner)
            .field("prompter", &"<dyn Prompter>")
            .field("log", &"<dyn Log>")
            .field("engine", &self.engine)
            .field("host", &self.host)
            .finish()
    }
}

/// What happened to one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Every command ran and exited zero.
    Applied {
        /// Number of commands run.
        commands: usize,
    },
    /// The skip guard exited zero.
    Skipped,
    /// Dry run; the rendered commands were logged, not run.
    DryRun {
        /// Rendered commands.
        commands: Vec<String>,
    },
}

/// Outcome of one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    /// Step name.
    pub step: String,
    /// What happened.
    pub outcome: Outcome,
}

/// Structured result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// `"<name> v<version>"` of the manifest.
    pub manifest: String,
    /// Direction that was run.
    pub direction: Direction,
    /// One entry per selected step, in order.
    pub outcomes: Vec<StepOutcome>,
}

impl RunReport {
    /// Number of steps whose commands ran.
    #[must_use]
    pub fn applied(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Applied { .. }))
    }

    /// Number of steps skipped by their guard.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Skipped))
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.outcomes.iter().filter(|s| pred(&s.outcome)).count()
    }
}

/// Load the manifest named in `opts` and run `direction` over it.
///
/// Validation warnings are logged before any step runs.
///
/// # Errors
///
/// Returns an error if the manifest cannot be loaded, or any error from
/// [`apply_manifest`].
pub fn run(direction: Direction, opts: &RunOptions, ctx: &Context<'_>) -> Result<RunReport, GeneError> {
    ctx.log.debug(&format!("loading {}", opts.manifest_path.display()));
    let manifest = Manifest::load(&opts.manifest_path, &ctx.engine)?;

    let warnings = validation::validate(&manifest, &ctx.host);
    if !warnings.is_empty() {
        ctx.log
            .warn(&format!("found {} manifest warning(s):", warnings.len()));
        for warning in &warnings {
            ctx.log.warn(&format!(
                "  {} [{}]: {}",
                warning.source, warning.item, warning.message
            ));
        }
    }

    apply_manifest(&manifest, direction, opts, ctx)
}

/// Run `direction` over the steps of `manifest` selected by `opts`.
///
/// # Errors
///
/// Returns the first error raised by a step: a failing command, an
/// unresolved template variable, a spawn failure or an unanswered prompt.
/// Steps after the failing one are not processed.
pub fn apply_manifest(
    manifest: &Manifest,
    direction: Direction,
    opts: &RunOptions,
    ctx: &Context<'_>,
) -> Result<RunReport, GeneError> {
    let label = manifest.name_and_version();
    ctx.log
        .stage(&format!("{} {label}", direction.to_string().to_uppercase()));

    let selected = manifest
        .steps()
        .select(opts.include_tags.as_ref(), opts.exclude_tags.as_ref());
    ctx.log.debug(&format!(
        "{} of {} steps selected",
        selected.len(),
        manifest.steps().len()
    ));

    let mut outcomes = Vec::with_capacity(selected.len());
    for step in selected {
        let _step = crate::logging::step_span(direction, &step.name).entered();
        let outcome = match apply_step(manifest, step, direction, opts, ctx) {
            Ok(outcome) => outcome,
            Err(e) => {
                ctx.log
                    .record_step(&step.name, StepStatus::Failed, Some(&e.to_string()));
                ctx.log.error(&format!("{}: {e}", step.name));
                return Err(e);
            }
        };

        match &outcome {
            Outcome::Applied { .. } => ctx.log.record_step(&step.name, StepStatus::Applied, None),
            Outcome::Skipped => {
                ctx.log
                    .record_step(&step.name, StepStatus::Skipped, Some("skip guard passed"));
            }
            Outcome::DryRun { .. } => ctx.log.record_step(&step.name, StepStatus::DryRun, None),
        }
        outcomes.push(StepOutcome {
            step: step.name.clone(),
            outcome,
        });
    }

    let verb = if opts.dry_run { "would be" } else { "successfully" };
    ctx.log.info(&format!(
        "✔ Manifest {label} {verb} {}",
        direction.past_tense()
    ));

    Ok(RunReport {
        manifest: label,
        direction,
        outcomes,
    })
}

fn apply_step(
    manifest: &Manifest,
    step: &Step,
    direction: Direction,
    opts: &RunOptions,
    ctx: &Context<'_>,
) -> Result<Outcome, GeneError> {
    let directive = step.directive(direction);
    let seed = manifest.variables();

    if let Some(skip) = &directive.skip {
        let code = ctx.runner.execute_command(skip, &seed)?;
        if code == 0 {
            ctx.log.info(&format!("{}: skipped", step.name));
            return Ok(Outcome::Skipped);
        }
        ctx.log
            .debug(&format!("{}: skip guard returned {code}", step.name));
    }

    ctx.log.info(&step.name);
    let vars = collect_answers(seed, &directive.prompts, opts, ctx)?;

    if opts.dry_run {
        let commands = directive
            .cmd
            .iter()
            .map(|c| ctx.runner.render(c, &vars))
            .collect::<Result<Vec<_>, _>>()?;
        for command in &commands {
            ctx.log.dry_run(&format!("would run: {command}"));
        }
        return Ok(Outcome::DryRun { commands });
    }

    ctx.runner.execute_commands(&directive.cmd, &vars)?;
    Ok(Outcome::Applied {
        commands: directive.cmd.len(),
    })
}

/// Bind each prompt's answer on top of `vars`.
///
/// Answers supplied in `opts.variables` are used without asking.
fn collect_answers(
    mut vars: Variables,
    prompts: &[PromptSpec],
    opts: &RunOptions,
    ctx: &Context<'_>,
) -> Result<Variables, GeneError> {
    for prompt in prompts {
        let answer = match opts.variables.get(&prompt.var) {
            Some(preset) => {
                ctx.log.debug(&format!("{}: using supplied value", prompt.var));
                preset.clone()
            }
            None => ctx.prompter.ask(&prompt.prompt, prompt.default.as_deref())?,
        };
        vars.insert(prompt.var.clone(), answer);
    }
    Ok(vars)
}
