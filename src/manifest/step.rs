//! Manifest steps and their install/remove directives.
use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Which half of a step to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Run each step's `install` directive.
    Install,
    /// Run each step's `remove` directive.
    Remove,
}

impl Direction {
    /// Past-tense verb used in completion messages.
    #[must_use]
    pub const fn past_tense(self) -> &'static str {
        match self {
            Self::Install => "installed",
            Self::Remove => "removed",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Install => write!(f, "install"),
            Self::Remove => write!(f, "remove"),
        }
    }
}

/// One interactive question whose answer is bound to a template variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptSpec {
    /// Text shown to the user.
    pub prompt: String,
    /// Variable name the answer is bound to.
    pub var: String,
    /// Answer offered when the user just presses enter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

/// Step entry as it appears in the manifest document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawStep {
    /// Step name.
    #[serde(default)]
    pub name: String,
    /// Whitespace-delimited tag string.
    #[serde(default)]
    pub tags: Option<String>,
    /// Install and remove directives.
    #[serde(default)]
    pub exe: RawExe,
}

/// The `exe` object of a [`RawStep`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawExe {
    /// Directive run by `install`.
    #[serde(default)]
    pub install: RawDirective,
    /// Directive run by `remove`.
    #[serde(default)]
    pub remove: RawDirective,
}

/// Directive as it appears in the manifest document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDirective {
    /// Command templates.
    #[serde(default)]
    pub cmd: Vec<String>,
    /// Skip guard command template.
    #[serde(default)]
    pub skip: Option<String>,
    /// Prompts asked before the commands run.
    #[serde(default)]
    pub prompts: Vec<PromptSpec>,
}

/// Commands, skip guard and prompts for one direction of a step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directive {
    /// Command templates run in order. Empty means no-op.
    pub cmd: Vec<String>,
    /// Skip guard; when it exits zero the directive does not run.
    ///
    /// Blank guards are normalised to `None` and never skip.
    pub skip: Option<String>,
    /// Prompts asked in order before running `cmd`.
    pub prompts: Vec<PromptSpec>,
}

impl Directive {
    fn parse(raw: RawDirective) -> Self {
        Self {
            cmd: raw.cmd,
            skip: raw.skip.filter(|s| !s.trim().is_empty()),
            prompts: raw.prompts,
        }
    }

    /// Whether running this directive executes no commands.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.cmd.is_empty()
    }
}

/// A named provisioning unit with install and remove directives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Step name.
    pub name: String,
    /// Tags used by tag filters. Never absent; empty when unset.
    pub tags: BTreeSet<String>,
    /// Directive run by `install`.
    pub install: Directive,
    /// Directive run by `remove`.
    pub remove: Directive,
}

impl Step {
    /// Build a step from its document form, applying defaults.
    #[must_use]
    pub fn parse(raw: RawStep) -> Self {
        let tags = raw
            .tags
            .as_deref()
            .map(|t| t.split_whitespace().map(String::from).collect())
            .unwrap_or_default();
        Self {
            name: raw.name,
            tags,
            install: Directive::parse(raw.exe.install),
            remove: Directive::parse(raw.exe.remove),
        }
    }

    /// Directive for `direction`.
    #[must_use]
    pub const fn directive(&self, direction: Direction) -> &Directive {
        match direction {
            Direction::Install => &self.install,
            Direction::Remove => &self.remove,
        }
    }

    /// Whether the step carries `tag`.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}
