//! Non-fatal manifest checks.
//!
//! Everything reported here is a warning: the manifest is still usable, but
//! probably not what its author intended.
use std::collections::BTreeSet;

use super::Manifest;
use super::step::Direction;
use crate::platform::{Platform, SUPPORTED_MANIFEST_PLATFORMS, is_supported_manifest_platform};

/// A validation warning detected while checking a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// Manifest the warning belongs to (its path, or its name if in memory).
    pub source: String,
    /// Field or step that triggered the warning.
    pub item: String,
    /// Human-readable warning message.
    pub message: String,
}

impl ValidationWarning {
    /// Create a warning.
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        item: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            item: item.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}: {}", self.source, self.item, self.message)
    }
}

/// Check `manifest` against `platform` and return any warnings found.
#[must_use]
pub fn validate(manifest: &Manifest, platform: &Platform) -> Vec<ValidationWarning> {
    let source = manifest
        .path()
        .map_or_else(|| manifest.name().to_string(), |p| p.display().to_string());
    let mut warnings = Vec::new();

    if let Some(declared) = manifest.platform() {
        if !is_supported_manifest_platform(declared) {
            warnings.push(ValidationWarning::new(
                &source,
                "platform",
                format!(
                    "unrecognised platform '{declared}' (expected one of: {})",
                    SUPPORTED_MANIFEST_PLATFORMS.join(", ")
                ),
            ));
        } else if !platform.matches_manifest_platform(declared) {
            warnings.push(ValidationWarning::new(
                &source,
                "platform",
                format!("manifest targets '{declared}' but this host is {}", platform.os),
            ));
        }
    }

    let mut seen = BTreeSet::new();
    for step in manifest.steps() {
        if step.name.trim().is_empty() {
            warnings.push(ValidationWarning::new(&source, "<unnamed>", "step has no name"));
        } else if !seen.insert(step.name.as_str()) {
            warnings.push(ValidationWarning::new(
                &source,
                &step.name,
                "duplicate step name",
            ));
        }

        for direction in [Direction::Install, Direction::Remove] {
            let directive = step.directive(direction);
            if directive.cmd.iter().any(|c| c.trim().is_empty()) {
                warnings.push(ValidationWarning::new(
                    &source,
                    &step.name,
                    format!("{direction} has a blank command"),
                ));
            }
            for prompt in &directive.prompts {
                if prompt.var.trim().is_empty() {
                    warnings.push(ValidationWarning::new(
                        &source,
                        &step.name,
                        format!("{direction} prompt '{}' has no var", prompt.prompt),
                    ));
                }
            }
        }
    }

    warnings
}
