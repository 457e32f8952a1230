//! Manifest model: parsing, compatibility checking and step access.
//!
//! A manifest is deserialised once into typed structs at the boundary and is
//! immutable afterwards. Step selection happens on borrowed
//! [`StepCollection`] views.
pub mod collection;
pub mod generator;
pub mod loader;
pub mod step;
pub mod validation;

use std::path::{Path, PathBuf};

use semver::Version;
use serde::Deserialize;
use serde_json::{Value, json};

pub use collection::{StepCollection, TagFilter, TagSet};
pub use step::{Direction, Directive, PromptSpec, Step};

use crate::error::ManifestError;
use crate::template::Variables;

/// Top-level manifest document as written on disk.
#[derive(Debug, Clone, Default, Deserialize)]
struct ManifestDocument {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    platform: Option<String>,
    #[serde(default)]
    metadata: Option<Value>,
    #[serde(default)]
    steps: Vec<step::RawStep>,
}

/// A validated, immutable provisioning manifest.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    path: Option<PathBuf>,
    name: String,
    version: String,
    platform: Option<String>,
    metadata: Value,
    steps: Vec<Step>,
}

impl Manifest {
    /// Build a manifest from a parsed document.
    ///
    /// `engine` is the version of the running engine; manifests declaring a
    /// newer engine under `metadata.gene_system.version` are rejected.
    ///
    /// # Errors
    ///
    /// - [`ManifestError::Invalid`] if a field has the wrong type
    /// - [`ManifestError::MissingRequiredFields`] if `name`, `version` or
    ///   `metadata` is absent
    /// - [`ManifestError::IncompatibleVersion`] if the declared engine version
    ///   is absent, malformed, or newer than `engine`
    pub fn from_document(doc: Value, engine: &Version) -> Result<Self, ManifestError> {
        let doc: ManifestDocument =
            serde_json::from_value(doc).map_err(|e| ManifestError::Invalid(e.to_string()))?;

        let (Some(name), Some(version), Some(metadata)) = (doc.name, doc.version, doc.metadata)
        else {
            return Err(ManifestError::MissingRequiredFields);
        };

        check_compatibility(&metadata, engine)?;

        Ok(Self {
            path: None,
            name,
            version,
            platform: doc.platform,
            metadata,
            steps: doc.steps.into_iter().map(Step::parse).collect(),
        })
    }

    /// Read and build the manifest stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns any error from [`loader::read_document`] or
    /// [`Manifest::from_document`].
    pub fn load(path: &Path, engine: &Version) -> Result<Self, ManifestError> {
        let doc = loader::read_document(path)?;
        let mut manifest = Self::from_document(doc, engine)?;
        manifest.path = Some(path.to_path_buf());
        Ok(manifest)
    }

    /// File the manifest was loaded from, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Manifest name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Manifest version as written.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// `"<name> v<version>"`.
    #[must_use]
    pub fn name_and_version(&self) -> String {
        format!("{} v{}", self.name, self.version)
    }

    /// Declared target platform, as written.
    ///
    /// Unrecognised values are reported by
    /// [`validation::validate`], never here.
    #[must_use]
    pub fn platform(&self) -> Option<&str> {
        self.platform.as_deref()
    }

    /// Free-form metadata object.
    #[must_use]
    pub const fn metadata(&self) -> &Value {
        &self.metadata
    }

    /// Fresh view over all steps in manifest order.
    #[must_use]
    pub fn steps(&self) -> StepCollection<'_> {
        StepCollection::new(&self.steps)
    }

    /// Seed variables exposed to every command template.
    ///
    /// `{"manifest": {"name", "version", "metadata"}}`, reachable in templates
    /// as `{{manifest.name}}` and so on.
    #[must_use]
    pub fn variables(&self) -> Variables {
        let mut vars = Variables::new();
        vars.insert(
            "manifest",
            json!({
                "name": self.name,
                "version": self.version,
                "metadata": self.metadata,
            }),
        );
        vars
    }
}

/// Engine version a manifest declares in its metadata.
#[must_use]
pub fn declared_engine_version(metadata: &Value) -> Option<&str> {
    metadata
        .get(crate::ENGINE_ID)?
        .get("version")?
        .as_str()
}

fn check_compatibility(metadata: &Value, engine: &Version) -> Result<(), ManifestError> {
    let incompatible = |declared: &str| ManifestError::IncompatibleVersion {
        declared: declared.to_string(),
        engine: engine.to_string(),
    };

    let declared = declared_engine_version(metadata).ok_or_else(|| incompatible("<none>"))?;
    let parsed = parse_version(declared).ok_or_else(|| incompatible(declared))?;
    if parsed > *engine {
        return Err(incompatible(declared));
    }
    Ok(())
}

/// Parse a semantic version, padding missing minor/patch components.
///
/// `"1"` becomes `1.0.0` and `"v1.2"` becomes `1.2.0`.
#[must_use]
pub fn parse_version(raw: &str) -> Option<Version> {
    let raw = raw.trim();
    let raw = raw.strip_prefix('v').unwrap_or(raw);
    if let Ok(version) = Version::parse(raw) {
        return Some(version);
    }

    let parts = raw
        .split('.')
        .map(str::parse::<u64>)
        .collect::<Result<Vec<_>, _>>()
        .ok()?;
    match parts.as_slice() {
        [major] => Some(Version::new(*major, 0, 0)),
        [major, minor] => Some(Version::new(*major, *minor, 0)),
        _ => None,
    }
}
