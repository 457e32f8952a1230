//! Scaffolding for new manifests.
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, bail};
use serde_json::{Value, json};

/// Version given to freshly generated manifests.
pub const TEMPLATE_VERSION: &str = "0.0.1";

/// Sample step included in every generated manifest.
#[must_use]
pub fn default_step() -> Value {
    json!({
        "name": "say hello",
        "exe": {
            "install": {"cmd": ["echo hello"]},
            "remove": {"cmd": ["echo goodbye"]}
        },
        "tags": "example step"
    })
}

/// Manifest document named `name`, targeting the running engine.
#[must_use]
pub fn template_manifest(name: &str) -> Value {
    json!({
        "name": name,
        "version": TEMPLATE_VERSION,
        "metadata": {
            (crate::ENGINE_ID): {"version": crate::ENGINE_VERSION}
        },
        "steps": [default_step()]
    })
}

/// Write a template manifest into `dir` and return its path.
///
/// The file is `<name>.json`; a trailing `.json` on `name` is not doubled and
/// is left out of the manifest's own name.
///
/// # Errors
///
/// Returns an error if `dir` is not a directory or the file cannot be
/// written.
pub fn render_empty_manifest(name: &str, dir: &Path) -> Result<PathBuf> {
    if !dir.is_dir() {
        bail!("output location must be a folder: {}", dir.display());
    }

    let stem = name.strip_suffix(".json").unwrap_or(name);
    if stem.trim().is_empty() {
        bail!("manifest name must not be empty");
    }

    let path = dir.join(format!("{stem}.json"));
    let body = serde_json::to_string_pretty(&template_manifest(stem))
        .context("Failed to serialise template manifest")?;
    fs::write(&path, body + "\n")
        .with_context(|| format!("Failed to write manifest: {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::manifest::Manifest;

    #[test]
    fn template_is_a_loadable_manifest() {
        let m = Manifest::from_document(template_manifest("dev"), &crate::engine_version()).unwrap();
        assert_eq!(m.name_and_version(), "dev v0.0.1");
        let step = m.steps().iter().next().unwrap();
        assert_eq!(step.name, "say hello");
        assert!(step.has_tag("example") && step.has_tag("step"));
        assert_eq!(step.install.cmd, vec!["echo hello"]);
        assert_eq!(step.remove.cmd, vec!["echo goodbye"]);
    }

    #[test]
    fn render_writes_named_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = render_empty_manifest("dev", tmp.path()).unwrap();
        assert_eq!(path, tmp.path().join("dev.json"));
        let m = Manifest::load(&path, &crate::engine_version()).unwrap();
        assert_eq!(m.name(), "dev");
    }

    #[test]
    fn render_does_not_double_extension() {
        let tmp = tempfile::tempdir().unwrap();
        let path = render_empty_manifest("manifest.json", tmp.path()).unwrap();
        assert_eq!(path, tmp.path().join("manifest.json"));
        let doc: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(doc["name"], "manifest");
    }

    #[test]
    fn render_rejects_non_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("file");
        fs::write(&file, "").unwrap();
        let err = render_empty_manifest("dev", &file).unwrap_err();
        assert!(err.to_string().contains("output location must be a folder"));
    }

    #[test]
    fn render_rejects_empty_name() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(render_empty_manifest(".json", tmp.path()).is_err());
    }
}
