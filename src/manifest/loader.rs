//! Manifest file I/O.
//!
//! Files ending in `.json` are parsed as plain JSON. Anything else is
//! evaluated as Jsonnet, a superset of JSON. Imports resolve relative to the
//! manifest.
use std::fs;
use std::path::Path;

use jrsonnet_evaluator::{EvaluationState, FileImportResolver};
use serde_json::Value;

use crate::error::ManifestError;

/// Read `path` and evaluate it to a JSON document.
///
/// # Errors
///
/// Returns [`ManifestError::NotFound`] if `path` is not a regular file,
/// [`ManifestError::Io`] if it cannot be read, and [`ManifestError::Parse`]
/// if its contents are not valid JSON or fail Jsonnet evaluation.
pub fn read_document(path: &Path) -> Result<Value, ManifestError> {
    if !path.is_file() {
        return Err(ManifestError::NotFound {
            path: path.display().to_string(),
        });
    }

    let content = fs::read_to_string(path).map_err(|source| ManifestError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let parse_error = |message: String| ManifestError::Parse {
        path: path.display().to_string(),
        message,
    };

    if path.extension().is_some_and(|ext| ext == "json") {
        return serde_json::from_str(&content).map_err(|e| parse_error(e.to_string()));
    }

    let json = evaluate_jsonnet(path, &content).map_err(parse_error)?;
    serde_json::from_str(&json).map_err(|e| parse_error(e.to_string()))
}

/// Evaluate `content` as Jsonnet and manifest the result as JSON text.
fn evaluate_jsonnet(path: &Path, content: &str) -> Result<String, String> {
    let state = EvaluationState::default();
    state.with_stdlib();
    state.set_import_resolver(Box::new(FileImportResolver::default()));

    let value = state
        .evaluate_snippet_raw(path.to_path_buf().into(), content.into())
        .map_err(|e| state.stringify_err(&e))?;
    let json = state.manifest(value).map_err(|e| state.stringify_err(&e))?;
    Ok(json.to_string())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let err = read_document(&tmp.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ManifestError::NotFound { .. }));
    }

    #[test]
    fn directory_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let err = read_document(tmp.path()).unwrap_err();
        assert!(matches!(err, ManifestError::NotFound { .. }));
    }

    #[test]
    fn invalid_json_is_parse_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("broken.json");
        fs::write(&path, "{\"name\": ").unwrap();
        let err = read_document(&path).unwrap_err();
        assert!(
            matches!(
                &err,
                ManifestError::Parse { path: p, message }
                    if p.ends_with("broken.json") && message.contains("line 1")
            ),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn jsonnet_locals_and_functions_are_evaluated() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("dev.jsonnet");
        fs::write(
            &path,
            r#"
            // shared apt step
            local apt(pkg) = {
              name: pkg,
              tags: 'apt',
              exe: { install: { cmd: ['apt-get install -y ' + pkg] } },
            };
            local version = '0.1.0';
            {
              name: 'dev',
              version: version,
              metadata: { gene_system: { version: '0.0.1' } },
              steps: [apt('git'), apt('curl')],
            }
            "#,
        )
        .unwrap();

        let doc = read_document(&path).unwrap();

        assert_eq!(doc["version"], "0.1.0");
        assert_eq!(doc["steps"].as_array().unwrap().len(), 2);
        assert_eq!(doc["steps"][1]["name"], "curl");
        assert_eq!(
            doc["steps"][0]["exe"]["install"]["cmd"][0],
            "apt-get install -y git"
        );
    }

    #[test]
    fn jsonnet_evaluation_error_is_parse_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("broken.jsonnet");
        fs::write(&path, "{ name: undefined_local }").unwrap();
        let err = read_document(&path).unwrap_err();
        assert!(matches!(
            &err,
            ManifestError::Parse { path: p, .. } if p.ends_with("broken.jsonnet")
        ));
    }

    #[test]
    fn valid_json_is_returned() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("ok.json");
        fs::write(&path, r#"{"name": "dev"}"#).unwrap();
        let doc = read_document(&path).unwrap();
        assert_eq!(doc["name"], "dev");
    }
}
