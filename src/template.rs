//! `{{var}}` substitution for command templates.
//!
//! Placeholders are looked up in a [`Variables`] mapping. Dotted names walk
//! nested objects, so `{{manifest.name}}` resolves against the seed mapping
//! produced by [`Manifest::variables`](crate::manifest::Manifest::variables).
//! There is no recursion, no conditionals and no escaping: a rendered value
//! is inserted verbatim and never re-scanned.
use serde_json::{Map, Value};

use crate::error::TemplateError;

/// How unresolved placeholders are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Policy {
    /// Fail with [`TemplateError::UndefinedVariable`].
    #[default]
    Strict,
    /// Render unresolved placeholders as the empty string.
    Permissive,
}

/// Variable mapping consumed by [`render`].
///
/// A JSON object so that manifest metadata can be exposed with its original
/// structure alongside flat prompt answers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Variables(Map<String, Value>);

impl Variables {
    /// Create an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `value`, replacing any previous binding.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    /// Resolve a placeholder name.
    ///
    /// An exact top-level key wins; otherwise the name is split on `.` and
    /// each segment indexes into nested objects.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        if let Some(value) = self.0.get(name) {
            return Some(value);
        }
        let mut segments = name.split('.');
        let mut current = self.0.get(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }
}

impl From<Map<String, Value>> for Variables {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Render `template`, replacing every `{{identifier}}` with its value.
///
/// # Errors
///
/// Returns [`TemplateError::UndefinedVariable`] under [`Policy::Strict`] when
/// a placeholder cannot be resolved.
///
/// # Examples
///
/// ```
/// use gene_system::template::{Policy, Variables, render};
///
/// let mut vars = Variables::new();
/// vars.insert("user", "ada");
/// let out = render("echo {{ user }}", &vars, Policy::Strict).unwrap();
/// assert_eq!(out, "echo ada");
/// ```
pub fn render(template: &str, vars: &Variables, policy: Policy) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        let (before, after_open) = rest.split_at(open);
        out.push_str(before);
        let body_start = after_open.get(2..).unwrap_or_default();

        let Some(close) = body_start.find("}}") else {
            // Unterminated placeholder: keep the remainder literally.
            out.push_str(after_open);
            return Ok(out);
        };

        let (body, tail) = body_start.split_at(close);
        let name = body.trim();
        if !is_identifier(name) {
            // Literal braces: resume right after them so a placeholder
            // inside `body` is still seen.
            out.push_str("{{");
            rest = body_start;
            continue;
        }

        match vars.lookup(name) {
            Some(value) => out.push_str(&value_to_string(value)),
            None if policy == Policy::Permissive => {}
            None => {
                return Err(TemplateError::UndefinedVariable {
                    name: name.to_string(),
                    template: template.to_string(),
                });
            }
        }
        rest = tail.get(2..).unwrap_or_default();
    }

    out.push_str(rest);
    Ok(out)
}

/// Placeholder names: non-empty, made of alphanumerics, `_`, `-` and `.`.
fn is_identifier(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vars() -> Variables {
        let mut vars = Variables::new();
        vars.insert("user", "ada");
        vars.insert("port", 8080);
        vars.insert(
            "manifest",
            json!({"name": "dev", "version": "0.1.0", "metadata": {"gene_system": {"version": "0.0.1"}}}),
        );
        vars
    }

    #[test]
    fn substitutes_plain_placeholder() {
        assert_eq!(
            render("echo {{user}}", &vars(), Policy::Strict).unwrap(),
            "echo ada"
        );
    }

    #[test]
    fn tolerates_whitespace_inside_braces() {
        assert_eq!(
            render("echo {{  user }}", &vars(), Policy::Strict).unwrap(),
            "echo ada"
        );
    }

    #[test]
    fn substitutes_every_occurrence() {
        assert_eq!(
            render("{{user}}:{{user}}", &vars(), Policy::Strict).unwrap(),
            "ada:ada"
        );
    }

    #[test]
    fn dotted_names_walk_nested_objects() {
        let out = render(
            "{{manifest.name}} v{{manifest.version}} ({{manifest.metadata.gene_system.version}})",
            &vars(),
            Policy::Strict,
        )
        .unwrap();
        assert_eq!(out, "dev v0.1.0 (0.0.1)");
    }

    #[test]
    fn numbers_render_without_quotes() {
        assert_eq!(
            render("listen {{port}}", &vars(), Policy::Strict).unwrap(),
            "listen 8080"
        );
    }

    #[test]
    fn objects_render_as_json() {
        let out = render("{{manifest.metadata}}", &vars(), Policy::Strict).unwrap();
        assert_eq!(out, r#"{"gene_system":{"version":"0.0.1"}}"#);
    }

    #[test]
    fn strict_policy_rejects_undefined() {
        let err = render("echo {{missing}}", &vars(), Policy::Strict).unwrap_err();
        assert_eq!(
            err,
            TemplateError::UndefinedVariable {
                name: "missing".to_string(),
                template: "echo {{missing}}".to_string(),
            }
        );
    }

    #[test]
    fn permissive_policy_renders_undefined_as_empty() {
        assert_eq!(
            render("echo [{{missing}}]", &vars(), Policy::Permissive).unwrap(),
            "echo []"
        );
    }

    #[test]
    fn substituted_values_are_not_rescanned() {
        let mut v = Variables::new();
        v.insert("a", "{{b}}");
        v.insert("b", "nope");
        assert_eq!(render("{{a}}", &v, Policy::Strict).unwrap(), "{{b}}");
    }

    #[test]
    fn non_identifier_braces_are_literal() {
        let tpl = "awk '{{print $1}}'";
        assert_eq!(render(tpl, &vars(), Policy::Strict).unwrap(), tpl);
    }

    #[test]
    fn placeholder_after_literal_braces_is_substituted() {
        assert_eq!(
            render("echo '{{' {{user}}", &vars(), Policy::Strict).unwrap(),
            "echo '{{' ada"
        );
    }

    #[test]
    fn undefined_after_literal_braces_is_still_rejected() {
        let err = render("echo '{{' {{missing}}", &vars(), Policy::Strict).unwrap_err();
        assert!(matches!(err, TemplateError::UndefinedVariable { name, .. } if name == "missing"));
    }

    #[test]
    fn unterminated_placeholder_is_literal() {
        assert_eq!(
            render("echo {{user", &vars(), Policy::Strict).unwrap(),
            "echo {{user"
        );
    }

    #[test]
    fn template_without_placeholders_is_unchanged() {
        assert_eq!(
            render("apt-get update", &Variables::new(), Policy::Strict).unwrap(),
            "apt-get update"
        );
    }

    #[test]
    fn exact_key_wins_over_dotted_lookup() {
        let mut v = Variables::new();
        v.insert("db.user", "root");
        assert_eq!(render("{{db.user}}", &v, Policy::Strict).unwrap(), "root");
    }
}
