//! Variable substitution for caller-supplied prompt templates.
//!
//! Placeholders are written `{{name}}` and bound from a JSON object passed as
//! a string. Substitution is a single pass: values containing `{{x}}` are not
//! re-scanned.

use regex::{Captures, Regex};
use serde_json::Value;
use std::sync::OnceLock;

use crate::error::Error;

/// Placeholder identifiers: letters, digits, underscore, hyphen.
fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{([A-Za-z0-9_-]+)\}\}").unwrap())
}

/// Substitute `{{name}}` placeholders in `template` from `vars_json`.
///
/// `vars_json` must be a JSON object, the literal `null`, or an empty string.
/// `null` and the empty string mean "no bindings" and return the template
/// unchanged. Placeholders without a matching key are left verbatim.
///
/// An empty template is an error. This is deliberate strictness, not an
/// accident of parsing: an empty prompt is never a useful provider call.
pub fn substitute(template: &str, vars_json: &str) -> Result<String, Error> {
    if template.is_empty() {
        return Err(Error::Template("template must not be empty".into()));
    }
    if vars_json.is_empty() {
        return Ok(template.to_string());
    }

    let parsed: Value = serde_json::from_str(vars_json)
        .map_err(|e| Error::Template(format!("invalid variables JSON: {e}")))?;

    let vars = match parsed {
        Value::Null => return Ok(template.to_string()),
        Value::Object(map) => map,
        other => {
            return Err(Error::Template(format!(
                "variables must be a JSON object or null, got {}",
                json_kind(&other)
            )))
        }
    };

    let result = placeholder_re().replace_all(template, |caps: &Captures| {
        match vars.get(&caps[1]) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            // Missing keys and non-scalar values keep the placeholder verbatim.
            _ => caps[0].to_string(),
        }
    });

    Ok(result.into_owned())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_all_bound_placeholders() {
        let out = substitute(
            "Hello {{name}}, please review this {{language}} code.",
            r#"{"name": "Alice", "language": "Go"}"#,
        )
        .unwrap();
        assert_eq!(out, "Hello Alice, please review this Go code.");
    }

    #[test]
    fn numbers_and_bools_render_as_literals() {
        let out = substitute(
            "retries={{retries}} ratio={{ratio}} enabled={{enabled}}",
            r#"{"retries": 3, "ratio": 0.5, "enabled": true}"#,
        )
        .unwrap();
        assert_eq!(out, "retries=3 ratio=0.5 enabled=true");
    }

    #[test]
    fn missing_keys_stay_verbatim() {
        let out = substitute("{{known}} and {{unknown}}", r#"{"known": "yes"}"#).unwrap();
        assert_eq!(out, "yes and {{unknown}}");
    }

    #[test]
    fn non_scalar_values_stay_verbatim() {
        let out = substitute("{{list}}", r#"{"list": [1, 2]}"#).unwrap();
        assert_eq!(out, "{{list}}");
    }

    #[test]
    fn empty_and_null_bindings_are_noops() {
        assert_eq!(substitute("as-is {{x}}", "").unwrap(), "as-is {{x}}");
        assert_eq!(substitute("as-is {{x}}", "null").unwrap(), "as-is {{x}}");
    }

    #[test]
    fn empty_template_is_an_error() {
        // Deliberate asymmetry: empty bindings are fine, an empty template is not.
        assert!(matches!(substitute("", ""), Err(Error::Template(_))));
        assert!(matches!(
            substitute("", r#"{"x": "y"}"#),
            Err(Error::Template(_))
        ));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            substitute("hi {{x}}", "{not json"),
            Err(Error::Template(_))
        ));
    }

    #[test]
    fn non_object_top_level_is_an_error() {
        assert!(matches!(
            substitute("hi", "[1, 2]"),
            Err(Error::Template(_))
        ));
        assert!(matches!(substitute("hi", "42"), Err(Error::Template(_))));
        assert!(matches!(
            substitute("hi", r#""string""#),
            Err(Error::Template(_))
        ));
    }

    #[test]
    fn substitution_is_single_pass() {
        let out = substitute("{{a}}", r#"{"a": "{{b}}", "b": "deep"}"#).unwrap();
        assert_eq!(out, "{{b}}");
    }

    #[test]
    fn hyphen_and_underscore_identifiers() {
        let out = substitute(
            "{{user-name}} {{user_id}}",
            r#"{"user-name": "crab", "user_id": 7}"#,
        )
        .unwrap();
        assert_eq!(out, "crab 7");
    }
}
