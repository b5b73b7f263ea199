// EN: src/core/interpolator.rs

use regex::{Captures, Regex};
use serde_yaml::{Mapping, Value};
use std::sync::LazyLock;
use thiserror::Error;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_\-]*(?:\.[A-Za-z0-9_\-]+)*)\s*\}\}")
        .expect("placeholder pattern is a valid regex")
});

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubstitutionError {
    #[error("Unresolved variable '{name}' in '{template}'.")]
    UnresolvedVariable { name: String, template: String },
    #[error("Variable '{name}' holds a {kind} and cannot be embedded in '{template}'.")]
    NotEmbeddable {
        name: String,
        kind: &'static str,
        template: String,
    },
}

/// Renders `template` against `context`.
///
/// `{{ name }}` placeholders are looked up in `context`; a dotted name walks
/// nested mappings. A template made of a single placeholder yields the
/// variable itself, type included. Otherwise placeholders are replaced by
/// the text of scalar values and the result is a string.
pub fn substitute(template: &str, context: &Mapping) -> Result<Value, SubstitutionError> {
    if let Some(captures) = PLACEHOLDER.captures(template) {
        if let Some(whole) = captures.get(0) {
            if whole.start() == 0 && whole.end() == template.len() {
                return lookup(&captures, template, context).cloned();
            }
        }
    }

    let mut rendered = String::with_capacity(template.len());
    let mut last = 0;
    for captures in PLACEHOLDER.captures_iter(template) {
        let Some(whole) = captures.get(0) else {
            continue;
        };
        rendered.push_str(template.get(last..whole.start()).unwrap_or_default());
        let value = lookup(&captures, template, context)?;
        rendered.push_str(&embed(&captures, value, template)?);
        last = whole.end();
    }
    rendered.push_str(template.get(last..).unwrap_or_default());

    Ok(Value::String(rendered))
}

/// Applies [`substitute`] to every string found in `value`, recursively.
pub fn substitute_value(value: &Value, context: &Mapping) -> Result<Value, SubstitutionError> {
    match value {
        Value::String(template) => substitute(template, context),
        Value::Sequence(items) => items
            .iter()
            .map(|item| substitute_value(item, context))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Sequence),
        Value::Mapping(entries) => {
            let mut rendered = Mapping::new();
            for (key, item) in entries {
                rendered.insert(key.clone(), substitute_value(item, context)?);
            }
            Ok(Value::Mapping(rendered))
        }
        other => Ok(other.clone()),
    }
}

fn lookup<'c>(
    captures: &Captures<'_>,
    template: &str,
    context: &'c Mapping,
) -> Result<&'c Value, SubstitutionError> {
    let name = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
    let unresolved = || SubstitutionError::UnresolvedVariable {
        name: name.to_string(),
        template: template.to_string(),
    };

    let mut segments = name.split('.');
    let first = segments.next().ok_or_else(unresolved)?;
    let mut current = context.get(first).ok_or_else(unresolved)?;
    for segment in segments {
        current = current
            .as_mapping()
            .and_then(|m| m.get(segment))
            .ok_or_else(unresolved)?;
    }
    Ok(current)
}

fn embed(
    captures: &Captures<'_>,
    value: &Value,
    template: &str,
) -> Result<String, SubstitutionError> {
    let not_embeddable = |kind| SubstitutionError::NotEmbeddable {
        name: captures
            .get(1)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default(),
        kind,
        template: template.to_string(),
    };
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Err(not_embeddable("null")),
        Value::Sequence(_) => Err(not_embeddable("sequence")),
        Value::Mapping(_) => Err(not_embeddable("mapping")),
        Value::Tagged(_) => Err(not_embeddable("tagged value")),
    }
}
