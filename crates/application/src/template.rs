//! `${name}` context substitution
//!
//! Substitution is a single pass: values substituted in are never scanned
//! again, so a context value containing `${...}` stays as-is.

use serde_json::Value;
use std::ops::Range;

use volley_domain::{display_value, Context, NumberOrRef, TestSpec};

/// One placeholder occurrence inside a string.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Placeholder {
    /// The name between `${` and `}`.
    name: String,
    /// Byte span of the whole `${name}` form.
    span: Range<usize>,
}

/// Scans a string for `${name}` placeholders, left to right. An empty
/// `${}` is not a placeholder and stays literal.
fn placeholders(input: &str) -> Vec<Placeholder> {
    let mut found = Vec::new();
    let mut cursor = 0;
    while let Some(offset) = input[cursor..].find("${") {
        let start = cursor + offset;
        let Some(close) = input[start + 2..].find('}') else {
            break;
        };
        let end = start + 2 + close + 1;
        let name = &input[start + 2..end - 1];
        if name.is_empty() {
            cursor = start + 2;
            continue;
        }
        found.push(Placeholder {
            name: name.to_string(),
            span: start..end,
        });
        cursor = end;
    }
    found
}

/// Substitutes placeholders in one string.
///
/// A string that is exactly one placeholder resolves to the raw context
/// value, preserving its type. Embedded placeholders substitute the string
/// form of their value. An unresolved name substitutes the name itself.
#[must_use]
pub fn resolve_str(input: &str, context: &Context) -> Value {
    let found = placeholders(input);
    if found.is_empty() {
        return Value::String(input.to_string());
    }
    if found.len() == 1 && found[0].span == (0..input.len()) {
        let name = &found[0].name;
        return context
            .get(name)
            .cloned()
            .unwrap_or_else(|| Value::String(name.clone()));
    }
    let mut output = String::with_capacity(input.len());
    let mut copied = 0;
    for placeholder in &found {
        output.push_str(&input[copied..placeholder.span.start]);
        match context.get(&placeholder.name) {
            Some(value) => output.push_str(&display_value(value)),
            None => output.push_str(&placeholder.name),
        }
        copied = placeholder.span.end;
    }
    output.push_str(&input[copied..]);
    Value::String(output)
}

/// Substitutes placeholders in every string leaf of a value, recursively.
#[must_use]
pub fn resolve_value(value: &Value, context: &Context) -> Value {
    match value {
        Value::String(text) => resolve_str(text, context),
        Value::Array(elements) => Value::Array(
            elements
                .iter()
                .map(|element| resolve_value(element, context))
                .collect(),
        ),
        Value::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(key, field)| (key.clone(), resolve_value(field, context)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Substitutes placeholders in a field that must stay a string; non-string
/// resolutions take their string form.
#[must_use]
pub fn resolve_text(input: &str, context: &Context) -> String {
    match resolve_str(input, context) {
        Value::String(text) => text,
        other => display_value(&other),
    }
}

/// Substitutes a numeric field that may hold a reference. A reference
/// resolving to a number becomes that number; anything else stays a
/// reference and fails later, when the request is built.
#[must_use]
pub fn resolve_number(rule: &NumberOrRef, context: &Context) -> NumberOrRef {
    match rule {
        NumberOrRef::Number(number) => NumberOrRef::Number(*number),
        NumberOrRef::Reference(text) => match resolve_str(text, context) {
            Value::Number(number) => number
                .as_f64()
                .map_or_else(|| NumberOrRef::Reference(text.clone()), NumberOrRef::Number),
            other => NumberOrRef::Reference(display_value(&other)),
        },
    }
}

/// Applies context substitution across a whole descriptor, in place.
///
/// The item layer is merged over the suite layer first and the merged view
/// is written back to the descriptor, so hooks running later observe it.
pub fn resolve_spec(spec: &mut TestSpec, suite_context: &Context) {
    let merged = spec.context.layered_over(suite_context);
    spec.method = resolve_text(&spec.method, &merged);
    spec.path = resolve_text(&spec.path, &merged);
    spec.code = spec
        .code
        .as_ref()
        .map(|code| resolve_number(code, &merged));
    spec.max_redirects = resolve_number(&spec.max_redirects, &merged);
    spec.body = spec.body.as_ref().map(|body| resolve_value(body, &merged));
    for value in spec.request_headers.values_mut() {
        *value = resolve_value(value, &merged);
    }
    for value in spec.response_headers.values_mut() {
        *value = resolve_value(value, &merged);
    }
    spec.username = spec
        .username
        .as_ref()
        .map(|username| resolve_text(username, &merged));
    spec.password = spec
        .password
        .as_ref()
        .map(|password| resolve_text(password, &merged));
    spec.context = merged;
}
