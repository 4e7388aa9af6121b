//! Named context values shared between the suite and its items

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Named values available to `${name}` placeholders.
///
/// A suite-level context persists across the whole run and is mutated by
/// hooks; each item may carry its own layer that wins on conflicting names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context {
    entries: BTreeMap<String, Value>,
}

impl Context {
    /// Creates an empty context.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Looks up a name. Exact matches win; otherwise the lookup is
    /// case-insensitive.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        if let Some(value) = self.entries.get(name) {
            return Some(value);
        }
        self.entries
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }

    /// Returns whether a name resolves, under the same rules as [`get`].
    ///
    /// [`get`]: Self::get
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Sets a value under a name, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(name.into(), value.into());
    }

    /// Key-wise merge producing a new context where `self` wins over `base`.
    #[must_use]
    pub fn layered_over(&self, base: &Self) -> Self {
        let mut entries = base.entries.clone();
        entries.extend(self.entries.clone());
        Self { entries }
    }

    /// Returns whether the context holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }
}

impl FromIterator<(String, Value)> for Context {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// String form of a value, as used for embedded placeholder substitution and
/// header or body rendering. Strings render bare, everything else as compact
/// JSON.
#[must_use]
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_get_prefers_exact_match() {
        let mut context = Context::new();
        context.set("Token", "upper");
        context.set("token", "lower");
        assert_eq!(context.get("token"), Some(&json!("lower")));
        assert_eq!(context.get("Token"), Some(&json!("upper")));
    }

    #[test]
    fn test_get_falls_back_to_case_insensitive() {
        let mut context = Context::new();
        context.set("userId", 42);
        assert_eq!(context.get("USERID"), Some(&json!(42)));
        assert_eq!(context.get("missing"), None);
    }

    #[test]
    fn test_falsy_values_still_resolve() {
        let mut context = Context::new();
        context.set("zero", 0);
        context.set("empty", "");
        context.set("off", false);
        assert!(context.contains("zero"));
        assert!(context.contains("empty"));
        assert!(context.contains("off"));
    }

    #[test]
    fn test_layered_over_self_wins() {
        let base: Context = [
            ("a".to_string(), json!(1)),
            ("b".to_string(), json!("base")),
        ]
        .into_iter()
        .collect();
        let layer: Context = [("b".to_string(), json!("layer"))].into_iter().collect();

        let merged = layer.layered_over(&base);
        assert_eq!(merged.get("a"), Some(&json!(1)));
        assert_eq!(merged.get("b"), Some(&json!("layer")));
    }

    #[test]
    fn test_display_value_forms() {
        assert_eq!(display_value(&json!("plain")), "plain");
        assert_eq!(display_value(&json!(7)), "7");
        assert_eq!(display_value(&json!(true)), "true");
        assert_eq!(display_value(&json!(null)), "null");
        assert_eq!(display_value(&json!({"a": 1})), r#"{"a":1}"#);
    }
}
