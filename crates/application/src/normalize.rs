//! Item normalization: raw declarations into canonical descriptors
//!
//! Normalization never fails. Problems found along the way are collected on
//! the descriptor and surface as one validation error when the pipeline
//! checks it, so a malformed item fails alone instead of taking down the
//! file load.

use serde_json::Value;
use std::collections::BTreeMap;

use volley_domain::{
    valid_redirect_limit, valid_status, HookDecl, HookFns, ItemError, ItemHook, NumberOrRef,
    ResultDecl, ResultRule, TestItem, TestSpec,
};

use crate::registry::Registry;

/// Builds canonical descriptors from raw items plus suite defaults.
///
/// Hook and check names resolve through the injected registry.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer<'a> {
    defaults: &'a TestItem,
    registry: &'a Registry,
}

impl<'a> Normalizer<'a> {
    /// Creates a normalizer over the suite defaults and registry.
    #[must_use]
    pub const fn new(defaults: &'a TestItem, registry: &'a Registry) -> Self {
        Self { defaults, registry }
    }

    /// Normalizes one raw item into its canonical descriptor.
    #[must_use]
    pub fn normalize(&self, item: &TestItem) -> TestSpec {
        let merged = item.clone().defaulted_from(self.defaults);
        let mut issues = Vec::new();

        if merged.derive.is_some() {
            issues.push("a derive fragment may not declare derive itself".to_string());
        }

        let (method, body) = resolve_method_and_body(&merged, &mut issues);
        let path = resolve_path(&merged, &mut issues);

        // Absent and non-numeric priorities both take the default; a typo'd
        // priority reorders the run, it never fails the item.
        let priority = merged
            .priority
            .as_ref()
            .and_then(Value::as_f64)
            .unwrap_or(1.0);

        let code = numeric_field(merged.code.as_ref(), "code", &mut issues);
        let max_redirects = numeric_field(merged.max_redirects.as_ref(), "maxRedirects", &mut issues)
            .unwrap_or(NumberOrRef::Number(10.0));

        let wait_ms = match merged.wait.as_ref().map(Value::as_f64) {
            None => None,
            Some(Some(ms)) if ms >= 0.0 => Some(to_millis(ms)),
            Some(_) => {
                issues.push("wait must be a non-negative number of milliseconds".to_string());
                None
            }
        };

        let mut request_headers = merged.request_header.clone();
        let mut response_headers = merged.response_header.clone();
        if merged.json.is_some() {
            if !has_header(&request_headers, "Accept") {
                request_headers.insert(
                    "Accept".to_string(),
                    Value::String("application/json".to_string()),
                );
            }
            if !has_header(&response_headers, "Content-Type") {
                response_headers.insert(
                    "Content-Type".to_string(),
                    Value::String("application/json".to_string()),
                );
            }
        }

        let before = self.item_hooks(merged.before.as_ref(), &mut issues);
        let after = self.item_hooks(merged.after.as_ref(), &mut issues);

        if merged.json.is_some() && merged.result.is_some() {
            issues.push("'json' and 'result' are mutually exclusive".to_string());
        }
        let result = self.resolve_result(merged.result.as_ref(), &mut issues);

        TestSpec {
            method,
            path,
            note: merged.note,
            priority,
            code,
            max_redirects,
            body,
            request_headers,
            response_headers,
            context: merged.context,
            json: merged.json,
            result,
            wait_ms,
            username: merged.username,
            password: merged.password,
            before,
            after,
            issues,
        }
    }

    fn item_hooks(&self, decl: Option<&HookDecl>, issues: &mut Vec<String>) -> HookFns<ItemHook> {
        let mut hooks = Vec::new();
        if let Some(decl) = decl {
            for name in decl.names() {
                match self.registry.item_hook(name) {
                    Some(hook) => hooks.push(hook),
                    None => issues.push(format!("unknown hook '{name}'")),
                }
            }
        }
        HookFns(hooks)
    }

    fn resolve_result(
        &self,
        decl: Option<&ResultDecl>,
        issues: &mut Vec<String>,
    ) -> Option<ResultRule> {
        match decl {
            None => None,
            Some(ResultDecl::Literal(expected)) => Some(ResultRule::Literal(expected.clone())),
            Some(ResultDecl::Named { check }) => match self.registry.check(check) {
                Some(check_fn) => Some(ResultRule::Computed(check_fn)),
                None => {
                    issues.push(format!("unknown check '{check}'"));
                    None
                }
            },
        }
    }
}

/// The pipeline's first step: rejects a descriptor whose normalization
/// collected issues or whose resolved numbers are out of range. The error
/// embeds the descriptor dump.
///
/// # Errors
///
/// Returns a descriptor validation error listing every problem.
pub fn validate(spec: &TestSpec) -> Result<(), ItemError> {
    let mut problems = spec.issues.clone();
    if let Some(NumberOrRef::Number(number)) = &spec.code {
        if !valid_status(*number) {
            problems.push(format!(
                "expected status {number} must be an integer between 100 and 999"
            ));
        }
    }
    if let NumberOrRef::Number(number) = &spec.max_redirects {
        if !valid_redirect_limit(*number) {
            problems.push(format!(
                "redirect limit {number} must be a non-negative integer"
            ));
        }
    }
    if problems.is_empty() {
        Ok(())
    } else {
        Err(ItemError::spec(problems.join("; "), spec.dump()))
    }
}

/// Picks the method and the body it carries.
///
/// Precedence: a body verb field wins, then `get`, then an explicit
/// `method`, then GET. The non-body sources carry the generic `data`
/// payload when one is declared.
fn resolve_method_and_body(item: &TestItem, issues: &mut Vec<String>) -> (String, Option<Value>) {
    let mut declared = Vec::new();
    if item.post.is_some() {
        declared.push("post");
    }
    if item.put.is_some() {
        declared.push("put");
    }
    if item.patch.is_some() {
        declared.push("patch");
    }
    if item.head.is_some() {
        declared.push("head");
    }
    if item.method.is_some() {
        declared.push("method");
    }
    if declared.len() > 1 {
        issues.push(format!(
            "conflicting method declarations: {}",
            declared.join(", ")
        ));
    }

    if let Some(body) = &item.post {
        return ("POST".to_string(), Some(body.clone()));
    }
    if let Some(body) = &item.put {
        return ("PUT".to_string(), Some(body.clone()));
    }
    if let Some(body) = &item.patch {
        return ("PATCH".to_string(), Some(body.clone()));
    }
    if let Some(body) = &item.head {
        return ("HEAD".to_string(), Some(body.clone()));
    }
    if item.get.as_deref().is_some_and(|query| !query.is_empty()) {
        return ("GET".to_string(), item.data.clone());
    }
    if let Some(method) = &item.method {
        return (method.clone(), item.data.clone());
    }
    ("GET".to_string(), item.data.clone())
}

/// Appends the `get` query string to the path, replacing any query the path
/// already carries. An empty `get` reads as absent and leaves the path
/// alone.
fn resolve_path(item: &TestItem, issues: &mut Vec<String>) -> String {
    let path = item.path.clone().unwrap_or_default();
    let Some(query) = item.get.as_deref().filter(|query| !query.is_empty()) else {
        return path;
    };
    if query.starts_with('?') {
        issues.push("'get' must be a query string without a leading '?'".to_string());
    }
    let stem = path.split('?').next().unwrap_or_default();
    format!("{stem}?{query}")
}

fn numeric_field(
    value: Option<&Value>,
    field: &str,
    issues: &mut Vec<String>,
) -> Option<NumberOrRef> {
    let value = value?;
    let converted = NumberOrRef::from_value(value);
    if converted.is_none() {
        issues.push(format!("{field} must be a number or placeholder"));
    }
    converted
}

fn has_header(headers: &BTreeMap<String, Value>, name: &str) -> bool {
    headers.keys().any(|key| key.eq_ignore_ascii_case(name))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_millis(ms: f64) -> u64 {
    ms as u64
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use volley_domain::item_hook;

    fn item_from(value: Value) -> TestItem {
        serde_json::from_value(value).unwrap()
    }

    fn normalize(item: Value) -> TestSpec {
        let defaults = TestItem::default();
        let registry = Registry::new();
        Normalizer::new(&defaults, &registry).normalize(&item_from(item))
    }

    #[test]
    fn test_bare_item_defaults() {
        let spec = normalize(json!({"path": "/ping"}));
        assert_eq!(spec.method, "GET");
        assert_eq!(spec.path, "/ping");
        assert_eq!(spec.priority, 1.0);
        assert_eq!(spec.max_redirects, NumberOrRef::Number(10.0));
        assert_eq!(spec.code, None);
        assert!(spec.issues.is_empty());
        assert!(validate(&spec).is_ok());
    }

    #[test]
    fn test_body_verb_implies_method() {
        let spec = normalize(json!({"path": "/users", "post": {"name": "ada"}}));
        assert_eq!(spec.method, "POST");
        assert_eq!(spec.body, Some(json!({"name": "ada"})));

        let spec = normalize(json!({"path": "/users/1", "put": "raw"}));
        assert_eq!(spec.method, "PUT");
        assert_eq!(spec.body, Some(json!("raw")));
    }

    #[test]
    fn test_null_body_verb_reads_as_absent() {
        // An explicit `post: null` deserializes to no `post` field at all,
        // so nothing implies POST and the generic payload rides on a GET.
        let spec = normalize(json!({"path": "/users", "post": null, "data": {"id": 1}}));
        assert_eq!(spec.method, "GET");
        assert_eq!(spec.body, Some(json!({"id": 1})));
        assert!(spec.issues.is_empty());
    }

    #[test]
    fn test_get_appends_query_and_implies_get() {
        let spec = normalize(json!({"path": "/users", "get": "id=5&sort=asc"}));
        assert_eq!(spec.method, "GET");
        assert_eq!(spec.path, "/users?id=5&sort=asc");
    }

    #[test]
    fn test_get_replaces_existing_query() {
        let spec = normalize(json!({"path": "/users?old=1", "get": "new=2"}));
        assert_eq!(spec.path, "/users?new=2");
    }

    #[test]
    fn test_get_outranks_explicit_method() {
        let spec = normalize(json!({"path": "/users", "method": "delete", "get": "force=1"}));
        assert_eq!(spec.method, "GET");
        assert_eq!(spec.path, "/users?force=1");
        assert!(spec.issues.is_empty());
    }

    #[test]
    fn test_empty_get_reads_as_absent() {
        let spec = normalize(json!({"path": "/users", "method": "delete", "get": ""}));
        assert_eq!(spec.method, "delete");
        assert_eq!(spec.path, "/users");
        assert!(spec.issues.is_empty());
    }

    #[test]
    fn test_conflicting_method_declarations_flagged() {
        let spec = normalize(json!({"path": "/x", "post": {"a": 1}, "method": "PUT"}));
        assert_eq!(spec.method, "POST");
        assert_eq!(
            spec.issues,
            vec!["conflicting method declarations: post, method".to_string()]
        );
        assert!(validate(&spec).is_err());
    }

    #[test]
    fn test_explicit_method_with_data() {
        let spec = normalize(json!({"path": "/x", "method": "options", "data": "probe"}));
        assert_eq!(spec.method, "options");
        assert_eq!(spec.body, Some(json!("probe")));
    }

    #[test]
    fn test_priority_defaults_when_absent_or_non_numeric() {
        let spec = normalize(json!({"path": "/x"}));
        assert_eq!(spec.priority, 1.0);

        let spec = normalize(json!({"path": "/x", "priority": "high"}));
        assert_eq!(spec.priority, 1.0);
        assert!(spec.issues.is_empty());
        assert!(validate(&spec).is_ok());
    }

    #[test]
    fn test_json_implies_content_negotiation_headers() {
        let spec = normalize(json!({"path": "/x", "json": {"id": "number"}}));
        assert_eq!(
            spec.request_headers.get("Accept"),
            Some(&json!("application/json"))
        );
        assert_eq!(
            spec.response_headers.get("Content-Type"),
            Some(&json!("application/json"))
        );
    }

    #[test]
    fn test_json_convenience_respects_author_headers() {
        let spec = normalize(json!({
            "path": "/x",
            "json": "object",
            "requestHeader": {"accept": "application/vnd.api+json"},
        }));
        assert_eq!(spec.request_headers.len(), 1);
        assert_eq!(
            spec.request_headers.get("accept"),
            Some(&json!("application/vnd.api+json"))
        );
    }

    #[test]
    fn test_json_and_result_are_mutually_exclusive() {
        let spec = normalize(json!({"path": "/x", "json": "object", "result": "ok"}));
        assert_eq!(
            spec.issues,
            vec!["'json' and 'result' are mutually exclusive".to_string()]
        );
    }

    #[test]
    fn test_unknown_hook_and_check_collected() {
        let spec = normalize(json!({
            "path": "/x",
            "before": ["missing"],
            "result": {"check": "gone"},
        }));
        assert_eq!(
            spec.issues,
            vec![
                "unknown hook 'missing'".to_string(),
                "unknown check 'gone'".to_string(),
            ]
        );
        let error = validate(&spec).unwrap_err();
        let message = error.to_string();
        assert!(message.contains("unknown hook 'missing'"));
        assert!(message.contains("\"path\": \"/x\""));
    }

    #[test]
    fn test_registered_hooks_bind_in_order() {
        let defaults = TestItem::default();
        let mut registry = Registry::new();
        registry.register_item_hook("first", item_hook(|_, _| Box::pin(async { Ok(()) })));
        registry.register_item_hook("second", item_hook(|_, _| Box::pin(async { Ok(()) })));
        let normalizer = Normalizer::new(&defaults, &registry);

        let spec = normalizer.normalize(&item_from(json!({
            "path": "/x",
            "before": ["first", "second"],
            "after": "first",
        })));
        assert_eq!(spec.before.len(), 2);
        assert_eq!(spec.after.len(), 1);
        assert!(spec.issues.is_empty());
    }

    #[test]
    fn test_defaults_fill_into_every_item() {
        let defaults = item_from(json!({
            "code": 200,
            "context": {"base": "v1"},
            "requestHeader": {"Accept": "${base}"},
        }));
        let registry = Registry::new();
        let normalizer = Normalizer::new(&defaults, &registry);

        let spec = normalizer.normalize(&item_from(json!({"path": "/users"})));
        assert_eq!(spec.code, Some(NumberOrRef::Number(200.0)));
        assert_eq!(spec.context.get("base"), Some(&json!("v1")));
        assert_eq!(spec.request_headers.get("Accept"), Some(&json!("${base}")));
    }

    #[test]
    fn test_wait_converts_to_millis() {
        let spec = normalize(json!({"path": "/x", "wait": 250}));
        assert_eq!(spec.wait_ms, Some(250));

        let bad = normalize(json!({"path": "/x", "wait": -5}));
        assert_eq!(bad.wait_ms, None);
        assert!(!bad.issues.is_empty());
    }

    #[test]
    fn test_validate_rejects_out_of_range_code() {
        let spec = normalize(json!({"path": "/x", "code": 42}));
        assert!(spec.issues.is_empty());
        let error = validate(&spec).unwrap_err();
        assert!(error
            .to_string()
            .contains("expected status 42 must be an integer between 100 and 999"));
    }

    #[test]
    fn test_validate_rejects_negative_redirects() {
        let spec = normalize(json!({"path": "/x", "maxRedirects": -1}));
        assert!(validate(&spec).is_err());
    }

    #[test]
    fn test_templated_code_passes_validation() {
        let spec = normalize(json!({"path": "/x", "code": "${status}"}));
        assert_eq!(spec.code, Some(NumberOrRef::Reference("${status}".to_string())));
        assert!(validate(&spec).is_ok());
    }

    #[test]
    fn test_nested_derive_is_flagged() {
        let spec = normalize(json!({"path": "/x", "derive": [{"get": "a=1"}]}));
        assert_eq!(
            spec.issues,
            vec!["a derive fragment may not declare derive itself".to_string()]
        );
    }
}
