//! Raw test items as authors declare them

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::context::Context;

/// A numeric field that may still hold a `${name}` reference until context
/// substitution resolves it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberOrRef {
    /// A resolved number.
    Number(f64),
    /// An unresolved placeholder string.
    Reference(String),
}

impl NumberOrRef {
    /// Converts a raw value. Numbers and strings convert; anything else is
    /// rejected.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(number) => number.as_f64().map(Self::Number),
            Value::String(text) => Some(Self::Reference(text.clone())),
            _ => None,
        }
    }

    /// Returns the resolved number, if any.
    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(number) => Some(*number),
            Self::Reference(_) => None,
        }
    }
}

/// Hooks as declared in suite data: a single registered name or a list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum HookDecl {
    /// One hook name.
    One(String),
    /// An ordered list of hook names.
    Many(Vec<String>),
}

impl HookDecl {
    /// The declared names in order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        match self {
            Self::One(name) => std::slice::from_ref(name),
            Self::Many(names) => names,
        }
    }
}

/// A result expectation as declared: a literal body or a named check.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ResultDecl {
    /// The raw body must equal this string exactly.
    Literal(String),
    /// A registered check receives the raw body.
    Named {
        /// The registered check name.
        check: String,
    },
}

/// One raw test item, straight from suite data.
///
/// Numeric fields stay as plain values here so a type mistake surfaces as a
/// validation error on that item at run time rather than failing the whole
/// file load.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TestItem {
    /// Explicit HTTP method; lowest method precedence.
    pub method: Option<String>,
    /// Request path, absolute URLs override the suite base.
    pub path: Option<String>,
    /// Query string to append to the path; implies GET when no body verb or
    /// explicit method is declared.
    pub get: Option<String>,
    /// POST body; implies POST.
    pub post: Option<Value>,
    /// PUT body; implies PUT.
    pub put: Option<Value>,
    /// PATCH body; implies PATCH.
    pub patch: Option<Value>,
    /// HEAD payload; implies HEAD.
    pub head: Option<Value>,
    /// Generic body used when no body verb carries one.
    pub data: Option<Value>,
    /// Item-level context layer; wins over the suite layer.
    pub context: Context,
    /// Request headers.
    pub request_header: BTreeMap<String, Value>,
    /// Response header expectations, values are unanchored regex patterns.
    pub response_header: BTreeMap<String, Value>,
    /// Scheduling priority; defaults to 1.
    pub priority: Option<Value>,
    /// Expected response status.
    pub code: Option<Value>,
    /// JSON shape the response body must match.
    pub json: Option<Value>,
    /// Expected response body, literal or named check.
    pub result: Option<ResultDecl>,
    /// Redirect limit; defaults to 10.
    pub max_redirects: Option<Value>,
    /// Milliseconds to pause before dispatch.
    pub wait: Option<Value>,
    /// Free-form annotation carried onto the descriptor.
    pub note: Option<String>,
    /// Basic-auth user name; presence enables basic auth.
    pub username: Option<String>,
    /// Basic-auth password.
    pub password: Option<String>,
    /// Hooks to run before dispatch, after the suite-level ones.
    pub before: Option<HookDecl>,
    /// Hooks to run after the body assertion, before the suite-level ones.
    pub after: Option<HookDecl>,
    /// Variant fragments; each replaces this item after default-filling from
    /// it.
    pub derive: Option<Vec<TestItem>>,
}

impl TestItem {
    /// One-shot default fill: fields absent here copy from `base`; the
    /// context and header maps merge key-wise with `self` winning. `base`'s
    /// `derive` list is never copied.
    #[must_use]
    pub fn defaulted_from(mut self, base: &Self) -> Self {
        self.method = self.method.or_else(|| base.method.clone());
        self.path = self.path.or_else(|| base.path.clone());
        self.get = self.get.or_else(|| base.get.clone());
        self.post = self.post.or_else(|| base.post.clone());
        self.put = self.put.or_else(|| base.put.clone());
        self.patch = self.patch.or_else(|| base.patch.clone());
        self.head = self.head.or_else(|| base.head.clone());
        self.data = self.data.or_else(|| base.data.clone());
        self.context = self.context.layered_over(&base.context);
        self.request_header = merge_keywise(&base.request_header, &self.request_header);
        self.response_header = merge_keywise(&base.response_header, &self.response_header);
        self.priority = self.priority.or_else(|| base.priority.clone());
        self.code = self.code.or_else(|| base.code.clone());
        self.json = self.json.or_else(|| base.json.clone());
        self.result = self.result.or_else(|| base.result.clone());
        self.max_redirects = self.max_redirects.or_else(|| base.max_redirects.clone());
        self.wait = self.wait.or_else(|| base.wait.clone());
        self.note = self.note.or_else(|| base.note.clone());
        self.username = self.username.or_else(|| base.username.clone());
        self.password = self.password.or_else(|| base.password.clone());
        self.before = self.before.or_else(|| base.before.clone());
        self.after = self.after.or_else(|| base.after.clone());
        self
    }
}

fn merge_keywise(
    base: &BTreeMap<String, Value>,
    winner: &BTreeMap<String, Value>,
) -> BTreeMap<String, Value> {
    let mut merged = base.clone();
    merged.extend(winner.clone());
    merged
}
