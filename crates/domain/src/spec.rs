//! Canonical test descriptors
//!
//! A [`TestSpec`] is the normalized form of one raw item: defaults merged,
//! method and body resolved, hooks and checks bound. Every raw item yields
//! exactly one descriptor before the run order is fixed.

use serde::ser::Serializer;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::context::{display_value, Context};
use crate::error::{ItemError, UnsupportedMethod};
use crate::hook::{CheckFn, HookFns, ItemHook};
use crate::item::NumberOrRef;
use crate::method::HttpMethod;
use crate::request::{Credentials, Expectations, RequestSpec};

/// A resolved result expectation.
#[derive(Clone)]
pub enum ResultRule {
    /// The raw body must equal this string exactly.
    Literal(String),
    /// A computed check receives the raw body.
    Computed(CheckFn),
}

impl fmt::Debug for ResultRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(expected) => f.debug_tuple("Literal").field(expected).finish(),
            Self::Computed(_) => write!(f, "Computed(..)"),
        }
    }
}

impl Serialize for ResultRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Literal(expected) => serializer.serialize_str(expected),
            Self::Computed(_) => serializer.serialize_str("<computed check>"),
        }
    }
}

/// A normalized item: everything the pipeline needs to run one request.
///
/// Serializes into the diagnostic dump embedded in validation errors; the
/// bound hooks and the collected issues stay out of the dump.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestSpec {
    /// Resolved method source; matched against the verb set when the request
    /// is built.
    pub method: String,
    /// Request path, with any `get` query string already appended.
    pub path: String,
    /// Free-form annotation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Scheduling priority.
    pub priority: f64,
    /// Expected response status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<NumberOrRef>,
    /// Redirect limit.
    pub max_redirects: NumberOrRef,
    /// Request body payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    /// Request headers.
    #[serde(rename = "requestHeader", skip_serializing_if = "BTreeMap::is_empty")]
    pub request_headers: BTreeMap<String, Value>,
    /// Response header expectations.
    #[serde(rename = "responseHeader", skip_serializing_if = "BTreeMap::is_empty")]
    pub response_headers: BTreeMap<String, Value>,
    /// Item-level context; replaced by the merged view during substitution.
    #[serde(skip_serializing_if = "Context::is_empty")]
    pub context: Context,
    /// JSON shape the response body must match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json: Option<Value>,
    /// Bound result expectation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ResultRule>,
    /// Milliseconds to pause before dispatch.
    #[serde(rename = "wait", skip_serializing_if = "Option::is_none")]
    pub wait_ms: Option<u64>,
    /// Basic-auth user name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Basic-auth password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Hooks bound to run before dispatch.
    #[serde(skip)]
    pub before: HookFns<ItemHook>,
    /// Hooks bound to run after the body assertion.
    #[serde(skip)]
    pub after: HookFns<ItemHook>,
    /// Problems collected during normalization; surfaced by validation.
    #[serde(skip)]
    pub issues: Vec<String>,
}

impl Default for TestSpec {
    fn default() -> Self {
        Self {
            method: "GET".to_string(),
            path: String::new(),
            note: None,
            priority: 1.0,
            code: None,
            max_redirects: NumberOrRef::Number(10.0),
            body: None,
            request_headers: BTreeMap::new(),
            response_headers: BTreeMap::new(),
            context: Context::new(),
            json: None,
            result: None,
            wait_ms: None,
            username: None,
            password: None,
            before: HookFns::default(),
            after: HookFns::default(),
            issues: Vec::new(),
        }
    }
}

impl TestSpec {
    /// Serializes the descriptor for embedding in diagnostics.
    #[must_use]
    pub fn dump(&self) -> String {
        serde_json::to_string_pretty(self)
            .unwrap_or_else(|_| "<unserializable descriptor>".to_string())
    }

    /// Builds the wire request. `base` supplies the origin unless `path` is
    /// itself an absolute URL.
    ///
    /// # Errors
    ///
    /// Returns a descriptor validation error when the method names no known
    /// verb or a numeric field did not resolve to a usable number.
    pub fn build_request(&self, base: &str) -> Result<RequestSpec, ItemError> {
        let method: HttpMethod = self
            .method
            .parse()
            .map_err(|error: UnsupportedMethod| ItemError::spec(error.to_string(), self.dump()))?;
        let url = if is_absolute_url(&self.path) {
            self.path.clone()
        } else {
            format!("{base}{}", self.path)
        };
        let status = match &self.code {
            None => None,
            Some(NumberOrRef::Number(number)) => Some(to_status(*number).ok_or_else(|| {
                ItemError::spec(
                    format!("expected status {number} must be an integer between 100 and 999"),
                    self.dump(),
                )
            })?),
            Some(NumberOrRef::Reference(text)) => {
                return Err(ItemError::spec(
                    format!("expected status '{text}' did not resolve to a number"),
                    self.dump(),
                ));
            }
        };
        let max_redirects = match &self.max_redirects {
            NumberOrRef::Number(number) => to_redirect_limit(*number).ok_or_else(|| {
                ItemError::spec(
                    format!("redirect limit {number} must be a non-negative integer"),
                    self.dump(),
                )
            })?,
            NumberOrRef::Reference(text) => {
                return Err(ItemError::spec(
                    format!("redirect limit '{text}' did not resolve to a number"),
                    self.dump(),
                ));
            }
        };
        let credentials = self
            .username
            .as_ref()
            .filter(|username| !username.is_empty())
            .map(|username| Credentials {
                username: username.clone(),
                password: self.password.clone(),
            });
        Ok(RequestSpec {
            method,
            url,
            headers: rendered_headers(&self.request_headers),
            body: self
                .body
                .as_ref()
                .filter(|body| !body.is_null())
                .map(display_value),
            expect: Expectations {
                status,
                headers: rendered_headers(&self.response_headers),
            },
            max_redirects,
            credentials,
        })
    }
}

fn is_absolute_url(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://")
}

/// Renders header values to strings, dropping null and empty entries.
fn rendered_headers(headers: &BTreeMap<String, Value>) -> Vec<(String, String)> {
    headers
        .iter()
        .filter(|(_, value)| !value.is_null() && value.as_str() != Some(""))
        .map(|(name, value)| (name.clone(), display_value(value)))
        .collect()
}

/// Whether a resolved number is usable as an expected status.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn valid_status(number: f64) -> bool {
    (100.0..=999.0).contains(&number) && number.fract() == 0.0
}

/// Whether a resolved number is usable as a redirect limit.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn valid_redirect_limit(number: f64) -> bool {
    number >= 0.0 && number <= f64::from(u32::MAX) && number.fract() == 0.0
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_status(number: f64) -> Option<u16> {
    valid_status(number).then(|| number as u16)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_redirect_limit(number: f64) -> Option<u32> {
    valid_redirect_limit(number).then(|| number as u32)
}
