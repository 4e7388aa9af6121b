//! Domain error types

use thiserror::Error;

/// An HTTP method string that names no known verb.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unsupported HTTP method: {0}")]
pub struct UnsupportedMethod(pub String);

/// A failure signalled by a hook.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct HookError(pub String);

impl From<String> for HookError {
    fn from(message: String) -> Self {
        Self(message)
    }
}

impl From<&str> for HookError {
    fn from(message: &str) -> Self {
        Self(message.to_string())
    }
}

/// Transport-level failures and declared expectation mismatches surfaced by
/// the HTTP execution collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request URL could not be parsed.
    #[error("invalid request URL '{url}': {reason}")]
    InvalidUrl {
        /// The offending URL.
        url: String,
        /// Parser detail.
        reason: String,
    },

    /// The connection could not be established.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The exchange timed out.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The redirect chain exceeded the declared limit.
    #[error("redirect limit of {limit} exceeded")]
    TooManyRedirects {
        /// The declared limit.
        limit: u32,
    },

    /// Any other failure while sending the request or reading the response.
    #[error("request failed: {0}")]
    Failed(String),

    /// The response status did not match the declared expectation.
    #[error("expected status {expected}, got {actual}")]
    UnexpectedStatus {
        /// Declared status.
        expected: u16,
        /// Received status.
        actual: u16,
    },

    /// A declared header expectation named a header the response lacks.
    #[error("missing expected header '{name}' (pattern '{pattern}')")]
    MissingHeader {
        /// Header name.
        name: String,
        /// Declared pattern.
        pattern: String,
    },

    /// A response header did not match its declared pattern.
    #[error("expected header '{name}' to match '{pattern}', got '{actual}'")]
    HeaderMismatch {
        /// Header name.
        name: String,
        /// Declared pattern.
        pattern: String,
        /// Received value.
        actual: String,
    },

    /// A declared header pattern is not a valid regular expression.
    #[error("invalid header pattern '{pattern}' for '{name}': {reason}")]
    InvalidHeaderPattern {
        /// Header name.
        name: String,
        /// Declared pattern.
        pattern: String,
        /// Parser detail.
        reason: String,
    },
}

/// Any failure recorded against a single item's execution.
///
/// An item error aborts the remaining steps of that item only; the suite
/// carries on with the next item.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ItemError {
    /// The canonical descriptor failed validation. The message embeds a
    /// serialized dump of the offending descriptor.
    #[error("invalid test specification: {message}\n{spec}")]
    Spec {
        /// What is wrong with the descriptor.
        message: String,
        /// Serialized descriptor dump.
        spec: String,
    },

    /// The exchange failed or violated a declared expectation.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A shape assertion was declared but the body is not valid JSON.
    #[error("response body is not valid JSON: {message}\nbody: {body}")]
    ResponseParse {
        /// Parser detail.
        message: String,
        /// The raw body.
        body: String,
    },

    /// The response body failed its declared assertion.
    #[error("{detail}\nbody: {body}")]
    Assertion {
        /// What did not match.
        detail: String,
        /// The raw body.
        body: String,
    },

    /// A hook attached to the item failed.
    #[error("hook failed: {0}")]
    Hook(#[from] HookError),
}

impl ItemError {
    /// Builds a descriptor validation error.
    #[must_use]
    pub fn spec(message: impl Into<String>, spec: impl Into<String>) -> Self {
        Self::Spec {
            message: message.into(),
            spec: spec.into(),
        }
    }

    /// Builds a body assertion error.
    #[must_use]
    pub fn assertion(detail: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Assertion {
            detail: detail.into(),
            body: body.into(),
        }
    }
}
