//! Wire-level request description and declared response expectations

use regex::Regex;

use crate::error::TransportError;
use crate::method::HttpMethod;
use crate::response::ResponseSpec;

/// Basic-auth credentials attached to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// The user name.
    pub username: String,
    /// The password, when declared.
    pub password: Option<String>,
}

/// Response expectations declared on an item, enforced by the HTTP execution
/// collaborator before any body assertion runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expectations {
    /// Expected status code, when declared.
    pub status: Option<u16>,
    /// Header name and unanchored regex pattern pairs, checked in order.
    pub headers: Vec<(String, String)>,
}

impl Expectations {
    /// Checks a response against every declared expectation. The status is
    /// checked first, then each header pattern in declaration order.
    ///
    /// # Errors
    ///
    /// Returns the first mismatch, or `InvalidHeaderPattern` when a declared
    /// pattern fails to compile.
    pub fn verify(&self, response: &ResponseSpec) -> Result<(), TransportError> {
        if let Some(expected) = self.status {
            if response.status != expected {
                return Err(TransportError::UnexpectedStatus {
                    expected,
                    actual: response.status,
                });
            }
        }
        for (name, pattern) in &self.headers {
            let regex = Regex::new(pattern).map_err(|error| {
                TransportError::InvalidHeaderPattern {
                    name: name.clone(),
                    pattern: pattern.clone(),
                    reason: error.to_string(),
                }
            })?;
            let Some(actual) = response.get_header(name) else {
                return Err(TransportError::MissingHeader {
                    name: name.clone(),
                    pattern: pattern.clone(),
                });
            };
            if !regex.is_match(actual) {
                return Err(TransportError::HeaderMismatch {
                    name: name.clone(),
                    pattern: pattern.clone(),
                    actual: actual.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// A fully resolved request, ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    /// The HTTP method.
    pub method: HttpMethod,
    /// The absolute request URL.
    pub url: String,
    /// Request headers in declaration order.
    pub headers: Vec<(String, String)>,
    /// The body payload, when present.
    pub body: Option<String>,
    /// Declared response expectations.
    pub expect: Expectations,
    /// Redirect limit; zero disables redirects.
    pub max_redirects: u32,
    /// Basic-auth credentials, when declared.
    pub credentials: Option<Credentials>,
}

impl RequestSpec {
    /// Returns the first request header with the given name,
    /// case-insensitively.
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}
