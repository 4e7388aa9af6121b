//! HTTP execution collaborator backed by reqwest.
//!
//! This adapter implements the [`HttpExecutor`] port. It performs the wire
//! exchange and enforces the request's declared status and header
//! expectations, so a mismatch surfaces before any body assertion runs.

use async_trait::async_trait;
use reqwest::redirect::Policy;
use reqwest::{Client, Method, Url};
use tracing::debug;

use volley_application::HttpExecutor;
use volley_domain::{HttpMethod, RequestSpec, ResponseSpec, TransportError};

/// The production HTTP executor.
///
/// The redirect limit is declared per request, so a client is built per
/// dispatch rather than shared; the engine runs items sequentially and never
/// needs connection reuse across them.
#[derive(Debug, Clone)]
pub struct ReqwestExecutor {
    user_agent: String,
}

impl ReqwestExecutor {
    /// Creates an executor with the default user agent.
    #[must_use]
    pub fn new() -> Self {
        Self {
            user_agent: concat!("Volley/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Replaces the user agent sent with every request.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    fn client_for(&self, max_redirects: u32) -> Result<Client, TransportError> {
        let policy = if max_redirects == 0 {
            Policy::none()
        } else {
            Policy::limited(usize::try_from(max_redirects).unwrap_or(usize::MAX))
        };
        Client::builder()
            .user_agent(self.user_agent.clone())
            .redirect(policy)
            .build()
            .map_err(|error| TransportError::Failed(error.to_string()))
    }
}

impl Default for ReqwestExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpExecutor for ReqwestExecutor {
    async fn dispatch(&self, request: &RequestSpec) -> Result<ResponseSpec, TransportError> {
        let url = Url::parse(&request.url).map_err(|error| TransportError::InvalidUrl {
            url: request.url.clone(),
            reason: error.to_string(),
        })?;
        let client = self.client_for(request.max_redirects)?;
        let mut builder = client.request(to_reqwest_method(request.method), url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(credentials) = &request.credentials {
            builder = builder.basic_auth(&credentials.username, credentials.password.as_deref());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }
        debug!(method = %request.method, url = %request.url, "dispatching");
        let response = builder
            .send()
            .await
            .map_err(|error| map_error(&error, request.max_redirects))?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response
            .text()
            .await
            .map_err(|error| map_error(&error, request.max_redirects))?;
        let response = ResponseSpec::new(status, headers, body);
        request.expect.verify(&response)?;
        Ok(response)
    }
}

/// Converts the domain method to its reqwest counterpart.
const fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
        HttpMethod::Head => Method::HEAD,
        HttpMethod::Options => Method::OPTIONS,
        HttpMethod::Trace => Method::TRACE,
        HttpMethod::Connect => Method::CONNECT,
    }
}

/// Maps a reqwest failure onto the domain transport taxonomy.
fn map_error(error: &reqwest::Error, limit: u32) -> TransportError {
    if error.is_timeout() {
        return TransportError::Timeout(error.to_string());
    }
    if error.is_connect() {
        return TransportError::ConnectionFailed(error.to_string());
    }
    if error.is_redirect() {
        return TransportError::TooManyRedirects { limit };
    }
    TransportError::Failed(error.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_method_conversion_covers_every_verb() {
        let verbs = [
            (HttpMethod::Get, Method::GET),
            (HttpMethod::Post, Method::POST),
            (HttpMethod::Put, Method::PUT),
            (HttpMethod::Patch, Method::PATCH),
            (HttpMethod::Delete, Method::DELETE),
            (HttpMethod::Head, Method::HEAD),
            (HttpMethod::Options, Method::OPTIONS),
            (HttpMethod::Trace, Method::TRACE),
            (HttpMethod::Connect, Method::CONNECT),
        ];
        for (ours, theirs) in verbs {
            assert_eq!(to_reqwest_method(ours), theirs);
        }
    }

    #[tokio::test]
    async fn test_unparseable_url_is_an_invalid_url_error() {
        let executor = ReqwestExecutor::new();
        let request = RequestSpec {
            method: HttpMethod::Get,
            url: "not a url".to_string(),
            headers: Vec::new(),
            body: None,
            expect: volley_domain::Expectations::default(),
            max_redirects: 10,
            credentials: None,
        };
        let result = executor.dispatch(&request).await;
        assert!(matches!(result, Err(TransportError::InvalidUrl { .. })));
    }
}
