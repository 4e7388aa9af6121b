//! HTTP execution port

use async_trait::async_trait;
use volley_domain::{RequestSpec, ResponseSpec, TransportError};

/// Port for the HTTP execution collaborator.
///
/// Implementations perform the exchange and enforce the request's declared
/// status and header expectations, so an expectation mismatch surfaces here
/// as a [`TransportError`] before any body assertion runs.
#[async_trait]
pub trait HttpExecutor: Send + Sync {
    /// Performs the exchange described by `request` and returns the observed
    /// response.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when the exchange fails or a declared
    /// expectation does not hold.
    async fn dispatch(&self, request: &RequestSpec) -> Result<ResponseSpec, TransportError>;
}
