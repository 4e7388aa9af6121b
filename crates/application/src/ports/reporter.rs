//! Output port

use async_trait::async_trait;
use volley_domain::{ItemState, TestSpec};

/// Receives run lifecycle notifications.
///
/// Every method defaults to a no-op so implementations override only the
/// events they render.
#[async_trait]
pub trait Reporter: Send + Sync {
    /// The run is starting against `base`.
    async fn start(&self, base: &str) {
        let _ = base;
    }

    /// An item is about to execute; its descriptor is fully resolved.
    async fn endpoint_start(&self, spec: &TestSpec) {
        let _ = spec;
    }

    /// An item is pausing for its declared wait before dispatch.
    async fn endpoint_wait(&self, spec: &TestSpec) {
        let _ = spec;
    }

    /// An item finished, in success or failure; always emitted once per item.
    async fn endpoint_end(&self, state: &ItemState) {
        let _ = state;
    }

    /// The run finished with `passed` of `total` items passing.
    async fn end(&self, passed: usize, total: usize) {
        let _ = (passed, total);
    }
}

/// The reporter that renders nothing; the default for library use.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

#[async_trait]
impl Reporter for NullReporter {}
