//! Per-item execution state

use serde_json::Value;

use crate::error::ItemError;
use crate::request::RequestSpec;
use crate::response::ResponseSpec;
use crate::spec::TestSpec;

/// The mutable record for one item's trip through the pipeline.
///
/// Hooks receive this alongside the run statistics; a `before` hook sees the
/// built request, an `after` hook additionally sees the response and any
/// parsed body.
#[derive(Debug, Clone, Default)]
pub struct ItemState {
    /// The descriptor driving this item.
    pub spec: TestSpec,
    /// The built request, present from the build step onward.
    pub request: Option<RequestSpec>,
    /// The response, present once dispatch succeeded.
    pub response: Option<ResponseSpec>,
    /// The parsed body, present once a shape assertion parsed it.
    pub json: Option<Value>,
    /// The failure recorded for this item, if any.
    pub error: Option<ItemError>,
}

impl ItemState {
    /// Creates the state for one descriptor.
    #[must_use]
    pub fn new(spec: TestSpec) -> Self {
        Self {
            spec,
            request: None,
            response: None,
            json: None,
            error: None,
        }
    }

    /// Whether the item completed without an error.
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.error.is_none()
    }

    /// The raw response body, when a response arrived.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        self.response.as_ref().map(|response| response.body.as_str())
    }
}
