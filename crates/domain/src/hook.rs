//! Hook signatures for the suite and item lifecycle points

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::HookError;
use crate::state::ItemState;
use crate::stats::RunStats;

/// Future returned by a hook invocation.
pub type HookFuture<'a> = Pin<Box<dyn Future<Output = Result<(), HookError>> + Send + 'a>>;

/// A hook bound to the whole run. Sees the shared statistics, including the
/// suite-level context.
pub type SuiteHook = Arc<dyn for<'a> Fn(&'a mut RunStats) -> HookFuture<'a> + Send + Sync>;

/// A hook bound to one item. Sees the shared statistics and the item's
/// execution state.
pub type ItemHook =
    Arc<dyn for<'a> Fn(&'a mut RunStats, &'a mut ItemState) -> HookFuture<'a> + Send + Sync>;

/// A computed result check. Receives the raw response body and reports the
/// mismatch detail on failure.
pub type CheckFn = Arc<dyn Fn(&str) -> Result<(), String> + Send + Sync>;

/// Wraps an async closure as a suite-level hook.
pub fn suite_hook<F>(hook: F) -> SuiteHook
where
    F: for<'a> Fn(&'a mut RunStats) -> HookFuture<'a> + Send + Sync + 'static,
{
    Arc::new(hook)
}

/// Wraps an async closure as an item-level hook.
pub fn item_hook<F>(hook: F) -> ItemHook
where
    F: for<'a> Fn(&'a mut RunStats, &'a mut ItemState) -> HookFuture<'a> + Send + Sync + 'static,
{
    Arc::new(hook)
}

/// An ordered list of resolved hooks.
///
/// Carried outside serialization; debug output shows the count only.
#[derive(Clone)]
pub struct HookFns<H>(pub Vec<H>);

impl<H> HookFns<H> {
    /// Returns the number of hooks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the hooks in order.
    pub fn iter(&self) -> std::slice::Iter<'_, H> {
        self.0.iter()
    }
}

impl<H> Default for HookFns<H> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<H> fmt::Debug for HookFns<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("HookFns").field(&self.0.len()).finish()
    }
}

impl<H> From<Vec<H>> for HookFns<H> {
    fn from(hooks: Vec<H>) -> Self {
        Self(hooks)
    }
}

impl<'a, H> IntoIterator for &'a HookFns<H> {
    type Item = &'a H;
    type IntoIter = std::slice::Iter<'a, H>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
