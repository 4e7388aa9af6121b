//! Suite options: the top-level input to a run

use serde::Deserialize;

use crate::item::{HookDecl, TestItem};

/// A whole suite as declared in `options.yml` plus its test files, or built
/// programmatically.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Suite {
    /// Explicit base URL; wins over `server` and `prefix`.
    pub base: Option<String>,
    /// Host and port, composed into a base URL when `base` is absent.
    pub server: Option<String>,
    /// Path prefix appended to the composed base URL.
    pub prefix: Option<String>,
    /// Use https when composing the base URL from `server`.
    pub https: bool,
    /// Defaults merged into every item before normalization.
    pub defaults: TestItem,
    /// The declared items, in file order.
    pub tests: Vec<TestItem>,
    /// Hooks run once before any item.
    pub before: Option<HookDecl>,
    /// Hooks run once after every item.
    pub after: Option<HookDecl>,
    /// Hooks run before each item's dispatch.
    pub before_each: Option<HookDecl>,
    /// Hooks run after each item's body assertion.
    pub after_each: Option<HookDecl>,
    /// Reporter name; the command line may override it.
    pub output: Option<String>,
}

impl Suite {
    /// The effective base URL: `base` verbatim, otherwise composed from
    /// scheme, `server` and `prefix`. `None` when neither is declared.
    #[must_use]
    pub fn base_url(&self) -> Option<String> {
        if let Some(base) = &self.base {
            return Some(base.clone());
        }
        let server = self.server.as_ref()?;
        let scheme = if self.https { "https" } else { "http" };
        let prefix = self.prefix.as_deref().unwrap_or("");
        Some(format!("{scheme}://{server}{prefix}"))
    }

    /// Appends one test item.
    #[must_use]
    pub fn with_test(mut self, item: TestItem) -> Self {
        self.tests.push(item);
        self
    }
}
