//! Named hooks and checks for data-only suites
//!
//! Suite data can only carry names. The registry is the explicit table those
//! names resolve against; it is injected into the runner rather than living
//! in any ambient global state.

use std::collections::HashMap;
use std::fmt;

use volley_domain::{CheckFn, ItemHook, SuiteHook};

/// A name-to-behavior table for hooks and computed checks.
#[derive(Clone, Default)]
pub struct Registry {
    suite_hooks: HashMap<String, SuiteHook>,
    item_hooks: HashMap<String, ItemHook>,
    checks: HashMap<String, CheckFn>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a suite-level hook, usable from `before` and `after`.
    pub fn register_suite_hook(&mut self, name: impl Into<String>, hook: SuiteHook) {
        self.suite_hooks.insert(name.into(), hook);
    }

    /// Registers an item-level hook, usable from `beforeEach`, `afterEach`
    /// and item `before` and `after` declarations.
    pub fn register_item_hook(&mut self, name: impl Into<String>, hook: ItemHook) {
        self.item_hooks.insert(name.into(), hook);
    }

    /// Registers a computed result check, usable from `result: {check: name}`
    /// declarations.
    pub fn register_check(&mut self, name: impl Into<String>, check: CheckFn) {
        self.checks.insert(name.into(), check);
    }

    /// Resolves a suite-level hook name.
    #[must_use]
    pub fn suite_hook(&self, name: &str) -> Option<SuiteHook> {
        self.suite_hooks.get(name).cloned()
    }

    /// Resolves an item-level hook name.
    #[must_use]
    pub fn item_hook(&self, name: &str) -> Option<ItemHook> {
        self.item_hooks.get(name).cloned()
    }

    /// Resolves a check name.
    #[must_use]
    pub fn check(&self, name: &str) -> Option<CheckFn> {
        self.checks.get(name).cloned()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("suite_hooks", &self.suite_hooks.len())
            .field("item_hooks", &self.item_hooks.len())
            .field("checks", &self.checks.len())
            .finish()
    }
}
