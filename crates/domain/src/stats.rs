//! Run-wide statistics and the final report

use crate::context::Context;

/// Mutable state shared by every hook and item over one run.
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// Number of items that completed without an error.
    pub passed: usize,
    /// The suite-level context. Values written here are visible to every
    /// later item.
    pub context: Context,
}

/// Final outcome of a suite run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// Items that passed.
    pub passed: usize,
    /// Items that ran.
    pub total: usize,
}

impl RunReport {
    /// Builds a report from the final counters.
    #[must_use]
    pub const fn new(passed: usize, total: usize) -> Self {
        Self { passed, total }
    }

    /// Whether every item passed.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.passed == self.total
    }
}
