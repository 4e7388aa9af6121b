//! Application error types

use thiserror::Error;
use volley_domain::HookError;

/// Failures that abort a run before, between, or outside item execution.
///
/// Item-level failures never surface here; they are recorded on the item,
/// reported, and counted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SetupError {
    /// The suite declares neither `base` nor `server`.
    #[error("suite declares no base URL: set 'base' or 'server'")]
    MissingBase,

    /// The effective base URL does not parse as an http or https URL.
    #[error("invalid base URL '{base}': {reason}")]
    InvalidBase {
        /// The offending base URL.
        base: String,
        /// Parser detail.
        reason: String,
    },

    /// A suite-level hook declaration names no registered hook.
    #[error("unknown suite-level hook '{name}'")]
    UnknownHook {
        /// The unresolved name.
        name: String,
    },

    /// The requested reporter name is not known.
    #[error("unknown output '{name}': expected 'console' or 'silent'")]
    UnknownOutput {
        /// The unresolved name.
        name: String,
    },

    /// A suite-level hook failed; the run stops where it stood.
    #[error("suite-level hook failed: {0}")]
    Hook(#[from] HookError),

    /// A suite file could not be read.
    #[error("failed to read '{path}': {reason}")]
    Read {
        /// The offending file.
        path: String,
        /// I/O detail.
        reason: String,
    },

    /// A suite file could not be parsed.
    #[error("failed to parse '{path}': {reason}")]
    Parse {
        /// The offending file.
        path: String,
        /// Parser detail.
        reason: String,
    },

    /// An `!env` node names an environment variable that is not set.
    #[error("environment variable '{name}' is not set")]
    MissingEnv {
        /// The variable name.
        name: String,
    },
}
