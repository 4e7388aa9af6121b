//! Reporter implementations and selection by name

mod console;

use std::sync::Arc;

use volley_application::{NullReporter, Reporter, SetupError};

pub use console::ConsoleReporter;

/// Resolves a reporter name from suite options or the command line.
///
/// # Errors
///
/// Returns [`SetupError::UnknownOutput`] for any name other than `console`,
/// `silent` or `none`.
pub fn reporter_named(name: &str) -> Result<Arc<dyn Reporter>, SetupError> {
    match name {
        "console" => Ok(Arc::new(ConsoleReporter::new())),
        "silent" | "none" => Ok(Arc::new(NullReporter)),
        other => Err(SetupError::UnknownOutput {
            name: other.to_string(),
        }),
    }
}
