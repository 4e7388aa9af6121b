//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the execution engine and its
//! collaborators. Each port is a trait implemented by an adapter in the
//! infrastructure layer, or by a mock in tests.

mod http;
mod reporter;
mod schema;

pub use http::HttpExecutor;
pub use reporter::{NullReporter, Reporter};
pub use schema::{ShapeValidator, StructuralValidator};
