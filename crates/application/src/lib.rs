//! Volley Application - The suite execution engine
//!
//! This crate turns raw suite data into canonical descriptors and drives
//! them through the execution pipeline. All I/O goes through the ports in
//! [`ports`]; the infrastructure crate provides the production adapters.

pub mod error;
pub mod expand;
pub mod normalize;
mod pipeline;
pub mod ports;
pub mod registry;
pub mod runner;
pub mod schedule;
pub mod template;

pub use error::SetupError;
pub use expand::expand;
pub use normalize::{validate, Normalizer};
pub use ports::{HttpExecutor, NullReporter, Reporter, ShapeValidator, StructuralValidator};
pub use registry::Registry;
pub use runner::SuiteRunner;
pub use schedule::schedule;
