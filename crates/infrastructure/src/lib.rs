//! Volley Infrastructure - Production adapters
//!
//! This crate provides the concrete collaborators behind the application
//! layer's ports: a reqwest-backed HTTP executor, a YAML suite loader, and
//! console reporting.

pub mod adapters;
pub mod loader;
pub mod reporting;

pub use adapters::ReqwestExecutor;
pub use loader::load_suite;
pub use reporting::{reporter_named, ConsoleReporter};
