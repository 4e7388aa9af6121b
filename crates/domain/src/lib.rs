//! Volley Domain - Core suite model
//!
//! This crate defines the domain model for the Volley test runner: raw items,
//! canonical descriptors, requests and responses, hooks, and the structural
//! shape matcher. All types here are pure Rust with no I/O dependencies.

pub mod context;
pub mod error;
pub mod hook;
pub mod item;
pub mod method;
pub mod request;
pub mod response;
pub mod shape;
pub mod spec;
pub mod state;
pub mod stats;
pub mod suite;

pub use context::{display_value, Context};
pub use error::{HookError, ItemError, TransportError, UnsupportedMethod};
pub use hook::{item_hook, suite_hook, CheckFn, HookFns, HookFuture, ItemHook, SuiteHook};
pub use item::{HookDecl, NumberOrRef, ResultDecl, TestItem};
pub use method::HttpMethod;
pub use request::{Credentials, Expectations, RequestSpec};
pub use response::ResponseSpec;
pub use spec::{valid_redirect_limit, valid_status, ResultRule, TestSpec};
pub use state::ItemState;
pub use stats::{RunReport, RunStats};
pub use suite::Suite;
