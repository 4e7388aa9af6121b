//! Port implementations backed by external services

mod reqwest_executor;

pub use reqwest_executor::ReqwestExecutor;
