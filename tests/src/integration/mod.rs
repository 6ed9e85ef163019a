//! Cross-crate integration tests.

pub mod admin_flow;
pub mod http_flow;
pub mod scenarios;
