//! # Ports Layer
//!
//! Hexagonal architecture ports:
//! - Inbound: API the gate exposes
//! - Outbound: capabilities it consumes, plus in-memory implementations

pub mod inbound;
pub mod mocks;
pub mod outbound;

pub use inbound::*;
pub use mocks::*;
pub use outbound::*;
