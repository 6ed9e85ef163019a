//! # Application Module
//!
//! Services orchestrating the domain and outbound ports.

pub mod admin;
pub mod controller;
pub mod session;

pub use admin::{AdminConsole, AdminError, AdminSnapshot};
pub use controller::GateController;
pub use session::{Completion, GateSession};
