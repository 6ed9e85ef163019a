//! # Access Gate Test Suite
//!
//! Unified test crate for flows that cross crate boundaries.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Gate wired to mocks or to a wiremock backend
//! └── integration/
//!     ├── scenarios.rs  # Gate scenarios over in-memory cameras and service
//!     ├── http_flow.rs  # Gate against an HTTP verification backend
//!     └── admin_flow.rs # Admin console against an HTTP directory
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p gate-tests
//! cargo test -p gate-tests integration::scenarios::
//! ```

pub mod fixtures;
pub mod integration;
