//! # Gate HTTP
//!
//! reqwest adapters binding the gate's outbound ports to the backend:
//!
//! | Port | Adapter | Endpoints |
//! |------|---------|-----------|
//! | `VerificationService` | [`HttpVerificationService`] | `POST /api/verify_entry` |
//! | `DirectoryStore` | [`HttpDirectoryStore`] | `/api/users`, `/api/register`, `/api/logs` |

mod client;
mod directory;
mod types;
mod verification;

pub use client::{ApiError, GateHttpClient};
pub use directory::HttpDirectoryStore;
pub use types::*;
pub use verification::{HttpVerificationService, ATTEMPT_HEADER, VERIFY_PATH};
