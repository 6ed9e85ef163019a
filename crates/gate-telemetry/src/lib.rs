//! # Gate Telemetry
//!
//! Structured logging for the access gate binaries and tests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gate_telemetry::{init_logging, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     init_logging(&TelemetryConfig::from_env())?;
//!     // ...
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `GATE_LOG_LEVEL` / `RUST_LOG` | `info` | Filter directive |
//! | `GATE_JSON_LOGS` | `false` (`true` in containers) | JSON lines output |
//! | `GATE_CONSOLE_OUTPUT` | `true` | Write to stderr |
//! | `GATE_SERVICE_NAME` | `faceid-gate` | Service name |

#![warn(missing_docs)]

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::{build_filter, init_logging, init_test_logging};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The filter directive did not parse.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A global subscriber was already installed.
    #[error("Failed to install subscriber: {0}")]
    Init(String),
}
