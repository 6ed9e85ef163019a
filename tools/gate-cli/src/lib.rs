//! Gate-CLI: command line front end for the access gate.
//!
//! ```text
//! gate-cli verify --token QR123 --frame face.jpg   # one headless gate attempt
//! gate-cli users | logs                            # admin views
//! gate-cli register --name "Jan" --photo jan.jpg
//! gate-cli delete --id 7
//! ```
//!
//! `verify` runs without a live camera: the QR step falls back to the
//! supplied token and the face step serves the given JPEG.

pub mod cli;
pub mod commands;
pub mod render;

pub use cli::{Cli, Command};
pub use commands::{verify, Admin, Verdict};
