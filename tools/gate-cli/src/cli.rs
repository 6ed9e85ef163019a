//! Command line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Gate-CLI: two-factor access gate
#[derive(Parser, Debug)]
#[command(name = "gate-cli")]
#[command(about = "Verify gate entries and manage registered users")]
pub struct Cli {
    /// Backend base URL (overrides GATE_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Log filter (overrides GATE_LOG_LEVEL / RUST_LOG)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Run one gate attempt with a known credential and a face photo
    Verify {
        /// Decoded QR credential
        #[arg(long)]
        token: String,

        /// JPEG used as the face capture
        #[arg(long)]
        frame: PathBuf,
    },

    /// List registered users
    Users,

    /// Register a user with a reference photo
    Register {
        /// Display name
        #[arg(long)]
        name: String,

        /// Reference face photo (JPEG)
        #[arg(long)]
        photo: PathBuf,
    },

    /// Delete a user
    Delete {
        /// User id as shown by `users`
        #[arg(long)]
        id: u64,
    },

    /// Show the most recent access log entries
    Logs,
}
