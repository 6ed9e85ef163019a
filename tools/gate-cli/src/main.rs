//! Gate-CLI entry point.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use gate_cli::{verify, Admin, Cli, Command, Verdict};
use gate_core::GateConfig;
use gate_telemetry::{init_logging, TelemetryConfig};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut telemetry = TelemetryConfig::from_env();
    if let Some(level) = &cli.log_level {
        telemetry = telemetry.with_log_level(level.clone());
    }
    init_logging(&telemetry).context("Failed to initialize logging")?;

    let mut config = GateConfig::from_env();
    if let Some(url) = cli.api_url {
        config.api_base_url = url;
    }
    tracing::debug!(api = %config.api_base_url, "Configuration loaded");

    match cli.command {
        Command::Verify { token, frame } => {
            let (verdict, screen) = verify(&config, &token, &frame).await?;
            println!("{screen}");
            return Ok(match verdict {
                Verdict::Granted => ExitCode::SUCCESS,
                Verdict::Denied => ExitCode::from(2),
            });
        }
        Command::Users => println!("{}", Admin::connect(&config)?.users().await?),
        Command::Register { name, photo } => {
            println!("{}", Admin::connect(&config)?.register(&name, &photo).await?)
        }
        Command::Delete { id } => println!("{}", Admin::connect(&config)?.delete(id).await?),
        Command::Logs => println!("{}", Admin::connect(&config)?.logs().await?),
    }

    Ok(ExitCode::SUCCESS)
}
