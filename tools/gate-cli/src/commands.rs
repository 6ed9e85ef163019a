//! Subcommand handlers.
//!
//! Each handler builds the gate from configuration, runs one operation and
//! returns the text to print.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use gate_core::{
    AdminConsole, CameraError, GateApi, GateConfig, GateController, GateError, NoLiveCamera,
    PhotoUpload, StillFrameCapture, UserId,
};
use gate_http::{GateHttpClient, HttpDirectoryStore, HttpVerificationService};
use tracing::info;

use crate::render;

/// Outcome of `verify`, mapped to the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Access granted.
    Granted,
    /// Access denied.
    Denied,
}

/// Run one gate attempt: submit `token`, capture `frame`, verify.
pub async fn verify(config: &GateConfig, token: &str, frame: &Path) -> Result<(Verdict, String)> {
    let api = GateHttpClient::from_config(config).context("Failed to build HTTP client")?;
    let gate = GateController::new(
        config.clone(),
        Arc::new(NoLiveCamera),
        Arc::new(StillFrameCapture::new(frame)),
        Arc::new(HttpVerificationService::new(api)),
    );

    match gate.start().await {
        Ok(()) => {}
        Err(GateError::CameraUnavailable(CameraError::Device(reason))) => {
            info!(%reason, "No QR camera, using the supplied credential");
        }
        Err(e) => return Err(e).context("Failed to start the gate"),
    }

    if let Err(e) = gate.submit_credential(token).await {
        return match e {
            GateError::CameraUnavailable(_) => {
                Err(e).with_context(|| format!("Cannot load face frame {}", frame.display()))
            }
            _ => Err(e).context("Credential rejected"),
        };
    }

    let result = gate.capture_from_camera().await;
    let mut screen = render::gate_view(&gate.view());
    match result {
        Ok(outcome) => {
            if let Some(details) = render::outcome_details(&outcome) {
                screen.push('\n');
                screen.push_str(&details);
            }
            let verdict = if outcome.is_granted() {
                Verdict::Granted
            } else {
                Verdict::Denied
            };
            Ok((verdict, screen))
        }
        Err(GateError::ServiceUnavailable(reason)) => {
            bail!("{screen}\n{reason}")
        }
        Err(e) => Err(e).context("Verification did not complete"),
    }
}

/// Admin console backed by the HTTP directory, already in admin mode.
pub struct Admin {
    console: AdminConsole,
    api: GateHttpClient,
}

impl Admin {
    /// Connect to the backend and switch the gate to admin mode.
    pub fn connect(config: &GateConfig) -> Result<Self> {
        let api = GateHttpClient::from_config(config).context("Failed to build HTTP client")?;
        let gate = Arc::new(GateController::new(
            config.clone(),
            Arc::new(NoLiveCamera),
            Arc::new(NoLiveCamera),
            Arc::new(HttpVerificationService::new(api.clone())),
        ));
        gate.enter_admin_mode();

        let console = AdminConsole::new(gate, Arc::new(HttpDirectoryStore::new(api.clone())));
        Ok(Self { console, api })
    }

    /// `users`
    pub async fn users(&self) -> Result<String> {
        let users = self.console.list_users().await.context("Failed to list users")?;
        Ok(render::users(&users, &self.api))
    }

    /// `register`
    pub async fn register(&self, name: &str, photo: &Path) -> Result<String> {
        let bytes = tokio::fs::read(photo)
            .await
            .with_context(|| format!("Failed to read {}", photo.display()))?;
        let file_name = photo
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "photo.jpg".to_string());

        let registration = self
            .console
            .register_user(name, PhotoUpload::new(file_name, bytes))
            .await
            .with_context(|| format!("Failed to register {name}"))?;
        Ok(render::registration(&registration, &self.api))
    }

    /// `delete`
    pub async fn delete(&self, id: u64) -> Result<String> {
        self.console
            .delete_user(UserId(id))
            .await
            .with_context(|| format!("Failed to delete user {id}"))?;
        Ok(format!("Usunięto użytkownika {id}"))
    }

    /// `logs`
    pub async fn logs(&self) -> Result<String> {
        let logs = self.console.list_logs().await.context("Failed to fetch logs")?;
        Ok(render::logs(&logs, &self.api))
    }
}
