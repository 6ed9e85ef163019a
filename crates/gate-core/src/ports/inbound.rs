//! # Inbound Ports
//!
//! API trait defining what the gate can do.

use async_trait::async_trait;

use crate::domain::{
    CredentialToken, Frame, GateError, GateMode, GateStep, GateView, VerificationOutcome,
};

/// Gate API - inbound port.
#[async_trait]
pub trait GateApi: Send + Sync {
    /// Enter the gate flow: open the QR camera in `AwaitingCredential`.
    async fn start(&self) -> Result<(), GateError>;

    /// Accept a decoded credential and move to the face step.
    async fn submit_credential(&self, payload: &str) -> Result<(), GateError>;

    /// Decode an uploaded still image and submit its credential.
    async fn scan_credential_image(&self, image: &[u8]) -> Result<CredentialToken, GateError>;

    /// Wait for the live QR camera to decode a credential and submit it.
    async fn next_scanned_credential(&self) -> Result<CredentialToken, GateError>;

    /// Submit a captured frame for verification.
    async fn capture_and_verify(&self, frame: Frame) -> Result<VerificationOutcome, GateError>;

    /// Grab a frame from the live face camera and submit it.
    async fn capture_from_camera(&self) -> Result<VerificationOutcome, GateError>;

    /// Abandon the current attempt and start over.
    async fn reset(&self) -> Result<(), GateError>;

    /// Suspend the gate flow for management views.
    fn enter_admin_mode(&self);

    /// Leave management views and restart the gate flow.
    async fn exit_admin_mode(&self) -> Result<(), GateError>;

    /// Current step.
    fn step(&self) -> GateStep;

    /// Current mode.
    fn mode(&self) -> GateMode;

    /// Render model of the current session.
    fn view(&self) -> GateView;
}
