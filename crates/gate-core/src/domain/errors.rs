//! # Domain Errors
//!
//! Error taxonomy of the gate workflow.
//!
//! A `Denied` verification is deliberately absent here: it is a valid
//! terminal outcome, carried by [`super::VerificationOutcome`].

use thiserror::Error;

use super::entities::{AttemptEpoch, GateMode, GateStep};

/// Camera acquisition and capture failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CameraError {
    /// The user or the platform refused access to the device.
    #[error("camera permission denied")]
    PermissionDenied,

    /// Another process holds the device.
    #[error("camera device busy")]
    DeviceBusy,

    /// No live camera is open for the requested operation.
    #[error("no camera is open")]
    NotOpen,

    /// Any other device-level failure.
    #[error("camera device error: {0}")]
    Device(String),
}

/// Gate workflow error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    /// No decodable QR in the provided frame or image.
    #[error("no QR credential found in the provided image")]
    CredentialNotFound,

    /// Operation invoked out of sequence.
    #[error("{operation} is not allowed in step {step:?} ({mode:?} mode)")]
    InvalidState {
        /// Rejected operation
        operation: &'static str,
        /// Step the session was in
        step: GateStep,
        /// Mode the controller was in
        mode: GateMode,
    },

    /// Camera acquisition or capture failed.
    #[error("camera unavailable: {0}")]
    CameraUnavailable(#[from] CameraError),

    /// Verification transport failure (network or server down).
    #[error("verification service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The attempt was abandoned (reset or mode switch) before its result arrived.
    #[error("attempt {attempt} was superseded; result discarded")]
    Superseded {
        /// Epoch of the abandoned attempt
        attempt: AttemptEpoch,
    },
}

impl GateError {
    /// Whether the user can recover by retrying or falling back.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, GateError::InvalidState { .. })
    }
}
