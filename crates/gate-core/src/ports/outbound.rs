//! # Outbound Ports
//!
//! Capabilities the gate consumes: cameras, QR decoding, verification and
//! the directory store.

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{FrameConfig, ScannerConfig};
use crate::domain::{
    AccessLogEntry, CameraError, Frame, PhotoUpload, Registration, UserId, UserRecord,
    VerificationOutcome, VerificationRequest,
};

/// Live QR scanning session on an open camera.
///
/// Dropping the handle must release the device.
pub trait QrScanHandle: Send {
    /// Next payload decoded since the last call, without blocking.
    fn try_next_code(&mut self) -> Option<String>;

    /// Stop scanning and release the device. Idempotent.
    fn stop(&mut self);
}

/// Live face video stream on an open camera.
///
/// Dropping the handle must release the device.
pub trait FaceStreamHandle: Send {
    /// Grab the current frame.
    fn grab_frame(&mut self) -> Result<Frame, CameraError>;

    /// Stop the stream and release the device. Idempotent.
    fn stop(&mut self);
}

/// QR credential acquisition - outbound port.
#[async_trait]
pub trait CredentialScanner: Send + Sync {
    /// Open the QR camera and start decoding.
    async fn start(&self, config: &ScannerConfig) -> Result<Box<dyn QrScanHandle>, CameraError>;

    /// Decode a still image (file upload fallback). `None` when no QR is found.
    async fn decode_image(&self, image: &[u8]) -> Option<String>;
}

/// Face frame acquisition - outbound port.
#[async_trait]
pub trait FrameCapture: Send + Sync {
    /// Open the face camera.
    async fn open(&self, config: &FrameConfig) -> Result<Box<dyn FaceStreamHandle>, CameraError>;
}

/// Verification transport failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    /// Could not reach the service.
    #[error("cannot reach verification service: {0}")]
    Connection(String),

    /// The call did not complete in time.
    #[error("verification request timed out")]
    Timeout,

    /// The service answered with a server error.
    #[error("verification service returned HTTP {status}")]
    Server {
        /// HTTP status code
        status: u16,
    },

    /// The answer could not be understood.
    #[error("malformed verification response: {0}")]
    Malformed(String),
}

/// Remote verification - outbound port.
#[async_trait]
pub trait VerificationService: Send + Sync {
    /// Verify a capture against the claimed credential.
    ///
    /// A denial is `Ok`; `Err` is reserved for transport failures.
    async fn verify(&self, request: VerificationRequest)
        -> Result<VerificationOutcome, VerifyError>;
}

/// Directory store failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Could not reach the store.
    #[error("directory store unavailable: {0}")]
    Unavailable(String),

    /// The store refused the request.
    #[error("directory store rejected the request: {0}")]
    Rejected(String),

    /// The answer could not be understood.
    #[error("malformed directory response: {0}")]
    Malformed(String),
}

/// Users and audit logs - outbound port.
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    /// All registered users.
    async fn list_users(&self) -> Result<Vec<UserRecord>, StoreError>;

    /// Enrol a user from a photo.
    async fn register_user(&self, name: &str, photo: PhotoUpload)
        -> Result<Registration, StoreError>;

    /// Remove a user. Removing an unknown id succeeds.
    async fn delete_user(&self, id: UserId) -> Result<(), StoreError>;

    /// Most recent audit log entries, newest first.
    async fn list_logs(&self) -> Result<Vec<AccessLogEntry>, StoreError>;
}
