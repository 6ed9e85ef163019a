//! # Directory Records
//!
//! Users and audit log entries as seen from the admin surface.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Directory identifier of a registered user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Registered user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Payload encoded in the user's QR credential.
    pub qr: String,
    /// Server-relative path of the enrolment photo.
    pub photo: Option<String>,
}

impl UserRecord {
    /// Server-relative path of the printable QR image.
    pub fn qr_image_path(&self) -> String {
        format!("/static/qrcodes/{}.png", self.qr)
    }
}

/// Audit status of a gate attempt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessStatus {
    /// Entry granted.
    Success,
    /// Unknown QR credential.
    DeniedQr,
    /// Known credential, face did not match.
    DeniedFace,
    /// Status string this client does not know.
    Other(String),
}

impl AccessStatus {
    /// Parse the store's status label.
    pub fn from_label(label: &str) -> Self {
        match label {
            "SUCCESS" => AccessStatus::Success,
            "DENIED_QR" => AccessStatus::DeniedQr,
            "DENIED_FACE" => AccessStatus::DeniedFace,
            other => AccessStatus::Other(other.to_string()),
        }
    }

    /// Whether the attempt was granted.
    pub fn is_success(&self) -> bool {
        matches!(self, AccessStatus::Success)
    }
}

/// One audit log line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessLogEntry {
    /// Timestamp as reported by the store.
    pub time: String,
    /// Subject name, or a placeholder for unknown credentials.
    pub user: String,
    /// Outcome.
    pub status: AccessStatus,
    /// Server-relative path of the incident snapshot.
    pub snapshot: Option<String>,
}

/// Store answer to a successful registration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    /// Identifier, when the store reports one.
    pub id: Option<UserId>,
    /// QR payload issued to the new user.
    pub qr_code: Option<String>,
    /// Human-readable confirmation.
    pub message: String,
}

/// Enrolment photo to upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhotoUpload {
    /// Original file name.
    pub file_name: String,
    /// Image bytes.
    pub bytes: Bytes,
}

impl PhotoUpload {
    /// Wrap photo bytes.
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }
}
