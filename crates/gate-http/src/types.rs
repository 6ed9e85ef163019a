//! Wire types of the gate backend REST API.

use gate_core::{
    AccessLogEntry, AccessStatus, FaceRegion, Registration, UserId, UserRecord,
    VerificationOutcome, VerifyError,
};
use serde::{Deserialize, Serialize};

/// Denial reason used when the backend sends none.
pub const UNKNOWN_REASON: &str = "Nieznany powód";

/// Face bounding box as sent by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceRect {
    pub x: i64,
    pub y: i64,
    pub w: i64,
    pub h: i64,
}

impl FaceRect {
    /// Clamp to a pixel region; negative coordinates become zero.
    pub fn to_region(self) -> FaceRegion {
        let clamp = |v: i64| u32::try_from(v.max(0)).unwrap_or(u32::MAX);
        FaceRegion::new(clamp(self.x), clamp(self.y), clamp(self.w), clamp(self.h))
    }
}

/// Body of `POST /api/verify_entry` (both 200 and 403).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub status: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub score: Option<i64>,
    #[serde(default)]
    pub face_rect: Option<FaceRect>,
}

impl VerifyResponse {
    /// Convert to a domain outcome.
    pub fn into_outcome(self) -> Result<VerificationOutcome, VerifyError> {
        let outcome = match self.status.as_str() {
            "success" => {
                let user = self
                    .user
                    .filter(|u| !u.trim().is_empty())
                    .ok_or_else(|| VerifyError::Malformed("success without user".to_string()))?;
                VerificationOutcome::granted(user)
            }
            "denied" => VerificationOutcome::denied(
                self.reason
                    .filter(|r| !r.trim().is_empty())
                    .unwrap_or_else(|| UNKNOWN_REASON.to_string()),
            ),
            other => {
                return Err(VerifyError::Malformed(format!("unknown status {other:?}")));
            }
        };

        let score = self.score.map(|s| s.clamp(0, 100) as u8);
        Ok(outcome
            .with_face_region(self.face_rect.map(FaceRect::to_region))
            .with_score(score))
    }
}

/// Entry of `GET /api/users`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPayload {
    pub id: u64,
    pub name: String,
    pub qr: String,
    #[serde(default)]
    pub photo: Option<String>,
}

impl From<UserPayload> for UserRecord {
    fn from(p: UserPayload) -> Self {
        UserRecord {
            id: UserId(p.id),
            name: p.name,
            qr: p.qr,
            photo: p.photo,
        }
    }
}

/// Entry of `GET /api/logs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogPayload {
    pub time: String,
    pub user: String,
    pub status: String,
    #[serde(default)]
    pub snapshot: Option<String>,
}

impl From<LogPayload> for AccessLogEntry {
    fn from(p: LogPayload) -> Self {
        AccessLogEntry {
            time: p.time,
            user: p.user,
            status: AccessStatus::from_label(&p.status),
            snapshot: p.snapshot,
        }
    }
}

/// Body of a successful `POST /api/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub qr_code: Option<String>,
    #[serde(default)]
    pub id: Option<u64>,
}

impl From<RegisterResponse> for Registration {
    fn from(r: RegisterResponse) -> Self {
        Registration {
            id: r.id.map(UserId),
            qr_code: r.qr_code,
            message: r.message,
        }
    }
}

/// `{"error": ...}` or `{"message": ...}` error body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// The most specific message available.
    pub fn into_message(self) -> Option<String> {
        self.error.or(self.message)
    }
}
