//! # Domain Value Objects
//!
//! Immutable value types flowing through the gate workflow.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::entities::AttemptEpoch;

/// Decoded QR payload identifying the claimed subject.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CredentialToken(String);

impl CredentialToken {
    /// Build a token from a decoded payload.
    ///
    /// Returns `None` for blank payloads: a QR that decodes to nothing is
    /// not a credential.
    pub fn parse(payload: impl Into<String>) -> Option<Self> {
        let payload = payload.into();
        let trimmed = payload.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    /// Token text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CredentialToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Single JPEG-encoded camera frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    /// JPEG bytes.
    pub jpeg: Bytes,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Frame {
    /// Wrap an encoded JPEG of known dimensions.
    pub fn jpeg(jpeg: impl Into<Bytes>, width: u32, height: u32) -> Self {
        Self {
            jpeg: jpeg.into(),
            width,
            height,
        }
    }

    /// Encoded size in bytes.
    pub fn len(&self) -> usize {
        self.jpeg.len()
    }

    /// Whether the frame carries no data.
    pub fn is_empty(&self) -> bool {
        self.jpeg.is_empty()
    }

    /// Whether `region` lies inside this frame.
    pub fn contains(&self, region: &FaceRegion) -> bool {
        region.x.saturating_add(region.w) <= self.width
            && region.y.saturating_add(region.h) <= self.height
    }
}

/// Face bounding box in frame pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceRegion {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width.
    pub w: u32,
    /// Height.
    pub h: u32,
}

impl FaceRegion {
    /// Create a bounding box.
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
}

/// Verification decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationStatus {
    /// Credential and face match.
    Success,
    /// Negative outcome; final answer for the attempt.
    Denied,
}

/// Outcome returned by the verification service.
///
/// Constructed only through [`VerificationOutcome::granted`] and
/// [`VerificationOutcome::denied`] so that `subject_name` is present iff
/// `Success` and `denial_reason` is present iff `Denied`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationOutcome {
    status: VerificationStatus,
    subject_name: Option<String>,
    denial_reason: Option<String>,
    face_region: Option<FaceRegion>,
    score: Option<u8>,
}

impl VerificationOutcome {
    /// Access granted to `subject_name`.
    pub fn granted(subject_name: impl Into<String>) -> Self {
        Self {
            status: VerificationStatus::Success,
            subject_name: Some(subject_name.into()),
            denial_reason: None,
            face_region: None,
            score: None,
        }
    }

    /// Access denied for `reason`.
    pub fn denied(reason: impl Into<String>) -> Self {
        Self {
            status: VerificationStatus::Denied,
            subject_name: None,
            denial_reason: Some(reason.into()),
            face_region: None,
            score: None,
        }
    }

    /// Attach the detected face, if any.
    pub fn with_face_region(mut self, region: Option<FaceRegion>) -> Self {
        self.face_region = region;
        self
    }

    /// Drop a face box that does not fit inside `frame`.
    pub fn fitted_to(mut self, frame: &Frame) -> Self {
        if self.face_region.is_some_and(|region| !frame.contains(&region)) {
            self.face_region = None;
        }
        self
    }

    /// Attach the match score, clamped to a percentage.
    pub fn with_score(mut self, score: Option<u8>) -> Self {
        self.score = score.map(|s| s.min(100));
        self
    }

    /// Decision.
    pub fn status(&self) -> VerificationStatus {
        self.status
    }

    /// Whether access was granted.
    pub fn is_granted(&self) -> bool {
        self.status == VerificationStatus::Success
    }

    /// Subject name (granted only).
    pub fn subject_name(&self) -> Option<&str> {
        self.subject_name.as_deref()
    }

    /// Denial reason (denied only).
    pub fn denial_reason(&self) -> Option<&str> {
        self.denial_reason.as_deref()
    }

    /// Detected face, regardless of match.
    pub fn face_region(&self) -> Option<FaceRegion> {
        self.face_region
    }

    /// Match score in percent, when reported.
    pub fn score(&self) -> Option<u8> {
        self.score
    }
}

/// One outgoing verification call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationRequest {
    /// Attempt the request was issued under.
    pub attempt: AttemptEpoch,
    /// Claimed identity.
    pub credential: CredentialToken,
    /// Captured face frame.
    pub frame: Frame,
}
