//! # Render Model
//!
//! What the gate screen shows for the current session. Rendering itself
//! (markup, colours, overlays) is left to the caller.

use serde::Serialize;

use super::entities::{GateMode, GateStep};
use super::value_objects::{FaceRegion, VerificationOutcome};

/// Headline shown when access is granted.
pub const GRANTED_HEADLINE: &str = "DOSTĘP PRZYZNANY";
/// Headline shown when access is denied.
pub const DENIED_HEADLINE: &str = "ODMOWA DOSTĘPU";
/// Headline shown when the verification service could not be reached.
pub const SERVER_ERROR_HEADLINE: &str = "Błąd serwera.";
/// Prompt shown while a verification is in flight.
pub const VERIFYING_PROMPT: &str = "Weryfikacja...";

/// Tone of a rendered result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ResultTone {
    /// Access granted.
    Granted,
    /// Access denied.
    Denied,
    /// Verification did not complete.
    Error,
}

/// Rendered outcome of a finished attempt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResultView {
    /// Visual tone.
    pub tone: ResultTone,
    /// First line.
    pub headline: String,
    /// Second line, if any.
    pub detail: Option<String>,
    /// Face box to overlay on the last capture.
    pub face_region: Option<FaceRegion>,
}

impl ResultView {
    /// Render a verification outcome.
    pub fn from_outcome(outcome: &VerificationOutcome) -> Self {
        if outcome.is_granted() {
            Self {
                tone: ResultTone::Granted,
                headline: GRANTED_HEADLINE.to_string(),
                detail: outcome.subject_name().map(|name| format!("Witaj: {name}")),
                face_region: outcome.face_region(),
            }
        } else {
            Self {
                tone: ResultTone::Denied,
                headline: DENIED_HEADLINE.to_string(),
                detail: outcome.denial_reason().map(str::to_string),
                face_region: outcome.face_region(),
            }
        }
    }

    /// Render a verification that never produced an outcome.
    pub fn service_failure() -> Self {
        Self {
            tone: ResultTone::Error,
            headline: SERVER_ERROR_HEADLINE.to_string(),
            detail: None,
            face_region: None,
        }
    }

    /// Text lines in display order.
    pub fn lines(&self) -> Vec<&str> {
        let mut lines = vec![self.headline.as_str()];
        if let Some(detail) = &self.detail {
            lines.push(detail.as_str());
        }
        lines
    }
}

/// Inline prompt attached to the current step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Prompt {
    /// Uploaded image held no QR code.
    CredentialNotFound,
    /// Live camera could not be opened; the message says why.
    CameraUnavailable(String),
    /// Verification in flight.
    Verifying,
}

impl Prompt {
    /// User-facing text.
    pub fn message(&self) -> String {
        match self {
            Prompt::CredentialNotFound => "Nie znaleziono kodu QR na tym zdjęciu.".to_string(),
            Prompt::CameraUnavailable(reason) => {
                format!("Kamera niedostępna ({reason}) - użyj uploadu pliku.")
            }
            Prompt::Verifying => VERIFYING_PROMPT.to_string(),
        }
    }
}

/// Snapshot of everything the gate screen needs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GateView {
    /// Controller mode.
    pub mode: GateMode,
    /// Current step.
    pub step: GateStep,
    /// Captured credential, shown during the face step.
    pub credential: Option<String>,
    /// Inline prompt, if any.
    pub prompt: Option<Prompt>,
    /// Rendered result (`ResultShown` only).
    pub result: Option<ResultView>,
    /// Whether a live camera feed is available.
    pub camera_live: bool,
}
