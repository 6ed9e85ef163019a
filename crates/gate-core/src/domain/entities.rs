//! # Domain Entities
//!
//! Step machine of a gate attempt, controller mode and attempt epochs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stage of one attempt to pass the gate.
///
/// ```text
/// [AwaitingCredential] ──decode──→ [AwaitingFace] ──capture──→ [Verifying]
///          ↑                                                        │
///          │                                              response or error
///          │                                                        ↓
///          └─────────────────── reset ──────────────────── [ResultShown]
/// ```
///
/// `reset` (and any mode switch) may return to `AwaitingCredential` from
/// every step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateStep {
    /// QR camera open (or still-image upload accepted).
    #[default]
    AwaitingCredential,
    /// Credential captured, face camera open.
    AwaitingFace,
    /// Capture submitted, one verification in flight.
    Verifying,
    /// Outcome (or failure) rendered; waiting for reset.
    ResultShown,
}

impl GateStep {
    /// All steps in pipeline order.
    pub const ALL: [GateStep; 4] = [
        GateStep::AwaitingCredential,
        GateStep::AwaitingFace,
        GateStep::Verifying,
        GateStep::ResultShown,
    ];

    /// Whether `self → next` is an edge of the step machine.
    pub fn can_transition_to(self, next: GateStep) -> bool {
        matches!(
            (self, next),
            (GateStep::AwaitingCredential, GateStep::AwaitingFace)
                | (GateStep::AwaitingFace, GateStep::Verifying)
                | (GateStep::Verifying, GateStep::ResultShown)
                | (_, GateStep::AwaitingCredential)
        )
    }

    /// Whether a credential token must be held in this step.
    pub fn requires_credential(self) -> bool {
        !matches!(self, GateStep::AwaitingCredential)
    }

    /// Camera this step owns on entry, if any.
    pub fn camera_role(self) -> Option<CameraRole> {
        match self {
            GateStep::AwaitingCredential => Some(CameraRole::QrScanner),
            GateStep::AwaitingFace | GateStep::Verifying => Some(CameraRole::FaceCapture),
            GateStep::ResultShown => None,
        }
    }
}

/// Which purpose a live camera serves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CameraRole {
    /// Live QR scanning.
    QrScanner,
    /// Live face capture.
    FaceCapture,
}

/// Controller mode. Gate and admin are mutually exclusive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateMode {
    /// Gate flow active.
    #[default]
    Gate,
    /// Management views shown, gate flow suspended.
    Admin,
}

/// Identifier of one logical attempt.
///
/// Bumped on every reset and mode switch; every verification request
/// carries the epoch it was issued under.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AttemptEpoch(u64);

impl AttemptEpoch {
    /// Wrap a raw epoch value.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Raw epoch value.
    pub const fn value(self) -> u64 {
        self.0
    }

    /// The epoch following this one.
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for AttemptEpoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A step change published by the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepTransition {
    /// Attempt the transition belongs to.
    pub attempt: AttemptEpoch,
    /// Step before.
    pub from: GateStep,
    /// Step after.
    pub to: GateStep,
}
