//! # Domain Invariants
//!
//! Rules that must hold for every reachable session state.

use super::entities::{AttemptEpoch, GateMode, GateStep};
use super::value_objects::CredentialToken;

/// Maximum number of camera handles open at once, process-wide.
pub const MAX_OPEN_CAMERAS: usize = 1;

/// Default capture resolution.
pub const DEFAULT_FRAME_WIDTH: u32 = 640;
/// Default capture resolution.
pub const DEFAULT_FRAME_HEIGHT: u32 = 480;

/// Invariant: a credential is held in every step past `AwaitingCredential`,
/// and none is held before it.
pub fn invariant_credential_present(step: GateStep, credential: Option<&CredentialToken>) -> bool {
    step.requires_credential() == credential.is_some()
}

/// Invariant: never more than one live camera.
pub fn invariant_single_camera(open_handles: usize) -> bool {
    open_handles <= MAX_OPEN_CAMERAS
}

/// Invariant: a verification result may only be applied to the attempt that
/// issued it, while that attempt is still waiting for it.
pub fn invariant_result_current(
    issued_under: AttemptEpoch,
    current: AttemptEpoch,
    step: GateStep,
    mode: GateMode,
) -> bool {
    issued_under == current && step == GateStep::Verifying && mode == GateMode::Gate
}
