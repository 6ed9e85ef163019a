//! # Gate Session
//!
//! The state of one attempt: step, credential, camera and result.
//! All mutation goes through methods that enforce the step machine, so the
//! controller only decides *when* to call them.

use tracing::debug;

use crate::camera::{CameraSlot, LiveCamera};
use crate::domain::{
    invariant_credential_present, invariant_result_current, AttemptEpoch, CameraError, CameraRole,
    CredentialToken, Frame, GateError, GateMode, GateStep, GateView, Prompt, ResultView,
    StepTransition, VerificationOutcome, VerificationRequest,
};
use crate::ports::VerifyError;

/// What happened to a verification response.
#[derive(Debug)]
pub enum Completion {
    /// The response belonged to the current attempt and was applied.
    Applied {
        /// Outcome, or `ServiceUnavailable` for transport failures
        result: Result<VerificationOutcome, GateError>,
        /// `Verifying → ResultShown`
        transition: StepTransition,
    },
    /// The attempt was abandoned; the response was dropped.
    Discarded,
}

/// One attempt to pass the gate.
#[derive(Default)]
pub struct GateSession {
    mode: GateMode,
    step: GateStep,
    epoch: AttemptEpoch,
    credential: Option<CredentialToken>,
    camera: CameraSlot,
    outcome: Option<VerificationOutcome>,
    failure: Option<String>,
    prompt: Option<Prompt>,
}

impl GateSession {
    /// Fresh session in `AwaitingCredential`, gate mode, no camera.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current mode.
    pub fn mode(&self) -> GateMode {
        self.mode
    }

    /// Current step.
    pub fn step(&self) -> GateStep {
        self.step
    }

    /// Current attempt.
    pub fn epoch(&self) -> AttemptEpoch {
        self.epoch
    }

    /// Captured credential.
    pub fn credential(&self) -> Option<&CredentialToken> {
        self.credential.as_ref()
    }

    /// Recorded outcome (`ResultShown` only).
    pub fn outcome(&self) -> Option<&VerificationOutcome> {
        self.outcome.as_ref()
    }

    /// Role of the live camera.
    pub fn camera_role(&self) -> Option<CameraRole> {
        self.camera.role()
    }

    /// Live camera handles (0 or 1).
    pub fn open_camera_handles(&self) -> usize {
        self.camera.open_handles()
    }

    /// Reject `operation` unless the session is in `mode` and `step`.
    pub fn require(
        &self,
        operation: &'static str,
        mode: GateMode,
        step: Option<GateStep>,
    ) -> Result<(), GateError> {
        let step_ok = step.map_or(true, |s| s == self.step);
        if self.mode != mode || !step_ok {
            return Err(GateError::InvalidState {
                operation,
                step: self.step,
                mode: self.mode,
            });
        }
        Ok(())
    }

    fn advance(&mut self, operation: &'static str, next: GateStep) -> Result<StepTransition, GateError> {
        if !self.step.can_transition_to(next) {
            return Err(GateError::InvalidState {
                operation,
                step: self.step,
                mode: self.mode,
            });
        }
        let transition = StepTransition {
            attempt: self.epoch,
            from: self.step,
            to: next,
        };
        self.step = next;
        self.prompt = None;
        debug_assert!(invariant_credential_present(self.step, self.credential.as_ref()));
        Ok(transition)
    }

    /// Abandon the current attempt: release the camera, forget the
    /// credential and result, and start a new epoch in `AwaitingCredential`.
    pub fn begin_attempt(&mut self) -> StepTransition {
        self.camera.release();
        self.credential = None;
        self.outcome = None;
        self.failure = None;
        self.prompt = None;
        self.epoch = self.epoch.next();

        let transition = StepTransition {
            attempt: self.epoch,
            from: self.step,
            to: GateStep::AwaitingCredential,
        };
        self.step = GateStep::AwaitingCredential;
        transition
    }

    /// Destroy the session and switch to admin mode.
    pub fn suspend_for_admin(&mut self) -> StepTransition {
        let transition = self.begin_attempt();
        self.mode = GateMode::Admin;
        transition
    }

    /// Switch back to gate mode. The caller starts a new attempt.
    pub fn resume_gate(&mut self) {
        self.mode = GateMode::Gate;
    }

    /// Store the credential, release the QR camera and move to `AwaitingFace`.
    pub fn accept_credential(&mut self, token: CredentialToken) -> Result<StepTransition, GateError> {
        self.require("submit_credential", GateMode::Gate, Some(GateStep::AwaitingCredential))?;
        self.camera.release();
        self.credential = Some(token);
        self.advance("submit_credential", GateStep::AwaitingFace)
    }

    /// Move to `Verifying` and build the request for the current attempt.
    ///
    /// The step change happens before any I/O, so a second capture is
    /// rejected until this one completes.
    pub fn begin_verification(
        &mut self,
        frame: Frame,
    ) -> Result<(VerificationRequest, StepTransition), GateError> {
        self.require("capture_and_verify", GateMode::Gate, Some(GateStep::AwaitingFace))?;
        let credential = self.credential.clone().ok_or(GateError::InvalidState {
            operation: "capture_and_verify",
            step: self.step,
            mode: self.mode,
        })?;
        let transition = self.advance("capture_and_verify", GateStep::Verifying)?;
        self.prompt = Some(Prompt::Verifying);

        Ok((
            VerificationRequest {
                attempt: self.epoch,
                credential,
                frame,
            },
            transition,
        ))
    }

    /// Apply a verification response issued under `attempt`, unless that
    /// attempt has been abandoned.
    pub fn complete_verification(
        &mut self,
        attempt: AttemptEpoch,
        response: Result<VerificationOutcome, VerifyError>,
    ) -> Completion {
        if !invariant_result_current(attempt, self.epoch, self.step, self.mode) {
            return Completion::Discarded;
        }

        let transition = match self.advance("capture_and_verify", GateStep::ResultShown) {
            Ok(transition) => transition,
            Err(_) => return Completion::Discarded,
        };
        self.camera.release();

        let result = match response {
            Ok(outcome) => {
                self.outcome = Some(outcome.clone());
                Ok(outcome)
            }
            Err(err) => {
                let reason = err.to_string();
                self.failure = Some(reason.clone());
                Err(GateError::ServiceUnavailable(reason))
            }
        };

        Completion::Applied { result, transition }
    }

    /// Whether a `role` camera opened for `attempt` should be kept.
    pub fn wants_camera(&self, attempt: AttemptEpoch, role: CameraRole) -> bool {
        if self.mode != GateMode::Gate || self.epoch != attempt {
            return false;
        }
        self.step.camera_role() == Some(role) && self.camera.role() != Some(role)
    }

    /// Install a freshly opened camera, or release it at once when the
    /// attempt no longer wants it. Returns whether it was installed.
    pub fn install_camera(&mut self, attempt: AttemptEpoch, mut camera: LiveCamera) -> bool {
        if !self.wants_camera(attempt, camera.role()) {
            camera.stop();
            debug!(attempt = %attempt, "Discarded camera opened for an abandoned attempt");
            return false;
        }
        self.camera.install(camera);
        if matches!(self.prompt, Some(Prompt::CameraUnavailable(_))) {
            self.prompt = None;
        }
        true
    }

    /// Record a failed acquisition for rendering.
    pub fn camera_failed(&mut self, attempt: AttemptEpoch, err: &CameraError) {
        if self.epoch == attempt && self.mode == GateMode::Gate {
            self.prompt = Some(Prompt::CameraUnavailable(err.to_string()));
        }
    }

    /// Record an upload that held no QR code.
    pub fn credential_not_found(&mut self, attempt: AttemptEpoch) {
        if self.epoch == attempt
            && self.mode == GateMode::Gate
            && self.step == GateStep::AwaitingCredential
        {
            self.prompt = Some(Prompt::CredentialNotFound);
        }
    }

    /// Poll the live QR camera.
    pub fn poll_code(&mut self) -> Result<Option<String>, CameraError> {
        self.camera.poll_code()
    }

    /// Grab a frame from the live face camera.
    pub fn grab_frame(&mut self) -> Result<Frame, CameraError> {
        self.camera.grab_frame()
    }

    /// Render model.
    pub fn view(&self) -> GateView {
        let result = match self.step {
            GateStep::ResultShown => Some(match &self.outcome {
                Some(outcome) => ResultView::from_outcome(outcome),
                None => ResultView::service_failure(),
            }),
            _ => None,
        };

        GateView {
            mode: self.mode,
            step: self.step,
            credential: self.credential.as_ref().map(|t| t.to_string()),
            prompt: self.prompt.clone(),
            result,
            camera_live: self.camera.is_open(),
        }
    }
}
