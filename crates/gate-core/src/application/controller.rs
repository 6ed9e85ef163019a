//! # Gate Controller
//!
//! Application service driving the two-factor gate.
//!
//! The session sits behind a `parking_lot::Mutex` that is never held across
//! an `.await`. Every asynchronous step records the attempt it started
//! under and re-checks it after the await, so a late camera or verification
//! result from an abandoned attempt is dropped instead of applied.
//! Camera opens are serialized by a second, async mutex so two acquisitions
//! can never race for the device.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::application::session::{Completion, GateSession};
use crate::camera::LiveCamera;
use crate::config::GateConfig;
use crate::domain::{
    AttemptEpoch, CameraRole, CredentialToken, Frame, GateError, GateMode, GateStep, GateView,
    StepTransition, VerificationOutcome,
};
use crate::ports::{CredentialScanner, FrameCapture, GateApi, VerificationService};

/// Gate controller - owns the session and the outbound capabilities.
pub struct GateController {
    config: GateConfig,
    scanner: Arc<dyn CredentialScanner>,
    capture: Arc<dyn FrameCapture>,
    verifier: Arc<dyn VerificationService>,
    session: Mutex<GateSession>,
    /// Serializes camera opens.
    acquisitions: tokio::sync::Mutex<()>,
    events: broadcast::Sender<StepTransition>,
}

impl GateController {
    /// Create a controller. No camera is opened until [`GateApi::start`].
    pub fn new(
        config: GateConfig,
        scanner: Arc<dyn CredentialScanner>,
        capture: Arc<dyn FrameCapture>,
        verifier: Arc<dyn VerificationService>,
    ) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        Self {
            config,
            scanner,
            capture,
            verifier,
            session: Mutex::new(GateSession::new()),
            acquisitions: tokio::sync::Mutex::new(()),
            events,
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Subscribe to step transitions.
    pub fn subscribe(&self) -> broadcast::Receiver<StepTransition> {
        self.events.subscribe()
    }

    /// Current attempt.
    pub fn attempt(&self) -> AttemptEpoch {
        self.session.lock().epoch()
    }

    /// Captured credential, if any.
    pub fn credential(&self) -> Option<CredentialToken> {
        self.session.lock().credential().cloned()
    }

    /// Recorded outcome, if any.
    pub fn outcome(&self) -> Option<VerificationOutcome> {
        self.session.lock().outcome().cloned()
    }

    /// Role of the live camera, if any.
    pub fn camera_role(&self) -> Option<CameraRole> {
        self.session.lock().camera_role()
    }

    /// Live camera handles held by the gate (0 or 1).
    pub fn open_camera_handles(&self) -> usize {
        self.session.lock().open_camera_handles()
    }

    /// Fail with `InvalidState` unless in admin mode.
    pub fn require_admin(&self, operation: &'static str) -> Result<(), GateError> {
        self.session
            .lock()
            .require(operation, GateMode::Admin, None)
            .map_err(|e| self.rejected(e))
    }

    fn publish(&self, transition: StepTransition) {
        info!(
            attempt = %transition.attempt,
            from = ?transition.from,
            step = ?transition.to,
            "Step transition"
        );
        // No subscribers is fine.
        let _ = self.events.send(transition);
    }

    fn rejected(&self, err: GateError) -> GateError {
        warn!(error = %err, "Gate operation rejected");
        err
    }

    /// Open the camera for `role` on behalf of `attempt`.
    ///
    /// Returns `Ok` without opening anything if the attempt has moved on.
    async fn acquire_camera(&self, attempt: AttemptEpoch, role: CameraRole) -> Result<(), GateError> {
        let _serial = self.acquisitions.lock().await;

        if !self.session.lock().wants_camera(attempt, role) {
            debug!(attempt = %attempt, role = ?role, "Skipping camera acquisition");
            return Ok(());
        }

        let opened = match role {
            CameraRole::QrScanner => self
                .scanner
                .start(&self.config.scanner)
                .await
                .map(LiveCamera::Qr),
            CameraRole::FaceCapture => self
                .capture
                .open(&self.config.frame)
                .await
                .map(LiveCamera::Face),
        };

        let mut session = self.session.lock();
        match opened {
            Ok(camera) => {
                session.install_camera(attempt, camera);
                Ok(())
            }
            Err(err) => {
                warn!(attempt = %attempt, role = ?role, error = %err, "Camera unavailable");
                session.camera_failed(attempt, &err);
                Err(GateError::CameraUnavailable(err))
            }
        }
    }

    async fn begin_attempt(&self, operation: &'static str) -> Result<(), GateError> {
        let transition = {
            let mut session = self.session.lock();
            session
                .require(operation, GateMode::Gate, None)
                .map_err(|e| self.rejected(e))?;
            session.begin_attempt()
        };
        let attempt = transition.attempt;
        self.publish(transition);
        info!(attempt = %attempt, "Awaiting credential");

        self.acquire_camera(attempt, CameraRole::QrScanner).await
    }

    /// Store `token`, swap the QR camera for the face camera.
    ///
    /// When `expected` is set the token is only accepted if that attempt is
    /// still current.
    async fn accept_token(
        &self,
        token: CredentialToken,
        expected: Option<AttemptEpoch>,
    ) -> Result<(), GateError> {
        let label = token.to_string();
        let transition = {
            let mut session = self.session.lock();
            if let Some(attempt) = expected {
                if session.epoch() != attempt {
                    return Err(GateError::Superseded { attempt });
                }
            }
            session.accept_credential(token).map_err(|e| self.rejected(e))?
        };
        let attempt = transition.attempt;
        self.publish(transition);
        info!(attempt = %attempt, token = %label, "Credential accepted");

        self.acquire_camera(attempt, CameraRole::FaceCapture).await
    }
}

#[async_trait]
impl GateApi for GateController {
    async fn start(&self) -> Result<(), GateError> {
        self.begin_attempt("start").await
    }

    /// A credential that is accepted advances the step even if the face
    /// camera then fails to open; the failure is returned as
    /// `CameraUnavailable` and `reset` is the way out.
    async fn submit_credential(&self, payload: &str) -> Result<(), GateError> {
        let Some(token) = CredentialToken::parse(payload) else {
            let mut session = self.session.lock();
            session
                .require(
                    "submit_credential",
                    GateMode::Gate,
                    Some(GateStep::AwaitingCredential),
                )
                .map_err(|e| self.rejected(e))?;
            let attempt = session.epoch();
            session.credential_not_found(attempt);
            return Err(GateError::CredentialNotFound);
        };
        self.accept_token(token, None).await
    }

    async fn scan_credential_image(&self, image: &[u8]) -> Result<CredentialToken, GateError> {
        let attempt = {
            let session = self.session.lock();
            session
                .require(
                    "scan_credential_image",
                    GateMode::Gate,
                    Some(GateStep::AwaitingCredential),
                )
                .map_err(|e| self.rejected(e))?;
            session.epoch()
        };

        let decoded = self
            .scanner
            .decode_image(image)
            .await
            .and_then(CredentialToken::parse);

        match decoded {
            Some(token) => {
                self.accept_token(token.clone(), Some(attempt)).await?;
                Ok(token)
            }
            None => {
                info!(attempt = %attempt, bytes = image.len(), "No QR code in uploaded image");
                self.session.lock().credential_not_found(attempt);
                Err(GateError::CredentialNotFound)
            }
        }
    }

    async fn next_scanned_credential(&self) -> Result<CredentialToken, GateError> {
        let attempt = {
            let session = self.session.lock();
            session
                .require(
                    "next_scanned_credential",
                    GateMode::Gate,
                    Some(GateStep::AwaitingCredential),
                )
                .map_err(|e| self.rejected(e))?;
            session.epoch()
        };

        let mut ticker = tokio::time::interval(self.config.scanner.poll_interval());
        loop {
            ticker.tick().await;

            let polled = {
                let mut session = self.session.lock();
                if session.epoch() != attempt
                    || session.mode() != GateMode::Gate
                    || session.step() != GateStep::AwaitingCredential
                {
                    return Err(GateError::Superseded { attempt });
                }
                session.poll_code()
            };

            match polled {
                Ok(Some(payload)) => {
                    if let Some(token) = CredentialToken::parse(payload) {
                        self.accept_token(token.clone(), Some(attempt)).await?;
                        return Ok(token);
                    }
                }
                Ok(None) => {}
                Err(err) => return Err(GateError::CameraUnavailable(err)),
            }
        }
    }

    async fn capture_and_verify(&self, frame: Frame) -> Result<VerificationOutcome, GateError> {
        let (request, transition) = {
            let mut session = self.session.lock();
            session.begin_verification(frame).map_err(|e| self.rejected(e))?
        };
        let attempt = request.attempt;
        self.publish(transition);
        info!(
            attempt = %attempt,
            frame_bytes = request.frame.len(),
            "Submitting capture for verification"
        );

        let frame = request.frame.clone();
        let response = self
            .verifier
            .verify(request)
            .await
            .map(|outcome| outcome.fitted_to(&frame));

        let completion = self.session.lock().complete_verification(attempt, response);
        match completion {
            Completion::Applied { result, transition } => {
                self.publish(transition);
                match &result {
                    Ok(outcome) if outcome.is_granted() => {
                        info!(attempt = %attempt, user = outcome.subject_name(), "Access granted")
                    }
                    Ok(outcome) => {
                        info!(attempt = %attempt, reason = outcome.denial_reason(), "Access denied")
                    }
                    Err(err) => warn!(attempt = %attempt, error = %err, "Verification failed"),
                }
                result
            }
            Completion::Discarded => {
                warn!(attempt = %attempt, "Discarding verification result for abandoned attempt");
                Err(GateError::Superseded { attempt })
            }
        }
    }

    async fn capture_from_camera(&self) -> Result<VerificationOutcome, GateError> {
        let grabbed = {
            let mut session = self.session.lock();
            session
                .require(
                    "capture_from_camera",
                    GateMode::Gate,
                    Some(GateStep::AwaitingFace),
                )
                .map_err(|e| self.rejected(e))?;
            session.grab_frame()
        };
        let frame = grabbed.map_err(GateError::CameraUnavailable)?;
        self.capture_and_verify(frame).await
    }

    async fn reset(&self) -> Result<(), GateError> {
        self.begin_attempt("reset").await
    }

    fn enter_admin_mode(&self) {
        let transition = {
            let mut session = self.session.lock();
            if session.mode() == GateMode::Admin {
                return;
            }
            session.suspend_for_admin()
        };
        self.publish(transition);
        info!("Entered admin mode");
    }

    async fn exit_admin_mode(&self) -> Result<(), GateError> {
        self.session.lock().resume_gate();
        info!("Left admin mode");
        self.begin_attempt("exit_admin_mode").await
    }

    fn step(&self) -> GateStep {
        self.session.lock().step()
    }

    fn mode(&self) -> GateMode {
        self.session.lock().mode()
    }

    fn view(&self) -> GateView {
        self.session.lock().view()
    }
}
