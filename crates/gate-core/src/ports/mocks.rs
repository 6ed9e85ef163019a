//! # In-Memory Port Implementations
//!
//! Scriptable cameras, verifier and directory used by tests and demos.
//! Mock cameras share a [`CameraProbe`] so that a test can check how many
//! devices were open at once across both cameras.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{Notify, Semaphore};

use super::outbound::{
    CredentialScanner, DirectoryStore, FaceStreamHandle, FrameCapture, QrScanHandle, StoreError,
    VerificationService, VerifyError,
};
use crate::config::{FrameConfig, ScannerConfig};
use crate::domain::{
    AccessLogEntry, CameraError, Frame, PhotoUpload, Registration, UserId, UserRecord,
    VerificationOutcome, VerificationRequest,
};

/// Audit log entries returned per listing.
const LOG_PAGE: usize = 50;

// =============================================================================
// Cameras
// =============================================================================

/// Device bookkeeping shared by mock cameras.
#[derive(Debug, Default)]
pub struct CameraProbe {
    open: AtomicUsize,
    peak: AtomicUsize,
    opened_total: AtomicUsize,
}

impl CameraProbe {
    /// Create a shared probe.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn acquire(&self) {
        let now = self.open.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        self.opened_total.fetch_add(1, Ordering::SeqCst);
    }

    fn release(&self) {
        self.open.fetch_sub(1, Ordering::SeqCst);
    }

    /// Devices open right now.
    pub fn open_count(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }

    /// Highest number of devices ever open at once.
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    /// Successful acquisitions so far.
    pub fn opened_total(&self) -> usize {
        self.opened_total.load(Ordering::SeqCst)
    }
}

/// Mock live QR scanner.
pub struct MockCredentialScanner {
    probe: Arc<CameraProbe>,
    failure: Mutex<Option<CameraError>>,
    live_codes: Arc<Mutex<VecDeque<String>>>,
    images: Mutex<HashMap<Vec<u8>, String>>,
}

impl MockCredentialScanner {
    /// Scanner whose camera is tracked by `probe`.
    pub fn new(probe: Arc<CameraProbe>) -> Self {
        Self {
            probe,
            failure: Mutex::new(None),
            live_codes: Arc::new(Mutex::new(VecDeque::new())),
            images: Mutex::new(HashMap::new()),
        }
    }

    /// Make subsequent `start` calls fail (or succeed again with `None`).
    pub fn fail_with(&self, failure: Option<CameraError>) {
        *self.failure.lock() = failure;
    }

    /// Queue a payload for the live camera to decode.
    pub fn show_code(&self, payload: impl Into<String>) {
        self.live_codes.lock().push_back(payload.into());
    }

    /// Teach the still-image decoder that `image` contains `payload`.
    pub fn register_image(&self, image: impl Into<Vec<u8>>, payload: impl Into<String>) {
        self.images.lock().insert(image.into(), payload.into());
    }
}

#[async_trait]
impl CredentialScanner for MockCredentialScanner {
    async fn start(&self, _config: &ScannerConfig) -> Result<Box<dyn QrScanHandle>, CameraError> {
        let failure = self.failure.lock().clone();
        if let Some(err) = failure {
            return Err(err);
        }
        self.probe.acquire();
        Ok(Box::new(MockQrHandle {
            probe: self.probe.clone(),
            codes: self.live_codes.clone(),
            live: true,
        }))
    }

    async fn decode_image(&self, image: &[u8]) -> Option<String> {
        self.images.lock().get(image).cloned()
    }
}

/// Handle returned by [`MockCredentialScanner::start`].
pub struct MockQrHandle {
    probe: Arc<CameraProbe>,
    codes: Arc<Mutex<VecDeque<String>>>,
    live: bool,
}

impl QrScanHandle for MockQrHandle {
    fn try_next_code(&mut self) -> Option<String> {
        if !self.live {
            return None;
        }
        self.codes.lock().pop_front()
    }

    fn stop(&mut self) {
        if self.live {
            self.live = false;
            self.probe.release();
        }
    }
}

impl Drop for MockQrHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Mock face camera serving a fixed frame.
pub struct MockFrameCapture {
    probe: Arc<CameraProbe>,
    failure: Mutex<Option<CameraError>>,
    frame: Arc<Mutex<Frame>>,
}

impl MockFrameCapture {
    /// Face camera tracked by `probe`, serving a small placeholder JPEG.
    pub fn new(probe: Arc<CameraProbe>) -> Self {
        Self {
            probe,
            failure: Mutex::new(None),
            frame: Arc::new(Mutex::new(Frame::jpeg(
                vec![0xFF, 0xD8, 0xFF, 0xE0, 0xFF, 0xD9],
                640,
                480,
            ))),
        }
    }

    /// Make subsequent `open` calls fail (or succeed again with `None`).
    pub fn fail_with(&self, failure: Option<CameraError>) {
        *self.failure.lock() = failure;
    }
}

#[async_trait]
impl FrameCapture for MockFrameCapture {
    async fn open(&self, _config: &FrameConfig) -> Result<Box<dyn FaceStreamHandle>, CameraError> {
        let failure = self.failure.lock().clone();
        if let Some(err) = failure {
            return Err(err);
        }
        self.probe.acquire();
        Ok(Box::new(MockFaceStream {
            probe: self.probe.clone(),
            frame: self.frame.clone(),
            live: true,
        }))
    }
}

/// Handle returned by [`MockFrameCapture::open`].
pub struct MockFaceStream {
    probe: Arc<CameraProbe>,
    frame: Arc<Mutex<Frame>>,
    live: bool,
}

impl FaceStreamHandle for MockFaceStream {
    fn grab_frame(&mut self) -> Result<Frame, CameraError> {
        if !self.live {
            return Err(CameraError::NotOpen);
        }
        Ok(self.frame.lock().clone())
    }

    fn stop(&mut self) {
        if self.live {
            self.live = false;
            self.probe.release();
        }
    }
}

impl Drop for MockFaceStream {
    fn drop(&mut self) {
        self.stop();
    }
}

// =============================================================================
// Verification
// =============================================================================

/// Scripted verification service.
///
/// Answers from a queue; once empty it grants access to `"Test User"`.
/// While held, calls park until [`MockVerificationService::release`].
pub struct MockVerificationService {
    responses: Mutex<VecDeque<Result<VerificationOutcome, VerifyError>>>,
    requests: Mutex<Vec<VerificationRequest>>,
    arrived: Notify,
    held: AtomicBool,
    gate: Semaphore,
}

impl Default for MockVerificationService {
    fn default() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            arrived: Notify::new(),
            held: AtomicBool::new(false),
            gate: Semaphore::new(0),
        }
    }
}

impl MockVerificationService {
    /// Service that grants everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the next answer.
    pub fn respond_with(&self, response: Result<VerificationOutcome, VerifyError>) {
        self.responses.lock().push_back(response);
    }

    /// Park every call until released.
    pub fn hold(&self) {
        self.held.store(true, Ordering::SeqCst);
    }

    /// Let `count` parked (or future) calls answer.
    pub fn release(&self, count: usize) {
        self.gate.add_permits(count);
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<VerificationRequest> {
        self.requests.lock().clone()
    }

    /// Wait until at least `count` requests have arrived.
    pub async fn wait_for_requests(&self, count: usize) {
        loop {
            if self.requests.lock().len() >= count {
                return;
            }
            self.arrived.notified().await;
        }
    }
}

#[async_trait]
impl VerificationService for MockVerificationService {
    async fn verify(
        &self,
        request: VerificationRequest,
    ) -> Result<VerificationOutcome, VerifyError> {
        self.requests.lock().push(request);
        self.arrived.notify_one();

        if self.held.load(Ordering::SeqCst) {
            if let Ok(permit) = self.gate.acquire().await {
                permit.forget();
            }
        }

        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(VerificationOutcome::granted("Test User")))
    }
}

// =============================================================================
// Directory
// =============================================================================

/// In-memory directory store.
#[derive(Default)]
pub struct MockDirectoryStore {
    users: Mutex<Vec<UserRecord>>,
    logs: Mutex<Vec<AccessLogEntry>>,
    next_id: AtomicU64,
    unavailable: AtomicBool,
}

impl MockDirectoryStore {
    /// Empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate an unreachable store.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Append an audit entry.
    pub fn record_access(&self, entry: AccessLogEntry) {
        self.logs.lock().push(entry);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("mock store offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl DirectoryStore for MockDirectoryStore {
    async fn list_users(&self) -> Result<Vec<UserRecord>, StoreError> {
        self.check_available()?;
        Ok(self.users.lock().clone())
    }

    async fn register_user(
        &self,
        name: &str,
        photo: PhotoUpload,
    ) -> Result<Registration, StoreError> {
        self.check_available()?;
        if photo.bytes.is_empty() {
            return Err(StoreError::Rejected(
                "no face detected in the enrolment photo".to_string(),
            ));
        }

        let id = UserId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let qr: String = uuid::Uuid::new_v4().simple().to_string().chars().take(8).collect();
        self.users.lock().push(UserRecord {
            id,
            name: name.to_string(),
            qr: qr.clone(),
            photo: Some(format!("/static/faces/{}", photo.file_name)),
        });

        Ok(Registration {
            id: Some(id),
            qr_code: Some(qr),
            message: "Dodano".to_string(),
        })
    }

    async fn delete_user(&self, id: UserId) -> Result<(), StoreError> {
        self.check_available()?;
        self.users.lock().retain(|u| u.id != id);
        Ok(())
    }

    async fn list_logs(&self) -> Result<Vec<AccessLogEntry>, StoreError> {
        self.check_available()?;
        Ok(self.logs.lock().iter().rev().take(LOG_PAGE).cloned().collect())
    }
}
