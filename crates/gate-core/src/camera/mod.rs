//! # Camera Resource Manager
//!
//! Exclusive, scoped ownership of the one live camera.
//!
//! The slot holds at most one handle. Installing a handle releases whatever
//! was there first, and dropping the slot releases the device, so every exit
//! path (reset, admin toggle, error, teardown) gives the camera back.

use tracing::debug;

use crate::domain::{CameraError, CameraRole, Frame};
use crate::ports::{FaceStreamHandle, QrScanHandle};

/// A live camera handle tagged with its purpose.
pub enum LiveCamera {
    /// QR scanning session.
    Qr(Box<dyn QrScanHandle>),
    /// Face video stream.
    Face(Box<dyn FaceStreamHandle>),
}

impl LiveCamera {
    /// Purpose of this handle.
    pub fn role(&self) -> CameraRole {
        match self {
            LiveCamera::Qr(_) => CameraRole::QrScanner,
            LiveCamera::Face(_) => CameraRole::FaceCapture,
        }
    }

    /// Stop the device. Safe to call more than once.
    pub fn stop(&mut self) {
        match self {
            LiveCamera::Qr(handle) => handle.stop(),
            LiveCamera::Face(handle) => handle.stop(),
        }
    }
}

/// Single-owner camera slot.
#[derive(Default)]
pub struct CameraSlot {
    live: Option<LiveCamera>,
}

impl CameraSlot {
    /// Empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `camera`, releasing any previous handle first.
    pub fn install(&mut self, camera: LiveCamera) {
        self.release();
        debug!(role = ?camera.role(), "Camera acquired");
        self.live = Some(camera);
    }

    /// Release the live handle, if any. Returns the role that was released.
    pub fn release(&mut self) -> Option<CameraRole> {
        let mut camera = self.live.take()?;
        let role = camera.role();
        camera.stop();
        debug!(role = ?role, "Camera released");
        Some(role)
    }

    /// Role of the live handle.
    pub fn role(&self) -> Option<CameraRole> {
        self.live.as_ref().map(LiveCamera::role)
    }

    /// Whether a handle is live.
    pub fn is_open(&self) -> bool {
        self.live.is_some()
    }

    /// Number of live handles (0 or 1).
    pub fn open_handles(&self) -> usize {
        usize::from(self.live.is_some())
    }

    /// Poll the QR session for a decoded payload.
    pub fn poll_code(&mut self) -> Result<Option<String>, CameraError> {
        match self.live.as_mut() {
            Some(LiveCamera::Qr(handle)) => Ok(handle.try_next_code()),
            _ => Err(CameraError::NotOpen),
        }
    }

    /// Grab a frame from the face stream.
    pub fn grab_frame(&mut self) -> Result<Frame, CameraError> {
        match self.live.as_mut() {
            Some(LiveCamera::Face(handle)) => handle.grab_frame(),
            _ => Err(CameraError::NotOpen),
        }
    }
}

impl Drop for CameraSlot {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FrameConfig, ScannerConfig};
    use crate::ports::{
        CameraProbe, CredentialScanner, FrameCapture, MockCredentialScanner, MockFrameCapture,
    };

    #[tokio::test]
    async fn test_install_releases_previous_handle() {
        let probe = CameraProbe::new();
        let scanner = MockCredentialScanner::new(probe.clone());
        let capture = MockFrameCapture::new(probe.clone());
        let mut slot = CameraSlot::new();

        slot.install(LiveCamera::Qr(
            scanner.start(&ScannerConfig::default()).await.unwrap(),
        ));
        assert_eq!(slot.role(), Some(CameraRole::QrScanner));

        let face = capture.open(&FrameConfig::default()).await.unwrap();
        // The mock opened a second device; installing must close the first.
        slot.install(LiveCamera::Face(face));
        assert_eq!(slot.role(), Some(CameraRole::FaceCapture));
        assert_eq!(probe.open_count(), 1);
    }

    #[tokio::test]
    async fn test_release_is_idempotent() {
        let probe = CameraProbe::new();
        let scanner = MockCredentialScanner::new(probe.clone());
        let mut slot = CameraSlot::new();
        slot.install(LiveCamera::Qr(
            scanner.start(&ScannerConfig::default()).await.unwrap(),
        ));

        assert_eq!(slot.release(), Some(CameraRole::QrScanner));
        assert_eq!(slot.release(), None);
        assert_eq!(probe.open_count(), 0);
        assert_eq!(slot.open_handles(), 0);
    }

    #[tokio::test]
    async fn test_drop_releases_device() {
        let probe = CameraProbe::new();
        let capture = MockFrameCapture::new(probe.clone());
        {
            let mut slot = CameraSlot::new();
            slot.install(LiveCamera::Face(
                capture.open(&FrameConfig::default()).await.unwrap(),
            ));
            assert_eq!(probe.open_count(), 1);
        }
        assert_eq!(probe.open_count(), 0);
    }

    #[tokio::test]
    async fn test_wrong_role_access() {
        let probe = CameraProbe::new();
        let scanner = MockCredentialScanner::new(probe.clone());
        let mut slot = CameraSlot::new();
        assert_eq!(slot.grab_frame(), Err(CameraError::NotOpen));

        slot.install(LiveCamera::Qr(
            scanner.start(&ScannerConfig::default()).await.unwrap(),
        ));
        assert_eq!(slot.grab_frame(), Err(CameraError::NotOpen));
        assert_eq!(slot.poll_code(), Ok(None));
    }
}
