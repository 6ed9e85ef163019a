//! Still-image camera adapters for headless runs.
//!
//! `StillFrameCapture` stands in for the face camera by serving a JPEG
//! loaded from disk. `NoLiveCamera` refuses every live acquisition, so the
//! credential has to come from an upload or the command line.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::debug;

use crate::config::{FrameConfig, ScannerConfig};
use crate::domain::{CameraError, Frame};
use crate::ports::outbound::{CredentialScanner, FaceStreamHandle, FrameCapture, QrScanHandle};

/// Face "camera" backed by a JPEG file.
pub struct StillFrameCapture {
    path: PathBuf,
}

impl StillFrameCapture {
    /// Serve frames from the JPEG at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl FrameCapture for StillFrameCapture {
    async fn open(&self, config: &FrameConfig) -> Result<Box<dyn FaceStreamHandle>, CameraError> {
        let jpeg = tokio::fs::read(&self.path).await.map_err(|e| match e.kind() {
            ErrorKind::PermissionDenied => CameraError::PermissionDenied,
            _ => CameraError::Device(format!("{}: {}", self.path.display(), e)),
        })?;
        if jpeg.is_empty() {
            return Err(CameraError::Device(format!(
                "{}: empty image",
                self.path.display()
            )));
        }

        debug!(path = %self.path.display(), bytes = jpeg.len(), "Still frame loaded");
        Ok(Box::new(StillFrameStream {
            frame: Some(Frame::jpeg(jpeg, config.width, config.height)),
        }))
    }
}

struct StillFrameStream {
    frame: Option<Frame>,
}

impl FaceStreamHandle for StillFrameStream {
    fn grab_frame(&mut self) -> Result<Frame, CameraError> {
        self.frame.clone().ok_or(CameraError::NotOpen)
    }

    fn stop(&mut self) {
        self.frame = None;
    }
}

const NO_CAMERA: &str = "no live camera attached";

/// Camera stand-in for hosts without a device.
#[derive(Default)]
pub struct NoLiveCamera;

#[async_trait]
impl CredentialScanner for NoLiveCamera {
    async fn start(&self, _config: &ScannerConfig) -> Result<Box<dyn QrScanHandle>, CameraError> {
        Err(CameraError::Device(NO_CAMERA.to_string()))
    }

    async fn decode_image(&self, _image: &[u8]) -> Option<String> {
        None
    }
}

#[async_trait]
impl FrameCapture for NoLiveCamera {
    async fn open(&self, _config: &FrameConfig) -> Result<Box<dyn FaceStreamHandle>, CameraError> {
        Err(CameraError::Device(NO_CAMERA.to_string()))
    }
}
