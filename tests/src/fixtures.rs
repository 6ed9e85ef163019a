//! Test fixtures shared by the integration modules.

use std::sync::Arc;
use std::time::Duration;

use gate_core::ports::{
    CameraProbe, MockCredentialScanner, MockFrameCapture, MockVerificationService,
};
use gate_core::{Frame, GateConfig, GateController};
use gate_http::{GateHttpClient, HttpDirectoryStore, HttpVerificationService};

/// Smallest byte string with JPEG start and end markers.
pub const JPEG_STUB: [u8; 4] = [0xFF, 0xD8, 0xFF, 0xD9];

/// A 640x480 frame around [`JPEG_STUB`].
pub fn jpeg_frame() -> Frame {
    Frame::jpeg(JPEG_STUB.to_vec(), 640, 480)
}

/// Gate wired to in-memory cameras and verification service.
pub struct MockGate {
    pub gate: Arc<GateController>,
    pub probe: Arc<CameraProbe>,
    pub scanner: Arc<MockCredentialScanner>,
    pub capture: Arc<MockFrameCapture>,
    pub verifier: Arc<MockVerificationService>,
}

impl MockGate {
    pub fn new() -> Self {
        gate_telemetry::init_test_logging();

        let probe = CameraProbe::new();
        let scanner = Arc::new(MockCredentialScanner::new(probe.clone()));
        let capture = Arc::new(MockFrameCapture::new(probe.clone()));
        let verifier = Arc::new(MockVerificationService::new());
        let gate = Arc::new(GateController::new(
            GateConfig::for_testing(),
            scanner.clone(),
            capture.clone(),
            verifier.clone(),
        ));
        Self {
            gate,
            probe,
            scanner,
            capture,
            verifier,
        }
    }
}

impl Default for MockGate {
    fn default() -> Self {
        Self::new()
    }
}

/// Backend client pointed at `base_url` with short test timeouts.
pub fn http_client(base_url: &str) -> GateHttpClient {
    let config = GateConfig {
        api_base_url: base_url.to_string(),
        ..GateConfig::for_testing()
    };
    GateHttpClient::from_config(&config)
        .unwrap_or_else(|e| panic!("cannot build client for {base_url}: {e}"))
}

/// Gate wired to mock cameras and the HTTP verification adapter.
pub struct HttpGate {
    pub gate: Arc<GateController>,
    pub probe: Arc<CameraProbe>,
    pub scanner: Arc<MockCredentialScanner>,
    pub store: Arc<HttpDirectoryStore>,
}

impl HttpGate {
    pub fn new(base_url: &str) -> Self {
        gate_telemetry::init_test_logging();

        let api = http_client(base_url);
        let probe = CameraProbe::new();
        let scanner = Arc::new(MockCredentialScanner::new(probe.clone()));
        let gate = Arc::new(GateController::new(
            GateConfig {
                api_base_url: base_url.to_string(),
                ..GateConfig::for_testing()
            },
            scanner.clone(),
            Arc::new(MockFrameCapture::new(probe.clone())),
            Arc::new(HttpVerificationService::new(api.clone())),
        ));
        Self {
            gate,
            probe,
            scanner,
            store: Arc::new(HttpDirectoryStore::new(api)),
        }
    }
}

/// Upper bound for anything a test awaits.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);
