//! # Gate Configuration
//!
//! Backend location, request limits, capture and scanner parameters.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::domain::{DEFAULT_FRAME_HEIGHT, DEFAULT_FRAME_WIDTH};

/// Complete gate configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateConfig {
    /// Base URL of the verification and directory backend.
    pub api_base_url: String,

    /// Whole-request timeout for backend calls, in seconds.
    pub request_timeout_secs: u64,

    /// TCP connect timeout for backend calls, in seconds.
    pub connect_timeout_secs: u64,

    /// Face capture parameters.
    pub frame: FrameConfig,

    /// Live QR scanner parameters.
    pub scanner: ScannerConfig,

    /// Capacity of the step transition broadcast channel.
    pub event_capacity: usize,
}

/// Face capture parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameConfig {
    /// Target frame width.
    pub width: u32,
    /// Target frame height.
    pub height: u32,
    /// JPEG quality (1-100).
    pub jpeg_quality: u8,
}

/// Which way the camera should face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    /// Towards the subject.
    User,
    /// Away from the subject.
    Environment,
}

/// Live QR scanner parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Decode attempts per second.
    pub fps: u32,
    /// Side of the square scan region, in pixels.
    pub qr_box: u32,
    /// Camera to use.
    pub facing_mode: FacingMode,
}

impl ScannerConfig {
    /// Delay between decode attempts.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.fps.max(1)))
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_FRAME_WIDTH,
            height: DEFAULT_FRAME_HEIGHT,
            jpeg_quality: 90,
        }
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            fps: 10,
            qr_box: 200,
            facing_mode: FacingMode::User,
        }
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:5000".to_string(),
            request_timeout_secs: 10,
            connect_timeout_secs: 2,
            frame: FrameConfig::default(),
            scanner: ScannerConfig::default(),
            event_capacity: 64,
        }
    }
}

impl GateConfig {
    /// Create a config for testing (short timeouts, fast scanner).
    pub fn for_testing() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:0".to_string(),
            request_timeout_secs: 2,
            connect_timeout_secs: 1,
            frame: FrameConfig::default(),
            scanner: ScannerConfig {
                fps: 100,
                ..ScannerConfig::default()
            },
            event_capacity: 256,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// - `GATE_API_URL`: backend base URL (default: http://127.0.0.1:5000)
    /// - `GATE_REQUEST_TIMEOUT_SECS`: request timeout (default: 10)
    /// - `GATE_CONNECT_TIMEOUT_SECS`: connect timeout (default: 2)
    /// - `GATE_FRAME_WIDTH` / `GATE_FRAME_HEIGHT`: capture size (default: 640x480)
    /// - `GATE_SCANNER_FPS`: QR decode rate (default: 10)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            api_base_url: env::var("GATE_API_URL").unwrap_or(defaults.api_base_url),
            request_timeout_secs: env_parse("GATE_REQUEST_TIMEOUT_SECS")
                .unwrap_or(defaults.request_timeout_secs),
            connect_timeout_secs: env_parse("GATE_CONNECT_TIMEOUT_SECS")
                .unwrap_or(defaults.connect_timeout_secs),
            frame: FrameConfig {
                width: env_parse("GATE_FRAME_WIDTH").unwrap_or(defaults.frame.width),
                height: env_parse("GATE_FRAME_HEIGHT").unwrap_or(defaults.frame.height),
                ..defaults.frame
            },
            scanner: ScannerConfig {
                fps: env_parse("GATE_SCANNER_FPS").unwrap_or(defaults.scanner.fps),
                ..defaults.scanner
            },
            event_capacity: defaults.event_capacity,
        }
    }

    /// Backend request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Backend connect timeout.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}
