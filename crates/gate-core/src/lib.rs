//! # Gate Core
//!
//! Two-factor access gate: a QR credential followed by a face capture,
//! checked by a remote verification service.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Flow
//!
//! ```text
//! AwaitingCredential ──credential──▶ AwaitingFace ──capture──▶ Verifying ──answer──▶ ResultShown
//!        ▲                                                                                │
//!        └────────────────────────────────── reset ◀──────────────────────────────────────┘
//! ```
//!
//! | Guarantee | Enforced by |
//! |-----------|-------------|
//! | At most one open camera | `camera::CameraSlot` + serialized acquisition |
//! | Credential held past the first step | `GateSession::accept_credential` |
//! | No result from an abandoned attempt | `AttemptEpoch` re-check after every await |
//! | No gate activity in admin mode | mode check on every gate operation |
//!
//! ## Module Structure
//!
//! ```text
//! gate-core/
//! ├── domain/          # Steps, tokens, frames, outcomes, directory records, view model
//! ├── camera/          # Single-owner camera slot
//! ├── ports/           # GateApi (inbound) + capability traits and mocks (outbound)
//! ├── application/     # GateSession, GateController, AdminConsole
//! ├── adapters/        # Still-image camera for headless runs
//! └── config.rs        # GateConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod application;
pub mod camera;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::{NoLiveCamera, StillFrameCapture};
pub use application::{AdminConsole, AdminError, AdminSnapshot, GateController, GateSession};
pub use camera::{CameraSlot, LiveCamera};
pub use config::{FacingMode, FrameConfig, GateConfig, ScannerConfig};
pub use domain::{
    AccessLogEntry, AccessStatus, AttemptEpoch, CameraError, CameraRole, CredentialToken,
    FaceRegion, Frame, GateError, GateMode, GateStep, GateView, PhotoUpload, Prompt,
    Registration, ResultTone, ResultView, StepTransition, UserId, UserRecord,
    VerificationOutcome, VerificationRequest, VerificationStatus,
};
pub use ports::{
    CredentialScanner, DirectoryStore, FaceStreamHandle, FrameCapture, GateApi, QrScanHandle,
    StoreError, VerificationService, VerifyError,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
