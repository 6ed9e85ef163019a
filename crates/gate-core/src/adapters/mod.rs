//! # Adapters Layer (Hexagonal Architecture)
//!
//! Outbound port implementations that live in the core crate.
//! HTTP adapters live in `gate-http`.

mod still_image;

pub use still_image::{NoLiveCamera, StillFrameCapture};
