//! # PBAC Shared
//!
//! Common types used by every crate in the particle binding & animation
//! core: landmark/tracking-frame data, color and physics-mode enums, the
//! small `Vec2` used throughout, and construction-time error types.
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER depend on:
//! - a GPU/window crate (`wgpu`, `raw-window-handle`, ...)
//! - anything that performs I/O
//!
//! If a type needs either of those, it belongs in a higher-level crate.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod color;
pub mod error;
pub mod landmarks;
pub mod math;
pub mod mode;

pub use color::{Color, ColorTheme};
pub use error::ConfigError;
pub use landmarks::{
    EntitySlot, FaceObs, HandObs, Handedness, Landmark, LandmarkType, TrackingFrame, FACE_LANDMARK_COUNT,
    HAND_LANDMARK_COUNT,
};
pub use math::Vec2;
pub use mode::{PhysicsMode, RepulsionConfig};
