//! # PBAC State
//!
//! The Detection State Machine \[E\]: one sub-machine per entity slot
//! (hand 0, hand 1, face), each governing fade-in, occlusion hold,
//! fade-out and alpha-multiplier curves so a detection gap never produces
//! a visual pop.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod machine;
pub mod timing;

pub use machine::{DetectionState, DetectionStateMachine, EntityStateMachine};
pub use timing::{FADEIN_DURATION_MS, FADEOUT_DURATION_MS, IDLE_THRESHOLD_MS, OCCLUDED_OPACITY, OCCLUSION_THRESHOLD_MS};
