//! # PBAC Physics
//!
//! The Physics Simulator \[F\]: a fixed-16.67ms-timestep integrator that
//! applies attract or repel forces, organic noise and fade-drift directly
//! to a [`pbac_core::ParticlePool`]'s physics arrays.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod constants;
pub mod forces;
pub mod simulator;

pub use constants::{DEFAULT_ATTRACTION_DAMPING, DEFAULT_ATTRACTION_STRENGTH, FIXED_STEP_MS, MAX_STEPS_PER_TICK, MAX_VELOCITY};
pub use simulator::{FadingFlags, PhysicsSimulator};
