//! # PBAC Core
//!
//! The Particle Pool \[C\]: owns all particle memory for the process
//! lifetime. Particles are allocated once at construction and never
//! individually freed — there is no `free()` or `despawn()` in this crate,
//! only per-frame mutation of an already-bound particle's position, color
//! and alpha.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod binding;
pub mod layout;
pub mod pool;

pub use binding::ParticleBinding;
pub use layout::{ParticleRange, RangeMap};
pub use pool::{ParticlePool, PhysicsArraysMut};
