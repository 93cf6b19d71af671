//! # PBAC
//!
//! The System Coordinator: a thin orchestrator over the six components
//! (Distribution Tables, Depth Scaler, Particle Pool, Landmark
//! Interpolator, Detection State Machine, Physics Simulator) plus the
//! external interfaces a host embeds this core through.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod canvas;
pub mod config;
pub mod coordinator;

pub use canvas::CanvasView;
pub use config::EngineConfig;
pub use coordinator::Engine;
