//! # PBAC Tables
//!
//! Distribution Tables \[A\] and Depth Scaler \[B\]: compile-time lookup
//! tables and closed-form math with no allocation and no I/O. Everything
//! here is a pure function of its arguments.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod depth;
pub mod spiral;
pub mod zones;

pub use depth::{scale, DepthProfile, DepthScaleResult};
pub use spiral::{spiral_offset, GOLDEN_ANGLE};
pub use zones::{face_zone, hand_zone, FaceZone, HandZone};
