//! # PBAC Interp
//!
//! The Landmark Interpolator \[D\]: double-buffers detection frames and
//! produces interpolated landmarks at arbitrary render timestamps, with no
//! prediction/extrapolation past the most recent detection.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod frame;
pub mod interpolator;

pub use frame::InterpolatedView;
pub use interpolator::LandmarkInterpolator;
