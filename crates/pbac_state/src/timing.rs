//! Timing constants for the detection lifecycle (spec §4.E "Timing
//! constants").

/// Duration of the fade-out ramp, in milliseconds.
pub const FADEOUT_DURATION_MS: f64 = 200.0;
/// How long a loss of detection is tolerated as an occlusion hold before
/// fading out, in milliseconds.
pub const OCCLUSION_THRESHOLD_MS: f64 = 300.0;
/// Duration of the fade-in ramp, in milliseconds.
pub const FADEIN_DURATION_MS: f64 = 100.0;
/// Global: how long without any detection before the system is considered
/// idle, in milliseconds.
pub const IDLE_THRESHOLD_MS: f64 = 500.0;
/// Alpha an occluded entity's particles settle toward.
pub const OCCLUDED_OPACITY: f32 = 0.70;
