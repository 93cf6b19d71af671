//! Fixed-timestep and integration constants (spec §4.F).

/// Fixed physics step duration, in milliseconds.
pub const FIXED_STEP_MS: f64 = 16.67;
/// Maximum number of fixed steps run in a single [`crate::PhysicsSimulator::tick`]
/// call, bounding the work done after a long stall (spec §4.F, §7 "Long stall").
pub const MAX_STEPS_PER_TICK: u32 = 4;
/// Hard clamp on per-step velocity magnitude, in pixels/step.
pub const MAX_VELOCITY: f32 = 50.0;

/// Default attract-mode spring constant, overridable via
/// [`crate::PhysicsSimulator::set_attraction_config`].
pub const DEFAULT_ATTRACTION_STRENGTH: f32 = 0.15;
/// Default attract-mode velocity damping factor, overridable via
/// [`crate::PhysicsSimulator::set_attraction_config`].
pub const DEFAULT_ATTRACTION_DAMPING: f32 = 0.92;

/// Duration over which `mode_transition_progress` ramps from 0 to 1 after
/// a mode change, in milliseconds. Exposed for callers that want to
/// cross-fade visuals; not applied to the force math itself (spec §9
/// open question: the reference semantics apply the new mode immediately).
pub const MODE_TRANSITION_MS: f64 = 300.0;

/// Base organic-noise amplitude applied to non-fading particles.
pub const NOISE_AMPLITUDE: f32 = 0.3;
/// Organic-noise amplitude applied to fading (drifting) particles —
/// reduced to 30% of the already-scaled base amplitude (spec §4.F "Drift
/// for fading particles").
pub const FADING_NOISE_AMPLITUDE: f32 = NOISE_AMPLITUDE * 0.3;

/// Weak attractor coefficient used for fading/drifting particles, as a
/// fraction of the active attraction strength.
pub const DRIFT_ATTRACT_FRACTION: f32 = 0.1;
/// Drift velocity scale for fading particles.
pub const DRIFT_SCALE: f32 = 0.5;
/// Velocity damping used while drifting, close to 1 so particles float
/// rather than snap back to their target.
pub const DRIFT_DAMPING: f32 = 0.97;

/// Visibility threshold below which a particle is skipped by the physics
/// step entirely (spec §4.F "Per-particle step... with alpha > 0.01").
pub const ALPHA_STEP_THRESHOLD: f32 = 0.01;
