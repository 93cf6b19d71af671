//! The Physics Simulator \[F\] itself: a fixed-timestep integrator that
//! drives every particle's position and velocity from its target.

use pbac_core::ParticlePool;
use pbac_shared::{EntitySlot, PhysicsMode, RepulsionConfig, Vec2};

use crate::constants::{
    ALPHA_STEP_THRESHOLD, DEFAULT_ATTRACTION_DAMPING, DEFAULT_ATTRACTION_STRENGTH, DRIFT_ATTRACT_FRACTION,
    DRIFT_DAMPING, DRIFT_SCALE, FADING_NOISE_AMPLITUDE, FIXED_STEP_MS, MAX_STEPS_PER_TICK, MAX_VELOCITY,
    MODE_TRANSITION_MS, NOISE_AMPLITUDE,
};
use crate::forces::{attract_force, fading_drift, organic_noise, repel_force};

/// Which of the three entity slots currently hold a fading (occluded or
/// fading-out) particle, so the per-step loop can switch those particles
/// onto the weak drift force instead of the active mode's force.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FadingFlags {
    /// Hand slot 0 is fading.
    pub hand0: bool,
    /// Hand slot 1 is fading.
    pub hand1: bool,
    /// Face is fading.
    pub face: bool,
}

impl FadingFlags {
    /// Whether the entity a particle is bound to is currently fading.
    #[must_use]
    pub fn for_binding(self, binding: pbac_core::ParticleBinding) -> bool {
        match binding.landmark_type {
            pbac_shared::LandmarkType::Hand => {
                if binding.hand_slot == 0 {
                    self.hand0
                } else {
                    self.hand1
                }
            }
            pbac_shared::LandmarkType::Face => self.face,
        }
    }

    /// Builds flags from per-slot booleans, for callers that already track
    /// fading state per [`EntitySlot`].
    #[must_use]
    pub fn new(hand0: bool, hand1: bool, face: bool) -> Self {
        Self { hand0, hand1, face }
    }
}

/// Drives a [`ParticlePool`]'s position and velocity arrays forward in
/// fixed 16.67ms steps, accumulating leftover frame time across calls to
/// [`PhysicsSimulator::tick`] so the simulation rate stays independent of
/// the caller's frame rate.
pub struct PhysicsSimulator {
    accumulator_ms: f64,
    mode: PhysicsMode,
    repulsion: RepulsionConfig,
    attraction_strength: f32,
    attraction_damping: f32,
    elapsed_since_mode_change_ms: f64,
    has_snapped: bool,
    time_s: f32,
}

impl Default for PhysicsSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsSimulator {
    /// Builds a simulator starting in [`PhysicsMode::Attract`] with default
    /// repulsion tuning.
    #[must_use]
    pub fn new() -> Self {
        Self {
            accumulator_ms: 0.0,
            mode: PhysicsMode::Attract,
            repulsion: RepulsionConfig::DEFAULT,
            attraction_strength: DEFAULT_ATTRACTION_STRENGTH,
            attraction_damping: DEFAULT_ATTRACTION_DAMPING,
            elapsed_since_mode_change_ms: 0.0,
            has_snapped: false,
            time_s: 0.0,
        }
    }

    /// The active force model.
    #[must_use]
    pub const fn mode(&self) -> PhysicsMode {
        self.mode
    }

    /// Switches the active force model, restarting the mode-transition
    /// timer used by [`Self::mode_transition_progress`].
    pub fn set_mode(&mut self, mode: PhysicsMode) {
        self.mode = mode;
        self.elapsed_since_mode_change_ms = 0.0;
    }

    /// Flips between [`PhysicsMode::Attract`] and [`PhysicsMode::Repel`].
    pub fn toggle_mode(&mut self) {
        let next = match self.mode {
            PhysicsMode::Attract => PhysicsMode::Repel,
            PhysicsMode::Repel => PhysicsMode::Attract,
        };
        self.set_mode(next);
    }

    /// Replaces the Repel-mode tuning.
    pub fn set_repulsion_config(&mut self, repulsion: RepulsionConfig) {
        self.repulsion = repulsion;
    }

    /// Replaces the Attract-mode spring constant and velocity damping.
    pub fn set_attraction_config(&mut self, strength: f32, damping: f32) {
        self.attraction_strength = strength;
        self.attraction_damping = damping;
    }

    /// How far through the cosmetic mode-transition window the simulator
    /// is, from 0 (just switched) to 1 (transition window elapsed). Not
    /// applied to the force math, which adopts a new mode immediately —
    /// exposed only for callers that want to cross-fade a visual cue.
    #[must_use]
    pub fn mode_transition_progress(&self) -> f32 {
        (self.elapsed_since_mode_change_ms / MODE_TRANSITION_MS).clamp(0.0, 1.0) as f32
    }

    /// Snaps every particle onto its current target and zeroes velocity,
    /// but only the first time it is called after construction or
    /// [`Self::reset`]. Intended to be called once the caller's
    /// interpolator reports its first valid frame, so particles don't
    /// visibly fly in from the off-screen construction sentinel.
    pub fn maybe_snap(&mut self, pool: &mut ParticlePool) {
        if self.has_snapped {
            return;
        }
        pool.snap_to_targets();
        self.has_snapped = true;
    }

    /// Adds `impulse` to the velocity of every currently visible particle —
    /// a one-off kick, e.g. for a UI-triggered "burst" effect.
    pub fn apply_impulse(&mut self, pool: &mut ParticlePool, impulse: Vec2) {
        let arrays = pool.physics_arrays_mut();
        for i in 0..arrays.position.len() {
            if arrays.alpha[i] > ALPHA_STEP_THRESHOLD {
                arrays.velocity[i] += impulse;
            }
        }
    }

    /// Resets the simulator to its construction-time state: zero
    /// accumulator, zero elapsed time, un-snapped, default mode and
    /// repulsion tuning. Does not touch the pool itself.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Advances the simulation by `frame_dt_ms` of wall-clock time, running
    /// as many fixed 16.67ms steps as the accumulator holds, capped at
    /// [`MAX_STEPS_PER_TICK`] per call. Returns the number of steps run.
    ///
    /// `fading` marks which entity slots are currently in a fading
    /// (occluded or fading-out) detection state, so their particles use
    /// the weak drift force instead of the active mode's force for this
    /// tick.
    pub fn tick(&mut self, pool: &mut ParticlePool, frame_dt_ms: f64, fading: FadingFlags) -> u32 {
        self.accumulator_ms += frame_dt_ms;
        self.elapsed_since_mode_change_ms += frame_dt_ms;

        let mut steps = 0;
        while self.accumulator_ms >= FIXED_STEP_MS && steps < MAX_STEPS_PER_TICK {
            self.step_once(pool, fading);
            self.accumulator_ms -= FIXED_STEP_MS;
            self.time_s += (FIXED_STEP_MS / 1000.0) as f32;
            steps += 1;
        }
        // A long stall (tab backgrounded, debugger pause) can leave more
        // than MAX_STEPS_PER_TICK worth of time in the accumulator; drop
        // the remainder rather than let it buy a burst of extra steps on
        // the next tick.
        if steps == MAX_STEPS_PER_TICK {
            self.accumulator_ms = self.accumulator_ms.min(FIXED_STEP_MS);
        }
        steps
    }

    fn step_once(&mut self, pool: &mut ParticlePool, fading: FadingFlags) {
        let arrays = pool.physics_arrays_mut();
        let repulsion = self.repulsion;
        let mode = self.mode;
        let time_s = self.time_s;
        let attraction_strength = self.attraction_strength;
        let attraction_damping = self.attraction_damping;
        let drift_attract_k = attraction_strength * DRIFT_ATTRACT_FRACTION;

        for i in 0..arrays.position.len() {
            if arrays.alpha[i] <= ALPHA_STEP_THRESHOLD {
                continue;
            }
            let is_fading = fading.for_binding(arrays.binding[i]);
            let position = arrays.position[i];
            let target = arrays.target[i];
            let delta = target - position;
            let distance = delta.length();

            let (force, damping, noise_amplitude, drift) = if is_fading {
                (
                    attract_force(delta, drift_attract_k),
                    DRIFT_DAMPING,
                    FADING_NOISE_AMPLITUDE,
                    fading_drift(i, time_s) * DRIFT_SCALE,
                )
            } else {
                let (force, damping) = match mode {
                    PhysicsMode::Attract => (attract_force(delta, attraction_strength), attraction_damping),
                    PhysicsMode::Repel => {
                        let dir_to_target = if distance > 0.0 { delta * (1.0 / distance) } else { Vec2::ZERO };
                        (repel_force(distance, dir_to_target, &repulsion), repulsion.damping)
                    }
                };
                (force, damping, NOISE_AMPLITUDE, Vec2::ZERO)
            };

            let noise = organic_noise(position, i, time_s) * noise_amplitude;
            let velocity = (arrays.velocity[i] + force + noise + drift) * damping;
            let velocity = velocity.clamp_length(MAX_VELOCITY);

            arrays.velocity[i] = velocity;
            arrays.position[i] = position + velocity;
        }
    }
}

/// Convenience for callers that track fading per [`EntitySlot`] rather than
/// per boolean field.
impl From<[bool; 3]> for FadingFlags {
    fn from(slots: [bool; 3]) -> Self {
        Self { hand0: slots[0], hand1: slots[1], face: slots[2] }
    }
}

/// Index an [`EntitySlot`] into the three fading slots in pool-range order
/// (hand0, hand1, face).
#[must_use]
pub fn slot_index(slot: EntitySlot) -> usize {
    match slot {
        EntitySlot::Hand0 => 0,
        EntitySlot::Hand1 => 1,
        EntitySlot::Face => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pbac_core::ParticlePool;
    use pbac_shared::{Color, Landmark, HAND_LANDMARK_COUNT};

    fn pool_with_hand0_targeted() -> ParticlePool {
        let mut pool = ParticlePool::new(15_000, 1920.0, 1080.0, 4.0, 1.0).unwrap();
        let landmarks = vec![Landmark::new(0.5, 0.5, 0.0, 1.0); HAND_LANDMARK_COUNT];
        pool.update_hand_targets(EntitySlot::Hand0, &landmarks, Color::WHITE, 1.0);
        pool
    }

    #[test]
    fn test_tick_runs_capped_step_count() {
        let mut pool = pool_with_hand0_targeted();
        let mut sim = PhysicsSimulator::new();
        let steps = sim.tick(&mut pool, 1000.0, FadingFlags::default());
        assert!(steps <= MAX_STEPS_PER_TICK);
    }

    #[test]
    fn test_tick_with_no_elapsed_time_runs_zero_steps() {
        let mut pool = pool_with_hand0_targeted();
        let mut sim = PhysicsSimulator::new();
        assert_eq!(sim.tick(&mut pool, 0.0, FadingFlags::default()), 0);
    }

    #[test]
    fn test_attract_mode_moves_particles_toward_target() {
        let mut pool = pool_with_hand0_targeted();
        let mut sim = PhysicsSimulator::new();
        sim.maybe_snap(&mut pool);
        // perturb position away from target after the snap
        let idx = pool.range_map().hand_range(EntitySlot::Hand0, 0).start as usize;
        let target = pool.target()[idx];
        pool.position_mut()[idx] = Vec2::new(target.x - 200.0, target.y - 200.0);

        let before = pool.position()[idx].distance(target);
        for _ in 0..20 {
            sim.tick(&mut pool, 16.67, FadingFlags::default());
        }
        let after = pool.position()[idx].distance(target);
        assert!(after < before, "expected particle to move closer: before={before} after={after}");
    }

    #[test]
    fn test_repel_mode_settles_particles_within_ring() {
        let mut pool = pool_with_hand0_targeted();
        let mut sim = PhysicsSimulator::new();
        sim.maybe_snap(&mut pool);
        sim.set_mode(PhysicsMode::Repel);
        let idx = pool.range_map().hand_range(EntitySlot::Hand0, 0).start as usize;
        let target = pool.target()[idx];
        pool.position_mut()[idx] = Vec2::new(target.x, target.y);

        for _ in 0..200 {
            sim.tick(&mut pool, 16.67, FadingFlags::default());
        }
        let distance = pool.position()[idx].distance(target);
        assert!(distance.is_finite());
    }

    #[test]
    fn test_velocity_is_clamped_to_max() {
        let mut pool = pool_with_hand0_targeted();
        let mut sim = PhysicsSimulator::new();
        let idx = pool.range_map().hand_range(EntitySlot::Hand0, 0).start as usize;
        pool.position_mut()[idx] = Vec2::new(-10_000.0, -10_000.0);
        for _ in 0..10 {
            sim.tick(&mut pool, 16.67, FadingFlags::default());
            assert!(pool.velocity()[idx].length() <= MAX_VELOCITY + 1e-3);
        }
    }

    #[test]
    fn test_maybe_snap_only_happens_once() {
        let mut pool = pool_with_hand0_targeted();
        let mut sim = PhysicsSimulator::new();
        sim.maybe_snap(&mut pool);
        let idx = pool.range_map().hand_range(EntitySlot::Hand0, 0).start as usize;
        pool.position_mut()[idx] = Vec2::new(-999.0, -999.0);
        sim.maybe_snap(&mut pool);
        assert_eq!(pool.position()[idx], Vec2::new(-999.0, -999.0));
    }

    #[test]
    fn test_reset_restores_default_mode_and_unsnapped_state() {
        let mut sim = PhysicsSimulator::new();
        sim.set_mode(PhysicsMode::Repel);
        let mut pool = pool_with_hand0_targeted();
        sim.maybe_snap(&mut pool);

        sim.reset();
        assert_eq!(sim.mode(), PhysicsMode::Attract);
        assert_eq!(sim.mode_transition_progress(), 0.0);
    }

    #[test]
    fn test_apply_impulse_only_affects_visible_particles() {
        let mut pool = pool_with_hand0_targeted();
        let mut sim = PhysicsSimulator::new();
        let visible_idx = pool.range_map().hand_range(EntitySlot::Hand0, 0).start as usize;
        let hidden_idx = pool.range_map().hand_range(EntitySlot::Hand1, 0).start as usize;

        sim.apply_impulse(&mut pool, Vec2::new(5.0, 0.0));
        assert!(pool.velocity()[visible_idx].x > 0.0);
        assert_eq!(pool.velocity()[hidden_idx], Vec2::ZERO);
    }

    #[test]
    fn test_fading_particles_drift_even_when_settled_on_target() {
        let mut pool = pool_with_hand0_targeted();
        let mut sim = PhysicsSimulator::new();
        sim.maybe_snap(&mut pool);
        let idx = pool.range_map().hand_range(EntitySlot::Hand0, 0).start as usize;
        // particle is already sitting exactly on its (frozen) target.
        let settled = pool.target()[idx];
        pool.position_mut()[idx] = settled;

        let fading = FadingFlags::new(true, false, false);
        for _ in 0..10 {
            sim.tick(&mut pool, 16.67, fading);
        }
        let moved = pool.position()[idx].distance(settled);
        assert!(moved > 0.0, "a fading particle sitting on target should still drift, moved={moved}");
    }

    #[test]
    fn test_fading_flags_for_binding() {
        let flags = FadingFlags::new(true, false, true);
        let hand0 = pbac_core::ParticleBinding {
            landmark_index: 0,
            landmark_type: pbac_shared::LandmarkType::Hand,
            hand_slot: 0,
        };
        let hand1 = pbac_core::ParticleBinding {
            landmark_index: 0,
            landmark_type: pbac_shared::LandmarkType::Hand,
            hand_slot: 1,
        };
        let face =
            pbac_core::ParticleBinding { landmark_index: 0, landmark_type: pbac_shared::LandmarkType::Face, hand_slot: 0 };
        assert!(flags.for_binding(hand0));
        assert!(!flags.for_binding(hand1));
        assert!(flags.for_binding(face));
    }
}
