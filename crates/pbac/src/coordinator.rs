//! The System Coordinator: owns components A-F by value and drives them
//! through one [`Engine::tick`] call per render frame.

use pbac_core::ParticlePool;
use pbac_interp::LandmarkInterpolator;
use pbac_physics::{FadingFlags, PhysicsSimulator};
use pbac_shared::{ColorTheme, ConfigError, EntitySlot, PhysicsMode, RepulsionConfig, TrackingFrame, Vec2};
use pbac_state::DetectionStateMachine;

use crate::canvas::CanvasView;
use crate::config::EngineConfig;

/// Owns the particle pool, landmark interpolator, detection state machine
/// and physics simulator, and orchestrates them through one `tick(now)`
/// call per render frame: interpolate, update state machines, update pool
/// targets and alphas, advance physics, commit.
///
/// The Coordinator is the sole mutator of the particle pool (spec §5
/// "Shared resources").
pub struct Engine {
    pool: ParticlePool,
    interpolator: LandmarkInterpolator,
    state: DetectionStateMachine,
    physics: PhysicsSimulator,
    colors: ColorTheme,
    trail_fade_amount: f32,
    last_tick_ms: Option<f64>,
}

impl Engine {
    /// Builds an engine from `config`, validating and constructing the
    /// particle pool.
    ///
    /// # Errors
    /// Propagates [`ConfigError`] from pool construction.
    pub fn new(config: &EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let pool = ParticlePool::new(
            config.max_particles,
            config.canvas_width,
            config.canvas_height,
            config.base_particle_size,
            config.size_variance,
        )?;

        let mut physics = PhysicsSimulator::new();
        physics.set_attraction_config(config.attraction_strength, config.attraction_damping);
        physics.set_repulsion_config(config.repulsion);

        Ok(Self {
            pool,
            interpolator: LandmarkInterpolator::new(),
            state: DetectionStateMachine::new(),
            physics,
            colors: config.colors,
            trail_fade_amount: config.trail_fade_amount,
            last_tick_ms: None,
        })
    }

    /// Consumes one detection frame from the external detector (spec §6
    /// "Detector").
    pub fn push_frame(&mut self, frame: &TrackingFrame) {
        self.interpolator.push_frame(frame);
    }

    /// Runs one render tick at monotonic time `now_ms`: interpolates
    /// landmarks, advances the detection state machines, refreshes pool
    /// targets and alphas, advances physics by 0..4 fixed steps, and
    /// commits the pool's physics state into its GPU buffer. Returns the
    /// canvas-sink read view for this commit.
    pub fn tick(&mut self, now_ms: f64) -> CanvasView<'_> {
        let frame_dt_ms = match self.last_tick_ms {
            Some(prev) => (now_ms - prev).max(0.0),
            None => 0.0,
        };
        self.last_tick_ms = Some(now_ms);

        // Captured before the interpolated view borrows `self.interpolator`
        // mutably: backdates a fresh FadingIn entry to the tracking frame's
        // own timestamp rather than this render tick's, so a landmark
        // already present in that frame doesn't sample alpha 0 on arrival.
        let detected_since = self.interpolator.detection_timestamp();
        let view = self.interpolator.get_interpolated(now_ms);

        let hand0_detected = view.hand_visible(0);
        let hand1_detected = view.hand_visible(1);
        let face_detected = view.face_visible();
        self.state.update(EntitySlot::Hand0, now_ms, hand0_detected, detected_since);
        self.state.update(EntitySlot::Hand1, now_ms, hand1_detected, detected_since);
        self.state.update(EntitySlot::Face, now_ms, face_detected, detected_since);

        if self.state.should_update_targets(EntitySlot::Hand0) {
            self.pool.update_hand_targets(
                EntitySlot::Hand0,
                view.hand_landmarks(0),
                self.colors.left_hand,
                self.state.alpha_multiplier(EntitySlot::Hand0),
            );
        } else {
            self.pool.apply_hand_alpha_multiplier(EntitySlot::Hand0, self.state.alpha_multiplier(EntitySlot::Hand0));
        }

        if self.state.should_update_targets(EntitySlot::Hand1) {
            self.pool.update_hand_targets(
                EntitySlot::Hand1,
                view.hand_landmarks(1),
                self.colors.right_hand,
                self.state.alpha_multiplier(EntitySlot::Hand1),
            );
        } else {
            self.pool.apply_hand_alpha_multiplier(EntitySlot::Hand1, self.state.alpha_multiplier(EntitySlot::Hand1));
        }

        if self.state.should_update_targets(EntitySlot::Face) {
            self.pool.update_face_targets(
                view.face_landmarks(),
                self.colors.face,
                self.state.alpha_multiplier(EntitySlot::Face),
            );
        } else {
            self.pool.apply_face_alpha_multiplier(self.state.alpha_multiplier(EntitySlot::Face));
        }

        self.physics.maybe_snap(&mut self.pool);

        let fading = FadingFlags::new(
            self.state.is_fading(EntitySlot::Hand0),
            self.state.is_fading(EntitySlot::Hand1),
            self.state.is_fading(EntitySlot::Face),
        );
        self.physics.tick(&mut self.pool, frame_dt_ms, fading);

        self.pool.commit();
        CanvasView::new(self.pool.gpu_buffer(), self.pool.capacity(), self.pool.generation(), self.trail_fade_amount)
    }

    /// Switches the active force model (spec §6 "Control surface").
    pub fn set_physics_mode(&mut self, mode: PhysicsMode) {
        self.physics.set_mode(mode);
    }

    /// Replaces the Repel-mode tuning.
    pub fn set_repulsion_config(&mut self, repulsion: RepulsionConfig) {
        self.physics.set_repulsion_config(repulsion);
    }

    /// Replaces the per-slot color assignment. Takes effect on the next
    /// `tick` for any slot currently writing fresh targets.
    pub fn set_colors(&mut self, colors: ColorTheme) {
        self.colors = colors;
    }

    /// Updates the coordinate-conversion reference used by subsequent
    /// target updates. Allowed at any time (spec §7 "Resize events").
    pub fn set_canvas_size(&mut self, width_px: f32, height_px: f32) {
        self.pool.set_canvas_size(width_px, height_px);
    }

    /// Adds a one-off velocity kick to every currently visible particle.
    pub fn apply_impulse(&mut self, fx: f32, fy: f32) {
        self.physics.apply_impulse(&mut self.pool, Vec2::new(fx, fy));
    }

    /// Returns the system to the Hidden state across all entities: clears
    /// interpolator buffers, zeroes velocities, hides all particles, and
    /// resets the physics simulator's mode and accumulator (spec §5
    /// "Cancellation and timeouts").
    pub fn reset(&mut self) {
        self.pool.reset();
        self.interpolator.reset();
        self.state.reset();
        self.physics.reset();
        self.last_tick_ms = None;
    }

    /// The pool's total allocated particle count, for diagnostics.
    #[must_use]
    pub fn particle_count(&self) -> u32 {
        self.pool.capacity()
    }

    /// True iff no entity has been detected within the idle threshold of
    /// `now_ms`.
    #[must_use]
    pub fn is_idle(&self, now_ms: f64) -> bool {
        self.state.is_idle(now_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pbac_shared::{FaceObs, HandObs, Handedness, Landmark, FACE_LANDMARK_COUNT, HAND_LANDMARK_COUNT};

    fn hand_at(x: f32, y: f32) -> HandObs {
        HandObs { landmarks: vec![Landmark::new(x, y, 0.0, 1.0); HAND_LANDMARK_COUNT], handedness: Handedness::Right }
    }

    fn small_config() -> EngineConfig {
        EngineConfig { max_particles: 15_000, ..EngineConfig::default() }
    }

    #[test]
    fn test_cold_start_single_hand_lands_near_screen_position() {
        let mut engine = Engine::new(&small_config()).unwrap();
        engine.push_frame(&TrackingFrame { hands: vec![hand_at(0.3, 0.5)], face: None, timestamp_ms: 0.0 });
        let view = engine.tick(16.67);
        assert!(view.generation() >= 1);
        assert!(view.particle_count() > 0);

        let buf = view.buffer();
        let stride = ParticlePool::GPU_STRIDE;
        let mut any_visible = false;
        for i in 0..(view.particle_count() as usize) {
            let alpha = buf[i * stride + 6];
            if alpha > 0.0 {
                any_visible = true;
                let x = buf[i * stride];
                let y = buf[i * stride + 1];
                assert!((x - 1344.0).abs() < 30.0, "x={x}");
                assert!((y - 540.0).abs() < 30.0, "y={y}");
            }
        }
        assert!(any_visible);
    }

    #[test]
    fn test_occlusion_under_300ms_keeps_alpha_near_occluded_opacity() {
        let mut engine = Engine::new(&small_config()).unwrap();
        engine.push_frame(&TrackingFrame { hands: vec![hand_at(0.3, 0.5)], face: None, timestamp_ms: 0.0 });
        engine.tick(0.0);
        engine.tick(16.67);
        engine.push_frame(&TrackingFrame { hands: vec![hand_at(0.3, 0.5)], face: None, timestamp_ms: 100.0 });
        engine.tick(100.0);

        engine.tick(200.0);
        engine.tick(350.0);
        let view = engine.tick(450.0);

        let buf = view.buffer();
        let stride = ParticlePool::GPU_STRIDE;
        let max_alpha =
            (0..view.particle_count() as usize).map(|i| buf[i * stride + 6]).fold(0.0_f32, f32::max);
        assert!(max_alpha < 0.70, "expected fading-out alpha below OCCLUDED_OPACITY, got {max_alpha}");
        assert!(max_alpha > 0.0);
    }

    #[test]
    fn test_duplicate_frame_drop_does_not_crash() {
        let mut engine = Engine::new(&small_config()).unwrap();
        let frame = TrackingFrame { hands: vec![hand_at(0.3, 0.5)], face: None, timestamp_ms: 0.0 };
        engine.push_frame(&frame);
        engine.push_frame(&frame);
        let view = engine.tick(16.0);
        assert!(view.particle_count() > 0);
    }

    #[test]
    fn test_reset_hides_all_particles() {
        let mut engine = Engine::new(&small_config()).unwrap();
        engine.push_frame(&TrackingFrame { hands: vec![hand_at(0.3, 0.5)], face: None, timestamp_ms: 0.0 });
        engine.tick(16.67);
        engine.reset();
        let view = engine.tick(33.0);
        let buf = view.buffer();
        let stride = ParticlePool::GPU_STRIDE;
        assert!((0..view.particle_count() as usize).all(|i| buf[i * stride + 6] == 0.0));
    }

    #[test]
    fn test_theme_change_recolors_visible_hand_particles() {
        let mut engine = Engine::new(&small_config()).unwrap();
        engine.push_frame(&TrackingFrame { hands: vec![hand_at(0.3, 0.5)], face: None, timestamp_ms: 0.0 });
        engine.tick(16.67);

        engine.set_colors(ColorTheme::new(
            pbac_shared::Color::new(1.0, 0.0, 0.0),
            pbac_shared::Color::new(0.0, 1.0, 0.0),
            pbac_shared::Color::new(0.0, 0.0, 1.0),
        ));
        engine.push_frame(&TrackingFrame { hands: vec![hand_at(0.3, 0.5)], face: None, timestamp_ms: 33.0 });
        let view = engine.tick(33.0);

        let buf = view.buffer();
        let stride = ParticlePool::GPU_STRIDE;
        let mut checked = false;
        for i in 0..(view.particle_count() as usize) {
            let alpha = buf[i * stride + 6];
            if alpha > 0.01 {
                assert_eq!(buf[i * stride + 3], 1.0);
                assert_eq!(buf[i * stride + 4], 0.0);
                assert_eq!(buf[i * stride + 5], 0.0);
                checked = true;
            }
        }
        assert!(checked);
    }

    #[test]
    fn test_face_observation_populates_face_particles() {
        let mut engine = Engine::new(&small_config()).unwrap();
        let face = FaceObs { landmarks: vec![Landmark::new(0.5, 0.5, 0.0, 1.0); FACE_LANDMARK_COUNT] };
        engine.push_frame(&TrackingFrame { hands: vec![], face: Some(face), timestamp_ms: 0.0 });
        let view = engine.tick(16.67);

        let buf = view.buffer();
        let stride = ParticlePool::GPU_STRIDE;
        let any_face_visible = (0..view.particle_count() as usize).any(|i| buf[i * stride + 6] > 0.0);
        assert!(any_face_visible);
    }

    #[test]
    fn test_is_idle_true_with_no_detections() {
        let engine = Engine::new(&small_config()).unwrap();
        assert!(engine.is_idle(pbac_state::IDLE_THRESHOLD_MS + 1.0));
    }
}
