//! The Particle Pool \[C\] itself (spec §4.C).

use pbac_shared::{Color, ConfigError, EntitySlot, Landmark, LandmarkType, Vec2, FACE_LANDMARK_COUNT, HAND_LANDMARK_COUNT};
use pbac_tables::{depth, face_zone, hand_zone, spiral_offset, DepthProfile};

use crate::binding::ParticleBinding;
use crate::layout::RangeMap;

/// Off-screen sentinel position particles start at (spec §4.C
/// "Construction"). Never observed by a consumer since the binding
/// particle's alpha is also 0 at construction.
const OFF_SCREEN: f32 = -1000.0;

/// Visibility threshold below which a landmark is treated as undetected
/// for the purpose of `base_alpha` (spec §4.C "visibility-gated").
const VISIBILITY_GATE: f32 = 0.0;

/// Owns every particle's physics state (struct-of-arrays) and the
/// interleaved GPU buffer rebuilt from it on [`ParticlePool::commit`].
///
/// Allocates exactly once, in [`ParticlePool::new`]. No method in this
/// struct grows, shrinks or reallocates any of its backing storage.
pub struct ParticlePool {
    capacity: u32,
    range_map: RangeMap,

    canvas_width: f32,
    canvas_height: f32,
    base_particle_size: f32,
    size_variance: f32,

    position: Box<[Vec2]>,
    velocity: Box<[Vec2]>,
    target: Box<[Vec2]>,
    size: Box<[f32]>,
    color: Box<[Color]>,
    base_alpha: Box<[f32]>,
    alpha: Box<[f32]>,
    binding: Box<[ParticleBinding]>,

    /// Interleaved `[x, y, size, r, g, b, alpha]` × N, stride 28 bytes.
    gpu_buffer: Box<[f32]>,
    generation: u64,
}

/// Borrowed view returned by [`ParticlePool::physics_arrays_mut`].
pub struct PhysicsArraysMut<'a> {
    /// Mutable per-particle position, indexed in pool order.
    pub position: &'a mut [Vec2],
    /// Mutable per-particle velocity, indexed in pool order.
    pub velocity: &'a mut [Vec2],
    /// Read-only per-particle target, indexed in pool order.
    pub target: &'a [Vec2],
    /// Read-only per-particle final alpha, indexed in pool order.
    pub alpha: &'a [f32],
    /// Read-only per-particle binding triple, indexed in pool order.
    pub binding: &'a [ParticleBinding],
}

impl ParticlePool {
    /// Floats per particle in the interleaved GPU buffer (spec §3
    /// "Interleaved GPU buffer").
    pub const GPU_STRIDE: usize = 7;

    /// Builds a new pool with at most `max_particles` particles,
    /// distributed across hand-slot-0, hand-slot-1 and face ranges in that
    /// order, clipping the distribution tables to fit the budget.
    ///
    /// # Errors
    /// Returns [`ConfigError::ZeroCapacity`] if `max_particles == 0`, or
    /// [`ConfigError::NonFiniteCanvas`] if the initial canvas size is not
    /// finite and positive.
    pub fn new(
        max_particles: u32,
        canvas_width: f32,
        canvas_height: f32,
        base_particle_size: f32,
        size_variance: f32,
    ) -> Result<Self, ConfigError> {
        if max_particles == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if !canvas_width.is_finite() || !canvas_height.is_finite() || canvas_width <= 0.0 || canvas_height <= 0.0 {
            return Err(ConfigError::NonFiniteCanvas { width: canvas_width, height: canvas_height });
        }

        let range_map = RangeMap::build(max_particles);
        let capacity = range_map.total;
        let n = capacity as usize;

        let mut binding = vec![
            ParticleBinding { landmark_index: 0, landmark_type: LandmarkType::Hand, hand_slot: 0 };
            n
        ]
        .into_boxed_slice();
        for slot in [EntitySlot::Hand0, EntitySlot::Hand1] {
            let hand_slot = match slot {
                EntitySlot::Hand0 => 0,
                EntitySlot::Hand1 => 1,
                EntitySlot::Face => unreachable!(),
            };
            for landmark_index in 0..HAND_LANDMARK_COUNT {
                let range = range_map.hand_range(slot, landmark_index);
                for idx in range.indices() {
                    binding[idx] = ParticleBinding {
                        landmark_index: landmark_index as u16,
                        landmark_type: LandmarkType::Hand,
                        hand_slot,
                    };
                }
            }
        }
        for landmark_index in 0..FACE_LANDMARK_COUNT {
            let range = range_map.face_range(landmark_index);
            for idx in range.indices() {
                binding[idx] = ParticleBinding {
                    landmark_index: landmark_index as u16,
                    landmark_type: LandmarkType::Face,
                    hand_slot: 0,
                };
            }
        }

        let size: Box<[f32]> = (0..n)
            .map(|i| {
                let phase = (i as f32 * pbac_tables::GOLDEN_ANGLE).sin();
                (base_particle_size + size_variance * phase * 0.5).max(0.1)
            })
            .collect();

        Ok(Self {
            capacity,
            range_map,
            canvas_width,
            canvas_height,
            base_particle_size,
            size_variance,
            position: vec![Vec2::new(OFF_SCREEN, OFF_SCREEN); n].into_boxed_slice(),
            velocity: vec![Vec2::ZERO; n].into_boxed_slice(),
            target: vec![Vec2::new(OFF_SCREEN, OFF_SCREEN); n].into_boxed_slice(),
            size,
            color: vec![Color::default(); n].into_boxed_slice(),
            base_alpha: vec![0.0; n].into_boxed_slice(),
            alpha: vec![0.0; n].into_boxed_slice(),
            binding,
            gpu_buffer: vec![0.0; n * Self::GPU_STRIDE].into_boxed_slice(),
            generation: 0,
        })
    }

    /// Total allocated particle count (spec invariant I2).
    #[must_use]
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// The static range map, for callers that need range bounds directly
    /// (e.g. the physics simulator iterating an entity's particles).
    #[must_use]
    pub const fn range_map(&self) -> &RangeMap {
        &self.range_map
    }

    /// Read-only position array, for the physics simulator's hot loop.
    #[must_use]
    pub fn position(&self) -> &[Vec2] {
        &self.position
    }

    /// Mutable position array.
    pub fn position_mut(&mut self) -> &mut [Vec2] {
        &mut self.position
    }

    /// Read-only velocity array.
    #[must_use]
    pub fn velocity(&self) -> &[Vec2] {
        &self.velocity
    }

    /// Mutable velocity array.
    pub fn velocity_mut(&mut self) -> &mut [Vec2] {
        &mut self.velocity
    }

    /// Borrows the fields the Physics Simulator's per-step loop needs all
    /// at once: mutable position/velocity alongside read-only target,
    /// alpha and binding. A single accessor avoids the simulator holding
    /// several separate `&mut self` borrows across one loop iteration.
    pub fn physics_arrays_mut(&mut self) -> PhysicsArraysMut<'_> {
        PhysicsArraysMut {
            position: &mut self.position,
            velocity: &mut self.velocity,
            target: &self.target,
            alpha: &self.alpha,
            binding: &self.binding,
        }
    }

    /// Read-only target array.
    #[must_use]
    pub fn target(&self) -> &[Vec2] {
        &self.target
    }

    /// Read-only alpha array (post-entity-multiplier, spec §3 "final
    /// alpha").
    #[must_use]
    pub fn alpha(&self) -> &[f32] {
        &self.alpha
    }

    /// The binding triple for a particle, for invariant checks.
    #[must_use]
    pub fn binding(&self, index: usize) -> ParticleBinding {
        self.binding[index]
    }

    /// Updates the coordinate-conversion reference used by subsequent
    /// `update_*_targets` calls. Infallible: resize events are allowed at
    /// any time (spec §7 "Resize events").
    pub fn set_canvas_size(&mut self, width_px: f32, height_px: f32) {
        self.canvas_width = width_px;
        self.canvas_height = height_px;
    }

    /// Alpha a *visible* landmark contributes before the depth scaler runs,
    /// in `[0.7, 1.0]`. Visibility gating itself happens after the depth
    /// scaler (see call sites below) so its `[0.1, 1.0]` output clamp can
    /// never float a gated-off landmark back above zero.
    fn visibility_base_alpha(visibility: f32) -> f32 {
        0.7 + 0.3 * visibility.clamp(0.0, 1.0)
    }

    /// Updates targets, color and alpha for every particle bound to hand
    /// `slot`, using `landmarks` (21 entries) and the entity's current
    /// `alpha_multiplier` from the detection state machine.
    ///
    /// # Panics
    /// Panics in debug builds if `landmarks.len() != HAND_LANDMARK_COUNT`.
    pub fn update_hand_targets(&mut self, slot: EntitySlot, landmarks: &[Landmark], color: Color, alpha_multiplier: f32) {
        debug_assert_eq!(landmarks.len(), HAND_LANDMARK_COUNT);
        for (landmark_index, landmark) in landmarks.iter().enumerate().take(HAND_LANDMARK_COUNT) {
            let zone = hand_zone(landmark_index);
            let range = self.range_map.hand_range(slot, landmark_index);
            let screen = landmark.to_screen(self.canvas_width, self.canvas_height);
            let base_alpha_raw = Self::visibility_base_alpha(landmark.visibility);
            let depth_result = depth::scale(landmark.z, DepthProfile::Hand, base_alpha_raw);
            let gated_alpha = if landmark.visibility <= VISIBILITY_GATE { 0.0 } else { depth_result.alpha_multiplier };

            for local in 0..range.count {
                let idx = (range.start + local) as usize;
                let offset = spiral_offset(local, range.count, zone.spread_min, zone.spread_max, depth_result.spread_scale);
                self.target[idx] = Vec2::new(screen.x + offset.x, screen.y + offset.y);
                self.color[idx] = color;
                self.base_alpha[idx] = gated_alpha;
                self.alpha[idx] = self.base_alpha[idx] * alpha_multiplier;
            }
        }
    }

    /// Updates targets, color and alpha for every face particle, using
    /// `landmarks` (468 entries) and the face entity's current
    /// `alpha_multiplier`. Each landmark's zone depth boost is applied by
    /// multiplying its `z` before the depth scale, not as a positional
    /// offset (spec §4.C).
    ///
    /// # Panics
    /// Panics in debug builds if `landmarks.len() != FACE_LANDMARK_COUNT`.
    pub fn update_face_targets(&mut self, landmarks: &[Landmark], color: Color, alpha_multiplier: f32) {
        debug_assert_eq!(landmarks.len(), FACE_LANDMARK_COUNT);
        for (landmark_index, landmark) in landmarks.iter().enumerate().take(FACE_LANDMARK_COUNT) {
            let zone = face_zone(landmark_index);
            let range = self.range_map.face_range(landmark_index);
            let screen = landmark.to_screen(self.canvas_width, self.canvas_height);
            let base_alpha_raw = Self::visibility_base_alpha(landmark.visibility);
            let boosted_z = landmark.z * zone.depth_boost;
            let depth_result = depth::scale(boosted_z, DepthProfile::Face, base_alpha_raw);
            let gated_alpha = if landmark.visibility <= VISIBILITY_GATE { 0.0 } else { depth_result.alpha_multiplier };

            for local in 0..range.count {
                let idx = (range.start + local) as usize;
                let offset = spiral_offset(local, range.count, zone.spread_min, zone.spread_max, depth_result.spread_scale);
                self.target[idx] = Vec2::new(screen.x + offset.x, screen.y + offset.y);
                self.color[idx] = color;
                self.base_alpha[idx] = gated_alpha;
                self.alpha[idx] = self.base_alpha[idx] * alpha_multiplier;
            }
        }
    }

    /// Rescales alpha for every particle bound to hand `slot` by `m`,
    /// without touching targets or color. Used during occlusion/fade-out
    /// while positions hold their last known values.
    pub fn apply_hand_alpha_multiplier(&mut self, slot: EntitySlot, m: f32) {
        for landmark_index in 0..HAND_LANDMARK_COUNT {
            let range = self.range_map.hand_range(slot, landmark_index);
            for idx in range.indices() {
                self.alpha[idx] = self.base_alpha[idx] * m;
            }
        }
    }

    /// Rescales alpha for every face particle by `m`, without touching
    /// targets or color.
    pub fn apply_face_alpha_multiplier(&mut self, m: f32) {
        for landmark_index in 0..FACE_LANDMARK_COUNT {
            let range = self.range_map.face_range(landmark_index);
            for idx in range.indices() {
                self.alpha[idx] = self.base_alpha[idx] * m;
            }
        }
    }

    /// Sets every particle's position equal to its target and zeroes
    /// velocity. Called once by the physics simulator on the first frame
    /// with valid interpolator data, to avoid a long zoom-in from the
    /// off-screen sentinel.
    pub fn snap_to_targets(&mut self) {
        self.position.copy_from_slice(&self.target);
        self.velocity.fill(Vec2::ZERO);
    }

    /// Copies the struct-of-arrays physics state into the interleaved GPU
    /// buffer and increments the validity generation counter.
    pub fn commit(&mut self) {
        for i in 0..self.capacity as usize {
            let base = i * Self::GPU_STRIDE;
            self.gpu_buffer[base] = self.position[i].x;
            self.gpu_buffer[base + 1] = self.position[i].y;
            self.gpu_buffer[base + 2] = self.size[i];
            self.gpu_buffer[base + 3] = self.color[i].r;
            self.gpu_buffer[base + 4] = self.color[i].g;
            self.gpu_buffer[base + 5] = self.color[i].b;
            self.gpu_buffer[base + 6] = self.alpha[i];
        }
        self.generation += 1;
    }

    /// The interleaved GPU buffer as committed by the last [`commit`](Self::commit) call.
    #[must_use]
    pub fn gpu_buffer(&self) -> &[f32] {
        &self.gpu_buffer
    }

    /// The commit generation counter; increments once per [`commit`](Self::commit) call.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Counts particles with alpha above the visibility threshold.
    /// Diagnostics only — not used by any hot-path decision.
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.alpha.iter().filter(|&&a| a > 0.01).count()
    }

    /// Resets every particle to its construction-time state: off-screen
    /// position, zero velocity, zero alpha. Binding fields are untouched
    /// (they are write-once for the process lifetime).
    pub fn reset(&mut self) {
        self.position.fill(Vec2::new(OFF_SCREEN, OFF_SCREEN));
        self.velocity.fill(Vec2::ZERO);
        self.target.fill(Vec2::new(OFF_SCREEN, OFF_SCREEN));
        self.base_alpha.fill(0.0);
        self.alpha.fill(0.0);
    }

    /// The particle size base/variance this pool was constructed with, for
    /// the system coordinator's config round-trip.
    #[must_use]
    pub const fn size_params(&self) -> (f32, f32) {
        (self.base_particle_size, self.size_variance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn landmarks_at(x: f32, y: f32, z: f32, visibility: f32, n: usize) -> Vec<Landmark> {
        vec![Landmark::new(x, y, z, visibility); n]
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert_eq!(ParticlePool::new(0, 1920.0, 1080.0, 4.0, 1.0), Err(ConfigError::ZeroCapacity));
    }

    #[test]
    fn test_non_finite_canvas_rejected() {
        assert_eq!(
            ParticlePool::new(1000, f32::NAN, 1080.0, 4.0, 1.0),
            Err(ConfigError::NonFiniteCanvas { width: f32::NAN, height: 1080.0 })
        );
    }

    #[test]
    fn test_construction_initializes_offscreen_and_invisible() {
        let pool = ParticlePool::new(15_000, 1920.0, 1080.0, 4.0, 1.0).unwrap();
        assert!(pool.alpha().iter().all(|&a| a == 0.0));
        assert!(pool.position().iter().all(|p| p.x == OFF_SCREEN && p.y == OFF_SCREEN));
    }

    #[test]
    fn test_binding_triple_is_set_and_never_touched_by_updates() {
        let mut pool = ParticlePool::new(15_000, 1920.0, 1080.0, 4.0, 1.0).unwrap();
        let before: Vec<_> = (0..pool.capacity() as usize).map(|i| pool.binding(i)).collect();

        let hand_landmarks = landmarks_at(0.3, 0.5, 0.0, 1.0, HAND_LANDMARK_COUNT);
        pool.update_hand_targets(EntitySlot::Hand0, &hand_landmarks, Color::new(1.0, 0.0, 0.0), 1.0);
        pool.apply_hand_alpha_multiplier(EntitySlot::Hand0, 0.5);

        let after: Vec<_> = (0..pool.capacity() as usize).map(|i| pool.binding(i)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_hand_slot_0_targets_land_near_mirrored_screen_position() {
        let mut pool = ParticlePool::new(15_000, 1920.0, 1080.0, 4.0, 1.0).unwrap();
        let hand_landmarks = landmarks_at(0.3, 0.5, 0.0, 1.0, HAND_LANDMARK_COUNT);
        pool.update_hand_targets(EntitySlot::Hand0, &hand_landmarks, Color::new(1.0, 0.0, 0.0), 1.0);

        let range = pool.range_map.hand_range(EntitySlot::Hand0, 0);
        for idx in range.indices() {
            let t = pool.target()[idx];
            assert!((t.x - 1344.0).abs() < 20.0, "x={}", t.x);
            assert!((t.y - 540.0).abs() < 20.0, "y={}", t.y);
        }
    }

    #[test]
    fn test_invisible_landmark_yields_zero_alpha() {
        let mut pool = ParticlePool::new(15_000, 1920.0, 1080.0, 4.0, 1.0).unwrap();
        let hand_landmarks = landmarks_at(0.3, 0.5, 0.0, 0.0, HAND_LANDMARK_COUNT);
        pool.update_hand_targets(EntitySlot::Hand0, &hand_landmarks, Color::new(1.0, 0.0, 0.0), 1.0);
        let range = pool.range_map.hand_range(EntitySlot::Hand0, 0);
        for idx in range.indices() {
            assert_eq!(pool.alpha()[idx], 0.0);
        }
    }

    #[test]
    fn test_only_touched_slot_gets_nonzero_alpha() {
        let mut pool = ParticlePool::new(15_000, 1920.0, 1080.0, 4.0, 1.0).unwrap();
        let hand_landmarks = landmarks_at(0.3, 0.5, 0.0, 1.0, HAND_LANDMARK_COUNT);
        pool.update_hand_targets(EntitySlot::Hand0, &hand_landmarks, Color::new(1.0, 0.0, 0.0), 1.0);

        let hand1_range = pool.range_map.hand_range(EntitySlot::Hand1, 0);
        let face_range = pool.range_map.face_range(0);
        assert!(hand1_range.indices().all(|i| pool.alpha()[i] == 0.0));
        assert!(face_range.indices().all(|i| pool.alpha()[i] == 0.0));
    }

    #[test]
    fn test_apply_alpha_multiplier_does_not_move_targets() {
        let mut pool = ParticlePool::new(15_000, 1920.0, 1080.0, 4.0, 1.0).unwrap();
        let hand_landmarks = landmarks_at(0.3, 0.5, 0.0, 1.0, HAND_LANDMARK_COUNT);
        pool.update_hand_targets(EntitySlot::Hand0, &hand_landmarks, Color::new(1.0, 0.0, 0.0), 1.0);
        let targets_before: Vec<_> = pool.target().to_vec();

        pool.apply_hand_alpha_multiplier(EntitySlot::Hand0, 0.5);
        assert_eq!(pool.target(), &targets_before[..]);

        let range = pool.range_map.hand_range(EntitySlot::Hand0, 0);
        for idx in range.indices() {
            assert!((pool.alpha()[idx] - pool.base_alpha[idx] * 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn test_commit_copies_physics_state_and_increments_generation() {
        let mut pool = ParticlePool::new(1000, 1920.0, 1080.0, 4.0, 1.0).unwrap();
        assert_eq!(pool.generation(), 0);
        pool.commit();
        assert_eq!(pool.generation(), 1);
        assert_eq!(pool.gpu_buffer().len(), pool.capacity() as usize * ParticlePool::GPU_STRIDE);
        assert_eq!(pool.gpu_buffer()[0], OFF_SCREEN);
        assert_eq!(pool.gpu_buffer()[1], OFF_SCREEN);
    }

    #[test]
    fn test_reset_clears_alpha_and_position_but_not_binding() {
        let mut pool = ParticlePool::new(15_000, 1920.0, 1080.0, 4.0, 1.0).unwrap();
        let hand_landmarks = landmarks_at(0.3, 0.5, 0.0, 1.0, HAND_LANDMARK_COUNT);
        pool.update_hand_targets(EntitySlot::Hand0, &hand_landmarks, Color::new(1.0, 0.0, 0.0), 1.0);
        let binding_before = pool.binding(0);

        pool.reset();
        assert!(pool.alpha().iter().all(|&a| a == 0.0));
        assert_eq!(pool.binding(0), binding_before);
    }

    #[test]
    fn test_visible_count_reflects_alpha_threshold() {
        let mut pool = ParticlePool::new(15_000, 1920.0, 1080.0, 4.0, 1.0).unwrap();
        assert_eq!(pool.visible_count(), 0);
        let hand_landmarks = landmarks_at(0.3, 0.5, 0.0, 1.0, HAND_LANDMARK_COUNT);
        pool.update_hand_targets(EntitySlot::Hand0, &hand_landmarks, Color::new(1.0, 0.0, 0.0), 1.0);
        assert!(pool.visible_count() > 0);
    }

    #[test]
    fn test_face_depth_boost_applied_before_scale() {
        let mut pool = ParticlePool::new(15_000, 1920.0, 1080.0, 4.0, 1.0).unwrap();
        let face_landmarks = landmarks_at(0.5, 0.5, 0.0, 1.0, FACE_LANDMARK_COUNT);
        pool.update_face_targets(&face_landmarks, Color::new(0.0, 0.0, 1.0), 1.0);
        // landmark 0 % 6 == 0 => Nose zone, depth_boost 1.3, so boosted z != 0
        // still lands within the hand-profile-independent face clamp range.
        let range = pool.range_map.face_range(0);
        for idx in range.indices() {
            assert!(pool.target()[idx].is_finite());
        }
    }
}
