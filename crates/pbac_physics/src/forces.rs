//! Force and noise formulas applied per particle, per fixed step.

use pbac_shared::{RepulsionConfig, Vec2};

/// Unscaled organic-noise sample for the particle at `position`, indexed by
/// `particle_index` so neighboring particles drift out of phase at
/// simulation time `time_s`. Callers multiply the result by the amplitude
/// constant appropriate to the particle's current fade state.
#[must_use]
pub fn organic_noise(position: Vec2, particle_index: usize, time_s: f32) -> Vec2 {
    let i = particle_index as f32;
    Vec2::new(
        (position.x * 0.01 + time_s + i * 0.1).sin(),
        (position.y * 0.01 + time_s * 1.1 + i * 0.1).cos(),
    )
}

/// Attract-mode spring force pulling a particle toward its target, given
/// `delta = target - position` and spring constant `k`.
#[must_use]
pub fn attract_force(delta: Vec2, k: f32) -> Vec2 {
    delta * k
}

/// Additional drift vector applied only to fading (occluded/fading-out)
/// particles, on top of their (already reduced-amplitude) organic noise —
/// a distinct, position-independent oscillation so drifting particles keep
/// moving even once they've settled near their frozen target (spec §4.F
/// "Drift for fading particles... an additional drift").
#[must_use]
pub fn fading_drift(particle_index: usize, time_s: f32) -> Vec2 {
    let i = particle_index as f32;
    Vec2::new((time_s + i * 0.1).sin(), (1.2 * time_s + i * 0.15).cos())
}

/// Repel-mode force on a particle `distance` pixels from its target, along
/// `dir_to_target` (the unit vector pointing from the particle toward its
/// target). Three distance bands apply: full repulsion inside `min_r`, a
/// gentle band between `min_r` and `max_r`, and a pull back in beyond
/// `max_r`.
#[must_use]
pub fn repel_force(distance: f32, dir_to_target: Vec2, repulsion: &RepulsionConfig) -> Vec2 {
    if distance < repulsion.min_r {
        dir_to_target * (-(1.0 - distance / repulsion.min_r) * repulsion.strength * 20.0)
    } else if distance < repulsion.max_r {
        let equilibrium = (repulsion.min_r + repulsion.max_r) * 0.5;
        let radial = dir_to_target * (-(distance - equilibrium) * repulsion.strength * 0.1);
        let tangential = Vec2::new(-dir_to_target.y, dir_to_target.x) * 0.02;
        radial + tangential
    } else {
        dir_to_target * ((distance - repulsion.max_r) * repulsion.strength * 0.5)
    }
}
