//! Physics mode and the Repel mode's tunable parameters (spec §4.F).

use serde::{Deserialize, Serialize};

/// The two global force models the Physics Simulator can run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhysicsMode {
    /// Particles are pulled toward their bound landmark target.
    Attract,
    /// Each particle is pushed away from its own target inside a minimum
    /// radius, gently pulled toward an equilibrium band further out, and
    /// pulled back in beyond a maximum radius — not inter-particle
    /// repulsion.
    Repel,
}

impl Default for PhysicsMode {
    fn default() -> Self {
        Self::Attract
    }
}

/// Tunable parameters for `PhysicsMode::Repel` (spec §4.F).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RepulsionConfig {
    /// Below this distance, repulsion force is at full strength.
    pub min_r: f32,
    /// Beyond this distance, repulsion force is zero.
    pub max_r: f32,
    /// Repulsion force multiplier.
    pub strength: f32,
    /// Velocity damping applied alongside repulsion.
    pub damping: f32,
}

impl RepulsionConfig {
    /// Default repulsion tuning, per spec §4.F.
    pub const DEFAULT: Self = Self { min_r: 30.0, max_r: 120.0, strength: 0.12, damping: 0.88 };
}

impl Default for RepulsionConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_physics_mode_is_attract() {
        assert_eq!(PhysicsMode::default(), PhysicsMode::Attract);
    }

    #[test]
    fn test_default_repulsion_config() {
        let cfg = RepulsionConfig::default();
        assert_eq!(cfg.min_r, 30.0);
        assert_eq!(cfg.max_r, 120.0);
        assert_eq!(cfg.strength, 0.12);
        assert_eq!(cfg.damping, 0.88);
    }
}
