//! Construction-time configuration errors.
//!
//! Once an engine is constructed, its per-tick operations are total — see
//! the crate-level docs of `pbac_core`/`pbac_physics`. Only the fallible
//! constructors in this workspace return `Result`, and they only ever fail
//! for the reasons enumerated here.

use thiserror::Error;

/// A configuration value rejected at construction time.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// `max_particles` was zero; the pool must hold at least one particle.
    #[error("max_particles must be greater than zero")]
    ZeroCapacity,

    /// A canvas dimension was zero, negative, NaN or infinite.
    #[error("canvas size must be finite and positive, got width={width}, height={height}")]
    NonFiniteCanvas {
        /// The rejected width.
        width: f32,
        /// The rejected height.
        height: f32,
    },

    /// A z-depth clamp range had `min >= max`.
    #[error("z-clamp range is inverted: min={min} must be less than max={max}")]
    InvertedZRange {
        /// The rejected lower bound.
        min: f32,
        /// The rejected upper bound.
        max: f32,
    },

    /// A repulsion radius band had `min_r >= max_r`.
    #[error("repulsion radius band is inverted: min_r={min_r} must be less than max_r={max_r}")]
    InvertedRepulsionRadius {
        /// The rejected lower bound.
        min_r: f32,
        /// The rejected upper bound.
        max_r: f32,
    },
}

/// Convenience alias for fallible construction in this workspace.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_are_stable() {
        assert_eq!(
            ConfigError::ZeroCapacity.to_string(),
            "max_particles must be greater than zero"
        );
        assert_eq!(
            ConfigError::InvertedZRange { min: 1.0, max: 0.0 }.to_string(),
            "z-clamp range is inverted: min=1 must be less than max=0"
        );
    }
}
