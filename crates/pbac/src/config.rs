//! Startup configuration surface: the full set of tunables a host can load
//! once (typically from a TOML file) and pass to [`crate::Engine::new`].

use pbac_shared::{Color, ColorTheme, ConfigError, RepulsionConfig};
use serde::{Deserialize, Serialize};

/// Everything the engine needs at construction time, plus the one value
/// (`trail_fade_amount`) that is consumed only by the canvas sink, not by
/// the engine itself — it is carried here because it shares the
/// "alpha=0 must render as fully transparent" contract with the rest of
/// the color/alpha pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Hard upper bound on pool size; the Particle Pool clips the
    /// distribution tables to fit.
    pub max_particles: u32,
    /// Initial canvas width, in pixels.
    pub canvas_width: f32,
    /// Initial canvas height, in pixels.
    pub canvas_height: f32,
    /// Base particle size, in pixels.
    pub base_particle_size: f32,
    /// Per-particle size variance, in pixels.
    pub size_variance: f32,
    /// Initial color assignment for the three entity slots.
    pub colors: ColorTheme,
    /// Attract-mode spring constant.
    pub attraction_strength: f32,
    /// Attract-mode velocity damping factor.
    pub attraction_damping: f32,
    /// Repel-mode tuning.
    pub repulsion: RepulsionConfig,
    /// Fraction of trail persisted per frame by the canvas sink, in
    /// `[0, 1]`. Not read by the engine itself — recorded here so a host
    /// has one config file for the whole pipeline.
    pub trail_fade_amount: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_particles: 15_000,
            canvas_width: 1920.0,
            canvas_height: 1080.0,
            base_particle_size: 4.0,
            size_variance: 1.0,
            colors: ColorTheme::new(Color::new(0.2, 0.6, 1.0), Color::new(1.0, 0.4, 0.2), Color::new(0.8, 0.8, 0.9)),
            attraction_strength: pbac_physics::DEFAULT_ATTRACTION_STRENGTH,
            attraction_damping: pbac_physics::DEFAULT_ATTRACTION_DAMPING,
            repulsion: RepulsionConfig::DEFAULT,
            trail_fade_amount: 0.15,
        }
    }
}

/// Failures loading an [`EngineConfig`] from a TOML file. Distinct from
/// [`ConfigError`], which covers invariant violations in the values
/// themselves once parsed.
#[derive(Debug, thiserror::Error)]
pub enum EngineConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The config file's contents were not valid TOML for [`EngineConfig`].
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        /// Path that failed to parse.
        path: String,
        /// Underlying TOML error.
        #[source]
        source: Box<toml::de::Error>,
    },
    /// The parsed config's values violate a construction-time invariant.
    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

impl EngineConfig {
    /// Loads and validates a config from a TOML file at `path`.
    pub fn load_from_path(path: &str) -> Result<Self, EngineConfigError> {
        let text =
            std::fs::read_to_string(path).map_err(|source| EngineConfigError::Io { path: path.to_string(), source })?;
        Self::load_from_str(&text, path)
    }

    /// Loads and validates a config from a TOML string, using `label` in
    /// error messages.
    pub fn load_from_str(text: &str, label: &str) -> Result<Self, EngineConfigError> {
        let config: Self = toml::from_str(text)
            .map_err(|source| EngineConfigError::Parse { path: label.to_string(), source: Box::new(source) })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the configuration's invariants without constructing a pool.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_particles == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if !self.canvas_width.is_finite()
            || !self.canvas_height.is_finite()
            || self.canvas_width <= 0.0
            || self.canvas_height <= 0.0
        {
            return Err(ConfigError::NonFiniteCanvas { width: self.canvas_width, height: self.canvas_height });
        }
        if self.repulsion.min_r > self.repulsion.max_r {
            return Err(ConfigError::InvertedRepulsionRadius { min_r: self.repulsion.min_r, max_r: self.repulsion.max_r });
        }
        Ok(())
    }
}
