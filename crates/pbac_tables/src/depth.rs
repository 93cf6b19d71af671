//! Depth Scaler \[B\] (spec §4.B).
//!
//! Converts a landmark's `z` into an exponential spread-scale factor and a
//! depth-adjusted alpha multiplier. `HAND` and `FACE` use different curve
//! endpoints so facial proportions stay recognizable across typical
//! distance changes while hands read as more dramatically near/far.

/// Nominal clamp range for the input `z`, matching
/// `pbac_shared::landmarks::{LANDMARK_Z_MIN, LANDMARK_Z_MAX}`.
const Z_MIN: f32 = -0.3;
/// See [`Z_MIN`].
const Z_MAX: f32 = 0.3;

/// Which entity kind a depth scale is being computed for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DepthProfile {
    /// Hand landmarks: wider scale swing, more sensitive alpha falloff.
    Hand,
    /// Face landmarks: narrower scale swing, gentler alpha falloff.
    Face,
}

struct ProfileCurve {
    close: f32,
    far: f32,
    min_scale: f32,
    max_scale: f32,
    alpha_k: f32,
}

impl DepthProfile {
    const fn curve(self) -> ProfileCurve {
        match self {
            Self::Hand => ProfileCurve { close: 1.8, far: 0.5, min_scale: 0.3, max_scale: 2.5, alpha_k: 0.2 },
            Self::Face => ProfileCurve { close: 1.4, far: 0.7, min_scale: 0.5, max_scale: 1.8, alpha_k: 0.15 },
        }
    }
}

/// Output of [`scale`]: a spread-radius multiplier and an alpha multiplier,
/// both already clamped to their documented ranges.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DepthScaleResult {
    /// Multiplier applied to a particle's spiral spread radius.
    pub spread_scale: f32,
    /// Multiplier applied to a particle's base alpha.
    pub alpha_multiplier: f32,
}

/// Computes the depth-based spread scale and alpha multiplier for a
/// landmark's `z` under the given profile, using `base_alpha` as the
/// pre-depth alpha to adjust.
#[must_use]
pub fn scale(z: f32, profile: DepthProfile, base_alpha: f32) -> DepthScaleResult {
    let curve = profile.curve();
    let clamped_z = z.clamp(Z_MIN, Z_MAX);
    let t = (clamped_z - Z_MIN) / (Z_MAX - Z_MIN);

    let raw_scale = curve.close * (curve.far / curve.close).powf(t);
    let spread_scale = raw_scale.clamp(curve.min_scale, curve.max_scale);

    let s_prime = ((spread_scale - curve.far) / (curve.close - curve.far)).clamp(0.0, 1.0);
    let alpha_multiplier =
        (base_alpha * (1.0 - curve.alpha_k + curve.alpha_k * s_prime)).clamp(0.1, 1.0);

    DepthScaleResult { spread_scale, alpha_multiplier }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hand_closest_and_farthest_endpoints() {
        assert!((scale(-0.3, DepthProfile::Hand, 1.0).spread_scale - 1.8).abs() < 1e-4);
        assert!((scale(0.3, DepthProfile::Hand, 1.0).spread_scale - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_hand_midpoint_is_geometric_mean_not_linear() {
        let mid = scale(0.0, DepthProfile::Hand, 1.0).spread_scale;
        let expected = (0.5_f32 * 1.8).sqrt();
        assert!((mid - expected).abs() < 1e-3, "mid={mid} expected={expected}");
        assert!((mid - 1.15).abs() > 0.1, "must not equal the linear midpoint");
    }

    #[test]
    fn test_face_endpoints() {
        assert!((scale(-0.3, DepthProfile::Face, 1.0).spread_scale - 1.4).abs() < 1e-4);
        assert!((scale(0.3, DepthProfile::Face, 1.0).spread_scale - 0.7).abs() < 1e-4);
    }

    #[test]
    fn test_out_of_range_z_is_clamped_not_panicking() {
        let near = scale(-10.0, DepthProfile::Hand, 1.0);
        let far = scale(10.0, DepthProfile::Hand, 1.0);
        assert!((near.spread_scale - 1.8).abs() < 1e-4);
        assert!((far.spread_scale - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_alpha_multiplier_clamped_range() {
        let result = scale(0.3, DepthProfile::Hand, 0.05);
        assert!(result.alpha_multiplier >= 0.1);
        let result_near = scale(-0.3, DepthProfile::Hand, 2.0);
        assert!(result_near.alpha_multiplier <= 1.0);
    }

    #[test]
    fn test_closer_is_never_dimmer_than_farther() {
        let near = scale(-0.3, DepthProfile::Face, 1.0).alpha_multiplier;
        let far = scale(0.3, DepthProfile::Face, 1.0).alpha_multiplier;
        assert!(near >= far);
    }
}
