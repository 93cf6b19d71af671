//! Golden-angle spiral offsets (spec §4.A "Golden-spiral offset").

use pbac_shared::Vec2;

/// `2π / φ²`, the golden angle in radians (≈ 137.5°), used to scatter
/// particles within a landmark's range without clumping.
pub const GOLDEN_ANGLE: f32 = 2.399_963_2;

/// Computes the offset from a landmark's center for the `i`-th of `total`
/// particles bound to it, given the zone's spread band and the depth
/// scale computed by [`crate::depth::scale`].
///
/// The golden angle distributes points on a sunflower-like spiral; the
/// square-root radius scaling gives uniform area density rather than
/// uniform linear density.
#[must_use]
pub fn spiral_offset(i: u32, total: u32, spread_min: f32, spread_max: f32, depth_scale: f32) -> Vec2 {
    let angle = i as f32 * GOLDEN_ANGLE;
    let t = (f64::from(i) / f64::from(total.max(1))).sqrt() as f32;
    let radius = (spread_min + (spread_max - spread_min) * t) * depth_scale;
    Vec2::new(angle.cos() * radius, angle.sin() * radius)
}
