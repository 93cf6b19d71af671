//! Detector-facing data model (spec §3 "Data model").

use serde::{Deserialize, Serialize};

use crate::math::Vec2;

/// Number of landmarks in a hand observation.
pub const HAND_LANDMARK_COUNT: usize = 21;
/// Number of landmarks in a face observation.
pub const FACE_LANDMARK_COUNT: usize = 468;

/// Nominal clamp range for landmark depth (`z`), closer-than/farther-than
/// the reference landmark (wrist or nose).
pub const LANDMARK_Z_MIN: f32 = -0.3;
/// See [`LANDMARK_Z_MIN`].
pub const LANDMARK_Z_MAX: f32 = 0.3;

/// A single 3-D normalized landmark with a visibility confidence.
///
/// `x`/`y` are normalized camera coordinates in `[0, 1]`; `z` is depth
/// relative to a reference landmark, nominally in `[-0.3, 0.3]` with
/// negative values closer to the camera; `visibility` is in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Normalized camera x in `[0, 1]`.
    pub x: f32,
    /// Normalized camera y in `[0, 1]`.
    pub y: f32,
    /// Depth relative to the entity's reference landmark.
    pub z: f32,
    /// Detector confidence in `[0, 1]`.
    pub visibility: f32,
}

impl Landmark {
    /// Creates a new landmark.
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32, visibility: f32) -> Self {
        Self { x, y, z, visibility }
    }

    /// Returns the `(x, y)` pair as a [`Vec2`] in normalized camera space.
    #[must_use]
    pub const fn xy(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Converts normalized camera coordinates to screen-space pixels,
    /// mirrored horizontally to match the selfie-view camera (spec §4.C
    /// "Coordinate convention").
    #[must_use]
    pub fn to_screen(self, width_px: f32, height_px: f32) -> Vec2 {
        Vec2::new((1.0 - self.x) * width_px, self.y * height_px)
    }
}

/// Which hand an observation belongs to, as reported by the detector.
///
/// This is the detector's own left/right label and is independent of the
/// *slot* the hand is routed to (spec §3 "Entity slot" sorts by wrist x,
/// not handedness).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Handedness {
    /// Detector-reported left hand.
    Left,
    /// Detector-reported right hand.
    Right,
}

/// One detected hand: 21 landmarks plus a handedness label.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HandObs {
    /// The 21 hand landmarks, in the detector's canonical joint order.
    pub landmarks: Vec<Landmark>,
    /// Detector-reported handedness.
    pub handedness: Handedness,
}

impl HandObs {
    /// The wrist landmark (index 0), used to sort hands into slots.
    #[must_use]
    pub fn wrist(&self) -> Landmark {
        self.landmarks.first().copied().unwrap_or_default()
    }
}

/// One detected face: 468 mesh landmarks.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FaceObs {
    /// The 468 face-mesh landmarks, in the detector's canonical order.
    pub landmarks: Vec<Landmark>,
}

/// A single frame produced by the external detector at ~30 Hz.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TrackingFrame {
    /// Zero to two observed hands.
    pub hands: Vec<HandObs>,
    /// At most one observed face.
    pub face: Option<FaceObs>,
    /// Monotonically non-decreasing detector timestamp, in milliseconds.
    pub timestamp_ms: f64,
}

/// One of the three fixed logical entity slots the core routes
/// observations into (spec §3 "Entity slot").
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntitySlot {
    /// Leftmost-by-wrist-x hand.
    Hand0,
    /// Rightmost-by-wrist-x hand (or the only other hand slot).
    Hand1,
    /// The single face slot.
    Face,
}

/// Which kind of landmark a particle is bound to (part of the write-once
/// binding triple, spec §3 "Particle").
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LandmarkType {
    /// Bound to a hand landmark.
    Hand,
    /// Bound to a face landmark.
    Face,
}
