//! The fixed-size landmark buffer shared by `prev`, `curr` and `output`
//! (spec §4.D "Maintains two buffers... plus one output buffer").

use pbac_shared::{Handedness, Landmark, FACE_LANDMARK_COUNT, HAND_LANDMARK_COUNT};

/// `(2 hands × 21 + 468) × 4 floats` of landmark data, laid out as fixed
/// arrays so no buffer is ever heap-allocated or resized.
#[derive(Clone, Copy, Debug)]
pub struct FrameBuffer {
    pub(crate) hands: [[Landmark; HAND_LANDMARK_COUNT]; 2],
    pub(crate) face: [Landmark; FACE_LANDMARK_COUNT],
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self { hands: [[Landmark::default(); HAND_LANDMARK_COUNT]; 2], face: [Landmark::default(); FACE_LANDMARK_COUNT] }
    }
}

fn lerp_landmark(a: Landmark, b: Landmark, t: f32) -> Landmark {
    Landmark::new(
        a.x + (b.x - a.x) * t,
        a.y + (b.y - a.y) * t,
        a.z + (b.z - a.z) * t,
        a.visibility + (b.visibility - a.visibility) * t,
    )
}

impl FrameBuffer {
    pub(crate) fn lerp_into(prev: &Self, curr: &Self, t: f32, out: &mut Self) {
        for slot in 0..2 {
            for i in 0..HAND_LANDMARK_COUNT {
                out.hands[slot][i] = lerp_landmark(prev.hands[slot][i], curr.hands[slot][i], t);
            }
        }
        for i in 0..FACE_LANDMARK_COUNT {
            out.face[i] = lerp_landmark(prev.face[i], curr.face[i], t);
        }
    }
}

/// A read-only view over the interpolator's output buffer for a single
/// `get_interpolated` call, plus the per-slot visibility flags and
/// handedness labels that are not themselves interpolated (presence is a
/// discrete fact, not a continuous quantity).
#[derive(Clone, Copy, Debug)]
pub struct InterpolatedView<'a> {
    pub(crate) hands: &'a [[Landmark; HAND_LANDMARK_COUNT]; 2],
    pub(crate) face: &'a [Landmark; FACE_LANDMARK_COUNT],
    pub(crate) hand_visible: [bool; 2],
    pub(crate) face_visible: bool,
    pub(crate) handedness: [Handedness; 2],
}

impl<'a> InterpolatedView<'a> {
    /// The 21 interpolated landmarks for `slot`.
    #[must_use]
    pub fn hand_landmarks(&self, slot: usize) -> &'a [Landmark; HAND_LANDMARK_COUNT] {
        &self.hands[slot]
    }

    /// The 468 interpolated face landmarks.
    #[must_use]
    pub const fn face_landmarks(&self) -> &'a [Landmark; FACE_LANDMARK_COUNT] {
        self.face
    }

    /// Whether `slot` currently has an observed hand (not interpolated —
    /// a discrete presence flag from the most recent push).
    #[must_use]
    pub const fn hand_visible(&self, slot: usize) -> bool {
        self.hand_visible[slot]
    }

    /// Whether the face is currently observed.
    #[must_use]
    pub const fn face_visible(&self) -> bool {
        self.face_visible
    }

    /// The handedness label currently assigned to `slot`.
    #[must_use]
    pub const fn handedness(&self, slot: usize) -> Handedness {
        self.handedness[slot]
    }
}
