//! Frame ingestion and interpolated reads (spec §4.D).

use pbac_shared::{Handedness, HandObs, Landmark, TrackingFrame};

use crate::frame::{FrameBuffer, InterpolatedView};

/// Double-buffers detection frames and produces interpolated landmarks at
/// arbitrary render timestamps.
///
/// Single-writer (the detection callback calling [`push_frame`](Self::push_frame)),
/// single-reader (the render tick calling [`get_interpolated`](Self::get_interpolated)),
/// both assumed to run on one cooperative task (spec §5). A host running the
/// detector on a separate thread must serialize access itself.
pub struct LandmarkInterpolator {
    prev: FrameBuffer,
    curr: FrameBuffer,
    output: FrameBuffer,

    prev_visible: [bool; 2],
    curr_visible: [bool; 2],
    prev_face_visible: bool,
    curr_face_visible: bool,
    handedness: [Handedness; 2],

    prev_ts: f64,
    curr_ts: f64,
}

impl Default for LandmarkInterpolator {
    fn default() -> Self {
        Self::new()
    }
}

impl LandmarkInterpolator {
    /// Builds an interpolator with both buffers zeroed and no visible
    /// entities. The first `push_frame` is always accepted regardless of
    /// its timestamp.
    #[must_use]
    pub fn new() -> Self {
        Self {
            prev: FrameBuffer::default(),
            curr: FrameBuffer::default(),
            output: FrameBuffer::default(),
            prev_visible: [false; 2],
            curr_visible: [false; 2],
            prev_face_visible: false,
            curr_face_visible: false,
            handedness: [Handedness::Left, Handedness::Right],
            prev_ts: f64::NEG_INFINITY,
            curr_ts: f64::NEG_INFINITY,
        }
    }

    /// Resets the interpolator to its just-constructed state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Assigns the (zero, one or two) observed hands to slots 0/1 by
    /// sorting on wrist x, breaking exact ties toward whichever hand
    /// previously occupied a slot (spec §9 open question: "stable by
    /// previous slot").
    fn assign_slots<'a>(&self, hands: &'a [HandObs]) -> [Option<&'a HandObs>; 2] {
        match hands {
            [] => [None, None],
            [only] => {
                if only.wrist().x < 0.5 {
                    [Some(only), None]
                } else {
                    [None, Some(only)]
                }
            }
            [a, b, ..] => {
                let wa = a.wrist().x;
                let wb = b.wrist().x;
                if (wa - wb).abs() < f32::EPSILON {
                    if a.handedness == self.handedness[0] {
                        [Some(a), Some(b)]
                    } else {
                        [Some(b), Some(a)]
                    }
                } else if wa < wb {
                    [Some(a), Some(b)]
                } else {
                    [Some(b), Some(a)]
                }
            }
        }
    }

    /// Consumes one detection frame. A frame whose timestamp does not
    /// strictly advance past the current one is dropped (spec §5
    /// "Ordering guarantees": duplicate timestamp dropped, idempotent on
    /// re-push).
    pub fn push_frame(&mut self, frame: &TrackingFrame) {
        if frame.timestamp_ms <= self.curr_ts {
            tracing::trace!(ts = frame.timestamp_ms, "dropping duplicate/stale tracking frame");
            return;
        }

        let old_curr = self.curr;
        let old_curr_visible = self.curr_visible;
        let old_face_visible = self.curr_face_visible;

        self.prev = old_curr;
        self.prev_visible = old_curr_visible;
        self.prev_face_visible = old_face_visible;
        self.prev_ts = self.curr_ts;

        let slots = self.assign_slots(&frame.hands);
        for (slot, obs) in slots.into_iter().enumerate() {
            match obs {
                Some(hand) => {
                    let count = hand.landmarks.len().min(self.curr.hands[slot].len());
                    self.curr.hands[slot][..count].copy_from_slice(&hand.landmarks[..count]);
                    for lm in &mut self.curr.hands[slot][count..] {
                        *lm = Landmark::default();
                    }
                    self.curr_visible[slot] = true;
                    self.handedness[slot] = hand.handedness;
                }
                None => {
                    self.curr.hands[slot] = old_curr.hands[slot];
                    self.curr_visible[slot] = false;
                }
            }
        }

        match &frame.face {
            Some(face_obs) => {
                let count = face_obs.landmarks.len().min(self.curr.face.len());
                self.curr.face[..count].copy_from_slice(&face_obs.landmarks[..count]);
                for lm in &mut self.curr.face[count..] {
                    *lm = Landmark::default();
                }
                self.curr_face_visible = true;
            }
            None => {
                self.curr.face = old_curr.face;
                self.curr_face_visible = false;
            }
        }

        self.curr_ts = frame.timestamp_ms;
    }

    /// Produces an interpolated view at `render_ts`, clamping the blend
    /// factor to `[0, 1]` so the output never extrapolates past `curr`.
    pub fn get_interpolated(&mut self, render_ts: f64) -> InterpolatedView<'_> {
        let dt_frame = self.curr_ts - self.prev_ts;
        let t = if dt_frame <= 0.0 || !dt_frame.is_finite() {
            1.0
        } else {
            let elapsed = render_ts - self.curr_ts;
            (elapsed / dt_frame).clamp(0.0, 1.0) as f32
        };

        FrameBuffer::lerp_into(&self.prev, &self.curr, t, &mut self.output);

        InterpolatedView {
            hands: &self.output.hands,
            face: &self.output.face,
            hand_visible: self.curr_visible,
            face_visible: self.curr_face_visible,
            handedness: self.handedness,
        }
    }

    /// Whether `slot` has been populated by at least one `push_frame` call
    /// (i.e. interpolated data is meaningful, not just the zeroed default).
    #[must_use]
    pub fn has_ever_been_detected(&self, slot: usize) -> bool {
        self.curr_visible[slot] || self.prev_visible[slot]
    }

    /// Timestamp of the most recently pushed tracking frame, i.e. the
    /// detector's own clock (spec §6). Used to backdate a fresh
    /// `FadingIn` entry to when the detection actually arrived, rather
    /// than to the render tick observing it.
    #[must_use]
    pub const fn detection_timestamp(&self) -> f64 {
        self.curr_ts
    }
}
