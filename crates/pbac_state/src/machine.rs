//! Per-entity lifecycle and the three-slot coordinator (spec §4.E).

use pbac_shared::EntitySlot;

use crate::timing::{FADEIN_DURATION_MS, FADEOUT_DURATION_MS, IDLE_THRESHOLD_MS, OCCLUDED_OPACITY, OCCLUSION_THRESHOLD_MS};

/// The five lifecycle states an entity slot can be in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetectionState {
    /// No longer detected and fully faded; alpha is 0.
    Hidden,
    /// Newly (re)detected; alpha ramps from 0 toward 1.
    FadingIn,
    /// Steadily detected; alpha is 1.
    Detected,
    /// Briefly lost; alpha decays toward [`OCCLUDED_OPACITY`].
    Occluded,
    /// Lost long enough to start fading to [`DetectionState::Hidden`].
    FadingOut,
}

fn ease_in_cubed(x: f32) -> f32 {
    x * x * x
}

fn ease_out_cubed(x: f32) -> f32 {
    1.0 - (1.0 - x).powi(3)
}

/// One entity's lifecycle: current state, the timestamps bounding it, and
/// the derived alpha multiplier.
#[derive(Clone, Copy, Debug)]
pub struct EntityStateMachine {
    state: DetectionState,
    state_entered_at: f64,
    last_detected_at: f64,
    alpha_multiplier: f32,
}

impl Default for EntityStateMachine {
    fn default() -> Self {
        Self {
            state: DetectionState::Hidden,
            state_entered_at: f64::NEG_INFINITY,
            last_detected_at: f64::NEG_INFINITY,
            alpha_multiplier: 0.0,
        }
    }
}

impl EntityStateMachine {
    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> DetectionState {
        self.state
    }

    /// Current alpha multiplier, sampled at the `now` passed to the most
    /// recent [`update`](Self::update) call.
    #[must_use]
    pub const fn alpha_multiplier(&self) -> f32 {
        self.alpha_multiplier
    }

    /// True in `Detected` and `FadingIn` — the Pool should write fresh
    /// targets. False otherwise, meaning targets are frozen at their last
    /// values and only alpha decays (spec §4.E "Derived queries").
    #[must_use]
    pub const fn should_update_targets(&self) -> bool {
        matches!(self.state, DetectionState::Detected | DetectionState::FadingIn)
    }

    /// True in `FadingOut` and `Occluded` — the Physics Simulator should
    /// engage drift mode for this entity's particles.
    #[must_use]
    pub const fn is_fading(&self) -> bool {
        matches!(self.state, DetectionState::FadingOut | DetectionState::Occluded)
    }

    fn transition_to(&mut self, new_state: DetectionState, now: f64, label: &str) {
        self.transition_to_at(new_state, now, now, label);
    }

    /// Transitions to `new_state`, but backdates `state_entered_at` to
    /// `entered_at` (clamped to never exceed `now`). Used for `FadingIn` so
    /// that a landmark already present in the tracking frame that triggered
    /// this tick doesn't sample `easeOut³(0) == 0` on its very first render
    /// tick (spec §8 scenario 1).
    fn transition_to_at(&mut self, new_state: DetectionState, entered_at: f64, now: f64, label: &str) {
        tracing::debug!(
            entity = label,
            from = ?self.state,
            to = ?new_state,
            now,
            "detection state transition"
        );
        self.state = new_state;
        self.state_entered_at = entered_at.min(now);
    }

    /// Advances this entity's lifecycle by one tick given whether it was
    /// detected this tick, and recomputes its alpha multiplier.
    ///
    /// `detected_since` is the timestamp of the tracking frame that reported
    /// this detection (spec §6's detector clock); it backdates the start of
    /// a `FadingIn` ramp so elapsed time is never zero on the first tick a
    /// detection is observed. Pass `now` when no such timestamp is tracked.
    fn update(&mut self, now: f64, is_detected: bool, detected_since: f64, label: &str) {
        if is_detected {
            self.last_detected_at = now;
        }
        let elapsed = now - self.state_entered_at;

        match self.state {
            DetectionState::Hidden => {
                if is_detected {
                    self.transition_to_at(DetectionState::FadingIn, detected_since, now, label);
                }
            }
            DetectionState::FadingIn => {
                if is_detected {
                    if elapsed >= FADEIN_DURATION_MS {
                        self.transition_to(DetectionState::Detected, now, label);
                    }
                } else {
                    self.transition_to(DetectionState::Occluded, now, label);
                }
            }
            DetectionState::Detected => {
                if !is_detected {
                    self.transition_to(DetectionState::Occluded, now, label);
                }
            }
            DetectionState::Occluded => {
                if is_detected {
                    self.transition_to_at(DetectionState::FadingIn, detected_since, now, label);
                } else if now - self.last_detected_at >= OCCLUSION_THRESHOLD_MS {
                    self.transition_to(DetectionState::FadingOut, now, label);
                }
            }
            DetectionState::FadingOut => {
                if is_detected {
                    self.transition_to_at(DetectionState::FadingIn, detected_since, now, label);
                } else if elapsed >= FADEOUT_DURATION_MS {
                    self.transition_to(DetectionState::Hidden, now, label);
                }
            }
        }

        self.recompute_alpha(now);
    }

    fn recompute_alpha(&mut self, now: f64) {
        self.alpha_multiplier = match self.state {
            DetectionState::Detected => 1.0,
            DetectionState::Hidden => 0.0,
            DetectionState::Occluded => self.alpha_multiplier + (OCCLUDED_OPACITY - self.alpha_multiplier) * 0.2,
            DetectionState::FadingOut => {
                let progress = (((now - self.state_entered_at) / FADEOUT_DURATION_MS).clamp(0.0, 1.0)) as f32;
                OCCLUDED_OPACITY * (1.0 - ease_in_cubed(progress))
            }
            DetectionState::FadingIn => {
                let progress = (((now - self.state_entered_at) / FADEIN_DURATION_MS).clamp(0.0, 1.0)) as f32;
                ease_out_cubed(progress)
            }
        };
    }
}

/// The three-slot coordinator: one [`EntityStateMachine`] each for hand
/// slot 0, hand slot 1 and face.
#[derive(Clone, Copy, Debug, Default)]
pub struct DetectionStateMachine {
    hand0: EntityStateMachine,
    hand1: EntityStateMachine,
    face: EntityStateMachine,
}

impl DetectionStateMachine {
    /// Builds a coordinator with all three entities `Hidden`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entity(&self, slot: EntitySlot) -> &EntityStateMachine {
        match slot {
            EntitySlot::Hand0 => &self.hand0,
            EntitySlot::Hand1 => &self.hand1,
            EntitySlot::Face => &self.face,
        }
    }

    fn entity_mut(&mut self, slot: EntitySlot) -> &mut EntityStateMachine {
        match slot {
            EntitySlot::Hand0 => &mut self.hand0,
            EntitySlot::Hand1 => &mut self.hand1,
            EntitySlot::Face => &mut self.face,
        }
    }

    fn label(slot: EntitySlot) -> &'static str {
        match slot {
            EntitySlot::Hand0 => "hand0",
            EntitySlot::Hand1 => "hand1",
            EntitySlot::Face => "face",
        }
    }

    /// Advances one entity slot's lifecycle by a tick.
    ///
    /// `detected_since` should be the timestamp of the tracking frame that
    /// produced `is_detected` (e.g. the interpolator's current frame
    /// timestamp); pass `now` if unavailable.
    pub fn update(&mut self, slot: EntitySlot, now: f64, is_detected: bool, detected_since: f64) {
        let label = Self::label(slot);
        self.entity_mut(slot).update(now, is_detected, detected_since, label);
    }

    /// Current alpha multiplier for `slot`.
    #[must_use]
    pub fn alpha_multiplier(&self, slot: EntitySlot) -> f32 {
        self.entity(slot).alpha_multiplier()
    }

    /// See [`EntityStateMachine::should_update_targets`].
    #[must_use]
    pub fn should_update_targets(&self, slot: EntitySlot) -> bool {
        self.entity(slot).should_update_targets()
    }

    /// See [`EntityStateMachine::is_fading`].
    #[must_use]
    pub fn is_fading(&self, slot: EntitySlot) -> bool {
        self.entity(slot).is_fading()
    }

    /// Current lifecycle state for `slot`, for diagnostics and tests.
    #[must_use]
    pub fn state(&self, slot: EntitySlot) -> DetectionState {
        self.entity(slot).state()
    }

    /// True iff no entity has been detected within [`IDLE_THRESHOLD_MS`] of
    /// `now`.
    #[must_use]
    pub fn is_idle(&self, now: f64) -> bool {
        let most_recent =
            self.hand0.last_detected_at.max(self.hand1.last_detected_at).max(self.face.last_detected_at);
        now - most_recent >= IDLE_THRESHOLD_MS
    }

    /// Resets all three entities to `Hidden` with zero alpha.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
