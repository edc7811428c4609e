//! A retargetable value channel
//!
//! The core rule: replacing the active tween never resets the value. The
//! replacement starts from whatever the channel last sampled, so rapid
//! re-triggering redirects motion instead of snapping it back.

use crate::{Ease, Lerp, Tween};

/// A single animated value with at most one active tween.
#[derive(Debug, Clone)]
pub struct Channel<T: Lerp> {
    current: T,
    active: Option<Tween<T>>,
}

impl<T: Lerp> Channel<T> {
    pub fn new(value: T) -> Self {
        Self {
            current: value,
            active: None,
        }
    }

    /// The most recently sampled value.
    pub fn value(&self) -> T {
        self.current
    }

    /// Whether a tween is still running.
    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    /// Set the value immediately, cancelling any tween. Initialization only;
    /// retargeting during playback goes through `go_to`.
    pub fn snap(&mut self, value: T) {
        self.current = value;
        self.active = None;
    }

    /// Start (or redirect) a tween toward `target`.
    ///
    /// Any in-flight tween is dropped; the new one starts from the
    /// channel's live value, so there is no discontinuity at the handoff.
    pub fn go_to(&mut self, target: T, duration: f32, delay: f32, ease: Ease, now: f64) {
        self.active = Some(Tween::new(self.current, target, now, duration, ease).with_delay(delay));
    }

    /// Advance to absolute time `now`, returning the sampled value.
    /// Finished tweens are retired with the value clamped at their target.
    pub fn tick(&mut self, now: f64) -> T {
        if let Some(tween) = &self.active {
            self.current = tween.sample(now);
            if tween.finished(now) {
                self.active = None;
            }
        }
        self.current
    }
}
