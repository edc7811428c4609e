//! The tween record: value + start time + duration + easing

use crate::Ease;
use garland_core::Vec3;

/// Values a tween can interpolate.
pub trait Lerp: Copy {
    fn lerp(a: Self, b: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Vec3 {
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        a.lerp(&b, t)
    }
}

/// One in-flight interpolation from `start` to `target`.
///
/// Time is absolute (seconds since some shared epoch, the same clock the
/// owner ticks with). The tween holds before `start_time + delay`, eases
/// through `duration`, then clamps at the target.
#[derive(Debug, Clone, Copy)]
pub struct Tween<T: Lerp> {
    pub start: T,
    pub target: T,
    pub start_time: f64,
    pub delay: f32,
    pub duration: f32,
    pub ease: Ease,
}

impl<T: Lerp> Tween<T> {
    pub fn new(start: T, target: T, start_time: f64, duration: f32, ease: Ease) -> Self {
        Self {
            start,
            target,
            start_time,
            delay: 0.0,
            duration,
            ease,
        }
    }

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }

    /// Sample the tween at absolute time `now`.
    pub fn sample(&self, now: f64) -> T {
        let elapsed = (now - self.start_time) as f32 - self.delay;
        if elapsed <= 0.0 {
            return self.start;
        }
        if self.duration <= 0.0 || elapsed >= self.duration {
            return self.target;
        }
        let t = self.ease.apply(elapsed / self.duration);
        T::lerp(self.start, self.target, t)
    }

    /// Whether the tween has reached its target at time `now`.
    pub fn finished(&self, now: f64) -> bool {
        (now - self.start_time) as f32 - self.delay >= self.duration
    }
}
