//! Garland Tween - Retargetable value animation
//!
//! Provides the building blocks the choreography driver animates with:
//! - `Ease`: easing curves mapping normalized time to normalized progress
//! - `Tween<T>`: one time-bounded interpolation record
//! - `Channel<T>`: a value slot whose active tween can be replaced
//!   mid-flight without snapping (the new tween starts from the live value)
//!
//! Tweens are cooperative: nothing runs on its own. The owner calls
//! `Channel::tick` once per frame with the current clock time, and every
//! channel is advanced before the frame renders.

mod channel;
mod ease;
mod tween;

pub use channel::Channel;
pub use ease::Ease;
pub use tween::{Lerp, Tween};
