//! Garland Runtime - Frame loop infrastructure
//!
//! Provides the cooperative scheduling building blocks:
//! - `FrameClock`: per-frame time tracking tied to the display refresh
//! - `ToggleCell`: the single shared boolean with edge detection
//! - `FrameSystem`: trait for systems ticked once per frame

mod clock;
mod system;
mod toggle;

pub use clock::FrameClock;
pub use system::FrameSystem;
pub use toggle::ToggleCell;
