//! Frame system trait

use crate::FrameClock;
use garland_core::Result;

/// A system ticked once per frame by the host loop, after input handling
/// and before rendering. All animation state for a frame is settled by the
/// time `update` returns.
pub trait FrameSystem {
    /// Advance the system to the clock's current time
    fn update(&mut self, clock: &FrameClock) -> Result<()>;

    /// Human-readable name for this system
    fn name(&self) -> &str;
}
