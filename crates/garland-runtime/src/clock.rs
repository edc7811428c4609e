//! Frame clock

use std::time::Instant;

/// Tracks total and per-frame time. Ticked once per frame by the host;
/// every tween in the scene samples against `total_time`, so a frame is
/// internally consistent by construction.
pub struct FrameClock {
    /// Total elapsed time in seconds
    pub total_time: f64,
    /// Time since last frame in seconds
    pub delta_time: f64,
    last_instant: Instant,
    first_tick: bool,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            total_time: 0.0,
            delta_time: 0.0,
            last_instant: Instant::now(),
            first_tick: true,
        }
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock. Call once per frame.
    pub fn tick(&mut self) {
        let now = Instant::now();

        if self.first_tick {
            self.first_tick = false;
            self.last_instant = now;
            self.delta_time = 0.0;
            return;
        }

        let elapsed = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;

        // Clamp so a stall doesn't produce one giant animation step
        self.delta_time = elapsed.min(0.25);
        self.total_time += self.delta_time;
    }

    /// Advance by an explicit delta instead of wall time. Used by tests
    /// to step deterministically.
    pub fn advance(&mut self, dt: f64) {
        self.first_tick = false;
        self.delta_time = dt;
        self.total_time += dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_zero_delta() {
        let mut clock = FrameClock::new();
        clock.tick();
        assert_eq!(clock.delta_time, 0.0);
        assert_eq!(clock.total_time, 0.0);
    }

    #[test]
    fn advance_accumulates() {
        let mut clock = FrameClock::new();
        clock.advance(1.0 / 60.0);
        clock.advance(1.0 / 60.0);
        assert!((clock.total_time - 2.0 / 60.0).abs() < 1e-12);
        assert!((clock.delta_time - 1.0 / 60.0).abs() < 1e-12);
    }
}
