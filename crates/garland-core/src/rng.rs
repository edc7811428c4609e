//! Lightweight xorshift32 PRNG, no external crate needed

/// Small, fast PRNG for layout generation and tween jitter.
///
/// Not cryptographic and not meant to be: each session re-seeds from the
/// wall clock, so layouts differ run to run. Construct with a fixed seed
/// in tests for repeatable scenarios.
pub struct Rng {
    state: u32,
}

impl Rng {
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    /// Seed from the system clock (sub-second bits included so rapid
    /// restarts still diverge).
    pub fn from_time() -> Self {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
            .unwrap_or(0xDEAD_BEEF);
        Self::new(nanos)
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Returns a float in [0, 1)
    pub fn next_f32(&mut self) -> f32 {
        // 24 mantissa bits keeps the result strictly below 1.0
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Returns a float in [min, max)
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }

    /// Returns an index in [0, len)
    pub fn index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        ((self.next_f32() * len as f32) as usize).min(len - 1)
    }

    /// Pick a random element from a non-empty slice
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.index(items.len())]
    }

    /// Uniform random point on a sphere shell of the given radius.
    ///
    /// Polar angle uses inverse-cosine sampling so points don't cluster
    /// at the poles.
    pub fn on_sphere(&mut self, radius: f32) -> crate::Vec3 {
        let theta = self.range(0.0, 2.0 * std::f32::consts::PI);
        let phi = (self.range(-1.0, 1.0)).acos();
        crate::Vec3::new(
            radius * phi.sin() * theta.cos(),
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_bounds() {
        let mut rng = Rng::new(42);
        for _ in 0..1000 {
            let v = rng.range(0.0, 10.0);
            assert!((0.0..10.0).contains(&v));
        }
    }

    #[test]
    fn next_f32_below_one() {
        let mut rng = Rng::new(7);
        for _ in 0..10_000 {
            let v = rng.next_f32();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn index_in_bounds() {
        let mut rng = Rng::new(99);
        for _ in 0..1000 {
            assert!(rng.index(5) < 5);
        }
    }

    #[test]
    fn on_sphere_radius() {
        let mut rng = Rng::new(123);
        for _ in 0..100 {
            let p = rng.on_sphere(30.0);
            assert!((p.length() - 30.0).abs() < 0.01);
        }
    }

    #[test]
    fn on_sphere_covers_both_hemispheres() {
        let mut rng = Rng::new(5);
        let mut above = 0;
        let mut below = 0;
        for _ in 0..1000 {
            let p = rng.on_sphere(1.0);
            if p.z > 0.0 {
                above += 1;
            } else {
                below += 1;
            }
        }
        // Inverse-cosine polar sampling should roughly balance the halves
        assert!(above > 350 && below > 350);
    }
}
