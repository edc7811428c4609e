//! Background starfield generation

use crate::STARFIELD_EXTENT;
use garland_core::{Rng, Vec3};

/// Uniform random star positions inside a cube wrapping the whole scene.
/// The cube deliberately overlaps the scatter shells; a few stars drifting
/// between the decorations reads better than a hollow box.
pub fn generate_starfield(rng: &mut Rng, count: usize) -> Vec<Vec3> {
    let half = STARFIELD_EXTENT / 2.0;
    (0..count)
        .map(|_| {
            Vec3::new(
                rng.range(-half, half),
                rng.range(-half, half),
                rng.range(-half, half),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produces_exact_count() {
        let mut rng = Rng::new(11);
        assert_eq!(generate_starfield(&mut rng, 2000).len(), 2000);
    }

    #[test]
    fn stays_inside_the_cube() {
        let mut rng = Rng::new(12);
        let half = STARFIELD_EXTENT / 2.0;
        for p in generate_starfield(&mut rng, 500) {
            assert!(p.x.abs() <= half && p.y.abs() <= half && p.z.abs() <= half);
        }
    }

    #[test]
    fn fills_every_octant() {
        let mut rng = Rng::new(13);
        let stars = generate_starfield(&mut rng, 2000);
        for axis in 0..3 {
            let pos = stars
                .iter()
                .filter(|p| [p.x, p.y, p.z][axis] > 0.0)
                .count();
            // A lopsided axis means the sampling collapsed
            assert!(pos > 600 && pos < 1400, "axis {axis}: {pos} positive");
        }
    }
}
