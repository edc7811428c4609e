//! Heart point cloud sampling
//!
//! Targets are rejection-sampled inside an implicit heart-shaped solid,
//! then remapped to world space standing upright above the tree. Every
//! point starts its flight at the scene center; the renderer interpolates
//! center → target on the GPU from a shared progress uniform, staggered
//! per point by its seed.

use garland_core::{GarlandError, Result, Rng, Vec3};

/// Half-extent of the bounding cube candidates are drawn from.
pub const HALF_EXTENT: f32 = 1.3;

/// Uniform math-space → world-space scale.
pub const WORLD_SCALE: f32 = 3.5;

/// Vertical offset lifting the heart above the tree.
pub const WORLD_LIFT: f32 = 2.0;

/// Upper bound on candidate draws per accepted point before we give up.
/// The solid fills roughly a tenth of the cube, so anywhere near this
/// limit means the implicit formula is broken, not that we're unlucky.
const MAX_DRAWS_PER_POINT: usize = 10_000;

/// One point of the heart cloud. The flight origin is the scene center
/// for every point and is not stored.
#[derive(Debug, Clone, Copy)]
pub struct HeartPoint {
    /// World-space destination inside the heart solid
    pub target: Vec3,
    /// Uniform random scalar in [0,1): staggers the point's animation
    /// window and blends its color and size
    pub seed: f32,
}

/// The implicit heart surface: negative inside, positive outside.
///
/// (x² + 9/4·y² + z² − 1)³ − x²z³ − 9/80·y²z³
pub fn implicit(x: f32, y: f32, z: f32) -> f32 {
    let a = x * x + (9.0 / 4.0) * y * y + z * z - 1.0;
    a * a * a - x * x * z * z * z - (9.0 / 80.0) * y * y * z * z * z
}

/// Map an accepted math-space sample to world space: uniform scale, swap
/// the Y/Z roles so the heart stands upright, lift above the tree.
fn to_world(x: f32, y: f32, z: f32) -> Vec3 {
    Vec3::new(
        x * WORLD_SCALE,
        z * WORLD_SCALE + WORLD_LIFT,
        y * WORLD_SCALE,
    )
}

/// Sample exactly `count` points uniformly inside the heart solid.
///
/// Rejection sampling against the bounding cube; acceptance probability is
/// a fixed geometric ratio, so the expected cost is O(count). A draw
/// ceiling turns a broken formula into an error instead of a hang.
pub fn sample(rng: &mut Rng, count: usize) -> Result<Vec<HeartPoint>> {
    let mut points = Vec::with_capacity(count);
    let mut draws = 0usize;

    while points.len() < count {
        if draws > count.max(1) * MAX_DRAWS_PER_POINT {
            return Err(GarlandError::Generation(format!(
                "heart sampler acceptance collapsed: {} accepted after {} draws",
                points.len(),
                draws
            )));
        }
        draws += 1;

        let x = rng.range(-HALF_EXTENT, HALF_EXTENT);
        let y = rng.range(-HALF_EXTENT, HALF_EXTENT);
        let z = rng.range(-HALF_EXTENT, HALF_EXTENT);

        if implicit(x, y, z) < 0.0 {
            points.push(HeartPoint {
                target: to_world(x, y, z),
                seed: rng.next_f32(),
            });
        }
    }

    println!(
        "[layout] Sampled {} heart points ({} draws, {:.1}% accepted)",
        count,
        draws,
        100.0 * count as f32 / draws as f32
    );
    Ok(points)
}

/// Per-point animation window: a point with seed `r` starts moving at
/// global progress 0.4·r and arrives 0.6 later, smoothstepped. Points with
/// small seeds lead; the whole cloud finishes together at progress 1.
///
/// The heart shader evaluates the same window on the GPU; this host-side
/// version is the reference the properties are checked against.
pub fn point_progress(seed: f32, global: f32) -> f32 {
    let start = seed * 0.4;
    smoothstep(start, start + 0.6, global)
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sampler_scenario_100_points() {
        let mut rng = Rng::new(42);
        let points = sample(&mut rng, 100).unwrap();
        assert_eq!(points.len(), 100);

        for p in &points {
            // Undo the world mapping and confirm the math-space point is
            // inside both the cube and the solid
            let x = p.target.x / WORLD_SCALE;
            let y = p.target.z / WORLD_SCALE;
            let z = (p.target.y - WORLD_LIFT) / WORLD_SCALE;
            assert!(x.abs() <= HALF_EXTENT && y.abs() <= HALF_EXTENT && z.abs() <= HALF_EXTENT);
            assert!(implicit(x, y, z) < 0.0);
            assert!((0.0..1.0).contains(&p.seed));
        }
    }

    #[test]
    fn acceptance_rate_in_expected_band() {
        // Measure the geometric acceptance ratio over a large batch. The
        // heart solid fills a stable fraction of the 2.6-cube; a formula
        // typo that near-empties the solid would crash through the floor.
        let mut rng = Rng::new(7);
        let trials = 200_000;
        let mut accepted = 0;
        for _ in 0..trials {
            let x = rng.range(-HALF_EXTENT, HALF_EXTENT);
            let y = rng.range(-HALF_EXTENT, HALF_EXTENT);
            let z = rng.range(-HALF_EXTENT, HALF_EXTENT);
            if implicit(x, y, z) < 0.0 {
                accepted += 1;
            }
        }
        let rate = accepted as f32 / trials as f32;
        assert!(rate > 0.05 && rate < 0.40, "acceptance rate {rate}");
    }

    #[test]
    fn implicit_classifies_known_points() {
        // Center of the solid is inside
        assert!(implicit(0.0, 0.0, 0.0) < 0.0);
        // Cube corners are well outside
        assert!(implicit(1.3, 1.3, 1.3) > 0.0);
        assert!(implicit(-1.3, 1.3, -1.3) > 0.0);
    }

    #[test]
    fn world_mapping_stands_heart_upright() {
        let mut rng = Rng::new(9);
        let points = sample(&mut rng, 500).unwrap();
        // The lobes extend along math z, which becomes world Y: the cloud
        // should be centered around the lift height
        let mean_y: f32 = points.iter().map(|p| p.target.y).sum::<f32>() / points.len() as f32;
        assert!((mean_y - WORLD_LIFT).abs() < 1.0);
    }

    #[test]
    fn point_progress_window_bounds() {
        for i in 0..100 {
            let seed = i as f32 / 100.0;
            // Not yet started at or before 0.4·seed
            assert_eq!(point_progress(seed, seed * 0.4), 0.0);
            assert_eq!(point_progress(seed, seed * 0.4 - 0.05), 0.0);
            // Finished at or after 0.4·seed + 0.6
            assert_eq!(point_progress(seed, seed * 0.4 + 0.6), 1.0);
            assert_eq!(point_progress(seed, 1.0), 1.0);
            // Strictly inside the window, strictly between
            let mid = point_progress(seed, seed * 0.4 + 0.3);
            assert!(mid > 0.0 && mid < 1.0);
        }
    }

    #[test]
    fn low_seeds_lead_the_formation() {
        let early = point_progress(0.1, 0.5);
        let late = point_progress(0.9, 0.5);
        assert!(early > late);
    }
}
