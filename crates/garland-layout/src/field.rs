//! Main field and ribbon track generation

use crate::palette::{GREEN_PALETTE, LIGHT_PALETTE, ORNAMENT_PALETTE, RIBBON_COLORS};
use crate::{
    ITEM_COUNT, MAX_RADIUS, RIBBON_SCATTER_RADIUS, RIBBON_SEGMENTS, RIBBON_STRANDS,
    SCATTER_RADIUS_MAX, SCATTER_RADIUS_MIN, TREE_HEIGHT,
};
use garland_core::{Color, Rng, Vec3};
use std::f32::consts::PI;

/// Renderable archetype of one decoration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrnamentShape {
    Sphere,
    Box,
    Leaf,
    Light,
    Ribbon,
    /// The tree-topper. Exactly one, not part of the spiral.
    Star,
}

/// One decoration of the field. Every field is fixed at generation time;
/// the animation driver owns the runtime transform separately.
#[derive(Debug, Clone)]
pub struct Ornament {
    pub shape: OrnamentShape,
    pub color: Color,
    /// Position on the tree (or ribbon) spiral
    pub rest_position: Vec3,
    /// Random position on the scatter shell
    pub scatter_position: Vec3,
    /// Euler rest rotation in radians; tangent-following for ribbons
    pub rest_rotation: Vec3,
    /// Non-uniform for ribbons, uniform for everything else
    pub rest_scale: Vec3,
}

/// Spiral radius at sample `i` of `n`: shrinks linearly base → tip.
pub fn spiral_radius(i: usize, n: usize) -> f32 {
    (1.0 - i as f32 / n as f32) * MAX_RADIUS
}

/// Spiral height at sample `i` of `n`: rises linearly −H/2 → +H/2.
pub fn spiral_height(i: usize, n: usize) -> f32 {
    (i as f32 / n as f32) * TREE_HEIGHT - TREE_HEIGHT / 2.0
}

/// Generate the full decoration field: `ITEM_COUNT` spiral decorations
/// plus `RIBBON_SEGMENTS` ribbon segments across two strands.
pub fn generate_field(rng: &mut Rng) -> Vec<Ornament> {
    let mut field = generate_main(rng, ITEM_COUNT);
    field.extend(generate_ribbons(rng, RIBBON_SEGMENTS));
    println!(
        "[layout] Generated {} decorations ({} spiral, {} ribbon)",
        field.len(),
        ITEM_COUNT,
        RIBBON_SEGMENTS
    );
    field
}

/// The cone-spiral main field. Exposed with an explicit count for
/// small-scale scenario tests.
pub fn generate_main(rng: &mut Rng, count: usize) -> Vec<Ornament> {
    let mut out = Vec::with_capacity(count);

    for i in 0..count {
        let t = i as f32 / count as f32;
        // ~25 full turns base to tip, with per-item angular jitter
        let angle = t * PI * 50.0 + rng.range(0.0, 0.5);
        let radius = spiral_radius(i, count);
        let jitter = 0.8;
        let rest_position = Vec3::new(
            angle.cos() * radius + (rng.next_f32() - 0.5) * jitter,
            spiral_height(i, count),
            angle.sin() * radius + (rng.next_f32() - 0.5) * jitter,
        );

        let (shape, color, scale) = draw_shape_class(rng);
        let rest_rotation = Vec3::new(
            rng.range(0.0, PI),
            rng.range(0.0, PI),
            rng.range(0.0, PI),
        );
        let scatter_radius = rng.range(SCATTER_RADIUS_MIN, SCATTER_RADIUS_MAX);
        let scatter_position = rng.on_sphere(scatter_radius);

        out.push(Ornament {
            shape,
            color,
            rest_position,
            scatter_position,
            rest_rotation,
            rest_scale: scale,
        });
    }

    out
}

/// Shape class draw: 65% foliage, 15% lights, 20% geometric ornaments.
fn draw_shape_class(rng: &mut Rng) -> (OrnamentShape, Color, Vec3) {
    let roll = rng.next_f32();
    if roll < 0.65 {
        let color = Color::from_hex(*rng.pick(&GREEN_PALETTE));
        (OrnamentShape::Leaf, color, Vec3::splat(rng.range(0.2, 0.5)))
    } else if roll < 0.80 {
        let color = Color::from_hex(*rng.pick(&LIGHT_PALETTE));
        (
            OrnamentShape::Light,
            color,
            Vec3::splat(rng.range(0.15, 0.3)),
        )
    } else {
        let shape = if rng.next_f32() < 0.5 {
            OrnamentShape::Sphere
        } else {
            OrnamentShape::Box
        };
        let color = Color::from_hex(*rng.pick(&ORNAMENT_PALETTE));
        (shape, color, Vec3::splat(rng.range(0.2, 0.5)))
    }
}

/// Two interleaved ribbon spirals, phase-offset by π, hugging a radius
/// slightly outside the main cone. Each segment is oriented toward the
/// next sample along its strand so the segments read as one continuous
/// ribbon.
pub fn generate_ribbons(rng: &mut Rng, total_segments: usize) -> Vec<Ornament> {
    let per_strand = total_segments / RIBBON_STRANDS;
    let mut out = Vec::with_capacity(total_segments);

    for strand in 0..RIBBON_STRANDS {
        let phase = strand as f32 * PI;
        let color = Color::from_hex(RIBBON_COLORS[strand % RIBBON_COLORS.len()]);

        for i in 0..per_strand {
            let t = i as f32 / per_strand as f32;
            let rest_position = ribbon_sample(t, phase);
            // Tangent frame: aim at a sample slightly further along
            let next = ribbon_sample(t + 0.01, phase);
            let rest_rotation = aim_rotation(next - rest_position);

            out.push(Ornament {
                shape: OrnamentShape::Ribbon,
                color,
                rest_position,
                scatter_position: rng.on_sphere(RIBBON_SCATTER_RADIUS),
                rest_rotation,
                rest_scale: Vec3::new(0.15, 0.6, 1.0),
            });
        }
    }

    out
}

/// A point on a ribbon strand at parameter `t` in [0,1]: ~6 full turns,
/// radius 0.6 outside the cone.
fn ribbon_sample(t: f32, phase: f32) -> Vec3 {
    let angle = t * PI * 12.0 + phase;
    let radius = (1.0 - t) * MAX_RADIUS + 0.6;
    Vec3::new(
        angle.cos() * radius,
        t * TREE_HEIGHT - TREE_HEIGHT / 2.0,
        angle.sin() * radius,
    )
}

/// Euler rotation (pitch, yaw, 0) that turns the +Z axis toward `dir`.
fn aim_rotation(dir: Vec3) -> Vec3 {
    let d = dir.normalized();
    Vec3::new((-d.y).asin(), d.x.atan2(d.z), 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use garland_core::Transform;

    #[test]
    fn spiral_profile_endpoints() {
        assert_eq!(spiral_radius(0, 10), MAX_RADIUS);
        assert!(spiral_radius(9, 10) < MAX_RADIUS * 0.15);
        assert_eq!(spiral_height(0, 10), -TREE_HEIGHT / 2.0);
        assert!(spiral_height(9, 10) <= TREE_HEIGHT / 2.0);
    }

    #[test]
    fn small_field_scenario() {
        let mut rng = Rng::new(42);
        let field = generate_main(&mut rng, 10);
        assert_eq!(field.len(), 10);

        for o in &field {
            // Only the spiral shape classes appear, never ribbons or the star
            assert!(matches!(
                o.shape,
                OrnamentShape::Leaf
                    | OrnamentShape::Light
                    | OrnamentShape::Sphere
                    | OrnamentShape::Box
            ));
            // Height stays inside the tree's vertical span
            assert!(o.rest_position.y >= -TREE_HEIGHT / 2.0);
            assert!(o.rest_position.y <= TREE_HEIGHT / 2.0);
        }

        // Base sample sits near the full radius (lateral jitter is ±0.4)
        let base = &field[0];
        let r = (base.rest_position.x * base.rest_position.x
            + base.rest_position.z * base.rest_position.z)
            .sqrt();
        assert!((r - MAX_RADIUS).abs() < 0.6);
    }

    #[test]
    fn scatter_positions_on_shell_band() {
        let mut rng = Rng::new(7);
        for o in generate_main(&mut rng, 200) {
            let r = o.scatter_position.length();
            assert!(r >= SCATTER_RADIUS_MIN - 0.01 && r < SCATTER_RADIUS_MAX + 0.01);
        }
    }

    #[test]
    fn shape_distribution_matches_weights() {
        let mut rng = Rng::new(1234);
        let field = generate_main(&mut rng, 4000);
        let leaves = field
            .iter()
            .filter(|o| o.shape == OrnamentShape::Leaf)
            .count();
        let lights = field
            .iter()
            .filter(|o| o.shape == OrnamentShape::Light)
            .count();
        let frac_leaves = leaves as f32 / field.len() as f32;
        let frac_lights = lights as f32 / field.len() as f32;
        assert!((frac_leaves - 0.65).abs() < 0.05, "leaves {frac_leaves}");
        assert!((frac_lights - 0.15).abs() < 0.04, "lights {frac_lights}");
    }

    #[test]
    fn ribbons_split_into_two_strands() {
        let mut rng = Rng::new(9);
        let ribbons = generate_ribbons(&mut rng, 600);
        assert_eq!(ribbons.len(), 600);
        let gold = Color::from_hex(RIBBON_COLORS[0]);
        assert_eq!(ribbons.iter().filter(|o| o.color == gold).count(), 300);
        for o in &ribbons {
            assert_eq!(o.shape, OrnamentShape::Ribbon);
            assert_eq!(o.rest_scale, Vec3::new(0.15, 0.6, 1.0));
            assert!((o.scatter_position.length() - RIBBON_SCATTER_RADIUS).abs() < 0.01);
        }
    }

    #[test]
    fn ribbon_orientation_follows_tangent() {
        let mut rng = Rng::new(3);
        let ribbons = generate_ribbons(&mut rng, 600);
        // Rotate +Z by the stored Euler and compare against the actual
        // direction to the next segment along the strand.
        for pair in ribbons[..299].windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            let m = Transform::new(Vec3::ZERO, a.rest_rotation, Vec3::ONE).to_matrix();
            let forward = Vec3::new(m[2][0], m[2][1], m[2][2]);
            let to_next = (b.rest_position - a.rest_position).normalized();
            assert!(
                forward.dot(&to_next) > 0.95,
                "segment not tangent-aligned: dot {}",
                forward.dot(&to_next)
            );
        }
    }

    #[test]
    fn full_field_counts() {
        let mut rng = Rng::new(11);
        let field = generate_field(&mut rng);
        assert_eq!(field.len(), ITEM_COUNT + RIBBON_SEGMENTS);
    }
}
