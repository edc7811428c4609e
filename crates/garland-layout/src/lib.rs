//! Garland Layout - Procedural position generation
//!
//! Everything here runs exactly once at startup and produces immutable
//! position data:
//! - The main decoration field: a cone-spiral "tree" silhouette with a
//!   random scatter counterpart on a large sphere shell
//! - Two interleaved ribbon spirals with tangent-following orientation
//! - The heart point cloud: rejection-sampled targets inside an implicit
//!   heart solid
//! - The background starfield: uniform random points in a cube wrapping
//!   the whole scene
//!
//! The animation driver owns all runtime-mutable transform state; nothing
//! in this crate is written to after generation.

mod field;
pub mod heart;
mod palette;
mod stars;

pub use field::{
    generate_field, generate_main, generate_ribbons, spiral_height, spiral_radius, Ornament,
    OrnamentShape,
};
pub use heart::HeartPoint;
pub use palette::{
    star_color, GREEN_PALETTE, HEART_ACCENTS, LIGHT_PALETTE, ORNAMENT_PALETTE, RIBBON_COLORS,
};
pub use stars::generate_starfield;

/// Number of decorations in the main field.
pub const ITEM_COUNT: usize = 2200;

/// Total ribbon segments across both strands.
pub const RIBBON_SEGMENTS: usize = 600;

/// Number of interleaved ribbon strands.
pub const RIBBON_STRANDS: usize = 2;

/// Vertical extent of the tree, centered on the origin.
pub const TREE_HEIGHT: f32 = 14.0;

/// Spiral radius at the base of the tree.
pub const MAX_RADIUS: f32 = 5.5;

/// Scatter shell radius band for the main field.
pub const SCATTER_RADIUS_MIN: f32 = 25.0;
pub const SCATTER_RADIUS_MAX: f32 = 50.0;

/// Scatter shell radius for ribbon segments.
pub const RIBBON_SCATTER_RADIUS: f32 = 30.0;

/// Number of points in the heart cloud.
pub const HEART_POINT_COUNT: usize = 15_000;

/// Number of background stars.
pub const STARFIELD_COUNT: usize = 2000;

/// Side length of the cube the starfield fills.
pub const STARFIELD_EXTENT: f32 = 100.0;
