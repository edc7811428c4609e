//! Garland Choreo - The per-particle animation driver
//!
//! Owns every runtime-mutable transform in the scene and maps toggle
//! edges to retargetable tweens:
//! - explode: every decoration bursts to its scatter position with an
//!   exponential-out ease and a randomized duration; ribbons collapse
//! - gather: everything converges back to the tree with slight stagger
//! - heart: two scalar uniforms (progress, alpha) ramped with the same
//!   cancel-and-redirect discipline, consumed by the GPU pipeline
//!
//! Re-triggering mid-flight is always safe: channels redirect from their
//! live values, so the field never snaps.

mod driver;

pub use driver::{Choreography, TransformChannels};
