//! Garland Core - Foundational types for the Garland scene engine
//!
//! This crate provides the types every other Garland crate depends on:
//! - `Vec3`, `Color`, `Transform` - Spatial and color types
//! - `Rng` - Lightweight xorshift PRNG for layout generation
//! - Error types and Result alias

mod error;
mod rng;
mod types;

pub use error::{GarlandError, Result};
pub use rng::Rng;
pub use types::{mat4_mul, Color, Transform, Vec3};
