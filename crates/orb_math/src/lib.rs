//! Orb math types.
//!
//! Vectors come straight from glam; this crate adds the ray tracing pieces
//! glam leaves out: rays, open/closed intervals, reflection and refraction,
//! and the rejection samplers used by the camera and the materials.

// Re-export glam for convenience
pub use glam::*;

mod interval;
mod ray;
mod vector;

pub use interval::Interval;
pub use ray::Ray;
pub use vector::{random_in_unit_disk, random_unit_vector, VecExt};
