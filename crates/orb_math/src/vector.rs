//! Vector helpers glam does not provide in the form the tracer needs.

use crate::Vec3;
use rand::{Rng, RngCore};

/// Ray tracing operations on [`Vec3`].
///
/// The names avoid glam's own `reflect`/`refract`, whose refraction returns
/// zero on total internal reflection instead of signalling it.
pub trait VecExt {
    /// Mirror `self` about the normal `n`: `d - 2 * dot(d, n) * n`.
    fn reflect_about(self, n: Vec3) -> Self;

    /// Refract `self` through a surface with unit normal `n` (pointing
    /// against `self`) using Snell's law with index ratio `ratio`.
    ///
    /// The incoming vector is normalized first. Returns `None` on total
    /// internal reflection.
    fn refract_through(self, n: Vec3, ratio: f32) -> Option<Self>
    where
        Self: Sized;

    /// True if every component is within `1e-8` of zero.
    fn near_zero(self) -> bool;
}

impl VecExt for Vec3 {
    #[inline]
    fn reflect_about(self, n: Vec3) -> Vec3 {
        self - 2.0 * self.dot(n) * n
    }

    fn refract_through(self, n: Vec3, ratio: f32) -> Option<Vec3> {
        let uv = self.normalize();
        let dt = uv.dot(n);
        let discriminant = 1.0 - ratio * ratio * (1.0 - dt * dt);
        if discriminant < 0.0 {
            return None;
        }
        Some(ratio * (uv - n * dt) - n * discriminant.sqrt())
    }

    #[inline]
    fn near_zero(self) -> bool {
        const S: f32 = 1e-8;
        self.x.abs() < S && self.y.abs() < S && self.z.abs() < S
    }
}

/// Generate a random unit vector, uniform on the sphere.
///
/// Rejection sampling: draw from the cube `[-1, 1]^3`, discard points outside
/// the unit ball (and points so close to the center that normalizing them
/// would lose precision), then normalize.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(
            rng.gen::<f32>() * 2.0 - 1.0,
            rng.gen::<f32>() * 2.0 - 1.0,
            rng.gen::<f32>() * 2.0 - 1.0,
        );
        let len_sq = p.length_squared();
        if len_sq > 1e-12 && len_sq <= 1.0 {
            return p / len_sq.sqrt();
        }
    }
}

/// Random point inside the unit disk on the XY plane (z = 0).
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(rng.gen::<f32>() * 2.0 - 1.0, rng.gen::<f32>() * 2.0 - 1.0, 0.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}
