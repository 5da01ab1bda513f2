//! Camera for ray generation.

use orb_core::CameraSettings;
use orb_math::{random_in_unit_disk, Ray, Vec3};
use rand::RngCore;

/// Perspective thin-lens camera.
///
/// All derived values are computed once in [`Camera::new`]; the camera is
/// immutable afterwards and shared read-only by every render thread. The
/// focus plane passes through `look_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    origin: Vec3,
    lower_left: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    // Camera basis: u = right, v = up, w = backward (opposite view direction)
    u: Vec3,
    v: Vec3,
    w: Vec3,
    lens_radius: f32,
}

impl Camera {
    /// Create a camera.
    ///
    /// - `vfov`: vertical field of view in degrees
    /// - `aspect`: image width / height
    /// - `aperture`: lens diameter, 0 for a pinhole
    pub fn new(look_from: Vec3, look_at: Vec3, vup: Vec3, vfov: f32, aspect: f32, aperture: f32) -> Self {
        let half_height = (vfov.to_radians() / 2.0).tan();
        let half_width = aspect * half_height;

        let w = (look_from - look_at).normalize();
        let u = vup.cross(w).normalize();
        let v = w.cross(u); // already unit length

        let focus_dist = (look_from - look_at).length();
        let x = half_width * focus_dist * u;
        let y = half_height * focus_dist * v;

        Self {
            origin: look_from,
            lower_left: look_from - x - y - focus_dist * w,
            horizontal: 2.0 * x,
            vertical: 2.0 * y,
            u,
            v,
            w,
            lens_radius: aperture / 2.0,
        }
    }

    /// Create a camera from settings for an image of the given aspect ratio.
    pub fn from_settings(settings: &CameraSettings, aspect: f32) -> Self {
        Self::new(
            settings.look_from,
            settings.look_at,
            settings.vup,
            settings.vfov,
            aspect,
            settings.aperture,
        )
    }

    /// Generate a ray through normalized viewport coordinates `(s, t)`.
    ///
    /// `(0, 0)` is the lower-left corner of the viewport and `(1, 1)` the
    /// upper-right. The origin is jittered on the lens disk for depth of
    /// field.
    pub fn get_ray(&self, s: f32, t: f32, rng: &mut dyn RngCore) -> Ray {
        let rd = self.lens_radius * random_in_unit_disk(rng);
        let offset = self.u * rd.x + self.v * rd.y;
        let origin = self.origin + offset;

        Ray::new(origin, self.viewport_point(s, t) - origin)
    }

    /// Point on the focus plane at normalized viewport coordinates `(s, t)`.
    pub fn viewport_point(&self, s: f32, t: f32) -> Vec3 {
        self.lower_left + s * self.horizontal + t * self.vertical
    }

    /// Eye position.
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Backward axis of the camera frame (points away from the scene).
    pub fn w(&self) -> Vec3 {
        self.w
    }

    pub fn lens_radius(&self) -> f32 {
        self.lens_radius
    }
}
