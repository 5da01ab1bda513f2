//! Surface scattering.

use orb_core::MaterialRecord;
use orb_math::{random_unit_vector, Interval, Ray, Vec3, VecExt};
use rand::{Rng, RngCore};

use crate::hittable::HitRecord;

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// Outcome of a scattering event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scatter {
    /// Per-channel factor applied to the light carried back along `scattered`
    pub attenuation: Color,
    /// The outgoing ray
    pub scattered: Ray,
}

/// How light interacts with a surface.
///
/// The set of materials is closed; each variant owns its parameters and
/// `scatter` matches exhaustively.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    /// Lambertian (diffuse) surface.
    Diffuse { albedo: Color },
    /// Reflective surface. `fuzz` is 0 for a perfect mirror, 1 for very rough.
    Metallic { albedo: Color, fuzz: f32 },
    /// Clear refractive surface (1.0 = air, 1.5 = glass, 2.4 = diamond).
    Dielectric { refractive_index: f32 },
}

impl Material {
    /// Create a diffuse material. Albedo channels are clamped to [0, 1].
    pub fn diffuse(albedo: Color) -> Self {
        Material::Diffuse {
            albedo: clamp_color(albedo),
        }
    }

    /// Create a metallic material. Albedo channels and fuzz are clamped to [0, 1].
    pub fn metallic(albedo: Color, fuzz: f32) -> Self {
        let clamped = Interval::UNIT.clamp(fuzz);
        if clamped != fuzz {
            log::warn!("Fuzz {} clamped to {}", fuzz, clamped);
        }
        Material::Metallic {
            albedo: clamp_color(albedo),
            fuzz: clamped,
        }
    }

    /// Create a dielectric material.
    pub fn dielectric(refractive_index: f32) -> Self {
        Material::Dielectric { refractive_index }
    }

    /// Scatter an incoming ray.
    ///
    /// Returns `None` if the ray is absorbed.
    pub fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<Scatter> {
        match *self {
            Material::Diffuse { albedo } => {
                let mut scatter_direction = rec.normal + random_unit_vector(rng);

                // Catch degenerate scatter direction
                if scatter_direction.near_zero() {
                    scatter_direction = rec.normal;
                }

                Some(Scatter {
                    attenuation: albedo,
                    scattered: Ray::new(rec.p, scatter_direction),
                })
            }
            Material::Metallic { albedo, fuzz } => {
                let reflected = ray_in.direction().reflect_about(rec.normal);
                let direction = reflected + fuzz * random_unit_vector(rng);

                // Fuzz can push the reflection below the surface; absorb it
                if direction.dot(rec.normal) > 0.0 {
                    Some(Scatter {
                        attenuation: albedo,
                        scattered: Ray::new(rec.p, direction),
                    })
                } else {
                    None
                }
            }
            Material::Dielectric { refractive_index } => {
                let direction = dielectric_direction(ray_in.direction(), rec.normal, refractive_index, rng);
                Some(Scatter {
                    attenuation: Color::ONE,
                    scattered: Ray::new(rec.p, direction),
                })
            }
        }
    }
}

impl From<&MaterialRecord> for Material {
    fn from(record: &MaterialRecord) -> Self {
        match *record {
            MaterialRecord::Diffuse { albedo } => Material::diffuse(albedo),
            MaterialRecord::Metallic { albedo, fuzz } => Material::metallic(albedo, fuzz),
            MaterialRecord::Dielectric { refractive_index } => Material::dielectric(refractive_index),
        }
    }
}

fn clamp_color(color: Color) -> Color {
    let clamped = color.clamp(Color::ZERO, Color::ONE);
    if clamped != color {
        log::warn!("Albedo {} clamped to {}", color, clamped);
    }
    clamped
}

/// Pick the reflected or refracted direction for a dielectric hit.
///
/// Sphere normals point away from the center and are not flipped toward the
/// ray, so the sign of `dot(d, n)` tells whether the ray is leaving (`> 0`) or
/// entering the surface.
fn dielectric_direction(direction: Vec3, normal: Vec3, ior: f32, rng: &mut dyn RngCore) -> Vec3 {
    let d_dot_n = direction.dot(normal);
    let (outward_normal, ratio, cosine) = if d_dot_n > 0.0 {
        (-normal, ior, ior * d_dot_n / direction.length())
    } else {
        (normal, 1.0 / ior, -d_dot_n / direction.length())
    };

    match direction.refract_through(outward_normal, ratio) {
        Some(refracted) if rng.gen::<f32>() >= reflectance(cosine, ior) => refracted,
        // Total internal reflection, or the Fresnel draw chose reflection
        _ => direction.reflect_about(normal),
    }
}

/// Schlick's approximation for reflectance
fn reflectance(cosine: f32, ior: f32) -> f32 {
    let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn hit_at_origin(normal: Vec3, material: &Material) -> HitRecord<'_> {
        HitRecord {
            p: Vec3::ZERO,
            normal,
            t: 1.0,
            material,
        }
    }

    #[test]
    fn test_diffuse_always_scatters_above_surface() {
        let material = Material::diffuse(Color::new(0.5, 0.6, 0.7));
        let rec = hit_at_origin(Vec3::Y, &material);
        let ray = Ray::new(Vec3::new(0.0, 1.0, 1.0), Vec3::new(0.0, -1.0, -1.0));
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..500 {
            let scatter = material.scatter(&ray, &rec, &mut rng).unwrap();
            assert_eq!(scatter.attenuation, Color::new(0.5, 0.6, 0.7));
            assert_eq!(scatter.scattered.origin, Vec3::ZERO);
            // normal + unit vector never points into the surface
            assert!(scatter.scattered.direction.dot(Vec3::Y) >= 0.0);
        }
    }

    #[test]
    fn test_constructors_clamp() {
        assert_eq!(
            Material::metallic(Color::new(2.0, -1.0, 0.5), 3.0),
            Material::Metallic {
                albedo: Color::new(1.0, 0.0, 0.5),
                fuzz: 1.0
            }
        );
        assert_eq!(
            Material::diffuse(Color::splat(1.5)),
            Material::Diffuse { albedo: Color::ONE }
        );
    }

    #[test]
    fn test_mirror_reflects_exactly() {
        let material = Material::metallic(Color::splat(0.9), 0.0);
        let rec = hit_at_origin(Vec3::Y, &material);
        let ray = Ray::new(Vec3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0));
        let mut rng = StdRng::seed_from_u64(2);

        let scatter = material.scatter(&ray, &rec, &mut rng).unwrap();
        let expected = Vec3::new(1.0, 1.0, 0.0);
        assert!((scatter.scattered.direction - expected).length() < 1e-6);
        assert_eq!(scatter.attenuation, Color::splat(0.9));
    }

    #[test]
    fn test_metal_absorbs_exactly_below_surface() {
        let material = Material::metallic(Color::ONE, 1.0);
        let rec = hit_at_origin(Vec3::Y, &material);
        // Grazing ray: fuzz frequently pushes the reflection below the surface
        let ray = Ray::new(Vec3::new(-1.0, 0.05, 0.0), Vec3::new(1.0, -0.05, 0.0));

        let mut scattered = 0;
        let mut absorbed = 0;
        for seed in 0..400 {
            // Replay the same draw the material will make
            let mut replay = StdRng::seed_from_u64(seed);
            let reflected = ray.direction.reflect_about(Vec3::Y);
            let perturbed = reflected + random_unit_vector(&mut replay);

            let mut rng = StdRng::seed_from_u64(seed);
            match material.scatter(&ray, &rec, &mut rng) {
                Some(scatter) => {
                    assert!(perturbed.dot(Vec3::Y) > 0.0);
                    assert_eq!(scatter.scattered.direction, perturbed);
                    scattered += 1;
                }
                None => {
                    assert!(perturbed.dot(Vec3::Y) <= 0.0);
                    absorbed += 1;
                }
            }
        }
        assert!(scattered > 0 && absorbed > 0);
    }

    #[test]
    fn test_metal_reflects_unnormalized_direction() {
        let material = Material::metallic(Color::ONE, 0.5);
        let rec = hit_at_origin(Vec3::Y, &material);
        let direction = Vec3::new(3.0, -3.0, -2.0);
        let ray = Ray::new(Vec3::new(-3.0, 3.0, 2.0), direction);

        let mut replay = StdRng::seed_from_u64(1);
        let expected = Vec3::new(3.0, 3.0, -2.0) + 0.5 * random_unit_vector(&mut replay);

        let mut rng = StdRng::seed_from_u64(1);
        let scatter = material.scatter(&ray, &rec, &mut rng).unwrap();
        assert!((scatter.scattered.direction - expected).length() < 1e-5);
    }

    #[test]
    fn test_random_scene_metal_fuzz_is_clamped() {
        let scene = orb_core::random_scene(&mut StdRng::seed_from_u64(5));
        let mut metals = 0;
        for record in &scene {
            if let Material::Metallic { fuzz, .. } = Material::from(&record.material) {
                assert!((0.5..=1.0).contains(&fuzz), "fuzz {}", fuzz);
                metals += 1;
            }
        }
        assert!(metals > 0);
    }

    #[test]
    fn test_dielectric_never_absorbs() {
        let material = Material::dielectric(1.5);
        let mut rng = StdRng::seed_from_u64(3);

        for i in 0..1000 {
            let direction = random_unit_vector(&mut rng);
            let normal = random_unit_vector(&mut rng);
            let rec = hit_at_origin(normal, &material);
            let ray = Ray::new(-direction, direction * (1.0 + i as f32 * 0.01));

            let scatter = material.scatter(&ray, &rec, &mut rng).unwrap();
            assert_eq!(scatter.attenuation, Color::ONE);
            assert!(scatter.scattered.direction.is_finite());
        }
    }

    #[test]
    fn test_dielectric_total_internal_reflection() {
        let material = Material::dielectric(1.5);
        // Leaving the sphere at a grazing angle: d . n > 0
        let rec = hit_at_origin(Vec3::Y, &material);
        let direction = Vec3::new(1.0, 0.1, 0.0);
        let ray = Ray::new(Vec3::ZERO, direction);
        let mut rng = StdRng::seed_from_u64(4);

        for _ in 0..50 {
            let scatter = material.scatter(&ray, &rec, &mut rng).unwrap();
            assert_eq!(scatter.scattered.direction, direction.reflect_about(Vec3::Y));
        }
    }

    #[test]
    fn test_dielectric_head_on_mostly_refracts() {
        let material = Material::dielectric(1.5);
        let rec = hit_at_origin(Vec3::Z, &material);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 1.0), Vec3::NEG_Z);
        let mut rng = StdRng::seed_from_u64(5);

        let mut refracted = 0;
        for _ in 0..1000 {
            let scatter = material.scatter(&ray, &rec, &mut rng).unwrap();
            if scatter.scattered.direction.z < 0.0 {
                refracted += 1;
            }
        }
        // Schlick gives 4% reflectance at normal incidence for glass
        assert!(refracted > 900, "refracted {} of 1000", refracted);
    }

    #[test]
    fn test_reflectance_bounds() {
        assert!((reflectance(1.0, 1.5) - 0.04).abs() < 1e-6);
        assert!((reflectance(0.0, 1.5) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_from_record() {
        let record = MaterialRecord::Metallic {
            albedo: Vec3::splat(0.5),
            fuzz: 4.0,
        };
        assert_eq!(Material::from(&record), Material::metallic(Vec3::splat(0.5), 1.0));
    }
}
