//! Hittable trait, HitRecord and the World aggregate.

use std::sync::Arc;

use orb_core::SphereRecord;
use orb_math::{Interval, Ray, Vec3};

use crate::{Material, Sphere};

/// Record of a ray-object intersection.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Vec3,
    /// Unit surface normal. Not flipped toward the ray; materials that care
    /// about inside/outside test the sign of `dot(direction, normal)`.
    pub normal: Vec3,
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Material at the intersection point
    pub material: &'a Material,
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Nearest intersection with `t` strictly inside `ray_t`, if any.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>>;
}

/// The scene: every object a ray can hit.
///
/// Intersection is a linear scan; there is no acceleration structure.
#[derive(Default)]
pub struct World {
    objects: Vec<Box<dyn Hittable>>,
}

impl World {
    /// Create a new empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build spheres from scene records.
    ///
    /// Records with identical materials share one `Arc<Material>`.
    pub fn from_records(records: &[SphereRecord]) -> Self {
        let mut world = World::new();
        let mut materials: Vec<Arc<Material>> = Vec::new();

        for record in records {
            let material = Material::from(&record.material);
            let shared = match materials.iter().find(|m| ***m == material) {
                Some(existing) => Arc::clone(existing),
                None => {
                    let created = Arc::new(material);
                    materials.push(Arc::clone(&created));
                    created
                }
            };
            world.add(Box::new(Sphere::new(record.center, record.radius, shared)));
        }

        log::debug!(
            "Built world with {} objects and {} distinct materials",
            world.len(),
            materials.len()
        );
        world
    }

    /// Add an object to the world.
    pub fn add(&mut self, object: Box<dyn Hittable>) {
        self.objects.push(object);
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the world is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Hittable for World {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let mut closest_so_far = ray_t.max;
        let mut best = None;

        for object in &self.objects {
            if let Some(rec) = object.hit(ray, ray_t.with_max(closest_so_far)) {
                closest_so_far = rec.t;
                best = Some(rec);
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;
    use orb_core::MaterialRecord;

    fn diffuse(color: Color) -> Arc<Material> {
        Arc::new(Material::diffuse(color))
    }

    #[test]
    fn test_world_returns_nearest_hit() {
        let near = diffuse(Color::new(1.0, 0.0, 0.0));
        let far = diffuse(Color::new(0.0, 0.0, 1.0));

        // Insert the far sphere first so order cannot decide the winner
        let mut world = World::new();
        world.add(Box::new(Sphere::new(Vec3::new(0.0, 0.0, -0.5), 1.0, far)));
        world.add(Box::new(Sphere::new(Vec3::new(0.0, 0.0, 0.5), 1.0, near)));

        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        let rec = world.hit(&ray, Interval::from_min(0.001)).unwrap();

        assert!((rec.t - 3.5).abs() < 1e-5);
        assert_eq!(*rec.material, Material::diffuse(Color::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn test_world_respects_upper_bound() {
        let mut world = World::new();
        world.add(Box::new(Sphere::new(Vec3::ZERO, 1.0, diffuse(Color::ONE))));

        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        assert!(world.hit(&ray, Interval::new(0.001, 3.9)).is_none());
        assert!(world.hit(&ray, Interval::new(0.001, 4.1)).is_some());
    }

    #[test]
    fn test_empty_world_misses() {
        let world = World::new();
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert!(world.is_empty());
        assert!(world.hit(&ray, Interval::from_min(0.001)).is_none());
    }

    #[test]
    fn test_from_records_shares_materials() {
        let glass = MaterialRecord::Dielectric {
            refractive_index: 1.5,
        };
        let records = vec![
            SphereRecord::new(Vec3::new(-1.0, 0.0, -1.0), 0.5, glass),
            SphereRecord::new(Vec3::new(-1.0, 0.0, -1.0), -0.45, glass),
            SphereRecord::new(
                Vec3::new(0.0, -100.5, -1.0),
                100.0,
                MaterialRecord::Diffuse {
                    albedo: Vec3::new(0.8, 0.8, 0.0),
                },
            ),
        ];

        let world = World::from_records(&records);
        assert_eq!(world.len(), 3);

        let ray = Ray::new(Vec3::new(-1.0, 0.0, 1.0), Vec3::NEG_Z);
        let rec = world.hit(&ray, Interval::from_min(0.001)).unwrap();
        // Outer glass surface at z = -0.5
        assert!((rec.t - 1.5).abs() < 1e-5);
        assert_eq!(*rec.material, Material::dielectric(1.5));
    }
}
