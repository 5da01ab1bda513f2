//! Built-in scenes.

use orb_math::Vec3;
use rand::{Rng, RngCore};

use crate::scene::{MaterialRecord, SphereRecord};

/// Five spheres on a large ground sphere: diffuse, metal, and a hollow glass
/// ball made of a glass sphere with a smaller inside-out glass sphere in it.
pub fn demo_scene() -> Vec<SphereRecord> {
    vec![
        SphereRecord::new(
            Vec3::new(0.0, 0.0, -1.0),
            0.5,
            MaterialRecord::Diffuse {
                albedo: Vec3::new(0.1, 0.2, 0.5),
            },
        ),
        SphereRecord::new(
            Vec3::new(0.0, -100.5, -1.0),
            100.0,
            MaterialRecord::Diffuse {
                albedo: Vec3::new(0.8, 0.8, 0.0),
            },
        ),
        SphereRecord::new(
            Vec3::new(1.0, 0.0, -1.0),
            0.5,
            MaterialRecord::Metallic {
                albedo: Vec3::new(0.8, 0.6, 0.2),
                fuzz: 0.3,
            },
        ),
        SphereRecord::new(
            Vec3::new(-1.0, 0.0, -1.0),
            0.5,
            MaterialRecord::Dielectric {
                refractive_index: 1.5,
            },
        ),
        SphereRecord::new(
            Vec3::new(-1.0, 0.0, -1.0),
            -0.45,
            MaterialRecord::Dielectric {
                refractive_index: 1.5,
            },
        ),
    ]
}

/// Random "cover" scene: a 22x22 grid of small jittered spheres around three
/// large feature spheres, all resting on a huge ground sphere.
pub fn random_scene(rng: &mut dyn RngCore) -> Vec<SphereRecord> {
    const SMALL_RADIUS: f32 = 0.2;

    let mut records = vec![SphereRecord::new(
        Vec3::new(0.0, -1000.0, -1.0),
        1000.0,
        MaterialRecord::Diffuse {
            albedo: Vec3::splat(0.5),
        },
    )];

    let keep_clear = Vec3::new(4.0, SMALL_RADIUS, 0.0);
    for a in -11..11 {
        for b in -11..11 {
            let choose_mat: f32 = rng.gen();
            let center = Vec3::new(
                a as f32 + 0.9 * rng.gen::<f32>(),
                SMALL_RADIUS,
                b as f32 + 0.9 * rng.gen::<f32>(),
            );

            if (center - keep_clear).length() <= 0.9 {
                continue;
            }

            let material = if choose_mat < 0.8 {
                MaterialRecord::Diffuse {
                    albedo: Vec3::new(
                        rng.gen::<f32>() * rng.gen::<f32>(),
                        rng.gen::<f32>() * rng.gen::<f32>(),
                        rng.gen::<f32>() * rng.gen::<f32>(),
                    ),
                }
            } else if choose_mat < 0.95 {
                MaterialRecord::Metallic {
                    albedo: Vec3::new(
                        0.5 * (1.0 + rng.gen::<f32>()),
                        0.5 * (1.0 + rng.gen::<f32>()),
                        0.5 * (1.0 + rng.gen::<f32>()),
                    ),
                    // Draws above 1 are clamped when the material is built
                    fuzz: 0.5 + rng.gen::<f32>(),
                }
            } else {
                MaterialRecord::Dielectric {
                    refractive_index: 1.5,
                }
            };
            records.push(SphereRecord::new(center, SMALL_RADIUS, material));
        }
    }

    records.push(SphereRecord::new(
        Vec3::new(0.0, 1.0, 0.0),
        1.0,
        MaterialRecord::Dielectric {
            refractive_index: 1.5,
        },
    ));
    records.push(SphereRecord::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        MaterialRecord::Diffuse {
            albedo: Vec3::new(0.4, 0.0, 0.1),
        },
    ));
    records.push(SphereRecord::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        MaterialRecord::Metallic {
            albedo: Vec3::new(0.7, 0.6, 0.5),
            fuzz: 0.0,
        },
    ));

    log::debug!("Generated random scene with {} spheres", records.len());
    records
}
