//! Orb renderer - CPU path tracing of sphere scenes
//!
//! A Monte Carlo path tracer: spheres with diffuse, metallic and dielectric
//! materials, lit only by a sky gradient, rendered sequentially, on a worker
//! pool, or in buckets on rayon.

mod bucket;
mod camera;
mod error;
mod hittable;
mod material;
mod output;
mod renderer;
mod scheduler;
mod sphere;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use camera::Camera;
pub use error::{OutputError, OutputResult, RenderError, RenderResult};
pub use hittable::{HitRecord, Hittable, World};
pub use material::{Color, Material, Scatter};
pub use output::{save_image, to_rgba8};
pub use renderer::{linear_to_gamma, pixel_rng, tone_map, Framebuffer, RenderConfig, Sampler, Sky};
pub use scheduler::{render, render_with_cancel, Schedule};
pub use sphere::Sphere;

/// Re-export common math types from orb_math
pub use orb_math::{Interval, Ray, Vec3};
