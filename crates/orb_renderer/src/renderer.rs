//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with configurable depth
//! - Sky gradient as the only light source
//! - Anti-aliasing via jittered multi-sampling
//! - Gamma correction

use image::{ImageBuffer, Rgba};
use orb_core::RenderSettings;
use orb_math::{Interval, Ray};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::{Camera, Color, Hittable};

/// Output image: 16-bit RGBA, row 0 at the top of the scene.
pub type Framebuffer = ImageBuffer<Rgba<u16>, Vec<u16>>;

/// Vertical background gradient seen by rays that hit nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sky {
    /// Color looking straight down
    pub horizon: Color,
    /// Color looking straight up
    pub zenith: Color,
}

impl Default for Sky {
    fn default() -> Self {
        Self {
            horizon: Color::ONE,
            zenith: Color::new(0.5, 0.7, 1.0),
        }
    }
}

impl Sky {
    /// Compute sky gradient background.
    pub fn color(&self, ray: &Ray) -> Color {
        let unit_direction = ray.direction().normalize();
        let a = 0.5 * (unit_direction.y + 1.0);
        self.horizon * (1.0 - a) + self.zenith * a
    }
}

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Minimum hit distance along a ray
    pub t_min: f32,
    /// Master seed for every pixel's random stream
    pub seed: u64,
    /// Background gradient
    pub sky: Sky,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 400,
            samples_per_pixel: 100,
            max_depth: 50,
            t_min: 0.001,
            seed: 42,
            sky: Sky::default(),
        }
    }
}

impl From<&RenderSettings> for RenderConfig {
    fn from(settings: &RenderSettings) -> Self {
        Self {
            width: settings.width,
            height: settings.height,
            samples_per_pixel: settings.samples_per_pixel,
            max_depth: settings.max_depth,
            t_min: settings.t_min,
            seed: settings.seed,
            sky: Sky::default(),
        }
    }
}

impl RenderConfig {
    /// Total number of pixels in the image.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Per-pixel color estimator.
///
/// Holds only shared references, so one sampler can be used from any number
/// of threads at once.
#[derive(Clone, Copy)]
pub struct Sampler<'a> {
    camera: &'a Camera,
    world: &'a dyn Hittable,
    config: &'a RenderConfig,
}

impl<'a> Sampler<'a> {
    pub fn new(camera: &'a Camera, world: &'a dyn Hittable, config: &'a RenderConfig) -> Self {
        Self { camera, world, config }
    }

    pub fn config(&self) -> &'a RenderConfig {
        self.config
    }

    /// Compute the color seen by a ray.
    ///
    /// `depth` counts bounces so far; at `max_depth` the path is cut off and
    /// contributes no light.
    pub fn ray_color(&self, ray: &Ray, depth: u32, rng: &mut dyn RngCore) -> Color {
        if depth >= self.config.max_depth {
            return Color::ZERO;
        }

        let Some(rec) = self.world.hit(ray, Interval::from_min(self.config.t_min)) else {
            return self.config.sky.color(ray);
        };

        match rec.material.scatter(ray, &rec, rng) {
            Some(scatter) => scatter.attenuation * self.ray_color(&scatter.scattered, depth + 1, rng),
            None => Color::ZERO,
        }
    }

    /// Average linear color of scene pixel `(x, y)`, where `y = 0` is the
    /// bottom row of the scene.
    pub fn render_pixel(&self, x: u32, y: u32, rng: &mut dyn RngCore) -> Color {
        let width = self.config.width as f32;
        let height = self.config.height as f32;
        let mut pixel_color = Color::ZERO;

        for _ in 0..self.config.samples_per_pixel {
            let u = (x as f32 + rng.gen::<f32>()) / width;
            let v = (y as f32 + rng.gen::<f32>()) / height;
            let ray = self.camera.get_ray(u, v, rng);
            pixel_color += self.ray_color(&ray, 0, rng);
        }

        pixel_color / self.config.samples_per_pixel as f32
    }

    /// Final framebuffer value for scene pixel `(x, y)`, using the pixel's own
    /// deterministic random stream.
    pub fn sample_pixel(&self, x: u32, y: u32) -> Rgba<u16> {
        let mut rng = pixel_rng(self.config.seed, x, y, self.config.width);
        tone_map(self.render_pixel(x, y, &mut rng))
    }

    /// Framebuffer value for framebuffer cell `(x, row)`.
    pub fn sample_cell(&self, x: u32, row: u32) -> Rgba<u16> {
        self.sample_pixel(x, self.flip(row))
    }

    /// Convert between scene rows (0 = bottom) and framebuffer rows (0 = top).
    /// The mapping is its own inverse.
    #[inline]
    pub fn flip(&self, row: u32) -> u32 {
        self.config.height - 1 - row
    }
}

/// Random stream for one pixel.
///
/// Derived from the master seed and the pixel index only, so the image does
/// not depend on which thread renders which pixel.
pub fn pixel_rng(seed: u64, x: u32, y: u32, width: u32) -> StdRng {
    let index = y as u64 * width as u64 + x as u64;
    StdRng::seed_from_u64(splitmix64(seed ^ splitmix64(index)))
}

/// SplitMix64 finalizer.
fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to a 16-bit opaque framebuffer value.
pub fn tone_map(color: Color) -> Rgba<u16> {
    let channel = |c: f32| (Interval::UNIT.clamp(linear_to_gamma(c)) * u16::MAX as f32).round() as u16;
    Rgba([channel(color.x), channel(color.y), channel(color.z), u16::MAX])
}
