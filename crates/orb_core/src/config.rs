//! Render settings.
//!
//! Every field has a default, so a settings file only needs the values it
//! changes:
//!
//! ```json
//! { "width": 400, "height": 200, "camera": { "aperture": 0.0 } }
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use orb_math::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid setting: {0}")]
    Invalid(String),
}

/// Result type for settings operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Bits per channel of the written image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BitDepth {
    #[serde(rename = "8")]
    Eight,
    #[default]
    #[serde(rename = "16")]
    Sixteen,
}

/// How pixels are distributed over threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// One thread, row-major order.
    Sequential,
    /// Worker pool fed one pixel at a time through a bounded queue.
    #[default]
    Parallel,
    /// Square tiles rendered on the rayon thread pool.
    Buckets,
}

/// Camera pose and lens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub look_from: Vec3,
    pub look_at: Vec3,
    pub vup: Vec3,
    /// Vertical field of view in degrees
    pub vfov: f32,
    /// Lens diameter; 0 disables depth of field
    pub aperture: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            look_from: Vec3::new(3.0, 3.0, 2.0),
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 40.0,
            aperture: 0.1,
        }
    }
}

/// Everything the renderer needs besides the scene itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    pub samples_per_pixel: u32,
    pub max_depth: u32,
    pub mode: RenderMode,
    /// Worker count for [`RenderMode::Parallel`]
    pub workers: usize,
    /// Tile edge in pixels for [`RenderMode::Buckets`]
    pub bucket_size: u32,
    /// Master seed; every pixel's random stream derives from it
    pub seed: u64,
    /// Minimum hit distance, avoids self-intersection at bounce points
    pub t_min: f32,
    pub bit_depth: BitDepth,
    pub camera: CameraSettings,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 400,
            samples_per_pixel: 100,
            max_depth: 50,
            mode: RenderMode::default(),
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(2),
            bucket_size: 64,
            seed: 42,
            t_min: 0.001,
            bit_depth: BitDepth::default(),
            camera: CameraSettings::default(),
        }
    }
}

impl RenderSettings {
    /// Load settings from a JSON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let file = File::open(path.as_ref())?;
        let settings: RenderSettings = serde_json::from_reader(BufReader::new(file))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings the renderer cannot work with.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "image size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.samples_per_pixel == 0 {
            return Err(ConfigError::Invalid("samples_per_pixel must be at least 1".into()));
        }
        if self.workers == 0 {
            return Err(ConfigError::Invalid("workers must be at least 1".into()));
        }
        if self.bucket_size == 0 {
            return Err(ConfigError::Invalid("bucket_size must be at least 1".into()));
        }
        if !(self.t_min >= 0.0 && self.t_min.is_finite()) {
            return Err(ConfigError::Invalid(format!("t_min must be >= 0, got {}", self.t_min)));
        }
        let camera = &self.camera;
        if !(camera.vfov > 0.0 && camera.vfov < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "vfov must be in (0, 180) degrees, got {}",
                camera.vfov
            )));
        }
        if camera.aperture < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "aperture must be >= 0, got {}",
                camera.aperture
            )));
        }
        if camera.look_from == camera.look_at {
            return Err(ConfigError::Invalid("look_from and look_at must differ".into()));
        }
        Ok(())
    }

    /// Image aspect ratio (width / height).
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}
