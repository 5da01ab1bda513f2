//! Orb Core - scene description and render settings.
//!
//! This crate provides:
//!
//! - **Scene records**: `SphereRecord`, `MaterialRecord`, and the line-based
//!   scene file format (`x,y,z,radius,Kind,params...`)
//! - **Scene generators**: the small demo scene and the random "cover" scene
//! - **Render settings**: `RenderSettings`, loadable from JSON
//!
//! It knows nothing about how spheres are intersected; `orb_renderer` turns
//! records into renderable objects.
//!
//! # Example
//!
//! ```ignore
//! use orb_core::scene::load_scene;
//!
//! let records = load_scene("scene.csv")?;
//! println!("Loaded {} spheres", records.len());
//! ```

pub mod config;
pub mod generate;
pub mod scene;

// Re-export commonly used types
pub use config::{BitDepth, CameraSettings, ConfigError, RenderMode, RenderSettings};
pub use generate::{demo_scene, random_scene};
pub use scene::{load_scene, parse_scene, save_scene, MaterialRecord, SceneError, SphereRecord};
