//! PNG output.

use std::path::Path;

use image::{DynamicImage, RgbaImage};
use log::info;
use orb_core::BitDepth;

use crate::error::{OutputError, OutputResult};
use crate::renderer::Framebuffer;

/// Reduce a framebuffer to 8 bits per channel.
pub fn to_rgba8(framebuffer: &Framebuffer) -> RgbaImage {
    DynamicImage::ImageRgba16(framebuffer.clone()).into_rgba8()
}

/// Write the framebuffer as a PNG with the requested channel depth.
pub fn save_image(path: impl AsRef<Path>, framebuffer: &Framebuffer, depth: BitDepth) -> OutputResult<()> {
    let path = path.as_ref();
    let result = match depth {
        BitDepth::Eight => to_rgba8(framebuffer).save(path),
        BitDepth::Sixteen => framebuffer.save(path),
    };
    result.map_err(|source| OutputError::Image {
        path: path.to_path_buf(),
        source,
    })?;

    info!(
        "Wrote {}x{} image to {} ({:?})",
        framebuffer.width(),
        framebuffer.height(),
        path.display(),
        depth
    );
    Ok(())
}
