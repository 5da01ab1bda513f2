//! Bucket-based tile rendering.
//!
//! Divides the image into tiles (buckets) that can be rendered
//! independently and in parallel using rayon.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use image::Rgba;
use log::debug;
use rayon::prelude::*;

use crate::error::{RenderError, RenderResult};
use crate::renderer::{Framebuffer, Sampler};

/// A rectangular region of the image to render.
///
/// Coordinates are framebuffer coordinates: row 0 is the top of the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Index of this bucket in the render order
    pub index: usize,
}

impl Bucket {
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    /// Get the total number of pixels in this bucket.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

/// Generate buckets for an image, sorted in spiral order from center.
///
/// Central buckets come first, so the middle of the image fills in before the
/// edges.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let mut buckets = Vec::new();
    let mut index = 0;

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = bucket_size.min(width - x);
            let bh = bucket_size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, index));
            index += 1;
            x += bucket_size;
        }
        y += bucket_size;
    }

    sort_spiral(&mut buckets, width, height);

    // Update indices after sorting
    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }

    buckets
}

/// Sort buckets by distance from image center (spiral order).
fn sort_spiral(buckets: &mut [Bucket], width: u32, height: u32) {
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;

    let distance = |b: &Bucket| {
        let bx = b.x as f32 + b.width as f32 / 2.0;
        let by = b.y as f32 + b.height as f32 / 2.0;
        (bx - center_x).powi(2) + (by - center_y).powi(2)
    };

    // Stable sort keeps row-major order among equidistant buckets
    buckets.sort_by(|a, b| distance(a).total_cmp(&distance(b)));
}

/// Render a single bucket.
///
/// Returns pixels in row-major order within the bucket.
pub fn render_bucket(bucket: &Bucket, sampler: &Sampler<'_>) -> Vec<Rgba<u16>> {
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            pixels.push(sampler.sample_cell(bucket.x + local_x, bucket.y + local_y));
        }
    }

    pixels
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    /// The bucket that was rendered
    pub bucket: Bucket,
    /// Pixel values in row-major order
    pub pixels: Vec<Rgba<u16>>,
}

impl BucketResult {
    pub fn new(bucket: Bucket, pixels: Vec<Rgba<u16>>) -> Self {
        Self { bucket, pixels }
    }

    /// Copy the bucket's pixels into place.
    pub fn composite(&self, framebuffer: &mut Framebuffer) {
        let width = self.bucket.width as usize;
        for (i, pixel) in self.pixels.iter().enumerate() {
            let x = self.bucket.x + (i % width) as u32;
            let y = self.bucket.y + (i / width) as u32;
            framebuffer.put_pixel(x, y, *pixel);
        }
    }
}

/// Render every bucket on the rayon pool and composite the results.
///
/// `cancel` is checked before each bucket starts; buckets already in flight
/// finish.
pub fn render_buckets(
    sampler: &Sampler<'_>,
    framebuffer: &mut Framebuffer,
    bucket_size: u32,
    cancel: &AtomicBool,
) -> RenderResult<()> {
    if bucket_size == 0 {
        return Err(RenderError::InvalidBucketSize);
    }

    let buckets = generate_buckets(framebuffer.width(), framebuffer.height(), bucket_size);
    let total = buckets.len();
    let finished = AtomicUsize::new(0);

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .filter_map(|bucket| {
            if cancel.load(Ordering::Relaxed) {
                return None;
            }
            let pixels = render_bucket(bucket, sampler);
            let done = finished.fetch_add(1, Ordering::Relaxed) + 1;
            debug!("Bucket {}/{} done", done, total);
            Some(BucketResult::new(*bucket, pixels))
        })
        .collect();

    let mut completed = 0;
    for result in &results {
        result.composite(framebuffer);
        completed += result.pixels.len();
    }

    if results.len() < total {
        return Err(RenderError::Cancelled {
            completed,
            expected: sampler.config().pixel_count(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_buckets_exact_fit() {
        let buckets = generate_buckets(128, 128, 64);
        assert_eq!(buckets.len(), 4); // 2x2 grid

        // Total pixels should equal image size
        let total_pixels: u32 = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total_pixels, 128 * 128);
    }

    #[test]
    fn test_generate_buckets_partial_fit() {
        let buckets = generate_buckets(100, 100, 64);
        assert_eq!(buckets.len(), 4); // 2x2 grid with partial buckets

        let total_pixels: u32 = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total_pixels, 100 * 100);
    }

    #[test]
    fn test_spiral_order() {
        let buckets = generate_buckets(192, 192, 64);
        assert_eq!(buckets.len(), 9); // 3x3 grid

        // First bucket should be the center one
        let first = &buckets[0];
        assert_eq!(first.x, 64);
        assert_eq!(first.y, 64);
        assert!(buckets.iter().enumerate().all(|(i, b)| b.index == i));
    }

    #[test]
    fn test_buckets_cover_each_pixel_once() {
        let (width, height) = (37, 23);
        let mut seen = vec![0u8; (width * height) as usize];
        for bucket in generate_buckets(width, height, 8) {
            for y in bucket.y..bucket.y + bucket.height {
                for x in bucket.x..bucket.x + bucket.width {
                    seen[(y * width + x) as usize] += 1;
                }
            }
        }
        assert!(seen.iter().all(|&n| n == 1));
    }

    #[test]
    fn test_composite_places_pixels() {
        let mut framebuffer = Framebuffer::new(4, 4);
        let bucket = Bucket::new(2, 1, 2, 2, 0);
        let pixels = (0..4u16).map(|i| Rgba([i, i, i, u16::MAX])).collect();

        BucketResult::new(bucket, pixels).composite(&mut framebuffer);

        assert_eq!(framebuffer.get_pixel(2, 1)[0], 0);
        assert_eq!(framebuffer.get_pixel(3, 1)[0], 1);
        assert_eq!(framebuffer.get_pixel(2, 2)[0], 2);
        assert_eq!(framebuffer.get_pixel(3, 2)[0], 3);
        // Untouched outside the bucket
        assert_eq!(framebuffer.get_pixel(0, 0)[3], 0);
    }
}
