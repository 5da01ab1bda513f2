//! Distributes pixels over threads and assembles the framebuffer.
//!
//! Every mode samples each pixel with that pixel's own random stream, so the
//! framebuffer is identical whichever mode renders it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Instant;

use image::Rgba;
use log::{debug, info};
use orb_core::{RenderMode, RenderSettings};

use crate::bucket::render_buckets;
use crate::error::{RenderError, RenderResult};
use crate::renderer::{Framebuffer, RenderConfig, Sampler};
use crate::{Camera, Hittable};

/// How pixels are distributed over threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Row-major loop on the calling thread.
    Sequential,
    /// Fixed pool of worker threads fed one pixel at a time.
    Parallel { workers: usize },
    /// Square tiles on the rayon thread pool.
    Buckets { size: u32 },
}

impl Schedule {
    pub fn from_settings(settings: &RenderSettings) -> Self {
        match settings.mode {
            RenderMode::Sequential => Schedule::Sequential,
            RenderMode::Parallel => Schedule::Parallel {
                workers: settings.workers,
            },
            RenderMode::Buckets => Schedule::Buckets {
                size: settings.bucket_size,
            },
        }
    }
}

/// Render the whole image.
pub fn render(
    camera: &Camera,
    world: &dyn Hittable,
    config: &RenderConfig,
    schedule: Schedule,
) -> RenderResult<Framebuffer> {
    let cancel = AtomicBool::new(false);
    render_with_cancel(camera, world, config, schedule, &cancel)
}

/// Render the whole image, stopping early once `cancel` is set.
///
/// Pixels already being sampled when the flag is raised are finished; no
/// new ones are started. A cancelled render returns
/// [`RenderError::Cancelled`] and no framebuffer.
pub fn render_with_cancel(
    camera: &Camera,
    world: &dyn Hittable,
    config: &RenderConfig,
    schedule: Schedule,
    cancel: &AtomicBool,
) -> RenderResult<Framebuffer> {
    if config.width == 0 || config.height == 0 {
        return Err(RenderError::EmptyImage {
            width: config.width,
            height: config.height,
        });
    }

    info!(
        "Rendering {}x{} at {} spp, max depth {} ({:?})",
        config.width, config.height, config.samples_per_pixel, config.max_depth, schedule
    );

    let start = Instant::now();
    let sampler = Sampler::new(camera, world, config);
    let mut framebuffer = Framebuffer::new(config.width, config.height);

    match schedule {
        Schedule::Sequential => render_sequential(&sampler, &mut framebuffer, cancel)?,
        Schedule::Parallel { workers } => render_parallel(&sampler, &mut framebuffer, workers, cancel)?,
        Schedule::Buckets { size } => render_buckets(&sampler, &mut framebuffer, size, cancel)?,
    }

    info!("Render complete in {:.2?}", start.elapsed());
    Ok(framebuffer)
}

fn render_sequential(sampler: &Sampler<'_>, framebuffer: &mut Framebuffer, cancel: &AtomicBool) -> RenderResult<()> {
    let expected = sampler.config().pixel_count();
    let width = framebuffer.width() as usize;

    for (y, row) in framebuffer.enumerate_rows_mut() {
        if cancel.load(Ordering::Relaxed) {
            return Err(RenderError::Cancelled {
                completed: y as usize * width,
                expected,
            });
        }
        for (x, _, cell) in row {
            *cell = sampler.sample_cell(x, y);
        }
    }

    Ok(())
}

/// One unit of work: a pixel and exclusive access to its framebuffer cell.
struct PixelJob<'a> {
    x: u32,
    /// Framebuffer row, 0 at the top
    y: u32,
    cell: &'a mut Rgba<u16>,
}

/// Raises the abort flag if the owning worker unwinds.
struct AbortOnPanic<'a>(&'a AtomicBool);

impl Drop for AbortOnPanic<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.0.store(true, Ordering::SeqCst);
        }
    }
}

fn render_parallel(
    sampler: &Sampler<'_>,
    framebuffer: &mut Framebuffer,
    workers: usize,
    cancel: &AtomicBool,
) -> RenderResult<()> {
    if workers == 0 {
        return Err(RenderError::NoWorkers);
    }

    let expected = sampler.config().pixel_count();
    let abort = AtomicBool::new(false);
    let abort = &abort;
    let stopped = move || cancel.load(Ordering::Relaxed) || abort.load(Ordering::Relaxed);

    let (job_tx, job_rx) = mpsc::sync_channel::<PixelJob<'_>>(2 * workers);
    let job_rx = Arc::new(Mutex::new(job_rx));
    let (done_tx, done_rx) = mpsc::channel::<()>();

    thread::scope(|scope| -> RenderResult<()> {
        // Workers first: if a spawn fails, dropping `job_tx` on return lets
        // the ones already running drain out.
        let mut handles = Vec::with_capacity(workers);
        for id in 0..workers {
            let jobs: Arc<Mutex<Receiver<PixelJob<'_>>>> = Arc::clone(&job_rx);
            let done = done_tx.clone();
            let handle = thread::Builder::new()
                .name(format!("orb-worker-{}", id))
                .spawn_scoped(scope, move || {
                    let _guard = AbortOnPanic(abort);
                    while !stopped() {
                        let job = match jobs.lock() {
                            Ok(receiver) => receiver.recv(),
                            Err(_) => break,
                        };
                        let Ok(job) = job else {
                            break;
                        };
                        *job.cell = sampler.sample_cell(job.x, job.y);
                        if done.send(()).is_err() {
                            break;
                        }
                    }
                })?;
            handles.push(handle);
        }
        // Only the workers keep the queue and completion channel open
        drop(job_rx);
        drop(done_tx);

        let generator = thread::Builder::new()
            .name("orb-generator".into())
            .spawn_scoped(scope, move || {
                for (x, y, cell) in framebuffer.enumerate_pixels_mut() {
                    if stopped() || job_tx.send(PixelJob { x, y, cell }).is_err() {
                        break;
                    }
                }
            })?;

        let report_every = (expected / 10).max(1);
        let mut completed = 0;
        while done_rx.recv().is_ok() {
            completed += 1;
            if completed % report_every == 0 {
                debug!(
                    "Progress: {}/{} pixels ({:.0}%)",
                    completed,
                    expected,
                    completed as f32 / expected as f32 * 100.0
                );
            }
        }

        let mut panicked = None;
        for (id, handle) in handles.into_iter().enumerate() {
            if handle.join().is_err() {
                panicked.get_or_insert(id);
            }
        }
        let generator_ok = generator.join().is_ok();

        if let Some(worker) = panicked {
            Err(RenderError::WorkerPanicked { worker })
        } else if completed == expected && generator_ok {
            Ok(())
        } else if cancel.load(Ordering::Relaxed) {
            Err(RenderError::Cancelled { completed, expected })
        } else {
            Err(RenderError::Incomplete { completed, expected })
        }
    })
}
