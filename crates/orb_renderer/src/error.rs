//! Error types for rendering and image output.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can end a render early.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("render needs at least one worker")]
    NoWorkers,

    #[error("bucket size must be at least 1")]
    InvalidBucketSize,

    #[error("render cancelled after {completed} of {expected} pixels")]
    Cancelled { completed: usize, expected: usize },

    #[error("render worker {worker} panicked")]
    WorkerPanicked { worker: usize },

    #[error("render stopped after {completed} of {expected} pixels")]
    Incomplete { completed: usize, expected: usize },

    #[error("failed to spawn render thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Result type for rendering.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while writing an image.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("failed to write {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Result type for image output.
pub type OutputResult<T> = Result<T, OutputError>;
