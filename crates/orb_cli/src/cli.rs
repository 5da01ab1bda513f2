use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use orb_core::{BitDepth, RenderMode, RenderSettings};

/// Log levels selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Sequential,
    Parallel,
    Buckets,
}

impl From<ModeArg> for RenderMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Sequential => RenderMode::Sequential,
            ModeArg::Parallel => RenderMode::Parallel,
            ModeArg::Buckets => RenderMode::Buckets,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BitDepthArg {
    #[value(name = "8")]
    Eight,
    #[value(name = "16")]
    Sixteen,
}

impl From<BitDepthArg> for BitDepth {
    fn from(depth: BitDepthArg) -> Self {
        match depth {
            BitDepthArg::Eight => BitDepth::Eight,
            BitDepthArg::Sixteen => BitDepth::Sixteen,
        }
    }
}

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "orb", version)]
#[command(about = "Monte Carlo path tracer for sphere scenes")]
pub struct Args {
    /// Set the logging level (RUST_LOG overrides it)
    #[arg(long, global = true, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render a scene file to a PNG image
    Render(RenderArgs),
    /// Write a randomly generated scene file
    Generate(GenerateArgs),
}

#[derive(Debug, clap::Args)]
pub struct RenderArgs {
    /// Scene file (x,y,z,radius,Kind,params per line); renders the demo scene when omitted
    pub scene: Option<PathBuf>,

    /// Output PNG path
    #[arg(short, long, default_value = "render.png")]
    pub output: PathBuf,

    /// Render on a pool of this many worker threads
    #[arg(short = 'p', long)]
    pub workers: Option<usize>,

    /// How pixels are distributed over threads
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Image height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Number of samples per pixel
    #[arg(short, long)]
    pub samples: Option<u32>,

    /// Maximum bounces per path
    #[arg(long)]
    pub max_depth: Option<u32>,

    /// Master random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Tile edge length for bucket mode
    #[arg(long)]
    pub bucket_size: Option<u32>,

    /// Bits per channel of the written image
    #[arg(long, value_enum)]
    pub bit_depth: Option<BitDepthArg>,

    /// JSON settings file; flags override its values
    #[arg(long)]
    pub settings: Option<PathBuf>,
}

impl RenderArgs {
    /// Apply flags on top of `settings`.
    ///
    /// `--workers` without `--mode` selects the worker pool.
    pub fn apply(&self, settings: &mut RenderSettings) {
        if let Some(workers) = self.workers {
            settings.workers = workers;
            settings.mode = RenderMode::Parallel;
        }
        if let Some(mode) = self.mode {
            settings.mode = mode.into();
        }
        if let Some(width) = self.width {
            settings.width = width;
        }
        if let Some(height) = self.height {
            settings.height = height;
        }
        if let Some(samples) = self.samples {
            settings.samples_per_pixel = samples;
        }
        if let Some(max_depth) = self.max_depth {
            settings.max_depth = max_depth;
        }
        if let Some(seed) = self.seed {
            settings.seed = seed;
        }
        if let Some(size) = self.bucket_size {
            settings.bucket_size = size;
        }
        if let Some(depth) = self.bit_depth {
            settings.bit_depth = depth.into();
        }
    }
}

#[derive(Debug, clap::Args)]
pub struct GenerateArgs {
    /// Where to write the scene file
    pub output: PathBuf,

    /// Seed for the scene layout
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Write the small built-in demo scene instead of a random one
    #[arg(long)]
    pub demo: bool,
}
