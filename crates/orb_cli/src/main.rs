use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use orb_core::{demo_scene, load_scene, random_scene, save_scene, RenderSettings};
use orb_renderer::{render, save_image, Camera, RenderConfig, Schedule, World};
use rand::rngs::StdRng;
use rand::SeedableRng;

mod cli;
mod logger;

use cli::{Args, Command, GenerateArgs, RenderArgs};
use logger::init_logger;

fn main() -> ExitCode {
    let args = Args::parse();
    init_logger(args.log_level.into());

    let result = match args.command {
        Command::Render(render_args) => run_render(&render_args),
        Command::Generate(generate_args) => run_generate(&generate_args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run_render(args: &RenderArgs) -> Result<()> {
    let mut settings = match &args.settings {
        Some(path) => RenderSettings::load(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => RenderSettings::default(),
    };
    args.apply(&mut settings);
    settings.validate().context("Invalid render settings")?;

    let records = match &args.scene {
        Some(path) => {
            load_scene(path).with_context(|| format!("Failed to load scene {}", path.display()))?
        }
        None => {
            info!("No scene file given, rendering the demo scene");
            demo_scene()
        }
    };
    let world = World::from_records(&records);
    info!("Scene has {} spheres", world.len());

    let camera = Camera::from_settings(&settings.camera, settings.aspect());
    let config = RenderConfig::from(&settings);
    let framebuffer = render(&camera, &world, &config, Schedule::from_settings(&settings))?;

    save_image(&args.output, &framebuffer, settings.bit_depth)?;
    Ok(())
}

fn run_generate(args: &GenerateArgs) -> Result<()> {
    let records = if args.demo {
        demo_scene()
    } else {
        let mut rng = StdRng::seed_from_u64(args.seed);
        random_scene(&mut rng)
    };

    save_scene(&args.output, &records)
        .with_context(|| format!("Failed to write scene {}", args.output.display()))?;
    info!("Wrote {} spheres to {}", records.len(), args.output.display());
    Ok(())
}
