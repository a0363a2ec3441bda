use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;
use pathspace_core::{load_scene, load_settings, AccumulationMode, RenderSettings, SceneDescription};
use pathspace_renderer::{Camera, Frame, ProgressiveRender, Scene};

mod cli;
mod display;

use cli::Args;
use display::Display;

fn init_logger(level: LevelFilter) {
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}

/// Settings file (or defaults) with command line overrides applied.
fn resolve_settings(args: &Args) -> Result<RenderSettings> {
    let mut settings = match &args.settings {
        Some(path) => load_settings(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => RenderSettings::default(),
    };

    if let Some(workers) = args.workers {
        settings.worker_count = workers;
    }
    if args.seed.is_some() {
        settings.seed = args.seed;
    }
    if args.strict {
        settings.accumulation = AccumulationMode::Strict;
    }

    settings.validate().context("Invalid render settings")?;
    Ok(settings)
}

fn resolve_scene(args: &Args) -> Result<SceneDescription> {
    match &args.scene {
        Some(path) => load_scene(path)
            .with_context(|| format!("Failed to load scene from {}", path.display())),
        None => {
            log::info!("No scene given, using the demo box");
            Ok(SceneDescription::demo())
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.log_level.into());

    log::info!("Starting PathSpace");

    let settings = resolve_settings(&args)?;
    let description = resolve_scene(&args)?;

    let scene = Scene::from_description(&description).context("Invalid scene")?;
    let camera = Camera::from_desc(&description.camera, settings.aspect_ratio())
        .context("Invalid camera")?;
    let frame = Arc::new(
        Frame::new(
            settings.render_width,
            settings.render_height,
            settings.accumulation,
        )
        .context("Invalid frame size")?,
    );

    log::info!(
        "Rendering {}x{} ({:?} accumulation), presenting at {}x{}",
        settings.render_width,
        settings.render_height,
        settings.accumulation,
        settings.window_width,
        settings.window_height
    );

    let mut display = Display::new(&settings, &args.output);
    let render = ProgressiveRender::start(Arc::new(scene), camera, Arc::clone(&frame), &settings)
        .context("Failed to start render workers")?;

    let interval = Duration::from_secs_f64(args.interval.max(0.01));
    let run_for = Duration::from_secs_f64(args.seconds.max(0.0));
    let started = Instant::now();

    // Display loop: not synchronized with the workers
    while started.elapsed() < run_for {
        thread::sleep(interval.min(run_for.saturating_sub(started.elapsed())));
        display.present(&frame)?;
    }

    let sweeps = render.stop();
    display.present(&frame)?;

    let elapsed = started.elapsed().as_secs_f64();
    log::info!(
        "Finished {} sweeps ({} samples) in {:.1}s, wrote {}",
        sweeps,
        sweeps * settings.samples_per_sweep(),
        elapsed,
        display.output().display()
    );

    Ok(())
}
