use anyhow::Context;
use clap::{Parser, Subcommand};
use cubestage_common::Rgba;
use cubestage_render::{FixedContainer, RenderSurface, TextSurface};
use cubestage_runner::{FixedStepClock, HeadlessDriver, SceneConfig, SceneRunner, run_frames};
use cubestage_scene::Bobber;
use glam::Vec3;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cubestage-cli", about = "Headless tools for the cubestage scene runner")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Run the scene headlessly at a fixed timestep
    Run {
        /// Number of frames to render
        #[arg(short, long, default_value = "120")]
        frames: u64,
        /// Simulated frames per second
        #[arg(long, default_value = "60")]
        fps: f32,
        /// Container width in logical pixels
        #[arg(long, default_value = "800")]
        width: u32,
        /// Container height in logical pixels
        #[arg(long, default_value = "600")]
        height: u32,
        /// Bobbing cubes to add before the first frame
        #[arg(long, default_value = "0")]
        spawn: usize,
        /// Print every Nth frame (0 prints only the last)
        #[arg(long, default_value = "0")]
        print_every: u64,
        /// Scene config file (.json, .yaml or .yml)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("cubestage-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("render: {}", cubestage_render::crate_info());
            println!("runner: {}", cubestage_runner::crate_info());
            let config = SceneConfig::default();
            println!(
                "camera sway: amplitude={} period={}s",
                config.camera.sway_amplitude, config.camera.sway_period
            );
        }
        Commands::Run {
            frames,
            fps,
            width,
            height,
            spawn,
            print_every,
            config,
        } => {
            anyhow::ensure!(fps > 0.0, "--fps must be positive");
            let config = match config {
                Some(path) => SceneConfig::load(&path)
                    .with_context(|| format!("loading {}", path.display()))?,
                None => SceneConfig::default(),
            };
            run(frames, fps, width, height, spawn, print_every, config)?;
        }
    }

    Ok(())
}

fn run(
    frames: u64,
    fps: f32,
    width: u32,
    height: u32,
    spawn: usize,
    print_every: u64,
    config: SceneConfig,
) -> anyhow::Result<()> {
    let clock = FixedStepClock::from_fps(fps);
    tracing::info!(frames, step = clock.step(), width, height, "starting headless run");

    let (driver, signal) = HeadlessDriver::new();
    let mut runner = SceneRunner::new(TextSurface::new(), clock, Box::new(driver), config);
    runner.initialize(&FixedContainer::new(width, height))?;
    runner.populate_initial_content();

    for i in 0..spawn {
        let angle = i as f32 / spawn as f32 * std::f32::consts::TAU;
        let anchor = Vec3::new(angle.cos() * 1.5, 0.5, angle.sin() * 1.5);
        // Stagger lifetimes so objects leave the scene one by one.
        let lifetime = 1.0 + i as f32 * 0.5;
        let bobber = Bobber::new(anchor, Rgba::from_hex(0xff8800), lifetime)
            .with_motion(0.2 + 0.05 * (i % 4) as f32, 0.5 + 0.25 * (i % 3) as f32);
        let id = runner.add_scene_object(Box::new(bobber));
        tracing::debug!(%id, lifetime, "spawned bobber");
    }

    println!("Headless run: {frames} frames at {fps} fps, {width}x{height}, {spawn} objects");

    let mut rendered = 0;
    while rendered < frames {
        let step = run_frames(&mut runner, &signal, 1)?;
        if step == 0 {
            break;
        }
        rendered += step;
        if print_every > 0 && rendered % print_every == 0 {
            print!("{}", runner.surface().last_frame());
        }
    }

    if print_every == 0 || rendered % print_every != 0 {
        print!("{}", runner.surface().last_frame());
    }

    runner.teardown();
    let state = runner.state();
    tracing::info!(frames = state.frames, age = state.age, "headless run finished");
    println!(
        "Done: frames={}, age={:.3}s, objects remaining={}, attached={}",
        state.frames,
        state.age,
        runner.object_count(),
        runner.surface().is_attached()
    );

    Ok(())
}
