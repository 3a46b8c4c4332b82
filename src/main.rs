use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use verdure::config::{GameConfig, load_config_from_path};
use verdure::sim::{Sim, Step, parse_script};
use verdure_world::worldgen::load_worldgen_from_path;

#[derive(Parser, Debug)]
#[command(name = "verdure", about = "Headless run of the verdure world streamer")]
struct Args {
    /// TOML config; every field is optional
    #[arg(long)]
    config: Option<PathBuf>,

    /// Standalone worldgen TOML; replaces the config's `[worldgen]` table
    #[arg(long)]
    worldgen: Option<PathBuf>,

    /// Overrides the config seed
    #[arg(long)]
    seed: Option<i32>,

    /// Idle frames appended after the script
    #[arg(long, default_value_t = 0)]
    frames: u32,

    /// Seconds per frame
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Comma-separated actions, e.g. `right:120,left:60,jump,idle:30`
    #[arg(long, default_value = "right:180,idle:120,right+jump:30,left:240,idle:60")]
    script: String,
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => load_config_from_path(path)?,
        None => GameConfig::default(),
    };
    if let Some(path) = &args.worldgen {
        config.worldgen = load_worldgen_from_path(path)?;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    let mut script = parse_script(&args.script)?;
    if args.frames > 0 {
        script.push(Step {
            keys: Vec::new(),
            frames: args.frames,
        });
    }
    let total: u32 = script.iter().map(|s| s.frames).sum();
    log::info!("running {} frames at dt={} (seed {})", total, args.dt, config.seed);

    let mut sim = Sim::new(config, args.dt)?;
    sim.run(&script);
    log::info!("{}", sim.report());
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    if let Err(e) = run(args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
