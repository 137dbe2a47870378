//! Arborvox Demo Runner
//!
//! Builds the procedural voxel tree, voxelizes it and runs the wind
//! animation headlessly for a fixed number of ticks, logging displacement
//! statistics along the way.
//!
//! # Usage
//!
//! ```bash
//! # Default scene: 100 ticks of steady wind along +X
//! arborvox
//!
//! # Stronger gusty wind, finer grid, treetops swaying more than the trunk
//! arborvox --wind-strength 8 --turbulence 0.5 --target-voxels 200 --per-level 0.4
//!
//! # Pin the ground tier and deform per vertex instead of per model
//! arborvox --pin-ground --strategy vertex
//! ```

use std::time::Duration;

use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use arborvox_core::{Turbulence, Vec3, WindField};
use arborvox_engine::{LevelScaling, PerVertex, RigidModel, SimConfig, Simulation, WindPolicy};
use arborvox_mesh::tree::{self, TreeConfig};
use arborvox_mesh::GridConfig;

/// Arborvox Demo Runner
#[derive(Parser, Debug)]
#[command(name = "arborvox")]
#[command(author, version, about = "Voxel wind animation demo", long_about = None)]
struct Cli {
    /// Number of ticks to simulate
    #[arg(short, long, default_value = "100")]
    ticks: u64,

    /// Approximate number of voxels to partition the tree into
    #[arg(long, default_value = "64")]
    target_voxels: usize,

    /// Wind strength
    #[arg(short = 's', long, default_value = "5.0")]
    wind_strength: f32,

    /// Wind direction as "x,y,z"
    #[arg(short = 'd', long, default_value = "1,0,0", value_parser = parse_vec3)]
    wind_dir: Vec3,

    /// Turbulence level, 0 (laminar) to 1 (chaotic)
    #[arg(long, default_value = "0.0")]
    turbulence: f32,

    /// Tick period in milliseconds
    #[arg(long, default_value = "100")]
    tick_ms: u64,

    /// Hold the ground tier of voxels fixed
    #[arg(long)]
    pin_ground: bool,

    /// Extra wind fraction per height tier (0 = uniform)
    #[arg(long, default_value = "0.0")]
    per_level: f32,

    /// Vertex update strategy: rigid or vertex
    #[arg(long, default_value = "rigid")]
    strategy: String,

    /// Logging verbosity level
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn parse_vec3(s: &str) -> Result<Vec3, String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 3 {
        return Err(format!("expected \"x,y,z\", got \"{s}\""));
    }
    let mut components = [0.0f32; 3];
    for (slot, part) in components.iter_mut().zip(&parts) {
        *slot = part
            .trim()
            .parse()
            .map_err(|e| format!("bad component \"{part}\": {e}"))?;
    }
    Ok(Vec3::new(components[0], components[1], components[2]))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Arborvox v{}", env!("CARGO_PKG_VERSION"));

    let arena = tree::generate(Vec3::zeros(), &TreeConfig::default());
    info!(
        submeshes = arena.len(),
        vertices = arena.vertex_count(),
        "generated tree"
    );

    let scaling = if cli.per_level > 0.0 {
        LevelScaling::Linear {
            per_level: cli.per_level,
        }
    } else {
        LevelScaling::Uniform
    };

    let config = SimConfig {
        grid: GridConfig::new(cli.target_voxels).with_margin(1.1),
        policy: WindPolicy {
            pin_ground: cli.pin_ground,
            scaling,
        },
        tick_period: Duration::from_millis(cli.tick_ms),
        ..SimConfig::default()
    };

    let mut sim = Simulation::new(arena, config)?;
    match cli.strategy.as_str() {
        "vertex" => sim.set_strategy(Box::new(PerVertex)),
        "rigid" => sim.set_strategy(Box::new(RigidModel)),
        other => anyhow::bail!("unknown strategy \"{other}\", expected rigid or vertex"),
    }

    let mut wind = WindField::new(cli.wind_dir, cli.wind_strength);
    wind.set_turbulence(Turbulence::new(cli.turbulence));
    *sim.wind_mut() = wind;

    info!(
        voxels = sim.voxels().len(),
        claimed = sim.assignment().claimed_vertices,
        pruned = sim.assignment().pruned_voxels,
        "scene ready"
    );

    sim.start();
    for _ in 0..cli.ticks {
        let report = sim.tick()?;
        if sim.ticks() % 10 == 0 {
            info!(
                tick = sim.ticks(),
                force = ?report.force,
                clamped = report.stats.clamped,
                max_displacement = sim.max_displacement(),
                "progress"
            );
        }
    }
    sim.stop();

    info!(
        ticks = sim.ticks(),
        elapsed_s = sim.elapsed(),
        max_displacement = sim.max_displacement(),
        "simulation complete"
    );

    Ok(())
}
