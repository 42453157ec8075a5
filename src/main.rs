use anyhow::Result;
use clap::Parser;
use log::{debug, info, trace};
use std::path::PathBuf;
use std::time::Instant;
use trail_common::SimulationConfig;
use trail_engine::output::save_final_state;
use trail_engine::SimulationWorld;

/// Headless ant-trail run: loads a config, advances the world and writes the final state.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the config.toml file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Number of steps to run (overrides run.steps)
    #[arg(long)]
    steps: Option<u64>,

    /// Random seed (overrides run.seed)
    #[arg(long)]
    seed: Option<u64>,

    /// Directory the output files are written to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    info!("Starting ant-trail engine...");

    // --- Load Configuration ---
    let mut config = SimulationConfig::load(&args.config)?;
    if let Some(steps) = args.steps {
        config.run.steps = steps;
    }
    if let Some(seed) = args.seed {
        config.run.seed = seed;
    }

    // --- Initialize World ---
    let mut world = SimulationWorld::new(config.world.clone(), config.run.seed)?;
    info!(
        "World initialized: {}x{} lattice, nest at {:?}, seed {}.",
        world.lattice().size(),
        world.lattice().size(),
        world.nest_position(),
        world.seed()
    );
    debug!("World parameters: {:#?}", world.params());

    // --- Simulation Loop ---
    let total_steps = config.run.steps;
    let report_interval = config.run.report_interval_steps;
    info!("Starting simulation loop for {} steps...", total_steps);
    let start_time = Instant::now();
    let mut left_total = 0usize;

    for step in 0..total_steps {
        let step_start_time = Instant::now();
        let report = world.advance();
        left_total += report.left_lattice;
        let step_duration = step_start_time.elapsed();

        let is_report_step = report_interval > 0 && (step + 1) % report_interval == 0;
        let is_last_step = step + 1 == total_steps;
        if is_report_step || is_last_step {
            let counts = world.status_counts();
            info!(
                "Step [{}/{}] | Agents: {} (F {} / L {}, ratio {:.3}) | Pheromone: {} pu \
                 | Left: {} | Step Time: {:6.3} ms | Elapsed: {:.2} s",
                step + 1,
                total_steps,
                world.agent_count(),
                counts.following,
                counts.lost,
                counts.following_ratio(),
                world.total_pheromone(),
                left_total,
                step_duration.as_secs_f64() * 1000.0,
                start_time.elapsed().as_secs_f64()
            );
        } else {
            trace!(
                "Step [{}/{}] completed in {:.3} ms",
                step + 1,
                total_steps,
                step_duration.as_secs_f64() * 1000.0
            );
        }
    }

    let total_duration = start_time.elapsed();
    info!("Simulation finished in {:.3} seconds.", total_duration.as_secs_f64());

    // --- Save Final State ---
    info!("Saving final state...");
    let written = save_final_state(&world.snapshot(), &config.output, &args.output_dir)?;
    debug!("Wrote {} file(s).", written.len());

    info!("Simulation Complete.");
    Ok(())
}
