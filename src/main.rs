use anyhow::Result;
use clap::Parser;
use log::info;
use std::sync::Arc;
use std::time::Instant;

use track_evolution::{
    config::EvolutionConfig,
    controller::{Controller, ControllerBackend},
    simulation::{Population, TrackState},
};

#[derive(Parser)]
#[command(name = "track-evolution")]
#[command(about = "Evolves trajectories across an obstacle map with a genetic algorithm")]
struct Args {
    /// Evolution configuration file
    #[arg(short, long, default_value = "evolution.toml")]
    config: String,

    /// Number of generations to run, overrides the config file
    #[arg(short, long)]
    generations: Option<u32>,

    /// Random seed for reproducible runs
    #[arg(short, long)]
    seed: Option<u64>,

    /// Enable verbose logging for per-generation details
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(if args.verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info })
        .init();
    info!("Starting Track Evolution");

    let config = EvolutionConfig::load_from_file(&args.config)?;
    let map = Arc::new(config.map.load()?);
    info!("Loaded map {}: {} walls, size {}x{}, max acceleration {}",
          config.map.path,
          map.walls().len(),
          map.size().x,
          map.size().y,
          map.max_acceleration());

    let seed = args.seed.or(config.run.seed);
    let generations = args.generations.unwrap_or(config.run.max_generations);

    let mut controller = ControllerBackend::from_config(&config.controller);
    let start_time = Instant::now();
    let mut population = Population::with_controller(
        map.clone(),
        config.genetic.clone(),
        seed,
        &mut controller,
    )?;

    info!("=== Evolution Configuration ===");
    info!("Controller: {}", controller.get_name());
    info!("Population: {} tracks", config.genetic.population_size);
    info!("Generations: {}", generations);
    if let Some(seed) = seed {
        info!("Random Seed: {}", seed);
    }
    info!("Initial population built in {:.2}s", start_time.elapsed().as_secs_f64());

    let evolve_start = Instant::now();
    for generation in 1..=generations {
        let grade = population.evolve();

        if generation % config.run.report_every == 0 || generation == generations {
            info!("Generation {}: grade {:.3}", generation, grade);
        }
    }

    // Final statistics
    let arrived = population
        .tracks()
        .iter()
        .filter(|track| track.state() == TrackState::Arrived)
        .count();

    info!("Evolution completed!");
    info!("Total time: {:.2}s", evolve_start.elapsed().as_secs_f64());
    info!("Final grade: {:.3}", population.grade());
    info!("Tracks on target: {} of {}", arrived, population.tracks().len());

    if let Some((best, fitness)) = population.best() {
        let last = best.last_position();
        info!("Best track: fitness {:.3}, {} positions, {:?}, ends at ({}, {})",
              fitness,
              best.len(),
              best.state(),
              last.x,
              last.y);

        if args.verbose {
            for (index, position) in best.positions().iter().enumerate() {
                log::debug!("  {:>4}: ({}, {})", index, position.x, position.y);
            }
        }
    }

    Ok(())
}
