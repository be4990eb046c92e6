use track_evolution::{
    config::{ControllerConfig, ControllerKind, EvolutionConfig, GeneticConfig},
    controller::ControllerBackend,
    simulation::{Map, Population, TrackState},
};
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;

fn manifest_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(relative)
}

fn load_config() -> Result<EvolutionConfig> {
    let mut config = EvolutionConfig::load_from_file(manifest_path("evolution.toml"))?;
    config.map.path = manifest_path(&config.map.path).to_string_lossy().into_owned();
    Ok(config)
}

fn small_genetic(config: &EvolutionConfig, population_size: usize) -> GeneticConfig {
    GeneticConfig {
        population_size,
        ..config.genetic.clone()
    }
}

/// Two populations built from the same seed must evolve identically
#[test]
fn test_seeded_runs_are_reproducible() -> Result<()> {
    let config = load_config()?;
    let map = Arc::new(config.map.load()?);
    let genetic = small_genetic(&config, 30);

    let mut first = Population::new(map.clone(), genetic.clone(), Some(12345))?;
    let mut second = Population::new(map, genetic, Some(12345))?;

    for generation in 0..10 {
        let a = first.evolve();
        let b = second.evolve();
        assert_eq!(a, b, "Grade mismatch at generation {}", generation);
    }

    for (a, b) in first.tracks().iter().zip(second.tracks()) {
        assert_eq!(a.positions(), b.positions());
        assert_eq!(a.collision(), b.collision());
    }

    Ok(())
}

#[test]
fn test_population_size_is_stable() -> Result<()> {
    let config = load_config()?;
    let map = Arc::new(config.map.load()?);
    let mut population = Population::new(map, small_genetic(&config, 40), Some(7))?;

    for _ in 0..20 {
        population.evolve();
        assert_eq!(population.tracks().len(), 40);
    }
    assert_eq!(population.generation(), 20);

    Ok(())
}

#[test]
fn test_every_track_respects_the_map() -> Result<()> {
    let config = load_config()?;
    let map = Arc::new(config.map.load()?);
    let mut population = Population::new(map.clone(), small_genetic(&config, 30), Some(99))?;

    for _ in 0..10 {
        population.evolve();
    }

    for track in population.tracks() {
        assert_eq!(track.positions()[0], map.start());
        for vector in track.acceleration_vectors() {
            assert!(vector.magnitude() <= map.max_acceleration() + 1e-9);
            assert_eq!(vector.x.fract(), 0.0);
            assert_eq!(vector.y.fract(), 0.0);
        }

        // Only the final step may touch a wall
        if track.len() > 2 {
            assert_eq!(track.check_collisions(1)?, track.collision());
        }
        if track.state() == TrackState::Collided {
            assert!(track.collision());
        }
    }

    Ok(())
}

#[test]
fn test_neural_controller_on_corridor() -> Result<()> {
    let config = load_config()?;
    let map = Arc::new(Map::load(10.0, manifest_path("maps/corridor.map"))?);
    assert_eq!(map.walls().len(), 6);

    let controller_config = ControllerConfig {
        kind: ControllerKind::Neural,
        max_steps: 300,
        ..ControllerConfig::default()
    };
    let mut controller = ControllerBackend::from_config(&controller_config);
    let mut population =
        Population::with_controller(map, small_genetic(&config, 20), Some(3), &mut controller)?;

    let initial = population.grade();
    assert!(initial.is_finite());

    for _ in 0..5 {
        population.evolve();
    }
    assert_eq!(population.tracks().len(), 20);
    assert!(population.best().is_some());

    Ok(())
}
