use super::{CoordinateMode, Map, Point, Track};
use crate::config::{GeneticConfig, Validate};
use crate::controller::{Controller, RandomWalkController};
use anyhow::Result;
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use std::sync::Arc;

/// Fixed-size set of tracks evolved by selection, mutation and crossover.
///
/// Mutation and crossover never edit a track in place: they propose a list
/// of waypoints and replay it through [`Track::replay`], so every member of
/// every generation is physically reachable and collision checked.
pub struct Population {
    map: Arc<Map>,
    config: GeneticConfig,
    tracks: Vec<Track>,
    rng: StdRng,
    generation: u64,
}

impl Population {
    /// Seeds the population with random walks.
    pub fn new(map: Arc<Map>, config: GeneticConfig, seed: Option<u64>) -> Result<Self> {
        let mut controller = RandomWalkController::default();
        Self::with_controller(map, config, seed, &mut controller)
    }

    pub fn with_controller(
        map: Arc<Map>,
        config: GeneticConfig,
        seed: Option<u64>,
        controller: &mut dyn Controller,
    ) -> Result<Self> {
        config.validate()?;

        let mut rng = if let Some(seed) = seed {
            StdRng::seed_from_u64(seed)
        } else {
            StdRng::from_entropy()
        };

        let mut tracks = Vec::with_capacity(config.population_size);
        for _ in 0..config.population_size {
            controller.reseed(&mut rng);
            let mut track = Track::new(map.clone());
            controller.drive(&mut track, &mut rng)?;
            tracks.push(track);
        }

        log::debug!("Generated {} tracks with the {} controller", tracks.len(), controller.get_name());

        Ok(Self {
            map,
            config,
            tracks,
            rng,
            generation: 0,
        })
    }

    pub fn map(&self) -> &Arc<Map> {
        &self.map
    }

    pub fn config(&self) -> &GeneticConfig {
        &self.config
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Number of completed `evolve` calls.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Fitness of a single track. Lower is better.
    pub fn fitness(&self, track: &Track) -> f64 {
        let distance = (track.last_position() - self.map.target()).magnitude();
        let penalty = if track.collision() {
            self.config.collision_penalty
        } else {
            0.0
        };

        self.config.distance_factor * distance + track.len() as f64 + penalty
    }

    /// Mean fitness of the current tracks.
    pub fn grade(&self) -> f64 {
        mean(self.tracks.iter().map(|track| self.fitness(track)))
    }

    pub fn best(&self) -> Option<(&Track, f64)> {
        self.tracks
            .iter()
            .map(|track| (track, self.fitness(track)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Runs one generation and returns the grade the population had before it.
    pub fn evolve(&mut self) -> f64 {
        let tracks = std::mem::take(&mut self.tracks);
        let mut graded: Vec<(f64, Track)> = tracks
            .into_iter()
            .map(|track| (self.fitness(&track), track))
            .collect();
        let grade = mean(graded.iter().map(|(fitness, _)| *fitness));

        graded.sort_by(|a, b| a.0.total_cmp(&b.0));
        let retain_length = (graded.len() as f64 * self.config.retain_percentage) as usize;

        // Keep the elite, let a few others through for diversity
        let mut parents = Vec::with_capacity(graded.len());
        let mut rejected = Vec::new();
        for (index, (_, track)) in graded.into_iter().enumerate() {
            if index < retain_length || self.rng.gen::<f64>() < self.config.random_select_chance {
                parents.push(track);
            } else {
                rejected.push(track);
            }
        }

        // Crossover needs two distinct parents
        let mut rejected = rejected.into_iter();
        while parents.len() < 2 {
            match rejected.next() {
                Some(track) => parents.push(track),
                None => break,
            }
        }

        let mut mutations = 0;
        for parent in parents.iter_mut() {
            if self.rng.gen::<f64>() < self.config.mutate_chance {
                *parent = self.mutate(parent);
                mutations += 1;
            }
        }

        let desired_length = self.config.population_size.saturating_sub(parents.len());
        let mut children = Vec::with_capacity(desired_length);
        debug_assert!(desired_length == 0 || parents.len() >= 2);
        while children.len() < desired_length {
            let male = self.rng.gen_range(0..parents.len());
            let female = self.rng.gen_range(0..parents.len());
            if male == female {
                continue;
            }
            children.push(self.crossover(&parents[male], &parents[female]));
        }

        log::debug!(
            "Generation {}: grade {:.3}, {} parents ({} mutated), {} children",
            self.generation + 1,
            grade,
            parents.len(),
            mutations,
            children.len()
        );

        parents.extend(children);
        self.tracks = parents;
        self.generation += 1;

        grade
    }

    /// Replays `track` with one waypoint moved to a random point on the map.
    fn mutate(&mut self, track: &Track) -> Track {
        let waypoints = self.mutated_waypoints(track);
        Track::replay(self.map.clone(), &waypoints)
    }

    fn mutated_waypoints(&mut self, track: &Track) -> Vec<Point> {
        let mut waypoints = track.positions().to_vec();
        let index = self.rng.gen_range(0..waypoints.len());
        waypoints[index] = self.random_point();
        waypoints
    }

    /// First half of `male` followed by the second half of `female`, replayed.
    fn crossover(&self, male: &Track, female: &Track) -> Track {
        let half_male = male.len() / 2;
        let half_female = female.len() / 2;

        let waypoints: Vec<Point> = male.positions()[..half_male]
            .iter()
            .chain(&female.positions()[half_female..])
            .copied()
            .collect();

        Track::replay(self.map.clone(), &waypoints)
    }

    fn random_point(&mut self) -> Point {
        let size = self.map.size();
        match self.map.coordinates() {
            CoordinateMode::Integer => Point::new(
                self.rng.gen_range(0..=size.x as i64) as f64,
                self.rng.gen_range(0..=size.y as i64) as f64,
            ),
            CoordinateMode::Float => Point::new(
                self.rng.gen_range(0.0..=size.x),
                self.rng.gen_range(0.0..=size.y),
            ),
        }
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
