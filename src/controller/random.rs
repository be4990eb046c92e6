use crate::simulation::{CoordinateMode, Map, Track, Vec2};
use anyhow::{Result, bail};
use rand::{Rng, RngCore};
use rand_distr::{Distribution, UnitCircle};
use super::Controller;

/// Drives a track with accelerations of random direction and length.
#[derive(Debug, Clone)]
pub struct RandomWalkController {
    max_steps: usize,
}

impl RandomWalkController {
    pub fn new(max_steps: usize) -> Self {
        Self { max_steps }
    }
    
    /// Uniform angle, length uniform in `[0, max_acceleration]`, never zero.
    pub fn random_vector(map: &Map, rng: &mut dyn RngCore) -> Vec2 {
        loop {
            let [x, y]: [f64; 2] = UnitCircle.sample(rng);
            let length = rng.gen_range(0.0..=map.max_acceleration());
            let vector = map.coordinates().apply(Vec2::new(x, y) * length);
            
            if vector != Vec2::zeros() {
                return vector;
            }
        }
    }
}

impl Default for RandomWalkController {
    fn default() -> Self {
        Self::new(10_000)
    }
}

impl Controller for RandomWalkController {
    fn drive(&mut self, track: &mut Track, rng: &mut dyn RngCore) -> Result<()> {
        let map = track.map().clone();
        
        if map.coordinates() == CoordinateMode::Integer && map.max_acceleration() <= 1.0 {
            bail!(
                "max acceleration {} truncates every random step to zero with integer coordinates",
                map.max_acceleration()
            );
        }
        
        for _ in 0..self.max_steps {
            if !track.accelerate(Self::random_vector(&map, rng)) {
                return Ok(());
            }
        }
        
        log::warn!("Random walk stopped after {} steps without terminating", self.max_steps);
        Ok(())
    }
    
    fn get_name(&self) -> &'static str {
        "random"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::TrackState;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::sync::Arc;

    fn box_map() -> Arc<Map> {
        Arc::new(Map::parse(10.0, "w 0 0 0 100\nw 0 100 100 100\nw 100 100 100 0\nw 100 0 0 0\ns 20 30\nt 80 30").unwrap())
    }

    #[test]
    fn random_vectors_are_bounded_and_non_zero() {
        let map = box_map();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..1_000 {
            let vector = RandomWalkController::random_vector(&map, &mut rng);
            assert_ne!(vector, Vec2::zeros());
            assert!(vector.magnitude() <= map.max_acceleration());
            assert_eq!(vector, vector.map(f64::trunc));
        }
    }

    #[test]
    fn random_vector_lengths_span_up_to_max_acceleration() {
        let map = Map::parse(10.0, "s 0 0").unwrap().with_coordinates(CoordinateMode::Float);
        let mut rng = StdRng::seed_from_u64(8);
        let longest = (0..2_000)
            .map(|_| RandomWalkController::random_vector(&map, &mut rng).magnitude())
            .fold(0.0, f64::max);
        assert!(longest <= 10.0 + 1e-9);
        assert!(longest > 9.9);
    }

    #[test]
    fn walk_in_closed_box_terminates() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut controller = RandomWalkController::default();
        for _ in 0..20 {
            let mut track = Track::new(box_map());
            controller.drive(&mut track, &mut rng).unwrap();
            assert_ne!(track.state(), TrackState::Active);
        }
    }

    #[test]
    fn walk_on_open_map_stops_at_step_limit() {
        let map = Arc::new(Map::parse(10.0, "s 0 0\nt 1000000 1000000").unwrap());
        let mut rng = StdRng::seed_from_u64(5);
        let mut track = Track::new(map);
        RandomWalkController::new(25).drive(&mut track, &mut rng).unwrap();
        assert_eq!(track.len(), 26);
    }

    #[test]
    fn refuses_acceleration_that_truncates_to_zero() {
        let map = Arc::new(Map::new(1.0).unwrap());
        let mut rng = StdRng::seed_from_u64(5);
        let mut track = Track::new(map);
        assert!(RandomWalkController::default().drive(&mut track, &mut rng).is_err());
    }
}
