use serde::{Deserialize, Serialize};
use anyhow::{Result, anyhow};
use super::Validate;

/// Parameters of the genetic algorithm driving a population of tracks.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneticConfig {
    pub population_size: usize,
    /// Weight of the remaining distance to the target in the fitness.
    pub distance_factor: f64,
    /// Added to the fitness of every track that hit a wall.
    pub collision_penalty: f64,
    /// Fraction of best tracks kept unconditionally.
    pub retain_percentage: f64,
    /// Chance for each other track to survive anyway.
    pub random_select_chance: f64,
    /// Chance for each surviving track to get one waypoint replaced.
    pub mutate_chance: f64,
}

impl Default for GeneticConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            distance_factor: 10.0,
            collision_penalty: 100.0,
            retain_percentage: 0.2,
            random_select_chance: 0.05,
            mutate_chance: 0.01,
        }
    }
}

impl Validate for GeneticConfig {
    fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            return Err(anyhow!("Population size must be at least 2, got {}", self.population_size));
        }
        
        if !self.distance_factor.is_finite() || self.distance_factor < 0.0 {
            return Err(anyhow!("Distance factor must be non-negative"));
        }
        
        if !self.collision_penalty.is_finite() || self.collision_penalty < 0.0 {
            return Err(anyhow!("Collision penalty must be non-negative"));
        }
        
        let probabilities = [
            ("Retain percentage", self.retain_percentage),
            ("Random select chance", self.random_select_chance),
            ("Mutate chance", self.mutate_chance),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(anyhow!("{} must be in range [0, 1], got {}", name, value));
            }
        }
        
        Ok(())
    }
}
