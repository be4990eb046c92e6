use serde::{Deserialize, Serialize};
use anyhow::{Result, anyhow};
use super::Validate;
use crate::simulation::{CoordinateMode, Map};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MapConfig {
    pub path: String,
    pub max_acceleration: f64,
    #[serde(default)]
    pub coordinates: CoordinateMode,
}

impl MapConfig {
    pub fn load(&self) -> Result<Map> {
        let map = Map::load(self.max_acceleration, &self.path)?
            .with_coordinates(self.coordinates);
        Ok(map)
    }
}

impl Validate for MapConfig {
    fn validate(&self) -> Result<()> {
        if self.path.trim().is_empty() {
            return Err(anyhow!("Map path must not be empty"));
        }
        
        if !(self.max_acceleration.is_finite() && self.max_acceleration > 0.0) {
            return Err(anyhow!("Max acceleration must be positive, got {}", self.max_acceleration));
        }
        
        // Truncation would turn every random step into the zero vector
        if self.coordinates == CoordinateMode::Integer && self.max_acceleration <= 1.0 {
            return Err(anyhow!("Integer coordinates need a max acceleration above 1, got {}", self.max_acceleration));
        }
        
        Ok(())
    }
}
