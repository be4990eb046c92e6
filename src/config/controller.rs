use serde::{Deserialize, Serialize};
use anyhow::{Result, anyhow};
use super::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ControllerKind {
    /// Random accelerations until the track terminates
    #[default]
    Random,
    /// Weight-matrix network fed with wall distances
    Neural,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ControllerConfig {
    #[serde(default)]
    pub kind: ControllerKind,
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
    #[serde(default = "default_weight_min")]
    pub weight_min: f64,
    #[serde(default = "default_weight_max")]
    pub weight_max: f64,
    #[serde(default = "default_middle_nodes")]
    pub middle_nodes: usize,
}

fn default_max_steps() -> usize {
    10_000
}

fn default_weight_min() -> f64 {
    -1.0
}

fn default_weight_max() -> f64 {
    1.0
}

fn default_middle_nodes() -> usize {
    8
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            kind: ControllerKind::default(),
            max_steps: default_max_steps(),
            weight_min: default_weight_min(),
            weight_max: default_weight_max(),
            middle_nodes: default_middle_nodes(),
        }
    }
}

impl Validate for ControllerConfig {
    fn validate(&self) -> Result<()> {
        if self.max_steps == 0 {
            return Err(anyhow!("Controller max steps must be greater than zero"));
        }
        
        if self.kind == ControllerKind::Neural {
            if !self.weight_min.is_finite() || !self.weight_max.is_finite() || self.weight_min >= self.weight_max {
                return Err(anyhow!("Weight range [{}, {}] is empty", self.weight_min, self.weight_max));
            }
            
            if self.middle_nodes == 0 {
                return Err(anyhow!("Neural controller needs at least one middle node"));
            }
        }
        
        Ok(())
    }
}
