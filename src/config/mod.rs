use anyhow::{Result, anyhow, Context};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub mod map;
pub mod genetic;
pub mod controller;

pub use map::*;
pub use genetic::*;
pub use controller::*;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EvolutionConfig {
    pub map: MapConfig,
    pub genetic: GeneticConfig,
    #[serde(default)]
    pub controller: ControllerConfig,
    pub run: RunConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RunConfig {
    pub max_generations: u32,
    pub seed: Option<u64>,
    #[serde(default = "default_report_every")]
    pub report_every: u32,
}

fn default_report_every() -> u32 {
    10
}

impl EvolutionConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        
        Self::from_toml_str(&content)
    }
    
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EvolutionConfig = toml::from_str(content)?;
        
        // Validate configurations
        config.validate()?;
        
        Ok(config)
    }
}

impl Validate for EvolutionConfig {
    fn validate(&self) -> Result<()> {
        self.map.validate()?;
        self.genetic.validate()?;
        self.controller.validate()?;
        self.run.validate()?;
        Ok(())
    }
}

impl Validate for RunConfig {
    fn validate(&self) -> Result<()> {
        if self.max_generations == 0 {
            return Err(anyhow!("Max generations must be greater than zero"));
        }
        
        if self.report_every == 0 {
            return Err(anyhow!("Report interval must be greater than zero"));
        }
        
        Ok(())
    }
}

pub trait Validate {
    fn validate(&self) -> Result<()>;
}
