//! Strategies that grow a fresh [`Track`] until it terminates.
//!
//! Population selection never looks at how a track was produced, so any
//! controller can seed the first generation.

use crate::config::{ControllerConfig, ControllerKind};
use crate::simulation::Track;
use anyhow::Result;
use rand::RngCore;

pub mod random;
pub mod neural;

pub use random::*;
pub use neural::*;

pub trait Controller {
    /// Accelerates `track` until it collides, arrives or the controller gives up.
    fn drive(&mut self, track: &mut Track, rng: &mut dyn RngCore) -> Result<()>;
    
    /// Called before every new individual so stateful controllers can vary.
    fn reseed(&mut self, _rng: &mut dyn RngCore) {}
    
    fn get_name(&self) -> &'static str;
}

pub enum ControllerBackend {
    Random(RandomWalkController),
    Neural(NeuralController),
}

impl ControllerBackend {
    pub fn new_random(max_steps: usize) -> Self {
        ControllerBackend::Random(RandomWalkController::new(max_steps))
    }
    
    pub fn new_neural(config: &ControllerConfig) -> Self {
        ControllerBackend::Neural(NeuralController::new(
            config.middle_nodes,
            config.weight_min,
            config.weight_max,
            config.max_steps,
        ))
    }
    
    pub fn from_config(config: &ControllerConfig) -> Self {
        match config.kind {
            ControllerKind::Random => Self::new_random(config.max_steps),
            ControllerKind::Neural => Self::new_neural(config),
        }
    }
}

impl Controller for ControllerBackend {
    fn drive(&mut self, track: &mut Track, rng: &mut dyn RngCore) -> Result<()> {
        match self {
            ControllerBackend::Random(controller) => controller.drive(track, rng),
            ControllerBackend::Neural(controller) => controller.drive(track, rng),
        }
    }
    
    fn reseed(&mut self, rng: &mut dyn RngCore) {
        match self {
            ControllerBackend::Random(controller) => controller.reseed(rng),
            ControllerBackend::Neural(controller) => controller.reseed(rng),
        }
    }
    
    fn get_name(&self) -> &'static str {
        match self {
            ControllerBackend::Random(controller) => controller.get_name(),
            ControllerBackend::Neural(controller) => controller.get_name(),
        }
    }
}
