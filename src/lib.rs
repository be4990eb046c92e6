pub mod config;
pub mod controller;
pub mod error;
pub mod simulation;

pub use simulation::*;
pub use error::*;
pub use config::{EvolutionConfig, Validate};
pub use controller::{Controller, ControllerBackend};
