//! Schelling Segregation with Social Opinion Dynamics
//!
//! Agents of several races live on a toroidal grid. Each tick every agent
//! redraws a binary opinion from its friend network, agents who care about
//! their neighbors' race move away when they are a strict local minority, and
//! satisfied agents occasionally move anyway.

pub mod components;
pub mod config;
pub mod engine;
pub mod error;
pub mod output;
pub mod runner;
pub mod setup;
pub mod systems;

pub use components::*;
pub use config::{Config, ModelConfig, RunConfig};
pub use engine::Simulation;
pub use error::{ConfigError, SimError};
pub use runner::{run_simulation, run_until, run_until_converged, RunOutcome, RunSummary};
pub use systems::UnhappinessRule;
