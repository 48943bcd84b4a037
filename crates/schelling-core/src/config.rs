//! Configuration System
//!
//! Model and run parameters, loaded from TOML. Parameters are fixed for the
//! lifetime of a simulation.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::systems::happiness::UnhappinessRule;

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "schelling.toml";

/// Each new agent attaches to this many existing agents, when available
pub const MINIMUM_FRIENDS: usize = 3;

/// Top-level configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub run: RunConfig,
}

/// Parameters of the segregation model itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Side length of the square torus
    pub grid_size: usize,
    pub num_races: usize,
    /// Fraction of cells left vacant, in [0, 1)
    pub empty_fraction: f64,
    /// Probability that a new agent starts with no preference
    pub initial_opinion_split: f64,
    pub social_force: f64,
    pub social_temperature: f64,
    /// Poisson rate of voluntary moves per tick
    pub move_rate: f64,
    pub unhappiness_rule: UnhappinessRule,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            grid_size: 100,
            num_races: 2,
            empty_fraction: 0.2,
            initial_opinion_split: 0.5,
            social_force: 0.0,
            social_temperature: 1.0,
            move_rate: 0.0,
            unhappiness_rule: UnhappinessRule::Minority,
        }
    }
}

/// Parameters of a single run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Random seed for reproducibility
    pub seed: u64,
    pub max_ticks: u64,
    /// Stop once the unhappy percentage changes by less than this between ticks
    pub convergence_threshold: f64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            max_ticks: 1000,
            convergence_threshold: 0.1,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from `path`, or use defaults if it is missing or invalid
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path.as_ref()).unwrap_or_else(|e| {
            tracing::warn!(
                "Could not load {}: {}. Using defaults.",
                path.as_ref().display(),
                e
            );
            Self::default()
        })
    }
}

impl ModelConfig {
    /// Agents created for each race
    pub fn agents_per_race(&self) -> usize {
        let side = self.grid_size as f64;
        (side * side * (1.0 - self.empty_fraction) / self.num_races as f64).floor() as usize
    }

    pub fn total_agents(&self) -> usize {
        self.agents_per_race().saturating_mul(self.num_races)
    }

    /// Reject parameter combinations the model cannot run
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size == 0 {
            return Err(ConfigError::ZeroGridSize);
        }
        let cells = self
            .grid_size
            .checked_mul(self.grid_size)
            .ok_or(ConfigError::GridTooLarge(self.grid_size))?;
        if self.num_races < 2 {
            return Err(ConfigError::TooFewRaces(self.num_races));
        }
        if !(0.0..1.0).contains(&self.empty_fraction) {
            return Err(ConfigError::EmptyFractionOutOfRange(self.empty_fraction));
        }
        if !(0.0..=1.0).contains(&self.initial_opinion_split) {
            return Err(ConfigError::OpinionSplitOutOfRange(
                self.initial_opinion_split,
            ));
        }
        if !(self.social_temperature.is_finite() && self.social_temperature > 0.0) {
            return Err(ConfigError::InvalidTemperature(self.social_temperature));
        }
        if !self.social_force.is_finite() {
            return Err(ConfigError::InvalidSocialForce(self.social_force));
        }
        if !(self.move_rate.is_finite() && self.move_rate >= 0.0) {
            return Err(ConfigError::InvalidMoveRate(self.move_rate));
        }

        let agents = self.total_agents();
        if agents == 0 {
            return Err(ConfigError::NoAgents {
                grid_size: self.grid_size,
            });
        }
        if agents >= cells {
            return Err(ConfigError::NoVacancy {
                agents,
                grid_size: self.grid_size,
            });
        }
        Ok(())
    }
}
