//! Error Types
//!
//! Configuration errors are rejected before a run starts. Simulation errors
//! mean the movement bookkeeping is broken and the run must stop.

use rand::distributions::WeightedError;
use thiserror::Error;

use crate::components::lattice::Coord;

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading config file
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    /// Error parsing TOML config
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),
    #[error("grid size must be positive")]
    ZeroGridSize,
    #[error("a {0}x{0} grid has more cells than can be indexed")]
    GridTooLarge(usize),
    #[error("at least two races are required, got {0}")]
    TooFewRaces(usize),
    #[error("empty fraction must lie in [0, 1), got {0}")]
    EmptyFractionOutOfRange(f64),
    #[error("initial opinion split must lie in [0, 1], got {0}")]
    OpinionSplitOutOfRange(f64),
    #[error("social temperature must be positive and finite, got {0}")]
    InvalidTemperature(f64),
    #[error("social force must be finite, got {0}")]
    InvalidSocialForce(f64),
    #[error("move rate must be non-negative and finite, got {0}")]
    InvalidMoveRate(f64),
    #[error("configuration places no agents on a {grid_size}x{grid_size} grid")]
    NoAgents { grid_size: usize },
    #[error("{agents} agents leave no vacant cell on a {grid_size}x{grid_size} grid")]
    NoVacancy { agents: usize, grid_size: usize },
}

/// Errors raised while building or advancing a simulation
#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("attachment sampling failed: {0}")]
    Sampling(#[from] WeightedError),
    #[error("vacancy pool exhausted while relocating from {0}")]
    VacancyPoolExhausted(Coord),
    #[error("cannot relocate from vacant cell {0}")]
    SourceVacant(Coord),
    #[error("vacancy pool handed out occupied cell {0}")]
    DestinationOccupied(Coord),
    #[error("occupied/vacant partition broken: {0}")]
    PartitionBroken(String),
}

pub type Result<T> = std::result::Result<T, SimError>;
