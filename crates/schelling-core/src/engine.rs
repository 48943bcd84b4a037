//! Simulation Engine
//!
//! Owns the population and the random source, and advances the model one
//! tick at a time. Each tick runs, in order:
//!
//! 1. vacancy-pool shuffle
//! 2. opinion update for every agent, from the opinions at tick start
//! 3. unhappy agents relocate, visited in a fresh random order
//! 4. agents not yet moved relocate voluntarily at rate `move_rate`

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::components::population::Population;
use crate::config::ModelConfig;
use crate::error::Result;
use crate::output::stats::{self, NetworkStats, TickStats};
use crate::setup::build_population;
use crate::systems::{relocate_idle, relocate_unhappy, update_opinions, OpinionModel};

/// A single simulation run
#[derive(Debug, Clone)]
pub struct Simulation {
    config: ModelConfig,
    population: Population,
    opinion_model: OpinionModel,
    rng: SmallRng,
    ticks: u64,
    unhappy_count: usize,
    idle_moves: usize,
}

impl Simulation {
    /// Validate `config` and build a fresh population seeded with `seed`
    pub fn initialize(config: ModelConfig, seed: u64) -> Result<Self> {
        Self::from_rng(config, SmallRng::seed_from_u64(seed))
    }

    /// Same as [`Simulation::initialize`] with an already seeded generator
    pub fn from_rng(config: ModelConfig, mut rng: SmallRng) -> Result<Self> {
        let population = build_population(&config, &mut rng)?;
        let opinion_model = OpinionModel::new(config.social_force, config.social_temperature);
        Ok(Self {
            config,
            population,
            opinion_model,
            rng,
            ticks: 0,
            unhappy_count: 0,
            idle_moves: 0,
        })
    }

    /// Run one tick.
    ///
    /// An error means the occupancy bookkeeping is broken; the simulation
    /// should be discarded.
    pub fn advance_tick(&mut self) -> Result<()> {
        self.population.shuffle_vacancies(&mut self.rng);

        update_opinions(&mut self.population, &self.opinion_model, &mut self.rng);

        let mut moved = vec![false; self.population.len()];
        self.unhappy_count = relocate_unhappy(
            &mut self.population,
            self.config.unhappiness_rule,
            self.config.num_races,
            &mut moved,
            &mut self.rng,
        )?;
        self.idle_moves = relocate_idle(
            &mut self.population,
            self.config.move_rate,
            &mut moved,
            &mut self.rng,
        )?;

        if cfg!(debug_assertions) {
            self.population.check_partition()?;
        }

        self.ticks += 1;
        tracing::debug!(
            tick = self.ticks,
            unhappy = self.unhappy_count,
            idle_moves = self.idle_moves,
            "Tick complete"
        );
        Ok(())
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn opinion_model(&self) -> &OpinionModel {
        &self.opinion_model
    }

    /// Completed ticks
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Agents found unhappy (and relocated) in the last tick
    pub fn unhappy_count(&self) -> usize {
        self.unhappy_count
    }

    /// Satisfied agents that relocated anyway in the last tick
    pub fn idle_moves(&self) -> usize {
        self.idle_moves
    }

    pub fn unhappy_percentage(&self) -> f64 {
        stats::unhappy_percentage(self.unhappy_count, self.population.occupied_count())
    }

    pub fn sameness_percentage(&self) -> Option<f64> {
        stats::sameness_percentage(&self.population)
    }

    pub fn no_preference_fraction(&self) -> f64 {
        stats::no_preference_fraction(&self.population)
    }

    /// All per-tick metrics for the last tick
    pub fn stats(&self) -> TickStats {
        TickStats {
            tick: self.ticks,
            unhappy_count: self.unhappy_count,
            idle_moves: self.idle_moves,
            unhappy_percentage: self.unhappy_percentage(),
            sameness_percentage: self.sameness_percentage(),
            no_preference_fraction: self.no_preference_fraction(),
        }
    }

    pub fn network_stats(&self) -> NetworkStats {
        NetworkStats::from_population(&self.population)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::agent::Opinion;
    use crate::error::{ConfigError, SimError};
    use crate::systems::UnhappinessRule;

    fn small_config() -> ModelConfig {
        ModelConfig {
            grid_size: 12,
            num_races: 2,
            empty_fraction: 0.2,
            ..ModelConfig::default()
        }
    }

    #[test]
    fn test_initialize_starts_at_tick_zero() {
        let sim = Simulation::initialize(small_config(), 42).unwrap();
        assert_eq!(sim.ticks(), 0);
        assert_eq!(sim.unhappy_count(), 0);
        assert_eq!(sim.unhappy_percentage(), 0.0);
        assert_eq!(sim.population().len(), 114);
    }

    #[test]
    fn test_initialize_rejects_bad_config() {
        let config = ModelConfig {
            num_races: 1,
            ..small_config()
        };
        assert!(matches!(
            Simulation::initialize(config, 1),
            Err(SimError::Config(ConfigError::TooFewRaces(1)))
        ));
    }

    #[test]
    fn test_tick_preserves_partition_and_population() {
        let config = ModelConfig {
            move_rate: 0.1,
            ..small_config()
        };
        let mut sim = Simulation::initialize(config, 7).unwrap();
        let vacancies = sim.population().vacancies().len();

        for t in 1..=30 {
            sim.advance_tick().unwrap();
            assert_eq!(sim.ticks(), t);
            assert_eq!(sim.population().occupied_count(), 114);
            assert_eq!(sim.population().vacancies().len(), vacancies);
            sim.population().check_partition().unwrap();
        }
    }

    #[test]
    fn test_all_indifferent_never_unhappy() {
        // Huge positive force keeps everyone at NoPreference
        let config = ModelConfig {
            initial_opinion_split: 1.0,
            social_force: 1000.0,
            ..small_config()
        };
        let mut sim = Simulation::initialize(config, 3).unwrap();
        let before: Vec<_> = sim
            .population()
            .agents()
            .iter()
            .map(|a| sim.population().position(a.id()))
            .collect();

        for _ in 0..10 {
            sim.advance_tick().unwrap();
            assert_eq!(sim.unhappy_count(), 0);
            assert_eq!(sim.idle_moves(), 0);
            assert_eq!(sim.no_preference_fraction(), 1.0);
        }
        let after: Vec<_> = sim
            .population()
            .agents()
            .iter()
            .map(|a| sim.population().position(a.id()))
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_schelling_agents_segregate() {
        // Strong negative force keeps everyone at SchellingPref
        let config = ModelConfig {
            grid_size: 20,
            initial_opinion_split: 0.0,
            social_force: -1000.0,
            ..small_config()
        };
        let mut sim = Simulation::initialize(config, 11).unwrap();
        let early = sim.sameness_percentage().unwrap();
        sim.advance_tick().unwrap();
        assert!(sim.unhappy_count() > 0);
        assert_eq!(sim.no_preference_fraction(), 0.0);

        for _ in 0..60 {
            sim.advance_tick().unwrap();
        }
        let late = sim.sameness_percentage().unwrap();
        assert!(late > early, "sameness {early} -> {late}");
    }

    #[test]
    fn test_dominated_rule_runs() {
        let config = ModelConfig {
            unhappiness_rule: UnhappinessRule::Dominated,
            initial_opinion_split: 0.0,
            social_force: -1000.0,
            ..small_config()
        };
        let mut sim = Simulation::initialize(config, 5).unwrap();
        for _ in 0..5 {
            sim.advance_tick().unwrap();
        }
        assert!(sim
            .population()
            .agents()
            .iter()
            .all(|a| a.opinion == Opinion::SchellingPref));
        sim.population().check_partition().unwrap();
    }

    #[test]
    fn test_stats_snapshot_matches_accessors() {
        let mut sim = Simulation::initialize(small_config(), 9).unwrap();
        sim.advance_tick().unwrap();
        let stats = sim.stats();
        assert_eq!(stats.tick, 1);
        assert_eq!(stats.unhappy_count, sim.unhappy_count());
        assert_eq!(stats.unhappy_percentage, sim.unhappy_percentage());
        assert_eq!(stats.sameness_percentage, sim.sameness_percentage());
        assert_eq!(sim.network_stats().agents, 114);
    }
}
