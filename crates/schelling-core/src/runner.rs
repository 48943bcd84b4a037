//! Run Driver
//!
//! Advances a single simulation until the unhappy percentage settles or a
//! tick limit is reached.

use serde::Serialize;

use crate::config::{Config, RunConfig};
use crate::engine::Simulation;
use crate::error::Result;
use crate::output::stats::{NetworkStats, StatsCollector, TickStats};

/// Final metrics of one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub converged: bool,
    pub pct_happy: f64,
    pub pct_same: Option<f64>,
    pub no_preference_fraction: f64,
    pub network: NetworkStats,
}

/// Summary plus per-tick history
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub summary: RunSummary,
    pub history: StatsCollector,
}

/// Initialize from `config` and run to convergence
pub fn run_simulation(config: &Config) -> Result<RunOutcome> {
    let mut sim = Simulation::initialize(config.model.clone(), config.run.seed)?;
    run_until_converged(&mut sim, &config.run)
}

/// Tick until the unhappy percentage moves by less than the threshold
pub fn run_until_converged(sim: &mut Simulation, run: &RunConfig) -> Result<RunOutcome> {
    let threshold = run.convergence_threshold;
    run_until(sim, run.max_ticks, |history| {
        history.unhappy_delta().is_some_and(|delta| delta < threshold)
    })
}

/// Tick until `stop` returns true or `max_ticks` total ticks have run.
///
/// `stop` sees the history after each tick; a run that ends through `stop`
/// is reported as converged.
pub fn run_until<F>(sim: &mut Simulation, max_ticks: u64, mut stop: F) -> Result<RunOutcome>
where
    F: FnMut(&StatsCollector) -> bool,
{
    let mut history = StatsCollector::new();
    let mut converged = false;

    while sim.ticks() < max_ticks {
        sim.advance_tick()?;
        history.record(sim.stats());
        if stop(&history) {
            converged = true;
            break;
        }
    }

    let last = history.last().cloned().unwrap_or_else(|| sim.stats());
    let summary = summarize(sim, &last, converged);
    tracing::info!(
        ticks = summary.ticks,
        converged = summary.converged,
        pct_happy = summary.pct_happy,
        "Run finished"
    );
    Ok(RunOutcome { summary, history })
}

fn summarize(sim: &Simulation, last: &TickStats, converged: bool) -> RunSummary {
    RunSummary {
        ticks: sim.ticks(),
        converged,
        pct_happy: 100.0 - last.unhappy_percentage,
        pct_same: last.sameness_percentage,
        no_preference_fraction: last.no_preference_fraction,
        network: sim.network_stats(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelConfig;

    fn small(seed: u64) -> Config {
        Config {
            model: ModelConfig {
                grid_size: 15,
                initial_opinion_split: 0.0,
                ..ModelConfig::default()
            },
            run: RunConfig {
                seed,
                max_ticks: 500,
                convergence_threshold: 0.1,
            },
        }
    }

    #[test]
    fn test_run_converges_or_hits_limit() {
        let outcome = run_simulation(&small(42)).unwrap();
        let summary = &outcome.summary;

        assert!(summary.ticks >= 1 && summary.ticks <= 500);
        assert_eq!(outcome.history.history().len() as u64, summary.ticks);
        assert!((0.0..=100.0).contains(&summary.pct_happy));
        if summary.converged {
            assert!(outcome.history.unhappy_delta().unwrap() < 0.1);
        }
    }

    #[test]
    fn test_zero_tick_limit_runs_nothing() {
        let mut config = small(1);
        config.run.max_ticks = 0;
        let outcome = run_simulation(&config).unwrap();
        assert_eq!(outcome.summary.ticks, 0);
        assert!(!outcome.summary.converged);
        assert_eq!(outcome.summary.pct_happy, 100.0);
    }

    #[test]
    fn test_custom_stop_condition() {
        let config = small(3);
        let mut sim = Simulation::initialize(config.model.clone(), 3).unwrap();
        let outcome = run_until(&mut sim, 100, |h| h.history().len() == 4).unwrap();
        assert_eq!(outcome.summary.ticks, 4);
        assert!(outcome.summary.converged);
    }

    #[test]
    fn test_same_seed_same_summary() {
        let a = run_simulation(&small(9)).unwrap().summary;
        let b = run_simulation(&small(9)).unwrap().summary;
        assert_eq!(a, b);
    }

    #[test]
    fn test_summary_serializes() {
        let outcome = run_simulation(&small(5)).unwrap();
        let json = serde_json::to_value(&outcome.summary).unwrap();
        assert!(json.get("pct_happy").is_some());
        assert!(json["network"]["mean_degree"].as_f64().unwrap() > 1.0);
    }
}
