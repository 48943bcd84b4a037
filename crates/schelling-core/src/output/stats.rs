//! Statistics Output
//!
//! Scalar metrics read between ticks, and a per-run history of them.

use serde::Serialize;

use crate::components::agent::Opinion;
use crate::components::population::Population;

/// Percentage of occupied cells whose agent was unhappy this tick
pub fn unhappy_percentage(unhappy_count: usize, occupied: usize) -> f64 {
    if occupied == 0 {
        return 0.0;
    }
    100.0 * unhappy_count as f64 / occupied as f64
}

/// Average same-race share of each agent's neighborhood, as a percentage.
///
/// For each occupied cell the block is the agent plus its occupied neighbors;
/// the ratio is `(same-race count in block - 1) / (block size - 1)`, which
/// takes the center agent back out. Cells with no occupied neighbors have no
/// ratio and are left out of the average. Returns `None` when no cell has one.
pub fn sameness_percentage(population: &Population) -> Option<f64> {
    let mut total = 0.0;
    let mut counted = 0usize;

    for agent in population.agents() {
        let neighbors = population.neighbors_of(population.position(agent.id()));
        let block_size = neighbors.len() + 1;
        if block_size == 1 {
            continue;
        }
        let same_in_block = 1 + neighbors
            .iter()
            .filter(|&&n| population.agent(n).race() == agent.race())
            .count();
        total += (same_in_block - 1) as f64 / (block_size - 1) as f64;
        counted += 1;
    }

    (counted > 0).then(|| 100.0 * total / counted as f64)
}

/// Fraction of agents currently holding no preference
pub fn no_preference_fraction(population: &Population) -> f64 {
    if population.is_empty() {
        return 0.0;
    }
    let indifferent = population
        .agents()
        .iter()
        .filter(|a| a.opinion == Opinion::NoPreference)
        .count();
    indifferent as f64 / population.len() as f64
}

/// Metrics for a single tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickStats {
    pub tick: u64,
    pub unhappy_count: usize,
    pub idle_moves: usize,
    pub unhappy_percentage: f64,
    pub sameness_percentage: Option<f64>,
    pub no_preference_fraction: f64,
}

/// Degree statistics of the friend network; every degree includes the self-loop
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkStats {
    pub agents: usize,
    /// Undirected edges between distinct agents
    pub edges: usize,
    pub min_degree: usize,
    pub max_degree: usize,
    pub mean_degree: f64,
}

impl NetworkStats {
    pub fn from_population(population: &Population) -> Self {
        let degrees: Vec<usize> = population.agents().iter().map(|a| a.degree()).collect();
        let degree_sum: usize = degrees.iter().sum();
        let agents = degrees.len();
        Self {
            agents,
            edges: degree_sum.saturating_sub(agents) / 2,
            min_degree: degrees.iter().copied().min().unwrap_or(0),
            max_degree: degrees.iter().copied().max().unwrap_or(0),
            mean_degree: if agents > 0 {
                degree_sum as f64 / agents as f64
            } else {
                0.0
            },
        }
    }
}

/// Accumulates tick statistics over a run
#[derive(Debug, Clone, Default)]
pub struct StatsCollector {
    history: Vec<TickStats>,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, stats: TickStats) {
        self.history.push(stats);
    }

    pub fn history(&self) -> &[TickStats] {
        &self.history
    }

    pub fn last(&self) -> Option<&TickStats> {
        self.history.last()
    }

    /// Absolute change in unhappy percentage over the last recorded tick.
    ///
    /// Before the first tick the previous value counts as 100%.
    pub fn unhappy_delta(&self) -> Option<f64> {
        let last = self.history.last()?;
        let previous = match self.history.len() {
            1 => 100.0,
            n => self.history[n - 2].unhappy_percentage,
        };
        Some((previous - last.unhappy_percentage).abs())
    }
}
