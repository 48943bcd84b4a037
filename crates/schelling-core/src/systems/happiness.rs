//! Happiness System
//!
//! Unhappiness rules and the mandatory relocation of unhappy agents.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::components::agent::{AgentId, Opinion, Race};
use crate::components::population::Population;
use crate::error::Result;

/// Which neighborhood compositions make a `SchellingPref` agent unhappy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnhappinessRule {
    /// Unhappy when its own race is the strictly smallest of the races present.
    /// A tie for the smallest count is happy.
    #[default]
    Minority,
    /// Unhappy when another race holds a strict majority of the block.
    /// Ties for the largest count go to the lowest race index.
    Dominated,
}

impl UnhappinessRule {
    /// Decide from a per-race tally of the neighborhood block
    pub fn is_unhappy(&self, race: Race, tally: &[usize]) -> bool {
        match self {
            UnhappinessRule::Minority => {
                let own = tally[race];
                let smallest_other = tally
                    .iter()
                    .enumerate()
                    .filter(|&(r, &count)| r != race && count > 0)
                    .map(|(_, &count)| count)
                    .min();
                match smallest_other {
                    Some(other) => own > 0 && own < other,
                    None => false,
                }
            }
            UnhappinessRule::Dominated => {
                let total: usize = tally.iter().sum();
                let mut max_race = 0;
                for (r, &count) in tally.iter().enumerate() {
                    if count > tally[max_race] {
                        max_race = r;
                    }
                }
                max_race != race && 2 * tally[max_race] > total
            }
        }
    }
}

/// Per-race counts over the block: the agent itself plus its occupied Moore neighbors
pub fn block_tally(population: &Population, id: AgentId, num_races: usize) -> Vec<usize> {
    let mut tally = vec![0; num_races];
    tally[population.agent(id).race()] += 1;
    for neighbor in population.neighbors_of(population.position(id)) {
        tally[population.agent(neighbor).race()] += 1;
    }
    tally
}

/// Whether an agent wants to leave its current cell
pub fn is_unhappy(
    population: &Population,
    id: AgentId,
    rule: UnhappinessRule,
    num_races: usize,
) -> bool {
    let agent = population.agent(id);
    match agent.opinion {
        Opinion::NoPreference => false,
        Opinion::SchellingPref => {
            let tally = block_tally(population, id, num_races);
            rule.is_unhappy(agent.race(), &tally)
        }
    }
}

/// Visit occupied cells in a fresh random order and relocate every unhappy agent.
///
/// Marks relocated agents in `moved` and returns how many were unhappy.
pub fn relocate_unhappy<R: Rng + ?Sized>(
    population: &mut Population,
    rule: UnhappinessRule,
    num_races: usize,
    moved: &mut [bool],
    rng: &mut R,
) -> Result<usize> {
    let mut order = population.occupied_coords();
    order.shuffle(rng);
    let visit: Vec<AgentId> = order
        .into_iter()
        .filter_map(|c| population.agent_at(c))
        .collect();

    let mut unhappy = 0;
    for id in visit {
        if is_unhappy(population, id, rule, num_races) {
            population.move_agent_at(population.position(id))?;
            moved[id.0] = true;
            unhappy += 1;
        }
    }
    Ok(unhappy)
}
