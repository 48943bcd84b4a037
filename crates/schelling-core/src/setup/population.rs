//! Population Setup
//!
//! Places agents on shuffled cells and grows the friend network by
//! preferential attachment.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::components::agent::{Agent, AgentId, Opinion};
use crate::components::lattice::{Coord, Lattice};
use crate::components::population::Population;
use crate::config::{ModelConfig, MINIMUM_FRIENDS};
use crate::error::Result;

use super::sampler::WeightedSampler;

/// Initial opinion: no preference with probability `split`
fn initial_opinion<R: Rng + ?Sized>(split: f64, rng: &mut R) -> Opinion {
    if rng.gen::<f64>() < split {
        Opinion::NoPreference
    } else {
        Opinion::SchellingPref
    }
}

/// Build the initial population, network, and vacancy pool.
///
/// Races are created in order, `agents_per_race` each. Every new agent links
/// to up to [`MINIMUM_FRIENDS`] distinct earlier agents chosen with
/// probability proportional to their degree, then takes the next shuffled
/// cell. Cells left over become the vacancy pool.
pub fn build_population<R: Rng + ?Sized>(config: &ModelConfig, rng: &mut R) -> Result<Population> {
    config.validate()?;

    let lattice = Lattice::new(config.grid_size);
    let mut slots: Vec<Coord> = lattice.coords().collect();
    slots.shuffle(rng);

    let per_race = config.agents_per_race();
    let total = per_race * config.num_races;
    let mut agents: Vec<Agent> = Vec::with_capacity(total);

    for race in 0..config.num_races {
        for _ in 0..per_race {
            let id = AgentId(agents.len());
            let mut agent = Agent::new(id, race, initial_opinion(config.initial_opinion_split, rng));

            let mut sampler = WeightedSampler::new(agents.iter().map(|a| (a.id(), a.degree())));
            for friend in sampler.draw_many(MINIMUM_FRIENDS, rng)? {
                agent.add_friend(friend);
                agents[friend.0].add_friend(id);
            }
            agents.push(agent);
        }
    }

    let vacancies = slots.split_off(total);
    let population = Population::assemble(lattice, agents, slots, vacancies)?;

    tracing::info!(
        agents = population.len(),
        vacancies = population.vacancies().len(),
        grid_size = config.grid_size,
        "Built population"
    );
    Ok(population)
}
