//! Movement System
//!
//! Voluntary relocation of satisfied agents (residential turnover).

use rand::Rng;

use crate::components::agent::AgentId;
use crate::components::population::Population;
use crate::error::Result;

/// Chance of at least one move event in a tick for a Poisson process of rate `move_rate`
pub fn idle_move_probability(move_rate: f64) -> f64 {
    1.0 - (-move_rate).exp()
}

/// Give every agent not yet moved this tick one chance to relocate anyway.
///
/// Agents are visited in handle order with one draw each; a draw above
/// `exp(-move_rate)` triggers a move. Returns the number of agents moved.
pub fn relocate_idle<R: Rng + ?Sized>(
    population: &mut Population,
    move_rate: f64,
    moved: &mut [bool],
    rng: &mut R,
) -> Result<usize> {
    let stay_probability = (-move_rate).exp();
    let mut relocated = 0;

    for i in 0..population.len() {
        if moved[i] {
            continue;
        }
        if rng.gen::<f64>() > stay_probability {
            population.move_agent_at(population.position(AgentId(i)))?;
            moved[i] = true;
            relocated += 1;
        }
    }
    Ok(relocated)
}
