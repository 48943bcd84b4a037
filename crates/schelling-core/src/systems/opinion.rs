//! Opinion System
//!
//! Two-state Boltzmann update driven by each agent's friend network.
//!
//! With `n0` of `N` friends holding no preference, the weight of each state is
//! `exp(±h/T) * (n_i / N)^(1/T)` and the new opinion is drawn from the
//! normalized weights.

use rand::Rng;

use crate::components::agent::{AgentId, Opinion};
use crate::components::population::Population;

/// Probability of adopting `NoPreference` given `n0` of `n` like-minded friends.
///
/// Evaluated as a logistic of the log-weight difference, which is the same
/// quantity as `w0 / (w0 + w1)` without overflowing for large `|h/T|`.
pub fn no_preference_probability(n0: usize, n: usize, h_over_t: f64, temperature: f64) -> f64 {
    debug_assert!(n > 0 && n0 <= n);
    if n0 == 0 {
        return 0.0;
    }
    if n0 == n {
        return 1.0;
    }

    let inv_t = 1.0 / temperature;
    let n = n as f64;
    let log_w0 = h_over_t + inv_t * (n0 as f64 / n).ln();
    let log_w1 = -h_over_t + inv_t * ((n - n0 as f64) / n).ln();
    1.0 / (1.0 + (log_w1 - log_w0).exp())
}

/// Social force and temperature, with `h/T` precomputed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpinionModel {
    temperature: f64,
    h_over_t: f64,
}

impl OpinionModel {
    pub fn new(social_force: f64, social_temperature: f64) -> Self {
        Self {
            temperature: social_temperature,
            h_over_t: social_force / social_temperature,
        }
    }

    pub fn h_over_t(&self) -> f64 {
        self.h_over_t
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn no_preference_probability(&self, n0: usize, n: usize) -> f64 {
        no_preference_probability(n0, n, self.h_over_t, self.temperature)
    }

    /// One Bernoulli draw against [`Self::no_preference_probability`]
    pub fn sample<R: Rng + ?Sized>(&self, n0: usize, n: usize, rng: &mut R) -> Opinion {
        let p = self.no_preference_probability(n0, n);
        if rng.gen::<f64>() < p {
            Opinion::NoPreference
        } else {
            Opinion::SchellingPref
        }
    }
}

/// Redraw every agent's opinion from its friends' opinions at the start of the phase.
///
/// Agents are visited in handle order, one draw each. Returns how many agents
/// hold no preference afterwards.
pub fn update_opinions<R: Rng + ?Sized>(
    population: &mut Population,
    model: &OpinionModel,
    rng: &mut R,
) -> usize {
    let snapshot: Vec<Opinion> = population.agents().iter().map(|a| a.opinion).collect();
    let mut no_preference = 0;

    for i in 0..population.len() {
        let id = AgentId(i);
        let friends = population.agent(id).friends();
        let n = friends.len();
        let n0 = friends
            .iter()
            .filter(|f| snapshot[f.0] == Opinion::NoPreference)
            .count();

        let opinion = model.sample(n0, n, rng);
        if opinion == Opinion::NoPreference {
            no_preference += 1;
        }
        population.agent_mut(id).opinion = opinion;
    }

    no_preference
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::agent::Agent;
    use crate::components::lattice::{Coord, Lattice};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    /// Direct evaluation of the partition function
    fn closed_form(n0: usize, n: usize, h_over_t: f64, temperature: f64) -> f64 {
        let inv_t = 1.0 / temperature;
        let w0 = h_over_t.exp() * (n0 as f64 / n as f64).powf(inv_t);
        let w1 = (-h_over_t).exp() * ((n - n0) as f64 / n as f64).powf(inv_t);
        w0 / (w0 + w1)
    }

    #[test]
    fn test_zero_force_unit_temperature_is_fraction() {
        let model = OpinionModel::new(0.0, 1.0);
        assert_eq!(model.no_preference_probability(3, 6), 0.5);
        for (n0, n) in [(1, 4), (2, 3), (5, 7), (1, 10), (9, 10)] {
            let p = model.no_preference_probability(n0, n);
            assert!((p - n0 as f64 / n as f64).abs() < 1e-12, "({n0},{n}) -> {p}");
        }
    }

    #[test]
    fn test_matches_partition_function() {
        for &(force, temp) in &[(0.5, 1.0), (-1.0, 2.0), (2.0, 0.5), (0.0, 3.0)] {
            let model = OpinionModel::new(force, temp);
            for (n0, n) in [(1, 4), (2, 3), (3, 6), (6, 7)] {
                let expected = closed_form(n0, n, force / temp, temp);
                let p = model.no_preference_probability(n0, n);
                assert!((p - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_unanimous_networks_are_certain() {
        let model = OpinionModel::new(5.0, 0.3);
        assert_eq!(model.no_preference_probability(0, 4), 0.0);
        assert_eq!(model.no_preference_probability(4, 4), 1.0);
    }

    #[test]
    fn test_positive_force_favours_no_preference() {
        let neutral = OpinionModel::new(0.0, 1.0);
        let pushed = OpinionModel::new(1.0, 1.0);
        assert!(pushed.no_preference_probability(2, 4) > neutral.no_preference_probability(2, 4));
    }

    #[test]
    fn test_extreme_force_does_not_overflow() {
        let model = OpinionModel::new(1000.0, 0.5);
        let p = model.no_preference_probability(1, 100);
        assert!(p.is_finite());
        assert!((p - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_h_over_t_precomputed() {
        let model = OpinionModel::new(3.0, 2.0);
        assert_eq!(model.h_over_t(), 1.5);
        assert_eq!(model.temperature(), 2.0);
    }

    #[test]
    fn test_update_reads_pre_phase_opinions() {
        // Chain 0 - 1 - 2 with only agent 0 holding no preference. A huge social
        // force makes any no-preference friend decisive, so 1 flips this phase.
        // Agent 2 must still see 1 as it was when the phase started.
        let lattice = Lattice::new(3);
        let agents = vec![
            Agent::new(AgentId(0), 0, Opinion::NoPreference),
            Agent::new(AgentId(1), 1, Opinion::SchellingPref),
            Agent::new(AgentId(2), 0, Opinion::SchellingPref),
        ];
        let positions = vec![Coord::new(0, 0), Coord::new(0, 1), Coord::new(0, 2)];
        let vacancies = lattice.coords().filter(|c| !positions.contains(c)).collect();
        let mut pop = Population::assemble(lattice, agents, positions, vacancies).unwrap();
        pop.connect(AgentId(0), AgentId(1));
        pop.connect(AgentId(1), AgentId(2));

        let model = OpinionModel::new(1000.0, 1.0);
        let mut rng = SmallRng::seed_from_u64(11);
        let count = update_opinions(&mut pop, &model, &mut rng);

        assert_eq!(count, 2);
        assert_eq!(pop.agent(AgentId(0)).opinion, Opinion::NoPreference);
        assert_eq!(pop.agent(AgentId(1)).opinion, Opinion::NoPreference);
        assert_eq!(pop.agent(AgentId(2)).opinion, Opinion::SchellingPref);

        // Next phase the change has propagated
        update_opinions(&mut pop, &model, &mut rng);
        assert_eq!(pop.agent(AgentId(2)).opinion, Opinion::NoPreference);
    }

    #[test]
    fn test_update_counts_no_preference() {
        let lattice = Lattice::new(2);
        let agents = vec![
            Agent::new(AgentId(0), 0, Opinion::NoPreference),
            Agent::new(AgentId(1), 1, Opinion::NoPreference),
        ];
        let positions = vec![Coord::new(0, 0), Coord::new(1, 1)];
        let vacancies = vec![Coord::new(0, 1), Coord::new(1, 0)];
        let mut pop = Population::assemble(lattice, agents, positions, vacancies).unwrap();

        let mut rng = SmallRng::seed_from_u64(3);
        let count = update_opinions(&mut pop, &OpinionModel::new(0.0, 1.0), &mut rng);
        assert_eq!(count, 2);
    }
}
