//! Population
//!
//! Agent arena, cell occupancy, and the vacancy pool.
//!
//! Every cell is either occupied by exactly one agent or listed once in the
//! vacancy pool. Relocation is the only operation that touches both, and it
//! keeps the two in step.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::VecDeque;

use super::agent::{Agent, AgentId};
use super::lattice::{Coord, Lattice};
use crate::error::{Result, SimError};

#[derive(Debug, Clone)]
pub struct Population {
    lattice: Lattice,
    agents: Vec<Agent>,
    positions: Vec<Coord>,
    cells: Vec<Option<AgentId>>,
    vacancies: VecDeque<Coord>,
}

impl Population {
    /// Assemble a population from placed agents and the leftover cells.
    ///
    /// `positions[i]` is the cell of `agents[i]`. Fails if the placement and
    /// the vacancy list do not partition the grid.
    pub fn assemble(
        lattice: Lattice,
        agents: Vec<Agent>,
        positions: Vec<Coord>,
        vacancies: Vec<Coord>,
    ) -> Result<Self> {
        if agents.len() != positions.len() {
            return Err(SimError::PartitionBroken(format!(
                "{} agents but {} positions",
                agents.len(),
                positions.len()
            )));
        }

        let mut cells = vec![None; lattice.cell_count()];
        for (agent, &coord) in agents.iter().zip(&positions) {
            let slot = &mut cells[lattice.index(coord)];
            if slot.is_some() {
                return Err(SimError::PartitionBroken(format!(
                    "cell {coord} assigned twice"
                )));
            }
            *slot = Some(agent.id());
        }

        let population = Self {
            lattice,
            agents,
            positions,
            cells,
            vacancies: vacancies.into(),
        };
        population.check_partition()?;
        Ok(population)
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent(&self, id: AgentId) -> &Agent {
        &self.agents[id.0]
    }

    pub fn agent_mut(&mut self, id: AgentId) -> &mut Agent {
        &mut self.agents[id.0]
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Number of occupied cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn position(&self, id: AgentId) -> Coord {
        self.positions[id.0]
    }

    pub fn agent_at(&self, coord: Coord) -> Option<AgentId> {
        self.cells[self.lattice.index(coord)]
    }

    /// Flat occupancy table, indexed by [`Lattice::index`]
    pub fn cells(&self) -> &[Option<AgentId>] {
        &self.cells
    }

    /// Occupied coordinates in row-major order
    pub fn occupied_coords(&self) -> Vec<Coord> {
        self.lattice
            .coords()
            .filter(|&c| self.agent_at(c).is_some())
            .collect()
    }

    pub fn vacancies(&self) -> &VecDeque<Coord> {
        &self.vacancies
    }

    /// Agents in the Moore neighborhood of `coord`, center excluded
    pub fn neighbors_of(&self, coord: Coord) -> Vec<AgentId> {
        self.lattice.neighbors_of(coord, &self.cells)
    }

    /// Add an undirected edge between two agents
    #[cfg(test)]
    pub(crate) fn connect(&mut self, a: AgentId, b: AgentId) {
        self.agents[a.0].add_friend(b);
        self.agents[b.0].add_friend(a);
    }

    pub fn shuffle_vacancies<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.vacancies.make_contiguous().shuffle(rng);
    }

    /// Relocate the agent at `from` to the head of the vacancy pool.
    ///
    /// The vacated cell goes to the back of the pool. Returns the destination.
    pub fn move_agent_at(&mut self, from: Coord) -> Result<Coord> {
        let from_idx = self.lattice.index(from);
        let id = self.cells[from_idx].ok_or(SimError::SourceVacant(from))?;
        let to = *self
            .vacancies
            .front()
            .ok_or(SimError::VacancyPoolExhausted(from))?;
        let to_idx = self.lattice.index(to);
        if self.cells[to_idx].is_some() {
            return Err(SimError::DestinationOccupied(to));
        }
        self.vacancies.pop_front();

        self.cells[from_idx] = None;
        self.cells[to_idx] = Some(id);
        self.positions[id.0] = to;
        self.vacancies.push_back(from);

        tracing::trace!(agent = id.0, %from, %to, "relocated");
        Ok(to)
    }

    /// Verify that occupied cells and the vacancy pool partition the grid
    pub fn check_partition(&self) -> Result<()> {
        let mut seen = vec![false; self.lattice.cell_count()];

        for (i, &coord) in self.positions.iter().enumerate() {
            let idx = self.lattice.index(coord);
            if self.cells[idx] != Some(AgentId(i)) {
                return Err(SimError::PartitionBroken(format!(
                    "agent {i} believes it is at {coord} but the cell disagrees"
                )));
            }
            seen[idx] = true;
        }

        for &coord in &self.vacancies {
            let idx = self.lattice.index(coord);
            if seen[idx] {
                return Err(SimError::PartitionBroken(format!(
                    "cell {coord} is both occupied and vacant, or listed twice"
                )));
            }
            seen[idx] = true;
        }

        if let Some(idx) = seen.iter().position(|s| !s) {
            let size = self.lattice.size();
            return Err(SimError::PartitionBroken(format!(
                "cell {} is neither occupied nor vacant",
                Coord::new(idx / size, idx % size)
            )));
        }
        Ok(())
    }
}
