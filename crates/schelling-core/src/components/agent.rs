//! Agent Components
//!
//! Per-cell residents: race, opinion, and their social-network edges.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Stable handle of an agent in the population arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub usize);

/// Race index in `[0, num_races)`
pub type Race = usize;

/// Binary opinion about neighborhood composition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Opinion {
    /// Indifferent to neighbors' race; never unhappy
    #[default]
    NoPreference,
    /// Follows the Schelling unhappiness rule
    SchellingPref,
}

/// A resident of the grid.
///
/// The friend set always contains the agent's own handle, so its degree
/// starts at 1 and the agent's own opinion takes part in its opinion update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    id: AgentId,
    race: Race,
    pub opinion: Opinion,
    friends: BTreeSet<AgentId>,
}

impl Agent {
    pub fn new(id: AgentId, race: Race, opinion: Opinion) -> Self {
        let mut friends = BTreeSet::new();
        friends.insert(id);
        Self {
            id,
            race,
            opinion,
            friends,
        }
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn race(&self) -> Race {
        self.race
    }

    pub fn friends(&self) -> &BTreeSet<AgentId> {
        &self.friends
    }

    /// Size of the friend set, self-loop included
    pub fn degree(&self) -> usize {
        self.friends.len()
    }

    pub fn is_friend(&self, other: AgentId) -> bool {
        self.friends.contains(&other)
    }

    /// Record one side of an undirected edge; returns false if it already existed
    pub(crate) fn add_friend(&mut self, other: AgentId) -> bool {
        self.friends.insert(other)
    }
}
