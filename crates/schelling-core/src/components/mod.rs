//! Components
//!
//! Grid geometry, agents, and the population that places them on the grid.

pub mod agent;
pub mod lattice;
pub mod population;

pub use agent::*;
pub use lattice::*;
pub use population::*;
