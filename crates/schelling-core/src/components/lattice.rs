//! Lattice
//!
//! Toroidal coordinates and Moore-neighborhood enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::agent::AgentId;

/// Offsets of the eight Moore neighbors, center excluded
const MOORE_OFFSETS: [(i64, i64); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// A cell on the torus, always normalized into `[0, size)` on both axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

impl Coord {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Square toroidal grid of `size * size` cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lattice {
    size: usize,
}

impl Lattice {
    pub fn new(size: usize) -> Self {
        Self { size }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cell_count(&self) -> usize {
        self.size * self.size
    }

    /// Wrap arbitrary integer coordinates onto the torus
    pub fn wrap(&self, x: i64, y: i64) -> Coord {
        let n = self.size as i64;
        Coord::new(x.rem_euclid(n) as usize, y.rem_euclid(n) as usize)
    }

    /// Row-major index of a coordinate, for flat cell storage
    pub fn index(&self, coord: Coord) -> usize {
        coord.x * self.size + coord.y
    }

    /// Every coordinate, `x` outer and `y` inner
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.size).flat_map(move |x| (0..self.size).map(move |y| Coord::new(x, y)))
    }

    /// The wrapped Moore neighbors of `coord` in a fixed order.
    ///
    /// On grids smaller than 3 the offsets alias: positions that wrap back onto
    /// `coord` itself are dropped, repeated positions are kept.
    pub fn neighbor_coords(&self, coord: Coord) -> Vec<Coord> {
        let (x0, y0) = (coord.x as i64, coord.y as i64);
        MOORE_OFFSETS
            .iter()
            .map(|&(dx, dy)| self.wrap(x0 + dx, y0 + dy))
            .filter(|&c| c != coord)
            .collect()
    }

    /// Agents occupying the Moore neighbors of `coord`.
    ///
    /// `cells` is the flat occupancy table indexed by [`Lattice::index`].
    pub fn neighbors_of(&self, coord: Coord, cells: &[Option<AgentId>]) -> Vec<AgentId> {
        self.neighbor_coords(coord)
            .into_iter()
            .filter_map(|c| cells[self.index(c)])
            .collect()
    }
}
