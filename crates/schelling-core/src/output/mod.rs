//! Output
//!
//! Metrics derived from simulation state.

pub mod stats;

pub use stats::*;
