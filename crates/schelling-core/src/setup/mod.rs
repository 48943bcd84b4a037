//! World Setup
//!
//! Agent placement and social-network construction.

pub mod population;
pub mod sampler;

pub use population::build_population;
pub use sampler::{sample_index, WeightedSampler};
