//! Weighted Sampling
//!
//! Degree-proportional selection without replacement, for preferential attachment.

use rand::distributions::{Distribution, WeightedError, WeightedIndex};
use rand::Rng;

use crate::components::agent::AgentId;

/// Draw an index with probability proportional to its weight (inverse CDF)
pub fn sample_index<R: Rng + ?Sized>(weights: &[usize], rng: &mut R) -> Result<usize, WeightedError> {
    let cdf: WeightedIndex<usize> = WeightedIndex::new(weights)?;
    Ok(cdf.sample(rng))
}

/// A shrinking pool of weighted candidates
#[derive(Debug, Clone, Default)]
pub struct WeightedSampler {
    candidates: Vec<AgentId>,
    weights: Vec<usize>,
}

impl WeightedSampler {
    pub fn new(pool: impl IntoIterator<Item = (AgentId, usize)>) -> Self {
        let (candidates, weights) = pool.into_iter().unzip();
        Self {
            candidates,
            weights,
        }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Remove and return one candidate, weighted by its current weight.
    ///
    /// Returns `Ok(None)` once the pool is exhausted. The remaining
    /// candidates keep their relative order.
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Option<AgentId>, WeightedError> {
        if self.candidates.is_empty() {
            return Ok(None);
        }
        let idx = sample_index(&self.weights, rng)?;
        self.weights.remove(idx);
        Ok(Some(self.candidates.remove(idx)))
    }

    /// Draw up to `k` distinct candidates
    pub fn draw_many<R: Rng + ?Sized>(
        &mut self,
        k: usize,
        rng: &mut R,
    ) -> Result<Vec<AgentId>, WeightedError> {
        let mut picked = Vec::with_capacity(k.min(self.len()));
        while picked.len() < k {
            match self.draw(rng)? {
                Some(id) => picked.push(id),
                None => break,
            }
        }
        Ok(picked)
    }
}
