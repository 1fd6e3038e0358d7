#[cfg(test)]
#[path = "../../tests/unit/breeding/multiplexer_test.rs"]
mod multiplexer_test;

use super::*;
use crate::utils::{Float, Runtime};

/// Delegates every offspring request to one of several sub-pipelines picked with probability
/// proportional to its weight.
pub struct WeightedMultiplexer<G: Genome> {
    runtime: Arc<Runtime>,
    branches: Vec<DynBreedingNode<G>>,
    /// Cumulative weights, strictly increasing.
    cumulative: Vec<Float>,
}

impl<G: Genome> WeightedMultiplexer<G> {
    /// Creates a new instance of `WeightedMultiplexer` from sub-pipelines with their weights.
    pub fn new(runtime: Arc<Runtime>, branches: Vec<(DynBreedingNode<G>, Float)>) -> GenericResult<Self> {
        if branches.is_empty() {
            return Err("weighted multiplexer requires at least one sub-pipeline".into());
        }

        if let Some((_, weight)) = branches.iter().find(|(_, weight)| !(weight.is_finite() && *weight > 0.)) {
            return Err(format!("sub-pipeline weight must be positive and finite, got: {weight}").into());
        }

        let (branches, cumulative) = branches
            .into_iter()
            .scan(0., |total, (branch, weight)| {
                *total += weight;
                Some((branch, *total))
            })
            .unzip();

        Ok(Self { runtime, branches, cumulative })
    }

    /// Returns amount of sub-pipelines.
    pub fn size(&self) -> usize {
        self.branches.len()
    }

    fn select_branch(&self) -> usize {
        let total = self.cumulative.last().copied().unwrap_or_default();
        let draw = self.runtime.random.uniform_real(0., total);

        self.cumulative.partition_point(|key| *key < draw).min(self.cumulative.len() - 1)
    }
}

impl<G: Genome> BreedingNode<G> for WeightedMultiplexer<G> {
    fn prime_for_generation(&mut self, source: &SourcePopulation<G>) -> GenericResult<()> {
        self.branches.iter_mut().try_for_each(|branch| branch.prime_for_generation(source))
    }

    fn next_offspring(&mut self) -> GenericResult<Individual<G>> {
        let index = self.select_branch();
        self.branches[index].next_offspring()
    }

    fn queued(&self) -> usize {
        self.branches.iter().map(|branch| branch.queued()).sum()
    }
}
