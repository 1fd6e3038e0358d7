#[cfg(test)]
#[path = "../../../tests/unit/breeding/selection/random_test.rs"]
mod random_test;

use super::*;
use crate::utils::Runtime;

/// Selects a copy of a uniformly random individual, keeps no state between calls.
pub struct RandomSelector<G: Genome> {
    runtime: Arc<Runtime>,
    source: Option<SourcePopulation<G>>,
}

impl<G: Genome> RandomSelector<G> {
    /// Creates a new instance of `RandomSelector`.
    pub fn new(runtime: Arc<Runtime>) -> Self {
        Self { runtime, source: None }
    }
}

impl<G: Genome> BreedingNode<G> for RandomSelector<G> {
    fn prime_for_generation(&mut self, source: &SourcePopulation<G>) -> GenericResult<()> {
        self.source = Some(source.clone());
        Ok(())
    }

    fn next_offspring(&mut self) -> GenericResult<Individual<G>> {
        let source = get_source(&self.source)?;
        let index = self.runtime.random_index(source.len());

        Ok(source[index].offspring())
    }
}
