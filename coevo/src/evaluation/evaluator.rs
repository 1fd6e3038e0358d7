#[cfg(test)]
#[path = "../../tests/unit/evaluation/evaluator_test.rs"]
mod evaluator_test;

use super::*;
use crate::utils::{parallel_into_collect, ThreadPool};

/// Runs evaluation groups and returns them evaluated. Result order is not significant.
pub trait Evaluator<G: Genome>: Send + Sync {
    /// Runs all groups.
    fn evaluate<'a>(&self, groups: Vec<EvaluationGroup<'a, G>>) -> GenericResult<Vec<EvaluationGroup<'a, G>>>;
}

/// Runs groups one by one on the calling thread.
#[derive(Default)]
pub struct SequentialEvaluator {
    max_steps: Option<usize>,
}

impl SequentialEvaluator {
    /// Creates a new instance of `SequentialEvaluator`. Model runs are bounded by `max_steps`
    /// in addition to model's own termination condition.
    pub fn new(max_steps: Option<usize>) -> Self {
        Self { max_steps }
    }
}

impl<G: Genome> Evaluator<G> for SequentialEvaluator {
    fn evaluate<'a>(&self, groups: Vec<EvaluationGroup<'a, G>>) -> GenericResult<Vec<EvaluationGroup<'a, G>>> {
        groups
            .into_iter()
            .map(|mut group| {
                group.run(self.max_steps)?;
                Ok(group)
            })
            .collect()
    }
}

/// Runs groups concurrently: every group owns its model, so no state is shared between runs.
#[derive(Default)]
pub struct ParallelEvaluator {
    max_steps: Option<usize>,
    pool: Option<ThreadPool>,
}

impl ParallelEvaluator {
    /// Creates a new instance of `ParallelEvaluator` which uses rayon's global pool.
    pub fn new(max_steps: Option<usize>) -> Self {
        Self { max_steps, pool: None }
    }

    /// Creates a new instance of `ParallelEvaluator` which uses its own pool of given size.
    pub fn new_with_threads(max_steps: Option<usize>, num_threads: usize) -> GenericResult<Self> {
        Ok(Self { max_steps, pool: Some(ThreadPool::new(num_threads)?) })
    }

    fn run_all<'a, G: Genome>(
        &self,
        groups: Vec<EvaluationGroup<'a, G>>,
    ) -> GenericResult<Vec<EvaluationGroup<'a, G>>> {
        parallel_into_collect(groups, |mut group| group.run(self.max_steps).map(|_| group)).into_iter().collect()
    }
}

impl<G: Genome> Evaluator<G> for ParallelEvaluator {
    fn evaluate<'a>(&self, groups: Vec<EvaluationGroup<'a, G>>) -> GenericResult<Vec<EvaluationGroup<'a, G>>> {
        match &self.pool {
            Some(pool) => pool.execute(|| self.run_all(groups)),
            None => self.run_all(groups),
        }
    }
}
