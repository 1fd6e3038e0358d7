//! The termination module contains logic which defines when to stop the generation loop.

#[cfg(test)]
#[path = "../../tests/unit/termination/termination_test.rs"]
mod termination_test;

use crate::environment::GenerationStatistics;
use crate::utils::{compare_floats_refs, Float};

/// A trait which specifies criteria when evolution should stop.
pub trait Termination: Send + Sync {
    /// Returns true if termination condition is met after the generation with given statistics.
    fn is_termination(&self, statistics: &GenerationStatistics) -> bool;
}

mod max_generation;
pub use self::max_generation::MaxGeneration;

mod max_time;
pub use self::max_time::MaxTime;

mod target_fitness;
pub use self::target_fitness::TargetFitness;

/// Encapsulates multiple termination criteria: terminates when any of them does.
pub struct CompositeTermination {
    terminations: Vec<Box<dyn Termination>>,
}

impl CompositeTermination {
    /// Creates a new instance of `CompositeTermination`.
    pub fn new(terminations: Vec<Box<dyn Termination>>) -> Self {
        Self { terminations }
    }
}

impl Termination for CompositeTermination {
    fn is_termination(&self, statistics: &GenerationStatistics) -> bool {
        self.terminations.iter().any(|t| t.is_termination(statistics))
    }
}
