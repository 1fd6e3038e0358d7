use super::*;

/// A termination criteria which is in terminated state when the best fitness in any
/// population reaches the target value.
pub struct TargetFitness {
    target: Float,
}

impl TargetFitness {
    /// Creates a new instance of `TargetFitness`.
    pub fn new(target: Float) -> Self {
        Self { target }
    }

    fn best(statistics: &GenerationStatistics) -> Option<Float> {
        statistics.populations.iter().filter_map(|summary| summary.best).max_by(compare_floats_refs)
    }
}

impl Termination for TargetFitness {
    fn is_termination(&self, statistics: &GenerationStatistics) -> bool {
        Self::best(statistics).is_some_and(|best| best >= self.target)
    }
}
