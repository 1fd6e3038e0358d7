use super::*;

/// A termination criteria which is in terminated state when maximum amount of generations is run.
pub struct MaxGeneration {
    limit: usize,
}

impl MaxGeneration {
    /// Creates a new instance of `MaxGeneration`.
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }
}

impl Termination for MaxGeneration {
    fn is_termination(&self, statistics: &GenerationStatistics) -> bool {
        statistics.generation + 1 >= self.limit
    }
}
