use super::*;

/// Reduces many fitness samples collected for the same individual into one aggregate.
pub trait FitnessAggregator: Send + Sync {
    /// Aggregates samples. Returns `None` when there is nothing to aggregate.
    fn aggregate(&self, samples: &[Fitness]) -> GenericResult<Option<Fitness>>;
}

/// Aggregates samples into their arithmetic mean.
#[derive(Clone, Copy, Debug, Default)]
pub struct MeanAggregator;

impl FitnessAggregator for MeanAggregator {
    fn aggregate(&self, samples: &[Fitness]) -> GenericResult<Option<Fitness>> {
        let Some((first, rest)) = samples.split_first() else {
            return Ok(None);
        };

        rest.iter().try_fold(*first, |acc, sample| acc.combine(sample)).map(Some)
    }
}

/// Aggregates samples by keeping the best one.
#[derive(Clone, Copy, Debug, Default)]
pub struct BestAggregator;

impl FitnessAggregator for BestAggregator {
    fn aggregate(&self, samples: &[Fitness]) -> GenericResult<Option<Fitness>> {
        samples.iter().max_by(|a, b| a.total_order(b)).map(|best| Fitness::new(best.value())).transpose()
    }
}

/// Aggregates samples by keeping the worst one.
#[derive(Clone, Copy, Debug, Default)]
pub struct WorstAggregator;

impl FitnessAggregator for WorstAggregator {
    fn aggregate(&self, samples: &[Fitness]) -> GenericResult<Option<Fitness>> {
        samples.iter().min_by(|a, b| a.total_order(b)).map(|worst| Fitness::new(worst.value())).transpose()
    }
}
