#[cfg(test)]
#[path = "../../tests/unit/breeding/mutation_test.rs"]
mod mutation_test;

use super::*;
use crate::individual::Chromosome;
use crate::utils::{DistributionSampler, Float, Random, Runtime};
use std::ops::Range;

/// Produces a replacement value for a single gene.
pub trait GeneMutator<T>: Send + Sync {
    /// Returns a mutated gene value.
    fn mutate(&self, gene: &T, random: &(dyn Random + Send + Sync)) -> T;
}

/// A genome range bound to a mutator with its per position mutation probability.
pub struct MutationRange<T> {
    range: Range<usize>,
    probability: Float,
    mutator: Arc<dyn GeneMutator<T>>,
}

impl<T> MutationRange<T> {
    /// Creates a new instance of `MutationRange` for positions in `range`.
    pub fn new(range: Range<usize>, probability: Float, mutator: Arc<dyn GeneMutator<T>>) -> GenericResult<Self> {
        if range.is_empty() {
            return Err(format!("mutation range must not be empty, got: {range:?}").into());
        }
        check_probability("mutation", probability)?;

        Ok(Self { range, probability, mutator })
    }

    /// Returns genome positions covered by the range.
    pub fn range(&self) -> &Range<usize> {
        &self.range
    }
}

/// Mutates offspring produced upstream: every position covered by a configured range is
/// replaced by its mutator's output with the range probability, independently per position.
/// Positions outside of any range are left untouched.
pub struct MutationStage<G: Chromosome> {
    runtime: Arc<Runtime>,
    source: DynBreedingNode<G>,
    ranges: Vec<MutationRange<G::Gene>>,
}

impl<G: Chromosome> MutationStage<G> {
    /// Creates a new instance of `MutationStage`. Overlapping ranges are rejected.
    pub fn new(
        runtime: Arc<Runtime>,
        source: DynBreedingNode<G>,
        ranges: Vec<MutationRange<G::Gene>>,
    ) -> GenericResult<Self> {
        let mut ranges = ranges;
        ranges.sort_by_key(|mutation| mutation.range.start);

        if let Some(overlap) = ranges.windows(2).find(|pair| pair[0].range.end > pair[1].range.start) {
            return Err(format!("mutation ranges overlap: {:?} and {:?}", overlap[0].range, overlap[1].range).into());
        }

        Ok(Self { runtime, source, ranges })
    }

    fn mutate(&self, individual: &mut Individual<G>) -> GenericResult<()> {
        let genes = individual.genome_mut().genes_mut();
        let length = genes.len();

        if let Some(last) = self.ranges.last().filter(|mutation| mutation.range.end > length) {
            return Err(format!("mutation range {:?} exceeds genome length {length}", last.range).into());
        }

        let random = self.runtime.random.as_ref();
        self.ranges.iter().for_each(|mutation| {
            genes[mutation.range.clone()].iter_mut().filter(|_| random.is_hit(mutation.probability)).for_each(
                |gene| {
                    *gene = mutation.mutator.mutate(gene, random);
                },
            );
        });

        Ok(())
    }
}

impl<G: Chromosome> BreedingNode<G> for MutationStage<G> {
    fn prime_for_generation(&mut self, source: &SourcePopulation<G>) -> GenericResult<()> {
        self.source.prime_for_generation(source)
    }

    fn next_offspring(&mut self) -> GenericResult<Individual<G>> {
        let mut individual = self.source.next_offspring()?;
        self.mutate(&mut individual)?;

        Ok(individual)
    }

    fn queued(&self) -> usize {
        self.source.queued()
    }
}

/// Perturbs a gene with a normally distributed noise, optionally clamping it to bounds.
pub struct GaussianMutator {
    std_dev: Float,
    bounds: Option<(Float, Float)>,
}

impl GaussianMutator {
    /// Creates a new instance of `GaussianMutator`.
    pub fn new(std_dev: Float, bounds: Option<(Float, Float)>) -> GenericResult<Self> {
        if !(std_dev.is_finite() && std_dev >= 0.) {
            return Err(format!("standard deviation must be non-negative, got: {std_dev}").into());
        }
        check_bounds(bounds)?;

        Ok(Self { std_dev, bounds })
    }
}

impl GeneMutator<Float> for GaussianMutator {
    fn mutate(&self, gene: &Float, random: &(dyn Random + Send + Sync)) -> Float {
        let value = if self.std_dev > 0. { *gene + random.normal(0., self.std_dev) } else { *gene };

        self.bounds.map_or(value, |(min, max)| value.clamp(min, max))
    }
}

/// Moves a gene by a uniformly distributed step within `[-step, step]`, staying within bounds.
pub struct RandomWalkMutator {
    step: Float,
    bounds: (Float, Float),
}

impl RandomWalkMutator {
    /// Creates a new instance of `RandomWalkMutator`.
    pub fn new(step: Float, bounds: (Float, Float)) -> GenericResult<Self> {
        if !(step.is_finite() && step > 0.) {
            return Err(format!("random walk step must be positive, got: {step}").into());
        }
        check_bounds(Some(bounds))?;

        Ok(Self { step, bounds })
    }
}

impl GeneMutator<Float> for RandomWalkMutator {
    fn mutate(&self, gene: &Float, random: &(dyn Random + Send + Sync)) -> Float {
        let (min, max) = self.bounds;

        (*gene + random.uniform_real(-self.step, self.step)).clamp(min, max)
    }
}

/// Replaces a gene with a uniformly distributed value within bounds.
pub struct UniformMutator {
    bounds: (Float, Float),
}

impl UniformMutator {
    /// Creates a new instance of `UniformMutator`.
    pub fn new(bounds: (Float, Float)) -> GenericResult<Self> {
        check_bounds(Some(bounds))?;

        Ok(Self { bounds })
    }
}

impl GeneMutator<Float> for UniformMutator {
    fn mutate(&self, _: &Float, random: &(dyn Random + Send + Sync)) -> Float {
        random.uniform_real(self.bounds.0, self.bounds.1)
    }
}

fn check_bounds(bounds: Option<(Float, Float)>) -> GenericResult<()> {
    match bounds {
        Some((min, max)) if !(min.is_finite() && max.is_finite() && min < max) => {
            Err(format!("mutation bounds must be finite with min < max, got: [{min}, {max}]").into())
        }
        _ => Ok(()),
    }
}
