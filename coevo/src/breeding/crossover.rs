#[cfg(test)]
#[path = "../../tests/unit/breeding/crossover_test.rs"]
mod crossover_test;

use super::*;
use crate::individual::Chromosome;
use crate::utils::{Float, Runtime};

/// Applies two-point crossover with wraparound to pairs of offspring produced upstream.
///
/// With `probability`, two parents are taken from the source node and their genes between two
/// random cut points are swapped: one child is returned immediately, the other one is buffered
/// and returned by the next call. Otherwise, a single upstream offspring is passed through.
pub struct CrossoverStage<G: Chromosome> {
    runtime: Arc<Runtime>,
    source: DynBreedingNode<G>,
    probability: Float,
    buffer: Option<Individual<G>>,
}

impl<G: Chromosome> CrossoverStage<G> {
    /// Creates a new instance of `CrossoverStage`.
    pub fn new(runtime: Arc<Runtime>, source: DynBreedingNode<G>, probability: Float) -> GenericResult<Self> {
        check_probability("crossover", probability)?;

        Ok(Self { runtime, source, probability, buffer: None })
    }

    fn cross(&mut self) -> GenericResult<Individual<G>> {
        let mut first = self.source.next_offspring()?;
        let mut second = self.source.next_offspring()?;

        let length = first.genome().genes().len();
        if length != second.genome().genes().len() {
            return Err(format!(
                "cannot cross genomes of different length: {length} and {}",
                second.genome().genes().len()
            )
            .into());
        }

        if length > 0 {
            let start = self.runtime.random_index(length);
            let end = self.runtime.random_index(length);

            swap_segment(first.genome_mut().genes_mut(), second.genome_mut().genes_mut(), start, end);
        }

        let (first_parent, second_parent) = (first.parents().first().copied(), second.parents().first().copied());
        first.add_parent(second_parent.unwrap_or_else(|| second.id()));
        second.add_parent(first_parent.unwrap_or_else(|| first.id()));

        self.buffer = Some(second);

        Ok(first)
    }
}

impl<G: Chromosome> BreedingNode<G> for CrossoverStage<G> {
    fn prime_for_generation(&mut self, source: &SourcePopulation<G>) -> GenericResult<()> {
        self.buffer = None;
        self.source.prime_for_generation(source)
    }

    fn next_offspring(&mut self) -> GenericResult<Individual<G>> {
        if let Some(child) = self.buffer.take() {
            return Ok(child);
        }

        if self.runtime.random.is_hit(self.probability) { self.cross() } else { self.source.next_offspring() }
    }

    fn queued(&self) -> usize {
        self.buffer.iter().count() + self.source.queued()
    }
}

/// Swaps genes of two sequences between `start` (inclusive) and `end` (exclusive) positions.
/// When `start > end`, the segment wraps around the end back to the beginning; when they are
/// equal, nothing is swapped. Both sequences are expected to have the same length.
pub fn swap_segment<T>(first: &mut [T], second: &mut [T], start: usize, end: usize) {
    let length = first.len().min(second.len());
    if length == 0 || start == end || start >= length || end >= length {
        return;
    }

    let mut cursor = start;
    while cursor != end {
        std::mem::swap(&mut first[cursor], &mut second[cursor]);
        cursor = (cursor + 1) % length;
    }
}
