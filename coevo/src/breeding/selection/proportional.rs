#[cfg(test)]
#[path = "../../../tests/unit/breeding/selection/proportional_test.rs"]
mod proportional_test;

use super::*;
use crate::utils::{Float, Runtime};

/// Total fitness above this value starts losing precision when a uniform draw is mapped to
/// cumulative keys: it is a half of the range where every integer is representable by `Float`.
const MAX_SAFE_TOTAL_FITNESS: Float = (1_u64 << 52) as Float;

/// Selects individuals with probability proportional to their fitness (roulette wheel).
///
/// Individuals without fitness or with non-positive fitness are excluded from the wheel and
/// reported through the logger. An empty wheel is an error.
pub struct ProportionalSelector<G: Genome> {
    runtime: Arc<Runtime>,
    source: Option<SourcePopulation<G>>,
    /// Cumulative fitness keys (strictly increasing) with source indices.
    cumulative: Vec<(Float, usize)>,
    total_fitness: Float,
}

impl<G: Genome> ProportionalSelector<G> {
    /// Creates a new instance of `ProportionalSelector`.
    pub fn new(runtime: Arc<Runtime>) -> Self {
        Self { runtime, source: None, cumulative: vec![], total_fitness: 0. }
    }

    /// Returns total fitness of the individuals on the wheel.
    pub fn total_fitness(&self) -> Float {
        self.total_fitness
    }

    fn build_index(&mut self, source: &[Individual<G>]) -> GenericResult<()> {
        self.cumulative.clear();
        self.total_fitness = 0.;

        let mut missing = 0_usize;
        let mut non_positive = 0_usize;

        for (index, individual) in source.iter().enumerate() {
            let Some(fitness) = individual.fitness() else {
                missing += 1;
                continue;
            };

            let value = fitness.value();
            if !value.is_finite() {
                return Err(format!("individual {} has non-finite fitness: {value}", individual.id()).into());
            }

            if value <= 0. {
                non_positive += 1;
                continue;
            }

            self.total_fitness += value;
            self.cumulative.push((self.total_fitness, index));
        }

        if missing > 0 {
            self.runtime.warn(&format!("{missing} individual(s) without fitness excluded from proportional selection"));
        }

        if non_positive > 0 {
            self.runtime
                .info(&format!("{non_positive} individual(s) with non-positive fitness excluded from selection"));
        }

        if self.cumulative.is_empty() {
            return Err("proportional selection requires at least one individual with positive fitness".into());
        }

        if !self.total_fitness.is_finite() {
            return Err(format!("total fitness is not finite: {}", self.total_fitness).into());
        }

        if self.total_fitness > MAX_SAFE_TOTAL_FITNESS {
            self.runtime.warn(&format!(
                "total fitness {} exceeds {MAX_SAFE_TOTAL_FITNESS}, proportional selection loses precision",
                self.total_fitness
            ));
        }

        Ok(())
    }
}

impl<G: Genome> BreedingNode<G> for ProportionalSelector<G> {
    fn prime_for_generation(&mut self, source: &SourcePopulation<G>) -> GenericResult<()> {
        self.source = None;
        self.build_index(source.as_slice())?;
        self.source = Some(source.clone());

        Ok(())
    }

    fn next_offspring(&mut self) -> GenericResult<Individual<G>> {
        let source = get_source(&self.source)?;

        let draw = self.runtime.random.uniform_real(0., self.total_fitness);
        // NOTE ceiling lookup: the smallest cumulative key which is not less than the draw
        let position = self.cumulative.partition_point(|(key, _)| *key < draw).min(self.cumulative.len() - 1);
        let (_, index) = self.cumulative[position];

        Ok(source[index].offspring())
    }
}
