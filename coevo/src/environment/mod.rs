//! Contains the generation loop which ties evaluation, fitness aggregation, balancing and
//! reproduction together.

#[cfg(test)]
#[path = "../../tests/unit/environment/environment_test.rs"]
mod environment_test;

mod builder;
pub use self::builder::*;

mod telemetry;
pub use self::telemetry::*;

use crate::evaluation::*;
use crate::fitness::{Fitness, FitnessAggregator};
use crate::individual::{Genome, Individual, IndividualId};
use crate::population::{Population, PopulationGroup};
use crate::termination::Termination;
use crate::utils::{parallel_try_foreach_mut, GenericResult, Parallelism, Runtime, Timer};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Specifies the last completed phase of the current generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenerationPhase {
    /// Nothing is done yet.
    Idle,
    /// Agents are partitioned into evaluation groups.
    GroupsCreated,
    /// All evaluation groups are run.
    Evaluated,
    /// Fitness samples are reduced to one fitness per individual.
    Aggregated,
    /// Population groups recomputed target sizes.
    Balanced,
    /// Populations are replaced by their offspring.
    Reproduced,
}

/// Runs the evolution of population groups generation by generation.
///
/// A failed generation returns an error without incrementing the generation counter: the
/// caller decides whether to retry, skip or terminate the run.
pub struct Environment<G: Genome> {
    runtime: Arc<Runtime>,
    groups: Vec<PopulationGroup<G>>,
    group_factory: Box<dyn EvaluationGroupFactory<G>>,
    models: Box<dyn AgentModelFactory<G>>,
    evaluator: Box<dyn Evaluator<G>>,
    aggregator: Box<dyn FitnessAggregator>,
    sink: Option<Box<dyn DataSink>>,
    log_every: Option<usize>,
    generation: usize,
    phase: GenerationPhase,
    timer: Timer,
}

impl<G: Genome> Environment<G> {
    /// Returns index of the next generation to run.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Returns the last completed phase.
    pub fn phase(&self) -> GenerationPhase {
        self.phase
    }

    /// Returns population groups.
    pub fn groups(&self) -> &[PopulationGroup<G>] {
        self.groups.as_slice()
    }

    /// Returns runtime.
    pub fn runtime(&self) -> &Arc<Runtime> {
        &self.runtime
    }

    /// Runs generations until termination criteria is met. At least one generation is run.
    /// Returns amount of generations run.
    pub fn run(&mut self, termination: &dyn Termination) -> GenericResult<usize> {
        let first = self.generation;

        loop {
            let statistics = self.run_generation()?;
            if termination.is_termination(&statistics) {
                return Ok(self.generation - first);
            }
        }
    }

    /// Runs one generation: creates evaluation groups, evaluates them, aggregates fitness,
    /// balances population groups and reproduces populations.
    pub fn run_generation(&mut self) -> GenericResult<GenerationStatistics> {
        self.phase = GenerationPhase::Idle;

        let (evaluation_groups, outcome) = self.evaluate()?;
        let EvaluationOutcome { samples, reports } = outcome;

        self.aggregate(samples)?;
        self.phase = GenerationPhase::Aggregated;

        let runtime = self.runtime.clone();
        self.groups.iter_mut().try_for_each(|group| group.balance(runtime.as_ref()).map(|_| ()))?;
        self.phase = GenerationPhase::Balanced;

        let statistics = GenerationStatistics {
            generation: self.generation,
            evaluation_groups,
            populations: self.populations().map(PopulationSummary::new).collect(),
            elapsed: self.timer.elapsed_secs_as_float(),
        };
        self.report(&statistics, reports);

        self.reproduce()?;
        self.phase = GenerationPhase::Reproduced;

        self.generation += 1;

        Ok(statistics)
    }

    fn evaluate(&mut self) -> GenericResult<(usize, EvaluationOutcome)> {
        let roster = self
            .groups
            .iter()
            .flat_map(|group| group.populations().iter().map(Population::individuals))
            .collect::<Vec<_>>();

        let groups = self.group_factory.create_groups(roster.as_slice(), self.models.as_ref(), self.runtime.as_ref())?;
        let evaluation_groups = groups.len();
        self.phase = GenerationPhase::GroupsCreated;

        let groups = self.evaluator.evaluate(groups)?;
        self.phase = GenerationPhase::Evaluated;

        Ok((evaluation_groups, collect_outcome(groups, self.runtime.parallelism)?))
    }

    fn aggregate(&mut self, samples: FxHashMap<IndividualId, Vec<Fitness>>) -> GenericResult<()> {
        let aggregator = self.aggregator.as_ref();

        // fitness of every individual is computed before any of them is modified
        let aggregated = self
            .populations()
            .flat_map(|population| population.individuals().iter())
            .map(|individual| aggregate_individual(individual, samples.get(&individual.id()), aggregator))
            .collect::<GenericResult<Vec<_>>>()?;

        let unevaluated = aggregated.iter().filter(|fitness| fitness.is_none()).count();

        self.groups
            .iter_mut()
            .flat_map(|group| group.populations_mut().iter_mut())
            .flat_map(|population| population.individuals_mut().iter_mut())
            .zip(aggregated)
            .filter_map(|(individual, fitness)| fitness.map(|fitness| (individual, fitness)))
            .for_each(|(individual, fitness)| {
                individual.take_samples();
                individual.set_fitness(fitness);
            });

        if unevaluated > 0 {
            self.runtime.warn(&format!("{unevaluated} individual(s) received no fitness samples in this generation"));
        }

        Ok(())
    }

    fn reproduce(&mut self) -> GenericResult<()> {
        let generation = self.generation;
        let mut populations =
            self.groups.iter_mut().flat_map(|group| group.populations_mut().iter_mut()).collect::<Vec<_>>();

        match self.runtime.parallelism {
            Parallelism::Full => {
                parallel_try_foreach_mut(populations.as_mut_slice(), |population| {
                    population.reproduce(generation).map(|_| ())
                })
            }
            Parallelism::Sequential => {
                populations.iter_mut().try_for_each(|population| population.reproduce(generation).map(|_| ()))
            }
        }
    }

    fn report(&mut self, statistics: &GenerationStatistics, reports: Vec<ModelReport>) {
        if let Some(sink) = self.sink.as_mut() {
            sink.on_generation(statistics, reports);
        }

        if self.log_every.is_some_and(|log_every| statistics.generation % log_every == 0) {
            self.runtime.info(format_statistics(statistics, &self.timer).as_str());
        }
    }

    fn populations(&self) -> impl Iterator<Item = &Population<G>> + '_ {
        self.groups.iter().flat_map(|group| group.populations().iter())
    }
}

/// Reduces individual's samples into aggregated fitness without modifying the individual.
/// An individual which already has fitness (it survived a generation without breeding) keeps
/// it as one more sample, so its estimate stabilizes over generations. Returns `None` when
/// there are no samples for the individual in this generation.
fn aggregate_individual<G: Genome>(
    individual: &Individual<G>,
    generation_samples: Option<&Vec<Fitness>>,
    aggregator: &dyn FitnessAggregator,
) -> GenericResult<Option<Option<Fitness>>> {
    let mut samples = individual.samples().to_vec();
    samples.extend(generation_samples.into_iter().flatten().copied());

    if samples.is_empty() {
        return Ok(None);
    }

    samples.extend(individual.fitness().copied());

    aggregator
        .aggregate(samples.as_slice())
        .map(Some)
        .map_err(|err| err.context(format!("cannot aggregate fitness of individual {}", individual.id()).as_str()))
}
