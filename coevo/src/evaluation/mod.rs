//! Evaluation scheduling: agents are batched into evaluation groups, every group runs its own
//! simulation model and reports one fitness sample per agent.

#[cfg(test)]
#[path = "../../tests/unit/evaluation/evaluation_test.rs"]
mod evaluation_test;

mod evaluator;
pub use self::evaluator::*;

mod factory;
pub use self::factory::*;

use crate::fitness::Fitness;
use crate::individual::{Genome, Individual, IndividualId};
use crate::utils::{map_reduce, GenericResult, Parallelism};
use rustc_hash::FxHashMap;
use std::any::Any;

/// An opaque per model data passed to a data sink.
pub type ModelReport = Box<dyn Any + Send>;

/// An identifier of an agent within one evaluation group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AgentId(pub usize);

/// A simulation model which agents are evaluated in. The core drives it with a fixed protocol:
/// add all agents, run to completion, read back fitness per agent.
pub trait AgentModel<G: Genome>: Send {
    /// Adds an agent backed by the given individual.
    fn add_agent(&mut self, agent: AgentId, individual: &Individual<G>);

    /// Makes one simulation step. Returns false when the model reaches its termination condition.
    fn step(&mut self) -> bool;

    /// Runs the model to completion, but not longer than `max_steps` if specified.
    /// Returns amount of executed steps.
    fn run(&mut self, max_steps: Option<usize>) -> usize {
        let max_steps = max_steps.unwrap_or(usize::MAX);
        let mut steps = 0;

        while steps < max_steps {
            steps += 1;
            if !self.step() {
                break;
            }
        }

        steps
    }

    /// Returns fitness of the agent observed during the run.
    fn fitness(&self, agent: AgentId) -> GenericResult<Fitness>;

    /// Returns opaque data about the run, if any.
    fn report(&self) -> Option<ModelReport> {
        None
    }
}

/// Creates a fresh model instance for every evaluation group.
pub trait AgentModelFactory<G: Genome>: Send + Sync {
    /// Creates a new model for the group with given id.
    fn create(&self, group_id: usize) -> Box<dyn AgentModel<G>>;
}

impl<G: Genome, F> AgentModelFactory<G> for F
where
    F: Fn(usize) -> Box<dyn AgentModel<G>> + Send + Sync,
{
    fn create(&self, group_id: usize) -> Box<dyn AgentModel<G>> {
        self(group_id)
    }
}

/// A batch of agents which share one simulation run.
pub struct EvaluationGroup<'a, G: Genome> {
    id: usize,
    agents: Vec<&'a Individual<G>>,
    fitness: Vec<Option<Fitness>>,
    model: Box<dyn AgentModel<G>>,
    steps: usize,
    is_evaluated: bool,
}

impl<'a, G: Genome> EvaluationGroup<'a, G> {
    /// Creates a new instance of `EvaluationGroup` which owns its model.
    pub fn new(id: usize, agents: Vec<&'a Individual<G>>, model: Box<dyn AgentModel<G>>) -> Self {
        let fitness = vec![None; agents.len()];
        Self { id, agents, fitness, model, steps: 0, is_evaluated: false }
    }

    /// Returns group id.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Returns individuals backing the agents, agent id is an index in this list.
    pub fn agents(&self) -> &[&'a Individual<G>] {
        self.agents.as_slice()
    }

    /// Returns fitness of the agent if the group is evaluated.
    pub fn fitness(&self, agent: AgentId) -> Option<&Fitness> {
        self.fitness.get(agent.0).and_then(|fitness| fitness.as_ref())
    }

    /// Returns amount of simulation steps executed.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Returns true if the group was run.
    pub fn is_evaluated(&self) -> bool {
        self.is_evaluated
    }

    /// Adds all agents to the model, runs it and reads back fitness of every agent.
    /// A group can be run only once.
    pub fn run(&mut self, max_steps: Option<usize>) -> GenericResult<()> {
        if self.is_evaluated {
            return Err(format!("evaluation group {} is already evaluated", self.id).into());
        }

        self.agents.iter().enumerate().for_each(|(index, individual)| self.model.add_agent(AgentId(index), individual));
        self.steps = self.model.run(max_steps);

        self.fitness = (0..self.agents.len())
            .map(|index| self.model.fitness(AgentId(index)).map(Some))
            .collect::<GenericResult<Vec<_>>>()
            .map_err(|err| err.context(format!("evaluation group {}", self.id).as_str()))?;
        self.is_evaluated = true;

        Ok(())
    }

    /// Consumes the group and returns its fitness samples with model's report.
    pub fn into_outcome(self) -> GenericResult<EvaluationOutcome> {
        if !self.is_evaluated {
            return Err(format!("evaluation group {} is not evaluated", self.id).into());
        }

        let mut samples = FxHashMap::<IndividualId, Vec<Fitness>>::default();
        self.agents.iter().zip(self.fitness.iter()).for_each(|(individual, fitness)| {
            if let Some(fitness) = fitness {
                samples.entry(individual.id()).or_default().push(*fitness);
            }
        });

        Ok(EvaluationOutcome { samples, reports: self.model.report().into_iter().collect() })
    }
}

/// Fitness samples grouped by individual together with model reports.
#[derive(Default)]
pub struct EvaluationOutcome {
    /// Fitness samples per individual.
    pub samples: FxHashMap<IndividualId, Vec<Fitness>>,
    /// Reports of all models.
    pub reports: Vec<ModelReport>,
}

impl EvaluationOutcome {
    /// Merges two outcomes.
    pub fn merge(mut self, other: Self) -> Self {
        other.samples.into_iter().for_each(|(id, samples)| self.samples.entry(id).or_default().extend(samples));
        self.reports.extend(other.reports);

        self
    }
}

/// Collects fitness samples from evaluated groups grouping them by individual identity.
/// With full parallelism, groups are harvested in parallel and partial results are reduced.
pub fn collect_outcome<G: Genome>(
    groups: Vec<EvaluationGroup<'_, G>>,
    parallelism: Parallelism,
) -> GenericResult<EvaluationOutcome> {
    match parallelism {
        Parallelism::Full => map_reduce(
            groups,
            |group| group.into_outcome(),
            || Ok(EvaluationOutcome::default()),
            |left, right| Ok(left?.merge(right?)),
        ),
        Parallelism::Sequential => groups
            .into_iter()
            .try_fold(EvaluationOutcome::default(), |outcome, group| Ok(outcome.merge(group.into_outcome()?))),
    }
}
