//! This module contains an example model and logic to demonstrate practical usage of coevo crate:
//! real-valued vectors compete in a contest where a lower objective value wins.

#[cfg(test)]
#[path = "../tests/unit/example_test.rs"]
mod example_test;

use crate::config::*;
use crate::environment::Environment;
use crate::evaluation::{AgentId, AgentModel, AgentModelFactory, ModelReport};
use crate::fitness::Fitness;
use crate::individual::{Individual, IndividualFactory};
use crate::utils::{Float, GenericResult, Random};
use std::sync::Arc;

/// An objective function which calculates a cost of a vector, lower is better.
pub type ObjectiveFn = Arc<dyn Fn(&[Float]) -> Float + Send + Sync>;

/// An example genome.
pub type VectorGenome = Vec<Float>;

/// Creates individuals with genes drawn uniformly from the given bounds.
pub struct VectorFactory {
    dimension: usize,
    bounds: (Float, Float),
    random: Arc<dyn Random + Send + Sync>,
}

impl VectorFactory {
    /// Creates a new instance of `VectorFactory`.
    pub fn new(dimension: usize, bounds: (Float, Float), random: Arc<dyn Random + Send + Sync>) -> Self {
        Self { dimension, bounds, random }
    }
}

impl IndividualFactory<VectorGenome> for VectorFactory {
    fn create(&self) -> Individual<VectorGenome> {
        let (min, max) = self.bounds;
        Individual::new((0..self.dimension).map(|_| self.random.uniform_real(min, max)).collect())
    }
}

/// A summary of one contest run passed to a data sink.
#[derive(Clone, Debug)]
pub struct ContestReport {
    /// Evaluation group id.
    pub group_id: usize,
    /// Amount of played rounds.
    pub rounds: usize,
    /// The lowest cost among participants.
    pub best_cost: Option<Float>,
}

/// A contest between agents: in every round each agent is matched with another one and wins
/// if its cost is lower. Fitness combines an absolute score of the agent's own cost with the
/// share of won matches, so it is always positive.
pub struct ContestModel {
    group_id: usize,
    objective: ObjectiveFn,
    max_rounds: usize,
    costs: Vec<Float>,
    wins: Vec<usize>,
    round: usize,
}

impl ContestModel {
    /// Creates a new instance of `ContestModel`.
    pub fn new(group_id: usize, objective: ObjectiveFn, max_rounds: usize) -> Self {
        Self { group_id, objective, max_rounds, costs: vec![], wins: vec![], round: 0 }
    }
}

impl AgentModel<VectorGenome> for ContestModel {
    fn add_agent(&mut self, agent: AgentId, individual: &Individual<VectorGenome>) {
        if agent.0 >= self.costs.len() {
            self.costs.resize(agent.0 + 1, Float::MAX);
            self.wins.resize(agent.0 + 1, 0);
        }

        self.costs[agent.0] = (self.objective)(individual.genome().as_slice());
    }

    fn step(&mut self) -> bool {
        let agents = self.costs.len();
        if agents < 2 || self.round >= self.max_rounds {
            return false;
        }

        let offset = self.round % (agents - 1) + 1;
        (0..agents).for_each(|agent| {
            if self.costs[agent] < self.costs[(agent + offset) % agents] {
                self.wins[agent] += 1;
            }
        });

        self.round += 1;

        self.round < self.max_rounds
    }

    fn fitness(&self, agent: AgentId) -> GenericResult<Fitness> {
        let cost = *self.costs.get(agent.0).ok_or_else(|| format!("unknown agent {}", agent.0))?;
        let share = if self.round > 0 { self.wins[agent.0] as Float / self.round as Float } else { 0. };

        Fitness::new(1. / (1. + cost.max(0.)) + share)
    }

    fn report(&self) -> Option<ModelReport> {
        let best_cost = self.costs.iter().copied().reduce(Float::min);
        Some(Box::new(ContestReport { group_id: self.group_id, rounds: self.round, best_cost }))
    }
}

/// Creates a fresh contest model for every evaluation group.
pub struct ContestModelFactory {
    objective: ObjectiveFn,
    max_rounds: usize,
}

impl ContestModelFactory {
    /// Creates a new instance of `ContestModelFactory`.
    pub fn new(objective: ObjectiveFn, max_rounds: usize) -> Self {
        Self { objective, max_rounds }
    }
}

impl AgentModelFactory<VectorGenome> for ContestModelFactory {
    fn create(&self, group_id: usize) -> Box<dyn AgentModel<VectorGenome>> {
        Box::new(ContestModel::new(group_id, self.objective.clone(), self.max_rounds))
    }
}

/// Creates an environment from config for the contest with given objective.
pub fn create_contest_environment(
    config: &Config,
    dimension: usize,
    bounds: (Float, Float),
    objective: ObjectiveFn,
    max_rounds: usize,
) -> GenericResult<Environment<VectorGenome>> {
    let runtime = create_runtime(config);
    let factory = VectorFactory::new(dimension, bounds, runtime.random.clone());
    let models = Box::new(ContestModelFactory::new(objective, max_rounds));

    create_builder_from_config(config, runtime, &factory, models)?.build()
}

/// Returns a sphere function: sum of squares, minimum is at origin.
pub fn create_sphere_function() -> ObjectiveFn {
    Arc::new(|input| input.iter().map(|value| value * value).sum())
}

/// Returns a rosenbrock function, minimum is at `(1, 1, ..)`.
pub fn create_rosenbrock_function() -> ObjectiveFn {
    Arc::new(|input| {
        input.windows(2).fold(0., |acc, pair| {
            let (x1, x2) = (pair[0], pair[1]);
            acc + 100. * (x2 - x1.powi(2)).powi(2) + (x1 - 1.).powi(2)
        })
    })
}
