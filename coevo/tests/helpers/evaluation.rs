use super::breeding::TestGenome;
use crate::evaluation::{AgentId, AgentModel, AgentModelFactory, ModelReport};
use crate::fitness::Fitness;
use crate::individual::Individual;
use crate::utils::{Float, GenericResult};

/// Reports the first gene of an agent as its fitness after running given amount of steps.
pub struct EchoModel {
    values: Vec<Float>,
    steps: usize,
    max_steps: usize,
}

impl EchoModel {
    pub fn new(max_steps: usize) -> Self {
        Self { values: vec![], steps: 0, max_steps }
    }
}

impl AgentModel<TestGenome> for EchoModel {
    fn add_agent(&mut self, agent: AgentId, individual: &Individual<TestGenome>) {
        assert_eq!(agent.0, self.values.len());
        self.values.push(individual.genome()[0]);
    }

    fn step(&mut self) -> bool {
        self.steps += 1;
        self.steps < self.max_steps
    }

    fn fitness(&self, agent: AgentId) -> GenericResult<Fitness> {
        self.values.get(agent.0).ok_or_else(|| "unknown agent".into()).and_then(|value| Fitness::new(*value))
    }

    fn report(&self) -> Option<ModelReport> {
        Some(Box::new(self.values.len()))
    }
}

pub fn create_echo_models(max_steps: usize) -> Box<dyn AgentModelFactory<TestGenome>> {
    Box::new(move |_: usize| Box::new(EchoModel::new(max_steps)) as Box<dyn AgentModel<TestGenome>>)
}
