use super::*;
use crate::fitness::MeanAggregator;

/// Provides configurable way to build `Environment`.
pub struct EnvironmentBuilder<G: Genome> {
    runtime: Option<Arc<Runtime>>,
    groups: Vec<PopulationGroup<G>>,
    group_factory: Option<Box<dyn EvaluationGroupFactory<G>>>,
    models: Option<Box<dyn AgentModelFactory<G>>>,
    evaluator: Option<Box<dyn Evaluator<G>>>,
    aggregator: Option<Box<dyn FitnessAggregator>>,
    sink: Option<Box<dyn DataSink>>,
    log_every: Option<usize>,
}

impl<G: Genome> Default for EnvironmentBuilder<G> {
    fn default() -> Self {
        Self {
            runtime: None,
            groups: vec![],
            group_factory: None,
            models: None,
            evaluator: None,
            aggregator: None,
            sink: None,
            log_every: None,
        }
    }
}

impl<G: Genome> EnvironmentBuilder<G> {
    /// Sets runtime. Default is `Runtime::default()`.
    pub fn with_runtime(mut self, runtime: Arc<Runtime>) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Adds a population group. Populations are expected to be initialized.
    pub fn with_population_group(mut self, group: PopulationGroup<G>) -> Self {
        self.groups.push(group);
        self
    }

    /// Sets evaluation group factory. Default puts all agents into one group.
    pub fn with_group_factory(mut self, group_factory: Box<dyn EvaluationGroupFactory<G>>) -> Self {
        self.group_factory = Some(group_factory);
        self
    }

    /// Sets agent model factory. Mandatory.
    pub fn with_models(mut self, models: Box<dyn AgentModelFactory<G>>) -> Self {
        self.models = Some(models);
        self
    }

    /// Sets evaluator. Default depends on runtime's parallelism.
    pub fn with_evaluator(mut self, evaluator: Box<dyn Evaluator<G>>) -> Self {
        self.evaluator = Some(evaluator);
        self
    }

    /// Sets fitness aggregator. Default is the arithmetic mean.
    pub fn with_aggregator(mut self, aggregator: Box<dyn FitnessAggregator>) -> Self {
        self.aggregator = Some(aggregator);
        self
    }

    /// Sets data sink which receives per generation data.
    pub fn with_sink(mut self, sink: Box<dyn DataSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Sets how often (in generations) a summary line is logged. Nothing is logged by default.
    pub fn with_log_every(mut self, log_every: usize) -> Self {
        self.log_every = Some(log_every);
        self
    }

    /// Builds the environment.
    pub fn build(self) -> GenericResult<Environment<G>> {
        if self.groups.is_empty() {
            return Err("at least one population group is required".into());
        }

        if self.log_every == Some(0) {
            return Err("log frequency must be positive".into());
        }

        let models = self.models.ok_or_else(|| "agent model factory is required".to_string())?;
        let runtime = self.runtime.unwrap_or_else(|| Arc::new(Runtime::default()));

        let group_factory = match self.group_factory {
            Some(group_factory) => group_factory,
            None => Box::new(SingleGroupFactory::new(1)?),
        };

        let evaluator = self.evaluator.unwrap_or_else(|| match runtime.parallelism {
            Parallelism::Full => Box::new(ParallelEvaluator::default()),
            Parallelism::Sequential => Box::new(SequentialEvaluator::default()),
        });

        Ok(Environment {
            runtime,
            groups: self.groups,
            group_factory,
            models,
            evaluator,
            aggregator: self.aggregator.unwrap_or_else(|| Box::new(MeanAggregator)),
            sink: self.sink,
            log_every: self.log_every,
            generation: 0,
            phase: GenerationPhase::Idle,
            timer: Timer::start(),
        })
    }
}
