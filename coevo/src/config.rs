//! Typed configuration which assembles population groups, breeding pipelines and evaluation
//! settings for real-valued genomes.

#![allow(missing_docs)]

#[cfg(test)]
#[path = "../tests/unit/config_test.rs"]
mod config_test;

use crate::breeding::*;
use crate::environment::EnvironmentBuilder;
use crate::evaluation::*;
use crate::fitness::*;
use crate::individual::{Chromosome, IndividualFactory};
use crate::population::*;
use crate::termination::*;
use crate::utils::{Float, GenericResult, Parallelism, Runtime};
use serde::Deserialize;
use std::io::{BufReader, Read};
use std::sync::Arc;

/// Default amount of generations when no termination is configured.
const DEFAULT_MAX_GENERATIONS: usize = 100;

/// A full configuration.
#[derive(Clone, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Population groups to evolve.
    pub population_groups: Vec<PopulationGroupConfig>,
    /// Evaluation settings.
    pub evaluation: Option<EvaluationConfig>,
    /// Environment settings.
    pub environment: Option<EnvironmentConfig>,
}

/// A population group configuration.
#[derive(Clone, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PopulationGroupConfig {
    pub name: String,
    /// Total amount of individuals shared by populations of the group.
    pub capacity: usize,
    pub populations: Vec<PopulationConfig>,
    pub balancer: Option<BalancerConfig>,
    /// Default is 1, target sizes follow balancer immediately.
    pub adaptation_rate: Option<Float>,
}

/// A population configuration.
#[derive(Clone, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PopulationConfig {
    pub name: String,
    /// Initial amount of individuals.
    pub size: usize,
    pub pipeline: PipelineConfig,
    pub evolve_cycle: Option<EvolveCycleConfig>,
}

#[derive(Clone, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct EvolveCycleConfig {
    pub warmup: usize,
    pub interval: usize,
}

/// A breeding pipeline node configuration.
#[derive(Clone, Deserialize, Debug)]
#[serde(tag = "type")]
#[serde(rename_all = "camelCase")]
pub enum PipelineConfig {
    /// Selects individuals uniformly at random.
    Random,

    /// Selects individuals proportionally to their fitness.
    Proportional,

    /// Selects tournament winners.
    Tournament {
        size: usize,
        /// Amount of ranked winners emitted per tournament. Default is 1.
        top: Option<usize>,
    },

    /// Selects the best individuals. Either `count` or `proportion` must be specified.
    Elitism { count: Option<usize>, proportion: Option<Float> },

    /// Delegates to one of weighted sub-pipelines.
    Multiplexer { branches: Vec<BranchConfig> },

    /// Mutates offspring produced by the source pipeline.
    Mutation { source: Option<Box<PipelineConfig>>, ranges: Vec<MutationRangeConfig> },

    /// Crosses offspring produced by the source pipeline.
    Crossover { source: Option<Box<PipelineConfig>>, probability: Float },
}

#[derive(Clone, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct BranchConfig {
    pub weight: Float,
    pub pipeline: PipelineConfig,
}

/// A mutation range configuration: `[start, end)` positions of the genome.
#[derive(Clone, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct MutationRangeConfig {
    pub start: usize,
    pub end: usize,
    pub probability: Float,
    pub mutator: MutatorConfig,
}

/// A gene mutator configuration.
#[derive(Clone, Deserialize, Debug)]
#[serde(tag = "type")]
#[serde(rename_all = "camelCase")]
pub enum MutatorConfig {
    #[serde(rename_all = "camelCase")]
    Gaussian { std_dev: Float, bounds: Option<BoundsConfig> },

    #[serde(rename_all = "camelCase")]
    RandomWalk { step: Float, bounds: BoundsConfig },

    Uniform { bounds: BoundsConfig },
}

#[derive(Clone, Copy, Deserialize, Debug)]
pub struct BoundsConfig {
    pub min: Float,
    pub max: Float,
}

/// A population balancer configuration.
#[derive(Clone, Deserialize, Debug)]
#[serde(tag = "type")]
#[serde(rename_all = "camelCase")]
pub enum BalancerConfig {
    Tournament { size: usize, top: Option<usize> },
}

/// An evaluation configuration.
#[derive(Clone, Default, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationConfig {
    /// Amount of agents per evaluation group. When not specified, all agents share one group.
    pub group_size: Option<usize>,
    /// Minimum amount of groups every agent appears in. Default is 1.
    pub times_through: Option<usize>,
    /// A global bound on model steps.
    pub max_steps: Option<usize>,
    /// Runs groups in parallel. Default is true.
    pub parallel: Option<bool>,
    /// Amount of threads in a dedicated pool. Default is rayon's global pool.
    pub threads: Option<usize>,
    pub aggregation: Option<AggregationType>,
}

#[derive(Clone, Copy, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub enum AggregationType {
    Mean,
    Best,
    Worst,
}

/// An environment configuration.
#[derive(Clone, Default, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentConfig {
    /// A random seed. When specified, everything runs sequentially to be reproducible.
    pub seed: Option<u64>,
    /// Logs generation summary every n generations.
    pub log_every: Option<usize>,
    pub max_generations: Option<usize>,
    pub max_time: Option<Float>,
}

/// Reads config from reader.
pub fn read_config<R: Read>(reader: BufReader<R>) -> GenericResult<Config> {
    serde_json::from_reader(reader).map_err(|err| format!("cannot deserialize config: '{err}'").into())
}

/// Creates runtime from config.
pub fn create_runtime(config: &Config) -> Arc<Runtime> {
    let environment = config.environment.clone().unwrap_or_default();
    let is_parallel = config.evaluation.as_ref().and_then(|evaluation| evaluation.parallel).unwrap_or(true);

    Arc::new(match environment.seed {
        Some(seed) => Runtime::new_with_seed(seed),
        None if !is_parallel => Runtime { parallelism: Parallelism::Sequential, ..Runtime::default() },
        None => Runtime::default(),
    })
}

/// Creates an environment builder from config. Populations are initialized using the factory.
pub fn create_builder_from_config<G>(
    config: &Config,
    runtime: Arc<Runtime>,
    factory: &dyn IndividualFactory<G>,
    models: Box<dyn AgentModelFactory<G>>,
) -> GenericResult<EnvironmentBuilder<G>>
where
    G: Chromosome<Gene = Float>,
{
    let evaluation = config.evaluation.clone().unwrap_or_default();
    let environment = config.environment.clone().unwrap_or_default();

    let mut builder = EnvironmentBuilder::default()
        .with_runtime(runtime.clone())
        .with_models(models)
        .with_group_factory(create_group_factory(&evaluation)?)
        .with_evaluator(create_evaluator(&evaluation, runtime.as_ref())?)
        .with_aggregator(create_aggregator(evaluation.aggregation));

    if let Some(log_every) = environment.log_every {
        builder = builder.with_log_every(log_every);
    }

    config.population_groups.iter().try_fold(builder, |builder, group| {
        Ok(builder.with_population_group(create_population_group(group, &runtime, factory)?))
    })
}

/// Creates termination criteria from config. Defaults to a fixed amount of generations.
pub fn create_termination(config: &Config) -> Box<dyn Termination> {
    let environment = config.environment.clone().unwrap_or_default();

    let mut terminations: Vec<Box<dyn Termination>> = vec![];
    if let Some(max_generations) = environment.max_generations {
        terminations.push(Box::new(MaxGeneration::new(max_generations)));
    }
    if let Some(max_time) = environment.max_time {
        terminations.push(Box::new(MaxTime::new(max_time)));
    }

    match terminations.len() {
        0 => Box::new(MaxGeneration::new(DEFAULT_MAX_GENERATIONS)),
        1 => terminations.swap_remove(0),
        _ => Box::new(CompositeTermination::new(terminations)),
    }
}

/// Creates a population group and initializes its populations.
pub fn create_population_group<G>(
    config: &PopulationGroupConfig,
    runtime: &Arc<Runtime>,
    factory: &dyn IndividualFactory<G>,
) -> GenericResult<PopulationGroup<G>>
where
    G: Chromosome<Gene = Float>,
{
    let populations = config
        .populations
        .iter()
        .map(|population| {
            create_population(population, runtime, factory)
                .map_err(|err| err.context(format!("population '{}'", population.name).as_str()))
        })
        .collect::<GenericResult<Vec<_>>>()?;

    let total_size = config.populations.iter().map(|population| population.size).sum::<usize>();
    if total_size != config.capacity {
        runtime.warn(&format!(
            "population group '{}' capacity {} differs from total initial size {total_size}",
            config.name, config.capacity
        ));
    }

    let mut group = PopulationGroup::new(config.name.as_str(), populations, config.capacity)?;

    if let Some(balancer) = &config.balancer {
        group = group.with_balancer(create_balancer(balancer)?);
    }

    if let Some(adaptation_rate) = config.adaptation_rate {
        group = group.with_adaptation_rate(adaptation_rate)?;
    }

    Ok(group)
}

fn create_population<G>(
    config: &PopulationConfig,
    runtime: &Arc<Runtime>,
    factory: &dyn IndividualFactory<G>,
) -> GenericResult<Population<G>>
where
    G: Chromosome<Gene = Float>,
{
    let evolve_cycle =
        config.evolve_cycle.as_ref().map(|cycle| EvolveCycle::new(cycle.warmup, cycle.interval)).transpose()?;

    let pipeline = create_pipeline(&config.pipeline, runtime)?;
    let mut population =
        Population::new(config.name.as_str(), pipeline, config.size as Float)?.with_evolve_cycle(evolve_cycle);
    population.initialize(factory);

    Ok(population)
}

/// Creates a breeding pipeline from its configuration.
pub fn create_pipeline<G>(config: &PipelineConfig, runtime: &Arc<Runtime>) -> GenericResult<DynBreedingNode<G>>
where
    G: Chromosome<Gene = Float>,
{
    let node: DynBreedingNode<G> = match config {
        PipelineConfig::Random => Box::new(RandomSelector::new(runtime.clone())),
        PipelineConfig::Proportional => Box::new(ProportionalSelector::new(runtime.clone())),
        PipelineConfig::Tournament { size, top } => {
            Box::new(TournamentSelector::new(runtime.clone(), *size, top.unwrap_or(1))?)
        }
        PipelineConfig::Elitism { count, proportion } => {
            let quota = match (count, proportion) {
                (Some(count), None) => EliteQuota::Count(*count),
                (None, Some(proportion)) => EliteQuota::Proportion(*proportion),
                _ => return Err("elitism requires either count or proportion, but not both".into()),
            };
            Box::new(ElitismSelector::new(quota)?)
        }
        PipelineConfig::Multiplexer { branches } => {
            let branches = branches
                .iter()
                .map(|branch| create_pipeline(&branch.pipeline, runtime).map(|node| (node, branch.weight)))
                .collect::<GenericResult<Vec<_>>>()?;
            Box::new(WeightedMultiplexer::new(runtime.clone(), branches)?)
        }
        PipelineConfig::Mutation { source, ranges } => {
            let source = create_source("mutation", source, runtime)?;
            let ranges = ranges.iter().map(create_mutation_range).collect::<GenericResult<Vec<_>>>()?;
            Box::new(MutationStage::new(runtime.clone(), source, ranges)?)
        }
        PipelineConfig::Crossover { source, probability } => {
            let source = create_source("crossover", source, runtime)?;
            Box::new(CrossoverStage::new(runtime.clone(), source, *probability)?)
        }
    };

    Ok(node)
}

fn create_source<G>(
    name: &str,
    source: &Option<Box<PipelineConfig>>,
    runtime: &Arc<Runtime>,
) -> GenericResult<DynBreedingNode<G>>
where
    G: Chromosome<Gene = Float>,
{
    match source {
        Some(source) => create_pipeline(source, runtime),
        None => Err(format!("{name} pipeline requires a source").into()),
    }
}

fn create_mutation_range(config: &MutationRangeConfig) -> GenericResult<MutationRange<Float>> {
    let bounds = |bounds: &BoundsConfig| (bounds.min, bounds.max);

    let mutator: Arc<dyn GeneMutator<Float>> = match &config.mutator {
        MutatorConfig::Gaussian { std_dev, bounds: value } => {
            Arc::new(GaussianMutator::new(*std_dev, value.as_ref().map(bounds))?)
        }
        MutatorConfig::RandomWalk { step, bounds: value } => Arc::new(RandomWalkMutator::new(*step, bounds(value))?),
        MutatorConfig::Uniform { bounds: value } => Arc::new(UniformMutator::new(bounds(value))?),
    };

    MutationRange::new(config.start..config.end, config.probability, mutator)
}

fn create_balancer<G>(config: &BalancerConfig) -> GenericResult<Box<dyn PopulationBalancer<G>>>
where
    G: Chromosome<Gene = Float>,
{
    let balancer: Box<dyn PopulationBalancer<G>> = match config {
        BalancerConfig::Tournament { size, top } => Box::new(TournamentBalancer::new(*size, top.unwrap_or(1))?),
    };

    Ok(balancer)
}

fn create_group_factory<G>(config: &EvaluationConfig) -> GenericResult<Box<dyn EvaluationGroupFactory<G>>>
where
    G: Chromosome<Gene = Float>,
{
    let times_through = config.times_through.unwrap_or(1);

    let factory: Box<dyn EvaluationGroupFactory<G>> = match config.group_size {
        Some(group_size) => Box::new(ShuffledGroupFactory::new(group_size, times_through)?),
        None => Box::new(SingleGroupFactory::new(times_through)?),
    };

    Ok(factory)
}

fn create_evaluator<G>(config: &EvaluationConfig, runtime: &Runtime) -> GenericResult<Box<dyn Evaluator<G>>>
where
    G: Chromosome<Gene = Float>,
{
    let evaluator: Box<dyn Evaluator<G>> = match (runtime.parallelism, config.threads) {
        (Parallelism::Sequential, _) => Box::new(SequentialEvaluator::new(config.max_steps)),
        (Parallelism::Full, Some(threads)) => Box::new(ParallelEvaluator::new_with_threads(config.max_steps, threads)?),
        (Parallelism::Full, None) => Box::new(ParallelEvaluator::new(config.max_steps)),
    };

    Ok(evaluator)
}

fn create_aggregator(aggregation: Option<AggregationType>) -> Box<dyn FitnessAggregator> {
    match aggregation.unwrap_or(AggregationType::Mean) {
        AggregationType::Mean => Box::new(MeanAggregator),
        AggregationType::Best => Box::new(BestAggregator),
        AggregationType::Worst => Box::new(WorstAggregator),
    }
}
