use super::*;
use crate::breeding::{BreedingNode, DynBreedingNode, SourcePopulation};
use crate::helpers::breeding::*;
use crate::helpers::evaluation::*;
use crate::helpers::utils::*;
use crate::population::EvolveCycle;
use crate::termination::MaxGeneration;
use crate::utils::{DefaultRandom, Float};
use std::sync::Mutex;

#[derive(Clone, Default)]
struct RecordingSink {
    calls: Arc<Mutex<Vec<(usize, usize, Option<Float>)>>>,
}

impl DataSink for RecordingSink {
    fn on_generation(&mut self, statistics: &GenerationStatistics, reports: Vec<ModelReport>) {
        let best = statistics.populations.first().and_then(|summary| summary.best);
        self.calls.lock().unwrap().push((statistics.generation, reports.len(), best));
    }
}

struct FailingNode;

impl BreedingNode<TestGenome> for FailingNode {
    fn prime_for_generation(&mut self, _: &SourcePopulation<TestGenome>) -> GenericResult<()> {
        Err("broken pipeline".into())
    }

    fn next_offspring(&mut self) -> GenericResult<Individual<TestGenome>> {
        unreachable!()
    }
}

struct EmptyGroupFactory;

impl EvaluationGroupFactory<TestGenome> for EmptyGroupFactory {
    fn create_groups<'a>(
        &self,
        _: &[&'a [Individual<TestGenome>]],
        _: &dyn AgentModelFactory<TestGenome>,
        _: &Runtime,
    ) -> GenericResult<Vec<EvaluationGroup<'a, TestGenome>>> {
        Ok(vec![])
    }
}

fn create_unevaluated_population(
    name: &str,
    pipeline: DynBreedingNode<TestGenome>,
    genes: &[Float],
) -> Population<TestGenome> {
    let mut population = Population::new(name, pipeline, genes.len() as Float).unwrap();
    population.set_individuals(genes.iter().map(|gene| create_individual(vec![*gene], None)).collect());

    population
}

fn create_group(population: Population<TestGenome>) -> PopulationGroup<TestGenome> {
    PopulationGroup::new("group", vec![population], 4).unwrap()
}

fn create_builder(population: Population<TestGenome>) -> EnvironmentBuilder<TestGenome> {
    EnvironmentBuilder::default()
        .with_runtime(create_test_runtime())
        .with_population_group(create_group(population))
        .with_models(create_echo_models(1))
}

fn create_default_population() -> Population<TestGenome> {
    create_unevaluated_population("pop", Box::new(SequenceNode::default()), &[1., 2., 3., 4.])
}

#[test]
fn can_run_one_generation() {
    let sink = RecordingSink::default();
    let mut environment =
        create_builder(create_default_population()).with_sink(Box::new(sink.clone())).build().unwrap();
    assert_eq!(environment.phase(), GenerationPhase::Idle);

    let statistics = environment.run_generation().unwrap();

    assert_eq!(statistics.generation, 0);
    assert_eq!(statistics.evaluation_groups, 1);
    assert_eq!(statistics.populations.len(), 1);
    assert_eq!(statistics.populations[0].name, "pop");
    assert_eq!(statistics.populations[0].size, 4);
    assert_eq!(statistics.populations[0].best, Some(4.));
    assert_eq!(statistics.populations[0].mean, Some(2.5));

    assert_eq!(environment.generation(), 1);
    assert_eq!(environment.phase(), GenerationPhase::Reproduced);
    assert_eq!(*sink.calls.lock().unwrap(), vec![(0, 1, Some(4.))]);

    let population = &environment.groups()[0].populations()[0];
    assert_eq!(population.size(), 4);
    assert!(population.individuals().iter().all(|individual| individual.fitness().is_none()));
    assert!(population.individuals().iter().all(|individual| individual.parents().len() == 1));
}

parameterized_test! {can_run_until_termination, (limit, expected), {
    can_run_until_termination_impl(limit, expected);
}}

can_run_until_termination! {
    case01_one: (1, 1),
    case02_three: (3, 3),
    case03_zero_runs_at_least_one: (0, 1),
}

fn can_run_until_termination_impl(limit: usize, expected: usize) {
    let sink = RecordingSink::default();
    let mut environment =
        create_builder(create_default_population()).with_sink(Box::new(sink.clone())).build().unwrap();

    let generations = environment.run(&MaxGeneration::new(limit)).unwrap();

    assert_eq!(generations, expected);
    assert_eq!(environment.generation(), expected);
    assert_eq!(sink.calls.lock().unwrap().len(), expected);
}

#[test]
fn can_keep_generation_on_failure() {
    let population = create_unevaluated_population("pop", Box::new(FailingNode), &[1., 2.]);
    let mut environment = create_builder(population).build().unwrap();

    let result = environment.run_generation();

    assert_eq!(result.map(|_| ()), Err("cannot reproduce population 'pop': broken pipeline".into()));
    assert_eq!(environment.generation(), 0);
    assert_eq!(environment.phase(), GenerationPhase::Balanced);
    let population = &environment.groups()[0].populations()[0];
    assert_eq!(population.size(), 2);
    assert!(population.individuals().iter().all(|individual| individual.fitness().is_some()));
}

#[test]
fn can_leave_fitness_untouched_when_aggregation_fails() {
    let mut population = Population::new("pop", Box::new(SequenceNode::default()), 2.).unwrap();
    population.set_individuals(vec![
        create_individual(vec![1.], None),
        create_individual(vec![Float::MAX], Some(Float::MAX)),
    ]);
    let mut environment = create_builder(population).build().unwrap();
    let get_fitness = |environment: &Environment<TestGenome>| {
        environment.groups()[0].populations()[0]
            .individuals()
            .iter()
            .map(|individual| individual.fitness().map(|fitness| (fitness.count(), fitness.value())))
            .collect::<Vec<_>>()
    };

    (0..2).for_each(|_| {
        let error = environment.run_generation().map(|_| ()).unwrap_err();

        assert!(error.to_string().contains("fitness combination overflow"), "unexpected error: {error}");
        assert_eq!(get_fitness(&environment), vec![None, Some((1, Float::MAX))]);
        assert_eq!(environment.phase(), GenerationPhase::Evaluated);
        assert_eq!(environment.generation(), 0);
    });
}

#[test]
fn can_stabilize_fitness_when_breeding_is_skipped() {
    let population =
        create_default_population().with_evolve_cycle(Some(EvolveCycle::new(2, 1).unwrap()));
    let mut environment = create_builder(population).build().unwrap();
    let get_counts = |environment: &Environment<TestGenome>| {
        environment.groups()[0].populations()[0]
            .individuals()
            .iter()
            .map(|individual| individual.fitness().map(|fitness| (fitness.count(), fitness.value())))
            .collect::<Vec<_>>()
    };

    environment.run_generation().unwrap();
    assert_eq!(get_counts(&environment), vec![Some((1, 1.)), Some((1, 2.)), Some((1, 3.)), Some((1, 4.))]);

    environment.run_generation().unwrap();
    assert_eq!(get_counts(&environment), vec![Some((2, 1.)), Some((2, 2.)), Some((2, 3.)), Some((2, 4.))]);

    environment.run_generation().unwrap();
    assert!(get_counts(&environment).iter().all(Option::is_none));
}

#[test]
fn can_warn_about_individuals_without_samples() {
    let (runtime, capture) = create_logging_runtime(Arc::new(DefaultRandom::default()));
    let mut environment = create_builder(create_default_population())
        .with_runtime(runtime)
        .with_group_factory(Box::new(EmptyGroupFactory))
        .build()
        .unwrap();

    let statistics = environment.run_generation().unwrap();

    assert_eq!(statistics.evaluation_groups, 0);
    assert_eq!(statistics.populations[0].best, None);
    assert_eq!(statistics.populations[0].mean, None);
    assert_eq!(capture.warnings(), vec!["warning: 4 individual(s) received no fitness samples in this generation"]);
    assert_eq!(environment.generation(), 1);
}

#[test]
fn can_log_statistics_with_given_frequency() {
    let (runtime, capture) = create_logging_runtime(Arc::new(DefaultRandom::default()));
    let mut environment =
        create_builder(create_default_population()).with_runtime(runtime).with_log_every(2).build().unwrap();

    environment.run(&MaxGeneration::new(3)).unwrap();

    let messages = capture.messages();
    assert_eq!(messages.len(), 2);
    assert!(messages[0].contains("generation 0 evaluated in 1 group(s): [pop: size=4, best=4.0000000, mean=2.5000000]"));
    assert!(messages[1].contains("generation 2 evaluated in 1 group(s)"));
}

#[test]
fn can_run_generations_in_parallel() {
    let runtime = Arc::new(Runtime::new(Arc::new(DefaultRandom::default()), Arc::new(|_: &str| {}), Parallelism::Full));
    let second = create_unevaluated_population("second", Box::new(SequenceNode::default()), &[5., 6.]);
    let group = PopulationGroup::new("group", vec![create_default_population(), second], 6).unwrap();
    let mut environment = EnvironmentBuilder::default()
        .with_runtime(runtime)
        .with_population_group(group)
        .with_group_factory(Box::new(ShuffledGroupFactory::new(2, 3).unwrap()))
        .with_models(create_echo_models(1))
        .build()
        .unwrap();

    let statistics = environment.run_generation().unwrap();

    assert_eq!(statistics.evaluation_groups, 9);
    assert_eq!(statistics.populations[0].best, Some(4.));
    assert_eq!(statistics.populations[1].best, Some(6.));
    assert_eq!(statistics.populations[1].mean, Some(5.5));
    assert_eq!(environment.generation(), 1);
    assert_eq!(environment.groups()[0].populations()[1].size(), 2);
}

#[test]
fn can_validate_builder() {
    let no_groups = EnvironmentBuilder::<TestGenome>::default().with_models(create_echo_models(1)).build();
    let no_models =
        EnvironmentBuilder::default().with_population_group(create_group(create_default_population())).build();
    let zero_log = create_builder(create_default_population()).with_log_every(0).build();

    assert_eq!(no_groups.err(), Some("at least one population group is required".into()));
    assert_eq!(no_models.err(), Some("agent model factory is required".into()));
    assert_eq!(zero_log.err(), Some("log frequency must be positive".into()));
}
