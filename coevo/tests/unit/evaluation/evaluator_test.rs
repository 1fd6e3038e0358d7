use super::*;
use crate::helpers::breeding::*;
use crate::helpers::evaluation::*;
use crate::utils::Float;

/// Never stops on its own.
struct EndlessModel {
    agents: usize,
}

impl AgentModel<TestGenome> for EndlessModel {
    fn add_agent(&mut self, _: AgentId, _: &Individual<TestGenome>) {
        self.agents += 1;
    }

    fn step(&mut self) -> bool {
        true
    }

    fn fitness(&self, agent: AgentId) -> GenericResult<Fitness> {
        if agent.0 < self.agents { Fitness::new(1.) } else { Err("unknown agent".into()) }
    }
}

fn create_individuals(values: &[Float]) -> Vec<Individual<TestGenome>> {
    values.iter().map(|value| create_individual(vec![*value], None)).collect()
}

fn create_groups<'a>(
    individuals: &'a [Individual<TestGenome>],
    amount: usize,
    model_fn: &dyn Fn() -> Box<dyn AgentModel<TestGenome>>,
) -> Vec<EvaluationGroup<'a, TestGenome>> {
    (0..amount).map(|id| EvaluationGroup::new(id, individuals.iter().collect(), model_fn())).collect()
}

fn get_evaluators(max_steps: Option<usize>) -> Vec<Box<dyn Evaluator<TestGenome>>> {
    vec![
        Box::new(SequentialEvaluator::new(max_steps)),
        Box::new(ParallelEvaluator::new(max_steps)),
        Box::new(ParallelEvaluator::new_with_threads(max_steps, 2).unwrap()),
    ]
}

#[test]
fn can_evaluate_all_groups() {
    let individuals = create_individuals(&[1., 2., 3.]);

    get_evaluators(None).into_iter().for_each(|evaluator| {
        let model_factory = || Box::new(EchoModel::new(5)) as Box<dyn AgentModel<TestGenome>>;
        let groups = create_groups(individuals.as_slice(), 8, &model_factory);

        let groups = evaluator.evaluate(groups).unwrap();

        assert_eq!(groups.len(), 8);
        assert!(groups.iter().all(|group| group.is_evaluated() && group.steps() == 5));
        assert!(groups.iter().all(|group| group.fitness(AgentId(2)).map(|fitness| fitness.value()) == Some(3.)));
    });
}

#[test]
fn can_bound_model_run_with_max_steps() {
    let individuals = create_individuals(&[1.]);

    get_evaluators(Some(7)).into_iter().for_each(|evaluator| {
        let model_factory = || Box::new(EndlessModel { agents: 0 }) as Box<dyn AgentModel<TestGenome>>;
        let groups = create_groups(individuals.as_slice(), 3, &model_factory);

        let groups = evaluator.evaluate(groups).unwrap();

        assert!(groups.iter().all(|group| group.steps() == 7));
    });
}

#[test]
fn can_propagate_evaluation_error() {
    let individuals = create_individuals(&[1., 2.]);

    get_evaluators(None).into_iter().for_each(|evaluator| {
        let model_factory = || Box::new(EchoModel::new(1)) as Box<dyn AgentModel<TestGenome>>;
        let mut groups = create_groups(individuals.as_slice(), 2, &model_factory);
        groups[1].run(None).unwrap();

        assert!(evaluator.evaluate(groups).is_err());
    });
}
