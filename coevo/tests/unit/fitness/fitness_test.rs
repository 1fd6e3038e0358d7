use super::*;
use crate::utils::{Random, SeededRandom};
use rand::seq::SliceRandom;

fn fitness(value: Float) -> Fitness {
    Fitness::new(value).expect("finite fitness")
}

parameterized_test! {can_reject_non_finite_values, value, {
    assert!(Fitness::new(value).is_err());
}}

can_reject_non_finite_values! {
    case01_nan: Float::NAN,
    case02_positive_infinity: Float::INFINITY,
    case03_negative_infinity: Float::NEG_INFINITY,
}

#[test]
fn can_combine_values_into_mean() {
    let combined = fitness(1.).combine(&fitness(2.)).and_then(|f| f.combine(&fitness(6.))).unwrap();

    assert_eq!(combined.count(), 3);
    assert_eq!(combined.value(), 3.);
}

#[test]
fn can_detect_overflow_on_combine() {
    let result = fitness(Float::MAX).combine(&fitness(Float::MAX));

    assert!(result.is_err());
}

#[test]
fn can_compare_optional_fitness() {
    let (low, high) = (fitness(1.), fitness(2.));

    assert_eq!(compare_fitness(Some(&high), Some(&low)), Ordering::Greater);
    assert_eq!(compare_fitness(Some(&low), None), Ordering::Greater);
    assert_eq!(compare_fitness(None, Some(&low)), Ordering::Less);
    assert_eq!(compare_fitness(None, None), Ordering::Equal);
}

#[test]
fn can_rank_descending_with_absent_last() {
    let mut items = vec![(0, Some(fitness(2.))), (1, None), (2, Some(fitness(5.))), (3, Some(fitness(2.)))];

    rank_descending(&mut items, |(_, fitness)| fitness.as_ref());

    assert_eq!(items.iter().map(|(index, _)| *index).collect::<Vec<_>>(), vec![2, 0, 3, 1]);
}

#[test]
fn can_aggregate_with_mean() {
    let samples = vec![fitness(1.), fitness(2.), fitness(3.), fitness(6.)];

    let result = MeanAggregator.aggregate(samples.as_slice()).unwrap().unwrap();

    assert_eq!(result.value(), 3.);
    assert_eq!(result.count(), 4);
}

#[test]
fn can_aggregate_with_best_and_worst() {
    let samples = vec![fitness(3.), fitness(-1.), fitness(7.)];

    assert_eq!(BestAggregator.aggregate(samples.as_slice()).unwrap().map(|f| f.value()), Some(7.));
    assert_eq!(WorstAggregator.aggregate(samples.as_slice()).unwrap().map(|f| f.value()), Some(-1.));
}

#[test]
fn can_return_none_for_no_samples() {
    assert_eq!(MeanAggregator.aggregate(&[]).unwrap(), None);
    assert_eq!(BestAggregator.aggregate(&[]).unwrap(), None);
    assert_eq!(WorstAggregator.aggregate(&[]).unwrap(), None);
}

#[test]
fn can_aggregate_in_any_order_and_grouping() {
    let random = SeededRandom::new(11);
    let samples = (0..50).map(|_| fitness(random.uniform_real(-100., 100.))).collect::<Vec<_>>();
    let expected = MeanAggregator.aggregate(samples.as_slice()).unwrap().unwrap().value();

    (0..20).for_each(|_| {
        let mut shuffled = samples.clone();
        shuffled.shuffle(&mut random.get_rng());
        let split = random.uniform_int(1, 49) as usize;

        let left = MeanAggregator.aggregate(&shuffled[..split]).unwrap().unwrap();
        let right = MeanAggregator.aggregate(&shuffled[split..]).unwrap().unwrap();
        let actual = MeanAggregator.aggregate(&[right, left]).unwrap().unwrap().value();

        assert_float_eq!(actual, expected, 1E-9);
    });
}

#[test]
fn can_display_fitness() {
    assert_eq!(fitness(0.5).to_string(), "0.5000000");
}
