use super::*;
use crate::helpers::breeding::*;

parameterized_test! {can_calculate_elites, (quota, population_size, expected), {
    assert_eq!(quota.elites(population_size), expected);
}}

can_calculate_elites! {
    case01_count: (EliteQuota::Count(2), 5, 2),
    case02_count_capped: (EliteQuota::Count(10), 5, 5),
    case03_proportion: (EliteQuota::Proportion(0.4), 5, 2),
    case04_proportion_min_one: (EliteQuota::Proportion(0.01), 5, 1),
    case05_proportion_all: (EliteQuota::Proportion(1.), 5, 5),
    case06_empty: (EliteQuota::Count(3), 0, 0),
}

parameterized_test! {can_validate_quota, (quota, is_ok), {
    assert_eq!(ElitismSelector::<TestGenome>::new(quota).is_ok(), is_ok);
}}

can_validate_quota! {
    case01: (EliteQuota::Count(0), false),
    case02: (EliteQuota::Proportion(0.), false),
    case03: (EliteQuota::Proportion(1.5), false),
    case04: (EliteQuota::Proportion(Float::NAN), false),
    case05: (EliteQuota::Count(1), true),
    case06: (EliteQuota::Proportion(0.5), true),
}

#[test]
fn can_cycle_through_elites_deterministically() {
    let source = create_source_with_fitness(&[5., 1., 4., 3., 2.]);
    let mut selector = ElitismSelector::new(EliteQuota::Count(2)).unwrap();

    selector.prime_for_generation(&source).unwrap();
    let origins = (0..5).map(|_| get_origin(&selector.next_offspring().unwrap())).collect::<Vec<_>>();

    assert_eq!(selector.elites(), &[0, 2]);
    assert_eq!(origins, vec![0, 2, 0, 2, 0]);
}

#[test]
fn can_prefer_individuals_with_fitness() {
    let source = create_source(&[None, Some(-10.), None]);
    let mut selector = ElitismSelector::new(EliteQuota::Count(1)).unwrap();

    selector.prime_for_generation(&source).unwrap();

    assert_eq!(get_origin(&selector.next_offspring().unwrap()), 1);
}

#[test]
fn can_reset_cursor_on_prime() {
    let source = create_source_with_fitness(&[1., 3., 2.]);
    let mut selector = ElitismSelector::new(EliteQuota::Proportion(1.)).unwrap();

    selector.prime_for_generation(&source).unwrap();
    assert_eq!(get_origin(&selector.next_offspring().unwrap()), 1);
    assert_eq!(get_origin(&selector.next_offspring().unwrap()), 2);

    selector.prime_for_generation(&source).unwrap();
    assert_eq!(get_origin(&selector.next_offspring().unwrap()), 1);
}

#[test]
fn can_fail_on_empty_source() {
    let mut selector = ElitismSelector::<TestGenome>::new(EliteQuota::Count(1)).unwrap();

    selector.prime_for_generation(&create_source(&[])).unwrap();

    assert!(selector.next_offspring().is_err());
}
