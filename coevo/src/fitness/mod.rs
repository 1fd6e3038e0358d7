//! Contains the fitness value type and the ways to reduce many fitness samples into one.

#[cfg(test)]
#[path = "../../tests/unit/fitness/fitness_test.rs"]
mod fitness_test;

mod aggregation;
pub use self::aggregation::*;

use crate::utils::{compare_floats, Float, GenericResult};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

/// A comparable and combinable measure of individual's performance.
///
/// Internally, it is tracked as a `(count, sum)` pair of observed scalar values, so that
/// combination stays exact, commutative and associative, while `value` returns their mean.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fitness {
    count: usize,
    sum: Float,
}

impl Fitness {
    /// Creates a new fitness from a single observation. NaN or infinite values are rejected.
    pub fn new(value: Float) -> GenericResult<Self> {
        if value.is_finite() {
            Ok(Self { count: 1, sum: value })
        } else {
            Err(format!("fitness value must be finite, got: {value}").into())
        }
    }

    /// Returns the mean of observed values.
    pub fn value(&self) -> Float {
        self.sum / self.count as Float
    }

    /// Returns amount of observations merged into this fitness.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Merges two fitness values into one.
    pub fn combine(&self, other: &Self) -> GenericResult<Self> {
        let sum = self.sum + other.sum;
        if !sum.is_finite() {
            return Err(format!("fitness combination overflow: {} + {}", self.sum, other.sum).into());
        }

        Ok(Self { count: self.count + other.count, sum })
    }

    /// Compares two fitness values, greater is better.
    pub fn total_order(&self, other: &Self) -> Ordering {
        compare_floats(self.value(), other.value())
    }
}

impl Display for Fitness {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.7}", self.value())
    }
}

/// Compares optional fitness values: a present fitness is greater than an absent one.
pub fn compare_fitness(a: Option<&Fitness>, b: Option<&Fitness>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_order(b),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

/// Sorts items by their fitness in descending order, items without fitness go last.
/// The sort is stable.
pub fn rank_descending<T, F>(items: &mut [T], fitness_fn: F)
where
    F: Fn(&T) -> Option<&Fitness>,
{
    items.sort_by(|a, b| compare_fitness(fitness_fn(b), fitness_fn(a)));
}
