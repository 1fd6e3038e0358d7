#[cfg(test)]
#[path = "../../../tests/unit/breeding/selection/elitism_test.rs"]
mod elitism_test;

use super::*;
use crate::fitness::rank_descending;
use crate::utils::Float;

/// Specifies how many elites are kept.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EliteQuota {
    /// An absolute amount of elites.
    Count(usize),
    /// A proportion of the source population size, in (0, 1] range.
    Proportion(Float),
}

impl EliteQuota {
    /// Returns amount of elites for given population size, at least one elite is always kept.
    pub fn elites(&self, population_size: usize) -> usize {
        let elites = match *self {
            Self::Count(count) => count,
            Self::Proportion(proportion) => (population_size as Float * proportion).round() as usize,
        };

        elites.max(1).min(population_size)
    }
}

/// Clones the best individuals of the source population. Elites are returned in rank order
/// and the cursor wraps around when more offspring are requested than elites exist.
pub struct ElitismSelector<G: Genome> {
    quota: EliteQuota,
    source: Option<SourcePopulation<G>>,
    elites: Vec<usize>,
    cursor: usize,
}

impl<G: Genome> ElitismSelector<G> {
    /// Creates a new instance of `ElitismSelector`.
    pub fn new(quota: EliteQuota) -> GenericResult<Self> {
        match quota {
            EliteQuota::Count(0) => return Err("amount of elites must be positive".into()),
            EliteQuota::Proportion(proportion) if !(proportion > 0. && proportion <= 1.) => {
                return Err(format!("proportion of elites must be in (0, 1] range, got: {proportion}").into());
            }
            _ => {}
        }

        Ok(Self { quota, source: None, elites: vec![], cursor: 0 })
    }

    /// Returns indices of the elites in the source population, the best first.
    pub fn elites(&self) -> &[usize] {
        self.elites.as_slice()
    }
}

impl<G: Genome> BreedingNode<G> for ElitismSelector<G> {
    fn prime_for_generation(&mut self, source: &SourcePopulation<G>) -> GenericResult<()> {
        let mut ranked = source.iter().enumerate().collect::<Vec<_>>();
        rank_descending(&mut ranked, |(_, individual)| individual.fitness());

        self.elites = ranked.into_iter().take(self.quota.elites(source.len())).map(|(index, _)| index).collect();
        self.cursor = 0;
        self.source = Some(source.clone());

        Ok(())
    }

    fn next_offspring(&mut self) -> GenericResult<Individual<G>> {
        let source = get_source(&self.source)?;
        let index = *self.elites.get(self.cursor).ok_or_else(|| "no elites are selected".to_string())?;

        self.cursor = (self.cursor + 1) % self.elites.len();

        Ok(source[index].offspring())
    }
}
