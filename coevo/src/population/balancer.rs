#[cfg(test)]
#[path = "../../tests/unit/population/balancer_test.rs"]
mod balancer_test;

use super::*;
use crate::breeding::{check_tournament_parameters, shrink_tournament_size};
use crate::fitness::rank_descending;
use crate::utils::Runtime;

/// Computes relative weights of populations in a group, one weight per population. The caller
/// normalizes them into target sizes.
pub trait PopulationBalancer<G: Genome>: Send + Sync {
    /// Returns weights of given populations.
    fn weights(&self, populations: &[Population<G>], runtime: &Runtime) -> GenericResult<Vec<Float>>;
}

/// Balances populations by running tournaments over the pooled individuals of all populations:
/// every winner credits a win to the population which owns it.
pub struct TournamentBalancer {
    tournament_size: usize,
    top_individuals: usize,
}

impl TournamentBalancer {
    /// Creates a new instance of `TournamentBalancer`.
    pub fn new(tournament_size: usize, top_individuals: usize) -> GenericResult<Self> {
        check_tournament_parameters(tournament_size, top_individuals)?;

        Ok(Self { tournament_size, top_individuals })
    }
}

impl<G: Genome> PopulationBalancer<G> for TournamentBalancer {
    fn weights(&self, populations: &[Population<G>], runtime: &Runtime) -> GenericResult<Vec<Float>> {
        // NOTE offsets[i] is the pooled index of the first individual of population i
        let offsets = populations
            .iter()
            .scan(0_usize, |total, population| {
                let offset = *total;
                *total += population.size();
                Some(offset)
            })
            .collect::<Vec<_>>();
        let total_individuals = populations.iter().map(|population| population.size()).sum::<usize>();

        let mut wins = vec![0_usize; populations.len()];
        if total_individuals == 0 {
            return Ok(wins.into_iter().map(|win| win as Float).collect());
        }

        let tournament_size = shrink_tournament_size(runtime, self.tournament_size, total_individuals);
        let get_entrant = |pooled_index: usize| {
            let owner = offsets.partition_point(|offset| *offset <= pooled_index) - 1;
            (owner, &populations[owner].individuals()[pooled_index - offsets[owner]])
        };

        (0..total_individuals).for_each(|_| {
            let mut entrants =
                (0..tournament_size).map(|_| get_entrant(runtime.random_index(total_individuals))).collect::<Vec<_>>();
            rank_descending(&mut entrants, |(_, individual)| individual.fitness());

            entrants.iter().take(self.top_individuals).for_each(|(owner, _)| wins[*owner] += 1);
        });

        Ok(wins.into_iter().map(|win| win as Float).collect())
    }
}
