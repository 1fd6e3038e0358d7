#[cfg(test)]
#[path = "../../../tests/unit/breeding/selection/tournament_test.rs"]
mod tournament_test;

use super::*;
use crate::fitness::rank_descending;
use crate::utils::Runtime;
use std::collections::VecDeque;

/// Selects individuals by running tournaments: `tournament_size` entrants are drawn uniformly
/// with replacement, ranked by fitness and the best one is returned. Runners-up up to
/// `top_individuals` rank are queued and returned by subsequent calls before a new tournament
/// is run.
pub struct TournamentSelector<G: Genome> {
    runtime: Arc<Runtime>,
    tournament_size: usize,
    top_individuals: usize,
    effective_size: usize,
    source: Option<SourcePopulation<G>>,
    queue: VecDeque<Individual<G>>,
}

impl<G: Genome> TournamentSelector<G> {
    /// Creates a new instance of `TournamentSelector`.
    pub fn new(runtime: Arc<Runtime>, tournament_size: usize, top_individuals: usize) -> GenericResult<Self> {
        check_tournament_parameters(tournament_size, top_individuals)?;

        Ok(Self {
            runtime,
            tournament_size,
            top_individuals,
            effective_size: tournament_size,
            source: None,
            queue: VecDeque::with_capacity(top_individuals - 1),
        })
    }

    /// Returns tournament size used within the current generation.
    pub fn effective_size(&self) -> usize {
        self.effective_size
    }

    fn run_tournament(&mut self) -> GenericResult<Individual<G>> {
        let source = get_source(&self.source)?;

        let mut entrants = (0..self.effective_size)
            .map(|_| &source[self.runtime.random_index(source.len())])
            .collect::<Vec<_>>();
        rank_descending(&mut entrants, |individual| individual.fitness());

        let mut winners = entrants.into_iter().take(self.top_individuals).map(|individual| individual.offspring());
        let best = winners.next().ok_or_else(|| "tournament has no entrants".to_string())?;
        self.queue.extend(winners);

        Ok(best)
    }
}

impl<G: Genome> BreedingNode<G> for TournamentSelector<G> {
    fn prime_for_generation(&mut self, source: &SourcePopulation<G>) -> GenericResult<()> {
        self.queue.clear();

        let missing = source.iter().filter(|individual| individual.fitness().is_none()).count();
        if missing > 0 && missing == source.len() {
            self.source = None;
            return Err("tournament selection requires at least one individual with fitness".into());
        }
        if missing > 0 {
            self.runtime.warn(&format!("{missing} individual(s) without fitness ranked last in tournament selection"));
        }

        self.effective_size = shrink_tournament_size(self.runtime.as_ref(), self.tournament_size, source.len());
        self.source = Some(source.clone());

        Ok(())
    }

    fn next_offspring(&mut self) -> GenericResult<Individual<G>> {
        match self.queue.pop_front() {
            Some(runner_up) => Ok(runner_up),
            None => self.run_tournament(),
        }
    }

    fn queued(&self) -> usize {
        self.queue.len()
    }
}

/// Checks tournament parameters: at least one winner which is fewer than entrants.
pub(crate) fn check_tournament_parameters(tournament_size: usize, top_individuals: usize) -> GenericResult<()> {
    if tournament_size == 0 {
        return Err("tournament size must be positive".into());
    }

    if top_individuals == 0 || top_individuals >= tournament_size {
        return Err(format!(
            "tournament top individuals must be in [1, {tournament_size}) range, got: {top_individuals}"
        )
        .into());
    }

    Ok(())
}

/// Shrinks tournament size to the amount of available individuals, warning when it happens.
pub(crate) fn shrink_tournament_size(runtime: &Runtime, tournament_size: usize, available: usize) -> usize {
    if tournament_size > available && available > 0 {
        runtime.warn(&format!(
            "tournament size {tournament_size} exceeds population size {available}, shrinking to {available}"
        ));
        available
    } else {
        tournament_size
    }
}
