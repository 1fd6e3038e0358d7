#[cfg(test)]
#[path = "../../tests/unit/evaluation/factory_test.rs"]
mod factory_test;

use super::*;
use crate::utils::Runtime;
use rand::seq::SliceRandom;

/// Decides how agents of all populations are batched into evaluation groups for one generation.
pub trait EvaluationGroupFactory<G: Genome>: Send + Sync {
    /// Creates evaluation groups from the roster: individuals of every population, one slice
    /// per population. Every group gets its own model created by `models`.
    fn create_groups<'a>(
        &self,
        roster: &[&'a [Individual<G>]],
        models: &dyn AgentModelFactory<G>,
        runtime: &Runtime,
    ) -> GenericResult<Vec<EvaluationGroup<'a, G>>>;
}

/// Flattens all agents into one list, shuffles it and partitions it into groups of fixed size.
/// When the list is exhausted, it is reshuffled and wrapped around, so that every agent appears
/// in at least `times_through` groups. A group never contains the same agent twice.
pub struct ShuffledGroupFactory {
    group_size: usize,
    times_through: usize,
}

impl ShuffledGroupFactory {
    /// Creates a new instance of `ShuffledGroupFactory`.
    pub fn new(group_size: usize, times_through: usize) -> GenericResult<Self> {
        check_positive("group size", group_size)?;
        check_positive("times through", times_through)?;

        Ok(Self { group_size, times_through })
    }
}

impl<G: Genome> EvaluationGroupFactory<G> for ShuffledGroupFactory {
    fn create_groups<'a>(
        &self,
        roster: &[&'a [Individual<G>]],
        models: &dyn AgentModelFactory<G>,
        runtime: &Runtime,
    ) -> GenericResult<Vec<EvaluationGroup<'a, G>>> {
        let mut agents = flatten_roster(roster);
        let total_agents = agents.len();
        if total_agents == 0 {
            return Ok(vec![]);
        }

        let group_size = if self.group_size > total_agents {
            runtime.warn(&format!(
                "evaluation group size {} exceeds amount of agents {total_agents}, shrinking to {total_agents}",
                self.group_size
            ));
            total_agents
        } else {
            self.group_size
        };

        let total_groups = (total_agents * self.times_through).div_ceil(group_size);

        agents.shuffle(&mut runtime.random.get_rng());
        let mut cursor = 0;

        Ok((0..total_groups)
            .map(|group_id| {
                let mut members: Vec<&'a Individual<G>> = Vec::with_capacity(group_size);

                while members.len() < group_size {
                    if cursor == total_agents {
                        agents.shuffle(&mut runtime.random.get_rng());
                        // agents already taken by this group go last, so it never gets a duplicate
                        agents.sort_by_key(|agent| members.iter().any(|member| member.id() == agent.id()));
                        cursor = 0;
                    }

                    members.push(agents[cursor]);
                    cursor += 1;
                }

                EvaluationGroup::new(group_id, members, models.create(group_id))
            })
            .collect())
    }
}

/// Puts all agents into one group `times_through` times, shuffling the order of agents in each.
pub struct SingleGroupFactory {
    times_through: usize,
}

impl SingleGroupFactory {
    /// Creates a new instance of `SingleGroupFactory`.
    pub fn new(times_through: usize) -> GenericResult<Self> {
        check_positive("times through", times_through)?;

        Ok(Self { times_through })
    }
}

impl<G: Genome> EvaluationGroupFactory<G> for SingleGroupFactory {
    fn create_groups<'a>(
        &self,
        roster: &[&'a [Individual<G>]],
        models: &dyn AgentModelFactory<G>,
        runtime: &Runtime,
    ) -> GenericResult<Vec<EvaluationGroup<'a, G>>> {
        let agents = flatten_roster(roster);
        if agents.is_empty() {
            return Ok(vec![]);
        }

        Ok((0..self.times_through)
            .map(|group_id| {
                let mut members = agents.clone();
                members.shuffle(&mut runtime.random.get_rng());

                EvaluationGroup::new(group_id, members, models.create(group_id))
            })
            .collect())
    }
}

fn flatten_roster<'a, G: Genome>(roster: &[&'a [Individual<G>]]) -> Vec<&'a Individual<G>> {
    roster.iter().flat_map(|individuals| individuals.iter()).collect()
}

fn check_positive(name: &str, value: usize) -> GenericResult<()> {
    if value > 0 { Ok(()) } else { Err(format!("{name} must be positive").into()) }
}
