//! Populations of individuals, their reproduction through breeding pipelines and the way to
//! redistribute capacity between populations in a group.

#[cfg(test)]
#[path = "../../tests/unit/population/population_test.rs"]
mod population_test;

mod balancer;
pub use self::balancer::*;

mod group;
pub use self::group::*;

use crate::breeding::{DynBreedingNode, SourcePopulation};
use crate::individual::{Genome, Individual, IndividualFactory};
use crate::utils::{Float, GenericResult};
use std::sync::Arc;

/// Specifies on which generations a population breeds: at generation `g` iff `g >= warmup`
/// and `(g - warmup) % interval == 0`. Skipped generations let fitness estimates stabilize.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EvolveCycle {
    /// Amount of generations to skip at the start.
    pub warmup: usize,
    /// Breeding happens every `interval` generations after warmup.
    pub interval: usize,
}

impl EvolveCycle {
    /// Creates a new instance of `EvolveCycle`.
    pub fn new(warmup: usize, interval: usize) -> GenericResult<Self> {
        if interval == 0 {
            return Err("evolve cycle interval must be positive".into());
        }

        Ok(Self { warmup, interval })
    }

    /// Returns true if population should breed at given generation.
    pub fn is_breeding(&self, generation: usize) -> bool {
        generation >= self.warmup && (generation - self.warmup) % self.interval == 0
    }
}

/// An ordered collection of individuals which is replaced wholesale by its breeding pipeline
/// every generation.
pub struct Population<G: Genome> {
    name: String,
    individuals: Vec<Individual<G>>,
    pipeline: DynBreedingNode<G>,
    target_size: Float,
    evolve_cycle: Option<EvolveCycle>,
}

impl<G: Genome> Population<G> {
    /// Creates a new empty population.
    pub fn new(name: &str, pipeline: DynBreedingNode<G>, target_size: Float) -> GenericResult<Self> {
        check_target_size(target_size)?;

        Ok(Self { name: name.to_string(), individuals: vec![], pipeline, target_size, evolve_cycle: None })
    }

    /// Sets evolve cycle gate.
    pub fn with_evolve_cycle(mut self, evolve_cycle: Option<EvolveCycle>) -> Self {
        self.evolve_cycle = evolve_cycle;
        self
    }

    /// Fills population with brand-new individuals up to its target size.
    pub fn initialize(&mut self, factory: &dyn IndividualFactory<G>) {
        self.individuals = (0..self.materialized_size()).map(|_| factory.create()).collect();
    }

    /// Returns population name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns amount of individuals.
    pub fn size(&self) -> usize {
        self.individuals.len()
    }

    /// Returns individuals.
    pub fn individuals(&self) -> &[Individual<G>] {
        self.individuals.as_slice()
    }

    /// Returns mutable individuals.
    pub fn individuals_mut(&mut self) -> &mut [Individual<G>] {
        self.individuals.as_mut_slice()
    }

    /// Replaces all individuals.
    pub fn set_individuals(&mut self, individuals: Vec<Individual<G>>) {
        self.individuals = individuals;
    }

    /// Returns target size which can be fractional.
    pub fn target_size(&self) -> Float {
        self.target_size
    }

    /// Sets target size used by the next reproduction.
    pub fn set_target_size(&mut self, target_size: Float) -> GenericResult<()> {
        check_target_size(target_size)?;
        self.target_size = target_size;

        Ok(())
    }

    /// Returns target size rounded to amount of individuals.
    pub fn materialized_size(&self) -> usize {
        self.target_size.round() as usize
    }

    /// Returns true if population breeds at given generation.
    pub fn is_breeding(&self, generation: usize) -> bool {
        self.evolve_cycle.is_none_or(|cycle| cycle.is_breeding(generation))
    }

    /// Replaces individuals with offspring produced by the breeding pipeline. Returns false if
    /// breeding is skipped at this generation. On error, the previous individuals are kept.
    pub fn reproduce(&mut self, generation: usize) -> GenericResult<bool> {
        if !self.is_breeding(generation) {
            return Ok(false);
        }

        let size = self.materialized_size();
        if size == 0 {
            self.individuals.clear();
            return Ok(true);
        }

        let source: SourcePopulation<G> = Arc::new(std::mem::take(&mut self.individuals));

        let offspring = self
            .pipeline
            .prime_for_generation(&source)
            .and_then(|_| (0..size).map(|_| self.pipeline.next_offspring()).collect::<GenericResult<Vec<_>>>());

        match offspring {
            Ok(offspring) => {
                self.individuals = offspring;
                Ok(true)
            }
            Err(err) => {
                self.individuals = Arc::try_unwrap(source).unwrap_or_else(|source| source.as_ref().clone());
                Err(err.context(format!("cannot reproduce population '{}'", self.name).as_str()))
            }
        }
    }

    /// Returns amount of offspring buffered in the pipeline.
    pub fn queued(&self) -> usize {
        self.pipeline.queued()
    }
}

fn check_target_size(target_size: Float) -> GenericResult<()> {
    if target_size.is_finite() && target_size >= 0. {
        Ok(())
    } else {
        Err(format!("population target size must be non-negative, got: {target_size}").into())
    }
}
