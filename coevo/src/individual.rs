//! Specifies an individual: an identity bearing candidate solution with lineage and fitness.

#[cfg(test)]
#[path = "../tests/unit/individual_test.rs"]
mod individual_test;

use crate::fitness::Fitness;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};

/// Maximum amount of parents recorded in lineage.
const MAX_PARENTS: usize = 2;

static NEXT_INDIVIDUAL_ID: AtomicU64 = AtomicU64::new(1);

/// A process unique identifier of an individual.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndividualId(u64);

impl IndividualId {
    /// Generates a new unique id.
    pub fn generate() -> Self {
        Self(NEXT_INDIVIDUAL_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns a raw id value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl Display for IndividualId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A genome payload of an individual. The core never inspects it, except through `Chromosome`
/// in variation operators.
pub trait Genome: Clone + Send + Sync + 'static {}

impl<T: Clone + Send + Sync + 'static> Genome for T {}

/// A genome which can be accessed as a linear sequence of genes.
pub trait Chromosome: Genome {
    /// A gene type.
    type Gene: Clone + Send + Sync;

    /// Returns genes.
    fn genes(&self) -> &[Self::Gene];

    /// Returns mutable genes.
    fn genes_mut(&mut self) -> &mut [Self::Gene];
}

impl<T: Clone + Send + Sync + 'static> Chromosome for Vec<T> {
    type Gene = T;

    fn genes(&self) -> &[Self::Gene] {
        self.as_slice()
    }

    fn genes_mut(&mut self) -> &mut [Self::Gene] {
        self.as_mut_slice()
    }
}

/// A candidate solution. Cloning keeps identity, use `offspring` to reproduce.
#[derive(Clone, Debug)]
pub struct Individual<G: Genome> {
    id: IndividualId,
    parents: Vec<IndividualId>,
    fitness: Option<Fitness>,
    samples: Vec<Fitness>,
    genome: G,
}

impl<G: Genome> Individual<G> {
    /// Creates a new individual without lineage and fitness.
    pub fn new(genome: G) -> Self {
        Self { id: IndividualId::generate(), parents: vec![], fitness: None, samples: vec![], genome }
    }

    /// Returns a copy of the individual with a fresh identity which records this individual
    /// as its parent. Fitness and samples are not inherited.
    pub fn offspring(&self) -> Self {
        Self {
            id: IndividualId::generate(),
            parents: vec![self.id],
            fitness: None,
            samples: vec![],
            genome: self.genome.clone(),
        }
    }

    /// Returns individual's id.
    pub fn id(&self) -> IndividualId {
        self.id
    }

    /// Returns ids of parents (up to two).
    pub fn parents(&self) -> &[IndividualId] {
        self.parents.as_slice()
    }

    /// Records one more parent, ignored if it is already known or lineage is full.
    pub fn add_parent(&mut self, parent: IndividualId) {
        if self.parents.len() < MAX_PARENTS && !self.parents.contains(&parent) {
            self.parents.push(parent);
        }
    }

    /// Returns aggregated fitness, if individual was evaluated.
    pub fn fitness(&self) -> Option<&Fitness> {
        self.fitness.as_ref()
    }

    /// Sets aggregated fitness.
    pub fn set_fitness(&mut self, fitness: Option<Fitness>) {
        self.fitness = fitness;
    }

    /// Returns fitness samples collected during current generation.
    pub fn samples(&self) -> &[Fitness] {
        self.samples.as_slice()
    }

    /// Adds fitness samples collected during current generation.
    pub fn add_samples(&mut self, samples: impl IntoIterator<Item = Fitness>) {
        self.samples.extend(samples)
    }

    /// Removes and returns collected samples.
    pub fn take_samples(&mut self) -> Vec<Fitness> {
        std::mem::take(&mut self.samples)
    }

    /// Returns genome.
    pub fn genome(&self) -> &G {
        &self.genome
    }

    /// Returns mutable genome.
    pub fn genome_mut(&mut self) -> &mut G {
        &mut self.genome
    }
}

/// Creates brand-new individuals on population initialization.
pub trait IndividualFactory<G: Genome>: Send + Sync {
    /// Creates a new individual.
    fn create(&self) -> Individual<G>;
}

impl<G: Genome, F> IndividualFactory<G> for F
where
    F: Fn() -> Individual<G> + Send + Sync,
{
    fn create(&self) -> Individual<G> {
        self()
    }
}
