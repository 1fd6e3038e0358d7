//! A breeding pipeline algebra: selection operators act as pipeline sources, variation operators
//! transform offspring produced upstream and a weighted multiplexer combines sub-pipelines.
//!
//! Every node follows the same two-step protocol within one generation:
//! - `prime_for_generation` is called once with the source population. Nodes must (re)build all
//!   per-generation state there (indices, cursors, queues): nothing is assumed to survive from
//!   the previous generation or a restart.
//! - `next_offspring` is called once per desired offspring. Some nodes produce more than one
//!   individual per internal draw and buffer the rest, so the amount of internal draws can be
//!   smaller than the amount of calls.
//!
//! Nodes carry unsynchronized mutable state, so one pipeline must be driven by a single thread.

mod crossover;
pub use self::crossover::*;

mod multiplexer;
pub use self::multiplexer::*;

mod mutation;
pub use self::mutation::*;

mod selection;
pub use self::selection::*;

use crate::individual::{Genome, Individual};
use crate::utils::GenericResult;
use std::sync::Arc;

/// A population snapshot used as a breeding source within one generation. Owned by the
/// population being reproduced and shared with its pipeline nodes until the next generation.
pub type SourcePopulation<G> = Arc<Vec<Individual<G>>>;

/// A common capability of every breeding pipeline node.
pub trait BreedingNode<G: Genome>: Send {
    /// Prepares the node to produce offspring from the given source population.
    fn prime_for_generation(&mut self, source: &SourcePopulation<G>) -> GenericResult<()>;

    /// Produces one offspring.
    fn next_offspring(&mut self) -> GenericResult<Individual<G>>;

    /// Returns amount of offspring buffered inside the node for subsequent calls.
    fn queued(&self) -> usize {
        0
    }
}

/// A type alias for a boxed breeding node.
pub type DynBreedingNode<G> = Box<dyn BreedingNode<G>>;

/// Returns source population if the node was primed and the population is not empty.
fn get_source<G: Genome>(source: &Option<SourcePopulation<G>>) -> GenericResult<&SourcePopulation<G>> {
    match source {
        Some(source) if !source.is_empty() => Ok(source),
        Some(_) => Err("cannot select from an empty source population".into()),
        None => Err("breeding node is used before it is primed with a source population".into()),
    }
}

/// Validates that probability lies in [0, 1] range.
fn check_probability(name: &str, probability: f64) -> GenericResult<()> {
    if (0. ..=1.).contains(&probability) {
        Ok(())
    } else {
        Err(format!("{name} probability must be in [0, 1] range, got: {probability}").into())
    }
}
