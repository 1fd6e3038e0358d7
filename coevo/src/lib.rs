//! This crate implements the core of a coevolutionary computation engine: populations of
//! individuals are evaluated in batches against simulation models, observed fitness samples are
//! aggregated per individual and the next generation is produced by composable breeding pipelines
//! of selection and variation operators.
//!
//! The main building blocks are:
//! - [`breeding`]: the pipeline algebra (selectors, crossover, mutation and weighted multiplexer)
//! - [`evaluation`]: evaluation groups, agent models and evaluators
//! - [`population`]: populations, population groups and balancers
//! - [`environment`]: the generation loop which ties everything together
//!
//! See [`example`] for a small end-to-end setup.

#![warn(missing_docs)]

#[cfg(test)]
#[path = "../tests/helpers/mod.rs"]
#[macro_use]
pub mod helpers;

pub mod breeding;
pub mod config;
pub mod environment;
pub mod evaluation;
pub mod example;
pub mod fitness;
pub mod individual;
pub mod population;
pub mod prelude;
pub mod termination;
pub mod utils;
