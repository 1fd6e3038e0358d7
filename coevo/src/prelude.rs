//! This module reimports a common used types.

pub use crate::breeding::BreedingNode;
pub use crate::breeding::DynBreedingNode;
pub use crate::breeding::SourcePopulation;

pub use crate::environment::DataSink;
pub use crate::environment::Environment;
pub use crate::environment::EnvironmentBuilder;
pub use crate::environment::GenerationStatistics;

pub use crate::evaluation::AgentId;
pub use crate::evaluation::AgentModel;
pub use crate::evaluation::AgentModelFactory;
pub use crate::evaluation::ModelReport;

pub use crate::fitness::Fitness;
pub use crate::fitness::FitnessAggregator;

pub use crate::individual::Chromosome;
pub use crate::individual::Genome;
pub use crate::individual::Individual;
pub use crate::individual::IndividualFactory;

pub use crate::population::Population;
pub use crate::population::PopulationGroup;

pub use crate::termination::Termination;

pub use crate::utils::compare_floats;
pub use crate::utils::DefaultRandom;
pub use crate::utils::Float;
pub use crate::utils::GenericError;
pub use crate::utils::GenericResult;
pub use crate::utils::InfoLogger;
pub use crate::utils::Parallelism;
pub use crate::utils::Runtime;
pub use crate::utils::SeededRandom;
pub use crate::utils::{Random, RandomGen};
