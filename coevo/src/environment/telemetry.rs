//! A module which provides generation statistics, data sink abstraction and simple logging.

use crate::evaluation::ModelReport;
use crate::fitness::Fitness;
use crate::individual::Genome;
use crate::population::Population;
use crate::utils::{Float, Timer};
use std::fmt::Write;

/// Keeps essential information about population state.
#[derive(Clone, Debug, PartialEq)]
pub struct PopulationSummary {
    /// Population name.
    pub name: String,
    /// Amount of individuals.
    pub size: usize,
    /// Target size for the next generation.
    pub target_size: Float,
    /// The best aggregated fitness.
    pub best: Option<Float>,
    /// The mean of aggregated fitness values.
    pub mean: Option<Float>,
}

impl PopulationSummary {
    /// Creates a summary of the given population.
    pub fn new<G: Genome>(population: &Population<G>) -> Self {
        let values = population
            .individuals()
            .iter()
            .filter_map(|individual| individual.fitness().map(Fitness::value))
            .collect::<Vec<_>>();

        let best = values.iter().copied().reduce(Float::max);
        let mean = if values.is_empty() { None } else { Some(values.iter().sum::<Float>() / values.len() as Float) };

        Self {
            name: population.name().to_string(),
            size: population.size(),
            target_size: population.target_size(),
            best,
            mean,
        }
    }
}

/// Encapsulates statistics about one generation.
#[derive(Clone, Debug)]
pub struct GenerationStatistics {
    /// Generation index, starts from zero.
    pub generation: usize,
    /// Amount of evaluation groups run.
    pub evaluation_groups: usize,
    /// Populations state after fitness aggregation and balancing.
    pub populations: Vec<PopulationSummary>,
    /// Seconds since environment creation.
    pub elapsed: Float,
}

/// Receives per generation data. Never required for correctness.
pub trait DataSink: Send {
    /// Called once per generation with its statistics and opaque per model data.
    fn on_generation(&mut self, statistics: &GenerationStatistics, reports: Vec<ModelReport>);
}

/// Formats generation statistics as a log line.
pub(crate) fn format_statistics(statistics: &GenerationStatistics, timer: &Timer) -> String {
    let populations = statistics.populations.iter().fold(String::new(), |mut res, summary| {
        let format_value = |value: Option<Float>| value.map_or("-".to_string(), |value| format!("{value:.7}"));
        let _ = write!(
            &mut res,
            " [{}: size={}, best={}, mean={}]",
            summary.name,
            summary.size,
            format_value(summary.best),
            format_value(summary.mean)
        );

        res
    });

    format!(
        "[{}s] generation {} evaluated in {} group(s):{populations}",
        timer.elapsed_secs(),
        statistics.generation,
        statistics.evaluation_groups
    )
}
