#[cfg(test)]
#[path = "../../tests/unit/population/group_test.rs"]
mod group_test;

use super::*;
use crate::utils::Runtime;

/// Owns several populations which share a declared total capacity. A balancer decides how the
/// capacity is split between populations for the next generation.
pub struct PopulationGroup<G: Genome> {
    name: String,
    populations: Vec<Population<G>>,
    capacity: usize,
    balancer: Option<Box<dyn PopulationBalancer<G>>>,
    adaptation_rate: Float,
}

impl<G: Genome> PopulationGroup<G> {
    /// Creates a new instance of `PopulationGroup`.
    pub fn new(name: &str, populations: Vec<Population<G>>, capacity: usize) -> GenericResult<Self> {
        if populations.is_empty() {
            return Err(format!("population group '{name}' has no populations").into());
        }

        Ok(Self { name: name.to_string(), populations, capacity, balancer: None, adaptation_rate: 1. })
    }

    /// Sets a balancer used to redistribute capacity between populations.
    pub fn with_balancer(mut self, balancer: Box<dyn PopulationBalancer<G>>) -> Self {
        self.balancer = Some(balancer);
        self
    }

    /// Sets adaptation rate in (0, 1] range: the next target size is moved from the current one
    /// towards the balanced one by this ratio. Default is 1 (immediate).
    pub fn with_adaptation_rate(mut self, adaptation_rate: Float) -> GenericResult<Self> {
        if !(adaptation_rate > 0. && adaptation_rate <= 1.) {
            return Err(format!("adaptation rate must be in (0, 1] range, got: {adaptation_rate}").into());
        }

        self.adaptation_rate = adaptation_rate;
        Ok(self)
    }

    /// Returns group name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns declared total capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns populations.
    pub fn populations(&self) -> &[Population<G>] {
        self.populations.as_slice()
    }

    /// Returns mutable populations.
    pub fn populations_mut(&mut self) -> &mut [Population<G>] {
        self.populations.as_mut_slice()
    }

    /// Recomputes target sizes of populations from balancer's weights. Skipped when the group
    /// has a single population or no balancer. Returns true if target sizes were updated.
    pub fn balance(&mut self, runtime: &Runtime) -> GenericResult<bool> {
        let Some(balancer) = self.balancer.as_ref().filter(|_| self.populations.len() > 1) else {
            return Ok(false);
        };

        let weights = balancer.weights(self.populations.as_slice(), runtime)?;
        if weights.len() != self.populations.len() {
            return Err(format!(
                "balancer returned {} weights for {} populations in group '{}'",
                weights.len(),
                self.populations.len(),
                self.name
            )
            .into());
        }

        let total = weights.iter().sum::<Float>();
        if !total.is_finite() || total <= 0. {
            runtime.warn(&format!("population group '{}' has no balance weights, sizes are kept", self.name));
            return Ok(false);
        }

        let capacity = self.capacity as Float;
        let rate = self.adaptation_rate;
        self.populations.iter_mut().zip(weights).try_for_each(|(population, weight)| {
            let balanced = capacity * weight / total;
            let current = population.target_size();

            population.set_target_size(current + rate * (balanced - current))
        })?;

        Ok(true)
    }
}
