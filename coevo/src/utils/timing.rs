use crate::utils::Float;
use std::time::Instant;

/// Implements performance timer functionality.
#[derive(Clone, Debug)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Starts a new timer.
    pub fn start() -> Self {
        Self { start: Instant::now() }
    }

    /// Returns elapsed whole seconds.
    pub fn elapsed_secs(&self) -> u64 {
        self.start.elapsed().as_secs()
    }

    /// Returns elapsed seconds as a floating value.
    pub fn elapsed_secs_as_float(&self) -> Float {
        self.start.elapsed().as_secs_f64() as Float
    }
}
