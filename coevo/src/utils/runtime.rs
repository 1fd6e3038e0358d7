use crate::utils::{DefaultRandom, Random, SeededRandom};
use std::sync::Arc;

/// A logger type used to write information messages.
pub type InfoLogger = Arc<dyn Fn(&str) + Send + Sync>;

/// Specifies whether work which is safe to be split between threads is actually split.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Parallelism {
    /// Everything runs on the calling thread. Combined with `SeededRandom`, gives reproducible runs.
    Sequential,
    /// Independent units of work run on rayon's global pool.
    #[default]
    Full,
}

/// Keeps track of runtime shared services: random source, logger and parallelism settings.
#[derive(Clone)]
pub struct Runtime {
    /// A random source.
    pub random: Arc<dyn Random + Send + Sync>,
    /// An information logger.
    pub logger: InfoLogger,
    /// Parallelism settings.
    pub parallelism: Parallelism,
}

impl Runtime {
    /// Creates a new instance of `Runtime`.
    pub fn new(random: Arc<dyn Random + Send + Sync>, logger: InfoLogger, parallelism: Parallelism) -> Self {
        Self { random, logger, parallelism }
    }

    /// Creates a runtime which is reproducible for the same seed: it uses a seeded random
    /// source and runs everything sequentially.
    pub fn new_with_seed(seed: u64) -> Self {
        Self { random: Arc::new(SeededRandom::new(seed)), parallelism: Parallelism::Sequential, ..Self::default() }
    }

    /// Writes an information message.
    pub fn info(&self, message: &str) {
        (self.logger)(message)
    }

    /// Writes a warning message.
    pub fn warn(&self, message: &str) {
        (self.logger)(format!("warning: {message}").as_str())
    }

    /// Returns a random index in `[0, size)` range. Size is expected to be positive.
    pub fn random_index(&self, size: usize) -> usize {
        self.random.uniform_int(0, size as i32 - 1) as usize
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self {
            random: Arc::new(DefaultRandom::default()),
            logger: Arc::new(|msg: &str| println!("{msg}")),
            parallelism: Parallelism::default(),
        }
    }
}
