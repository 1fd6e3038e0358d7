#[cfg(test)]
#[path = "../../tests/unit/utils/random_test.rs"]
mod random_test;

use crate::utils::Float;
use rand::prelude::*;
use rand::Error;
use rand_distr::{Distribution, Normal};
use std::cell::UnsafeCell;
use std::rc::Rc;
use std::sync::Mutex;

/// Provides the way to use randomized values in generic way.
pub trait Random {
    /// Produces integral random value, uniformly distributed on the closed interval [min, max]
    fn uniform_int(&self, min: i32, max: i32) -> i32;

    /// Produces real random value, uniformly distributed on the half-open interval [min, max)
    fn uniform_real(&self, min: Float, max: Float) -> Float;

    /// Tests probability value in [0., 1.] range.
    fn is_hit(&self, probability: Float) -> bool {
        let probability = probability.clamp(0., 1.);

        if probability == 0. {
            false
        } else if probability == 1. {
            true
        } else {
            self.uniform_real(0., 1.) < probability
        }
    }

    /// Returns RNG.
    fn get_rng(&self) -> RandomGen;
}

/// A default random implementation which uses a thread local generator: results are not
/// reproducible between runs.
#[derive(Default)]
pub struct DefaultRandom {}

impl Random for DefaultRandom {
    fn uniform_int(&self, min: i32, max: i32) -> i32 {
        if min == max {
            return min;
        }

        assert!(min < max);
        self.get_rng().gen_range(min..max + 1)
    }

    fn uniform_real(&self, min: Float, max: Float) -> Float {
        if min == max {
            return min;
        }

        assert!(min < max);
        self.get_rng().gen_range(min..max)
    }

    fn get_rng(&self) -> RandomGen {
        let rng = DEFAULT_RNG.with(|t| t.clone());
        RandomGen { rng }
    }
}

thread_local! {
    static DEFAULT_RNG: Rc<UnsafeCell<SmallRng>> = Rc::new(UnsafeCell::new(SmallRng::from_entropy()));
}

/// A random implementation with explicit seed. Produces the same sequence of values when
/// it is used from a single thread.
pub struct SeededRandom {
    rng: Mutex<SmallRng>,
}

impl SeededRandom {
    /// Creates a new instance of `SeededRandom`.
    pub fn new(seed: u64) -> Self {
        Self { rng: Mutex::new(SmallRng::seed_from_u64(seed)) }
    }

    fn with_rng<R>(&self, action: impl FnOnce(&mut SmallRng) -> R) -> R {
        // NOTE a poisoned generator is still a valid generator
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        action(&mut rng)
    }
}

impl Random for SeededRandom {
    fn uniform_int(&self, min: i32, max: i32) -> i32 {
        if min == max {
            return min;
        }

        assert!(min < max);
        self.with_rng(|rng| rng.gen_range(min..max + 1))
    }

    fn uniform_real(&self, min: Float, max: Float) -> Float {
        if min == max {
            return min;
        }

        assert!(min < max);
        self.with_rng(|rng| rng.gen_range(min..max))
    }

    fn get_rng(&self) -> RandomGen {
        RandomGen::seed_from_u64(self.with_rng(|rng| rng.next_u64()))
    }
}

/// Specifies underlying random generator type.
#[derive(Clone, Debug)]
pub struct RandomGen {
    rng: Rc<UnsafeCell<SmallRng>>,
}

impl RngCore for RandomGen {
    #[inline(always)]
    fn next_u32(&mut self) -> u32 {
        // SAFETY: the generator is never shared between threads and no reference outlives the call
        let rng = unsafe { &mut *self.rng.get() };
        rng.next_u32()
    }

    #[inline(always)]
    fn next_u64(&mut self) -> u64 {
        // SAFETY: see `next_u32`
        let rng = unsafe { &mut *self.rng.get() };
        rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        // SAFETY: see `next_u32`
        let rng = unsafe { &mut *self.rng.get() };
        rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        // SAFETY: see `next_u32`
        let rng = unsafe { &mut *self.rng.get() };
        rng.try_fill_bytes(dest)
    }
}

impl SeedableRng for RandomGen {
    type Seed = <SmallRng as SeedableRng>::Seed;

    fn from_seed(seed: Self::Seed) -> Self {
        Self { rng: Rc::new(UnsafeCell::new(SmallRng::from_seed(seed))) }
    }
}

/// Samples values from parametrized distributions.
pub trait DistributionSampler {
    /// Returns a sample from normal distribution with given mean and standard deviation.
    fn normal(&self, mean: Float, std_dev: Float) -> Float;
}

impl<R: Random + ?Sized> DistributionSampler for R {
    fn normal(&self, mean: Float, std_dev: Float) -> Float {
        match Normal::new(mean, std_dev) {
            Ok(normal) => normal.sample(&mut self.get_rng()),
            Err(_) => mean,
        }
    }
}
