use crate::utils::{Float, Random, RandomGen};
use rand::SeedableRng;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Returns scripted values in the order they are given.
pub struct FakeRandom {
    ints: Mutex<VecDeque<i32>>,
    reals: Mutex<VecDeque<Float>>,
}

impl FakeRandom {
    pub fn new(ints: Vec<i32>, reals: Vec<Float>) -> Self {
        Self { ints: Mutex::new(ints.into()), reals: Mutex::new(reals.into()) }
    }
}

impl Random for FakeRandom {
    fn uniform_int(&self, min: i32, max: i32) -> i32 {
        assert!(min <= max);
        let value = self.ints.lock().unwrap().pop_front().expect("no more scripted ints");
        assert!(value >= min && value <= max, "scripted int {value} is out of [{min}, {max}]");

        value
    }

    fn uniform_real(&self, min: Float, max: Float) -> Float {
        assert!(min < max);
        let value = self.reals.lock().unwrap().pop_front().expect("no more scripted reals");
        assert!(value >= min && value < max, "scripted real {value} is out of [{min}, {max})");

        value
    }

    fn get_rng(&self) -> RandomGen {
        RandomGen::seed_from_u64(0)
    }
}
