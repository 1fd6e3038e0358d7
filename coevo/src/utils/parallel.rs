#[cfg(test)]
#[path = "../../tests/unit/utils/parallel_test.rs"]
mod parallel_test;

use crate::utils::GenericResult;
use rayon::prelude::*;
use rayon::{ThreadPool as RayonThreadPool, ThreadPoolBuilder};

/// Represents a thread pool wrapper.
pub struct ThreadPool {
    inner: RayonThreadPool,
}

impl ThreadPool {
    /// Creates a new instance of `ThreadPool` with given amount of threads.
    pub fn new(num_threads: usize) -> GenericResult<Self> {
        ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build()
            .map(|inner| Self { inner })
            .map_err(|err| format!("cannot build a thread pool: {err}").into())
    }

    /// Executes given operation on thread pool.
    pub fn execute<OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        self.inner.install(op)
    }
}

/// Maps collection and collects results into vector in parallel.
pub fn parallel_into_collect<T, F, R>(source: Vec<T>, map_op: F) -> Vec<R>
where
    T: Send,
    F: Fn(T) -> R + Sync + Send,
    R: Send,
{
    source.into_par_iter().map(map_op).collect()
}

/// Performs map reduce operations in parallel consuming the source collection.
pub fn map_reduce<T, FM, FR, FD, R>(source: Vec<T>, map_op: FM, default_op: FD, reduce_op: FR) -> R
where
    T: Send,
    FM: Fn(T) -> R + Sync + Send,
    FR: Fn(R, R) -> R + Sync + Send,
    FD: Fn() -> R + Sync + Send,
    R: Send,
{
    source.into_par_iter().map(map_op).reduce(default_op, reduce_op)
}

/// Performs fallible mutable foreach in parallel, returns the first error encountered.
pub fn parallel_try_foreach_mut<T, F>(source: &mut [T], action: F) -> GenericResult<()>
where
    T: Send,
    F: Fn(&mut T) -> GenericResult<()> + Send + Sync,
{
    source.par_iter_mut().map(action).collect()
}
