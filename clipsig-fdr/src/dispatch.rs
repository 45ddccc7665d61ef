use rayon::ThreadPool;
use rayon::prelude::*;

use crate::errors::FdrError;

/// Runs independent work items and collects their results in input order.
///
/// Implementations differ only in where the work runs; callers must not rely
/// on the order in which items are processed.
pub trait Executor {
    fn dispatch<T, R, F>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> R + Send + Sync;
}

/// Processes every item in the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct SequentialExecutor;

impl Executor for SequentialExecutor {
    fn dispatch<T, R, F>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> R + Send + Sync,
    {
        items.into_iter().map(f).collect()
    }
}

/// Processes items on a dedicated rayon thread pool.
pub struct ParallelExecutor {
    pool: ThreadPool,
}

impl ParallelExecutor {
    pub fn new(num_threads: usize) -> Result<Self, FdrError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build()
            .map_err(|e| FdrError::ThreadPoolError(e.to_string()))?;
        Ok(ParallelExecutor { pool })
    }

    pub fn num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }
}

impl Executor for ParallelExecutor {
    fn dispatch<T, R, F>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> R + Send + Sync,
    {
        self.pool.install(|| items.into_par_iter().map(f).collect())
    }
}
