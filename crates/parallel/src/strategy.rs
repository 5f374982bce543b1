//! Parallel processing strategies

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::ops::Range;
use sunshine_core::{Error, Result};

/// Processing mode for algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessingMode {
    /// Single-threaded processing
    Sequential,
    /// Parallel processing on rayon's global pool
    #[default]
    Parallel,
    /// Parallel on a dedicated pool with the given number of threads
    ParallelWith(usize),
}

/// Strategy for mapping a function over row indices.
///
/// Results always come back in index order, whichever mode runs them.
pub trait ParallelStrategy {
    /// Map a function over indices and collect results
    fn par_map<T, F>(&self, range: Range<usize>, f: F) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(usize) -> T + Sync + Send;
}

impl ParallelStrategy for ProcessingMode {
    #[cfg(feature = "parallel")]
    fn par_map<T, F>(&self, range: Range<usize>, f: F) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(usize) -> T + Sync + Send,
    {
        match self {
            ProcessingMode::Sequential => Ok(range.map(f).collect()),
            ProcessingMode::Parallel => Ok(range.into_par_iter().map(f).collect()),
            ProcessingMode::ParallelWith(threads) => {
                if *threads == 0 {
                    return Err(Error::InvalidParameter {
                        name: "threads",
                        value: threads.to_string(),
                        reason: "must be at least 1".into(),
                    });
                }
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(*threads)
                    .build()
                    .map_err(|e| Error::Other(format!("Failed to build thread pool: {}", e)))?;
                Ok(pool.install(|| range.into_par_iter().map(f).collect()))
            }
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn par_map<T, F>(&self, range: Range<usize>, f: F) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(usize) -> T + Sync + Send,
    {
        if let ProcessingMode::ParallelWith(0) = self {
            return Err(Error::InvalidParameter {
                name: "threads",
                value: "0".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(range.map(f).collect())
    }
}

/// Get the number of threads the default mode will use
pub fn num_cpus() -> usize {
    #[cfg(feature = "parallel")]
    {
        rayon::current_num_threads()
    }
    #[cfg(not(feature = "parallel"))]
    {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_rows(mode: ProcessingMode) -> Vec<usize> {
        mode.par_map(0..257, |i| i * i).unwrap()
    }

    #[test]
    fn test_modes_preserve_order() {
        let expected: Vec<usize> = (0..257).map(|i| i * i).collect();
        assert_eq!(square_rows(ProcessingMode::Sequential), expected);
        assert_eq!(square_rows(ProcessingMode::Parallel), expected);
        assert_eq!(square_rows(ProcessingMode::ParallelWith(3)), expected);
    }

    #[test]
    fn test_zero_threads_rejected() {
        let result = ProcessingMode::ParallelWith(0).par_map(0..4, |i| i);
        assert!(matches!(result, Err(Error::InvalidParameter { name: "threads", .. })));
    }

    #[test]
    fn test_empty_range() {
        let out: Vec<u8> = ProcessingMode::Parallel.par_map(0..0, |_| 1).unwrap();
        assert!(out.is_empty());
        assert!(num_cpus() >= 1);
    }
}
