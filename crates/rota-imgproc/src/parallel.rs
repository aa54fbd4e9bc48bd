use rayon::prelude::*;
use thiserror::Error;

use rota_image::ImageError;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),

    /// The row stride must be valid.
    #[error("row stride must be > 0, got {0}")]
    InvalidRowStride(usize),

    /// The buffer is not made of whole rows.
    #[error("buffer length {0} is not a multiple of the row stride {1}")]
    SizeMismatch(usize, usize),
}

impl From<ParallelError> for ImageError {
    fn from(err: ParallelError) -> Self {
        ImageError::Parallel(err.to_string())
    }
}

/// Controls how row-wise operations are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Use the global Rayon thread pool and distribute rows across its workers.
    #[default]
    ParallelRows,

    /// Run sequentially on the current thread.
    ///
    /// Useful for small images, debugging, or when the overhead of parallelization
    /// outweighs the benefits.
    Serial,

    /// Run on a local thread pool with `n` threads.
    ///
    /// # Warning
    /// Creates a new thread pool on every call, which has significant overhead.
    /// Use this primarily for benchmarking or specific isolation needs.
    Fixed(usize),
}

/// Apply a function to every row of a buffer with the given strategy.
///
/// The buffer is split into disjoint rows of `row_stride` elements; each call
/// of `f` receives the row index and exclusive access to that row, so no two
/// workers ever write the same element.
///
/// # Arguments
///
/// * `dst` - The destination buffer, a whole number of rows.
/// * `row_stride` - The number of elements per row (width * channels).
/// * `strategy` - The execution strategy.
/// * `f` - The operation to run on each `(row index, row)` pair.
///
/// # Errors
///
/// Returns an error if the stride is zero, the buffer is not made of whole
/// rows, or a fixed-size thread pool cannot be built.
pub fn par_iter_rows_indexed<T, F>(
    dst: &mut [T],
    row_stride: usize,
    strategy: ExecutionStrategy,
    f: F,
) -> Result<(), ParallelError>
where
    T: Send,
    F: Fn(usize, &mut [T]) + Send + Sync,
{
    if row_stride == 0 {
        return Err(ParallelError::InvalidRowStride(row_stride));
    }

    if dst.len() % row_stride != 0 {
        return Err(ParallelError::SizeMismatch(dst.len(), row_stride));
    }

    match strategy {
        ExecutionStrategy::Serial => {
            dst.chunks_exact_mut(row_stride)
                .enumerate()
                .for_each(|(y, row)| f(y, row));
        }
        ExecutionStrategy::ParallelRows => {
            dst.par_chunks_exact_mut(row_stride)
                .enumerate()
                .for_each(|(y, row)| f(y, row));
        }
        ExecutionStrategy::Fixed(n) => {
            if n == 0 {
                return Err(ParallelError::InvalidThreadCount(n));
            }
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| ParallelError::BuildError(e.to_string()))?;

            pool.install(|| {
                dst.par_chunks_exact_mut(row_stride)
                    .enumerate()
                    .for_each(|(y, row)| f(y, row));
            });
        }
    }

    Ok(())
}
