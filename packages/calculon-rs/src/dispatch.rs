use std::io;
use std::ops::Range;
use std::thread;

use crate::error::{FilterError, Result};
use crate::kernels::{Kernel, ResolvedKernel};
use crate::types::ParameterTable;

/// Block layout for a signal of `len` samples split across `thread_count` workers.
///
/// Every block has `len / thread_count` samples and blocks start at offset 0.
/// Samples past `thread_count * block_size` belong to no block. A
/// `thread_count` of 0 is treated as 1. When `len < thread_count` the blocks
/// would all be empty, so no blocks are returned and nothing is filtered.
pub fn partition(len: usize, thread_count: usize) -> Vec<Range<usize>> {
    let thread_count = thread_count.max(1);
    let block_size = len / thread_count;
    if block_size == 0 {
        return Vec::new();
    }
    (0..thread_count)
        .map(|i| i * block_size..(i + 1) * block_size)
        .collect()
}

/// Apply `kernel` to `signal` using one thread per block and return the filtered copy
///
/// # Arguments
/// * `signal` - Samples to filter; only read
/// * `thread_count` - Number of blocks and worker threads (values below 1 mean 1)
/// * `kernel` - Filter algorithm
/// * `params` - Parameters for `kernel`, resolved once before any worker starts
///
/// # Returns
/// A buffer of the same length as `signal`. Samples outside every block are
/// copied through unfiltered.
pub fn apply_filter(
    signal: &[f64],
    thread_count: usize,
    kernel: Kernel,
    params: &ParameterTable,
) -> Result<Vec<f64>> {
    let resolved = kernel.resolve(params)?;
    let thread_count = thread_count.max(1);
    let block_size = signal.len() / thread_count;

    log::debug!(
        "Applying {} to {} samples: {} blocks of {} ({:?})",
        kernel,
        signal.len(),
        thread_count,
        block_size,
        resolved
    );

    let mut output = signal.to_vec();
    if block_size == 0 {
        log::debug!("Signal shorter than thread count, nothing to filter");
        return Ok(output);
    }

    let covered = thread_count * block_size;
    thread::scope(|scope| {
        let jobs = signal[..covered]
            .chunks(block_size)
            .zip(output[..covered].chunks_mut(block_size))
            .map(|(src, dst)| move || resolved.apply(src, dst));
        run_blocks(jobs, |block, job| spawn_worker(scope, block, job))
    })?;

    Ok(output)
}

/// In-place variant of [`apply_filter`]. Each worker owns its block exclusively.
///
/// Samples outside every block are left untouched.
pub fn apply_filter_in_place(
    signal: &mut [f64],
    thread_count: usize,
    kernel: Kernel,
    params: &ParameterTable,
) -> Result<()> {
    let resolved = kernel.resolve(params)?;
    let thread_count = thread_count.max(1);
    let block_size = signal.len() / thread_count;

    log::debug!(
        "Applying {} in place to {} samples: {} blocks of {}",
        kernel,
        signal.len(),
        thread_count,
        block_size
    );

    if block_size == 0 {
        return Ok(());
    }

    let covered = thread_count * block_size;
    thread::scope(|scope| {
        let jobs = signal[..covered]
            .chunks_mut(block_size)
            .map(|block| move || resolved.apply_in_place(block));
        run_blocks(jobs, |block, job| spawn_worker(scope, block, job))
    })
}

fn spawn_worker<'scope, 'env, F>(
    scope: &'scope thread::Scope<'scope, 'env>,
    block: usize,
    job: F,
) -> io::Result<thread::ScopedJoinHandle<'scope, ()>>
where
    F: FnOnce() + Send + 'scope,
{
    thread::Builder::new()
        .name(format!("calculon-block-{}", block))
        .spawn_scoped(scope, job)
}

/// Start one worker per job and wait for all of them.
///
/// If a worker cannot be started, the ones already running are joined before
/// the spawn error is returned.
fn run_blocks<'scope, F, S>(jobs: impl IntoIterator<Item = F>, mut spawn: S) -> Result<()>
where
    S: FnMut(usize, F) -> io::Result<thread::ScopedJoinHandle<'scope, ()>>,
{
    let mut handles = Vec::new();
    for (block, job) in jobs.into_iter().enumerate() {
        match spawn(block, job) {
            Ok(handle) => handles.push(handle),
            Err(source) => {
                log::error!("Could not start filter worker for block {}: {}", block, source);
                // panics are already logged by join_all; the spawn error wins
                let _ = join_all(handles);
                return Err(FilterError::SpawnFailed { block, source });
            }
        }
    }
    join_all(handles)
}

fn join_all(handles: Vec<thread::ScopedJoinHandle<'_, ()>>) -> Result<()> {
    let mut failed = None;
    for (block, handle) in handles.into_iter().enumerate() {
        if handle.join().is_err() {
            log::error!("Filter worker for block {} panicked", block);
            failed.get_or_insert(block);
        }
    }
    match failed {
        Some(block) => Err(FilterError::WorkerPanicked { block }),
        None => Ok(()),
    }
}

/// Resolve `kernel` against `params` and report which blocks a run would touch.
/// Used by callers that want to validate a request without filtering.
pub fn plan(
    len: usize,
    thread_count: usize,
    kernel: Kernel,
    params: &ParameterTable,
) -> Result<(ResolvedKernel, Vec<Range<usize>>)> {
    Ok((kernel.resolve(params)?, partition(len, thread_count)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BLOCK_SIZE, DAMPING_COEFF};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_join_all_reports_first_panicked_block() {
        let result = thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|i| {
                    scope.spawn(move || {
                        if i >= 2 {
                            panic!("block {} failed", i);
                        }
                    })
                })
                .collect();
            join_all(handles)
        });
        assert!(matches!(result, Err(FilterError::WorkerPanicked { block: 2 })));
    }

    #[test]
    fn test_spawn_failure_joins_started_workers() {
        let started = AtomicUsize::new(0);
        let started = &started;
        let result = thread::scope(|scope| {
            let jobs = (0..4).map(|_| {
                move || {
                    started.fetch_add(1, Ordering::SeqCst);
                }
            });
            run_blocks(jobs, |block, job| {
                if block == 2 {
                    Err(io::Error::new(io::ErrorKind::WouldBlock, "thread limit reached"))
                } else {
                    spawn_worker(scope, block, job)
                }
            })
        });

        match result {
            Err(FilterError::SpawnFailed { block, source }) => {
                assert_eq!(block, 2);
                assert_eq!(source.kind(), io::ErrorKind::WouldBlock);
            }
            other => panic!("expected SpawnFailed, got {:?}", other),
        }
        assert_eq!(started.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_huge_thread_count() {
        let params = ParameterTable::new().with(BLOCK_SIZE, 3.0);
        let threads = u32::MAX as usize;

        let (_, blocks) = plan(3, threads, Kernel::MovingAverage, &params).unwrap();
        assert!(blocks.is_empty());

        let signal = [4.0, 8.0, 6.0];
        assert_eq!(
            apply_filter(&signal, threads, Kernel::MovingAverage, &params).unwrap(),
            signal.to_vec()
        );
        let mut in_place = signal;
        apply_filter_in_place(&mut in_place, threads, Kernel::MovingAverage, &params).unwrap();
        assert_eq!(in_place, signal);
    }

    #[test]
    fn test_partition_layout() {
        assert_eq!(partition(10, 3), vec![0..3, 3..6, 6..9]);
        assert_eq!(partition(8, 2), vec![0..4, 4..8]);
        assert_eq!(partition(5, 0), vec![0..5]);
        assert!(partition(2, 4).is_empty());
        assert!(partition(0, 1).is_empty());
    }

    #[test]
    fn test_end_to_end_example() {
        let params = ParameterTable::new().with(BLOCK_SIZE, 3.0);
        let output =
            apply_filter(&[1.0, 2.0, 3.0, 4.0, 5.0], 1, Kernel::MovingAverage, &params).unwrap();
        assert_eq!(output, vec![1.0, 2.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_zero_threads_treated_as_one() {
        let params = ParameterTable::new().with(BLOCK_SIZE, 3.0);
        let signal = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(
            apply_filter(&signal, 0, Kernel::MovingAverage, &params).unwrap(),
            apply_filter(&signal, 1, Kernel::MovingAverage, &params).unwrap()
        );
    }

    #[test]
    fn test_remainder_passes_through() {
        let params = ParameterTable::new().with(DAMPING_COEFF, 0.5);
        let signal: Vec<f64> = (1..=10).map(f64::from).collect();
        let output = apply_filter(&signal, 3, Kernel::Exponential, &params).unwrap();

        assert_eq!(output.len(), signal.len());
        // blocks of 3 cover samples 0..9
        assert_eq!(output[9], signal[9]);
        // every block restarts with its first sample
        for start in [0, 3, 6] {
            assert_eq!(output[start], signal[start]);
            assert_eq!(output[start + 1], 0.5 * signal[start + 1] + 0.5 * signal[start]);
        }
    }

    #[test]
    fn test_missing_parameter_aborts() {
        let signal = vec![1.0; 16];
        let err = apply_filter(&signal, 4, Kernel::Median, &ParameterTable::new()).unwrap_err();
        assert_eq!(err.to_string(), "Missing block-size parameter!");

        let mut in_place = signal.clone();
        let params = ParameterTable::new().with(BLOCK_SIZE, 2.0);
        assert!(apply_filter_in_place(&mut in_place, 4, Kernel::Exponential, &params).is_err());
        assert_eq!(in_place, signal);
    }

    #[test]
    fn test_more_threads_than_samples() {
        let params = ParameterTable::new().with(BLOCK_SIZE, 2.0);
        let signal = [3.0, 1.0, 2.0];
        let output = apply_filter(&signal, 8, Kernel::Median, &params).unwrap();
        assert_eq!(output, signal.to_vec());
    }

    #[test]
    fn test_in_place_matches_copy() {
        let signal: Vec<f64> = (0..103).map(|i| ((i * 37) % 17) as f64 * 0.5).collect();
        for kernel in Kernel::ALL {
            let params = ParameterTable::new()
                .with(BLOCK_SIZE, 4.0)
                .with(DAMPING_COEFF, 0.25);
            for threads in [1, 2, 5, 8] {
                let copied = apply_filter(&signal, threads, kernel, &params).unwrap();
                let mut in_place = signal.clone();
                apply_filter_in_place(&mut in_place, threads, kernel, &params).unwrap();
                assert_eq!(in_place, copied, "{} with {} threads", kernel, threads);
            }
        }
    }

    #[test]
    fn test_plan() {
        let params = ParameterTable::new().with(BLOCK_SIZE, 5.0);
        let (resolved, blocks) = plan(20, 4, Kernel::Median, &params).unwrap();
        assert_eq!(resolved, ResolvedKernel::Median { window: 5 });
        assert_eq!(blocks.len(), 4);
        assert_eq!(blocks[3], 15..20);
    }
}
