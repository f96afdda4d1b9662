//! Parallelization helpers for metering and sweep operations
//!
//! These helpers dispatch to rayon when the workload is large enough to pay
//! for the thread pool, and to a plain loop otherwise. Both paths produce
//! bit-identical results: reductions are split into fixed-size chunks whose
//! partial results are combined in order, so the floating point summation
//! order never depends on how rayon schedules work.

use rayon::prelude::*;

/// Minimum number of work units (pixels, or pixels x candidates) to trigger
/// parallel processing
pub const PARALLEL_THRESHOLD: usize = 30_000;

/// Number of elements folded sequentially into each partial result.
const CHUNK_LEN: usize = 4096;

/// Deterministic chunked fold over paired values and weights.
///
/// The pair slices are cut into fixed chunks of `CHUNK_LEN`; each chunk is
/// folded from `init()` with `fold_fn`, and the per-chunk results are then
/// combined left to right with `reduce_fn`. Chunk boundaries do not depend on
/// the thread count, which keeps the result identical between the sequential
/// and parallel paths.
///
/// # Arguments
/// * `values` - Per-pixel values (e.g., luminance)
/// * `weights` - Per-pixel weights, same length as `values`
/// * `init` - Creates an empty accumulator
/// * `fold_fn` - Folds one (value, weight) pair into the accumulator
/// * `reduce_fn` - Combines two accumulators
///
/// # Example
/// ```ignore
/// let total = paired_chunk_fold(&lum, &weights, || 0.0f64, |acc, _, w| acc + w as f64, |a, b| a + b);
/// ```
pub fn paired_chunk_fold<A, I, F, R>(
    values: &[f32],
    weights: &[f32],
    init: I,
    fold_fn: F,
    reduce_fn: R,
) -> A
where
    A: Send,
    I: Fn() -> A + Sync,
    F: Fn(A, f32, f32) -> A + Sync,
    R: Fn(A, A) -> A,
{
    let len = values.len().min(weights.len());
    let values = &values[..len];
    let weights = &weights[..len];

    let fold_chunk = |(v_chunk, w_chunk): (&[f32], &[f32])| {
        v_chunk
            .iter()
            .zip(w_chunk)
            .fold(init(), |acc, (&v, &w)| fold_fn(acc, v, w))
    };

    let partials: Vec<A> = if len >= PARALLEL_THRESHOLD {
        values
            .par_chunks(CHUNK_LEN)
            .zip(weights.par_chunks(CHUNK_LEN))
            .map(fold_chunk)
            .collect()
    } else {
        values
            .chunks(CHUNK_LEN)
            .zip(weights.chunks(CHUNK_LEN))
            .map(fold_chunk)
            .collect()
    };

    partials.into_iter().fold(init(), reduce_fn)
}

/// Order-preserving map with automatic threshold-based dispatch.
///
/// `work_per_item` estimates the cost of one call to `f` (for a sweep, the
/// pixel count); the parallel path is taken when the total work reaches
/// [`PARALLEL_THRESHOLD`]. The output is always in input order.
pub fn ordered_map<T, R, F>(items: &[T], work_per_item: usize, f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync,
{
    let total_work = items.len().saturating_mul(work_per_item.max(1));

    if total_work >= PARALLEL_THRESHOLD && items.len() > 1 {
        items.par_iter().map(&f).collect()
    } else {
        items.iter().map(f).collect()
    }
}
