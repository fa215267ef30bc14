//! Static partitioning of work across a fixed worker fan-out.
//!
//! Chunks are contiguous and sized by ceiling division, so they cover the
//! input exactly once in order, sizes differ by at most one element, and
//! trailing chunks may be empty when the worker count exceeds the item
//! count. Empty chunks are skipped at spawn time by callers.

use std::num::NonZeroUsize;

/// Splits `items` into exactly `worker_count` contiguous chunks.
///
/// Chunk `i` covers `[i * chunk_size, min((i + 1) * chunk_size, len))` with
/// `chunk_size = ceil(len / worker_count)`. The concatenation of the
/// returned slices is `items`.
pub fn partition<T>(items: &[T], worker_count: NonZeroUsize) -> Vec<&[T]> {
    let workers = worker_count.get();
    let chunk_size = items.len().div_ceil(workers);

    (0..workers)
        .map(|i| {
            let start = (i * chunk_size).min(items.len());
            let end = ((i + 1) * chunk_size).min(items.len());
            &items[start..end]
        })
        .collect()
}
