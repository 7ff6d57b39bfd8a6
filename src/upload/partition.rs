// ABOUTME: Splits a file list into contiguous shares, one per worker.
// ABOUTME: Share sizes differ by at most one and preserve input order.

use std::num::NonZeroUsize;

/// Split `items` into exactly `shares` contiguous runs.
///
/// Concatenating the result gives back `items`. The first `len % shares` runs
/// hold `ceil(len / shares)` items and the rest `floor(len / shares)`, so runs
/// are empty only when there are fewer items than shares.
pub fn partition<T>(items: Vec<T>, shares: NonZeroUsize) -> Vec<Vec<T>> {
    let shares = shares.get();
    let base = items.len() / shares;
    let larger = items.len() % shares;

    let mut items = items.into_iter();
    (0..shares)
        .map(|i| {
            let size = base + usize::from(i < larger);
            items.by_ref().take(size).collect()
        })
        .collect()
}
