//! Workload generators for strata benchmarks.
//!
//! - [`sequential_values`]: the values `0..len`
//! - [`random_indices`]: deterministic lookup pattern via seed

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// List lengths exercised by every benchmark group.
///
/// The first fits in the inline chunk headers, the others spill over.
pub const SIZES: [usize; 3] = [1_000, 100_000, 1_000_000];

/// The values `0..len` as `u64`.
pub fn sequential_values(len: usize) -> Vec<u64> {
    (0..len as u64).collect()
}

/// `count` indices uniformly drawn from `0..len`, reproducible from `seed`.
///
/// # Panics
///
/// Panics if `len` is zero.
pub fn random_indices(len: usize, count: usize, seed: u64) -> Vec<usize> {
    assert!(len > 0, "cannot draw indices from an empty list");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count).map(|_| rng.random_range(0..len)).collect()
}
