//! Pure index arithmetic mapping global indices onto chunks.
//!
//! Chunk `n` holds `BASE_CHUNK_CAPACITY << n` elements, so every new chunk
//! is larger than all previous chunks combined and a list of `len` elements
//! needs only `O(log len)` chunks. Because the sizes form a doubling series,
//! both directions of the mapping have closed forms:
//!
//! ```text
//! chunk_size(n)  = C * 2^n
//! chunk_start(n) = chunk_size(n) - C
//! index_chunk(i) = floor(log2(i + C)) - log2(C)
//! ```
//!
//! With `C = 4`:
//!
//! ```text
//! chunk      0        1                 2
//! indices    0..4     4..12             12..28
//! ```
//!
//! None of these functions look at a list; they can be checked on their own.

use crate::config::{BASE_CHUNK_CAPACITY, BASE_CHUNK_LOG2, MAX_CHUNKS};

/// Capacity of chunk `chunk_id`, in elements.
///
/// Defined for `chunk_id < MAX_CHUNKS`; larger ids have no representable
/// capacity.
#[inline]
pub const fn chunk_size(chunk_id: usize) -> usize {
    debug_assert!(chunk_id < MAX_CHUNKS, "chunk id past the last chunk");
    BASE_CHUNK_CAPACITY << chunk_id
}

/// First global index stored in chunk `chunk_id`.
///
/// Defined for `chunk_id <= MAX_CHUNKS`. `chunk_start(MAX_CHUNKS)` is
/// [`MAX_LEN`](crate::config::MAX_LEN), one past the last addressable index.
#[inline]
pub const fn chunk_start(chunk_id: usize) -> usize {
    debug_assert!(chunk_id <= MAX_CHUNKS, "chunk id past the end sentinel");
    // The shift drops the top bit only for the sentinel id; the wrapping
    // subtraction restores 2^BITS - C in that case.
    (BASE_CHUNK_CAPACITY << chunk_id).wrapping_sub(BASE_CHUNK_CAPACITY)
}

/// Chunk id holding global index `index`.
///
/// Total over `usize`. Indices at or beyond `MAX_LEN` map to `MAX_CHUNKS`.
#[inline]
pub const fn index_chunk(index: usize) -> usize {
    match index.checked_add(BASE_CHUNK_CAPACITY) {
        Some(biased) => (biased.ilog2() - BASE_CHUNK_LOG2) as usize,
        None => MAX_CHUNKS,
    }
}

/// Split a global index into `(chunk_id, offset_within_chunk)`.
#[inline]
pub const fn locate(index: usize) -> (usize, usize) {
    let chunk_id = index_chunk(index);
    (chunk_id, index - chunk_start(chunk_id))
}
