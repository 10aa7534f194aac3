//! Compile-time sizing constants.
//!
//! Chunk sizing is fixed for every list; there is no runtime knob. All
//! other limits are derived from [`BASE_CHUNK_LOG2`].

/// Base-2 logarithm of the capacity of chunk 0.
///
/// Must stay small enough that `BASE_CHUNK_CAPACITY` is a power of two
/// well below `usize::MAX`; the placement arithmetic relies on it.
pub const BASE_CHUNK_LOG2: u32 = 2;

/// Capacity of chunk 0, in elements. Chunk `n` holds `BASE_CHUNK_CAPACITY << n`.
pub const BASE_CHUNK_CAPACITY: usize = 1 << BASE_CHUNK_LOG2;

/// Number of chunk ids whose capacity is representable in a `usize`.
///
/// On a 64-bit target with the default base this is 62, which is also the
/// fixed size of the directory used by [`crate::SharedAppendList`].
pub const MAX_CHUNKS: usize = (usize::BITS - BASE_CHUNK_LOG2) as usize;

/// One past the largest global index covered by chunks `0..MAX_CHUNKS`.
///
/// Equal to `chunk_start(MAX_CHUNKS)`, i.e. `2^BITS - BASE_CHUNK_CAPACITY`.
pub const MAX_LEN: usize = usize::MAX - BASE_CHUNK_CAPACITY + 1;
