//! The growable chunk directory.
//!
//! A [`ChunkDirectory`] owns the chunks of one list in creation order. The
//! directory's own storage may move when it grows, but it only holds chunk
//! headers; element buffers live in the chunks and never move.

use smallvec::SmallVec;

use crate::chunk::{Chunk, ChunkAllocated};
use crate::placement::{chunk_start, index_chunk, locate};

/// Chunk headers kept inline before the directory spills to the heap.
///
/// Eight chunks cover the first `chunk_start(8)` (1020) elements.
const INLINE_CHUNKS: usize = 8;

/// Ordered chunks of one list, indexed by chunk id.
///
/// Every chunk except the last is full; the last holds at least one element.
pub struct ChunkDirectory<T> {
    chunks: SmallVec<[Chunk<T>; INLINE_CHUNKS]>,
}

impl<T> ChunkDirectory<T> {
    /// Create an empty directory. Nothing is allocated.
    pub fn new() -> Self {
        Self {
            chunks: SmallVec::new(),
        }
    }

    /// Make sure the chunk that owns `index` exists.
    ///
    /// Creates at most one chunk and reports it. Chunks are created strictly
    /// in id order, so `index` must fall in an existing chunk or in the one
    /// right after the last, and every earlier chunk must be full.
    pub fn ensure_chunk_for(&mut self, index: usize) -> Option<ChunkAllocated> {
        let chunk_id = index_chunk(index);
        debug_assert!(
            chunk_id <= self.chunks.len(),
            "chunk {chunk_id} requested with only {} chunks allocated",
            self.chunks.len(),
        );
        if chunk_id < self.chunks.len() {
            return None;
        }
        debug_assert!(
            self.chunks.last().is_none_or(Chunk::is_full),
            "chunk {chunk_id} requested before chunk {} is full",
            chunk_id.wrapping_sub(1),
        );
        self.chunks.push(Chunk::new(chunk_id));
        Some(ChunkAllocated::for_chunk(chunk_id))
    }

    /// Append `value` at global index `len()`.
    ///
    /// Returns the chunk allocated to hold it, if any. The caller logs it
    /// once it no longer holds the directory mutably.
    pub fn push(&mut self, value: T) -> Option<ChunkAllocated> {
        let index = self.len();
        let allocated = self.ensure_chunk_for(index);
        let chunk = &mut self.chunks[index_chunk(index)];
        // `index` is the first free slot of the chunk placement picked.
        debug_assert_eq!(chunk.start() + chunk.len(), index);
        debug_assert!(chunk.remaining() > 0);
        if chunk.push(value).is_err() {
            unreachable!("chunk {} full at index {index}", chunk.id());
        }
        allocated
    }

    /// Element at global index `index`, if initialized.
    pub fn get(&self, index: usize) -> Option<&T> {
        let (chunk_id, offset) = locate(index);
        self.chunks.get(chunk_id)?.get(offset)
    }

    /// Initialized prefix of chunk `chunk_id`.
    pub fn chunk(&self, chunk_id: usize) -> Option<&[T]> {
        self.chunks.get(chunk_id).map(Chunk::as_slice)
    }

    /// Total element count, from the last chunk's start and fill level.
    pub fn len(&self) -> usize {
        self.chunks
            .last()
            .map_or(0, |last| last.start() + last.len())
    }

    /// Whether the directory holds no elements.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Number of chunks allocated so far.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Total slots across all allocated chunks.
    pub fn capacity(&self) -> usize {
        chunk_start(self.chunks.len())
    }

    /// Bytes reserved across all chunks.
    pub fn memory_bytes(&self) -> usize {
        self.chunks.iter().map(Chunk::memory_bytes).sum()
    }
}

impl<T> Default for ChunkDirectory<T> {
    fn default() -> Self {
        Self::new()
    }
}
