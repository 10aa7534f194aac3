//! Fixed-capacity element chunks.
//!
//! A [`Chunk`] reserves storage for `chunk_size(id)` elements when it is
//! created and is then filled one element at a time. It never grows past
//! that reservation, so the backing buffer is never reallocated and every
//! element keeps its address until the chunk is dropped.

use crate::placement::{chunk_size, chunk_start};

/// A single fixed-capacity run of elements.
///
/// The initialized prefix is `data[..data.len()]`; the reserved tail is
/// never read. `capacity` is the requested size, which `Vec` may round up;
/// pushes stop at `capacity` so `Vec::push` never reallocates.
pub struct Chunk<T> {
    /// Backing storage, reserved to at least `capacity` at creation.
    data: Vec<T>,
    /// Chunk id in the owning directory.
    id: usize,
    /// Fixed element capacity, `chunk_size(id)`.
    capacity: usize,
}

impl<T> Chunk<T> {
    /// Reserve storage for chunk `id`.
    ///
    /// Allocates the whole chunk up front. Allocation failure aborts, as for
    /// any `Vec` reservation.
    pub fn new(id: usize) -> Self {
        let capacity = chunk_size(id);
        Self {
            data: Vec::with_capacity(capacity),
            id,
            capacity,
        }
    }

    /// Append `value` to the initialized prefix.
    ///
    /// Returns the value back if the chunk is already full. A successful
    /// push writes only the first uninitialized slot.
    pub fn push(&mut self, value: T) -> Result<(), T> {
        if self.data.len() == self.capacity {
            return Err(value);
        }
        debug_assert!(self.data.len() < self.data.capacity());
        self.data.push(value);
        Ok(())
    }

    /// Element at `offset`, or `None` if that slot is not initialized.
    pub fn get(&self, offset: usize) -> Option<&T> {
        self.data.get(offset)
    }

    /// The initialized prefix.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Chunk id in the owning directory.
    pub fn id(&self) -> usize {
        self.id
    }

    /// First global index this chunk holds.
    pub fn start(&self) -> usize {
        chunk_start(self.id)
    }

    /// Number of initialized elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether no element has been written yet.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether every slot is initialized.
    pub fn is_full(&self) -> bool {
        self.data.len() == self.capacity
    }

    /// Fixed capacity in elements.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Remaining free slots.
    pub fn remaining(&self) -> usize {
        self.capacity - self.data.len()
    }

    /// Bytes reserved for this chunk's elements.
    pub fn memory_bytes(&self) -> usize {
        self.capacity * std::mem::size_of::<T>()
    }
}

/// Placement of a chunk that was just allocated.
///
/// Returned out of the mutating call so the log event is emitted only after
/// the list is consistent again. A subscriber may read or append to the
/// same list from inside the event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkAllocated {
    /// Id of the new chunk.
    pub chunk_id: usize,
    /// First global index the chunk holds.
    pub start: usize,
    /// Capacity in elements.
    pub capacity: usize,
}

impl ChunkAllocated {
    /// Placement facts for chunk `chunk_id`.
    pub fn for_chunk(chunk_id: usize) -> Self {
        Self {
            chunk_id,
            start: chunk_start(chunk_id),
            capacity: chunk_size(chunk_id),
        }
    }

    /// Emit the allocation as a `trace` event.
    pub fn trace(self) {
        tracing::trace!(
            chunk_id = self.chunk_id,
            start = self.start,
            capacity = self.capacity,
            "allocated chunk"
        );
    }
}
