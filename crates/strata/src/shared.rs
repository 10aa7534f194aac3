//! Append-only list readable from many threads while one thread appends.
//!
//! [`SharedAppendList`] keeps the same chunk layout as [`crate::AppendList`]
//! but replaces the growable directory with a fixed array of `MAX_CHUNKS`
//! atomic chunk pointers. The directory therefore never reallocates under a
//! concurrent reader, and no lock is taken on the read path.
//!
//! # Publication order
//!
//! An append performs, in order:
//!
//! 1. allocate the target chunk if the new index starts one, and store its
//!    pointer (`Release`);
//! 2. write the value into the first free slot;
//! 3. store `len + 1` (`Release`).
//!
//! Readers load `len` with `Acquire` before touching any slot, so a reader
//! that sees index `i < len` also sees the chunk pointer and the fully
//! written value for `i`. Slots at or beyond `len` are never read.
//!
//! # Appenders
//!
//! At most one append may run at a time. [`SharedAppendList::try_append`]
//! checks this with a non-blocking writer flag and hands the value back
//! on contention. [`SharedAppendList::append_unchecked`] leaves the
//! serialization to the caller; debug builds still take the flag and panic
//! on overlap.

#![allow(unsafe_code)]

use std::fmt;
use std::marker::PhantomData;
use std::mem::MaybeUninit;
use std::ptr;
use std::sync::atomic::{AtomicBool, AtomicPtr, AtomicUsize, Ordering};

use crate::chunk::ChunkAllocated;
use crate::config::MAX_CHUNKS;
use crate::error::AppendError;
use crate::placement::{chunk_size, chunk_start, index_chunk, locate};

/// Append-only list with lock-free reads that may be shared across threads.
///
/// ```
/// use strata::SharedAppendList;
///
/// let list = SharedAppendList::new();
/// std::thread::scope(|s| {
///     s.spawn(|| {
///         for v in 0..100u32 {
///             list.try_append(v).unwrap();
///         }
///     });
///     s.spawn(|| {
///         let seen = list.len();
///         for i in 0..seen {
///             assert_eq!(list.get(i), Some(&(i as u32)));
///         }
///     });
/// });
/// assert_eq!(list.len(), 100);
/// ```
pub struct SharedAppendList<T> {
    /// Chunk base pointers by chunk id; null until allocated.
    chunks: [AtomicPtr<T>; MAX_CHUNKS],
    /// Published element count.
    len: AtomicUsize,
    /// Set while an append is in progress.
    appending: AtomicBool,
    _owns: PhantomData<T>,
}

// SAFETY: the list owns its `T`s; moving it to another thread moves them.
unsafe impl<T: Send> Send for SharedAppendList<T> {}

// SAFETY: `&SharedAppendList` hands out `&T` (needs `T: Sync`) and accepts
// `T` values from any thread that are later dropped by the owner (needs
// `T: Send`). Concurrent appends are excluded by the writer flag or by the
// `append_unchecked` contract.
unsafe impl<T: Send + Sync> Sync for SharedAppendList<T> {}

impl<T> SharedAppendList<T> {
    /// Create an empty list. Nothing is allocated until the first append.
    pub const fn new() -> Self {
        Self {
            chunks: [const { AtomicPtr::new(ptr::null_mut()) }; MAX_CHUNKS],
            len: AtomicUsize::new(0),
            appending: AtomicBool::new(false),
            _owns: PhantomData,
        }
    }

    /// Append `value` unless another append is in flight.
    ///
    /// Never blocks. On contention the value is returned inside
    /// [`AppendError::Contended`].
    pub fn try_append(&self, value: T) -> Result<(), AppendError<T>> {
        let Some(writer) = WriterFlag::acquire(&self.appending) else {
            tracing::debug!(len = self.len(), "append rejected, another append in flight");
            return Err(AppendError::Contended(value));
        };
        // SAFETY: the writer flag is held, so no other `try_append` or
        // debug-build `append_unchecked` runs until `writer` drops.
        let allocated = unsafe { self.write_next(value) };
        drop(writer);
        if let Some(allocated) = allocated {
            allocated.trace();
        }
        Ok(())
    }

    /// Append `value` without checking for a concurrent append.
    ///
    /// # Safety
    ///
    /// No other append (`try_append`, `append_unchecked`) on this list may
    /// run concurrently with this call. Concurrent `get`/`len` are fine.
    /// Debug builds detect a violation and panic.
    pub unsafe fn append_unchecked(&self, value: T) {
        let allocated = {
            #[cfg(debug_assertions)]
            let Some(_writer) = WriterFlag::acquire(&self.appending) else {
                panic!("overlapping appends on SharedAppendList");
            };
            // SAFETY: exclusivity among appenders is the caller's precondition.
            unsafe { self.write_next(value) }
        };
        if let Some(allocated) = allocated {
            allocated.trace();
        }
    }

    /// Append through an exclusive borrow. Always safe.
    pub fn append_mut(&mut self, value: T) {
        // SAFETY: `&mut self` excludes every other access.
        if let Some(allocated) = unsafe { self.write_next(value) } {
            allocated.trace();
        }
    }

    /// Write `value` at index `len` and publish it.
    ///
    /// Returns the chunk allocated for it, if any, so the caller can log it
    /// after the append is complete and the writer flag is released.
    ///
    /// # Safety
    ///
    /// The caller must be the only appender for the duration of the call.
    unsafe fn write_next(&self, value: T) -> Option<ChunkAllocated> {
        let index = self.len.load(Ordering::Acquire);
        let (chunk_id, offset) = locate(index);
        assert!(chunk_id < MAX_CHUNKS, "SharedAppendList capacity overflow");

        let (base, allocated) = if offset == 0 {
            let base = allocate_chunk::<T>(chunk_id);
            self.chunks[chunk_id].store(base, Ordering::Release);
            (base, Some(ChunkAllocated::for_chunk(chunk_id)))
        } else {
            (self.chunks[chunk_id].load(Ordering::Acquire), None)
        };
        debug_assert!(!base.is_null(), "chunk {chunk_id} missing for index {index}");

        // SAFETY: `offset < chunk_size(chunk_id)` by placement, so the slot
        // is inside the chunk allocation. It is at `len`, so no reader can
        // reach it yet and no earlier append wrote it.
        unsafe { base.add(offset).write(value) };
        self.len.store(index + 1, Ordering::Release);
        allocated
    }

    /// Element at `index`, or `None` if `index >= len()`.
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len.load(Ordering::Acquire) {
            return None;
        }
        let (chunk_id, offset) = locate(index);
        let base = self.chunks[chunk_id].load(Ordering::Acquire);
        debug_assert!(!base.is_null());
        // SAFETY: `index < len` was observed with `Acquire`, which orders
        // after the chunk pointer store and the slot write for `index`. The
        // slot is never written again and the chunk lives as long as `self`.
        Some(unsafe { &*base.add(offset) })
    }

    /// Number of published elements.
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Acquire)
    }

    /// Whether nothing has been published yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of chunks holding published elements.
    pub fn chunk_count(&self) -> usize {
        match self.len() {
            0 => 0,
            len => index_chunk(len - 1) + 1,
        }
    }

    /// Total element slots across chunks holding published elements.
    pub fn capacity(&self) -> usize {
        chunk_start(self.chunk_count())
    }

    /// Bytes reserved for element storage.
    pub fn memory_bytes(&self) -> usize {
        self.capacity() * std::mem::size_of::<T>()
    }
}

impl<T> Drop for SharedAppendList<T> {
    fn drop(&mut self) {
        let len = *self.len.get_mut();
        for (chunk_id, slot) in self.chunks.iter_mut().enumerate() {
            let base = *slot.get_mut();
            if base.is_null() {
                break;
            }
            let size = chunk_size(chunk_id);
            let initialized = len.saturating_sub(chunk_start(chunk_id)).min(size);
            // SAFETY: `base` came from `allocate_chunk(chunk_id)` and is
            // freed exactly once here. Its first `initialized` slots hold
            // values written by `write_next`; the rest are uninitialized.
            unsafe {
                ptr::drop_in_place(ptr::slice_from_raw_parts_mut(base, initialized));
                drop(Box::from_raw(ptr::slice_from_raw_parts_mut(
                    base.cast::<MaybeUninit<T>>(),
                    size,
                )));
            }
        }
    }
}

impl<T> fmt::Debug for SharedAppendList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedAppendList")
            .field("len", &self.len())
            .field("chunks", &self.chunk_count())
            .field("capacity", &self.capacity())
            .finish()
    }
}

/// Reserve uninitialized storage for chunk `chunk_id`.
///
/// The allocation is released in `SharedAppendList::drop` via `Box::from_raw`
/// with the same length.
fn allocate_chunk<T>(chunk_id: usize) -> *mut T {
    let storage: Box<[MaybeUninit<T>]> = Box::new_uninit_slice(chunk_size(chunk_id));
    Box::into_raw(storage).cast::<T>()
}

/// Held for the duration of one append; clears the flag on drop, including
/// on unwind.
struct WriterFlag<'a>(&'a AtomicBool);

impl<'a> WriterFlag<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for WriterFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
