//! Single-threaded append-only list with stable element addresses.
//!
//! [`AppendList`] wraps a [`ChunkDirectory`] in an `UnsafeCell` so that
//! [`AppendList::append`] can take `&self`. This is the crate's only
//! shared-mutation boundary for the single-threaded list; everything below
//! it is ordinary safe code over `&mut ChunkDirectory`.
//!
//! # Aliasing contract
//!
//! References returned by [`AppendList::get`] point into chunk buffers.
//! `append` only ever touches the directory header, the header of the
//! target chunk, and the first uninitialized slot of that chunk (or a newly
//! allocated chunk). It never moves or frees a chunk buffer and never writes
//! an initialized slot, so outstanding `&T` stay valid.
//!
//! The list is not `Sync`, which rules out two appends racing from
//! different threads at compile time. On one thread, the mutable directory
//! borrow in `append` covers only the push itself, which runs no caller code.
//! The chunk allocation event is emitted after that borrow ends, so a
//! `tracing` subscriber that reads or appends to the same list sees a
//! consistent directory.
//! For cross-thread sharing use [`crate::SharedAppendList`].
//!
//! ```compile_fail
//! use strata::AppendList;
//!
//! let list = AppendList::new();
//! std::thread::scope(|s| {
//!     s.spawn(|| list.append(1));
//!     s.spawn(|| list.append(2));
//! });
//! ```

#![allow(unsafe_code)]

use std::cell::UnsafeCell;
use std::fmt;

use crate::directory::ChunkDirectory;

/// Growable, append-only list whose elements never move.
///
/// ```
/// use strata::AppendList;
///
/// let list = AppendList::new();
/// list.append(String::from("first"));
/// let first = list.get(0).unwrap();
/// for i in 0..1000 {
///     list.append(i.to_string());
/// }
/// assert_eq!(first, "first");
/// assert_eq!(list.len(), 1001);
/// ```
pub struct AppendList<T> {
    chunks: UnsafeCell<ChunkDirectory<T>>,
}

impl<T> AppendList<T> {
    /// Create an empty list. No memory is allocated until the first append.
    pub fn new() -> Self {
        Self {
            chunks: UnsafeCell::new(ChunkDirectory::new()),
        }
    }

    fn directory(&self) -> &ChunkDirectory<T> {
        // SAFETY: the only `&mut` to the directory lives inside the block in
        // `append`, which runs no caller code and cannot run concurrently
        // (`!Sync`).
        unsafe { &*self.chunks.get() }
    }

    /// Append `value` at index `len()`.
    ///
    /// Allocates a new chunk when the last one is full. References already
    /// handed out by [`get`](Self::get) remain valid.
    pub fn append(&self, value: T) {
        let allocated = {
            // SAFETY: see `directory`. No shared borrow of the directory is
            // alive across this block; borrows handed to callers point into
            // chunk buffers, which `push` neither moves nor overwrites.
            let directory = unsafe { &mut *self.chunks.get() };
            directory.push(value)
        };
        if let Some(allocated) = allocated {
            allocated.trace();
        }
    }

    /// Element at `index`, or `None` if `index >= len()`.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.directory().get(index)
    }

    /// Number of elements appended so far.
    pub fn len(&self) -> usize {
        self.directory().len()
    }

    /// Whether nothing has been appended yet.
    pub fn is_empty(&self) -> bool {
        self.directory().is_empty()
    }

    /// Initialized elements of chunk `chunk_id`, or `None` if that chunk
    /// has not been allocated.
    pub fn chunk(&self, chunk_id: usize) -> Option<&[T]> {
        self.directory().chunk(chunk_id)
    }

    /// Number of chunks allocated so far.
    pub fn chunk_count(&self) -> usize {
        self.directory().chunk_count()
    }

    /// Total element slots across allocated chunks.
    pub fn capacity(&self) -> usize {
        self.directory().capacity()
    }

    /// Bytes reserved for element storage.
    pub fn memory_bytes(&self) -> usize {
        self.directory().memory_bytes()
    }
}

impl<T> fmt::Debug for AppendList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppendList")
            .field("len", &self.len())
            .field("chunks", &self.chunk_count())
            .field("capacity", &self.capacity())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_has_nothing() {
        let list = AppendList::<u32>::new();
        assert_eq!(list.len(), 0);
        assert!(list.is_empty());
        assert_eq!(list.get(0), None);
        assert_eq!(list.chunk_count(), 0);
    }

    #[test]
    fn ten_values_fill_two_chunks() {
        let list = AppendList::new();
        for v in 1..=10 {
            list.append(v);
        }
        assert_eq!(list.len(), 10);
        assert_eq!(list.chunk(0), Some(&[1, 2, 3, 4][..]));
        assert_eq!(list.chunk(1), Some(&[5, 6, 7, 8, 9, 10][..]));
        assert_eq!(list.chunk(2), None);
        assert_eq!(list.get(9), Some(&10));
        assert_eq!(list.get(10), None);
        assert_eq!(list.capacity(), 12);
    }

    #[test]
    fn append_returns_values_in_order() {
        let list = AppendList::new();
        for k in 0..500u64 {
            list.append(k * 3);
        }
        for j in 0..500u64 {
            assert_eq!(list.get(j as usize), Some(&(j * 3)));
        }
        assert_eq!(list.get(500), None);
    }

    #[test]
    fn reference_survives_new_chunks() {
        let list = AppendList::new();
        list.append(vec![1u8, 2, 3]);
        let first = list.get(0).unwrap();
        let addr = first as *const Vec<u8>;
        for _ in 0..10_000 {
            list.append(Vec::new());
        }
        assert_eq!(first, &[1, 2, 3]);
        assert_eq!(list.get(0).unwrap() as *const Vec<u8>, addr);
    }

    #[test]
    fn debug_reports_shape() {
        let list = AppendList::new();
        list.append(1u8);
        let rendered = format!("{list:?}");
        assert!(rendered.contains("len: 1"));
        assert!(rendered.contains("chunks: 1"));
    }

    #[test]
    fn list_can_move_to_another_thread() {
        let list = AppendList::new();
        list.append(7u32);
        let handle = std::thread::spawn(move || {
            list.append(8);
            list.len()
        });
        assert_eq!(handle.join().unwrap(), 2);
    }

    mod reentry {
        use std::cell::Cell;

        use tracing::{span, Event, Metadata, Subscriber};

        use super::*;

        thread_local! {
            static LIST: AppendList<u32> = AppendList::new();
            static IN_EVENT: Cell<bool> = const { Cell::new(false) };
            static NESTED_APPENDS: Cell<usize> = const { Cell::new(0) };
        }

        /// Appends to the thread-local list from inside every event and
        /// checks the list is consistent at that moment.
        struct AppendingSubscriber;

        impl Subscriber for AppendingSubscriber {
            fn enabled(&self, _: &Metadata<'_>) -> bool {
                true
            }

            fn new_span(&self, _: &span::Attributes<'_>) -> span::Id {
                span::Id::from_u64(1)
            }

            fn record(&self, _: &span::Id, _: &span::Record<'_>) {}

            fn record_follows_from(&self, _: &span::Id, _: &span::Id) {}

            fn event(&self, _: &Event<'_>) {
                if IN_EVENT.replace(true) {
                    return;
                }
                LIST.with(|list| {
                    let len = list.len();
                    assert!(len > 0);
                    assert!(list.get(len - 1).is_some());
                    assert!(list.get(len).is_none());
                    list.append(99);
                    assert_eq!(list.len(), len + 1);
                });
                NESTED_APPENDS.set(NESTED_APPENDS.get() + 1);
                IN_EVENT.set(false);
            }

            fn enter(&self, _: &span::Id) {}

            fn exit(&self, _: &span::Id) {}
        }

        #[test]
        fn subscriber_can_append_during_allocation_event() {
            tracing::subscriber::with_default(AppendingSubscriber, || {
                LIST.with(|list| {
                    list.append(1);
                    // Chunk 0 was allocated; the subscriber appended 99 after it.
                    assert_eq!(list.len(), 2);
                    assert_eq!(list.get(0), Some(&1));
                    assert_eq!(list.get(1), Some(&99));
                    assert_eq!(list.chunk_count(), 1);

                    list.append(2);
                    assert_eq!(list.len(), 3);
                    assert_eq!(list.get(2), Some(&2));

                    for v in 3..100 {
                        list.append(v);
                    }
                    let nested = NESTED_APPENDS.get();
                    assert_eq!(nested, list.chunk_count());
                    assert_eq!(list.len(), 99 + nested);
                    for id in 0..list.chunk_count() - 1 {
                        assert_eq!(
                            list.chunk(id).map(<[u32]>::len),
                            Some(crate::placement::chunk_size(id))
                        );
                    }
                    let own: Vec<u32> = (0..list.len())
                        .filter_map(|i| list.get(i).copied())
                        .filter(|&v| v != 99)
                        .collect();
                    assert_eq!(own, (1..100).filter(|&v| v != 99).collect::<Vec<_>>());
                });
            });
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn len_and_get_agree_with_appends(
                values in proptest::collection::vec(any::<i64>(), 0..300),
            ) {
                let list = AppendList::new();
                for &v in &values {
                    list.append(v);
                }
                prop_assert_eq!(list.len(), values.len());
                for (j, v) in values.iter().enumerate() {
                    prop_assert_eq!(list.get(j), Some(v));
                }
                prop_assert_eq!(list.get(values.len()), None);
            }

            #[test]
            fn only_last_chunk_is_partial(count in 1usize..2000) {
                let list = AppendList::new();
                for v in 0..count {
                    list.append(v);
                }
                let last = list.chunk_count() - 1;
                for id in 0..last {
                    let chunk = list.chunk(id).unwrap();
                    prop_assert_eq!(chunk.len(), crate::placement::chunk_size(id));
                }
                prop_assert!(!list.chunk(last).unwrap().is_empty());
            }
        }
    }
}
