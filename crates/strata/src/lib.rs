//! Append-only chunked lists whose elements never move.
//!
//! Elements are stored in geometrically growing chunks. A chunk is
//! allocated once at its final size and only ever filled, so a reference to
//! an element stays valid while further elements are appended through a
//! shared `&self` handle.
//!
//! # Architecture
//!
//! ```text
//! AppendList<T> (single thread, !Sync)
//! └── UnsafeCell<ChunkDirectory<T>>
//!     └── SmallVec<Chunk<T>> → Chunk (Vec<T>, capacity C·2^id, never grown)
//!
//! SharedAppendList<T> (Sync, lock-free reads)
//! ├── [AtomicPtr<T>; MAX_CHUNKS] (fixed directory, never reallocated)
//! └── AtomicUsize len (Release on append, Acquire on read)
//!
//! placement: chunk_size / chunk_start / index_chunk (pure arithmetic)
//! ```
//!
//! # Unsafe code
//!
//! `unsafe` is confined to `list.rs` (the `UnsafeCell` boundary) and
//! `shared.rs` (raw chunk storage and atomic publication). Every other
//! module denies it.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod chunk;
pub mod config;
pub mod directory;
pub mod error;
pub mod list;
pub mod placement;
pub mod shared;

// Public re-exports for the primary API surface.
pub use config::{BASE_CHUNK_CAPACITY, MAX_CHUNKS, MAX_LEN};
pub use error::AppendError;
pub use list::AppendList;
pub use placement::{chunk_size, chunk_start, index_chunk};
pub use shared::SharedAppendList;
