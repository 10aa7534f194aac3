//! Test fixtures for strata development.
//!
//! - [`DropCounter`] / [`Tracked`] count how many stored values were dropped.
//! - [`Stamped`] is a multi-word value whose words are all derived from one
//!   id, so a torn or stale read is detectable.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{address_of, DropCounter, Stamped, Tracked};
