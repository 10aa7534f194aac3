//! List error types.

use std::error::Error;
use std::fmt;

/// Errors returned by [`crate::SharedAppendList::try_append`].
///
/// The rejected value is handed back so the caller can retry or drop it.
#[derive(Clone, PartialEq, Eq)]
pub enum AppendError<T> {
    /// Another append on the same list was in flight.
    Contended(T),
}

impl<T> AppendError<T> {
    /// Recover the value that was not appended.
    pub fn into_inner(self) -> T {
        match self {
            Self::Contended(value) => value,
        }
    }
}

impl<T> fmt::Debug for AppendError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contended(_) => f.write_str("Contended(..)"),
        }
    }
}

impl<T> fmt::Display for AppendError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contended(_) => write!(f, "append contended: another append is in progress"),
        }
    }
}

impl<T> Error for AppendError<T> {}
