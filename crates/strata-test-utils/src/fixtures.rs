//! Reusable value fixtures for list tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Shared counter of [`Tracked`] drops.
///
/// Hand out values with [`DropCounter::track`] and read the total with
/// [`DropCounter::dropped`].
#[derive(Default)]
pub struct DropCounter {
    count: Arc<AtomicUsize>,
}

impl DropCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap `value` so that dropping it bumps this counter.
    pub fn track<V>(&self, value: V) -> Tracked<V> {
        Tracked {
            value,
            counter: Arc::clone(&self.count),
        }
    }

    /// Number of tracked values dropped so far.
    pub fn dropped(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

/// A value that reports its drop to a [`DropCounter`].
pub struct Tracked<V> {
    pub value: V,
    counter: Arc<AtomicUsize>,
}

impl<V> Drop for Tracked<V> {
    fn drop(&mut self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }
}

/// Eight words all derived from `id`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stamped {
    pub id: u64,
    words: [u64; 8],
}

impl Stamped {
    pub fn new(id: u64) -> Self {
        let mut words = [0u64; 8];
        for (k, w) in words.iter_mut().enumerate() {
            *w = id.wrapping_mul(0x9E37_79B9_7F4A_7C15).rotate_left(k as u32 * 8) ^ k as u64;
        }
        Self { id, words }
    }

    /// Whether every word matches what [`Stamped::new`] would produce for `id`.
    pub fn is_intact(&self) -> bool {
        *self == Self::new(self.id)
    }
}

/// Address of the referenced value, for stability checks.
pub fn address_of<T>(value: &T) -> usize {
    value as *const T as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracked_drop_is_counted_once() {
        let counter = DropCounter::new();
        let a = counter.track(1);
        let b = counter.track(2);
        assert_eq!(counter.dropped(), 0);
        drop(a);
        assert_eq!(counter.dropped(), 1);
        drop(b);
        assert_eq!(counter.dropped(), 2);
    }

    #[test]
    fn stamped_detects_tampering() {
        let mut s = Stamped::new(42);
        assert!(s.is_intact());
        s.words[3] ^= 1;
        assert!(!s.is_intact());
    }
}
