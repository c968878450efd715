//! Iterator protocol extensions.
//!
//! Plain [`Iterator::next`] covers pulling values; `None` means done. These
//! traits add early termination and restarting from scratch.

use crate::Result;

/// An iterator that can be finished early.
///
/// Once stopped (or exhausted) an implementor never yields another value.
pub trait StopIterator: Iterator {
    /// Finish the iterator.
    ///
    /// `value` is handed back on this call only; it is not stored, so later
    /// calls to `next` return plain `None`.
    fn stop<R>(&mut self, value: Option<R>) -> Option<R>;

    /// Whether the iterator is permanently done.
    fn is_done(&self) -> bool;
}

/// An iterator that can produce a fresh, independent copy of itself.
///
/// The copy starts from the beginning no matter how far `self` has advanced
/// or whether it was stopped.
pub trait Reiterable: Sized {
    fn reiter(&self) -> Result<Self>;
}
