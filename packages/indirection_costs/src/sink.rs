//! Optimizer-opaque destination for benchmark results.

use std::hint::black_box;

/// Receives the accumulated result of every benchmark pass.
///
/// A timed loop whose result nobody reads can be deleted outright by the optimizer, which then
/// reports near-zero time for work that never ran. Every value written here passes through
/// [`black_box`], so the compiler has to assume it is observed and must compute it. The last
/// written value is also kept, which lets tests check what a pass actually computed.
///
/// # Examples
///
/// ```
/// use indirection_costs::OpaqueSink;
///
/// let mut sink = OpaqueSink::new();
/// sink.record(42_i64);
///
/// assert_eq!(sink.last(), Some(42));
/// assert_eq!(sink.writes(), 1);
/// ```
#[derive(Debug)]
pub struct OpaqueSink<T> {
    last: Option<T>,
    writes: u64,
}

impl<T: Copy> OpaqueSink<T> {
    /// Creates a sink that has not received any value yet.
    #[must_use]
    pub fn new() -> Self {
        Self {
            last: None,
            writes: 0,
        }
    }

    /// Publishes the accumulator of one pass.
    #[inline]
    pub fn record(&mut self, value: T) {
        self.last = Some(black_box(value));
        self.writes = self.writes.wrapping_add(1);
    }

    /// Forces a value (typically a freshly allocated record) to be materialized in memory.
    ///
    /// Unlike [`record()`](Self::record), this keeps nothing: it only prevents the optimizer from
    /// proving that the value, or the allocation holding it, is never needed.
    #[inline]
    pub fn touch<V: ?Sized>(&self, value: &V) {
        black_box(value);
    }

    /// The most recently recorded value, if any.
    #[must_use]
    pub fn last(&self) -> Option<T> {
        self.last
    }

    /// How many values have been recorded.
    #[must_use]
    pub fn writes(&self) -> u64 {
        self.writes
    }
}

impl<T: Copy> Default for OpaqueSink<T> {
    fn default() -> Self {
        Self::new()
    }
}
