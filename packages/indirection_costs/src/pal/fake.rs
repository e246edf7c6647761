//! Fake platform implementation for testing.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::ERR_POISONED_LOCK;
use crate::pal::abstractions::Platform;

/// Fake clock whose readings are controlled by the test.
///
/// Clones share the same underlying reading, so a test can hand one clone to the harness and
/// advance time through another (for example from inside a test workload) to simulate work.
#[derive(Clone, Debug)]
pub(crate) struct FakePlatform {
    now: Arc<Mutex<Duration>>,
}

impl FakePlatform {
    /// Creates a fake clock that reads zero until advanced.
    pub(crate) fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    /// Moves the clock forward, affecting all clones.
    pub(crate) fn advance(&self, by: Duration) {
        let mut now = self.now.lock().expect(ERR_POISONED_LOCK);
        *now = now
            .checked_add(by)
            .expect("fake clock overflowed Duration - this indicates a broken test");
    }
}

impl Platform for FakePlatform {
    fn now(&self) -> Duration {
        *self.now.lock().expect(ERR_POISONED_LOCK)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn initializes_with_zero_time() {
        let platform = FakePlatform::new();
        assert_eq!(platform.now(), Duration::ZERO);
    }

    #[test]
    fn advance_accumulates() {
        let platform = FakePlatform::new();
        platform.advance(Duration::from_millis(100));
        platform.advance(Duration::from_millis(50));

        assert_eq!(platform.now(), Duration::from_millis(150));
    }

    #[test]
    fn shared_state_between_clones() {
        let platform1 = FakePlatform::new();
        let platform2 = platform1.clone();

        platform1.advance(Duration::from_millis(100));
        assert_eq!(platform2.now(), Duration::from_millis(100));
    }
}
