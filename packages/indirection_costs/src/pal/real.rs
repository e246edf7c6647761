use std::time::{Duration, Instant};

use crate::pal::Platform;

/// Reads time from the operating system's monotonic clock via [`Instant`].
#[derive(Clone, Copy, Debug)]
pub(crate) struct RealPlatform {
    origin: Instant,
}

impl RealPlatform {
    pub(crate) fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Platform for RealPlatform {
    #[inline]
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}
