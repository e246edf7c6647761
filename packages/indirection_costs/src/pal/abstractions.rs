//! Platform abstraction trait definitions.

use std::fmt::Debug;
use std::time::Duration;

/// Provides monotonic wall-clock readings.
///
/// Readings are offsets from an arbitrary per-platform origin. Only differences between two
/// readings of the same platform instance are meaningful.
pub(crate) trait Platform: Debug + Send + Sync + 'static {
    /// Reads the monotonic clock.
    fn now(&self) -> Duration;
}
