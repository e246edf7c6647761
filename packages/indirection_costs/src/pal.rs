//! Platform abstraction layer for the benchmark clock.
//!
//! The harness reads time through this layer so that tests can substitute a fake clock whose
//! readings they control, making elapsed-time properties deterministic.

mod abstractions;
mod facade;
#[cfg(test)]
mod fake;
mod real;

pub(crate) use abstractions::Platform;
pub(crate) use facade::PlatformFacade;
#[cfg(test)]
pub(crate) use fake::FakePlatform;
pub(crate) use real::RealPlatform;
