use std::fmt::Debug;
use std::time::Duration;

#[cfg(test)]
use crate::pal::FakePlatform;
use crate::pal::{Platform, RealPlatform};

/// Dispatches clock readings to the real platform or, in tests, to a fake one.
#[derive(Clone, Debug)]
pub(crate) enum PlatformFacade {
    Real(RealPlatform),

    #[cfg(test)]
    Fake(FakePlatform),
}

impl PlatformFacade {
    pub(crate) fn real() -> Self {
        Self::Real(RealPlatform::new())
    }

    #[cfg(test)]
    pub(crate) fn fake(platform: FakePlatform) -> Self {
        Self::Fake(platform)
    }
}

impl Platform for PlatformFacade {
    #[inline]
    fn now(&self) -> Duration {
        match self {
            Self::Real(p) => p.now(),
            #[cfg(test)]
            Self::Fake(p) => p.now(),
        }
    }
}
