use std::result;

use thiserror::Error;

/// Errors that can occur when validating a benchmark run request.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The caller asked for a population of zero records.
    #[error("the number of elements must be at least 1")]
    ZeroElements,

    /// The caller asked for zero timed passes.
    #[error("the number of iterations must be at least 1")]
    ZeroIterations,

    /// The caller set an iteration count for a scenario that times each allocation once.
    #[error(
        "the {scenario} scenario measures every allocation exactly once and does not accept an iteration count"
    )]
    IterationsNotApplicable {
        /// Name of the scenario that rejected the iteration count.
        scenario: &'static str,
    },
}

/// A specialized `Result` type for benchmark run requests, returning the crate's
/// [`Error`] type as the error value.
pub(crate) type Result<T> = result::Result<T, Error>;

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::fmt::Debug;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Error: Send, Sync, Debug);

    #[test]
    fn iterations_not_applicable_names_scenario() {
        let error = Error::IterationsNotApplicable {
            scenario: "allocation",
        };

        assert!(error.to_string().contains("allocation scenario"));
    }
}
