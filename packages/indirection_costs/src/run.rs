// Core of the benchmark executables, free of process-global dependencies so tests can drive it.

use std::num::NonZero;

use crate::error::Result;
use crate::{ComparisonReport, Error, Harness, ProblemSize, Scenario};

/// Input parameters for the [`run`] function.
///
/// Overrides left as `None` fall back to the scenario's defaults.
#[doc(hidden)]
#[derive(Debug)]
#[allow(
    clippy::exhaustive_structs,
    reason = "This is a hidden struct for internal/test use only"
)]
pub struct RunInput {
    /// Scenario to run.
    pub scenario: Scenario,
    /// Overrides the number of records.
    pub elements: Option<usize>,
    /// Overrides the number of timed passes.
    pub iterations: Option<u32>,
    /// Skips the warm-up run.
    pub skip_warmup: bool,
}

impl RunInput {
    /// Input that runs the scenario exactly as published: default size, with warm-up.
    #[must_use]
    pub fn defaults(scenario: Scenario) -> Self {
        Self {
            scenario,
            elements: None,
            iterations: None,
            skip_warmup: false,
        }
    }

    /// Resolves overrides against the scenario defaults.
    pub(crate) fn problem_size(&self) -> Result<ProblemSize> {
        let defaults = self.scenario.default_size();

        let elements = match self.elements {
            Some(elements) => NonZero::new(elements).ok_or(Error::ZeroElements)?,
            None => defaults.elements(),
        };

        let iterations = match self.iterations {
            Some(_) if !self.scenario.accepts_iterations() => {
                return Err(Error::IterationsNotApplicable {
                    scenario: self.scenario.name(),
                });
            }
            Some(iterations) => NonZero::new(iterations).ok_or(Error::ZeroIterations)?,
            None => defaults.iterations(),
        };

        Ok(ProblemSize::new(elements, iterations))
    }
}

/// Validates the input, runs the scenario and returns its report.
#[doc(hidden)]
pub fn run(input: &RunInput) -> Result<ComparisonReport> {
    let size = input.problem_size()?;

    Ok(input
        .scenario
        .run(&Harness::new(), size, !input.skip_warmup))
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn defaults_resolve_to_scenario_size() {
        for scenario in Scenario::ALL {
            let size = RunInput::defaults(scenario).problem_size().unwrap();

            assert_eq!(size, scenario.default_size());
        }
    }

    #[test]
    fn overrides_replace_defaults() {
        let input = RunInput {
            elements: Some(42),
            iterations: Some(3),
            ..RunInput::defaults(Scenario::PointerChasing)
        };

        let size = input.problem_size().unwrap();

        assert_eq!(size.elements().get(), 42);
        assert_eq!(size.iterations().get(), 3);
    }

    #[test]
    fn zero_elements_rejected() {
        let input = RunInput {
            elements: Some(0),
            ..RunInput::defaults(Scenario::VirtualDispatch)
        };

        assert!(matches!(input.problem_size(), Err(Error::ZeroElements)));
    }

    #[test]
    fn zero_iterations_rejected() {
        let input = RunInput {
            iterations: Some(0),
            ..RunInput::defaults(Scenario::PointerChasing)
        };

        assert!(matches!(input.problem_size(), Err(Error::ZeroIterations)));
    }

    #[test]
    fn iterations_rejected_for_allocation() {
        let input = RunInput {
            iterations: Some(5),
            ..RunInput::defaults(Scenario::AllocationRealistic)
        };

        assert!(matches!(
            input.problem_size(),
            Err(Error::IterationsNotApplicable {
                scenario: "allocation_realistic"
            })
        ));
    }

    #[test]
    fn run_produces_report() {
        let input = RunInput {
            elements: Some(16),
            iterations: Some(2),
            skip_warmup: true,
            ..RunInput::defaults(Scenario::BoxedDispatch)
        };

        let report = run(&input).unwrap();

        assert!(report.to_string().contains("Elements: 16\n"));
    }

    #[test]
    fn run_rejects_invalid_input() {
        let input = RunInput {
            elements: Some(0),
            ..RunInput::defaults(Scenario::Allocation)
        };

        assert!(run(&input).is_err());
    }
}
