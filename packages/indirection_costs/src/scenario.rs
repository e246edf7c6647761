//! The benchmark scenarios: which workloads are compared, at what size, and how the
//! comparison is described.

use std::fmt;
use std::num::NonZero;

use tracing::debug;

use crate::{
    BoxedDispatchPass, ComparisonReport, ContiguousPass, CostBasis, DynamicDispatchPass, Harness,
    HeapAllocateDiscard, HeapAllocateRetain, PaddedPoint, ProblemSize, ScatteredPass,
    StackAllocateDiscard, StaticDispatchPass, ValueAllocateRetain, VariantReport, Workload,
};

/// One of the benchmark programs.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum Scenario {
    /// Pointer array versus contiguous value array.
    PointerChasing,

    /// Dynamic versus static dispatch over the same contiguous storage.
    VirtualDispatch,

    /// Boxed trait objects versus inline concrete values, mixing storage and dispatch costs.
    BoxedDispatch,

    /// Allocate-and-discard on the heap versus on the stack.
    Allocation,

    /// Allocate-and-retain into a pointer vector versus a value vector.
    AllocationRealistic,
}

/// Fixed text describing a scenario.
#[derive(Debug)]
struct Description {
    title: &'static str,
    unit: &'static str,
    baseline: &'static str,
    contender: &'static str,
    winner: &'static str,
    notes: &'static [&'static str],
}

const POINTER_CHASING: Description = Description {
    title: "Benchmarking pointer chasing vs contiguous memory",
    unit: "element",
    baseline: "Pointer array (scattered heap)",
    contender: "Value array (contiguous memory)",
    winner: "contiguous memory",
    notes: &[],
};

const VIRTUAL_DISPATCH: Description = Description {
    title: "Benchmarking virtual dispatch vs static dispatch",
    unit: "call",
    baseline: "Dynamic dispatch (trait object + vtable)",
    contender: "Static dispatch (concrete type)",
    winner: "static dispatch",
    notes: &[],
};

const BOXED_DISPATCH: Description = Description {
    title: "Benchmarking boxed trait objects vs inline concrete values",
    unit: "call",
    baseline: "Boxed trait objects (heap + vtable)",
    contender: "Inline concrete values (contiguous + static)",
    winner: "inline concrete values",
    notes: &[
        "Note: this combines pointer chasing with dynamic dispatch.",
        "See virtual_dispatch for the cost of the dispatch alone.",
    ],
};

const ALLOCATION: Description = Description {
    title: "Benchmarking heap vs stack allocation",
    unit: "allocation",
    baseline: "Heap allocation (Box::new + drop)",
    contender: "Stack allocation (automatic storage)",
    winner: "stack allocation",
    notes: &[],
};

const ALLOCATION_REALISTIC: Description = Description {
    title: "Benchmarking realistic allocation patterns",
    unit: "allocation",
    baseline: "Heap allocation (Box::new + store pointer)",
    contender: "Value storage (push value into Vec)",
    winner: "value storage",
    notes: &[
        "Note: This measures allocation + initialization + storage.",
        "Heap requires one allocation per object, the value vector was reserved up front.",
    ],
};

impl Scenario {
    /// Every scenario, in the order a full suite runs them.
    pub const ALL: [Self; 5] = [
        Self::PointerChasing,
        Self::VirtualDispatch,
        Self::BoxedDispatch,
        Self::Allocation,
        Self::AllocationRealistic,
    ];

    /// Name of the executable running this scenario.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::PointerChasing => "pointer_chasing",
            Self::VirtualDispatch => "virtual_dispatch",
            Self::BoxedDispatch => "boxed_dispatch",
            Self::Allocation => "allocation",
            Self::AllocationRealistic => "allocation_realistic",
        }
    }

    /// How reported cost is divided for this scenario.
    #[must_use]
    pub const fn cost_basis(self) -> CostBasis {
        match self {
            Self::PointerChasing | Self::VirtualDispatch | Self::BoxedDispatch => {
                CostBasis::PerElementPerPass
            }
            Self::Allocation | Self::AllocationRealistic => CostBasis::PerElement,
        }
    }

    /// Whether an iteration count is meaningful for this scenario.
    #[must_use]
    pub const fn accepts_iterations(self) -> bool {
        matches!(self.cost_basis(), CostBasis::PerElementPerPass)
    }

    /// The problem size the scenario runs at when nothing is overridden.
    #[must_use]
    pub const fn default_size(self) -> ProblemSize {
        let (elements, iterations): (usize, u32) = match self {
            Self::PointerChasing => (1_000_000, 100),
            Self::VirtualDispatch | Self::BoxedDispatch => (10_000_000, 10),
            Self::Allocation => (10_000_000, 1),
            Self::AllocationRealistic => (1_000_000, 1),
        };

        ProblemSize::new(
            NonZero::new(elements).expect("defaults are nonzero"),
            NonZero::new(iterations).expect("defaults are nonzero"),
        )
    }

    const fn description(self) -> &'static Description {
        match self {
            Self::PointerChasing => &POINTER_CHASING,
            Self::VirtualDispatch => &VIRTUAL_DISPATCH,
            Self::BoxedDispatch => &BOXED_DISPATCH,
            Self::Allocation => &ALLOCATION,
            Self::AllocationRealistic => &ALLOCATION_REALISTIC,
        }
    }

    fn header(self, size: ProblemSize) -> Vec<String> {
        let elements = size.elements().get();
        let iterations = size.iterations().get();

        match self {
            Self::PointerChasing => vec![
                format!("Elements: {elements}"),
                format!("Iterations: {iterations}"),
            ],
            Self::VirtualDispatch | Self::BoxedDispatch => vec![
                format!("Elements: {elements}"),
                format!("Iterations: {iterations}"),
                format!(
                    "Total calls: {}",
                    size.operations(CostBasis::PerElementPerPass)
                ),
            ],
            Self::Allocation => vec![format!("Allocations: {elements}")],
            Self::AllocationRealistic => vec![
                format!("Allocations: {elements}"),
                format!("Object size: {} bytes", PaddedPoint::SIZE_BYTES),
            ],
        }
    }

    /// Runs both variants of the scenario, optionally warming each up first.
    pub fn run(self, harness: &Harness, size: ProblemSize, warm_up: bool) -> ComparisonReport {
        let size = size.for_basis(self.cost_basis());

        debug!(
            scenario = self.name(),
            elements = size.elements().get(),
            iterations = size.iterations().get(),
            warm_up,
            "running scenario"
        );

        let comparison = Comparison {
            harness,
            size,
            warm_up,
            text: self.description(),
        };

        let (baseline, contender) = match self {
            Self::PointerChasing => comparison.run(&ScatteredPass::new(), &ContiguousPass::new()),
            Self::VirtualDispatch => {
                comparison.run(&DynamicDispatchPass::new(), &StaticDispatchPass::new())
            }
            Self::BoxedDispatch => comparison.run(&BoxedDispatchPass, &StaticDispatchPass::new()),
            Self::Allocation => comparison.run(&HeapAllocateDiscard, &StackAllocateDiscard),
            Self::AllocationRealistic => {
                comparison.run(&HeapAllocateRetain, &ValueAllocateRetain)
            }
        };

        let text = self.description();

        ComparisonReport::new(
            text.title,
            self.header(size),
            text.unit,
            baseline,
            contender,
            text.winner,
            text.notes,
        )
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Runs two workloads under identical conditions.
struct Comparison<'a> {
    harness: &'a Harness,
    size: ProblemSize,
    warm_up: bool,
    text: &'static Description,
}

impl Comparison<'_> {
    fn run<B: Workload, C: Workload>(
        &self,
        baseline: &B,
        contender: &C,
    ) -> (VariantReport, VariantReport) {
        if self.warm_up {
            self.harness.warm_up(baseline);
            self.harness.warm_up(contender);
        }

        let baseline = self.harness.measure(baseline, self.size);
        let contender = self.harness.measure(contender, self.size);

        (
            VariantReport::from_measurement(self.text.baseline, &baseline),
            VariantReport::from_measurement(self.text.contender, &contender),
        )
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn small(elements: usize, iterations: u32) -> ProblemSize {
        ProblemSize::new(
            NonZero::new(elements).unwrap(),
            NonZero::new(iterations).unwrap(),
        )
    }

    #[test]
    fn defaults_match_published_programs() {
        assert_eq!(Scenario::PointerChasing.default_size(), small(1_000_000, 100));
        assert_eq!(Scenario::VirtualDispatch.default_size(), small(10_000_000, 10));
        assert_eq!(Scenario::Allocation.default_size(), small(10_000_000, 1));
        assert_eq!(
            Scenario::AllocationRealistic.default_size(),
            small(1_000_000, 1)
        );
    }

    #[test]
    fn only_pass_scenarios_accept_iterations() {
        assert!(Scenario::PointerChasing.accepts_iterations());
        assert!(Scenario::VirtualDispatch.accepts_iterations());
        assert!(Scenario::BoxedDispatch.accepts_iterations());
        assert!(!Scenario::Allocation.accepts_iterations());
        assert!(!Scenario::AllocationRealistic.accepts_iterations());
    }

    #[test]
    fn every_scenario_runs_and_reports() {
        let harness = Harness::new();

        for scenario in Scenario::ALL {
            let report = scenario.run(&harness, small(64, 2), false);
            let text = report.to_string();

            assert!(text.starts_with("Benchmarking"), "{scenario}: {text}");
            assert!(text.contains("Speedup: "), "{scenario}: {text}");
            assert!(text.contains(report.baseline().label()), "{scenario}");
            assert!(text.contains(report.contender().label()), "{scenario}");
        }
    }

    #[test]
    fn dispatch_header_counts_total_calls() {
        let report = Scenario::VirtualDispatch.run(&Harness::new(), small(10, 3), false);

        assert!(report.to_string().contains("Total calls: 30\n"));
    }

    #[test]
    fn realistic_header_reports_object_size() {
        let report = Scenario::AllocationRealistic.run(&Harness::new(), small(10, 1), false);
        let text = report.to_string();

        assert!(text.contains("Allocations: 10\n"));
        assert!(text.contains("Object size: 96 bytes\n"));
        assert!(text.contains("Note: This measures allocation"));
    }

    #[test]
    fn allocation_header_ignores_iterations() {
        let report = Scenario::Allocation.run(&Harness::new(), small(10, 9), false);
        let text = report.to_string();

        assert!(!text.contains("Iterations"));
    }

    #[test]
    fn names_are_executable_names() {
        let names: Vec<_> = Scenario::ALL.iter().map(ToString::to_string).collect();

        assert_eq!(
            names,
            [
                "pointer_chasing",
                "virtual_dispatch",
                "boxed_dispatch",
                "allocation",
                "allocation_realistic"
            ]
        );
    }
}
