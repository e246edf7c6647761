#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Micro-benchmarks of three hardware-level costs, each measured against its value-semantics
//! counterpart:
//!
//! - cache misses from pointer-based storage versus contiguous storage;
//! - indirect calls from dynamic dispatch versus static, inlinable calls;
//! - heap allocation versus stack or in-collection value storage.
//!
//! The core functionality includes:
//! - [`Harness`] - Times a [`Workload`] with setup and teardown kept outside the timed region
//! - [`Workload`] - A benchmark body, implemented once per storage, dispatch or allocation discipline
//! - [`OpaqueSink`] - Publishes every pass result so the optimizer cannot delete the measured loop
//! - [`Scenario`] - Pairs a slower and a faster workload and describes the comparison
//! - [`CountingAllocator`] - Counts allocations and releases to verify the ownership discipline
//!
//! Each scenario also has an executable (`pointer_chasing`, `virtual_dispatch`,
//! `boxed_dispatch`, `allocation`, `allocation_realistic`) that prints the comparison.
//!
//! This package is not meant for use in production, serving only as a development tool.
//!
//! # Measuring a workload
//!
//! ```
//! use std::num::NonZero;
//!
//! use indirection_costs::{Harness, ProblemSize, ScatteredPass};
//!
//! let harness = Harness::new();
//! let size = ProblemSize::new(NonZero::new(1000).unwrap(), NonZero::new(10).unwrap());
//!
//! harness.warm_up(&ScatteredPass::new());
//! let measurement = harness.measure(&ScatteredPass::new(), size);
//!
//! println!(
//!     "{:?} total, {:.2} ns per element",
//!     measurement.elapsed(),
//!     measurement.nanos_per_operation()
//! );
//! ```
//!
//! # Running a scenario
//!
//! ```
//! use std::num::NonZero;
//!
//! use indirection_costs::{Harness, ProblemSize, Scenario};
//!
//! let size = ProblemSize::new(NonZero::new(1000).unwrap(), NonZero::new(10).unwrap());
//! let report = Scenario::VirtualDispatch.run(&Harness::new(), size, true);
//!
//! report.print_to_stdout();
//! ```
//!
//! # Interpreting results
//!
//! No specific speedup is a target. Only the direction is expected to hold: contiguous, static
//! and value-resident variants are faster than scattered, dynamic and heap-allocated ones.
//!
//! # Miri compatibility
//!
//! The tests that install [`CountingAllocator`] as the global allocator cannot run under Miri,
//! which replaces the global allocator with its own logic.

mod allocator;
mod cli;
mod error;
mod harness;
mod pal;
mod population;
mod records;
mod report;
mod run;
mod scenario;
mod sink;
mod workload;

pub use allocator::*;
#[doc(hidden)]
pub use cli::main_for;
pub use error::Error;
pub use harness::*;
pub use population::*;
pub use records::*;
pub use report::*;
pub use run::{RunInput, run};
pub use scenario::Scenario;
pub use sink::OpaqueSink;
pub use workload::*;

#[cfg(test)]
pub(crate) const ERR_POISONED_LOCK: &str =
    "encountered poisoned lock - program validity cannot be guaranteed";
