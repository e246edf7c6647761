//! Human-readable benchmark reports.

use std::fmt;
use std::time::Duration;

use crate::{AllocationDelta, Measurement, counting_active};

/// Timing results for one variant of a scenario.
#[derive(Clone, Debug)]
pub struct VariantReport {
    label: &'static str,
    elapsed: Duration,
    nanos_per_operation: f64,
    allocations: Option<AllocationDelta>,
}

impl VariantReport {
    /// Summarizes a measurement under the given label.
    ///
    /// Allocation counts are only kept when a [`CountingAllocator`](crate::CountingAllocator)
    /// is active, since they would otherwise read zero and mislead.
    #[must_use]
    pub fn from_measurement<T: Copy>(label: &'static str, measurement: &Measurement<T>) -> Self {
        Self {
            label,
            elapsed: measurement.elapsed(),
            nanos_per_operation: measurement.nanos_per_operation(),
            allocations: counting_active().then(|| measurement.lifecycle_allocations()),
        }
    }

    #[cfg(test)]
    pub(crate) fn new(
        label: &'static str,
        elapsed: Duration,
        nanos_per_operation: f64,
        allocations: Option<AllocationDelta>,
    ) -> Self {
        Self {
            label,
            elapsed,
            nanos_per_operation,
            allocations,
        }
    }

    /// Description of the variant.
    #[must_use]
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Time spent in the timed region.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Mean nanoseconds per operation.
    #[must_use]
    pub fn nanos_per_operation(&self) -> f64 {
        self.nanos_per_operation
    }

    /// Allocation activity from setup to teardown, if counted.
    #[must_use]
    pub fn allocations(&self) -> Option<AllocationDelta> {
        self.allocations
    }

    fn write_block(&self, f: &mut fmt::Formatter<'_>, unit: &str) -> fmt::Result {
        writeln!(f, "{}:", self.label)?;
        writeln!(
            f,
            "  Total time: {:.2} ms",
            self.elapsed.as_secs_f64() * 1000.0
        )?;
        writeln!(f, "  Time per {unit}: {:.2} ns", self.nanos_per_operation)?;

        if let Some(allocations) = self.allocations {
            writeln!(f, "  Allocations: {allocations}")?;
        }

        Ok(())
    }
}

/// The outcome of one scenario: a slower baseline variant against a faster contender.
#[derive(Clone, Debug)]
pub struct ComparisonReport {
    title: &'static str,
    header: Vec<String>,
    unit: &'static str,
    baseline: VariantReport,
    contender: VariantReport,
    winner: &'static str,
    notes: &'static [&'static str],
}

impl ComparisonReport {
    #[must_use]
    pub(crate) fn new(
        title: &'static str,
        header: Vec<String>,
        unit: &'static str,
        baseline: VariantReport,
        contender: VariantReport,
        winner: &'static str,
        notes: &'static [&'static str],
    ) -> Self {
        Self {
            title,
            header,
            unit,
            baseline,
            contender,
            winner,
            notes,
        }
    }

    /// The variant expected to be slower.
    #[must_use]
    pub fn baseline(&self) -> &VariantReport {
        &self.baseline
    }

    /// The variant expected to be faster.
    #[must_use]
    pub fn contender(&self) -> &VariantReport {
        &self.contender
    }

    /// How many times faster the contender ran than the baseline.
    ///
    /// `None` if the contender took no measurable time.
    #[must_use]
    pub fn speedup(&self) -> Option<f64> {
        if self.contender.elapsed.is_zero() {
            return None;
        }

        Some(self.baseline.elapsed.as_secs_f64() / self.contender.elapsed.as_secs_f64())
    }

    /// Prints the report to stdout.
    #[cfg_attr(test, mutants::skip)] // Too difficult to test stdout output reliably - manually tested.
    pub fn print_to_stdout(&self) {
        print!("{self}");
    }
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        for line in &self.header {
            writeln!(f, "{line}")?;
        }
        writeln!(f)?;

        self.baseline.write_block(f, self.unit)?;
        writeln!(f)?;
        self.contender.write_block(f, self.unit)?;
        writeln!(f)?;

        match self.speedup() {
            Some(speedup) => writeln!(f, "Speedup: {speedup:.2}x faster for {}", self.winner)?,
            None => writeln!(
                f,
                "Speedup: not measurable, {} took no time at all",
                self.contender.label
            )?,
        }

        if !self.notes.is_empty() {
            writeln!(f)?;
            for note in self.notes {
                writeln!(f, "{note}")?;
            }
        }

        Ok(())
    }
}
