//! The timed micro-benchmark harness.

use std::num::NonZero;
use std::time::Duration;

use tracing::{debug, trace};

use crate::pal::{Platform, PlatformFacade};
use crate::{AllocationCounters, AllocationDelta, CostBasis, OpaqueSink, Workload};

/// How many records a workload operates on and how many passes the harness times.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ProblemSize {
    elements: NonZero<usize>,
    iterations: NonZero<u32>,
}

impl ProblemSize {
    /// Size of the warm-up run performed before every timed run.
    pub const WARM_UP: Self = Self {
        elements: NonZero::new(1000).expect("literal is nonzero"),
        iterations: NonZero::new(10).expect("literal is nonzero"),
    };

    /// `elements` records, `iterations` timed passes.
    #[must_use]
    pub const fn new(elements: NonZero<usize>, iterations: NonZero<u32>) -> Self {
        Self {
            elements,
            iterations,
        }
    }

    /// `elements` records, one timed pass. The only valid shape for allocation workloads.
    #[must_use]
    pub const fn single_pass(elements: NonZero<usize>) -> Self {
        Self::new(elements, NonZero::<u32>::MIN)
    }

    /// Number of records.
    #[must_use]
    pub const fn elements(&self) -> NonZero<usize> {
        self.elements
    }

    /// Number of timed passes.
    #[must_use]
    pub const fn iterations(&self) -> NonZero<u32> {
        self.iterations
    }

    /// The size a workload with the given cost basis actually runs at.
    ///
    /// Per-element workloads run a single pass no matter what was asked for, since repeating
    /// them would not repeat the same allocations.
    #[must_use]
    pub const fn for_basis(self, basis: CostBasis) -> Self {
        match basis {
            CostBasis::PerElementPerPass => self,
            CostBasis::PerElement => Self::single_pass(self.elements),
        }
    }

    /// How many operations the elapsed time of one run is divided by.
    ///
    /// # Panics
    ///
    /// Panics if the count does not fit in `u64`, which no realistic run reaches.
    #[must_use]
    pub fn operations(&self, basis: CostBasis) -> u64 {
        let elements = u64::try_from(self.elements.get()).expect("usize always fits into u64");

        match basis {
            CostBasis::PerElementPerPass => elements
                .checked_mul(NonZero::<u64>::from(self.iterations).get())
                .expect("elements times iterations overflows u64 - this indicates an unrealistic scenario"),
            CostBasis::PerElement => elements,
        }
    }
}

/// Clock readings taken around the timed region.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TimingSample {
    start: Duration,
    end: Duration,
}

impl TimingSample {
    /// Creates a sample from two readings of the same monotonic clock.
    #[must_use]
    pub const fn new(start: Duration, end: Duration) -> Self {
        Self { start, end }
    }

    /// Time between the two readings; zero if the clock went backwards.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.end.saturating_sub(self.start)
    }
}

/// Everything the harness learned from one timed run of a workload.
#[derive(Clone, Copy, Debug)]
pub struct Measurement<T> {
    sample: TimingSample,
    operations: u64,
    result: Option<T>,
    timed_allocations: AllocationDelta,
    lifecycle_allocations: AllocationDelta,
}

impl<T: Copy> Measurement<T> {
    /// Time spent in the timed region.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.sample.elapsed()
    }

    /// The raw clock readings.
    #[must_use]
    pub fn sample(&self) -> TimingSample {
        self.sample
    }

    /// Number of operations the elapsed time covers.
    #[must_use]
    pub fn operations(&self) -> u64 {
        self.operations
    }

    /// Mean nanoseconds per operation.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        reason = "benchmark durations and operation counts stay far below 2^52"
    )]
    pub fn nanos_per_operation(&self) -> f64 {
        self.elapsed().as_nanos() as f64 / self.operations as f64
    }

    /// The last value the workload published to its sink, after teardown.
    #[must_use]
    pub fn result(&self) -> Option<T> {
        self.result
    }

    /// Allocation activity inside the timed region.
    ///
    /// All zero unless a [`CountingAllocator`](crate::CountingAllocator) is installed.
    #[must_use]
    pub fn timed_allocations(&self) -> AllocationDelta {
        self.timed_allocations
    }

    /// Allocation activity from the start of setup to the end of teardown.
    ///
    /// A workload that releases everything it allocates leaves zero live allocations here.
    #[must_use]
    pub fn lifecycle_allocations(&self) -> AllocationDelta {
        self.lifecycle_allocations
    }
}

/// Runs workloads and times them.
///
/// The harness goes through three phases for every measurement: setup (untimed population
/// construction), the timed run of all passes, and teardown (untimed).
///
/// # Examples
///
/// ```
/// use std::num::NonZero;
///
/// use indirection_costs::{ContiguousPass, Harness, ProblemSize};
///
/// let harness = Harness::new();
/// let size = ProblemSize::new(NonZero::new(5).unwrap(), NonZero::new(3).unwrap());
///
/// let measurement = harness.measure(&ContiguousPass::new(), size);
///
/// assert_eq!(measurement.result(), Some(20));
/// assert_eq!(measurement.operations(), 15);
/// ```
#[derive(Debug)]
pub struct Harness {
    platform: PlatformFacade,
}

impl Harness {
    /// Creates a harness timing with the operating system's monotonic clock.
    #[must_use]
    pub fn new() -> Self {
        Self {
            platform: PlatformFacade::real(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_platform(platform: PlatformFacade) -> Self {
        Self { platform }
    }

    /// Runs the workload once at [`ProblemSize::WARM_UP`] and discards the outcome.
    pub fn warm_up<W: Workload>(&self, workload: &W) {
        trace!(workload = workload.name(), "warm-up starting");

        let measurement = self.measure(workload, ProblemSize::WARM_UP);

        trace!(
            workload = workload.name(),
            elapsed_ns = measurement.elapsed().as_nanos(),
            "warm-up complete"
        );
    }

    /// Prepares, times and tears down one run of the workload.
    ///
    /// Allocation workloads ([`CostBasis::PerElement`]) always run a single pass, whatever
    /// `size` asks for.
    pub fn measure<W: Workload>(&self, workload: &W, size: ProblemSize) -> Measurement<W::Output> {
        let size = size.for_basis(W::COST_BASIS);
        let mut sink = OpaqueSink::new();

        let lifecycle_start = AllocationCounters::snapshot();

        let mut state = workload.prepare(size.elements());

        debug!(
            workload = workload.name(),
            elements = size.elements().get(),
            iterations = size.iterations().get(),
            "setup complete"
        );

        let timed_start = AllocationCounters::snapshot();
        let start = self.platform.now();

        for _ in 0..size.iterations().get() {
            workload.run_pass(&mut state, &mut sink);
        }

        let end = self.platform.now();
        let timed_end = AllocationCounters::snapshot();

        let sample = TimingSample::new(start, end);

        debug!(
            workload = workload.name(),
            elapsed_ns = sample.elapsed().as_nanos(),
            "timed run complete"
        );

        workload.finish(state, &mut sink);

        let lifecycle_end = AllocationCounters::snapshot();

        debug!(workload = workload.name(), "teardown complete");

        Measurement {
            sample,
            operations: size.operations(W::COST_BASIS),
            result: sink.last(),
            timed_allocations: timed_end.since(&timed_start),
            lifecycle_allocations: lifecycle_end.since(&lifecycle_start),
        }
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::pal::FakePlatform;
    use crate::{ContiguousPass, HeapAllocateRetain, ScatteredPass};

    fn nz(value: usize) -> NonZero<usize> {
        NonZero::new(value).unwrap()
    }

    fn size(elements: usize, iterations: u32) -> ProblemSize {
        ProblemSize::new(nz(elements), NonZero::new(iterations).unwrap())
    }

    /// Advances the fake clock by a fixed step per element per pass, standing in for real work.
    #[derive(Debug)]
    struct ClockedWork {
        clock: FakePlatform,
        per_element: Duration,
        prepare_cost: Duration,
    }

    impl Workload for ClockedWork {
        type Output = u64;
        type State = usize;

        const COST_BASIS: CostBasis = CostBasis::PerElementPerPass;

        fn name(&self) -> &'static str {
            "clocked_work"
        }

        fn prepare(&self, elements: NonZero<usize>) -> usize {
            self.clock.advance(self.prepare_cost);
            elements.get()
        }

        fn run_pass(&self, elements: &mut usize, sink: &mut OpaqueSink<u64>) {
            for _ in 0..*elements {
                self.clock.advance(self.per_element);
            }
            sink.record(u64::try_from(*elements).unwrap());
        }

        fn finish(&self, _state: usize, _sink: &mut OpaqueSink<u64>) {
            self.clock.advance(self.prepare_cost);
        }
    }

    fn fake_harness() -> (Harness, FakePlatform) {
        let clock = FakePlatform::new();
        (
            Harness::with_platform(PlatformFacade::fake(clock.clone())),
            clock,
        )
    }

    #[test]
    fn timing_excludes_setup_and_teardown() {
        let (harness, clock) = fake_harness();
        let work = ClockedWork {
            clock,
            per_element: Duration::from_nanos(3),
            prepare_cost: Duration::from_secs(60),
        };

        let measurement = harness.measure(&work, size(10, 2));

        assert_eq!(measurement.elapsed(), Duration::from_nanos(60));
        assert_eq!(measurement.operations(), 20);
        assert!((measurement.nanos_per_operation() - 3.0).abs() < 1e-9);
        assert_eq!(measurement.result(), Some(10));
    }

    #[test]
    fn elapsed_is_non_decreasing_in_iterations() {
        let (harness, clock) = fake_harness();
        let work = ClockedWork {
            clock,
            per_element: Duration::from_nanos(5),
            prepare_cost: Duration::from_millis(1),
        };

        let mut previous = Duration::ZERO;

        for iterations in 1..=20 {
            let elapsed = harness.measure(&work, size(7, iterations)).elapsed();

            assert!(elapsed >= previous, "iterations = {iterations}");
            previous = elapsed;
        }
    }

    #[test]
    fn zero_cost_work_reports_zero_elapsed() {
        let (harness, clock) = fake_harness();
        let work = ClockedWork {
            clock,
            per_element: Duration::ZERO,
            prepare_cost: Duration::ZERO,
        };

        let measurement = harness.measure(&work, size(1, 1));

        assert_eq!(measurement.elapsed(), Duration::ZERO);
        assert!(measurement.nanos_per_operation().abs() < f64::EPSILON);
    }

    #[test]
    fn real_clock_elapsed_is_not_negative() {
        let harness = Harness::new();

        let measurement = harness.measure(&ScatteredPass::new(), size(100, 3));

        assert!(measurement.elapsed() >= Duration::ZERO);
        assert_eq!(measurement.result(), Some(9900));
    }

    #[test]
    fn allocation_workloads_run_one_pass() {
        let harness = Harness::new();

        let measurement = harness.measure(&HeapAllocateRetain, size(10, 5));

        assert_eq!(measurement.operations(), 10);
        assert_eq!(measurement.result(), Some(90));
    }

    #[test]
    fn operations_follow_cost_basis() {
        let size = size(1000, 7);

        assert_eq!(size.operations(CostBasis::PerElementPerPass), 7000);
        assert_eq!(size.operations(CostBasis::PerElement), 1000);
        assert_eq!(
            size.for_basis(CostBasis::PerElement).iterations(),
            NonZero::<u32>::MIN
        );
    }

    #[test]
    fn warm_up_size() {
        assert_eq!(ProblemSize::WARM_UP.elements().get(), 1000);
        assert_eq!(ProblemSize::WARM_UP.iterations().get(), 10);
    }

    #[test]
    fn warm_up_runs_workload() {
        let (harness, clock) = fake_harness();
        let work = ClockedWork {
            clock: clock.clone(),
            per_element: Duration::from_nanos(1),
            prepare_cost: Duration::ZERO,
        };

        harness.warm_up(&work);

        assert_eq!(clock.now(), Duration::from_nanos(10_000));
    }

    #[test]
    fn timing_sample_saturates() {
        let sample = TimingSample::new(Duration::from_secs(2), Duration::from_secs(1));

        assert_eq!(sample.elapsed(), Duration::ZERO);
    }

    #[test]
    fn contiguous_measurement_matches_pure_pass() {
        let harness = Harness::new();

        let measurement = harness.measure(&ContiguousPass::new(), size(5, 4));

        assert_eq!(measurement.result(), Some(20));
    }

    static_assertions::assert_impl_all!(Harness: Send, Sync);
}
