//! The workloads the harness times.
//!
//! A workload is split into an untimed [`prepare()`](Workload::prepare) step, a timed
//! [`run_pass()`](Workload::run_pass) step that the harness repeats, and an untimed
//! [`finish()`](Workload::finish) step for teardown. Every pass publishes its result to an
//! [`OpaqueSink`] so the optimizer cannot remove it.

use std::hint::black_box;
use std::num::NonZero;

use crate::{
    BoxedShapePopulation, Circle, OpaqueSink, PaddedPoint, Point, PointerPopulation, Shape,
    ShapePopulation, ValuePopulation,
};

/// What one unit of reported cost corresponds to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum CostBasis {
    /// One element visited in one pass; cost is divided by elements times iterations.
    PerElementPerPass,

    /// One unique record created; cost is divided by elements. Such workloads run exactly one
    /// pass because repeating them would not repeat the same allocations.
    PerElement,
}

/// A benchmark body the harness can time.
pub trait Workload {
    /// The accumulated scalar each pass produces.
    type Output: Copy;

    /// Whatever [`prepare()`](Self::prepare) builds and the timed passes operate on.
    type State;

    /// How elapsed time is turned into per-operation cost.
    const COST_BASIS: CostBasis;

    /// Short identifier used in log events and benchmark IDs.
    fn name(&self) -> &'static str;

    /// Builds the state for `elements` records. Not timed.
    fn prepare(&self, elements: NonZero<usize>) -> Self::State;

    /// Performs exactly one full pass and records its result in `sink`. Timed.
    fn run_pass(&self, state: &mut Self::State, sink: &mut OpaqueSink<Self::Output>);

    /// Consumes the state after the clock has stopped. Not timed.
    ///
    /// The default releases the state without publishing anything.
    fn finish(&self, state: Self::State, _sink: &mut OpaqueSink<Self::Output>) {
        drop(state);
    }
}

/// Sums both coordinates of every point of a contiguous population.
#[inline]
#[must_use]
pub fn contiguous_sum(population: &ValuePopulation) -> i64 {
    population
        .as_slice()
        .iter()
        .fold(0_i64, |sum, point| sum.wrapping_add(point.coordinate_sum()))
}

/// Sums both coordinates of every point of a pointer population, one dereference per point.
#[inline]
#[must_use]
pub fn scattered_sum(population: &PointerPopulation) -> i64 {
    population
        .iter()
        .fold(0_i64, |sum, point| sum.wrapping_add(point.coordinate_sum()))
}

/// Sums the areas of all circles, each call resolved through the [`Shape`] vtable.
#[inline]
#[must_use]
pub fn dynamic_area_sum(population: &ShapePopulation) -> f64 {
    population.as_slice().iter().fold(0.0, |sum, circle| {
        // The barrier hides the concrete type, so the call cannot be devirtualized.
        let shape: &dyn Shape = circle;
        sum + black_box(shape).area()
    })
}

/// Sums the areas of all circles with the call resolved at compile time.
#[inline]
#[must_use]
pub fn static_area_sum(population: &ShapePopulation) -> f64 {
    population.as_slice().iter().fold(0.0, |sum, circle| {
        // Same barrier as the dynamic pass so the only difference left is the dispatch.
        sum + black_box(circle).area()
    })
}

/// Sums the areas of individually boxed shapes through their vtables.
#[inline]
#[must_use]
pub fn boxed_area_sum(population: &BoxedShapePopulation) -> f64 {
    population
        .iter()
        .fold(0.0, |sum, shape| sum + black_box(&**shape).area())
}

/// Iterates a contiguous [`ValuePopulation`], reading two fields per element.
#[derive(Clone, Copy, Debug)]
pub struct ContiguousPass {
    seed: fn(usize) -> Point,
}

impl ContiguousPass {
    /// Uses [`Point::diagonal`] as the seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(Point::diagonal)
    }

    /// Uses a custom seed for the population.
    #[must_use]
    pub fn with_seed(seed: fn(usize) -> Point) -> Self {
        Self { seed }
    }
}

impl Default for ContiguousPass {
    fn default() -> Self {
        Self::new()
    }
}

impl Workload for ContiguousPass {
    type Output = i64;
    type State = ValuePopulation;

    const COST_BASIS: CostBasis = CostBasis::PerElementPerPass;

    fn name(&self) -> &'static str {
        "contiguous_pass"
    }

    fn prepare(&self, elements: NonZero<usize>) -> ValuePopulation {
        ValuePopulation::from_seed(elements, self.seed)
    }

    #[inline]
    fn run_pass(&self, state: &mut ValuePopulation, sink: &mut OpaqueSink<i64>) {
        sink.record(contiguous_sum(state));
    }
}

/// Iterates a [`PointerPopulation`], dereferencing each element before reading two fields.
#[derive(Clone, Copy, Debug)]
pub struct ScatteredPass {
    seed: fn(usize) -> Point,
}

impl ScatteredPass {
    /// Uses [`Point::diagonal`] as the seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(Point::diagonal)
    }

    /// Uses a custom seed for the population.
    #[must_use]
    pub fn with_seed(seed: fn(usize) -> Point) -> Self {
        Self { seed }
    }
}

impl Default for ScatteredPass {
    fn default() -> Self {
        Self::new()
    }
}

impl Workload for ScatteredPass {
    type Output = i64;
    type State = PointerPopulation;

    const COST_BASIS: CostBasis = CostBasis::PerElementPerPass;

    fn name(&self) -> &'static str {
        "scattered_pass"
    }

    fn prepare(&self, elements: NonZero<usize>) -> PointerPopulation {
        PointerPopulation::from_seed(elements, self.seed)
    }

    #[inline]
    fn run_pass(&self, state: &mut PointerPopulation, sink: &mut OpaqueSink<i64>) {
        sink.record(scattered_sum(state));
    }
}

/// Calls [`Shape::area`] through a vtable for every circle of a contiguous population.
#[derive(Clone, Copy, Debug)]
pub struct DynamicDispatchPass {
    seed: fn(usize) -> Circle,
}

impl DynamicDispatchPass {
    /// Uses [`Circle::from_index`] as the seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(Circle::from_index)
    }

    /// Uses a custom seed for the population.
    #[must_use]
    pub fn with_seed(seed: fn(usize) -> Circle) -> Self {
        Self { seed }
    }
}

impl Default for DynamicDispatchPass {
    fn default() -> Self {
        Self::new()
    }
}

impl Workload for DynamicDispatchPass {
    type Output = f64;
    type State = ShapePopulation;

    const COST_BASIS: CostBasis = CostBasis::PerElementPerPass;

    fn name(&self) -> &'static str {
        "dynamic_dispatch_pass"
    }

    fn prepare(&self, elements: NonZero<usize>) -> ShapePopulation {
        ShapePopulation::from_seed(elements, self.seed)
    }

    #[inline]
    fn run_pass(&self, state: &mut ShapePopulation, sink: &mut OpaqueSink<f64>) {
        sink.record(dynamic_area_sum(state));
    }
}

/// Calls the inherent [`Circle::area`] for every circle of a contiguous population.
#[derive(Clone, Copy, Debug)]
pub struct StaticDispatchPass {
    seed: fn(usize) -> Circle,
}

impl StaticDispatchPass {
    /// Uses [`Circle::from_index`] as the seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(Circle::from_index)
    }

    /// Uses a custom seed for the population.
    #[must_use]
    pub fn with_seed(seed: fn(usize) -> Circle) -> Self {
        Self { seed }
    }
}

impl Default for StaticDispatchPass {
    fn default() -> Self {
        Self::new()
    }
}

impl Workload for StaticDispatchPass {
    type Output = f64;
    type State = ShapePopulation;

    const COST_BASIS: CostBasis = CostBasis::PerElementPerPass;

    fn name(&self) -> &'static str {
        "static_dispatch_pass"
    }

    fn prepare(&self, elements: NonZero<usize>) -> ShapePopulation {
        ShapePopulation::from_seed(elements, self.seed)
    }

    #[inline]
    fn run_pass(&self, state: &mut ShapePopulation, sink: &mut OpaqueSink<f64>) {
        sink.record(static_area_sum(state));
    }
}

/// Calls [`Shape::area`] on individually boxed circles.
#[derive(Clone, Copy, Debug, Default)]
#[expect(
    clippy::exhaustive_structs,
    reason = "stateless workload, constructed as a plain unit value"
)]
pub struct BoxedDispatchPass;

impl Workload for BoxedDispatchPass {
    type Output = f64;
    type State = BoxedShapePopulation;

    const COST_BASIS: CostBasis = CostBasis::PerElementPerPass;

    fn name(&self) -> &'static str {
        "boxed_dispatch_pass"
    }

    fn prepare(&self, elements: NonZero<usize>) -> BoxedShapePopulation {
        BoxedShapePopulation::from_seed(elements, Circle::from_index)
    }

    #[inline]
    fn run_pass(&self, state: &mut BoxedShapePopulation, sink: &mut OpaqueSink<f64>) {
        sink.record(boxed_area_sum(state));
    }
}

/// Allocates, touches and immediately releases one boxed point per element.
#[derive(Clone, Copy, Debug, Default)]
#[expect(
    clippy::exhaustive_structs,
    reason = "stateless workload, constructed as a plain unit value"
)]
pub struct HeapAllocateDiscard;

impl Workload for HeapAllocateDiscard {
    type Output = i64;
    type State = NonZero<usize>;

    const COST_BASIS: CostBasis = CostBasis::PerElement;

    fn name(&self) -> &'static str {
        "heap_allocate_discard"
    }

    fn prepare(&self, elements: NonZero<usize>) -> NonZero<usize> {
        elements
    }

    fn run_pass(&self, state: &mut NonZero<usize>, sink: &mut OpaqueSink<i64>) {
        let mut checksum: i64 = 0;

        for index in 0..state.get() {
            let point = Box::new(Point::diagonal(index));
            sink.touch(&point);
            checksum = checksum.wrapping_add(point.x);
        }

        sink.record(checksum);
    }
}

/// Constructs, touches and drops one point by value per element.
#[derive(Clone, Copy, Debug, Default)]
#[expect(
    clippy::exhaustive_structs,
    reason = "stateless workload, constructed as a plain unit value"
)]
pub struct StackAllocateDiscard;

impl Workload for StackAllocateDiscard {
    type Output = i64;
    type State = NonZero<usize>;

    const COST_BASIS: CostBasis = CostBasis::PerElement;

    fn name(&self) -> &'static str {
        "stack_allocate_discard"
    }

    fn prepare(&self, elements: NonZero<usize>) -> NonZero<usize> {
        elements
    }

    fn run_pass(&self, state: &mut NonZero<usize>, sink: &mut OpaqueSink<i64>) {
        let mut checksum: i64 = 0;

        for index in 0..state.get() {
            let point = Point::diagonal(index);
            sink.touch(&point);
            checksum = checksum.wrapping_add(point.x);
        }

        sink.record(checksum);
    }
}

/// Collection that an allocate-and-retain workload fills during its timed pass.
#[derive(Debug)]
pub struct RetainState<T> {
    elements: NonZero<usize>,
    records: Vec<T>,
}

impl<T> RetainState<T> {
    fn with_capacity(elements: NonZero<usize>) -> Self {
        Self {
            elements,
            records: Vec::with_capacity(elements.get()),
        }
    }

    /// Records retained so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has been retained yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Allocates every padded point on the heap and stores the pointer in a pre-reserved vector.
#[derive(Clone, Copy, Debug, Default)]
#[expect(
    clippy::exhaustive_structs,
    reason = "stateless workload, constructed as a plain unit value"
)]
pub struct HeapAllocateRetain;

impl Workload for HeapAllocateRetain {
    type Output = i64;
    type State = RetainState<Box<PaddedPoint>>;

    const COST_BASIS: CostBasis = CostBasis::PerElement;

    fn name(&self) -> &'static str {
        "heap_allocate_retain"
    }

    fn prepare(&self, elements: NonZero<usize>) -> Self::State {
        RetainState::with_capacity(elements)
    }

    fn run_pass(&self, state: &mut Self::State, _sink: &mut OpaqueSink<i64>) {
        for index in 0..state.elements.get() {
            state.records.push(Box::new(PaddedPoint::diagonal(index)));
        }
    }

    fn finish(&self, state: Self::State, sink: &mut OpaqueSink<i64>) {
        // Reading every field afterwards is what keeps the allocations from being elided.
        sink.record(
            state
                .records
                .iter()
                .fold(0, |sum: i64, point| sum.wrapping_add(point.field_sum())),
        );
    }
}

/// Stores every padded point by value in a pre-reserved vector.
#[derive(Clone, Copy, Debug, Default)]
#[expect(
    clippy::exhaustive_structs,
    reason = "stateless workload, constructed as a plain unit value"
)]
pub struct ValueAllocateRetain;

impl Workload for ValueAllocateRetain {
    type Output = i64;
    type State = RetainState<PaddedPoint>;

    const COST_BASIS: CostBasis = CostBasis::PerElement;

    fn name(&self) -> &'static str {
        "value_allocate_retain"
    }

    fn prepare(&self, elements: NonZero<usize>) -> Self::State {
        RetainState::with_capacity(elements)
    }

    fn run_pass(&self, state: &mut Self::State, _sink: &mut OpaqueSink<i64>) {
        for index in 0..state.elements.get() {
            state.records.push(PaddedPoint::diagonal(index));
        }
    }

    fn finish(&self, state: Self::State, sink: &mut OpaqueSink<i64>) {
        sink.record(
            state
                .records
                .iter()
                .fold(0, |sum: i64, point| sum.wrapping_add(point.field_sum())),
        );
    }
}
