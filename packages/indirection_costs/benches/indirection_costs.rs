//! Criterion view of the same comparisons the executables print, for statistically sturdier
//! numbers than a single timed run.

#![allow(
    missing_docs,
    reason = "No need for API documentation in benchmark code"
)]

use std::hint::black_box;
use std::num::NonZero;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use indirection_costs::{
    BoxedShapePopulation, Circle, HeapAllocateDiscard, HeapAllocateRetain, OpaqueSink, Point,
    PointerPopulation, ShapePopulation, StackAllocateDiscard, ValueAllocateRetain,
    ValuePopulation, Workload, boxed_area_sum, contiguous_sum, dynamic_area_sum, scattered_sum,
    static_area_sum,
};

criterion_group!(benches, entrypoint);
criterion_main!(benches);

const ELEMENTS: NonZero<usize> = NonZero::new(100_000).expect("literal is nonzero");

// Allocation workloads create every record anew, so each iteration is one whole run.
const ALLOCATIONS: NonZero<usize> = NonZero::new(1000).expect("literal is nonzero");

fn entrypoint(c: &mut Criterion) {
    pointer_chasing(c);
    dispatch(c);
    allocation(c);
}

fn pointer_chasing(c: &mut Criterion) {
    let mut group = c.benchmark_group("pointer_chasing");

    let values = ValuePopulation::from_seed(ELEMENTS, Point::diagonal);
    let pointers = PointerPopulation::from_seed(ELEMENTS, Point::diagonal);

    group.bench_function("scattered", |b| {
        b.iter(|| scattered_sum(black_box(&pointers)));
    });

    group.bench_function("contiguous", |b| {
        b.iter(|| contiguous_sum(black_box(&values)));
    });

    group.finish();
}

fn dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");

    let shapes = ShapePopulation::from_seed(ELEMENTS, Circle::from_index);
    let boxed = BoxedShapePopulation::from_seed(ELEMENTS, Circle::from_index);

    group.bench_function("dynamic", |b| {
        b.iter(|| dynamic_area_sum(black_box(&shapes)));
    });

    group.bench_function("static", |b| {
        b.iter(|| static_area_sum(black_box(&shapes)));
    });

    group.bench_function("boxed_dynamic", |b| {
        b.iter(|| boxed_area_sum(black_box(&boxed)));
    });

    group.finish();
}

fn allocation(c: &mut Criterion) {
    let mut group = c.benchmark_group("allocation");

    let mut sink = OpaqueSink::<i64>::new();

    group.bench_function("heap_discard", |b| {
        let mut state = HeapAllocateDiscard.prepare(ALLOCATIONS);
        b.iter(|| HeapAllocateDiscard.run_pass(&mut state, &mut sink));
    });

    group.bench_function("stack_discard", |b| {
        let mut state = StackAllocateDiscard.prepare(ALLOCATIONS);
        b.iter(|| StackAllocateDiscard.run_pass(&mut state, &mut sink));
    });

    group.bench_function("heap_retain", |b| {
        b.iter_batched_ref(
            || HeapAllocateRetain.prepare(ALLOCATIONS),
            |state| HeapAllocateRetain.run_pass(state, &mut sink),
            BatchSize::SmallInput,
        );
    });

    group.bench_function("value_retain", |b| {
        b.iter_batched_ref(
            || ValueAllocateRetain.prepare(ALLOCATIONS),
            |state| ValueAllocateRetain.run_pass(state, &mut sink),
            BatchSize::SmallInput,
        );
    });

    group.finish();
}
