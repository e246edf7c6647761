//! Benchmarks dynamic versus static dispatch.

use std::process::ExitCode;

use indirection_costs::Scenario;

#[cfg(feature = "count_allocations")]
#[global_allocator]
static ALLOCATOR: indirection_costs::CountingAllocator<std::alloc::System> =
    indirection_costs::CountingAllocator::system();

fn main() -> ExitCode {
    indirection_costs::main_for(Scenario::VirtualDispatch)
}
