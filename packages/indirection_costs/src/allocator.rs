//! Allocation wrapper that counts allocations and releases.
//!
//! Counting lets tests and reports check the ownership discipline of the benchmarks: every
//! record allocated during a measurement must be released exactly once by the time the
//! measurement's teardown is over.

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;
use std::fmt;
use std::sync::atomic::{self, AtomicBool};

/// Per-thread counters updated on each allocation and release.
///
/// Thread-local storage keeps concurrently running tests from seeing each other's activity.
/// The counters are plain `Cell`s with const initialization, so touching them never allocates
/// and never registers a destructor, which matters because the allocator itself updates them.
#[derive(Debug)]
struct PerThreadCounters {
    allocated: Cell<u64>,
    released: Cell<u64>,
}

thread_local! {
    static COUNTERS: PerThreadCounters = const {
        PerThreadCounters {
            allocated: Cell::new(0),
            released: Cell::new(0),
        }
    };
}

// Set the first time a `CountingAllocator` sees any activity.
static ACTIVE: AtomicBool = AtomicBool::new(false);

#[inline]
fn track_allocation() {
    ACTIVE.store(true, atomic::Ordering::Relaxed);

    // During thread teardown the counters may already be gone. Such allocations are not part of
    // any measurement, so skipping them is harmless.
    _ = COUNTERS.try_with(|c| c.allocated.set(c.allocated.get().wrapping_add(1)));
}

#[inline]
fn track_release() {
    _ = COUNTERS.try_with(|c| c.released.set(c.released.get().wrapping_add(1)));
}

/// Whether a [`CountingAllocator`] is installed and has counted anything.
///
/// When this is `false`, every [`AllocationCounters`] snapshot reads zero.
#[must_use]
pub fn counting_active() -> bool {
    ACTIVE.load(atomic::Ordering::Relaxed)
}

/// Point-in-time reading of the current thread's allocation counters.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct AllocationCounters {
    allocated: u64,
    released: u64,
}

impl AllocationCounters {
    /// Reads the current thread's counters.
    #[must_use]
    pub fn snapshot() -> Self {
        COUNTERS
            .try_with(|c| Self {
                allocated: c.allocated.get(),
                released: c.released.get(),
            })
            .unwrap_or_default()
    }

    /// Activity between `earlier` and `self`.
    #[must_use]
    pub fn since(&self, earlier: &Self) -> AllocationDelta {
        AllocationDelta {
            allocated: self.allocated.wrapping_sub(earlier.allocated),
            released: self.released.wrapping_sub(earlier.released),
        }
    }
}

/// Allocation activity on one thread between two [`AllocationCounters`] snapshots.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct AllocationDelta {
    allocated: u64,
    released: u64,
}

impl AllocationDelta {
    /// Creates a delta from raw counts.
    #[must_use]
    pub const fn new(allocated: u64, released: u64) -> Self {
        Self {
            allocated,
            released,
        }
    }

    /// Number of allocations performed.
    #[must_use]
    pub const fn allocated(&self) -> u64 {
        self.allocated
    }

    /// Number of allocations released.
    #[must_use]
    pub const fn released(&self) -> u64 {
        self.released
    }

    /// Allocations performed but not yet released; negative if the period released memory that
    /// was allocated before it began.
    ///
    /// # Panics
    ///
    /// Panics if either count exceeds `i64::MAX`, which no realistic run reaches.
    #[must_use]
    pub fn live(&self) -> i64 {
        let allocated = i64::try_from(self.allocated).expect("allocation count fits in i64");
        let released = i64::try_from(self.released).expect("release count fits in i64");

        allocated.wrapping_sub(released)
    }
}

impl fmt::Display for AllocationDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} allocated, {} released, {} live",
            self.allocated,
            self.released,
            self.live()
        )
    }
}

/// A memory allocator that counts allocations and releases made through it.
///
/// Wraps any [`GlobalAlloc`] implementation, delegating the actual work to it. Reallocation
/// counts as neither a new allocation nor a release, since the record keeps a single owner.
///
/// # Examples
///
/// ```rust
/// use indirection_costs::CountingAllocator;
///
/// #[global_allocator]
/// static ALLOCATOR: CountingAllocator<std::alloc::System> = CountingAllocator::system();
/// ```
pub struct CountingAllocator<A: GlobalAlloc> {
    inner: A,
}

impl<A: GlobalAlloc> fmt::Debug for CountingAllocator<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountingAllocator")
            .field("inner", &"<allocator>")
            .finish()
    }
}

impl CountingAllocator<System> {
    /// Creates a counting allocator on top of the system allocator.
    #[must_use]
    #[inline]
    pub const fn system() -> Self {
        Self {
            inner: System,
        }
    }
}

impl<A: GlobalAlloc> CountingAllocator<A> {
    /// Creates a counting allocator on top of the provided allocator.
    #[must_use]
    #[inline]
    pub const fn new(allocator: A) -> Self {
        Self { inner: allocator }
    }
}

// SAFETY: We delegate all allocation operations to the underlying allocator,
// which already implements GlobalAlloc safely, while adding counting.
unsafe impl<A: GlobalAlloc> GlobalAlloc for CountingAllocator<A> {
    #[inline]
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        track_allocation();

        // SAFETY: We forward the call to the underlying allocator which implements GlobalAlloc.
        unsafe { self.inner.alloc(layout) }
    }

    #[inline]
    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        track_release();

        // SAFETY: We forward the call to the underlying allocator which implements GlobalAlloc.
        unsafe { self.inner.dealloc(ptr, layout) }
    }

    #[inline]
    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        track_allocation();

        // SAFETY: We forward the call to the underlying allocator which implements GlobalAlloc.
        unsafe { self.inner.alloc_zeroed(layout) }
    }

    #[inline]
    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        // SAFETY: We forward the call to the underlying allocator which implements GlobalAlloc.
        unsafe { self.inner.realloc(ptr, layout, new_size) }
    }
}
