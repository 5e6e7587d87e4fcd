//! Allocator and GC statistics captured with the dump.

use serde::{Deserialize, Serialize};

/// Global runtime counters at capture time.
///
/// A frozen copy of the runtime's MemStats block. All values are plain
/// counters; nothing here is recomputed by the viewer.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub struct RuntimeStats {
    // General statistics
    /// Bytes allocated and still in use.
    pub alloc: u64,
    /// Bytes allocated over the process lifetime, including freed memory.
    pub total_alloc: u64,
    /// Bytes obtained from the operating system.
    pub sys: u64,
    /// Number of pointer lookups.
    pub lookups: u64,
    /// Cumulative count of heap allocations.
    pub mallocs: u64,
    /// Cumulative count of heap frees.
    pub frees: u64,

    // Main allocation heap
    pub heap_alloc: u64,
    pub heap_sys: u64,
    pub heap_idle: u64,
    pub heap_inuse: u64,
    pub heap_released: u64,
    pub heap_objects: u64,

    // Low-level fixed-size structure allocators
    pub stack_inuse: u64,
    pub stack_sys: u64,
    pub mspan_inuse: u64,
    pub mspan_sys: u64,
    pub mcache_inuse: u64,
    pub mcache_sys: u64,
    pub buck_hash_sys: u64,
    pub gc_sys: u64,
    pub other_sys: u64,

    // Garbage collector
    /// Heap size that triggers the next collection.
    pub next_gc: u64,
    /// Wall-clock time of the last collection, nanoseconds since epoch.
    pub last_gc: u64,
    /// Total stop-the-world pause time, nanoseconds.
    pub pause_total_ns: u64,
    /// Number of completed GC cycles.
    pub num_gc: u64,
}
