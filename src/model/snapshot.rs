//! Top-level snapshot container and root declarations.

use serde::{Deserialize, Serialize};

use super::{Address, DumpParams, Object, RuntimeStats};

/// Where a root pointer was found.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum RootKind {
    /// Initialized data segment.
    Data,
    /// Zero-initialized data segment.
    Bss,
    /// Goroutine stack frame.
    StackFrame,
    /// Object with a registered finalizer (queued or not).
    Finalizer,
    /// Anything else the runtime pins (registers, runtime internals).
    Other,
}

impl RootKind {
    pub fn label(&self) -> &'static str {
        match self {
            RootKind::Data => "data",
            RootKind::Bss => "bss",
            RootKind::StackFrame => "stack",
            RootKind::Finalizer => "finalizer",
            RootKind::Other => "other",
        }
    }
}

/// One anchor point for reachability.
///
/// Roots are supplied by the loader, never derived. The target address may
/// be dangling (no object record at that address); reachability tolerates
/// that silently.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Root {
    pub kind: RootKind,
    /// Address the root points at.
    pub address: Address,
    /// Interned description (frame name, "data", ...). Zero if none.
    pub description_hash: u64,
}

/// One captured, immutable heap dump.
///
/// The loader produces exactly one of these per input file. Objects are not
/// indexed here; `graph::ObjectGraph` owns the address index and the
/// reachability partition.
#[derive(Clone, Serialize, Deserialize, Debug, Default)]
pub struct HeapSnapshot {
    pub params: DumpParams,
    pub stats: RuntimeStats,
    pub objects: Vec<Object>,
    pub roots: Vec<Root>,
}

impl HeapSnapshot {
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn root_count(&self) -> usize {
        self.roots.len()
    }
}
