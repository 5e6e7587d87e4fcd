//! Address-indexed object graph.
//!
//! [`ObjectGraph`] is the read-only store every query runs against. It is
//! built once from a loaded snapshot and shared for the lifetime of the
//! process; nothing in it is mutated afterwards, so concurrent readers need
//! no locking. The reachable/garbage partition is derived lazily on first
//! use (see [`ReachabilityIndex`]).

mod reachability;

pub use reachability::ReachabilityIndex;

use std::collections::BTreeMap;
use std::sync::OnceLock;

use tracing::debug;

use crate::model::{Address, DumpParams, HeapSnapshot, Object, Root, RuntimeStats};
use crate::storage::StringInterner;

/// The snapshot's object store, keyed by address.
///
/// A `BTreeMap` index gives O(log n) lookup and, more importantly, a stable
/// ascending-address iteration order, so listings and pagination are
/// reproducible across calls and across runs.
pub struct ObjectGraph {
    objects: BTreeMap<Address, Object>,
    params: DumpParams,
    stats: RuntimeStats,
    roots: Vec<Root>,
    interner: StringInterner,
    reachability: OnceLock<ReachabilityIndex>,
}

impl ObjectGraph {
    /// Builds the graph from a loaded snapshot.
    ///
    /// The loader guarantees unique object addresses; if the input violates
    /// that, later records win. Children and roots pointing at addresses
    /// with no object are kept as-is and treated as dangling on lookup.
    pub fn new(snapshot: HeapSnapshot, interner: StringInterner) -> Self {
        let HeapSnapshot {
            params,
            stats,
            objects,
            roots,
        } = snapshot;

        let objects: BTreeMap<Address, Object> =
            objects.into_iter().map(|o| (o.address, o)).collect();
        debug!(
            "Graph built: {} objects, {} roots",
            objects.len(),
            roots.len()
        );

        Self {
            objects,
            params,
            stats,
            roots,
            interner,
            reachability: OnceLock::new(),
        }
    }

    /// Looks up one object by address.
    ///
    /// Absence is an ordinary outcome: the address may never have existed
    /// or may be a dangling reference from another object.
    pub fn object(&self, address: Address) -> Option<&Object> {
        self.objects.get(&address)
    }

    /// All objects in ascending address order.
    pub fn objects(&self) -> impl Iterator<Item = &Object> {
        self.objects.values()
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn params(&self) -> &DumpParams {
        &self.params
    }

    pub fn stats(&self) -> &RuntimeStats {
        &self.stats
    }

    /// The declared root set reachability starts from.
    pub fn roots(&self) -> &[Root] {
        &self.roots
    }

    /// Resolves an interned string hash (type names, root descriptions).
    pub fn resolve(&self, hash: u64) -> Option<&str> {
        self.interner.resolve(hash)
    }

    /// The reachable/garbage partition, computed on first use.
    ///
    /// `OnceLock` gives the compute-once guarantee under concurrent first
    /// access; the snapshot is immutable so the result never goes stale.
    pub fn reachability(&self) -> &ReachabilityIndex {
        self.reachability
            .get_or_init(|| ReachabilityIndex::compute(&self.objects, &self.roots))
    }

    /// Reachable objects in ascending address order.
    pub fn reachable(&self) -> impl Iterator<Item = &Object> {
        let index = self.reachability();
        self.objects().filter(move |o| index.is_reachable(o.address))
    }

    /// Unreachable objects in ascending address order.
    pub fn garbage(&self) -> impl Iterator<Item = &Object> {
        let index = self.reachability();
        self.objects()
            .filter(move |o| !index.is_reachable(o.address))
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use crate::model::{HeapSnapshot, Object, Root, RootKind};

    use super::ObjectGraph;
    use crate::storage::StringInterner;

    /// Builds a graph from (address, children) pairs and root addresses.
    pub fn graph_from_edges(edges: &[(u64, &[u64])], roots: &[u64]) -> ObjectGraph {
        let objects = edges
            .iter()
            .map(|(addr, children)| Object {
                address: *addr,
                size: 16,
                children: children.to_vec(),
                ..Object::default()
            })
            .collect();
        let roots = roots
            .iter()
            .map(|addr| Root {
                kind: RootKind::Other,
                address: *addr,
                description_hash: 0,
            })
            .collect();
        ObjectGraph::new(
            HeapSnapshot {
                objects,
                roots,
                ..HeapSnapshot::default()
            },
            StringInterner::new(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::testutil::graph_from_edges;

    #[test]
    fn test_lookup_missing_address() {
        let graph = graph_from_edges(&[(0x100, &[])], &[]);
        assert!(graph.object(0x100).is_some());
        assert!(graph.object(0x999).is_none());
    }

    #[test]
    fn test_iteration_order_ascending_and_stable() {
        let graph = graph_from_edges(&[(0x300, &[]), (0x100, &[]), (0x200, &[])], &[]);
        let first: Vec<u64> = graph.objects().map(|o| o.address).collect();
        let second: Vec<u64> = graph.objects().map(|o| o.address).collect();
        assert_eq!(first, vec![0x100, 0x200, 0x300]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_partition_total_and_disjoint() {
        // 0x100 -> 0x200; 0x300 unreferenced
        let graph = graph_from_edges(
            &[(0x100, &[0x200]), (0x200, &[]), (0x300, &[])],
            &[0x100],
        );
        for addr in [0x100u64, 0x200, 0x300] {
            let reachable = graph.reachable().any(|o| o.address == addr);
            let garbage = graph.garbage().any(|o| o.address == addr);
            assert_ne!(reachable, garbage, "address {:#x} must be in exactly one set", addr);
        }
        assert_eq!(graph.reachable().count() + graph.garbage().count(), 3);
    }

    #[test]
    fn test_empty_roots_everything_garbage() {
        let graph = graph_from_edges(&[(0x100, &[0x200]), (0x200, &[])], &[]);
        assert_eq!(graph.reachable().count(), 0);
        let garbage: Vec<u64> = graph.garbage().map(|o| o.address).collect();
        let all: Vec<u64> = graph.objects().map(|o| o.address).collect();
        assert_eq!(garbage, all);
    }

    #[test]
    fn test_garbage_order_stable() {
        let graph = graph_from_edges(&[(0x300, &[]), (0x100, &[]), (0x200, &[])], &[]);
        let first: Vec<u64> = graph.garbage().map(|o| o.address).collect();
        let second: Vec<u64> = graph.garbage().map(|o| o.address).collect();
        assert_eq!(first, second);
        assert_eq!(first, vec![0x100, 0x200, 0x300]);
    }

    #[test]
    fn test_dangling_root_tolerated() {
        let graph = graph_from_edges(&[(0x100, &[])], &[0xdead]);
        assert_eq!(graph.reachable().count(), 0);
        assert_eq!(graph.garbage().count(), 1);
    }
}
