//! Read facade over a loaded snapshot.
//!
//! [`SnapshotQuery`] is the single entry point the presentation layer
//! calls. It holds no state of its own beyond the graph it wraps; every
//! call is independent, idempotent and non-blocking, so callers may issue
//! queries in any order and from any number of threads.

use crate::graph::ObjectGraph;
use crate::model::{Address, DumpParams, Object, Root, RuntimeStats};

/// Snapshot-wide summary for the overview page.
pub struct Overview<'a> {
    pub params: &'a DumpParams,
    pub stats: &'a RuntimeStats,
    pub object_count: usize,
    pub reachable_count: usize,
    pub garbage_count: usize,
    pub root_count: usize,
}

/// Query service over one immutable snapshot.
pub struct SnapshotQuery {
    graph: ObjectGraph,
}

impl SnapshotQuery {
    pub fn new(graph: ObjectGraph) -> Self {
        Self { graph }
    }

    /// Global parameters, statistics and partition counts.
    pub fn describe(&self) -> Overview<'_> {
        let reachable_count = self.graph.reachability().reachable_count();
        let object_count = self.graph.object_count();
        Overview {
            params: self.graph.params(),
            stats: self.graph.stats(),
            object_count,
            reachable_count,
            garbage_count: object_count - reachable_count,
            root_count: self.graph.roots().len(),
        }
    }

    /// Every object, ascending by address.
    pub fn list_all(&self) -> impl Iterator<Item = &Object> {
        self.graph.objects()
    }

    /// Objects unreachable from any root, ascending by address.
    pub fn list_garbage(&self) -> impl Iterator<Item = &Object> {
        self.graph.garbage()
    }

    /// Objects reachable from some root, ascending by address.
    pub fn list_reachable(&self) -> impl Iterator<Item = &Object> {
        self.graph.reachable()
    }

    /// Fetches one object. `None` is the ordinary "no such address"
    /// outcome (the presentation layer maps it to its own not-found
    /// rendering); it is never an error and never logged as one.
    pub fn get(&self, address: Address) -> Option<&Object> {
        self.graph.object(address)
    }

    pub fn is_reachable(&self, address: Address) -> bool {
        self.graph.reachability().is_reachable(address)
    }

    pub fn roots(&self) -> &[Root] {
        self.graph.roots()
    }

    /// Resolves an interned string hash from the snapshot.
    pub fn resolve(&self, hash: u64) -> Option<&str> {
        self.graph.resolve(hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::testutil::graph_from_edges;

    fn query() -> SnapshotQuery {
        // 0x100 -> 0x200 reachable, 0x300 garbage
        SnapshotQuery::new(graph_from_edges(
            &[(0x100, &[0x200]), (0x200, &[]), (0x300, &[])],
            &[0x100],
        ))
    }

    #[test]
    fn test_get_absent_is_none() {
        let q = query();
        assert!(q.get(0x100).is_some());
        assert!(q.get(0xdead_beef).is_none());
    }

    #[test]
    fn test_describe_counts() {
        let q = query();
        let overview = q.describe();
        assert_eq!(overview.object_count, 3);
        assert_eq!(overview.reachable_count, 2);
        assert_eq!(overview.garbage_count, 1);
        assert_eq!(overview.root_count, 1);
    }

    #[test]
    fn test_listings_delegate() {
        let q = query();
        let all: Vec<u64> = q.list_all().map(|o| o.address).collect();
        assert_eq!(all, vec![0x100, 0x200, 0x300]);
        let garbage: Vec<u64> = q.list_garbage().map(|o| o.address).collect();
        assert_eq!(garbage, vec![0x300]);
        let reachable: Vec<u64> = q.list_reachable().map(|o| o.address).collect();
        assert_eq!(reachable, vec![0x100, 0x200]);
    }

    #[test]
    fn test_calls_are_idempotent() {
        let q = query();
        assert_eq!(q.describe().garbage_count, q.describe().garbage_count);
        assert_eq!(q.is_reachable(0x200), q.is_reachable(0x200));
        assert!(q.is_reachable(0x200));
        assert!(!q.is_reachable(0x300));
    }
}
