//! Reachable/garbage partition of the object graph.

use std::collections::{BTreeMap, HashSet, VecDeque};

use tracing::debug;

use crate::model::{Address, Object, Root};

/// The set of addresses reachable from the declared roots.
///
/// Computed once per loaded snapshot by an iterative breadth-first
/// traversal. Iterative on purpose: heap graphs are deep and cyclic, and a
/// recursive walk could exhaust the stack. The visited set doubles as the
/// result, so an address already marked reachable is never enqueued again
/// and traversal terminates on any cycle.
pub struct ReachabilityIndex {
    reachable: HashSet<Address>,
}

impl ReachabilityIndex {
    /// Traverses `children` edges from every root over the given object map.
    ///
    /// Roots and children pointing at addresses with no object are skipped
    /// without error. An empty root set yields an empty reachable set; the
    /// caller then sees every object as garbage, which is a valid result,
    /// not a failure.
    pub fn compute(objects: &BTreeMap<Address, Object>, roots: &[Root]) -> Self {
        let mut reachable = HashSet::new();
        let mut queue: VecDeque<Address> = VecDeque::new();

        for root in roots {
            // Only addresses that resolve to an object enter the partition;
            // the partition must cover exactly the graph's objects.
            if objects.contains_key(&root.address) && reachable.insert(root.address) {
                queue.push_back(root.address);
            }
        }

        while let Some(addr) = queue.pop_front() {
            let Some(object) = objects.get(&addr) else {
                continue;
            };
            for &child in &object.children {
                if objects.contains_key(&child) && reachable.insert(child) {
                    queue.push_back(child);
                }
            }
        }

        debug!(
            "Reachability: {} of {} objects reachable from {} roots",
            reachable.len(),
            objects.len(),
            roots.len()
        );

        Self { reachable }
    }

    /// True iff the traversal visited `address` (roots included).
    pub fn is_reachable(&self, address: Address) -> bool {
        self.reachable.contains(&address)
    }

    /// Number of reachable objects.
    pub fn reachable_count(&self) -> usize {
        self.reachable.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RootKind;

    fn objects_from_edges(edges: &[(u64, &[u64])]) -> BTreeMap<Address, Object> {
        edges
            .iter()
            .map(|(addr, children)| {
                (
                    *addr,
                    Object {
                        address: *addr,
                        children: children.to_vec(),
                        ..Object::default()
                    },
                )
            })
            .collect()
    }

    fn roots(addrs: &[u64]) -> Vec<Root> {
        addrs
            .iter()
            .map(|&address| Root {
                kind: RootKind::Other,
                address,
                description_hash: 0,
            })
            .collect()
    }

    #[test]
    fn test_two_cycle_terminates() {
        // A -> B, B -> A, A is a root. Both reachable, no infinite loop.
        let objects = objects_from_edges(&[(0xa, &[0xb]), (0xb, &[0xa])]);
        let index = ReachabilityIndex::compute(&objects, &roots(&[0xa]));
        assert!(index.is_reachable(0xa));
        assert!(index.is_reachable(0xb));
        assert_eq!(index.reachable_count(), 2);
    }

    #[test]
    fn test_self_cycle() {
        let objects = objects_from_edges(&[(0xa, &[0xa])]);
        let index = ReachabilityIndex::compute(&objects, &roots(&[0xa]));
        assert!(index.is_reachable(0xa));
    }

    #[test]
    fn test_transitive_chain() {
        let objects = objects_from_edges(&[(1, &[2]), (2, &[3]), (3, &[]), (4, &[])]);
        let index = ReachabilityIndex::compute(&objects, &roots(&[1]));
        assert!(index.is_reachable(1));
        assert!(index.is_reachable(2));
        assert!(index.is_reachable(3));
        assert!(!index.is_reachable(4));
    }

    #[test]
    fn test_dangling_child_skipped() {
        let objects = objects_from_edges(&[(1, &[0xdead, 2]), (2, &[])]);
        let index = ReachabilityIndex::compute(&objects, &roots(&[1]));
        assert!(index.is_reachable(2));
        assert!(!index.is_reachable(0xdead));
        assert_eq!(index.reachable_count(), 2);
    }

    #[test]
    fn test_empty_roots() {
        let objects = objects_from_edges(&[(1, &[2]), (2, &[])]);
        let index = ReachabilityIndex::compute(&objects, &roots(&[]));
        assert_eq!(index.reachable_count(), 0);
    }

    #[test]
    fn test_monotone_under_root_growth() {
        let objects = objects_from_edges(&[(1, &[2]), (2, &[]), (3, &[4]), (4, &[])]);
        let small = ReachabilityIndex::compute(&objects, &roots(&[1]));
        let large = ReachabilityIndex::compute(&objects, &roots(&[1, 3]));
        for addr in objects.keys() {
            if small.is_reachable(*addr) {
                assert!(large.is_reachable(*addr), "adding a root removed {:#x}", addr);
            }
        }
        assert!(large.is_reachable(3));
        assert!(large.is_reachable(4));
    }

    #[test]
    fn test_deep_chain_is_stack_safe() {
        // 100k-long chain; would overflow the stack if traversal recursed.
        let n = 100_000u64;
        let mut objects = BTreeMap::new();
        for addr in 1..=n {
            let children = if addr < n { vec![addr + 1] } else { vec![] };
            objects.insert(
                addr,
                Object {
                    address: addr,
                    children,
                    ..Object::default()
                },
            );
        }
        let index = ReachabilityIndex::compute(&objects, &roots(&[1]));
        assert_eq!(index.reachable_count(), n as usize);
    }
}
