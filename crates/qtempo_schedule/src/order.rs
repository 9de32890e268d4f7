//! Commit ordering for qtempo
//!
//! The time-sort path lives on `Circuit` itself; this module provides the
//! causal alternative: a deterministic topological order over the
//! shared-resource dependency graph.

use qtempo_core::ScheduledOp;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, BTreeMap};

/// Deterministic topological order over shared-resource dependencies
///
/// Two operations are dependent when they share a resource; the one whose
/// window starts earlier (ties by materialization index) must come first.
/// Among causally independent operations the smallest materialization
/// index wins, so the result is stable across runs.
///
/// Returns a permutation: `perm[k]` is the current position of the
/// operation committed at position `k`.
pub fn toposort(ops: &[ScheduledOp]) -> Vec<usize> {
    let n = ops.len();
    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut indegree = vec![0usize; n];

    // Chain the operations of each resource in window order. Operations
    // sharing two resources contribute a parallel edge per resource; the
    // indegree bookkeeping below counts and releases each occurrence.
    let mut per_resource: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (position, op) in ops.iter().enumerate() {
        for resource in &op.resources {
            per_resource.entry(resource.as_str()).or_default().push(position);
        }
    }
    for (_, mut chain) in per_resource {
        chain.sort_by(|&a, &b| {
            ops[a]
                .start
                .total_cmp(&ops[b].start)
                .then(ops[a].seq.cmp(&ops[b].seq))
        });
        for pair in chain.windows(2) {
            successors[pair[0]].push(pair[1]);
            indegree[pair[1]] += 1;
        }
    }

    let mut ready = BinaryHeap::new();
    for position in 0..n {
        if indegree[position] == 0 {
            ready.push(Reverse((ops[position].seq, position)));
        }
    }

    let mut perm = Vec::with_capacity(n);
    while let Some(Reverse((_, position))) = ready.pop() {
        perm.push(position);
        for &next in &successors[position] {
            indegree[next] -= 1;
            if indegree[next] == 0 {
                ready.push(Reverse((ops[next].seq, next)));
            }
        }
    }

    debug_assert_eq!(perm.len(), n, "resource chains cannot form cycles");
    perm
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use qtempo_core::Circuit;
    use std::collections::BTreeMap;

    fn push(c: &mut Circuit, name: &str, rs: &[&str], start: f64, dur: f64) {
        c.push(
            name,
            rs.iter().map(|r| r.to_string()).collect(),
            BTreeMap::new(),
            start,
            start + dur / 2.0,
            dur,
        );
    }

    #[test]
    fn test_independent_ops_by_seq() {
        let mut c = Circuit::new("test");
        push(&mut c, "a", &["q0"], 0.0, 20.0);
        push(&mut c, "b", &["q1"], 0.0, 20.0);
        push(&mut c, "c", &["q2"], 0.0, 20.0);

        assert_eq!(toposort(c.ops()), vec![0, 1, 2]);
    }

    #[test]
    fn test_shared_resource_chain_respected() {
        let mut c = Circuit::new("test");
        push(&mut c, "h_q0", &["q0"], 0.0, 20.0);
        push(&mut c, "h_q1", &["q1"], 0.0, 20.0);
        push(&mut c, "cz", &["q0", "q1"], 20.0, 40.0);
        push(&mut c, "h_q1_again", &["q1"], 60.0, 20.0);

        let perm = toposort(c.ops());
        let pos = |k: usize| perm.iter().position(|&p| p == k).unwrap();
        assert!(pos(0) < pos(2));
        assert!(pos(1) < pos(2));
        assert!(pos(2) < pos(3));
    }

    #[test]
    fn test_late_materialized_early_op_ordered_by_time() {
        // A padding op materialized last but occupying the start of the
        // timeline must precede everything it feeds into.
        let mut c = Circuit::new("test");
        push(&mut c, "gate", &["q0"], 50.0, 20.0);
        push(&mut c, "waiting", &["q0"], 0.0, 50.0);

        let perm = toposort(c.ops());
        assert_eq!(perm, vec![1, 0]);
    }

    #[test]
    fn test_toposort_is_idempotent() {
        let mut c = Circuit::new("test");
        push(&mut c, "a", &["q0"], 0.0, 20.0);
        push(&mut c, "b", &["q0", "q1"], 20.0, 40.0);
        push(&mut c, "c", &["q1"], 60.0, 20.0);
        push(&mut c, "w", &["q2"], 0.0, 80.0);

        let perm = toposort(c.ops());
        c.reorder(&perm);
        let names: Vec<String> = c.ops().iter().map(|op| op.name.clone()).collect();

        let perm2 = toposort(c.ops());
        c.reorder(&perm2);
        let names2: Vec<String> = c.ops().iter().map(|op| op.name.clone()).collect();

        assert_eq!(names, names2);
    }

    #[test]
    fn test_double_shared_resource_not_double_counted() {
        // Two ops sharing both resources: two parallel edges, still one
        // ordering constraint.
        let mut c = Circuit::new("test");
        push(&mut c, "first", &["q0", "q1"], 0.0, 40.0);
        push(&mut c, "second", &["q0", "q1"], 40.0, 40.0);

        assert_eq!(toposort(c.ops()), vec![0, 1]);
    }
}
