//! Materialized circuit container for qtempo
//!
//! Holds the time-stamped operations produced by a scheduling session, in
//! materialization order until a finalizer commits the total order.

use crate::op::ScheduledOp;
use crate::types::{ParamMap, ResourceId, TimeNs};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A circuit of materialized operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// Circuit title
    title: String,

    /// Operations, in materialization order until reordered
    ops: Vec<ScheduledOp>,
}

impl Circuit {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create an empty circuit
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ops: Vec::new(),
        }
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Materialize an operation, assigning the next sequence index
    ///
    /// Returns the index of the new operation.
    pub fn push(
        &mut self,
        name: impl Into<String>,
        resources: Vec<ResourceId>,
        params: ParamMap,
        start: TimeNs,
        instant: TimeNs,
        duration: TimeNs,
    ) -> usize {
        let seq = self.ops.len();
        self.ops.push(ScheduledOp {
            seq,
            name: name.into(),
            resources,
            params,
            start,
            instant,
            duration,
        });
        seq
    }

    /// Materialize a pre-built operation, overriding its sequence index
    pub fn push_op(&mut self, mut op: ScheduledOp) -> usize {
        let seq = self.ops.len();
        op.seq = seq;
        self.ops.push(op);
        seq
    }

    /// Stable sort by execution instant, ties by sequence index
    pub fn sort_by_instant(&mut self) {
        self.ops
            .sort_by(|a, b| a.instant.total_cmp(&b.instant).then(a.seq.cmp(&b.seq)));
    }

    /// Reorder operations by a permutation of current positions
    ///
    /// `perm[k]` is the current position of the operation that ends up at
    /// position `k`. The permutation must cover every operation exactly
    /// once.
    pub fn reorder(&mut self, perm: &[usize]) {
        debug_assert_eq!(perm.len(), self.ops.len());
        let old = std::mem::take(&mut self.ops);
        let mut slots: Vec<Option<ScheduledOp>> = old.into_iter().map(Some).collect();
        self.ops = perm
            .iter()
            .map(|&i| slots[i].take().expect("permutation must be a bijection"))
            .collect();
    }

    /// Rename the circuit
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Circuit title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// All operations in current order
    pub fn ops(&self) -> &[ScheduledOp] {
        &self.ops
    }

    /// Operation at a position in the current order
    pub fn op(&self, index: usize) -> Option<&ScheduledOp> {
        self.ops.get(index)
    }

    /// Number of operations
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether the circuit holds no operations
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    // ========================================================================
    // Analysis
    // ========================================================================

    /// Earliest window start and latest window end, if any
    pub fn span(&self) -> Option<(TimeNs, TimeNs)> {
        let first = self
            .ops
            .iter()
            .map(|op| op.start)
            .min_by(|a, b| a.total_cmp(b))?;
        let last = self
            .ops
            .iter()
            .map(|op| op.end())
            .max_by(|a, b| a.total_cmp(b))?;
        Some((first, last))
    }

    /// Every resource any operation occupies
    pub fn resources(&self) -> BTreeSet<ResourceId> {
        self.ops
            .iter()
            .flat_map(|op| op.resources.iter().cloned())
            .collect()
    }

    /// Operations occupying a resource, in current order
    pub fn ops_on(&self, resource: &str) -> Vec<&ScheduledOp> {
        self.ops.iter().filter(|op| op.touches(resource)).collect()
    }

    /// Number of synthetic waiting operations
    pub fn count_waiting(&self) -> usize {
        self.ops.iter().filter(|op| op.is_waiting()).count()
    }

    /// Gap time on a resource: its occupied span minus its active time
    ///
    /// Zero for a resource whose operations tile its span exactly, which
    /// is what idle-gate padding arranges.
    pub fn idle_on(&self, resource: &str) -> TimeNs {
        let ops = self.ops_on(resource);
        if ops.is_empty() {
            return 0.0;
        }
        let first = ops.iter().map(|op| op.start).fold(f64::INFINITY, f64::min);
        let last = ops.iter().map(|op| op.end()).fold(f64::NEG_INFINITY, f64::max);
        let active: TimeNs = ops.iter().map(|op| op.duration).sum();
        ((last - first) - active).max(0.0)
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Circuit '{}':", self.title)?;
        writeln!(f, "  Operations: {}", self.ops.len())?;
        writeln!(f, "  Resources: {}", self.resources().len())?;
        if let Some((t0, t1)) = self.span() {
            writeln!(f, "  Span: {:.1}-{:.1} ns", t0, t1)?;
        }
        writeln!(f, "  Waiting ops: {}", self.count_waiting())?;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
