//! Scheduled operations for qtempo
//!
//! The materialized, time-stamped form of a gate: what the downstream
//! execution engine consumes once the circuit is finalized.

use crate::types::{ParamMap, ResourceId, TimeNs, WAITING_GATE};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An operation with committed timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledOp {
    /// Materialization index, the deterministic tie-breaker for ordering
    pub seq: usize,

    /// Name the operation was materialized under (a primitive name, not
    /// necessarily the registry gate name it came from)
    pub name: String,

    /// Resources the operation occupies
    pub resources: Vec<ResourceId>,

    /// Merged parameters handed to the execution engine
    pub params: ParamMap,

    /// Start of the occupied window in nanoseconds
    pub start: TimeNs,

    /// Instant of execution within the window
    pub instant: TimeNs,

    /// Total window length in nanoseconds
    pub duration: TimeNs,
}

impl ScheduledOp {
    /// End of the occupied window
    #[inline]
    pub fn end(&self) -> TimeNs {
        self.start + self.duration
    }

    /// Whether this operation occupies the given resource
    pub fn touches(&self, resource: &str) -> bool {
        self.resources.iter().any(|r| r == resource)
    }

    /// Whether the occupied window overlaps `[start, end)`
    pub fn overlaps(&self, start: TimeNs, end: TimeNs) -> bool {
        self.start < end && self.end() > start
    }

    /// Whether this is a synthetic idle-padding operation
    pub fn is_waiting(&self) -> bool {
        self.name == WAITING_GATE
    }
}

impl fmt::Display for ScheduledOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:.1}-{:.1}ns @{:.1}] {} on {:?}",
            self.start,
            self.end(),
            self.instant,
            self.name,
            self.resources
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
