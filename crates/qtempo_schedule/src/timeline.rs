//! Per-resource timeline tracking for qtempo
//!
//! Book-keeps, for every named resource, the earliest time it is next free
//! and the start time of the first operation that ever touched it. Pure
//! state; the builder decides window placement, the timeline only records
//! it.

use qtempo_core::{ResourceId, TimeNs};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Per-resource availability tracker
///
/// Unknown resources are implicitly at time 0; no operation here ever
/// fails.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    /// Earliest time each resource is free for a new operation
    next_free: BTreeMap<ResourceId, TimeNs>,

    /// Start time of the first operation on each resource, set once
    first_touched: BTreeMap<ResourceId, TimeNs>,
}

impl Timeline {
    /// Create an empty timeline
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Pre-register a resource at time 0
    ///
    /// Seeding makes the resource visible to global-span padding even if
    /// no gate ever touches it. Seeding an already-known resource changes
    /// nothing.
    pub fn seed(&mut self, resource: impl Into<ResourceId>) {
        self.next_free.entry(resource.into()).or_insert(0.0);
    }

    // ========================================================================
    // Scheduling Queries
    // ========================================================================

    /// Earliest common start time across the given resources
    ///
    /// The maximum of their `next_free` times; an unseen resource counts
    /// as time 0.
    pub fn earliest_start(&self, resources: &[ResourceId]) -> TimeNs {
        resources
            .iter()
            .map(|r| self.next_free.get(r).copied().unwrap_or(0.0))
            .fold(0.0, f64::max)
    }

    /// Latest `next_free` over every known resource (0 when empty)
    pub fn horizon(&self) -> TimeNs {
        self.next_free.values().copied().fold(0.0, f64::max)
    }

    // ========================================================================
    // Updates
    // ========================================================================

    /// Commit a window `[start, start + duration)` on every given resource
    ///
    /// `next_free` never rolls back: it becomes the maximum of its current
    /// value and the window end. `first_touched` is set exactly once, to
    /// the window start.
    pub fn reserve(&mut self, resources: &[ResourceId], start: TimeNs, duration: TimeNs) {
        for resource in resources {
            let free = self.next_free.entry(resource.clone()).or_insert(0.0);
            *free = free.max(start + duration);
            self.first_touched.entry(resource.clone()).or_insert(start);
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Earliest free time of a resource (0 if unseen)
    pub fn next_free(&self, resource: &str) -> TimeNs {
        self.next_free.get(resource).copied().unwrap_or(0.0)
    }

    /// First-touched time of a resource, if it has ever been reserved
    pub fn first_touched(&self, resource: &str) -> Option<TimeNs> {
        self.first_touched.get(resource).copied()
    }

    /// Every resource the timeline knows, seeded or touched
    pub fn resources(&self) -> impl Iterator<Item = &ResourceId> {
        self.next_free.keys()
    }

    /// Whether no resource has been seeded or touched
    pub fn is_empty(&self) -> bool {
        self.next_free.is_empty()
    }
}

impl fmt::Display for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Timeline (horizon {:.1} ns):", self.horizon())?;
        for (resource, free) in &self.next_free {
            match self.first_touched.get(resource) {
                Some(t0) => writeln!(f, "  {}: {:.1}-{:.1} ns", resource, t0, free)?,
                None => writeln!(f, "  {}: untouched", resource)?,
            }
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn rs(names: &[&str]) -> Vec<ResourceId> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_unseen_resources_start_at_zero() {
        let timeline = Timeline::new();
        assert_eq!(timeline.earliest_start(&rs(&["q0", "q1"])), 0.0);
        assert_eq!(timeline.next_free("q0"), 0.0);
        assert_eq!(timeline.first_touched("q0"), None);
    }

    #[test]
    fn test_reserve_advances_next_free() {
        let mut timeline = Timeline::new();
        timeline.reserve(&rs(&["q0"]), 0.0, 20.0);

        assert_eq!(timeline.next_free("q0"), 20.0);
        assert_eq!(timeline.first_touched("q0"), Some(0.0));
    }

    #[test]
    fn test_earliest_start_is_max_over_resources() {
        let mut timeline = Timeline::new();
        timeline.reserve(&rs(&["q0"]), 0.0, 20.0);
        timeline.reserve(&rs(&["q1"]), 0.0, 50.0);

        assert_eq!(timeline.earliest_start(&rs(&["q0", "q1"])), 50.0);
        assert_eq!(timeline.earliest_start(&rs(&["q0", "q2"])), 20.0);
    }

    #[test]
    fn test_next_free_never_rolls_back() {
        let mut timeline = Timeline::new();
        timeline.reserve(&rs(&["q0"]), 0.0, 100.0);
        // A shorter reservation at an earlier start must not rewind
        timeline.reserve(&rs(&["q0"]), 10.0, 20.0);

        assert_eq!(timeline.next_free("q0"), 100.0);
    }

    #[test]
    fn test_first_touched_set_once() {
        let mut timeline = Timeline::new();
        timeline.reserve(&rs(&["q0"]), 30.0, 20.0);
        timeline.reserve(&rs(&["q0"]), 50.0, 20.0);

        assert_eq!(timeline.first_touched("q0"), Some(30.0));
    }

    #[test]
    fn test_seed_does_not_touch() {
        let mut timeline = Timeline::new();
        timeline.seed("q0");

        assert_eq!(timeline.next_free("q0"), 0.0);
        assert_eq!(timeline.first_touched("q0"), None);
        assert_eq!(timeline.resources().count(), 1);

        // seeding again after a reservation changes nothing
        timeline.reserve(&rs(&["q0"]), 0.0, 20.0);
        timeline.seed("q0");
        assert_eq!(timeline.next_free("q0"), 20.0);
    }

    #[test]
    fn test_horizon() {
        let mut timeline = Timeline::new();
        assert_eq!(timeline.horizon(), 0.0);

        timeline.reserve(&rs(&["q0"]), 0.0, 20.0);
        timeline.reserve(&rs(&["q1"]), 0.0, 60.0);
        assert_eq!(timeline.horizon(), 60.0);
    }

    #[test]
    fn test_shared_reservation() {
        let mut timeline = Timeline::new();
        timeline.reserve(&rs(&["q0"]), 0.0, 20.0);

        let start = timeline.earliest_start(&rs(&["q0", "q1"]));
        assert_eq!(start, 20.0);
        timeline.reserve(&rs(&["q0", "q1"]), start, 40.0);

        assert_eq!(timeline.next_free("q0"), 60.0);
        assert_eq!(timeline.next_free("q1"), 60.0);
        assert_eq!(timeline.first_touched("q1"), Some(20.0));
    }
}
