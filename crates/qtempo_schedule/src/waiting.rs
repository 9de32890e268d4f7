//! Idle-gate padding windows for qtempo
//!
//! Computes, per resource, the interval explicit waiting operations must
//! fill so every timeline ends (and optionally begins) at a common edge.
//! The builder turns the gaps into materialized `waiting` operations.

use crate::timeline::Timeline;
use qtempo_core::{ResourceId, TimeNs};
use std::collections::BTreeMap;

/// Gaps shorter than this are not worth a waiting operation
pub(crate) const GAP_EPS: TimeNs = 1e-9;

/// Left/right padding amount: one scalar for every resource, or a
/// per-resource map (missing resources pad by 0)
#[derive(Debug, Clone, PartialEq)]
pub enum PadSpec {
    /// Same padding for every resource
    Uniform(TimeNs),
    /// Per-resource padding; absent resources get 0
    PerResource(BTreeMap<ResourceId, TimeNs>),
}

impl PadSpec {
    /// Padding amount for one resource
    pub fn for_resource(&self, resource: &str) -> TimeNs {
        match self {
            PadSpec::Uniform(value) => *value,
            PadSpec::PerResource(map) => map.get(resource).copied().unwrap_or(0.0),
        }
    }
}

impl Default for PadSpec {
    fn default() -> Self {
        PadSpec::Uniform(0.0)
    }
}

impl From<f64> for PadSpec {
    fn from(value: f64) -> Self {
        PadSpec::Uniform(value)
    }
}

impl From<BTreeMap<ResourceId, TimeNs>> for PadSpec {
    fn from(map: BTreeMap<ResourceId, TimeNs>) -> Self {
        PadSpec::PerResource(map)
    }
}

/// Target `[lower, upper]` interval per resource
///
/// Global mode (`shrink == false`) aims every resource at the common span
/// `[0 - dtmin, horizon + dtmax]`. Shrink mode pads each resource only
/// around its own first/last activity and skips resources no gate ever
/// touched.
pub fn pad_windows(
    timeline: &Timeline,
    dtmin: &PadSpec,
    dtmax: &PadSpec,
    shrink: bool,
) -> BTreeMap<ResourceId, (TimeNs, TimeNs)> {
    let mut windows = BTreeMap::new();

    if shrink {
        for resource in timeline.resources() {
            if let Some(touched) = timeline.first_touched(resource) {
                windows.insert(
                    resource.clone(),
                    (
                        touched - dtmin.for_resource(resource),
                        timeline.next_free(resource) + dtmax.for_resource(resource),
                    ),
                );
            }
        }
    } else {
        let horizon = timeline.horizon();
        for resource in timeline.resources() {
            windows.insert(
                resource.clone(),
                (
                    0.0 - dtmin.for_resource(resource),
                    horizon + dtmax.for_resource(resource),
                ),
            );
        }
    }

    windows
}

// ============================================================================
// Tests
// ============================================================================
