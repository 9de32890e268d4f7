//! Recorded operations for qtempo
//!
//! The replayable, structural description of every submitted gate. A
//! recorded sequence can be fed back into a fresh builder to reconstruct a
//! circuit, serialized for later sessions, or time-reversed, all without
//! consulting the materialized form.

use crate::error::SchedResult;
use crate::types::{ParamValue, ResourceId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single recorded operation
///
/// Parameter values are stored in registry-declared order, so a record can
/// be replayed against any gate set that declares the same parameter names
/// for this gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpRecord {
    /// Gate name as submitted
    pub name: String,

    /// Resources the gate acts on, in submission order
    pub resources: Vec<ResourceId>,

    /// Declared-order parameter values
    pub params: Vec<ParamValue>,

    /// Handle request: `Some(n)` asks for the n-th most recent
    /// materialized operation (n >= 1) at replay time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<usize>,
}

impl OpRecord {
    /// Record without a handle request
    pub fn new(
        name: impl Into<String>,
        resources: Vec<ResourceId>,
        params: Vec<ParamValue>,
    ) -> Self {
        Self {
            name: name.into(),
            resources,
            params,
            marker: None,
        }
    }

    /// Record requesting a handle to the most recent materialized operation
    pub fn returning(
        name: impl Into<String>,
        resources: Vec<ResourceId>,
        params: Vec<ParamValue>,
    ) -> Self {
        Self {
            name: name.into(),
            resources,
            params,
            marker: Some(1),
        }
    }

    /// Record requesting a handle at a back-offset into the materialized
    /// sequence (1 = last, 2 = second to last, ...)
    pub fn returning_at(
        name: impl Into<String>,
        resources: Vec<ResourceId>,
        params: Vec<ParamValue>,
        offset: usize,
    ) -> Self {
        Self {
            name: name.into(),
            resources,
            params,
            marker: Some(offset),
        }
    }

    /// Whether this record requests a handle on replay
    pub fn wants_handle(&self) -> bool {
        self.marker.is_some()
    }
}

impl fmt::Display for OpRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.name, self.resources)?;
        if !self.params.is_empty() {
            write!(f, " (")?;
            for (i, p) in self.params.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", p)?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

// ============================================================================
// JSON Round Trip
// ============================================================================

/// Serialize a recorded sequence to JSON
pub fn records_to_json(records: &[OpRecord]) -> SchedResult<String> {
    Ok(serde_json::to_string(records)?)
}

/// Deserialize a recorded sequence from JSON
pub fn records_from_json(json: &str) -> SchedResult<Vec<OpRecord>> {
    Ok(serde_json::from_str(json)?)
}

// ============================================================================
// Tests
// ============================================================================
