//! # qtempo Core
//!
//! Foundation types for the qtempo scheduling engine: time and parameter
//! types, the error taxonomy, recorded (replayable) operations, and
//! materialized (time-stamped) operations with their circuit container.
//!
//! The scheduling engine itself lives in `qtempo_schedule`; the textual
//! front end in `qtempo_qasm`.
//!
//! ## Quick Start
//!
//! ```rust
//! use qtempo_core::prelude::*;
//!
//! // A recorded operation is the structural, replayable form.
//! let rec = OpRecord::new("rx", vec!["q0".into()], vec![ParamValue::Number(0.5)]);
//! assert!(!rec.wants_handle());
//!
//! // Recorded sequences round-trip through JSON.
//! let json = records_to_json(&[rec.clone()]).unwrap();
//! assert_eq!(records_from_json(&json).unwrap(), vec![rec]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Core type aliases and parameter values
pub mod types;

/// Error taxonomy
pub mod error;

/// Recorded (replayable) operations
pub mod record;

/// Materialized (time-stamped) operations
pub mod op;

/// Circuit container for materialized operations
pub mod circuit;

// ============================================================================
// Re-exports
// ============================================================================

pub use circuit::Circuit;
pub use error::{SchedError, SchedResult};
pub use op::ScheduledOp;
pub use record::{records_from_json, records_to_json, OpRecord};
pub use types::{Angle, ParamMap, ParamValue, ResourceId, TimeNs, ANGLE_PARAM, WAITING_GATE};

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Convenient imports for common use cases
    //!
    //! ```rust
    //! use qtempo_core::prelude::*;
    //! ```

    pub use crate::circuit::Circuit;
    pub use crate::error::{SchedError, SchedResult};
    pub use crate::op::ScheduledOp;
    pub use crate::record::{records_from_json, records_to_json, OpRecord};
    pub use crate::types::{
        Angle, ParamMap, ParamValue, ResourceId, TimeNs, ANGLE_PARAM, WAITING_GATE,
    };
}

// ============================================================================
// Version Information
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_circuit_round_trip_json() {
        let mut circuit = Circuit::new("bell");
        let mut params = BTreeMap::new();
        params.insert("angle".to_string(), ParamValue::Number(0.5));
        circuit.push("rx", vec!["q0".into()], params, 0.0, 10.0, 20.0);
        circuit.push(
            "cz",
            vec!["q0".into(), "q1".into()],
            BTreeMap::new(),
            20.0,
            40.0,
            40.0,
        );

        let json = serde_json::to_string(&circuit).unwrap();
        let back: Circuit = serde_json::from_str(&json).unwrap();
        assert_eq!(circuit, back);
    }

    #[test]
    fn test_record_sequence_survives_serialization() {
        let records = vec![
            OpRecord::new("h", vec!["q0".into()], vec![]),
            OpRecord::new(
                "measure",
                vec!["q0".into()],
                vec![ParamValue::Text("c0".into())],
            ),
            OpRecord::returning("rx", vec!["q1".into()], vec![ParamValue::Number(-1.0)]),
        ];

        let json = records_to_json(&records).unwrap();
        let back = records_from_json(&json).unwrap();
        assert_eq!(back.len(), 3);
        assert_eq!(back[2].marker, Some(1));
        assert_eq!(back[1].params[0], ParamValue::Text("c0".into()));
    }

    #[test]
    fn test_waiting_constant_consistency() {
        let mut circuit = Circuit::new("padded");
        circuit.push(
            WAITING_GATE,
            vec!["q0".into()],
            BTreeMap::new(),
            0.0,
            50.0,
            100.0,
        );
        assert_eq!(circuit.count_waiting(), 1);
        assert!(circuit.ops()[0].is_waiting());
    }
}
