//! # qtempo Schedule
//!
//! The scheduling engine: per-resource timeline tracking, a gate registry
//! with tagged behaviors, the session builder that assigns every submitted
//! gate its window, waiting-gate padding, deterministic finalize ordering
//! and time reversal of recorded sequences.
//!
//! ## Quick Start
//!
//! ```rust
//! use qtempo_schedule::prelude::*;
//! use qtempo_core::{ParamMap, ParamValue};
//! use std::sync::Arc;
//!
//! let gates = Arc::new(presets::transmon(&["q0", "q1"]).unwrap());
//! let mut builder = Builder::new(gates, ["q0", "q1"]);
//!
//! builder.add_gate("h", &["q0"], ParamMap::new()).unwrap();
//! builder.add_gate("cz", &["q0", "q1"], ParamMap::new()).unwrap();
//!
//! let mut params = ParamMap::new();
//! params.insert("output_bit".to_string(), ParamValue::Text("c0".into()));
//! builder.add_gate("measure", &["q0"], params).unwrap();
//!
//! builder.finalize(false).unwrap();
//! println!("{}", builder.circuit());
//! ```
//!
//! ## Reversal
//!
//! ```rust
//! use qtempo_schedule::prelude::*;
//! use qtempo_core::{ParamMap, ParamValue};
//! use std::sync::Arc;
//!
//! let gates = Arc::new(presets::transmon(&["q0"]).unwrap());
//! let mut builder = Builder::new(gates, ["q0"]);
//!
//! let mut angle = ParamMap::new();
//! angle.insert("angle".to_string(), ParamValue::Number(0.5));
//! builder.add_gate("rx", &["q0"], angle).unwrap();
//!
//! let reversed = builder.make_reverse_circuit(true).unwrap();
//! assert_eq!(reversed.records()[0].params[0], ParamValue::Number(-0.5));
//! ```

#![warn(missing_docs)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Per-resource timeline tracking
pub mod timeline;

/// Gate registry and behavior dispatch
pub mod registry;

/// Scheduling session builder
pub mod builder;

/// Idle-gate padding windows
pub mod waiting;

/// Commit ordering
pub mod order;

/// Time reversal of recorded sequences
pub mod reverse;

/// Ready-made gate sets
pub mod presets;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::{Builder, OpHandle};
pub use order::toposort;
pub use registry::{CompositeFn, ExternalFn, GateBehavior, GateCall, GateFamily, GateSet, GateSpec};
pub use reverse::reverse_records;
pub use timeline::Timeline;
pub use waiting::{pad_windows, PadSpec};

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Convenient imports for common use cases
    //!
    //! ```rust
    //! use qtempo_schedule::prelude::*;
    //! ```

    pub use crate::builder::{Builder, OpHandle};
    pub use crate::presets;
    pub use crate::registry::{GateBehavior, GateCall, GateFamily, GateSet, GateSpec};
    pub use crate::reverse::reverse_records;
    pub use crate::timeline::Timeline;
    pub use crate::waiting::PadSpec;
}

// ============================================================================
// Integration Tests
// ============================================================================
