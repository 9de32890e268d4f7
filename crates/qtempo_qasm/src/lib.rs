//! # qtempo QASM
//!
//! Line-oriented textual front end for the qtempo scheduling builder: one
//! operation per line, tokens separated by single spaces or commas, the
//! gate registry deciding which tokens are resources and which are
//! parameters.
//!
//! ```text
//! h q0
//! cnot q0,q1
//! rx q1 0.7853981633974483
//! measure q0 -> c0;
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qtempo_core::ParamMap;
//! use qtempo_qasm::ingest_str;
//! use qtempo_schedule::{presets, Builder};
//! use std::sync::Arc;
//!
//! let gates = Arc::new(presets::transmon(&["q0", "q1"]).unwrap());
//! let mut builder = Builder::new(gates, ["q0", "q1"]);
//!
//! let text = "h q0\ncz q0,q1\nmeasure q1 -> c1;";
//! ingest_str(&mut builder, text, true, &ParamMap::new()).unwrap();
//! builder.finalize(false).unwrap();
//!
//! assert_eq!(builder.records().len(), 3);
//! ```

#![warn(missing_docs)]

/// Line tokenization and submission
pub mod ingest;

pub use ingest::{ingest_lines, ingest_str};

// ============================================================================
// Integration Tests
// ============================================================================
