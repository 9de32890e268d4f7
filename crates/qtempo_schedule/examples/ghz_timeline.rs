//! Schedule a 3-qubit GHZ preparation, pad it, commit it, and print the
//! time-reversed version alongside.

use anyhow::Result;
use qtempo_core::{ParamMap, ParamValue};
use qtempo_schedule::prelude::*;
use std::sync::Arc;

fn main() -> Result<()> {
    let qubits = ["q0", "q1", "q2"];
    let gates = Arc::new(presets::transmon(&qubits)?);

    let mut builder = Builder::new(gates, qubits).with_title("ghz3");
    builder.add_gate("h", &["q0"], ParamMap::new())?;
    builder.add_gate("cnot", &["q0", "q1"], ParamMap::new())?;
    builder.add_gate("cnot", &["q1", "q2"], ParamMap::new())?;
    for (qubit, bit) in [("q0", "c0"), ("q1", "c1"), ("q2", "c2")] {
        let mut params = ParamMap::new();
        params.insert("output_bit".to_string(), ParamValue::Text(bit.into()));
        builder.add_gate("measure", &[qubit], params)?;
    }

    // Reverse before finalizing: the reversal replays the recorded
    // sequence into its own independent session.
    let reversed = builder.make_reverse_circuit(true)?;

    builder.finalize(false)?;

    println!("{}", builder.circuit());
    for op in builder.circuit().ops() {
        println!("  {}", op);
    }

    println!();
    println!("{}", reversed.circuit());
    for op in reversed.circuit().ops() {
        println!("  {}", op);
    }

    Ok(())
}
