//! Preset gate sets for qtempo
//!
//! A ready-made transmon-style gate set for tests, examples and quick
//! experiments. Real setups are expected to build their own [`GateSet`]
//! from loaded configuration; this one bakes in representative timings.

use crate::builder::Builder;
use crate::registry::{GateCall, GateSet, GateSpec};
use qtempo_core::{ParamMap, SchedResult};

/// Single-qubit gate window in nanoseconds
pub const ONEQ_NS: f64 = 20.0;

/// Two-qubit gate window in nanoseconds
pub const TWOQ_NS: f64 = 40.0;

/// Measurement window in nanoseconds
pub const MEASURE_NS: f64 = 500.0;

/// Offset of the measurement instant from its window start
pub const MEASURE_OFFSET_NS: f64 = 300.0;

/// Transmon-style gate set over the given qubits
///
/// Rotations (`rx`, `ry`, `rz`) carry an `angle` parameter; `cz` and
/// `cphase` are registered for every ordered qubit pair; `iswap` is
/// registered as not self-inverse; `cnot` decomposes into h-cz-h;
/// `measure` takes an `output_bit` parameter naming its classical sink.
/// Waiting-gate insertion at finalize is enabled.
pub fn transmon(qubits: &[&str]) -> SchedResult<GateSet> {
    let mut gates = GateSet::new().with_waiting_gates();

    for qubit in qubits {
        gates.register(
            "rx",
            &[qubit],
            GateSpec::primitive("rotate_x", ONEQ_NS).with_params(&["angle"]),
        )?;
        gates.register(
            "ry",
            &[qubit],
            GateSpec::primitive("rotate_y", ONEQ_NS).with_params(&["angle"]),
        )?;
        gates.register(
            "rz",
            &[qubit],
            GateSpec::primitive("rotate_z", ONEQ_NS).with_params(&["angle"]),
        )?;
        gates.register("h", &[qubit], GateSpec::primitive("hadamard", ONEQ_NS))?;
        gates.register(
            "measure",
            &[qubit],
            GateSpec::primitive("measure", MEASURE_NS)
                .with_offset(MEASURE_OFFSET_NS)
                .with_params(&["output_bit"]),
        )?;
    }

    for a in qubits {
        for b in qubits {
            if a == b {
                continue;
            }
            gates.register("cz", &[a, b], GateSpec::primitive("cz", TWOQ_NS))?;
            gates.register(
                "cphase",
                &[a, b],
                GateSpec::primitive("cphase", TWOQ_NS).with_params(&["angle"]),
            )?;
            gates.register(
                "iswap",
                &[a, b],
                GateSpec::primitive("iswap", TWOQ_NS).not_self_inverse(),
            )?;
            gates.register(
                "cnot",
                &[a, b],
                GateSpec::composite(cnot_decomposition, 2.0 * ONEQ_NS + TWOQ_NS),
            )?;
        }
    }

    Ok(gates)
}

/// cnot = h(target), cz(control, target), h(target)
fn cnot_decomposition(builder: &mut Builder, call: &GateCall) -> SchedResult<()> {
    let control = call.resources[0].as_str();
    let target = call.resources[1].as_str();
    builder.add_gate("h", &[target], ParamMap::new())?;
    builder.add_gate("cz", &[control, target], ParamMap::new())?;
    builder.add_gate("h", &[target], ParamMap::new())?;
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use qtempo_core::ParamValue;
    use std::sync::Arc;

    #[test]
    fn test_transmon_registers_families() {
        let gates = transmon(&["q0", "q1"]).unwrap();

        assert!(gates.has_family("rx"));
        assert!(gates.has_family("cz"));
        assert!(gates.has_family("measure"));
        assert!(gates.uses_waiting_gates());
        assert_eq!(gates.family("cz").unwrap().num_resources, 2);
        assert_eq!(gates.family("rx").unwrap().param_names, vec!["angle"]);
    }

    #[test]
    fn test_cnot_decomposes_into_primitives() {
        let gates = Arc::new(transmon(&["q0", "q1"]).unwrap());
        let mut builder = Builder::new(gates, ["q0", "q1"]);
        builder
            .add_gate("cnot", &["q0", "q1"], ParamMap::new())
            .unwrap();

        // One recorded operation, three materialized primitives.
        assert_eq!(builder.records().len(), 1);
        assert_eq!(builder.records()[0].name, "cnot");

        let names: Vec<_> = builder
            .circuit()
            .ops()
            .iter()
            .map(|op| op.name.as_str())
            .collect();
        assert_eq!(names, vec!["hadamard", "cz", "hadamard"]);

        // The outer window covers the decomposition.
        assert_eq!(builder.timeline().next_free("q0"), 80.0);
        assert_eq!(builder.timeline().next_free("q1"), 80.0);
    }

    #[test]
    fn test_measure_takes_output_bit() {
        let gates = Arc::new(transmon(&["q0"]).unwrap());
        let mut builder = Builder::new(gates, ["q0"]);

        let mut params = ParamMap::new();
        params.insert("output_bit".to_string(), ParamValue::Text("c0".into()));
        builder.add_gate("measure", &["q0"], params).unwrap();

        let op = &builder.circuit().ops()[0];
        assert_eq!(op.instant, MEASURE_OFFSET_NS);
        assert_eq!(
            op.params.get("output_bit"),
            Some(&ParamValue::Text("c0".into()))
        );
    }
}
