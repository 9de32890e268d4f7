//! Time reversal for qtempo
//!
//! Builds, from a recorded sequence, the sequence describing the
//! time-reverse of the circuit: submission order flipped and every
//! angle-bearing gate's angle negated. Gates with neither an angle nor the
//! self-inverse property are rejected rather than silently mangled.

use crate::builder::Builder;
use crate::registry::GateSet;
use qtempo_core::{OpRecord, ParamValue, SchedError, SchedResult, ANGLE_PARAM};

/// Reverse a recorded sequence against a gate set
///
/// The result is structurally identical to the input and can be replayed
/// into a fresh builder.
pub fn reverse_records(records: &[OpRecord], gates: &GateSet) -> SchedResult<Vec<OpRecord>> {
    let mut reversed = Vec::with_capacity(records.len());

    for record in records.iter().rev() {
        let family = gates.family(&record.name)?;

        match family.param_names.iter().position(|name| name == ANGLE_PARAM) {
            Some(index) => {
                let mut flipped = record.clone();
                match flipped.params.get(index).cloned() {
                    Some(ParamValue::Number(angle)) => {
                        flipped.params[index] = ParamValue::Number(-angle);
                    }
                    // A textual or absent angle cannot be negated.
                    _ => {
                        return Err(SchedError::Irreversible {
                            name: record.name.clone(),
                        })
                    }
                }
                reversed.push(flipped);
            }
            None => {
                let spec = gates.lookup(&record.name, &record.resources)?;
                if !spec.self_inverse {
                    return Err(SchedError::Irreversible {
                        name: record.name.clone(),
                    });
                }
                reversed.push(record.clone());
            }
        }
    }

    Ok(reversed)
}

impl Builder {
    /// Build an independent session scheduling the time-reverse of this one
    ///
    /// The new builder shares the gate set and qubit roster but none of
    /// the mutable state. With `finalize` set, the reversed circuit is
    /// committed in time order before being returned.
    pub fn make_reverse_circuit(&self, finalize: bool) -> SchedResult<Builder> {
        let reversed = reverse_records(self.records(), self.gate_set())?;

        let qubits: Vec<String> = self.timeline().resources().cloned().collect();
        let mut builder =
            Builder::new(self.gate_set().clone(), qubits).with_title("reversed");
        builder.add_records(reversed)?;
        if finalize {
            builder.finalize(false)?;
        }
        Ok(builder)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::GateSpec;
    use qtempo_core::ParamMap;
    use std::sync::Arc;

    fn gate_set() -> Arc<GateSet> {
        let mut gates = GateSet::new();
        gates
            .register(
                "rx",
                &["q0"],
                GateSpec::primitive("rotate_x", 20.0).with_params(&["angle"]),
            )
            .unwrap();
        gates
            .register("h", &["q0"], GateSpec::primitive("hadamard", 20.0))
            .unwrap();
        gates
            .register("cz", &["q0", "q1"], GateSpec::primitive("cz", 40.0))
            .unwrap();
        gates
            .register(
                "iswap",
                &["q0", "q1"],
                GateSpec::primitive("iswap", 40.0).not_self_inverse(),
            )
            .unwrap();
        Arc::new(gates)
    }

    fn angle(value: f64) -> ParamMap {
        let mut params = ParamMap::new();
        params.insert("angle".to_string(), ParamValue::Number(value));
        params
    }

    #[test]
    fn test_reverse_flips_order_and_angles() {
        let gates = gate_set();
        let mut builder = Builder::new(gates.clone(), ["q0", "q1"]);
        builder.add_gate("h", &["q0"], ParamMap::new()).unwrap();
        builder.add_gate("rx", &["q0"], angle(0.5)).unwrap();
        builder
            .add_gate("cz", &["q0", "q1"], ParamMap::new())
            .unwrap();

        let reversed = reverse_records(builder.records(), &gates).unwrap();
        assert_eq!(reversed.len(), 3);
        assert_eq!(reversed[0].name, "cz");
        assert_eq!(reversed[1].name, "rx");
        assert_eq!(reversed[1].params[0], ParamValue::Number(-0.5));
        assert_eq!(reversed[2].name, "h");
    }

    #[test]
    fn test_double_reverse_round_trips() {
        let gates = gate_set();
        let mut builder = Builder::new(gates.clone(), ["q0", "q1"]);
        builder.add_gate("rx", &["q0"], angle(0.5)).unwrap();
        builder.add_gate("h", &["q0"], ParamMap::new()).unwrap();
        builder
            .add_gate("cz", &["q0", "q1"], ParamMap::new())
            .unwrap();

        let once = reverse_records(builder.records(), &gates).unwrap();
        let twice = reverse_records(&once, &gates).unwrap();
        assert_eq!(twice, builder.records().to_vec());
    }

    #[test]
    fn test_non_self_inverse_rejected() {
        let gates = gate_set();
        let mut builder = Builder::new(gates.clone(), ["q0", "q1"]);
        builder
            .add_gate("iswap", &["q0", "q1"], ParamMap::new())
            .unwrap();

        let err = reverse_records(builder.records(), &gates).unwrap_err();
        assert_eq!(
            err,
            SchedError::Irreversible {
                name: "iswap".into()
            }
        );
    }

    #[test]
    fn test_textual_angle_rejected() {
        let gates = gate_set();
        let records = vec![OpRecord::new(
            "rx",
            vec!["q0".into()],
            vec![ParamValue::Text("sweep".into())],
        )];

        let err = reverse_records(&records, &gates).unwrap_err();
        assert!(matches!(err, SchedError::Irreversible { .. }));
    }

    #[test]
    fn test_make_reverse_circuit_is_independent() {
        let gates = gate_set();
        let mut builder = Builder::new(gates, ["q0", "q1"]);
        builder.add_gate("h", &["q0"], ParamMap::new()).unwrap();
        builder.add_gate("rx", &["q0"], angle(1.0)).unwrap();

        let reversed = builder.make_reverse_circuit(true).unwrap();
        assert!(reversed.is_finalized());
        assert_eq!(reversed.records().len(), 2);
        assert_eq!(reversed.records()[0].name, "rx");

        // the original keeps scheduling untouched by the reversal
        assert!(!builder.is_finalized());
        builder.add_gate("h", &["q0"], ParamMap::new()).unwrap();
        assert_eq!(builder.records().len(), 3);
        assert_eq!(reversed.records().len(), 2);
    }

    #[test]
    fn test_reversed_schedule_times_rebuilt_fresh() {
        let gates = gate_set();
        let mut builder = Builder::new(gates, ["q0", "q1"]);
        builder.add_gate("h", &["q0"], ParamMap::new()).unwrap();
        builder
            .add_gate("cz", &["q0", "q1"], ParamMap::new())
            .unwrap();

        let reversed = builder.make_reverse_circuit(false).unwrap();
        // cz now comes first, starting at 0
        let ops = reversed.circuit().ops();
        assert_eq!(ops[0].name, "cz");
        assert_eq!(ops[0].start, 0.0);
        assert_eq!(ops[1].name, "hadamard");
        assert_eq!(ops[1].start, 40.0);
    }
}
