//! Scheduling builder for qtempo
//!
//! One builder owns one circuit-construction session: a timeline, a
//! recorder, and the materialized circuit. Gates are submitted end-on;
//! each submission consults the registry, computes its window from the
//! timeline, records the structural form, dispatches the behavior hook,
//! and commits the window.

use crate::registry::{GateBehavior, GateCall, GateSet};
use crate::timeline::Timeline;
use crate::waiting::{pad_windows, PadSpec, GAP_EPS};
use qtempo_core::{
    Circuit, OpRecord, ParamMap, ResourceId, SchedError, SchedResult, ScheduledOp, WAITING_GATE,
};
use std::sync::Arc;

/// Handle to a materialized operation, stable across reordering only in
/// the sense that it indexes the materialization sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OpHandle(pub usize);

/// A circuit-construction session
#[derive(Debug, Clone)]
pub struct Builder {
    gates: Arc<GateSet>,
    timeline: Timeline,
    records: Vec<OpRecord>,
    circuit: Circuit,
    record_depth: usize,
    finalized: bool,
    padded: bool,
}

impl Builder {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Fresh session over a gate set, seeding the given qubits at time 0
    ///
    /// Seeded qubits participate in global-span padding even when no gate
    /// touches them. Classical sinks are not seeded; they only ever appear
    /// as parameters.
    pub fn new<I, S>(gates: Arc<GateSet>, qubits: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ResourceId>,
    {
        let mut timeline = Timeline::new();
        for qubit in qubits {
            timeline.seed(qubit);
        }
        Self {
            gates,
            timeline,
            records: Vec::new(),
            circuit: Circuit::new("new circuit"),
            record_depth: 0,
            finalized: false,
            padded: false,
        }
    }

    /// Rename the session's circuit
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.circuit.set_title(title);
        self
    }

    // ========================================================================
    // Submission
    // ========================================================================

    /// Submit a gate without requesting a handle
    pub fn add_gate(
        &mut self,
        name: &str,
        resources: &[&str],
        params: ParamMap,
    ) -> SchedResult<()> {
        let resources: Vec<ResourceId> = resources.iter().map(|r| r.to_string()).collect();
        self.submit(name, resources, params, None).map(|_| ())
    }

    /// Submit a gate, requesting a handle to the operation `offset` back
    /// from the end of the materialized sequence (1 = last)
    pub fn add_gate_returning(
        &mut self,
        name: &str,
        resources: &[&str],
        params: ParamMap,
        offset: usize,
    ) -> SchedResult<OpHandle> {
        let resources: Vec<ResourceId> = resources.iter().map(|r| r.to_string()).collect();
        let handle = self.submit(name, resources, params, Some(offset))?;
        Ok(handle.expect("marker submission always yields a handle"))
    }

    /// Replay a recorded sequence, collecting handles for marker-bearing
    /// records in order
    pub fn add_records<I>(&mut self, records: I) -> SchedResult<Vec<OpHandle>>
    where
        I: IntoIterator<Item = OpRecord>,
    {
        let mut handles = Vec::new();
        for record in records {
            let family = self.gates.family(&record.name)?.clone();
            if record.params.len() != family.param_names.len() {
                return Err(SchedError::MalformedLine {
                    line: record.to_string(),
                    reason: format!(
                        "expected {} parameters, got {}",
                        family.param_names.len(),
                        record.params.len()
                    ),
                });
            }

            let mut params = ParamMap::new();
            for (name, value) in family.param_names.iter().zip(record.params.iter()) {
                params.insert(name.clone(), value.clone());
            }

            if let Some(handle) = self.submit(&record.name, record.resources, params, record.marker)?
            {
                handles.push(handle);
            }
        }
        Ok(handles)
    }

    fn submit(
        &mut self,
        name: &str,
        resources: Vec<ResourceId>,
        user_params: ParamMap,
        marker: Option<usize>,
    ) -> SchedResult<Option<OpHandle>> {
        if self.finalized {
            return Err(SchedError::SessionClosed);
        }

        let spec = self.gates.lookup(name, &resources)?.clone();

        let window_start = self.timeline.earliest_start(&resources);
        let instant = window_start + spec.exec_offset.unwrap_or(spec.duration / 2.0);

        // Defaults first, caller values win.
        let mut params = spec.defaults.clone();
        for (key, value) in user_params {
            params.insert(key, value);
        }

        // Every declared parameter must resolve; collect declared-order
        // values for the recorder while we are at it.
        let mut declared = Vec::with_capacity(spec.param_names.len());
        for param_name in &spec.param_names {
            match params.get(param_name) {
                Some(value) => declared.push(value.clone()),
                None => {
                    return Err(SchedError::MissingParameter {
                        gate: name.to_string(),
                        param: param_name.clone(),
                    })
                }
            }
        }

        // Only top-level submissions are recorded; nested submissions made
        // by composite hooks materialize without their own record.
        if self.record_depth == 0 {
            self.records.push(OpRecord {
                name: name.to_string(),
                resources: resources.clone(),
                params: declared,
                marker,
            });
        }

        let call = GateCall {
            name: name.to_string(),
            resources: resources.clone(),
            params,
            start: window_start,
            instant,
            duration: spec.duration,
        };

        self.record_depth += 1;
        let hook_result = self.dispatch(&spec.behavior, &call);
        self.record_depth -= 1;
        hook_result?;

        self.timeline.reserve(&resources, window_start, spec.duration);

        match marker {
            None => Ok(None),
            Some(offset) => {
                if offset == 0 || offset > self.circuit.len() {
                    return Err(SchedError::InvalidMarker { offset });
                }
                Ok(Some(OpHandle(self.circuit.len() - offset)))
            }
        }
    }

    fn dispatch(&mut self, behavior: &GateBehavior, call: &GateCall) -> SchedResult<()> {
        match behavior {
            GateBehavior::Primitive(primitive) => {
                self.circuit.push(
                    primitive.clone(),
                    call.resources.clone(),
                    call.params.clone(),
                    call.start,
                    call.instant,
                    call.duration,
                );
                Ok(())
            }
            GateBehavior::Composite(f) => f(self, call),
            GateBehavior::External(f) => {
                let op = f(call)?;
                self.circuit.push_op(op);
                Ok(())
            }
        }
    }

    // ========================================================================
    // Waiting Gates
    // ========================================================================

    /// Pad resource timelines with explicit waiting operations
    ///
    /// Runs at most once per session and must run before finalize; the
    /// already-recorded sequence is never altered, only the materialized
    /// circuit grows.
    pub fn add_waiting_gates(
        &mut self,
        dtmin: impl Into<PadSpec>,
        dtmax: impl Into<PadSpec>,
        shrink: bool,
    ) -> SchedResult<()> {
        if self.finalized {
            return Err(SchedError::SessionClosed);
        }
        self.insert_waiting(&dtmin.into(), &dtmax.into(), shrink);
        Ok(())
    }

    fn insert_waiting(&mut self, dtmin: &PadSpec, dtmax: &PadSpec, shrink: bool) {
        if self.padded {
            return;
        }

        for (resource, (lower, upper)) in pad_windows(&self.timeline, dtmin, dtmax, shrink) {
            match self.timeline.first_touched(&resource) {
                Some(touched) => {
                    let free = self.timeline.next_free(&resource);
                    if touched - lower > GAP_EPS {
                        self.push_waiting(&resource, lower, touched);
                    }
                    if upper - free > GAP_EPS {
                        self.push_waiting(&resource, free, upper);
                    }
                }
                // Untouched resource: one waiting op spans the whole window.
                None => {
                    if upper - lower > GAP_EPS {
                        self.push_waiting(&resource, lower, upper);
                    }
                }
            }
        }
        self.padded = true;
    }

    fn push_waiting(&mut self, resource: &str, from: f64, to: f64) {
        let duration = to - from;
        self.circuit.push(
            WAITING_GATE,
            vec![resource.to_string()],
            ParamMap::new(),
            from,
            from + duration / 2.0,
            duration,
        );
    }

    // ========================================================================
    // Finalize
    // ========================================================================

    /// Commit the final operation ordering with zero padding
    ///
    /// See [`finalize_with`](Self::finalize_with).
    pub fn finalize(&mut self, topological: bool) -> SchedResult<()> {
        self.finalize_with(topological, 0.0, 0.0, false)
    }

    /// Commit the final operation ordering
    ///
    /// When the gate set enables waiting gates, padding runs first with
    /// the given left/right pads. `topological` selects a causal order
    /// over shared-resource dependencies; otherwise operations sort by
    /// execution instant, ties by materialization index. Repeated calls
    /// without intervening submissions are idempotent; submissions after
    /// finalize are rejected.
    pub fn finalize_with(
        &mut self,
        topological: bool,
        dtmin: impl Into<PadSpec>,
        dtmax: impl Into<PadSpec>,
        shrink: bool,
    ) -> SchedResult<()> {
        if self.gates.uses_waiting_gates() {
            self.insert_waiting(&dtmin.into(), &dtmax.into(), shrink);
        }

        if topological {
            let perm = crate::order::toposort(self.circuit.ops());
            self.circuit.reorder(&perm);
        } else {
            self.circuit.sort_by_instant();
        }

        self.finalized = true;
        Ok(())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The gate set this session schedules against
    pub fn gate_set(&self) -> &Arc<GateSet> {
        &self.gates
    }

    /// The per-resource timeline
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// The recorded (replayable) sequence
    pub fn records(&self) -> &[OpRecord] {
        &self.records
    }

    /// The materialized circuit
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Materialized operation behind a handle
    pub fn op(&self, handle: OpHandle) -> Option<&ScheduledOp> {
        self.circuit.ops().iter().find(|op| op.seq == handle.0)
    }

    /// Whether finalize has been invoked
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Consume the session, keeping only the circuit
    pub fn into_circuit(self) -> Circuit {
        self.circuit
    }
}

// ============================================================================
// Tests
// ============================================================================
