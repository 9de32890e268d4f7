//! Gate registry for qtempo
//!
//! Maps a gate name plus its exact resource tuple to an immutable
//! descriptor: timing metadata, declared parameters, and the behavior that
//! materializes the gate. The scheduler never defines gate semantics, it
//! only dispatches on the descriptor's behavior tag.

use crate::builder::Builder;
use qtempo_core::{ParamMap, ParamValue, ResourceId, SchedError, SchedResult, ScheduledOp, TimeNs};
use std::collections::BTreeMap;

/// Context handed to a behavior hook at materialization time
#[derive(Debug, Clone, PartialEq)]
pub struct GateCall {
    /// Registry gate name as submitted
    pub name: String,
    /// Resources the gate acts on, in submission order
    pub resources: Vec<ResourceId>,
    /// Merged parameter map (defaults overridden by caller values)
    pub params: ParamMap,
    /// Start of the occupied window
    pub start: TimeNs,
    /// Instant of execution within the window
    pub instant: TimeNs,
    /// Window length
    pub duration: TimeNs,
}

/// Composite behavior: decomposes by calling back into the builder
pub type CompositeFn = fn(&mut Builder, &GateCall) -> SchedResult<()>;

/// External behavior: constructs a materialized operation opaquely
pub type ExternalFn = fn(&GateCall) -> SchedResult<ScheduledOp>;

/// How a gate materializes, resolved once at lookup time
#[derive(Debug, Clone, PartialEq)]
pub enum GateBehavior {
    /// Materialize directly under the given primitive name
    Primitive(String),
    /// Decompose through recursive builder submissions
    Composite(CompositeFn),
    /// Build the operation through an opaque constructor
    External(ExternalFn),
}

// ============================================================================
// GateSpec
// ============================================================================

/// Immutable descriptor for one (name, resource tuple) registration
#[derive(Debug, Clone, PartialEq)]
pub struct GateSpec {
    /// Window length consumed on every resource the gate touches
    pub duration: TimeNs,

    /// Time from window start to executed instant; window midpoint when
    /// absent
    pub exec_offset: Option<TimeNs>,

    /// User-supplied parameter names, in declared order
    pub param_names: Vec<String>,

    /// Default parameter values, overridden by caller values
    pub defaults: ParamMap,

    /// Whether the gate is its own inverse under time reversal
    ///
    /// Angle-bearing gates are reversed by negating the angle instead;
    /// a gate with neither property cannot be reversed.
    pub self_inverse: bool,

    /// Materialization behavior
    pub behavior: GateBehavior,
}

impl GateSpec {
    /// Descriptor materializing directly under `primitive`
    pub fn primitive(primitive: impl Into<String>, duration: TimeNs) -> Self {
        Self {
            duration,
            exec_offset: None,
            param_names: Vec::new(),
            defaults: BTreeMap::new(),
            self_inverse: true,
            behavior: GateBehavior::Primitive(primitive.into()),
        }
    }

    /// Descriptor decomposing through a composite routine
    pub fn composite(f: CompositeFn, duration: TimeNs) -> Self {
        Self {
            duration,
            exec_offset: None,
            param_names: Vec::new(),
            defaults: BTreeMap::new(),
            self_inverse: true,
            behavior: GateBehavior::Composite(f),
        }
    }

    /// Descriptor built by an opaque external constructor
    pub fn external(f: ExternalFn, duration: TimeNs) -> Self {
        Self {
            duration,
            exec_offset: None,
            param_names: Vec::new(),
            defaults: BTreeMap::new(),
            self_inverse: true,
            behavior: GateBehavior::External(f),
        }
    }

    /// Set the execution offset from window start
    pub fn with_offset(mut self, offset: TimeNs) -> Self {
        self.exec_offset = Some(offset);
        self
    }

    /// Declare user parameters, in order
    pub fn with_params(mut self, names: &[&str]) -> Self {
        self.param_names = names.iter().map(|n| n.to_string()).collect();
        self
    }

    /// Provide a default value for a declared parameter
    pub fn with_default(mut self, name: &str, value: impl Into<ParamValue>) -> Self {
        self.defaults.insert(name.to_string(), value.into());
        self
    }

    /// Mark the gate as not self-inverse under time reversal
    pub fn not_self_inverse(mut self) -> Self {
        self.self_inverse = false;
        self
    }
}

// ============================================================================
// GateFamily
// ============================================================================

/// Per-name shape shared by every registration of a gate
///
/// The textual front end and the reversal transform consult the family to
/// split tokens and locate the angle parameter without knowing the
/// resource tuple yet.
#[derive(Debug, Clone, PartialEq)]
pub struct GateFamily {
    /// Number of resources every registration of this name takes
    pub num_resources: usize,

    /// Declared parameter names, in order
    pub param_names: Vec<String>,
}

// ============================================================================
// GateSet
// ============================================================================

type GateKey = (String, Vec<ResourceId>);

/// Registry of gate descriptors, keyed by name and exact resource tuple
///
/// Keying by the full tuple allows asymmetric timing: `cz` on `(q0, q1)`
/// may be registered with a different duration than on `(q1, q2)`.
#[derive(Debug, Clone, Default)]
pub struct GateSet {
    specs: BTreeMap<GateKey, GateSpec>,
    families: BTreeMap<String, GateFamily>,
    uses_waiting_gates: bool,
}

impl GateSet {
    /// Create an empty gate set
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Register a descriptor for a (name, resource tuple) key
    ///
    /// Every registration of the same name must agree on resource count
    /// and declared parameters; the duration must be finite and
    /// non-negative.
    pub fn register(
        &mut self,
        name: &str,
        resources: &[&str],
        spec: GateSpec,
    ) -> SchedResult<()> {
        if !spec.duration.is_finite() || spec.duration < 0.0 {
            return Err(SchedError::InvalidDuration {
                name: name.to_string(),
                duration: spec.duration,
            });
        }

        let key: GateKey = (
            name.to_string(),
            resources.iter().map(|r| r.to_string()).collect(),
        );
        if self.specs.contains_key(&key) {
            return Err(SchedError::DuplicateGate {
                name: name.to_string(),
                resources: key.1,
            });
        }

        match self.families.get(name) {
            Some(family) => {
                if family.num_resources != resources.len()
                    || family.param_names != spec.param_names
                {
                    return Err(SchedError::FamilyMismatch {
                        name: name.to_string(),
                    });
                }
            }
            None => {
                self.families.insert(
                    name.to_string(),
                    GateFamily {
                        num_resources: resources.len(),
                        param_names: spec.param_names.clone(),
                    },
                );
            }
        }

        self.specs.insert(key, spec);
        Ok(())
    }

    /// Enable or disable automatic waiting-gate insertion at finalize
    pub fn set_waiting_gates(&mut self, enabled: bool) {
        self.uses_waiting_gates = enabled;
    }

    /// Builder-style variant of [`set_waiting_gates`](Self::set_waiting_gates)
    pub fn with_waiting_gates(mut self) -> Self {
        self.uses_waiting_gates = true;
        self
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Descriptor for an exact (name, resource tuple) key
    pub fn lookup(&self, name: &str, resources: &[ResourceId]) -> SchedResult<&GateSpec> {
        let key: GateKey = (name.to_string(), resources.to_vec());
        self.specs.get(&key).ok_or_else(|| SchedError::UnknownGate {
            name: name.to_string(),
            resources: resources.to_vec(),
        })
    }

    /// Shape shared by every registration of a name
    pub fn family(&self, name: &str) -> SchedResult<&GateFamily> {
        self.families.get(name).ok_or_else(|| SchedError::UnknownGate {
            name: name.to_string(),
            resources: Vec::new(),
        })
    }

    /// Whether any registration exists under this name
    pub fn has_family(&self, name: &str) -> bool {
        self.families.contains_key(name)
    }

    /// Whether finalize should insert waiting gates for this set
    pub fn uses_waiting_gates(&self) -> bool {
        self.uses_waiting_gates
    }

    /// Registered gate names
    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.families.keys()
    }
}

// ============================================================================
// Tests
// ============================================================================
