//! Error types for qtempo
//!
//! Every failure surfaced by the scheduling core, the registry and the
//! textual front end, in one taxonomy.

// Error variant fields are self-documenting via error messages
#![allow(missing_docs)]

use thiserror::Error;

/// Main error type for qtempo
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchedError {
    // ========================================================================
    // Registry Errors
    // ========================================================================
    /// No descriptor registered for this gate name + resource combination
    #[error("unknown gate '{name}' for resources {resources:?}")]
    UnknownGate { name: String, resources: Vec<String> },

    /// A descriptor for this exact key already exists
    #[error("gate '{name}' already registered for resources {resources:?}")]
    DuplicateGate { name: String, resources: Vec<String> },

    /// Gate registered with a non-finite or negative duration
    #[error("gate '{name}' has invalid duration {duration}")]
    InvalidDuration { name: String, duration: f64 },

    /// Registration disagrees with the gate's established resource count
    /// or parameter list
    #[error("gate '{name}' registered with inconsistent resource count or parameters")]
    FamilyMismatch { name: String },

    // ========================================================================
    // Submission Errors
    // ========================================================================
    /// A declared parameter was neither supplied nor defaulted
    #[error("gate '{gate}' is missing parameter '{param}'")]
    MissingParameter { gate: String, param: String },

    /// Handle request addressing outside the materialized sequence
    #[error("handle offset {offset} does not address a materialized operation")]
    InvalidMarker { offset: usize },

    /// Submission or padding attempted after finalize
    #[error("session is finalized; start a new builder to submit more gates")]
    SessionClosed,

    /// Opaque failure raised by an external behavior constructor
    #[error("behavior hook failed: {0}")]
    Hook(String),

    // ========================================================================
    // Reversal Errors
    // ========================================================================
    /// Gate has no angle parameter and is not marked self-inverse
    #[error("gate '{name}' cannot be time-reversed: not self-inverse and no angle parameter")]
    Irreversible { name: String },

    // ========================================================================
    // Ingestion Errors
    // ========================================================================
    /// A textual line could not be decoded against the registry
    #[error("malformed line '{line}': {reason}")]
    MalformedLine { line: String, reason: String },

    // ========================================================================
    // I/O Errors
    // ========================================================================
    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(String),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(String),
}

/// Result type alias for qtempo operations
pub type SchedResult<T> = Result<T, SchedError>;

// ============================================================================
// Error Conversion Helpers
// ============================================================================

impl From<serde_json::Error> for SchedError {
    fn from(err: serde_json::Error) -> Self {
        SchedError::Json(err.to_string())
    }
}

impl From<std::io::Error> for SchedError {
    fn from(err: std::io::Error) -> Self {
        SchedError::Io(err.to_string())
    }
}

// ============================================================================
// Error Helpers
// ============================================================================

impl SchedError {
    /// Whether this error came from registry lookup or registration
    pub fn is_registry_error(&self) -> bool {
        matches!(
            self,
            SchedError::UnknownGate { .. }
                | SchedError::DuplicateGate { .. }
                | SchedError::InvalidDuration { .. }
                | SchedError::FamilyMismatch { .. }
        )
    }

    /// Whether this error indicates a misuse of the session lifecycle
    ///
    /// Session errors are programmer errors: retrying the same call on the
    /// same session will fail identically.
    pub fn is_session_error(&self) -> bool {
        matches!(self, SchedError::SessionClosed)
    }
}

// ============================================================================
// Tests
// ============================================================================
