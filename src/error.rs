//! Error types for the agent-demo CLI.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.
//! Failures that happen *inside* a run (nonzero exit, spawn failure, timeout)
//! are not errors here: they are recorded as a `RunStatus` on the transcript.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for agent-demo operations.
#[derive(Error, Debug)]
pub enum DemoError {
    /// User provided invalid arguments or the configuration is invalid.
    #[error("{0}")]
    UserError(String),

    /// One or more agent scripts failed pre-flight validation.
    #[error("Validation failed: {0}")]
    ValidationError(String),

    /// The run lock could not be acquired.
    #[error("Lock acquisition failed: {0}")]
    LockError(String),

    /// A run is already active in this session slot.
    #[error("agent '{0}' is still running; wait for it to finish before starting another run")]
    RunActive(String),
}

impl DemoError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            DemoError::UserError(_) => exit_codes::USER_ERROR,
            DemoError::ValidationError(_) => exit_codes::VALIDATION_FAILURE,
            DemoError::LockError(_) => exit_codes::LOCK_FAILURE,
            DemoError::RunActive(_) => exit_codes::LOCK_FAILURE,
        }
    }
}

/// Result type alias for agent-demo operations.
pub type Result<T> = std::result::Result<T, DemoError>;
