/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use super::types::Pid;
use crate::process::ProcessState;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result alias for fallible simulator operations
pub type SimResult<T> = Result<T, SimError>;

/// Simulator errors with serialization support
///
/// Every variant describes an expected, recoverable refusal. The engine state is
/// left untouched whenever one is returned.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum SimError {
    #[error("Process {0} not found")]
    #[diagnostic(
        code(process::not_found),
        help("The pid was never assigned in this simulation. Check the process table.")
    )]
    ProcessNotFound(Pid),

    #[error("Init process cannot be targeted by {0}")]
    #[diagnostic(
        code(process::init_protected),
        help("Pid 0 is permanent: it is never blocked or terminated.")
    )]
    InitProtected(String),

    #[error("Process {pid} is {state:?}, cannot {operation}")]
    #[diagnostic(
        code(process::invalid_state),
        help("Operation cannot be performed in the current process state.")
    )]
    InvalidState {
        pid: Pid,
        state: ProcessState,
        operation: String,
    },

    #[error("Process {0} already terminated")]
    #[diagnostic(code(process::already_terminated))]
    AlreadyTerminated(Pid),

    #[error("Invalid configuration: {0}")]
    #[diagnostic(
        code(config::invalid),
        help("Probabilities must be within [0, 1], ranges non-empty, and counts non-zero.")
    )]
    InvalidConfig(String),

    #[error("Inconsistent simulation state: {0}")]
    #[diagnostic(
        code(engine::inconsistent),
        help("A pid is tracked in a place that contradicts its state. This is a bug.")
    )]
    Inconsistent(String),

    #[error("Export failed: {0}")]
    #[diagnostic(code(report::export_failed))]
    Export(String),
}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        SimError::Export(err.to_string())
    }
}

impl From<std::io::Error> for SimError {
    fn from(err: std::io::Error) -> Self {
        SimError::Export(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SimError::InvalidState {
            pid: 3,
            state: ProcessState::Blocked,
            operation: "block".into(),
        };
        assert_eq!(err.to_string(), "Process 3 is Blocked, cannot block");
        assert_eq!(SimError::ProcessNotFound(7).to_string(), "Process 7 not found");
    }

    #[test]
    fn test_error_serializes_tagged() {
        let json = serde_json::to_string(&SimError::AlreadyTerminated(2)).unwrap();
        assert_eq!(json, r#"{"error_type":"already_terminated","details":2}"#);
    }
}
