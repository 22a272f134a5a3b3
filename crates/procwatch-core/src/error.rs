//! Error types for procwatch operations.
//!
//! This module defines the error taxonomy shared across the workspace:
//! - [`ProcwatchError`] - Canonical error type for all procwatch operations
//!
//! ## Design Principles
//!
//! - **Structured**: Errors carry typed context (pid, query) not just messages
//! - **Locally recoverable**: Every variant maps to a one-line user message;
//!   none of them should abort the interactive session
//! - **Distinct outcomes**: "not found", "process ended", and "termination
//!   failed" are separate variants so the session can report each case
//!   differently

use std::io;
use thiserror::Error;

// ============================================================================
// Canonical Error Type
// ============================================================================

/// Canonical error type for all procwatch operations.
///
/// Every fallible operation in the workspace returns this type. All variants
/// are recoverable: the interactive session reports them and continues.
#[derive(Debug, Error)]
pub enum ProcwatchError {
    /// Input could not be parsed as what was expected (PID, menu index).
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Description of what was invalid.
        message: String,
    },

    /// Target process not found.
    ///
    /// The specified PID does not exist or has already exited.
    #[error("Process {pid} not found")]
    NotFound {
        /// The process ID that was not found.
        pid: u32,
    },

    /// No process name matched the query.
    ///
    /// A negative result, not a fault: the name substring matched nothing.
    #[error("No process matching '{query}'")]
    NameNotFound {
        /// The substring that matched no process name.
        query: String,
    },

    /// Invalid choice among disambiguation candidates.
    #[error("Invalid selection '{choice}': expected a number between 1 and {candidates}")]
    AmbiguousSelection {
        /// The raw selection input.
        choice: String,
        /// How many candidates were offered.
        candidates: usize,
    },

    /// A process exited between enumeration and a follow-up query.
    ///
    /// Common under concurrent system activity; treated as a normal
    /// termination outcome rather than a fault.
    #[error("Process {pid} ended")]
    ProcessEnded {
        /// The process ID that disappeared.
        pid: u32,
    },

    /// Both cooperative and forced termination failed.
    ///
    /// Typically insufficient privilege, or the kill request was rejected.
    #[error("Failed to terminate process {pid}: {reason}")]
    TerminationFailed {
        /// The process ID we attempted to terminate.
        pid: u32,
        /// Why the escalation sequence gave up.
        reason: String,
    },

    /// Terminal read/write failure.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying IO error.
        #[from]
        source: io::Error,
    },
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl ProcwatchError {
    /// Create an `InvalidInput` error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        ProcwatchError::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a `NotFound` error.
    pub fn not_found(pid: u32) -> Self {
        ProcwatchError::NotFound { pid }
    }

    /// Create a `NameNotFound` error.
    pub fn name_not_found(query: impl Into<String>) -> Self {
        ProcwatchError::NameNotFound {
            query: query.into(),
        }
    }

    /// Create an `AmbiguousSelection` error.
    pub fn ambiguous_selection(choice: impl Into<String>, candidates: usize) -> Self {
        ProcwatchError::AmbiguousSelection {
            choice: choice.into(),
            candidates,
        }
    }

    /// Create a `ProcessEnded` error.
    pub fn process_ended(pid: u32) -> Self {
        ProcwatchError::ProcessEnded { pid }
    }

    /// Create a `TerminationFailed` error.
    pub fn termination_failed(pid: u32, reason: impl Into<String>) -> Self {
        ProcwatchError::TerminationFailed {
            pid,
            reason: reason.into(),
        }
    }
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for procwatch operations.
pub type ProcwatchResult<T> = Result<T, ProcwatchError>;

// ============================================================================
// Tests
// ============================================================================
