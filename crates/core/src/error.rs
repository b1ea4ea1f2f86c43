//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic failures (validation, index
/// resolution, history state). Rendering a failure to the user is the
/// UI layer's job; nothing in the core prints or panics.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (malformed field, duplicate handle,
    /// mark above the assignment maximum, and so on).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A display index resolved to no person in the current view.
    #[error("index {index} is out of range (the list has {size} entries)")]
    IndexOutOfRange { index: usize, size: usize },

    /// Undo or redo was requested with nothing to act on.
    #[error("no command to {0}")]
    EmptyHistory(&'static str),

    /// A referenced person or assignment is absent from the roster.
    #[error("not found: {0}")]
    NotFound(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// An internal invariant was violated. This is a programming defect,
    /// not a runtime condition callers are expected to recover from.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn index_out_of_range(index: usize, size: usize) -> Self {
        Self::IndexOutOfRange { index, size }
    }

    pub fn empty_undo() -> Self {
        Self::EmptyHistory("undo")
    }

    pub fn empty_redo() -> Self {
        Self::EmptyHistory("redo")
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }
}
