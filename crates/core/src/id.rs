//! Strongly-typed identifiers used across the roster domain.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};

/// Stable identifier of an assignment.
///
/// Marks reference assignments through this id, never by list position,
/// so reordering or renaming an assignment cannot detach its marks.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AssignmentId(Uuid);

impl AssignmentId {
    /// Create a new identifier.
    ///
    /// Uses UUIDv7 (time-ordered). Prefer passing IDs explicitly in tests
    /// for determinism.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AssignmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for AssignmentId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<Uuid> for AssignmentId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<AssignmentId> for Uuid {
    fn from(value: AssignmentId) -> Self {
        value.0
    }
}

impl FromStr for AssignmentId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid = Uuid::from_str(s)
            .map_err(|e| DomainError::invalid_id(format!("AssignmentId: {e}")))?;
        Ok(Self(uuid))
    }
}

/// Maximum length of a person handle, in characters.
pub const MAX_HANDLE_LEN: usize = 32;

/// Unique, user-visible handle of a person (e.g. `A1`).
///
/// Handles are the stable identity commands capture for undo: display
/// indices are ephemeral, handles survive filtering and replay.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonHandle(String);

impl PersonHandle {
    /// Validate and wrap a handle.
    ///
    /// Handles are non-empty, at most [`MAX_HANDLE_LEN`] characters, and
    /// consist of ASCII letters and digits only.
    pub fn new(handle: impl Into<String>) -> DomainResult<Self> {
        let handle = handle.into();
        if handle.is_empty() {
            return Err(DomainError::validation("handle cannot be empty"));
        }
        if handle.len() > MAX_HANDLE_LEN {
            return Err(DomainError::validation(format!(
                "handle '{handle}' exceeds {MAX_HANDLE_LEN} characters"
            )));
        }
        if !handle.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(DomainError::validation(format!(
                "handle '{handle}' contains characters outside [A-Za-z0-9]"
            )));
        }
        Ok(Self(handle))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for PersonHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PersonHandle {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).map_err(|e| match e {
            DomainError::Validation(msg) => DomainError::invalid_id(msg),
            other => other,
        })
    }
}
