use serde::{Deserialize, Serialize};

use markbook_core::{DomainError, DomainResult};

/// A recorded score against one assignment.
///
/// A mark is only bounded above by the assignment it is recorded for;
/// that check happens at command validation time, against the live
/// assignment, not here.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mark(f64);

impl Mark {
    pub fn new(value: f64) -> DomainResult<Self> {
        if !value.is_finite() {
            return Err(DomainError::validation("mark must be a finite number"));
        }
        if value < 0.0 {
            return Err(DomainError::validation(format!(
                "mark cannot be negative (got {value})"
            )));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl core::fmt::Display for Mark {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}
