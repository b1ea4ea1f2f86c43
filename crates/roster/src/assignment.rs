use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use markbook_core::{AssignmentId, DomainError, DomainResult, Entity};

/// Name of an assignment (e.g. `Midterm`). Unique within the roster.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssignmentName(String);

impl AssignmentName {
    pub fn new(name: impl Into<String>) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("assignment name cannot be empty"));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for AssignmentName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Weight of an assignment towards the final grade, in percent.
/// Fractional values are allowed; the valid range is `[0, 100]`.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Weight(f64);

impl Weight {
    pub fn new(value: f64) -> DomainResult<Self> {
        if !value.is_finite() || !(0.0..=100.0).contains(&value) {
            return Err(DomainError::validation(format!(
                "weight must be between 0 and 100 (got {value})"
            )));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Maximum achievable mark for an assignment. Strictly positive.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaxMark(f64);

impl MaxMark {
    pub fn new(value: f64) -> DomainResult<Self> {
        if !value.is_finite() || value <= 0.0 {
            return Err(DomainError::validation(format!(
                "maximum mark must be positive (got {value})"
            )));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

/// A graded assignment.
///
/// Marks reference assignments by [`AssignmentId`]; the id stays stable
/// across edits, so renaming or re-weighting an assignment never detaches
/// recorded marks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    id: AssignmentId,
    name: AssignmentName,
    deadline: DateTime<Utc>,
    weight: Weight,
    max_mark: MaxMark,
}

impl Assignment {
    pub fn new(
        id: AssignmentId,
        name: AssignmentName,
        deadline: DateTime<Utc>,
        weight: Weight,
        max_mark: MaxMark,
    ) -> Self {
        Self {
            id,
            name,
            deadline,
            weight,
            max_mark,
        }
    }

    pub fn id_typed(&self) -> AssignmentId {
        self.id
    }

    pub fn name(&self) -> &AssignmentName {
        &self.name
    }

    pub fn deadline(&self) -> DateTime<Utc> {
        self.deadline
    }

    pub fn weight(&self) -> Weight {
        self.weight
    }

    pub fn max_mark(&self) -> MaxMark {
        self.max_mark
    }

    pub fn with_name(&self, name: AssignmentName) -> Self {
        Self {
            name,
            ..self.clone()
        }
    }

    pub fn with_deadline(&self, deadline: DateTime<Utc>) -> Self {
        Self {
            deadline,
            ..self.clone()
        }
    }

    pub fn with_weight(&self, weight: Weight) -> Self {
        Self {
            weight,
            ..self.clone()
        }
    }

    pub fn with_max_mark(&self, max_mark: MaxMark) -> Self {
        Self {
            max_mark,
            ..self.clone()
        }
    }
}

impl Entity for Assignment {
    type Id = AssignmentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
