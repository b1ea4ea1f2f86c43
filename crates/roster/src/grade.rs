//! Weighted grade arithmetic.
//!
//! Pure functions over a person's marks and the roster's assignments;
//! the detail panel renders the result as `earned/total`.

use crate::assignment::Assignment;
use crate::person::Person;

/// Weighted totals for one person.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct GradeSummary {
    /// Weight earned so far: the sum of `mark/max × weight` over every
    /// assignment the person has a recorded mark for.
    pub earned: f64,
    /// The sum of all assignment weights, marked or not.
    pub total_weight: f64,
}

/// Compute the weighted grade summary for `person`.
///
/// Unmarked assignments still count towards `total_weight`, so a student
/// with no marks reads as `0.0/total` rather than `0.0/0.0`.
pub fn weighted_summary(person: &Person, assignments: &[Assignment]) -> GradeSummary {
    let mut summary = GradeSummary::default();
    for assignment in assignments {
        let weight = assignment.weight().value();
        summary.total_weight += weight;

        if let Some(mark) = person.mark(&assignment.id_typed()) {
            let fraction = mark.value() / assignment.max_mark().value();
            summary.earned += fraction * weight;
        }
    }
    summary
}
