//! Roster domain module: persons, assignments, marks.
//!
//! This crate contains the in-memory data model of the roster tool,
//! implemented purely as deterministic domain logic (no IO, no UI, no
//! storage). Mutations happen only through the command crate; views read
//! through the [`FilteredView`] projection.

pub mod assignment;
pub mod grade;
pub mod mark;
pub mod person;
pub mod roster;
pub mod view;

pub use assignment::{Assignment, AssignmentName, MaxMark, Weight};
pub use grade::{GradeSummary, weighted_summary};
pub use mark::Mark;
pub use person::{ContactInfo, Note, Person, PersonName, PhotoPath};
pub use roster::Roster;
pub use view::{FilteredView, PersonPredicate};
