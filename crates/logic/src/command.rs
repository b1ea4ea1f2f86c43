//! The command set and its reversible effects.
//!
//! Commands are a **closed tagged-variant set** with a shared
//! execute/undo contract, so history replay is an exhaustive match
//! rather than virtual dispatch. A command describes *intent*; executing
//! it against the roster yields an [`Applied`] record that pairs the
//! command with the [`Effect`] delta needed to replay it in either
//! direction.
//!
//! ## Atomicity
//!
//! `execute` validates everything before touching the roster: either the
//! whole mutation lands and an `Applied` comes back, or a typed failure
//! comes back and the roster is bit-for-bit unchanged.
//!
//! ## Index resolution
//!
//! Commands that address a person by display index resolve it through
//! the *current* filtered view at execution time, never at construction
//! time. The resulting `Effect` captures handles and prior values — not
//! indices — so undo and redo stay correct even if the filter changes
//! in between.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use markbook_core::{
    AssignmentId, DisplayIndex, DomainError, DomainResult, PersonHandle,
};
use markbook_roster::{
    Assignment, AssignmentName, ContactInfo, FilteredView, Mark, MaxMark, Note, Person,
    PersonName, PhotoPath, Roster, Weight,
};

/// Atomic multi-field edit of a person. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonEdits {
    pub handle: Option<PersonHandle>,
    pub name: Option<PersonName>,
    pub contact: Option<ContactInfo>,
}

impl PersonEdits {
    pub fn is_empty(&self) -> bool {
        self.handle.is_none() && self.name.is_none() && self.contact.is_none()
    }
}

/// Atomic multi-field edit of an assignment. `None` keeps the current
/// value; the id is never editable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssignmentEdits {
    pub name: Option<AssignmentName>,
    pub deadline: Option<DateTime<Utc>>,
    pub weight: Option<Weight>,
    pub max_mark: Option<MaxMark>,
}

impl AssignmentEdits {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.deadline.is_none()
            && self.weight.is_none()
            && self.max_mark.is_none()
    }
}

/// A unit of work against the roster.
///
/// Mutating variants produce an [`Applied`] record and enter history;
/// `List`, `Find` and `Select` are read-only and never do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    AddPerson { person: Person },
    DeletePerson { index: DisplayIndex },
    EditPerson { index: DisplayIndex, edits: PersonEdits },
    AddAssignment { assignment: Assignment },
    DeleteAssignment { id: AssignmentId },
    EditAssignment { id: AssignmentId, edits: AssignmentEdits },
    RecordMark { index: DisplayIndex, assignment: AssignmentId, value: Mark },
    SetNote { index: DisplayIndex, note: Note },
    SetProfilePhoto { index: DisplayIndex, photo: Option<PhotoPath> },
    ClearRoster,
    List,
    Find { keywords: Vec<String> },
    Select { index: DisplayIndex },
}

impl Command {
    /// Whether executing this command mutates the roster (and therefore
    /// belongs in history).
    pub fn is_mutating(&self) -> bool {
        !matches!(
            self,
            Command::List | Command::Find { .. } | Command::Select { .. }
        )
    }

    /// Short human-readable label, used in outcome and log messages.
    pub fn describe(&self) -> String {
        match self {
            Command::AddPerson { person } => format!("add person {}", person.handle()),
            Command::DeletePerson { index } => format!("delete person at {index}"),
            Command::EditPerson { index, .. } => format!("edit person at {index}"),
            Command::AddAssignment { assignment } => {
                format!("add assignment '{}'", assignment.name())
            }
            Command::DeleteAssignment { id } => format!("delete assignment {id}"),
            Command::EditAssignment { id, .. } => format!("edit assignment {id}"),
            Command::RecordMark { index, value, .. } => {
                format!("record mark {value} for person at {index}")
            }
            Command::SetNote { index, .. } => format!("set note for person at {index}"),
            Command::SetProfilePhoto { index, .. } => {
                format!("set profile photo for person at {index}")
            }
            Command::ClearRoster => "clear roster".to_string(),
            Command::List => "list persons".to_string(),
            Command::Find { keywords } => format!("find {}", keywords.join(" ")),
            Command::Select { index } => format!("select person at {index}"),
        }
    }

    /// Execute a mutating command. Validation precedes every mutation;
    /// on failure the roster is untouched.
    ///
    /// Read-only variants are routed by the dispatcher before this point;
    /// reaching here with one is a programming defect.
    pub(crate) fn execute(
        &self,
        roster: &mut Roster,
        view: &FilteredView,
    ) -> DomainResult<Applied> {
        let effect = match self {
            Command::AddPerson { person } => {
                roster.add_person(person.clone())?;
                Effect::PersonAdded {
                    person: person.clone(),
                }
            }
            Command::DeletePerson { index } => {
                let handle = view.resolve(roster, *index)?.handle().clone();
                let (person, position) = roster.remove_person(&handle)?;
                Effect::PersonRemoved { person, position }
            }
            Command::EditPerson { index, edits } => {
                if edits.is_empty() {
                    return Err(DomainError::validation("at least one field must be edited"));
                }
                let before = view.resolve(roster, *index)?.clone();
                let mut after = before.clone();
                if let Some(handle) = &edits.handle {
                    after = after.with_handle(handle.clone());
                }
                if let Some(name) = &edits.name {
                    after = after.with_name(name.clone());
                }
                if let Some(contact) = &edits.contact {
                    after = after.with_contact(contact.clone());
                }
                roster.replace_person(before.handle(), after.clone())?;
                Effect::PersonReplaced { before, after }
            }
            Command::AddAssignment { assignment } => {
                roster.add_assignment(assignment.clone())?;
                Effect::AssignmentAdded {
                    assignment: assignment.clone(),
                }
            }
            Command::DeleteAssignment { id } => {
                let (assignment, position, marks) = roster.remove_assignment(id)?;
                Effect::AssignmentRemoved {
                    assignment,
                    position,
                    marks,
                }
            }
            Command::EditAssignment { id, edits } => {
                if edits.is_empty() {
                    return Err(DomainError::validation("at least one field must be edited"));
                }
                let before = roster
                    .assignment(id)
                    .ok_or_else(|| DomainError::not_found(format!("assignment '{id}'")))?
                    .clone();
                let mut after = before.clone();
                if let Some(name) = &edits.name {
                    after = after.with_name(name.clone());
                }
                if let Some(deadline) = edits.deadline {
                    after = after.with_deadline(deadline);
                }
                if let Some(weight) = edits.weight {
                    after = after.with_weight(weight);
                }
                if let Some(max_mark) = edits.max_mark {
                    ensure_max_covers_recorded_marks(roster, *id, max_mark)?;
                    after = after.with_max_mark(max_mark);
                }
                roster.replace_assignment(id, after.clone())?;
                Effect::AssignmentReplaced { before, after }
            }
            Command::RecordMark {
                index,
                assignment,
                value,
            } => {
                let max = roster
                    .assignment(assignment)
                    .ok_or_else(|| {
                        DomainError::not_found(format!("assignment '{assignment}'"))
                    })?
                    .max_mark();
                if value.value() > max.value() {
                    return Err(DomainError::validation(format!(
                        "mark {value} exceeds the assignment maximum of {}",
                        max.value()
                    )));
                }
                let before = view.resolve(roster, *index)?.clone();
                let after = before.with_mark(*assignment, *value);
                roster.replace_person(before.handle(), after.clone())?;
                Effect::PersonReplaced { before, after }
            }
            Command::SetNote { index, note } => {
                let before = view.resolve(roster, *index)?.clone();
                let after = before.with_note(note.clone());
                roster.replace_person(before.handle(), after.clone())?;
                Effect::PersonReplaced { before, after }
            }
            Command::SetProfilePhoto { index, photo } => {
                let before = view.resolve(roster, *index)?.clone();
                let after = before.with_photo(photo.clone());
                roster.replace_person(before.handle(), after.clone())?;
                Effect::PersonReplaced { before, after }
            }
            Command::ClearRoster => Effect::RosterCleared {
                snapshot: roster.clear(),
            },
            Command::List | Command::Find { .. } | Command::Select { .. } => {
                return Err(DomainError::invariant(
                    "read-only command routed into execute",
                ));
            }
        };

        Ok(Applied {
            command: self.clone(),
            effect,
        })
    }
}

fn ensure_max_covers_recorded_marks(
    roster: &Roster,
    id: AssignmentId,
    max_mark: MaxMark,
) -> DomainResult<()> {
    for person in roster.persons() {
        if let Some(mark) = person.mark(&id) {
            if mark.value() > max_mark.value() {
                return Err(DomainError::validation(format!(
                    "person '{}' already has mark {mark}, above the new maximum of {}",
                    person.handle(),
                    max_mark.value()
                )));
            }
        }
    }
    Ok(())
}

/// Reversible delta produced by a successful execution.
///
/// Deltas capture both directions — prior and new values, removed
/// entities with the position they held, a full snapshot for clear — so
/// that `revert` and `reapply` are pure replays keyed by handle/id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    PersonAdded {
        person: Person,
    },
    PersonRemoved {
        person: Person,
        position: usize,
    },
    PersonReplaced {
        before: Person,
        after: Person,
    },
    AssignmentAdded {
        assignment: Assignment,
    },
    AssignmentRemoved {
        assignment: Assignment,
        position: usize,
        marks: Vec<(PersonHandle, Mark)>,
    },
    AssignmentReplaced {
        before: Assignment,
        after: Assignment,
    },
    RosterCleared {
        snapshot: Roster,
    },
}

impl Effect {
    /// Undo this delta.
    pub(crate) fn revert(&self, roster: &mut Roster) -> DomainResult<()> {
        match self {
            Effect::PersonAdded { person } => {
                roster.remove_person(person.handle())?;
            }
            Effect::PersonRemoved { person, position } => {
                roster.insert_person(*position, person.clone())?;
            }
            Effect::PersonReplaced { before, after } => {
                roster.replace_person(after.handle(), before.clone())?;
            }
            Effect::AssignmentAdded { assignment } => {
                roster.remove_assignment(&assignment.id_typed())?;
            }
            Effect::AssignmentRemoved {
                assignment,
                position,
                marks,
            } => {
                roster.restore_assignment(*position, assignment.clone(), marks.clone())?;
            }
            Effect::AssignmentReplaced { before, after } => {
                roster.replace_assignment(&after.id_typed(), before.clone())?;
            }
            Effect::RosterCleared { snapshot } => {
                *roster = snapshot.clone();
            }
        }
        Ok(())
    }

    /// Redo this delta.
    pub(crate) fn reapply(&self, roster: &mut Roster) -> DomainResult<()> {
        match self {
            Effect::PersonAdded { person } => {
                roster.add_person(person.clone())?;
            }
            Effect::PersonRemoved { person, .. } => {
                roster.remove_person(person.handle())?;
            }
            Effect::PersonReplaced { before, after } => {
                roster.replace_person(before.handle(), after.clone())?;
            }
            Effect::AssignmentAdded { assignment } => {
                roster.add_assignment(assignment.clone())?;
            }
            Effect::AssignmentRemoved { assignment, .. } => {
                roster.remove_assignment(&assignment.id_typed())?;
            }
            Effect::AssignmentReplaced { before, after } => {
                roster.replace_assignment(&before.id_typed(), after.clone())?;
            }
            Effect::RosterCleared { .. } => {
                roster.clear();
            }
        }
        Ok(())
    }
}

/// An executed command paired with its reversible effect; the unit the
/// history ledger stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Applied {
    command: Command,
    effect: Effect,
}

impl Applied {
    pub fn command(&self) -> &Command {
        &self.command
    }

    pub fn effect(&self) -> &Effect {
        &self.effect
    }

    pub fn describe(&self) -> String {
        self.command.describe()
    }

    pub(crate) fn revert(&self, roster: &mut Roster) -> DomainResult<()> {
        self.effect.revert(roster)
    }

    pub(crate) fn reapply(&self, roster: &mut Roster) -> DomainResult<()> {
        self.effect.reapply(roster)
    }
}
