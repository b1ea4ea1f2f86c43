use serde::{Deserialize, Serialize};

use markbook_core::{
    AssignmentId, DomainError, DomainResult, Entity, PersonHandle, entity::position_of,
};

use crate::assignment::Assignment;
use crate::mark::Mark;
use crate::person::Person;

/// The full in-memory collection of persons and assignments.
///
/// The roster is the single owner of its entities. Order is stable:
/// entities keep their position until removed, and removal reports the
/// position so an undo can reinsert exactly where the entity was.
///
/// Invariants, enforced on every mutation:
/// - person handles are unique;
/// - assignment ids and assignment names are unique.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    persons: Vec<Person>,
    assignments: Vec<Assignment>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn persons(&self) -> &[Person] {
        &self.persons
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn is_empty(&self) -> bool {
        self.persons.is_empty() && self.assignments.is_empty()
    }

    pub fn person(&self, handle: &PersonHandle) -> Option<&Person> {
        position_of(&self.persons, handle).map(|at| &self.persons[at])
    }

    pub fn assignment(&self, id: &AssignmentId) -> Option<&Assignment> {
        position_of(&self.assignments, id).map(|at| &self.assignments[at])
    }

    /// Append a person. Fails if the handle is already taken.
    pub fn add_person(&mut self, person: Person) -> DomainResult<()> {
        self.ensure_handle_free(person.handle())?;
        self.persons.push(person);
        Ok(())
    }

    /// Reinsert a person at a specific position (undo of a removal).
    pub fn insert_person(&mut self, position: usize, person: Person) -> DomainResult<()> {
        self.ensure_handle_free(person.handle())?;
        if position > self.persons.len() {
            return Err(DomainError::invariant(format!(
                "person insert position {position} is beyond list length {}",
                self.persons.len()
            )));
        }
        self.persons.insert(position, person);
        Ok(())
    }

    /// Remove a person, returning the value and the position it held.
    pub fn remove_person(&mut self, handle: &PersonHandle) -> DomainResult<(Person, usize)> {
        let position = position_of(&self.persons, handle)
            .ok_or_else(|| DomainError::not_found(format!("person '{handle}'")))?;
        Ok((self.persons.remove(position), position))
    }

    /// Swap in a replacement for the person currently stored under
    /// `handle`, returning the previous value. A handle change is checked
    /// for uniqueness before anything is touched.
    pub fn replace_person(
        &mut self,
        handle: &PersonHandle,
        replacement: Person,
    ) -> DomainResult<Person> {
        let position = position_of(&self.persons, handle)
            .ok_or_else(|| DomainError::not_found(format!("person '{handle}'")))?;
        if replacement.handle() != handle {
            self.ensure_handle_free(replacement.handle())?;
        }
        Ok(std::mem::replace(&mut self.persons[position], replacement))
    }

    /// Append an assignment. Fails if the id or the name is already taken.
    pub fn add_assignment(&mut self, assignment: Assignment) -> DomainResult<()> {
        self.ensure_assignment_free(&assignment)?;
        self.assignments.push(assignment);
        Ok(())
    }

    /// Remove an assignment, cascading over recorded marks: every mark
    /// against it is detached (copy-on-write) and reported alongside the
    /// removed value so an undo can restore all of it.
    pub fn remove_assignment(
        &mut self,
        id: &AssignmentId,
    ) -> DomainResult<(Assignment, usize, Vec<(PersonHandle, Mark)>)> {
        let position = position_of(&self.assignments, id)
            .ok_or_else(|| DomainError::not_found(format!("assignment '{id}'")))?;
        let assignment = self.assignments.remove(position);

        let mut detached = Vec::new();
        for person in &mut self.persons {
            if let Some(mark) = person.mark(id).copied() {
                detached.push((person.handle().clone(), mark));
                *person = person.without_mark(id);
            }
        }
        Ok((assignment, position, detached))
    }

    /// Undo of [`remove_assignment`](Self::remove_assignment): reinsert
    /// the assignment at its old position and re-attach the marks.
    pub fn restore_assignment(
        &mut self,
        position: usize,
        assignment: Assignment,
        marks: Vec<(PersonHandle, Mark)>,
    ) -> DomainResult<()> {
        self.ensure_assignment_free(&assignment)?;
        if position > self.assignments.len() {
            return Err(DomainError::invariant(format!(
                "assignment insert position {position} is beyond list length {}",
                self.assignments.len()
            )));
        }
        let id = assignment.id_typed();
        self.assignments.insert(position, assignment);
        for (handle, mark) in marks {
            let person = self
                .person(&handle)
                .ok_or_else(|| {
                    DomainError::invariant(format!(
                        "mark restore references missing person '{handle}'"
                    ))
                })?
                .with_mark(id, mark);
            self.replace_person(&handle, person)?;
        }
        Ok(())
    }

    /// Swap in a replacement for the assignment stored under `id`,
    /// returning the previous value. The id must be unchanged; a renamed
    /// assignment is checked against the name-uniqueness invariant first.
    pub fn replace_assignment(
        &mut self,
        id: &AssignmentId,
        replacement: Assignment,
    ) -> DomainResult<Assignment> {
        let position = position_of(&self.assignments, id)
            .ok_or_else(|| DomainError::not_found(format!("assignment '{id}'")))?;
        if replacement.id_typed() != *id {
            return Err(DomainError::invariant(
                "assignment replacement changed the stable id",
            ));
        }
        if self
            .assignments
            .iter()
            .any(|a| a.id() != id && a.name() == replacement.name())
        {
            return Err(DomainError::validation(format!(
                "an assignment named '{}' already exists",
                replacement.name()
            )));
        }
        Ok(std::mem::replace(&mut self.assignments[position], replacement))
    }

    /// Empty the roster, returning the previous contents as a snapshot.
    pub fn clear(&mut self) -> Roster {
        std::mem::take(self)
    }

    fn ensure_handle_free(&self, handle: &PersonHandle) -> DomainResult<()> {
        if self.person(handle).is_some() {
            return Err(DomainError::validation(format!(
                "a person with handle '{handle}' already exists"
            )));
        }
        Ok(())
    }

    fn ensure_assignment_free(&self, assignment: &Assignment) -> DomainResult<()> {
        if self.assignment(&assignment.id_typed()).is_some() {
            return Err(DomainError::validation(format!(
                "assignment id '{}' already exists",
                assignment.id_typed()
            )));
        }
        if self.assignments.iter().any(|a| a.name() == assignment.name()) {
            return Err(DomainError::validation(format!(
                "an assignment named '{}' already exists",
                assignment.name()
            )));
        }
        Ok(())
    }
}
