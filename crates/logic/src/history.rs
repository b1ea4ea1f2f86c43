//! Two-stack undo/redo ledger.

use std::collections::VecDeque;

use markbook_core::{DomainError, DomainResult};
use markbook_roster::Roster;

use crate::command::Applied;

/// Bounded, linear undo/redo history of executed commands.
///
/// `past` holds undo-able records (most recent last), `future` holds
/// redo-able ones (most recent last). Committing a new command clears
/// `future` entirely: history is a line, not a tree, and a new branch
/// invalidates the old one.
///
/// Capacity is optional. A bounded history evicts its *oldest* `past`
/// entries first; `future` never grows past what `past` held, so it
/// needs no cap of its own.
#[derive(Debug, Default)]
pub struct History {
    past: VecDeque<Applied>,
    future: Vec<Applied>,
    capacity: Option<usize>,
}

impl History {
    /// Unbounded history.
    pub fn new() -> Self {
        Self::default()
    }

    /// History retaining at most `capacity` undo-able entries.
    pub fn bounded(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::default()
        }
    }

    /// Record a freshly executed command and discard any redo branch.
    pub fn commit(&mut self, applied: Applied) {
        self.past.push_back(applied);
        self.future.clear();
        if let Some(capacity) = self.capacity {
            while self.past.len() > capacity {
                self.past.pop_front();
            }
        }
    }

    /// Revert the most recent command against `roster` and move it to
    /// the redo stack. Returns the reverted command's description.
    pub fn undo(&mut self, roster: &mut Roster) -> DomainResult<String> {
        let applied = self.past.pop_back().ok_or_else(DomainError::empty_undo)?;
        if let Err(defect) = applied.revert(roster) {
            self.past.push_back(applied);
            return Err(defect);
        }
        let description = applied.describe();
        self.future.push(applied);
        Ok(description)
    }

    /// Replay the most recently undone command against `roster` and move
    /// it back to the undo stack. Returns the command's description.
    pub fn redo(&mut self, roster: &mut Roster) -> DomainResult<String> {
        let applied = self.future.pop().ok_or_else(DomainError::empty_redo)?;
        if let Err(defect) = applied.reapply(roster) {
            self.future.push(applied);
            return Err(defect);
        }
        let description = applied.describe();
        self.past.push_back(applied);
        Ok(description)
    }

    /// Number of commands currently available to undo.
    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    /// Number of commands currently available to redo.
    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }
}
