//! Command execution pipeline (application-level orchestration).
//!
//! The dispatcher is the single write entry point of the core. It owns
//! the roster, the filtered view, the history ledger, and the current
//! selection; everything else holds at most a read-only reference.
//!
//! ## Execution flow
//!
//! ```text
//! Command
//!   ↓
//! 1. Read-only? Adjust view/selection, publish, return (no history)
//!   ↓
//! 2. Execute against roster, resolving indices via the current view
//!   ↓
//! 3. On failure: return the typed error — no history, no notification
//!   ↓
//! 4. On success: commit the Applied record (clears the redo branch)
//!   ↓
//! 5. Publish RosterChanged (and SelectionChanged if the selected
//!    person disappeared)
//! ```
//!
//! `undo_last`/`redo_last` run the same tail: revert/replay through the
//! history ledger, then publish. An empty stack is a reportable
//! `EmptyHistory` failure, never a silent no-op.
//!
//! All of this happens on the caller's thread; hosts with more than one
//! thread must serialize calls into the dispatcher externally.

use std::sync::Arc;

use markbook_core::{DomainResult, PersonHandle};
use markbook_events::{ChangeNotifier, RosterEvent};
use markbook_roster::{FilteredView, Person, PersonPredicate, Roster};

use crate::command::Command;
use crate::history::History;

/// Typed success value returned to the UI layer, which owns rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    message: String,
}

impl CommandOutcome {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Orchestrates execute → commit → notify and the undo/redo cycles.
pub struct CommandDispatcher {
    roster: Roster,
    view: FilteredView,
    history: History,
    selection: Option<PersonHandle>,
    notifier: Arc<ChangeNotifier>,
}

impl CommandDispatcher {
    pub fn new(roster: Roster, history: History, notifier: Arc<ChangeNotifier>) -> Self {
        Self {
            roster,
            view: FilteredView::new(),
            history,
            selection: None,
            notifier,
        }
    }

    /// Execute one command. Each step is observably atomic: a failure
    /// at any point returns before any history or notification side
    /// effect happens.
    pub fn run(&mut self, command: Command) -> DomainResult<CommandOutcome> {
        match &command {
            Command::List => {
                self.view.reset();
                self.notifier.publish(&RosterEvent::RosterChanged);
                Ok(CommandOutcome::new("listed all persons"))
            }
            Command::Find { keywords } => {
                self.view
                    .apply(PersonPredicate::name_contains(keywords.iter().cloned()));
                let visible = self.view.size(&self.roster);
                self.notifier.publish(&RosterEvent::RosterChanged);
                Ok(CommandOutcome::new(format!("{visible} persons listed")))
            }
            Command::Select { index } => {
                let handle = self.view.resolve(&self.roster, *index)?.handle().clone();
                self.selection = Some(handle.clone());
                self.notifier.publish(&RosterEvent::SelectionChanged {
                    selected: Some(handle.clone()),
                });
                Ok(CommandOutcome::new(format!("selected person {handle}")))
            }
            _ => {
                let applied = match command.execute(&mut self.roster, &self.view) {
                    Ok(applied) => applied,
                    Err(err) => {
                        tracing::warn!("command rejected ({}): {err}", command.describe());
                        return Err(err);
                    }
                };
                let description = applied.describe();
                self.history.commit(applied);
                self.notifier.publish(&RosterEvent::RosterChanged);
                self.drop_stale_selection();
                tracing::info!("executed command: {description}");
                Ok(CommandOutcome::new(description))
            }
        }
    }

    /// Revert the most recent command, or fail with `EmptyHistory`.
    pub fn undo_last(&mut self) -> DomainResult<CommandOutcome> {
        let description = self.history.undo(&mut self.roster)?;
        self.notifier.publish(&RosterEvent::RosterChanged);
        self.drop_stale_selection();
        tracing::info!("undid command: {description}");
        Ok(CommandOutcome::new(format!("undid {description}")))
    }

    /// Replay the most recently undone command, or fail with
    /// `EmptyHistory`.
    pub fn redo_last(&mut self) -> DomainResult<CommandOutcome> {
        let description = self.history.redo(&mut self.roster)?;
        self.notifier.publish(&RosterEvent::RosterChanged);
        self.drop_stale_selection();
        tracing::info!("redid command: {description}");
        Ok(CommandOutcome::new(format!("redid {description}")))
    }

    /// Read-only roster access for views.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// The persons currently visible through the filter, in order.
    pub fn visible(&self) -> impl Iterator<Item = &Person> {
        self.view.iter(&self.roster)
    }

    pub fn visible_count(&self) -> usize {
        self.view.size(&self.roster)
    }

    /// The currently selected person, if any (and still on the roster).
    pub fn selected(&self) -> Option<&Person> {
        self.selection
            .as_ref()
            .and_then(|handle| self.roster.person(handle))
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    // A mutation (or undo/redo) may remove the selected person; views
    // must not be left pointing at a stale handle. Published after
    // RosterChanged so subscribers re-query before losing the selection.
    fn drop_stale_selection(&mut self) {
        if let Some(handle) = &self.selection {
            if self.roster.person(handle).is_none() {
                self.selection = None;
                self.notifier
                    .publish(&RosterEvent::SelectionChanged { selected: None });
            }
        }
    }
}
