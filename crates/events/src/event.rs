use serde::{Deserialize, Serialize};

use markbook_core::PersonHandle;

/// A state-change announcement from the command core.
///
/// Payloads are deliberately thin: subscribers re-query the live
/// projection rather than consuming a snapshot, so an event can never go
/// stale between publication and rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RosterEvent {
    /// The roster (or the visible projection over it) mutated.
    RosterChanged,

    /// The selected person changed, or the selection was cleared.
    SelectionChanged { selected: Option<PersonHandle> },
}

impl RosterEvent {
    /// Stable event name identifier (e.g. for log records).
    pub fn kind(&self) -> &'static str {
        match self {
            RosterEvent::RosterChanged => "roster.changed",
            RosterEvent::SelectionChanged { .. } => "selection.changed",
        }
    }
}
