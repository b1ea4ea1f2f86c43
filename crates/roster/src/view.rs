//! Index-addressable projection over the live roster.
//!
//! The view holds only the last-applied predicate and recomputes the
//! visible sequence from the roster on every query. There is no cached
//! snapshot to fall out of sync when history rewrites the roster under
//! it; a one-based index always resolves against what the user currently
//! sees.

use serde::{Deserialize, Serialize};

use markbook_core::{DisplayIndex, DomainError, DomainResult};

use crate::person::Person;
use crate::roster::Roster;

/// Filter criteria for the visible person list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PersonPredicate {
    /// Show everyone.
    #[default]
    All,

    /// Show persons whose display name contains any of the keywords as a
    /// whole word, case-insensitively.
    NameContainsKeywords(Vec<String>),
}

impl PersonPredicate {
    pub fn name_contains<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::NameContainsKeywords(keywords.into_iter().map(Into::into).collect())
    }

    pub fn matches(&self, person: &Person) -> bool {
        match self {
            PersonPredicate::All => true,
            PersonPredicate::NameContainsKeywords(keywords) => person
                .name()
                .as_str()
                .split_whitespace()
                .any(|word| keywords.iter().any(|k| word.eq_ignore_ascii_case(k))),
        }
    }
}

/// Ordered, possibly-filtered projection of the roster's persons.
///
/// All externally supplied indices are one-based; conversion to
/// zero-based happens here and nowhere else. Resolution never leaks raw
/// storage positions: it re-derives from the predicate + roster pair on
/// every call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredView {
    predicate: PersonPredicate,
}

impl FilteredView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the filter criteria.
    pub fn apply(&mut self, predicate: PersonPredicate) {
        self.predicate = predicate;
    }

    /// Back to the match-all default.
    pub fn reset(&mut self) {
        self.predicate = PersonPredicate::All;
    }

    pub fn predicate(&self) -> &PersonPredicate {
        &self.predicate
    }

    /// Lazy, restartable walk over the currently visible persons.
    pub fn iter<'r>(&'r self, roster: &'r Roster) -> impl Iterator<Item = &'r Person> + 'r {
        roster
            .persons()
            .iter()
            .filter(|person| self.predicate.matches(person))
    }

    pub fn size(&self, roster: &Roster) -> usize {
        self.iter(roster).count()
    }

    /// Translate a one-based display index into the person it addresses.
    pub fn resolve<'r>(
        &'r self,
        roster: &'r Roster,
        index: DisplayIndex,
    ) -> DomainResult<&'r Person> {
        self.iter(roster)
            .nth(index.zero_based())
            .ok_or_else(|| DomainError::index_out_of_range(index.one_based(), self.size(roster)))
    }
}
