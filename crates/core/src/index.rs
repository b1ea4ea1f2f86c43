//! One-based display indices.
//!
//! Everything outside the core addresses persons by the one-based position
//! shown in the UI list. Conversion to zero-based happens in exactly one
//! place: the filtered view's resolver.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// A one-based index into the currently displayed person list.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayIndex(usize);

impl DisplayIndex {
    /// Wrap a one-based index. Zero is rejected; nothing is displayed at
    /// position zero.
    pub fn from_one_based(index: usize) -> DomainResult<Self> {
        if index == 0 {
            return Err(DomainError::validation("display index must be positive"));
        }
        Ok(Self(index))
    }

    pub fn one_based(&self) -> usize {
        self.0
    }

    pub fn zero_based(&self) -> usize {
        self.0 - 1
    }
}

impl core::fmt::Display for DisplayIndex {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}
