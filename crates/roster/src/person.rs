use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use markbook_core::{AssignmentId, DomainError, DomainResult, Entity, PersonHandle};

use crate::mark::Mark;

/// Display name of a person.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonName(String);

impl PersonName {
    pub fn new(name: impl Into<String>) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for PersonName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Contact information for a person.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Free-text note attached to a person. Defaults to empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Note(String);

impl Note {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Note {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extensions accepted for a profile photo reference.
const PHOTO_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Reference to a profile photo on local disk.
///
/// The core never opens the file; it only validates that the reference
/// plausibly points at an image the view layer can load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoPath(String);

impl PhotoPath {
    pub fn new(path: impl Into<String>) -> DomainResult<Self> {
        let path = path.into();
        let extension = path.rsplit('.').next().unwrap_or_default().to_ascii_lowercase();
        if path.trim().is_empty() || !PHOTO_EXTENSIONS.contains(&extension.as_str()) {
            return Err(DomainError::validation(format!(
                "photo path '{path}' must end in one of {PHOTO_EXTENSIONS:?}"
            )));
        }
        Ok(Self(path))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A student on the roster.
///
/// Owned exclusively by the [`Roster`](crate::Roster) and treated as
/// immutable: edits go through the `with_*` builders, which produce a new
/// value the roster swaps in. That copy-on-write discipline is what lets
/// history diff before/after states for undo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    handle: PersonHandle,
    name: PersonName,
    contact: ContactInfo,
    photo: Option<PhotoPath>,
    note: Note,
    marks: BTreeMap<AssignmentId, Mark>,
}

impl Person {
    pub fn new(handle: PersonHandle, name: PersonName, contact: ContactInfo) -> Self {
        Self {
            handle,
            name,
            contact,
            photo: None,
            note: Note::empty(),
            marks: BTreeMap::new(),
        }
    }

    pub fn handle(&self) -> &PersonHandle {
        &self.handle
    }

    pub fn name(&self) -> &PersonName {
        &self.name
    }

    pub fn contact(&self) -> &ContactInfo {
        &self.contact
    }

    pub fn photo(&self) -> Option<&PhotoPath> {
        self.photo.as_ref()
    }

    pub fn note(&self) -> &Note {
        &self.note
    }

    pub fn marks(&self) -> &BTreeMap<AssignmentId, Mark> {
        &self.marks
    }

    pub fn mark(&self, assignment: &AssignmentId) -> Option<&Mark> {
        self.marks.get(assignment)
    }

    pub fn with_handle(&self, handle: PersonHandle) -> Self {
        Self {
            handle,
            ..self.clone()
        }
    }

    pub fn with_name(&self, name: PersonName) -> Self {
        Self {
            name,
            ..self.clone()
        }
    }

    pub fn with_contact(&self, contact: ContactInfo) -> Self {
        Self {
            contact,
            ..self.clone()
        }
    }

    pub fn with_note(&self, note: Note) -> Self {
        Self {
            note,
            ..self.clone()
        }
    }

    pub fn with_photo(&self, photo: Option<PhotoPath>) -> Self {
        Self {
            photo,
            ..self.clone()
        }
    }

    pub fn with_mark(&self, assignment: AssignmentId, mark: Mark) -> Self {
        let mut updated = self.clone();
        updated.marks.insert(assignment, mark);
        updated
    }

    pub fn without_mark(&self, assignment: &AssignmentId) -> Self {
        let mut updated = self.clone();
        updated.marks.remove(assignment);
        updated
    }
}

impl Entity for Person {
    type Id = PersonHandle;

    fn id(&self) -> &Self::Id {
        &self.handle
    }
}
