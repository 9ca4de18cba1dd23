//! In-memory notes store.
//!
//! The `NotesStore` keeps notes in insertion order and provides the
//! create, list, delete, patch and replace operations behind the HTTP API.
//! It does no locking of its own; callers sharing a store across tasks wrap
//! it in a mutex and hold the guard for the whole operation.

use crate::error::{StoreError, StoreResult};
use crate::types::{NewNote, Note, NoteId, NotePatch, NoteReplace};

/// Ordered collection of notes.
#[derive(Debug, Clone, Default)]
pub struct NotesStore {
    notes: Vec<Note>,
}

impl NotesStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of notes currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Whether the store holds no notes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Append a new note and return it.
    ///
    /// The id is the store length plus one, so ids freed by deletion are
    /// handed out again and may duplicate the id of a note still present.
    pub fn create(&mut self, input: NewNote) -> Note {
        let note = input.into_note(NoteId::for_store_len(self.notes.len()));
        self.notes.push(note.clone());
        note
    }

    /// All notes in insertion order.
    #[must_use]
    pub fn list(&self) -> &[Note] {
        &self.notes
    }

    /// First note whose id equals `id` exactly.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    fn position(&self, id: &str) -> StoreResult<usize> {
        self.notes
            .iter()
            .position(|note| note.id == id)
            .ok_or_else(|| StoreError::NoteNotFound(NoteId::from(id)))
    }

    /// Remove the first note with this id and return it.
    pub fn delete_one(&mut self, id: &str) -> StoreResult<Note> {
        let index = self.position(id)?;
        Ok(self.notes.remove(index))
    }

    /// Merge the supplied fields of `patch` into the note with this id.
    ///
    /// Fails with `NoteNotFound` before looking at the patch, then with
    /// `IdChangeRejected` if the patch names a different id.
    pub fn patch(&mut self, id: &str, patch: NotePatch) -> StoreResult<&Note> {
        let index = self.position(id)?;
        let note = &mut self.notes[index];

        if let Some(attempted) = patch.conflicting_id(&note.id) {
            return Err(StoreError::IdChangeRejected {
                id: note.id.clone(),
                attempted,
            });
        }

        patch.apply_to(note);
        Ok(&*note)
    }

    /// Overwrite the supplied fields of the note with this id.
    pub fn replace(&mut self, id: &str, replace: NoteReplace) -> StoreResult<&Note> {
        let index = self.position(id)?;
        let note = &mut self.notes[index];
        replace.apply_to(note);
        Ok(&*note)
    }

    /// Remove every note, returning how many were removed.
    pub fn delete_all(&mut self) -> usize {
        let removed = self.notes.len();
        self.notes.clear();
        removed
    }
}
