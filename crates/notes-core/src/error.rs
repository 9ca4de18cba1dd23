//! Error types for store operations.

use thiserror::Error;

use crate::types::NoteId;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during store operations.
///
/// Every failing operation returns before touching the collection, so an
/// error always means the store is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No note with this id exists.
    #[error("note not found: {0}")]
    NoteNotFound(NoteId),

    /// A patch tried to change the id of an existing note.
    #[error("cannot change id of note {id} to {attempted}")]
    IdChangeRejected { id: NoteId, attempted: String },
}
