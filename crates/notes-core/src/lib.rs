//! notes-core: Note records and the in-memory notes store
//!
//! This crate provides:
//! - The `Note` record and its `NoteId`
//! - Partial-update inputs (`NewNote`, `NotePatch`, `NoteReplace`) that track
//!   which fields a client actually supplied
//! - `NotesStore`, the ordered in-memory collection with create, list,
//!   delete, patch and replace operations
//!
//! # Usage
//!
//! ```rust
//! use notes_core::{NewNote, NotesStore};
//! use serde_json::json;
//!
//! let mut store = NotesStore::new();
//! let input: NewNote = serde_json::from_value(json!({ "title": "A" })).unwrap();
//! let note = store.create(input);
//!
//! assert_eq!(note.id.as_str(), "1");
//! assert_eq!(store.list().len(), 1);
//! ```

pub mod error;
pub mod store;
pub mod types;

pub use error::{StoreError, StoreResult};
pub use store::NotesStore;
pub use types::{NewNote, Note, NoteId, NotePatch, NoteReplace};
