//! Core data types for the notes collection.
//!
//! A note is an id plus three client-controlled fields. The client fields are
//! kept as raw JSON values because the API stores whatever it is given.
//!
//! Input types distinguish a field that was *absent* from one that was
//! *present*, including present as `null`. An absent field is `None`; a present
//! one is `Some(value)`, so `Some(Value::Null)` is a deliberate null.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

// ============================================================================
// ID Types
// ============================================================================

/// Identifier of a note within the store.
///
/// Ids are decimal strings derived from the store length at creation time, so
/// they are not guaranteed unique once notes have been deleted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    /// The id given to a note appended to a store currently holding `len` notes.
    #[must_use]
    pub fn for_store_len(len: usize) -> Self {
        Self((len + 1).to_string())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for NoteId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for NoteId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl PartialEq<str> for NoteId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for NoteId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

// ============================================================================
// Note
// ============================================================================

/// A single note record.
///
/// `title` and `content` are omitted from JSON output when the client never
/// supplied them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present"
    )]
    pub title: Option<Value>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present"
    )]
    pub content: Option<Value>,

    /// Usually an array, but stored exactly as received.
    #[serde(default = "empty_tags")]
    pub tags: Value,
}

fn empty_tags() -> Value {
    Value::Array(Vec::new())
}

/// Deserialize a field that is present in the input, keeping `null` as a value.
///
/// Combined with `#[serde(default)]`, a missing field becomes `None` while
/// `"field": null` becomes `Some(Value::Null)`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

// ============================================================================
// Inputs
// ============================================================================

/// Body of a create request.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NewNote {
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Value>,

    #[serde(default, deserialize_with = "present")]
    pub content: Option<Value>,

    #[serde(default, deserialize_with = "present")]
    pub tags: Option<Value>,
}

impl NewNote {
    /// Build the stored note, defaulting tags to an empty array.
    #[must_use]
    pub fn into_note(self, id: NoteId) -> Note {
        Note {
            id,
            title: self.title,
            content: self.content,
            tags: self.tags.unwrap_or_else(empty_tags),
        }
    }
}

/// Body of a partial update.
///
/// Only `title`, `content` and `tags` are merged; `id` is read solely to
/// reject attempts to change it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NotePatch {
    #[serde(default, deserialize_with = "present")]
    pub id: Option<Value>,

    #[serde(default, deserialize_with = "present")]
    pub title: Option<Value>,

    #[serde(default, deserialize_with = "present")]
    pub content: Option<Value>,

    #[serde(default, deserialize_with = "present")]
    pub tags: Option<Value>,
}

impl NotePatch {
    /// If this patch would change `current`, returns the id it asked for.
    ///
    /// Strings compare as-is, numbers by their decimal form and booleans as
    /// `true`/`false`. Arrays render as their elements joined with commas, so
    /// `{"id": 3}` and `{"id": ["3"]}` are both accepted for note "3". Null
    /// and objects never match a note id.
    #[must_use]
    pub fn conflicting_id(&self, current: &NoteId) -> Option<String> {
        let requested = self.id.as_ref()?;
        match id_text(requested) {
            Some(text) if current == text.as_str() => None,
            Some(text) => Some(text),
            None => Some(requested.to_string()),
        }
    }

    /// Copy every supplied field into `note`, leaving the rest untouched.
    pub fn apply_to(self, note: &mut Note) {
        if let Some(title) = self.title {
            note.title = Some(title);
        }
        if let Some(content) = self.content {
            note.content = Some(content);
        }
        if let Some(tags) = self.tags {
            note.tags = tags;
        }
    }
}

/// Textual form of a JSON value used as an id, if it has one.
fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else if let Some(u) = n.as_u64() {
                Some(u.to_string())
            } else {
                n.as_f64().map(|f| f.to_string())
            }
        }
        Value::Bool(b) => Some(b.to_string()),
        // Elements joined with commas, nulls as empty strings.
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => Some(String::new()),
                other => id_text(other),
            })
            .collect::<Option<Vec<_>>>()
            .map(|parts| parts.join(",")),
        Value::Null | Value::Object(_) => None,
    }
}

/// Body of a replace request.
///
/// Tags arrive under the singular key `tag`. Like a patch, only the fields
/// that are present overwrite the note.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NoteReplace {
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Value>,

    #[serde(default, deserialize_with = "present")]
    pub content: Option<Value>,

    #[serde(rename = "tag", default, deserialize_with = "present")]
    pub tags: Option<Value>,
}

impl NoteReplace {
    /// Overwrite the note's fields with the ones supplied.
    pub fn apply_to(self, note: &mut Note) {
        if let Some(title) = self.title {
            note.title = Some(title);
        }
        if let Some(content) = self.content {
            note.content = Some(content);
        }
        if let Some(tags) = self.tags {
            note.tags = tags;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
