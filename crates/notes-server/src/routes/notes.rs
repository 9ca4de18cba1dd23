//! Notes collection routes.
//!
//! This module implements the note-related HTTP endpoints:
//! - POST /notes - Create a note
//! - GET /notes - List all notes
//! - DELETE /notes - Delete all notes
//! - PATCH /notes/{id} - Merge supplied fields into a note
//! - PUT /notes/{id} - Overwrite supplied fields, plain-text response
//! - DELETE /notes/{id} - Delete one note

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get},
};
use serde::Serialize;

use notes_core::{NewNote, Note, NotePatch, NoteReplace, StoreError};

use crate::error::{ApiError, ApiResult};
use crate::extract::NoteBody;
use crate::state::AppState;

/// Plain-text body for PUT on a missing note.
pub const REPLACE_NOT_FOUND: &str = "Note not found.";

// ============================================================================
// Response Types
// ============================================================================

/// Response for DELETE /notes/{id}.
#[derive(Debug, Serialize)]
pub struct DeleteNoteResponse {
    /// Confirmation message.
    pub message: String,
    /// The removed note.
    pub deleted: Note,
    /// Notes remaining after the removal.
    pub notes: Vec<Note>,
}

/// Response for PATCH /notes/{id}.
#[derive(Debug, Serialize)]
pub struct PatchNoteResponse {
    /// Confirmation message.
    pub message: String,
    /// The note after the patch was applied.
    pub patch: Note,
}

/// Response for DELETE /notes.
#[derive(Debug, Serialize)]
pub struct DeleteAllResponse {
    /// Confirmation message.
    pub message: String,
    /// The now-empty collection.
    pub notes: Vec<Note>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST /notes - Create a note.
///
/// # Response
///
/// - 201 Created: the new note
/// - 400 Bad Request: malformed body
async fn create_note(
    State(state): State<AppState>,
    body: NoteBody,
) -> ApiResult<(StatusCode, Json<Note>)> {
    let input: NewNote = body.parse()?;
    let note = state.store().await.create(input);

    tracing::info!(note_id = %note.id, "Note created");

    Ok((StatusCode::CREATED, Json(note)))
}

/// GET /notes - List all notes in insertion order.
async fn list_notes(State(state): State<AppState>) -> Json<Vec<Note>> {
    let notes = state.store().await.list().to_vec();

    tracing::debug!(count = notes.len(), "Listed notes");

    Json(notes)
}

/// DELETE /notes/{id} - Delete one note.
///
/// # Response
///
/// - 200 OK: `{ "message", "deleted", "notes" }`
/// - 404 Not Found: `{ "message": "note not found" }`
async fn delete_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteNoteResponse>> {
    let mut store = state.store().await;
    let deleted = store.delete_one(&id)?;
    let notes = store.list().to_vec();
    drop(store);

    tracing::info!(note_id = %id, remaining = notes.len(), "Note deleted");

    Ok(Json(DeleteNoteResponse {
        message: format!("Note with ID {} deleted successfully", id),
        deleted,
        notes,
    }))
}

/// PATCH /notes/{id} - Merge supplied fields into a note.
///
/// Only `title`, `content` and `tags` are applied. An `id` in the body must
/// match the path.
///
/// # Response
///
/// - 200 OK: `{ "message", "patch" }`
/// - 400 Bad Request: the body tries to change the id
/// - 404 Not Found: no note with this id
async fn patch_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: NoteBody,
) -> ApiResult<Json<PatchNoteResponse>> {
    let patch: NotePatch = body.parse()?;
    let note = state.store().await.patch(&id, patch)?.clone();

    tracing::info!(note_id = %id, "Note patched");

    Ok(Json(PatchNoteResponse {
        message: "Note updated successfully".to_string(),
        patch: note,
    }))
}

/// PUT /notes/{id} - Overwrite the supplied fields of a note.
///
/// Tags are read from the `tag` key. Absent fields keep their values.
///
/// # Response
///
/// - 200 OK: plain text confirmation
/// - 404 Not Found: plain text `Note not found.`
async fn replace_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: NoteBody,
) -> ApiResult<Response> {
    let replace: NoteReplace = body.parse()?;
    let result = state.store().await.replace(&id, replace).map(|_| ());

    match result {
        Ok(()) => {
            tracing::info!(note_id = %id, "Note replaced");
            Ok((StatusCode::OK, format!("Note with ID {} updated", id)).into_response())
        }
        Err(StoreError::NoteNotFound(_)) => {
            tracing::warn!(note_id = %id, "Replace target not found");
            Ok((StatusCode::NOT_FOUND, REPLACE_NOT_FOUND).into_response())
        }
        Err(other) => Err(ApiError::Store(other)),
    }
}

/// DELETE /notes - Delete all notes.
async fn delete_all_notes(State(state): State<AppState>) -> Json<DeleteAllResponse> {
    let mut store = state.store().await;
    let removed = store.delete_all();
    let notes = store.list().to_vec();
    drop(store);

    tracing::info!(removed, "All notes deleted");

    Json(DeleteAllResponse {
        message: "All notes deleted".to_string(),
        notes,
    })
}

/// Build note routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/notes",
            get(list_notes).post(create_note).delete(delete_all_notes),
        )
        .route(
            "/notes/{id}",
            delete(delete_note)
                .patch(patch_note)
                .put(replace_note),
        )
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use notes_core::NotesStore;
    use serde_json::{Map, Value, json};

    fn state() -> AppState {
        AppState::new(NotesStore::new(), ServerConfig::default())
    }

    fn body(value: Value) -> NoteBody {
        match value {
            Value::Object(map) => NoteBody(map),
            _ => NoteBody(Map::new()),
        }
    }

    #[tokio::test]
    async fn test_create_note_handler() {
        let state = state();
        let (status, Json(note)) = create_note(
            State(state.clone()),
            body(json!({ "title": "A", "content": "x" })),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(note.id.as_str(), "1");
        assert_eq!(note.tags, json!([]));
        assert_eq!(state.store().await.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_note_handler_not_found() {
        let err = delete_note(State(state()), Path("1".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "note not found");
    }

    #[tokio::test]
    async fn test_patch_note_handler_rejects_id_change() {
        let state = state();
        state.store().await.create(NewNote::default());

        let err = patch_note(
            State(state.clone()),
            Path("1".to_string()),
            body(json!({ "id": "2", "title": "B" })),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(state.store().await.get("1").unwrap().title, None);
    }

    #[tokio::test]
    async fn test_replace_note_handler_not_found_is_plain_text() {
        let response = replace_note(State(state()), Path("7".to_string()), NoteBody::default())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let content_type = response.headers()[http::header::CONTENT_TYPE]
            .to_str()
            .unwrap();
        assert!(content_type.starts_with("text/plain"));
    }

    #[test]
    fn test_delete_response_serialize() {
        let deleted: Note = serde_json::from_value(json!({ "id": "1", "tags": [] })).unwrap();
        let response = DeleteNoteResponse {
            message: "Note with ID 1 deleted successfully".to_string(),
            deleted,
            notes: Vec::new(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            json!({
                "message": "Note with ID 1 deleted successfully",
                "deleted": { "id": "1", "tags": [] },
                "notes": []
            })
        );
    }

    #[test]
    fn test_patch_response_serialize() {
        let patch: Note =
            serde_json::from_value(json!({ "id": "3", "title": "t", "tags": ["a"] })).unwrap();
        let response = PatchNoteResponse {
            message: "Note updated successfully".to_string(),
            patch,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains(r#""patch":{"id":"3","title":"t","tags":["a"]}"#));
    }
}
