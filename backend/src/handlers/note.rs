//! HTTP handlers for operational notes

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::error::AppResult;
use crate::models::{Note, NoteFilter, NoteInput};
use crate::services::NoteService;
use crate::AppState;

/// List notes with optional filters
pub async fn list_notes(
    State(state): State<AppState>,
    Query(filter): Query<NoteFilter>,
) -> AppResult<Json<Vec<Note>>> {
    let service = NoteService::new(state.db);
    let notes = service.list(&filter).await?;
    Ok(Json(notes))
}

/// Get a single note
pub async fn get_note(
    State(state): State<AppState>,
    Path(note_id): Path<i64>,
) -> AppResult<Json<Note>> {
    let service = NoteService::new(state.db);
    let note = service.get(note_id).await?;
    Ok(Json(note))
}

/// Create a new note
pub async fn create_note(
    State(state): State<AppState>,
    Json(input): Json<NoteInput>,
) -> AppResult<Json<Note>> {
    let service = NoteService::new(state.db);
    let note = service.create(input).await?;
    Ok(Json(note))
}

/// Update an existing note
pub async fn update_note(
    State(state): State<AppState>,
    Path(note_id): Path<i64>,
    Json(input): Json<NoteInput>,
) -> AppResult<Json<Note>> {
    let service = NoteService::new(state.db);
    let note = service.update(note_id, input).await?;
    Ok(Json(note))
}

/// Delete a note
pub async fn delete_note(
    State(state): State<AppState>,
    Path(note_id): Path<i64>,
) -> AppResult<Json<()>> {
    let service = NoteService::new(state.db);
    service.delete(note_id).await?;
    Ok(Json(()))
}
