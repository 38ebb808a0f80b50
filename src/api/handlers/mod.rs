use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use notekeep_core::models::*;
use notekeep_core::{Database, StoreError};

type ApiResult<T> = Result<T, (StatusCode, String)>;

// ============================================================
// Error Handling
// ============================================================

/// Map a store error to a status and body.
///
/// Caller mistakes (missing entity, duplicate key, bad argument) are echoed
/// back. Storage failures are logged in full and the client only sees a
/// generic message.
fn store_error(e: StoreError) -> (StatusCode, String) {
    match e {
        StoreError::NotFound { .. } => (StatusCode::NOT_FOUND, e.to_string()),
        StoreError::DuplicateKey(_) => {
            tracing::warn!("Conflict: {}", e);
            (StatusCode::CONFLICT, e.to_string())
        }
        StoreError::InvalidArgument(_) => {
            tracing::warn!("Validation error: {}", e);
            (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
        }
        StoreError::StorageUnavailable(_) | StoreError::Storage(_) => internal_error(e),
    }
}

fn internal_error(e: impl std::fmt::Display) -> (StatusCode, String) {
    tracing::error!("Internal error: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

fn not_found(entity: &str) -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, format!("{entity} not found"))
}

/// Run a store operation off the async runtime.
async fn blocking<T, F>(db: Database, op: F) -> ApiResult<T>
where
    F: FnOnce(&Database) -> notekeep_core::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || op(&db))
        .await
        .map_err(internal_error)?
        .map_err(store_error)
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok", "message": "notekeep" }))
}

// ============================================================
// Folders
// ============================================================

pub async fn list_folders(State(db): State<Database>) -> ApiResult<Json<Vec<Folder>>> {
    blocking(db, |db| db.list_folders()).await.map(Json)
}

pub async fn create_folder(
    State(db): State<Database>,
    Json(input): Json<CreateFolderInput>,
) -> ApiResult<(StatusCode, Json<Folder>)> {
    blocking(db, move |db| db.create_folder(input))
        .await
        .map(|f| (StatusCode::CREATED, Json(f)))
}

pub async fn rename_folder(
    State(db): State<Database>,
    Path(id): Path<String>,
    Json(input): Json<RenameFolderInput>,
) -> ApiResult<Json<Folder>> {
    blocking(db, move |db| db.rename_folder(&id, &input.name))
        .await?
        .map(Json)
        .ok_or_else(|| not_found("Folder"))
}

pub async fn delete_folder(
    State(db): State<Database>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if blocking(db, move |db| db.delete_folder(&id)).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("Folder"))
    }
}

// ============================================================
// Tags
// ============================================================

pub async fn list_tags(State(db): State<Database>) -> ApiResult<Json<Vec<Tag>>> {
    blocking(db, |db| db.list_tags()).await.map(Json)
}

pub async fn create_tag(
    State(db): State<Database>,
    Json(input): Json<CreateTagInput>,
) -> ApiResult<(StatusCode, Json<Tag>)> {
    blocking(db, move |db| db.create_tag(input))
        .await
        .map(|t| (StatusCode::CREATED, Json(t)))
}

// ============================================================
// Notes
// ============================================================

pub async fn list_notes(
    State(db): State<Database>,
    Query(filter): Query<NoteFilter>,
) -> ApiResult<Json<Vec<Note>>> {
    blocking(db, move |db| db.list_notes(&filter)).await.map(Json)
}

pub async fn get_note(State(db): State<Database>, Path(id): Path<String>) -> ApiResult<Json<Note>> {
    blocking(db, move |db| db.get_note(&id))
        .await?
        .map(Json)
        .ok_or_else(|| not_found("Note"))
}

pub async fn create_note(
    State(db): State<Database>,
    Json(input): Json<CreateNoteInput>,
) -> ApiResult<(StatusCode, Json<Note>)> {
    blocking(db, move |db| db.create_note(input))
        .await
        .map(|n| (StatusCode::CREATED, Json(n)))
}

pub async fn update_note(
    State(db): State<Database>,
    Path(id): Path<String>,
    Json(input): Json<UpdateNoteInput>,
) -> ApiResult<Json<Note>> {
    blocking(db, move |db| db.update_note(&id, input))
        .await?
        .map(Json)
        .ok_or_else(|| not_found("Note"))
}

pub async fn delete_note(
    State(db): State<Database>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if blocking(db, move |db| db.delete_note(&id)).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("Note"))
    }
}

pub async fn get_note_history(
    State(db): State<Database>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<HistoryEntry>>> {
    blocking(db, move |db| db.get_note_history(&id))
        .await
        .map(Json)
}
