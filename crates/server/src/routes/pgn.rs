use axum::{
    body::Bytes,
    extract::{Path, Query},
    Extension, Json,
};
use pgn_core::loader;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::session::{SessionStore, SessionView};

#[derive(Deserialize)]
pub struct UploadQuery {
    /// Original file name, shown back to the client.
    pub name: Option<String>,
}

#[derive(Serialize)]
pub struct UploadResponse {
    pub loaded: usize,
    pub message: String,
    pub view: SessionView,
}

/// POST /api/sessions/{session_id}/pgn
///
/// The request body is the raw PGN file. A file without games is rejected
/// with 422 and the session keeps its previous games and cursor.
pub async fn upload_pgn(
    Extension(store): Extension<SessionStore>,
    Path(session_id): Path<Uuid>,
    Query(q): Query<UploadQuery>,
    body: Bytes,
) -> Result<Json<UploadResponse>, AppError> {
    if !store.contains(session_id) {
        return Err(AppError::NotFound("Session not found".into()));
    }

    // Parsing runs off the async workers and without the session lock.
    let games = tokio::task::spawn_blocking(move || loader::load_pgn(&body))
        .await
        .map_err(|e| AppError::Internal(format!("PGN parser task failed: {e}")))??;

    let (loaded, view) = store.with_session(session_id, |s| -> Result<_, AppError> {
        let loaded = s.install(games, q.name);
        Ok((loaded, s.view()?))
    })??;

    let message = if loaded == 1 {
        "Loaded 1 game".to_string()
    } else {
        format!("Loaded {loaded} games")
    };

    Ok(Json(UploadResponse {
        loaded,
        message,
        view,
    }))
}
