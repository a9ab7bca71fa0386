use axum::{extract::Path, http::StatusCode, Extension, Json};
use uuid::Uuid;

use crate::error::AppError;
use crate::session::{SessionStore, SessionView};

/// POST /api/sessions
pub async fn create_session(
    Extension(store): Extension<SessionStore>,
) -> Result<(StatusCode, Json<SessionView>), AppError> {
    let view = store.create()?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /api/sessions/{session_id}
pub async fn get_session(
    Extension(store): Extension<SessionStore>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let view = store.with_session(session_id, |s| s.view())??;
    Ok(Json(view))
}

/// DELETE /api/sessions/{session_id}
pub async fn delete_session(
    Extension(store): Extension<SessionStore>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if store.remove(session_id) {
        tracing::info!(session = %session_id, "Deleted session");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("Session not found".into()))
    }
}
