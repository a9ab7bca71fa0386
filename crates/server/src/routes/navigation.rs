use axum::{extract::Path, Extension, Json};
use pgn_core::Step;
use uuid::Uuid;

use crate::error::AppError;
use crate::session::{SessionStore, SessionView};

/// POST /api/sessions/{session_id}/nav/{action}
///
/// `action` is one of `first`, `back`, `forward`, `last`.
pub async fn navigate(
    Extension(store): Extension<SessionStore>,
    Path((session_id, action)): Path<(Uuid, String)>,
) -> Result<Json<SessionView>, AppError> {
    let step: Step = action.parse().map_err(AppError::BadRequest)?;

    let view = store.with_session(session_id, |s| {
        s.step(step);
        s.view()
    })??;
    Ok(Json(view))
}
