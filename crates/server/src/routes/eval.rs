use axum::{extract::Path, Extension, Json};
use pgn_core::Evaluation;
use serde::Serialize;
use uuid::Uuid;

use crate::clients::EvalService;
use crate::error::AppError;
use crate::session::SessionStore;

#[derive(Serialize)]
pub struct EvalResponse {
    pub fen: String,
    pub backend: &'static str,
    pub evaluation: Evaluation,
    pub display: String,
}

/// GET /api/sessions/{session_id}/eval
///
/// Always succeeds for a known session; a failed or slow backend is reported
/// as `unavailable`.
pub async fn get_eval(
    Extension(store): Extension<SessionStore>,
    Extension(evals): Extension<EvalService>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<EvalResponse>, AppError> {
    // The session lock is released before the backend is awaited.
    let projection = store.with_session(session_id, |s| s.projection())??;
    let fen = projection.fen();

    let evaluation = evals.evaluate(&projection.position).await;

    Ok(Json(EvalResponse {
        fen,
        backend: evals.backend_name(),
        display: evaluation.to_string(),
        evaluation,
    }))
}
