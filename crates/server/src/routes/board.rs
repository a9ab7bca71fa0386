use axum::{
    extract::{Path, Query},
    http::header,
    response::IntoResponse,
    Extension, Json,
};
use pgn_core::TranscriptEntry;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::session::{SessionStore, SessionView};

#[derive(Deserialize)]
pub struct MovesQuery {
    pub played_only: Option<bool>,
}

#[derive(Deserialize)]
pub struct DisplayOptions {
    pub show_origin: bool,
}

/// GET /api/sessions/{session_id}/board.svg
pub async fn board_svg(
    Extension(store): Extension<SessionStore>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let svg = store.with_session(session_id, |s| s.board_svg())??;
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg))
}

/// GET /api/sessions/{session_id}/moves
pub async fn get_moves(
    Extension(store): Extension<SessionStore>,
    Path(session_id): Path<Uuid>,
    Query(q): Query<MovesQuery>,
) -> Result<Json<Vec<TranscriptEntry>>, AppError> {
    let played_only = q.played_only.unwrap_or(false);
    let moves = store.with_session(session_id, |s| s.transcript(played_only))?;
    Ok(Json(moves))
}

/// PUT /api/sessions/{session_id}/options
pub async fn update_options(
    Extension(store): Extension<SessionStore>,
    Path(session_id): Path<Uuid>,
    Json(options): Json<DisplayOptions>,
) -> Result<Json<SessionView>, AppError> {
    let view = store.with_session(session_id, |s| {
        s.set_show_origin(options.show_origin);
        s.view()
    })??;
    Ok(Json(view))
}
