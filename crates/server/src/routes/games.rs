use axum::{extract::Path, Extension, Json};
use pgn_core::GameSummary;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::session::{SessionStore, SessionView};

#[derive(Deserialize)]
pub struct SelectGame {
    pub index: usize,
}

/// GET /api/sessions/{session_id}/games
pub async fn list_games(
    Extension(store): Extension<SessionStore>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Vec<GameSummary>>, AppError> {
    let games = store.with_session(session_id, |s| s.games().summaries())?;
    Ok(Json(games))
}

/// PUT /api/sessions/{session_id}/game
pub async fn select_game(
    Extension(store): Extension<SessionStore>,
    Path(session_id): Path<Uuid>,
    Json(body): Json<SelectGame>,
) -> Result<Json<SessionView>, AppError> {
    let view = store.with_session(session_id, |s| -> Result<_, AppError> {
        let count = s.games().len();
        if body.index >= count {
            return Err(AppError::BadRequest(format!(
                "Game index {} out of range (0..{})",
                body.index, count
            )));
        }
        s.select_game(body.index)?;
        Ok(s.view()?)
    })??;
    Ok(Json(view))
}
