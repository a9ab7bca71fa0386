pub mod clients;
pub mod config;
pub mod error;
pub mod routes;
pub mod session;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Extension, Router,
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};

use crate::clients::EvalService;
use crate::config::Config;
use crate::session::SessionStore;

/// Build the HTTP router with its shared state.
pub fn app(config: &Config, store: SessionStore, evals: EvalService) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health
        .route("/health", get(routes::health::health_check))
        // Sessions
        .route("/api/sessions", post(routes::sessions::create_session))
        .route(
            "/api/sessions/{session_id}",
            get(routes::sessions::get_session).delete(routes::sessions::delete_session),
        )
        // File input
        .route(
            "/api/sessions/{session_id}/pgn",
            post(routes::pgn::upload_pgn).layer(DefaultBodyLimit::max(config.max_upload_bytes)),
        )
        // Game selection
        .route("/api/sessions/{session_id}/games", get(routes::games::list_games))
        .route("/api/sessions/{session_id}/game", put(routes::games::select_game))
        // Navigation
        .route(
            "/api/sessions/{session_id}/nav/{action}",
            post(routes::navigation::navigate),
        )
        // Board and move list
        .route("/api/sessions/{session_id}/board.svg", get(routes::board::board_svg))
        .route("/api/sessions/{session_id}/moves", get(routes::board::get_moves))
        .route("/api/sessions/{session_id}/options", put(routes::board::update_options))
        // Evaluation
        .route("/api/sessions/{session_id}/eval", get(routes::eval::get_eval))
        // Shared state
        .layer(Extension(store))
        .layer(Extension(evals))
        .layer(CompressionLayer::new())
        .layer(cors)
}
