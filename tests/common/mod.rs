use reqwest::Client;
use server::clients::EvalService;
use server::config::Config;
use server::session::SessionStore;

/// Two games of 4 and 6 half-moves.
pub const TWO_GAMES: &str = include_str!("../fixtures/two_games.pgn");

/// Build a reqwest client for tests.
pub fn client() -> Client {
    Client::new()
}

/// Serve the router on an ephemeral local port and return its base URL.
/// The server runs on the calling test's runtime.
pub async fn spawn_server() -> String {
    let config = Config::default();
    let store = SessionStore::new(config.session_ttl(), config.back_rollback);
    let app = server::app(&config, store, EvalService::disabled());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}
