//! HTTP surface tests against an in-process server.

mod common;

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct Readout {
    move_index: usize,
    total: usize,
    text: String,
}

#[derive(Debug, Deserialize)]
struct View {
    session_id: String,
    game_count: usize,
    game_index: usize,
    readout: Readout,
    show_origin: bool,
}

async fn get_view(base: &str, id: &str) -> View {
    let resp = common::client()
        .get(format!("{base}/api/sessions/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    resp.json().await.unwrap()
}

async fn new_session(base: &str) -> String {
    let resp = common::client()
        .post(format!("{base}/api/sessions"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.unwrap();
    body["session_id"].as_str().unwrap().to_string()
}

async fn upload(base: &str, id: &str, pgn: &str) -> reqwest::Response {
    common::client()
        .post(format!("{base}/api/sessions/{id}/pgn?name=games.pgn"))
        .body(pgn.to_string())
        .send()
        .await
        .unwrap()
}

async fn nav(base: &str, id: &str, action: &str) -> Value {
    let resp = common::client()
        .post(format!("{base}/api/sessions/{id}/nav/{action}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    resp.json().await.unwrap()
}

fn cursor_of(view: &Value) -> (u64, u64) {
    (
        view["game_index"].as_u64().unwrap(),
        view["readout"]["move_index"].as_u64().unwrap(),
    )
}

#[tokio::test]
async fn test_health() {
    let base = common::spawn_server().await;
    let resp = common::client().get(format!("{base}/health")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_new_session_is_empty() {
    let base = common::spawn_server().await;
    let id = new_session(&base).await;

    let view = get_view(&base, &id).await;
    assert_eq!(view.session_id, id);
    assert_eq!(view.game_count, 0);
    assert_eq!((view.game_index, view.readout.move_index), (0, 0));
    assert_eq!(view.readout.total, 0);
    assert_eq!(view.readout.text, "0 / 0");
    assert!(view.show_origin);
}

#[tokio::test]
async fn test_upload_and_navigate_across_games() {
    let base = common::spawn_server().await;
    let id = new_session(&base).await;

    let resp = upload(&base, &id, common::TWO_GAMES).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["loaded"], 2);
    assert_eq!(body["message"], "Loaded 2 games");
    assert_eq!(body["view"]["source_name"], "games.pgn");
    assert_eq!(cursor_of(&body["view"]), (0, 0));

    let mut view = Value::Null;
    for _ in 0..4 {
        view = nav(&base, &id, "forward").await;
    }
    assert_eq!(cursor_of(&view), (0, 4));
    assert_eq!(view["readout"]["text"], "4 / 4");
    assert_eq!(view["last_move"]["caption"], "Nc6 • b8 → c6");

    let view = nav(&base, &id, "forward").await;
    assert_eq!(cursor_of(&view), (1, 0));
    assert_eq!(view["current_game"]["white"], "Carol");

    let mut view = Value::Null;
    for _ in 0..6 {
        view = nav(&base, &id, "forward").await;
    }
    assert_eq!(cursor_of(&view), (1, 6));

    let view = nav(&base, &id, "forward").await;
    assert_eq!(cursor_of(&view), (1, 6));

    let view = nav(&base, &id, "first").await;
    assert_eq!(cursor_of(&view), (1, 0));
    assert!(view["last_move"].is_null());

    let view = nav(&base, &id, "back").await;
    assert_eq!(cursor_of(&view), (0, 4));

    let view = nav(&base, &id, "last").await;
    assert_eq!(cursor_of(&view), (0, 4));
}

#[tokio::test]
async fn test_empty_upload_keeps_previous_games() {
    let base = common::spawn_server().await;
    let id = new_session(&base).await;

    upload(&base, &id, common::TWO_GAMES).await;
    nav(&base, &id, "forward").await;
    nav(&base, &id, "forward").await;

    let resp = upload(&base, &id, "   \n").await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["detail"], "No games found in file");

    let view = get_view(&base, &id).await;
    assert_eq!(view.game_count, 2);
    assert_eq!((view.game_index, view.readout.move_index), (0, 2));
    assert_eq!(view.readout.text, "2 / 4");
}

#[tokio::test]
async fn test_upload_to_unknown_session_is_not_found() {
    let base = common::spawn_server().await;
    let missing = "00000000-0000-0000-0000-000000000000";

    let resp = upload(&base, missing, common::TWO_GAMES).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = upload(&base, missing, "not a chess file").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_game_selection() {
    let base = common::spawn_server().await;
    let id = new_session(&base).await;
    upload(&base, &id, common::TWO_GAMES).await;
    nav(&base, &id, "forward").await;

    let games: Value = common::client()
        .get(format!("{base}/api/sessions/{id}/games"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let games = games.as_array().unwrap();
    assert_eq!(games.len(), 2);
    assert_eq!(games[1]["index"], 1);
    assert_eq!(games[1]["black"], "Dave");
    assert_eq!(games[1]["event"], "Rapid Open");

    let resp = common::client()
        .put(format!("{base}/api/sessions/{id}/game"))
        .json(&serde_json::json!({ "index": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let view: Value = resp.json().await.unwrap();
    assert_eq!(cursor_of(&view), (1, 0));
    assert_eq!(view["readout"]["text"], "0 / 6");

    let resp = common::client()
        .put(format!("{base}/api/sessions/{id}/game"))
        .json(&serde_json::json!({ "index": 2 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert!(body["detail"].as_str().unwrap().contains("out of range"));
}

#[tokio::test]
async fn test_board_moves_and_options() {
    let base = common::spawn_server().await;
    let id = new_session(&base).await;
    upload(&base, &id, common::TWO_GAMES).await;
    nav(&base, &id, "forward").await;

    let resp = common::client()
        .get(format!("{base}/api/sessions/{id}/board.svg"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["content-type"], "image/svg+xml");
    let svg = resp.text().await.unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("#f7ec6e"));

    let view: Value = common::client()
        .put(format!("{base}/api/sessions/{id}/options"))
        .json(&serde_json::json!({ "show_origin": false }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(view["show_origin"], false);

    let svg = common::client()
        .get(format!("{base}/api/sessions/{id}/board.svg"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(!svg.contains("#f7ec6e"));

    let all: Value = common::client()
        .get(format!("{base}/api/sessions/{id}/moves"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all.as_array().unwrap().len(), 4);
    assert_eq!(all[0]["san"], "e4");
    assert_eq!(all[0]["current"], true);

    let played: Value = common::client()
        .get(format!("{base}/api/sessions/{id}/moves?played_only=true"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(played.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_eval_without_backend_is_unavailable() {
    let base = common::spawn_server().await;
    let id = new_session(&base).await;
    upload(&base, &id, common::TWO_GAMES).await;

    let resp = common::client()
        .get(format!("{base}/api/sessions/{id}/eval"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["backend"], "none");
    assert_eq!(body["evaluation"]["kind"], "unavailable");
    assert_eq!(body["display"], "evaluation unavailable");
}

#[tokio::test]
async fn test_unknown_session_and_action() {
    let base = common::spawn_server().await;

    let resp = common::client()
        .get(format!("{base}/api/sessions/00000000-0000-0000-0000-000000000000"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let id = new_session(&base).await;
    let resp = common::client()
        .post(format!("{base}/api/sessions/{id}/nav/sideways"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = common::client()
        .delete(format!("{base}/api/sessions/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = common::client()
        .delete(format!("{base}/api/sessions/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
