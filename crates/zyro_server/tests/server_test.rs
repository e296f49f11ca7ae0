//! HTTP surface tests driven through the router directly.

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;
use zyro_grid::{Board, GRID_SIZE, MatchState, Side, WorldSetting};
use zyro_server::{GenerateTurnResponse, LlmGateway, TurnResolver, router};

fn app() -> Router {
    let gateway = LlmGateway::with_seed(None, 21);
    router(Arc::new(TurnResolver::with_seed(gateway, 21)))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

fn generate_request(body: &Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/game/generate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_generate_resolves_one_turn() {
    let state = MatchState::new(WorldSetting::for_day(3));
    let body = serde_json::to_value(&state).unwrap();

    let (status, bytes) = send(app(), generate_request(&body)).await;

    assert_eq!(status, StatusCode::OK);
    let response: GenerateTurnResponse = serde_json::from_slice(&bytes).unwrap();
    assert!(!response.is_game_over);
    assert!(response.new_scores.total() <= 1);
    assert_eq!(response.new_scores, response.new_grid_state.compute_scores());

    let value: Value = serde_json::from_slice(&bytes).unwrap();
    for key in ["turnResult", "newGridState", "newScores", "isGameOver"] {
        assert!(value.get(key).is_some(), "missing {}", key);
    }
    let turn = &value["turnResult"];
    for key in ["playerAAction", "playerBAction", "outcome", "winner", "gridPosition"] {
        assert!(turn.get(key).is_some(), "missing turnResult.{}", key);
    }
}

#[tokio::test]
async fn test_generate_accepts_minimal_body() {
    let body = json!({
        "worldSetting": { "name": "Nowhere", "description": "An empty void." },
        "gridState": vec![vec![Value::Null; GRID_SIZE]; GRID_SIZE],
    });

    let (status, _) = send(app(), generate_request(&body)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_generate_at_max_turn_counter() {
    let mut state = MatchState::new(WorldSetting::for_day(5));
    state.current_turn = u32::MAX;
    let body = serde_json::to_value(&state).unwrap();

    let (status, bytes) = send(app(), generate_request(&body)).await;

    assert_eq!(status, StatusCode::OK);
    let response: GenerateTurnResponse = serde_json::from_slice(&bytes).unwrap();
    assert!(!response.is_game_over);
}

#[tokio::test]
async fn test_generate_rejects_concluded_match() {
    let state = MatchState::new(WorldSetting::for_day(1)).concluded();
    let body = serde_json::to_value(&state).unwrap();

    let (status, bytes) = send(app(), generate_request(&body)).await;

    assert_eq!(status, StatusCode::CONFLICT);
    let value: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value["isGameOver"], true);
    assert!(value["error"].as_str().unwrap().contains("concluded"));
}

#[tokio::test]
async fn test_generate_rejects_full_board() {
    let cells: [[Option<Side>; GRID_SIZE]; GRID_SIZE] = [[Some(Side::B); GRID_SIZE]; GRID_SIZE];
    let mut state = MatchState::new(WorldSetting::for_day(2));
    state.grid_state = Board::from(cells);
    let body = serde_json::to_value(&state).unwrap();

    let (status, bytes) = send(app(), generate_request(&body)).await;

    assert_eq!(status, StatusCode::CONFLICT);
    let value: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value["isGameOver"], true);
}

#[tokio::test]
async fn test_generate_rejects_malformed_grid() {
    let mut body = serde_json::to_value(MatchState::new(WorldSetting::for_day(0))).unwrap();
    body["gridState"][0][0] = json!("C");

    let (status, _) = send(app(), generate_request(&body)).await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_generate_only_accepts_post() {
    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/game/generate")
        .body(Body::empty())
        .unwrap();

    let (status, _) = send(app(), request).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_new_match_is_fresh() {
    let request = Request::builder()
        .uri("/api/game/new")
        .body(Body::empty())
        .unwrap();

    let (status, bytes) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    let state: MatchState = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(state.current_turn, 0);
    assert!(!state.is_game_over);
    assert!(state.turn_history.is_empty());
    assert_eq!(state.grid_state.filled(), 0);
    assert!(state.world_setting.is_builtin());
}

#[tokio::test]
async fn test_health() {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let (status, bytes) = send(app(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, b"ok");
}
