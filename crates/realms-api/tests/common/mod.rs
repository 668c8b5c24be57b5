//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use realms_core::backend::NarrativeBackend;
use realms_narrative::application::sessions::GameSessions;
use realms_test_support::FixedClock;
use serde_json::Value;
use tower::ServiceExt;

use realms_api::state::AppState;

/// Build the full app router over `backend` with a fixed clock. Uses the
/// same route structure as `main.rs`.
pub fn build_test_app(backend: Arc<dyn NarrativeBackend>) -> Router {
    let sessions = GameSessions::new(backend, Arc::new(FixedClock::default()));
    realms_api::app(AppState::new(sessions))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(app: Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a POST request without a body and return the response.
pub async fn post_empty(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Send a DELETE request and return the response.
pub async fn delete(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Create a game and return its id.
pub async fn create_game(app: Router) -> String {
    let (status, json) = post_empty(app, "/api/v1/games").await;
    assert_eq!(status, StatusCode::CREATED);
    json["gameId"].as_str().unwrap().to_owned()
}

/// Poll the game until its image channel has settled and return the state.
pub async fn settled_state(app: Router, game_id: &str) -> Value {
    let uri = format!("/api/v1/games/{game_id}");
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let (status, json) = get_json(app.clone(), &uri).await;
            assert_eq!(status, StatusCode::OK);
            if json["state"]["isLoadingImage"] == false {
                return json["state"].clone();
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap()
}
