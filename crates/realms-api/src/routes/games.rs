//! Routes for game sessions.
//!
//! Turn endpoints answer once the scene text has settled; the scene
//! illustration keeps loading in the background and shows up in later
//! reads of the game.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Json, Router, routing::get, routing::post};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use realms_narrative::application::query_handlers::{self, GameView};
use realms_narrative::application::command_handlers;
use realms_narrative::domain::commands;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /{game_id}/actions.
#[derive(Debug, Deserialize)]
pub struct SubmitActionRequest {
    /// The player's action, usually one of the current scene's choices.
    pub action: String,
}

/// POST /
#[instrument(skip(state))]
async fn create_game(State(state): State<AppState>) -> (StatusCode, Json<GameView>) {
    let view = command_handlers::handle_create_game(&state.sessions);
    (StatusCode::CREATED, Json(view))
}

/// GET /{game_id}
#[instrument(skip(state))]
async fn get_game(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
) -> Result<Json<GameView>, ApiError> {
    let view = query_handlers::get_game(game_id, &state.sessions)?;
    Ok(Json(view))
}

/// POST /{game_id}/start
#[instrument(skip(state))]
async fn start_game(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
) -> Result<Json<GameView>, ApiError> {
    let command = commands::StartGame { game_id };

    info!("handling start_game command");

    let view = command_handlers::handle_start_game(&command, &state.sessions).await?;
    Ok(Json(view))
}

/// POST /{game_id}/actions
#[instrument(skip(state, request))]
async fn submit_action(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
    Json(request): Json<SubmitActionRequest>,
) -> Result<Json<GameView>, ApiError> {
    let command = commands::SubmitAction {
        game_id,
        action: request.action,
    };

    info!("handling submit_action command");

    let view = command_handlers::handle_submit_action(&command, &state.sessions).await?;
    Ok(Json(view))
}

/// POST /{game_id}/retry
#[instrument(skip(state))]
async fn retry_turn(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
) -> Result<Json<GameView>, ApiError> {
    let command = commands::RetryTurn { game_id };

    info!("handling retry_turn command");

    let view = command_handlers::handle_retry_turn(&command, &state.sessions).await?;
    Ok(Json(view))
}

/// POST /{game_id}/reset
#[instrument(skip(state))]
async fn reset_game(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
) -> Result<Json<GameView>, ApiError> {
    let command = commands::ResetGame { game_id };

    info!("handling reset_game command");

    let view = command_handlers::handle_reset_game(&command, &state.sessions)?;
    Ok(Json(view))
}

/// DELETE /{game_id}
#[instrument(skip(state))]
async fn end_game(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let command = commands::EndGame { game_id };

    info!("handling end_game command");

    command_handlers::handle_end_game(&command, &state.sessions)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Returns the router for game sessions.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_game))
        .route("/{game_id}", get(get_game).delete(end_game))
        .route("/{game_id}/start", post(start_game))
        .route("/{game_id}/actions", post(submit_action))
        .route("/{game_id}/retry", post(retry_turn))
        .route("/{game_id}/reset", post(reset_game))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::Request;
    use realms_core::backend::NarrativeBackend;
    use realms_narrative::application::sessions::GameSessions;
    use realms_test_support::{FailingBackend, FixedClock, ScriptedBackend};
    use serde_json::Value;
    use tower::ServiceExt;

    fn app_with(backend: Arc<dyn NarrativeBackend>) -> (Router, AppState) {
        let state = AppState::new(GameSessions::new(backend, Arc::new(FixedClock::default())));
        (router().with_state(state.clone()), state)
    }

    async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn test_create_game_returns_201_with_empty_state() {
        // Arrange
        let (app, state) = app_with(Arc::new(ScriptedBackend::new()));

        // Act
        let (status, json) = send(app, "POST", "/", None).await;

        // Assert
        assert_eq!(status, StatusCode::CREATED);
        let game_id = Uuid::parse_str(json["gameId"].as_str().unwrap()).unwrap();
        assert!(state.sessions.get(game_id).is_ok());
        assert_eq!(json["state"]["isGameStarted"], false);
        assert_eq!(json["state"]["textPhase"], "idle");
        assert_eq!(json["state"]["history"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_start_game_returns_first_scene() {
        // Arrange
        let (app, state) = app_with(Arc::new(ScriptedBackend::with_sample_scenes(1)));
        let game_id = state.sessions.create().game_id();

        // Act
        let (status, json) = send(app, "POST", &format!("/{game_id}/start"), None).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["state"]["isGameStarted"], true);
        assert_eq!(json["state"]["currentScene"]["title"], "Scene 1");
        assert_eq!(json["state"]["turnCount"], 1);
        assert!(json["state"]["error"].is_null());
    }

    #[tokio::test]
    async fn test_failed_turn_returns_200_with_error_state() {
        // Arrange
        let (app, state) = app_with(Arc::new(FailingBackend));
        let game_id = state.sessions.create().game_id();

        // Act
        let (status, json) = send(app, "POST", &format!("/{game_id}/start"), None).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["state"]["textPhase"], "text_error");
        assert_eq!(
            json["state"]["error"],
            "The mists of time are thick. The oracle could not see the future. Please try again."
        );
    }

    #[tokio::test]
    async fn test_submit_blank_action_returns_400() {
        let (app, state) = app_with(Arc::new(ScriptedBackend::new()));
        let game_id = state.sessions.create().game_id();

        let (status, json) = send(
            app,
            "POST",
            &format!("/{game_id}/actions"),
            Some(serde_json::json!({ "action": "   " })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_submit_action_returns_422_for_missing_field() {
        let (app, state) = app_with(Arc::new(ScriptedBackend::new()));
        let game_id = state.sessions.create().game_id();

        let request = Request::builder()
            .method("POST")
            .uri(format!("/{game_id}/actions"))
            .header("content-type", "application/json")
            .body(Body::from("{}"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_unknown_game_returns_404() {
        let (app, _) = app_with(Arc::new(ScriptedBackend::new()));

        let (status, json) = send(app, "GET", &format!("/{}", Uuid::new_v4()), None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "game_not_found");
    }

    #[tokio::test]
    async fn test_malformed_game_id_returns_400() {
        let (app, _) = app_with(Arc::new(ScriptedBackend::new()));

        let request = Request::builder()
            .method("GET")
            .uri("/not-a-uuid")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_end_game_returns_204_and_forgets_game() {
        // Arrange
        let (app, state) = app_with(Arc::new(ScriptedBackend::new()));
        let game_id = state.sessions.create().game_id();

        // Act
        let (status, json) = send(app, "DELETE", &format!("/{game_id}"), None).await;

        // Assert
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(json.is_null());
        assert!(state.sessions.is_empty());
    }
}
