//! Integration tests for game sessions.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use realms_core::error::BackendError;
use realms_core::scene::ImageHandle;
use realms_test_support::{FailingBackend, ScriptedBackend, sample_scene};
use serde_json::json;

const IMAGE: &str = "data:image/png;base64,iVBORw0KGgo=";

fn image() -> Option<ImageHandle> {
    Some(ImageHandle::from_inline("image/png", "iVBORw0KGgo="))
}

#[tokio::test]
async fn test_full_adventure_round_trip() {
    // Arrange
    let backend = Arc::new(ScriptedBackend::with_sample_scenes(2));
    backend.push_image(image());
    backend.push_image(None);
    let app = common::build_test_app(backend.clone());
    let game_id = common::create_game(app.clone()).await;

    // Act: first turn
    let (status, json) =
        common::post_empty(app.clone(), &format!("/api/v1/games/{game_id}/start")).await;

    // Assert: text settled, image resolves later
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["gameId"], game_id.as_str());
    assert_eq!(json["state"]["currentScene"]["title"], "Scene 1");
    assert_eq!(json["state"]["history"], json!(["Scene: Scene 1 - Description 1."]));
    let state = common::settled_state(app.clone(), &game_id).await;
    assert_eq!(state["currentImage"], IMAGE);
    assert_eq!(state["imagePhase"], "image_ready");

    // Act: pick a choice
    let (status, json) = common::post_json(
        app.clone(),
        &format!("/api/v1/games/{game_id}/actions"),
        &json!({ "action": "Go left 1" }),
    )
    .await;

    // Assert: history grows, previous image is cleared
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["state"]["turnCount"], 2);
    assert_eq!(
        json["state"]["history"],
        json!([
            "Scene: Scene 1 - Description 1.",
            "Player chose: Go left 1",
            "Scene: Scene 2 - Description 2."
        ])
    );
    let state = common::settled_state(app.clone(), &game_id).await;
    assert!(state["currentImage"].is_null());
    assert_eq!(state["imagePhase"], "image_absent");

    let calls = backend.scene_calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[0].history.is_empty());
    assert_eq!(calls[1].action, "Go left 1");
    assert_eq!(backend.image_calls(), vec!["Visual 1", "Visual 2"]);
}

#[tokio::test]
async fn test_failed_turn_keeps_previous_scene_and_retry_recovers() {
    // Arrange
    let backend = Arc::new(ScriptedBackend::new());
    backend.push_scene(Ok(sample_scene(1)));
    backend.push_scene(Err(BackendError::Status {
        status: 503,
        body: "overloaded".into(),
    }));
    backend.push_scene(Ok(sample_scene(2)));
    let app = common::build_test_app(backend.clone());
    let game_id = common::create_game(app.clone()).await;
    common::post_empty(app.clone(), &format!("/api/v1/games/{game_id}/start")).await;

    // Act
    let (status, failed) = common::post_json(
        app.clone(),
        &format!("/api/v1/games/{game_id}/actions"),
        &json!({ "action": "Go right 1" }),
    )
    .await;
    let (_, retried) =
        common::post_empty(app.clone(), &format!("/api/v1/games/{game_id}/retry")).await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(failed["state"]["textPhase"], "text_error");
    assert_eq!(failed["state"]["currentScene"]["title"], "Scene 1");
    assert_eq!(failed["state"]["turnCount"], 1);

    assert!(retried["state"]["error"].is_null());
    assert_eq!(retried["state"]["currentScene"]["title"], "Scene 2");
    assert_eq!(backend.scene_calls()[2].action, "Try again");
}

#[tokio::test]
async fn test_reset_returns_to_start_screen() {
    let app = common::build_test_app(Arc::new(ScriptedBackend::with_sample_scenes(1)));
    let game_id = common::create_game(app.clone()).await;
    common::post_empty(app.clone(), &format!("/api/v1/games/{game_id}/start")).await;

    let (status, json) =
        common::post_empty(app.clone(), &format!("/api/v1/games/{game_id}/reset")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["state"]["isGameStarted"], false);
    assert!(json["state"]["currentScene"].is_null());
    assert_eq!(json["state"]["history"], json!([]));
    assert_eq!(json["state"]["turnCount"], 0);
}

#[tokio::test]
async fn test_unreachable_backend_reports_error_state() {
    let app = common::build_test_app(Arc::new(FailingBackend));
    let game_id = common::create_game(app.clone()).await;

    let (status, json) =
        common::post_empty(app.clone(), &format!("/api/v1/games/{game_id}/start")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["state"]["error"].is_string());
    assert_eq!(json["state"]["isGameStarted"], false);
    assert!(json["state"]["currentScene"].is_null());
    assert_eq!(json["state"]["isLoadingImage"], false);
}

#[tokio::test]
async fn test_blank_action_is_rejected() {
    let app = common::build_test_app(Arc::new(ScriptedBackend::new()));
    let game_id = common::create_game(app.clone()).await;

    let (status, json) = common::post_json(
        app,
        &format!("/api/v1/games/{game_id}/actions"),
        &json!({ "action": "" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_error");
}

#[tokio::test]
async fn test_ended_game_is_no_longer_found() {
    let app = common::build_test_app(Arc::new(ScriptedBackend::new()));
    let game_id = common::create_game(app.clone()).await;

    let (status, _) = common::delete(app.clone(), &format!("/api/v1/games/{game_id}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, json) = common::get_json(app.clone(), &format!("/api/v1/games/{game_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "game_not_found");

    let (status, _) = common::delete(app, &format!("/api/v1/games/{game_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
