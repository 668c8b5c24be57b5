//! Command handlers for game sessions.
//!
//! Each handler looks up the game's turn controller, runs the command, and
//! returns the resulting view. Text-generation failures are not errors here:
//! they are recorded in the returned state.

use realms_core::error::DomainError;
use tracing::info;

use super::query_handlers::GameView;
use super::sessions::GameSessions;
use crate::domain::commands::{EndGame, ResetGame, RetryTurn, StartGame, SubmitAction};

/// Creates a new game with an empty state.
pub fn handle_create_game(sessions: &GameSessions) -> GameView {
    let controller = sessions.create();
    info!(game_id = %controller.game_id(), "game created");
    GameView::new(controller.game_id(), &controller.snapshot())
}

/// Handles the `StartGame` command: plays the bootstrap turn.
///
/// # Errors
///
/// Returns `DomainError::GameNotFound` if the game does not exist.
pub async fn handle_start_game(
    command: &StartGame,
    sessions: &GameSessions,
) -> Result<GameView, DomainError> {
    let controller = sessions.get(command.game_id)?;
    let state = controller.start_game().await;
    Ok(GameView::new(command.game_id, &state))
}

/// Handles the `SubmitAction` command: plays a turn with the player's action.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the action is blank and
/// `DomainError::GameNotFound` if the game does not exist.
pub async fn handle_submit_action(
    command: &SubmitAction,
    sessions: &GameSessions,
) -> Result<GameView, DomainError> {
    let action = command.action.trim();
    if action.is_empty() {
        return Err(DomainError::Validation("action must not be empty".into()));
    }
    let controller = sessions.get(command.game_id)?;
    let state = controller.submit_action(action, false).await;
    Ok(GameView::new(command.game_id, &state))
}

/// Handles the `RetryTurn` command.
///
/// # Errors
///
/// Returns `DomainError::GameNotFound` if the game does not exist.
pub async fn handle_retry_turn(
    command: &RetryTurn,
    sessions: &GameSessions,
) -> Result<GameView, DomainError> {
    let controller = sessions.get(command.game_id)?;
    let state = controller.retry().await;
    Ok(GameView::new(command.game_id, &state))
}

/// Handles the `ResetGame` command.
///
/// # Errors
///
/// Returns `DomainError::GameNotFound` if the game does not exist.
pub fn handle_reset_game(
    command: &ResetGame,
    sessions: &GameSessions,
) -> Result<GameView, DomainError> {
    let controller = sessions.get(command.game_id)?;
    let state = controller.reset();
    Ok(GameView::new(command.game_id, &state))
}

/// Handles the `EndGame` command: drops the session.
///
/// # Errors
///
/// Returns `DomainError::GameNotFound` if the game does not exist.
pub fn handle_end_game(command: &EndGame, sessions: &GameSessions) -> Result<(), DomainError> {
    sessions.remove(command.game_id)?;
    info!(game_id = %command.game_id, "game ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use realms_core::error::DomainError;
    use realms_test_support::{FailingBackend, FixedClock, ScriptedBackend};
    use uuid::Uuid;

    use crate::application::command_handlers::{
        handle_create_game, handle_end_game, handle_reset_game, handle_retry_turn,
        handle_start_game, handle_submit_action,
    };
    use crate::application::sessions::GameSessions;
    use crate::domain::aggregates::{TEXT_FAILURE_MESSAGE, TextPhase};
    use crate::domain::commands::{EndGame, ResetGame, RetryTurn, StartGame, SubmitAction};

    fn sessions_with(backend: Arc<dyn realms_core::backend::NarrativeBackend>) -> GameSessions {
        GameSessions::new(backend, Arc::new(FixedClock::default()))
    }

    #[tokio::test]
    async fn test_start_then_submit_action_plays_two_turns() {
        // Arrange
        let backend = Arc::new(ScriptedBackend::with_sample_scenes(2));
        let sessions = sessions_with(backend.clone());
        let game_id = handle_create_game(&sessions).game_id;

        // Act
        handle_start_game(&StartGame { game_id }, &sessions)
            .await
            .unwrap();
        let view = handle_submit_action(
            &SubmitAction {
                game_id,
                action: "  Go left 1 ".into(),
            },
            &sessions,
        )
        .await
        .unwrap();

        // Assert
        assert_eq!(view.state.turn_count, 2);
        assert_eq!(backend.scene_calls()[1].action, "Go left 1");
        assert_eq!(view.state.history[1], "Player chose: Go left 1");
    }

    #[tokio::test]
    async fn test_submit_blank_action_is_rejected() {
        let sessions = sessions_with(Arc::new(ScriptedBackend::new()));
        let game_id = handle_create_game(&sessions).game_id;

        let result = handle_submit_action(
            &SubmitAction {
                game_id,
                action: "   ".into(),
            },
            &sessions,
        )
        .await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_start_unknown_game_returns_not_found() {
        let sessions = sessions_with(Arc::new(ScriptedBackend::new()));
        let game_id = Uuid::new_v4();

        let result = handle_start_game(&StartGame { game_id }, &sessions).await;

        match result {
            Err(DomainError::GameNotFound(id)) => assert_eq!(id, game_id),
            other => panic!("expected GameNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failed_turn_is_reported_in_state_not_as_error() {
        let sessions = sessions_with(Arc::new(FailingBackend));
        let game_id = handle_create_game(&sessions).game_id;

        let view = handle_retry_turn(&RetryTurn { game_id }, &sessions)
            .await
            .unwrap();

        assert_eq!(view.state.error.as_deref(), Some(TEXT_FAILURE_MESSAGE));
        assert_eq!(view.state.text_phase, TextPhase::TextError);
    }

    #[tokio::test]
    async fn test_reset_and_end_game() {
        // Arrange
        let sessions = sessions_with(Arc::new(ScriptedBackend::with_sample_scenes(1)));
        let game_id = handle_create_game(&sessions).game_id;
        handle_start_game(&StartGame { game_id }, &sessions)
            .await
            .unwrap();

        // Act
        let view = handle_reset_game(&ResetGame { game_id }, &sessions).unwrap();
        handle_end_game(&EndGame { game_id }, &sessions).unwrap();

        // Assert
        assert_eq!(view.state.turn_count, 0);
        assert!(!view.state.is_game_started);
        assert!(sessions.is_empty());
    }
}
